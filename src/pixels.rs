//! # 像素数组模块
//!
//! 提供 `[行][列][通道]` 形式的 8 位样本数组，以及基于 `image` 库的图像读写。
//! 样本在内存中按 行 → 列 → 通道 的顺序平铺存放，与隐写的遍历顺序一致。

use crate::error::StegoError;
use image::{ColorType, DynamicImage, ImageFormat};
use log::{debug, warn};
use std::path::Path;

/// 一幅图像的全部 8 位样本。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelArray {
    height: usize,
    width: usize,
    channels: usize,
    samples: Vec<u8>,
}

impl PixelArray {
    /// 由形状和平铺样本构造像素数组。
    ///
    /// # Errors
    ///
    /// 若通道数不在 1..=4 之间，或 `samples` 的长度不等于 `height * width * channels`，
    /// 返回 [`StegoError::UnsupportedLayout`]。
    pub fn new(
        height: usize,
        width: usize,
        channels: usize,
        samples: Vec<u8>,
    ) -> Result<Self, StegoError> {
        let expected = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(channels));

        if !(1..=4).contains(&channels) || expected != Some(samples.len()) {
            return Err(StegoError::UnsupportedLayout {
                height,
                width,
                channels,
                len: samples.len(),
            });
        }

        Ok(Self {
            height,
            width,
            channels,
            samples,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// 可嵌入的比特总数：每个样本一个比特。
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// 按遍历顺序排列的全部样本。
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    /// 读取 `[row][col][channel]` 处的样本，越界时返回 `None`。
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<u8> {
        if row >= self.height || col >= self.width || channel >= self.channels {
            return None;
        }
        self.samples
            .get((row * self.width + col) * self.channels + channel)
            .copied()
    }

    fn color_type(&self) -> ColorType {
        match self.channels {
            1 => ColorType::L8,
            2 => ColorType::La8,
            3 => ColorType::Rgb8,
            _ => ColorType::Rgba8,
        }
    }
}

impl From<DynamicImage> for PixelArray {
    /// 8 位灰度、灰度 + Alpha、RGB、RGBA 图像保留原有通道数，其他格式转换为 RGBA8。
    fn from(image: DynamicImage) -> Self {
        let (width, height) = (image.width() as usize, image.height() as usize);

        let (channels, samples) = match image.color() {
            ColorType::L8 => (1, image.into_luma8().into_raw()),
            ColorType::La8 => (2, image.into_luma_alpha8().into_raw()),
            ColorType::Rgb8 => (3, image.into_rgb8().into_raw()),
            ColorType::Rgba8 => (4, image.into_rgba8().into_raw()),
            other => {
                warn!("Converting {other:?} image to 8-bit RGBA; only 8-bit samples carry data");
                (4, image.into_rgba8().into_raw())
            }
        };

        Self {
            height,
            width,
            channels,
            samples,
        }
    }
}

/// 从文件加载图像并转换为像素数组。
///
/// # Errors
///
/// 路径不可读或格式不受支持时返回 [`StegoError::File`]。
pub fn load_image(path: &Path) -> Result<PixelArray, StegoError> {
    let image = image::open(path).map_err(|source| StegoError::File {
        path: path.to_path_buf(),
        source,
    })?;

    let pixels = PixelArray::from(image);
    debug!(
        "Loaded {} as {}x{}x{} samples",
        path.display(),
        pixels.height,
        pixels.width,
        pixels.channels
    );
    Ok(pixels)
}

/// 该格式能否原样保存给定通道数的样本。
/// BMP、WebP、QOI 会把灰度扩展为 RGB/RGBA，TIFF 不支持灰度 + Alpha，
/// 其他格式交由 `image` 库自行报告错误。
fn preserves_channels(format: ImageFormat, channels: usize) -> bool {
    match format {
        ImageFormat::Png => true,
        ImageFormat::Tiff => channels != 2,
        ImageFormat::Bmp | ImageFormat::WebP | ImageFormat::Qoi => channels >= 3,
        _ => true,
    }
}

/// 将像素数组保存为图像文件，格式由扩展名决定。
///
/// # Errors
///
/// 写入失败或扩展名对应的格式不受支持时返回 [`StegoError::File`]；
/// 格式会改变通道布局时返回 [`StegoError::LossyFormat`]，此时不写入任何文件；
/// 尺寸超出 `u32` 时返回 [`StegoError::UnsupportedLayout`]。
pub fn save_image(pixels: &PixelArray, path: &Path) -> Result<(), StegoError> {
    let format = ImageFormat::from_path(path).map_err(|source| StegoError::File {
        path: path.to_path_buf(),
        source,
    })?;
    if !preserves_channels(format, pixels.channels) {
        return Err(StegoError::LossyFormat {
            path: path.to_path_buf(),
            format,
            channels: pixels.channels,
        });
    }

    let layout_error = || StegoError::UnsupportedLayout {
        height: pixels.height,
        width: pixels.width,
        channels: pixels.channels,
        len: pixels.samples.len(),
    };
    let width = u32::try_from(pixels.width).map_err(|_| layout_error())?;
    let height = u32::try_from(pixels.height).map_err(|_| layout_error())?;

    image::save_buffer(path, &pixels.samples, width, height, pixels.color_type()).map_err(
        |source| StegoError::File {
            path: path.to_path_buf(),
            source,
        },
    )?;

    debug!("Saved {}x{} image to {}", width, height, path.display());
    Ok(())
}
