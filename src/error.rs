//! # 错误类型模块
//!
//! 定义库中所有隐写操作可能返回的错误。命令行层在此基础上使用 `anyhow` 附加上下文。

use std::path::PathBuf;
use thiserror::Error;

/// 隐写编码、解码以及图像读写过程中可能出现的错误。
#[derive(Error, Debug)]
pub enum StegoError {
    /// 消息中包含无法用 8 个比特表示的字符 (码点大于 255)。
    #[error("Character {character:?} at index {index} cannot be represented in 8 bits")]
    Encoding { character: char, index: usize },

    /// 消息加哨兵所需的比特数超过了图像的容量。
    #[error("Not enough space in the image: required {required} bits, available {available} bits")]
    Capacity { required: usize, available: usize },

    /// 扫描完所有样本仍未找到哨兵。
    #[error("No message found in the image ({scanned} samples scanned)")]
    NoMessageFound { scanned: usize },

    /// 哨兵之前的比特数不是 8 的整数倍，无法还原为字符。
    #[error("Recovered bitstream of {len} bits is not a whole number of characters")]
    MisalignedBitstream { len: usize },

    /// 图像文件无法读取或写入，或扩展名对应的格式不受支持。
    #[error("Image file error on {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// 目标格式无法原样保存该通道数的样本，写入后隐藏的比特会错位。
    #[error("{format:?} cannot store {channels}-channel samples unchanged: {}", path.display())]
    LossyFormat {
        path: PathBuf,
        format: image::ImageFormat,
        channels: usize,
    },

    /// 像素缓冲区的形状与数据长度不一致，或通道数不受支持。
    #[error(
        "Unsupported pixel layout: {height}x{width}x{channels} does not match {len} samples"
    )]
    UnsupportedLayout {
        height: usize,
        width: usize,
        channels: usize,
        len: usize,
    },
}
