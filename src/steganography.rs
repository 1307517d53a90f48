//! # 隐写核心算法模块
//!
//! 按 行 → 列 → 通道 的顺序遍历样本，每个样本的最低有效位承载一个比特。
//! 消息比特流之后紧跟 16 位哨兵，解码时以哨兵判断消息结束。
//!
//! 已知限制：若消息内容本身在比特流中恰好出现哨兵序列，解码会在该处提前结束。

use crate::codec::{bits_to_text, framed_bits};
use crate::constants::{BITS_PER_CHAR, SENTINEL, SENTINEL_BITS};
use crate::error::StegoError;
use crate::pixels::PixelArray;
use log::debug;

/// 将消息嵌入像素数组，返回修改后的副本。
///
/// 所有检查都在修改之前完成：失败时不会产生任何输出，原数组始终保持不变。
/// 只有前 `8 * len + 16` 个样本的最低位被改写，高 7 位和其余样本保持原样。
///
/// # Errors
///
/// * 消息包含码点大于 255 的字符时返回 [`StegoError::Encoding`]。
/// * 比特流长度超过图像容量时返回 [`StegoError::Capacity`]。
pub fn encode(carrier: &PixelArray, message: &str) -> Result<PixelArray, StegoError> {
    let bits = framed_bits(message)?;

    if bits.len() > carrier.capacity() {
        return Err(StegoError::Capacity {
            required: bits.len(),
            available: carrier.capacity(),
        });
    }

    let mut output = carrier.clone();
    output
        .samples_mut()
        .iter_mut()
        .zip(&bits)
        .for_each(|(sample, &bit)| *sample = (bit & 1) | (*sample & 0xFE));

    debug!(
        "Embedded {} bits ({} characters + sentinel) into {} samples",
        bits.len(),
        message.chars().count(),
        carrier.capacity()
    );

    Ok(output)
}

/// 解码器的扫描状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    /// 哨兵在第 `end` 个比特处结束。
    Found { end: usize },
    Exhausted,
}

/// 从像素数组中恢复消息。
///
/// 逐个读取样本的最低位，每读一位就检查最近的 16 位是否等于哨兵，首次匹配即停止。
///
/// # Errors
///
/// * 扫描完所有样本仍未遇到哨兵时返回 [`StegoError::NoMessageFound`]。
/// * 哨兵前的比特数不是 8 的整数倍时返回 [`StegoError::MisalignedBitstream`]。
pub fn decode(carrier: &PixelArray) -> Result<String, StegoError> {
    let mut bits = Vec::new();
    let mut window: u16 = 0;
    let mut state = ScanState::Scanning;

    for &sample in carrier.samples() {
        let bit = sample & 1;
        bits.push(bit);
        window = (window << 1) | u16::from(bit);

        if bits.len() >= SENTINEL_BITS && window == SENTINEL {
            state = ScanState::Found { end: bits.len() };
            break;
        }
    }

    if state == ScanState::Scanning {
        state = ScanState::Exhausted;
    }

    match state {
        ScanState::Found { end } => {
            let payload = &bits[..end - SENTINEL_BITS];
            debug!(
                "Sentinel found after {} samples, payload is {} bits",
                end,
                payload.len()
            );
            bits_to_text(payload)
        }
        ScanState::Exhausted | ScanState::Scanning => Err(StegoError::NoMessageFound {
            scanned: bits.len(),
        }),
    }
}

/// 图像最多能容纳的字符数 (扣除哨兵)。
pub fn capacity_chars(carrier: &PixelArray) -> usize {
    carrier.capacity().saturating_sub(SENTINEL_BITS) / BITS_PER_CHAR
}
