//! # 比特编解码模块
//!
//! 在文本和比特流之间转换。每个字符按其码点取 8 位大端二进制，比特以 `0`/`1` 字节表示。

use crate::constants::{BITS_PER_CHAR, SENTINEL_PATTERN};
use crate::error::StegoError;

/// 将文本转换为比特流。
///
/// # Errors
///
/// 若某个字符的码点大于 255，返回 [`StegoError::Encoding`]。
pub fn text_to_bits(message: &str) -> Result<Vec<u8>, StegoError> {
    let mut bits = Vec::with_capacity(message.len() * BITS_PER_CHAR);

    for (index, character) in message.chars().enumerate() {
        let byte = u8::try_from(u32::from(character))
            .map_err(|_| StegoError::Encoding { character, index })?;
        bits.extend((0..BITS_PER_CHAR).rev().map(|shift| (byte >> shift) & 1));
    }

    Ok(bits)
}

/// 将比特流还原为文本，是 [`text_to_bits`] 的逆运算。
///
/// # Errors
///
/// 若比特流长度不是 8 的整数倍，返回 [`StegoError::MisalignedBitstream`]。
pub fn bits_to_text(bits: &[u8]) -> Result<String, StegoError> {
    if bits.len() % BITS_PER_CHAR != 0 {
        return Err(StegoError::MisalignedBitstream { len: bits.len() });
    }

    Ok(bits
        .chunks_exact(BITS_PER_CHAR)
        .map(|group| char::from(group.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1))))
        .collect())
}

/// 消息的比特流加上结尾哨兵，即实际写入图像的完整比特序列。
pub fn framed_bits(message: &str) -> Result<Vec<u8>, StegoError> {
    let mut bits = text_to_bits(message)?;
    bits.extend_from_slice(&SENTINEL_PATTERN);
    Ok(bits)
}
