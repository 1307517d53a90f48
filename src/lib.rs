//! # sentinel_lsb 库
//!
//! 本库包含以哨兵标记结尾的 LSB 隐写工具的核心逻辑：
//! 比特编解码、像素数组读写，以及编码与解码算法。

// 声明库包含的所有模块。

pub mod cli;
pub mod codec;
pub mod constants;
pub mod error;
pub mod handler;
pub mod pixels;
pub mod steganography;

pub use error::StegoError;
pub use pixels::PixelArray;
pub use steganography::{decode, encode};
