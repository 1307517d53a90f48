/// 消息结束标记 (哨兵)：`1111111111111110`。
/// 解码时一旦最近读出的 16 个比特等于该值，即认为消息结束。
pub const SENTINEL: u16 = 0b1111_1111_1111_1110;

/// 哨兵所占的比特数。
pub const SENTINEL_BITS: usize = 16;

/// 哨兵的比特序列形式 (高位在前)，追加在每个比特流末尾。
pub const SENTINEL_PATTERN: [u8; SENTINEL_BITS] = [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0];

/// 每个字符按单字节处理，占 8 个比特，即 8 个像素通道样本。
pub const BITS_PER_CHAR: usize = 8;

/// 未指定输出路径时，隐写图像文件名的前缀。
pub const DEFAULT_HIDDEN_PREFIX: &str = "doctored_";

/// 默认输出图像的扩展名。PNG 为无损格式，可以保留最低有效位。
pub const DEFAULT_HIDDEN_EXTENSION: &str = "png";
