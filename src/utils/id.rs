//! 十位 62 进制导航 ID 生成器
//!
//! 每次导航尝试分配一个短 ID，用于在日志中串联同一次导航的
//! 各个阶段。格式：10 位 62 进制字符串（0-9, a-z, A-Z）。

use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// 62 进制字符集
const BASE62_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// ID 长度
const ID_LENGTH: usize = 10;

/// 生成 10 位 62 进制导航 ID
///
/// 使用时间戳 + 随机数组合，确保唯一性
///
/// # Example
///
/// ```
/// use mina_router::utils::id::generate_id;
///
/// let id = generate_id();
/// assert_eq!(id.len(), 10);
/// ```
pub fn generate_id() -> String {
    let mut rng = rand::thread_rng();

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    let random: u64 = rng.gen();

    let mut value = timestamp ^ random;

    let mut result = Vec::with_capacity(ID_LENGTH);
    for _ in 0..ID_LENGTH {
        let index = (value % 62) as usize;
        result.push(BASE62_CHARS[index]);
        value /= 62;
    }

    result.reverse();
    String::from_utf8(result).expect("base62 charset is ASCII")
}

/// 验证 ID 格式是否有效
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LENGTH && id.chars().all(|c| c.is_ascii_alphanumeric())
}
