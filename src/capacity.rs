//! # 容量规划模块
//!
//! 在写入任何字节之前判断载体图像能否容纳完整的隐藏记录。

use crate::constants::{BMP_HEADER_SIZE, CARRIERS_PER_BYTE, LENGTH_FIELD_SIZE};
use crate::error::{Result, StegoError};

/// 一次成功的容量检查结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityReport {
    /// 头部加上记录所需的载体字节数。
    pub required: u64,
    /// 载体图像的总字节数。
    pub available: u64,
}

impl CapacityReport {
    /// 记录之后原样复制的载体字节数。
    pub fn spare(&self) -> u64 {
        self.available - self.required
    }
}

/// 隐藏记录 (三个长度字段和三段内容) 所需的载体字节数，不含头部。
pub fn required_carrier_bytes(magic_len: u64, extension_len: u64, payload_len: u64) -> u64 {
    let record_len = 3 * LENGTH_FIELD_SIZE as u64 + magic_len + extension_len + payload_len;
    record_len.saturating_mul(CARRIERS_PER_BYTE as u64)
}

/// 检查载体是否有足够空间。
///
/// 只有当 `carrier_len` 严格大于 `54 + required_carrier_bytes(..)` 时才算成功，
/// 恰好相等也会被拒绝。
///
/// # Errors
///
/// 空间不足时返回 [`StegoError::InsufficientCapacity`]。
pub fn check_capacity(
    carrier_len: u64,
    magic_len: u64,
    extension_len: u64,
    payload_len: u64,
) -> Result<CapacityReport> {
    let required = (BMP_HEADER_SIZE as u64)
        .saturating_add(required_carrier_bytes(magic_len, extension_len, payload_len));

    if carrier_len > required {
        Ok(CapacityReport {
            required,
            available: carrier_len,
        })
    } else {
        Err(StegoError::InsufficientCapacity {
            required,
            available: carrier_len,
        })
    }
}

/// 在给定魔数和扩展名长度下，载体能隐藏的最大载荷长度。
///
/// 连空载荷都放不下时返回 `None`。
pub fn max_payload_len(carrier_len: u64, magic_len: u64, extension_len: u64) -> Option<u64> {
    // 严格大于：可用于记录的载体字节是 carrier_len - 54 - 1
    let usable = carrier_len.checked_sub(BMP_HEADER_SIZE as u64 + 1)?;
    let record_bytes = usable / CARRIERS_PER_BYTE as u64;
    record_bytes.checked_sub(3 * LENGTH_FIELD_SIZE as u64 + magic_len + extension_len)
}
