//! # 位编解码模块
//!
//! LSB 隐写的最底层：把单个 bit 写入载体字节的最低位，或从中读出。
//! 字节和 `u32` 都按 MSB 优先的顺序展开，第一个载体字节承载最高位。
//! 固定长度的数组参数保证了调用方总是提供 8 或 32 个载体字节。

use crate::constants::{CARRIERS_PER_BYTE, CARRIERS_PER_LENGTH};

/// 把 `bit` 写入 `carrier` 的最低位，其余 7 位保持不变。
///
/// `bit` 只取最低位，其余位被忽略。
pub fn encode_bit_into_byte(bit: u8, carrier: u8) -> u8 {
    (carrier & 0xFE) | (bit & 0x1)
}

/// 返回 `carrier` 的最低位。
pub fn decode_bit_from_byte(carrier: u8) -> u8 {
    carrier & 0x1
}

/// 把 `data` 的 bit 7..0 依次写入 `carriers[0..8]` 的最低位。
pub fn encode_byte_to_carriers(
    data: u8,
    mut carriers: [u8; CARRIERS_PER_BYTE],
) -> [u8; CARRIERS_PER_BYTE] {
    for (i, carrier) in carriers.iter_mut().enumerate() {
        let bit = data >> (CARRIERS_PER_BYTE - 1 - i);
        *carrier = encode_bit_into_byte(bit, *carrier);
    }
    carriers
}

/// `encode_byte_to_carriers` 的逆操作。
pub fn decode_byte_from_carriers(carriers: [u8; CARRIERS_PER_BYTE]) -> u8 {
    carriers
        .iter()
        .fold(0u8, |acc, &carrier| (acc << 1) | decode_bit_from_byte(carrier))
}

/// 把 `value` 的 bit 31..0 依次写入 `carriers[0..32]` 的最低位。
pub fn encode_u32_to_carriers(
    value: u32,
    mut carriers: [u8; CARRIERS_PER_LENGTH],
) -> [u8; CARRIERS_PER_LENGTH] {
    for (i, carrier) in carriers.iter_mut().enumerate() {
        let bit = (value >> (CARRIERS_PER_LENGTH - 1 - i)) as u8;
        *carrier = encode_bit_into_byte(bit, *carrier);
    }
    carriers
}

/// `encode_u32_to_carriers` 的逆操作。
pub fn decode_u32_from_carriers(carriers: [u8; CARRIERS_PER_LENGTH]) -> u32 {
    carriers.iter().fold(0u32, |acc, &carrier| {
        (acc << 1) | u32::from(decode_bit_from_byte(carrier))
    })
}
