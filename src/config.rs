//! # 配置模块
//!
//! 编码器与解码器共用的配置。命令行参数在 `handler` 中被映射为 [`StegoConfig`]。

use crate::constants::MAGIC_STRING;
use crate::record::EmbeddedRecord;

/// 一次编码或解码操作的配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StegoConfig {
    /// 写在记录开头的魔数字符串，编码端和解码端必须一致。
    pub magic: Vec<u8>,
    /// 解码时是否校验恢复出的魔数字符串。
    pub verify_magic: bool,
    /// 可选的载荷长度上限 (字节)。`None` 表示只受容量和 `u32` 长度字段限制。
    pub max_payload_len: Option<u32>,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            magic: MAGIC_STRING.as_bytes().to_vec(),
            verify_magic: true,
            max_payload_len: None,
        }
    }
}

impl StegoConfig {
    pub fn with_magic(mut self, magic: impl Into<Vec<u8>>) -> Self {
        self.magic = magic.into();
        self
    }

    pub fn with_verify_magic(mut self, verify: bool) -> Self {
        self.verify_magic = verify;
        self
    }

    pub fn with_max_payload_len(mut self, limit: Option<u32>) -> Self {
        self.max_payload_len = limit;
        self
    }

    /// 用配置中的魔数字符串构造待嵌入的记录。
    pub fn record(
        &self,
        extension: impl Into<Vec<u8>>,
        payload: impl Into<Vec<u8>>,
    ) -> EmbeddedRecord {
        EmbeddedRecord::new(self.magic.clone(), extension, payload)
    }

    /// 生效的载荷长度上限：配置值与 `u32::MAX` 中较小者。
    pub fn payload_limit(&self) -> u64 {
        u64::from(self.max_payload_len.unwrap_or(u32::MAX))
    }
}
