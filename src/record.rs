//! # 隐藏记录
//!
//! 编码器写入、解码器恢复的三段式记录：魔数字符串、扩展名、载荷。

use crate::error::{Result, StegoError};
use crate::pipeline::Stage;

/// 编码器要写入载体的记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedRecord {
    pub magic: Vec<u8>,
    pub extension: Vec<u8>,
    pub payload: Vec<u8>,
}

impl EmbeddedRecord {
    pub fn new(
        magic: impl Into<Vec<u8>>,
        extension: impl Into<Vec<u8>>,
        payload: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            magic: magic.into(),
            extension: extension.into(),
            payload: payload.into(),
        }
    }
}

/// 解码器从隐写图像中恢复出的记录。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedRecord {
    pub magic: Vec<u8>,
    pub extension: Vec<u8>,
    pub payload: Vec<u8>,
}

impl DecodedRecord {
    /// 以字符串形式返回扩展名，仅接受 `.` 加字母数字的形式 (例如 `.txt`)。
    ///
    /// 扩展名来自不受信任的图像数据，用来拼接输出路径前必须经过这一检查。
    ///
    /// # Errors
    ///
    /// 扩展名不是合法的 UTF-8 或包含其他字符时返回 [`StegoError::InvalidExtension`]。
    pub fn extension_str(&self) -> Result<&str> {
        validate_extension(&self.extension, Stage::Extension)
    }
}

/// 检查扩展名是否为 `.` 后跟至少一个 ASCII 字母或数字。
///
/// `stage` 标明检查发生在哪个步骤，用于区分输入校验和解码结果校验。
pub fn validate_extension(extension: &[u8], stage: Stage) -> Result<&str> {
    let text = std::str::from_utf8(extension).map_err(|_| StegoError::InvalidExtension {
        stage,
        reason: format!("{extension:?} is not valid UTF-8"),
    })?;

    match text.strip_prefix('.') {
        Some(rest) if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()) => {
            Ok(text)
        }
        _ => Err(StegoError::InvalidExtension {
            stage,
            reason: format!("{text:?} is not a plain file suffix"),
        }),
    }
}
