//! # 错误类型模块
//!
//! 库中的所有操作都返回 `StegoError`，不会 panic。
//! 命令行层再用 `anyhow` 为其附加上下文。

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::Stage;

/// 隐写流水线可能出现的全部错误。
#[derive(Debug, Error)]
pub enum StegoError {
    /// 无法打开、读取或创建某个文件。
    #[error("unable to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 载体图像容量不足，编码在写入任何字节之前被拒绝。
    #[error("not enough space in the carrier image: required more than {required} bytes, available {available}")]
    InsufficientCapacity { required: u64, available: u64 },

    /// 流在某个步骤中途耗尽。
    #[error("short read during {stage}: expected {expected} bytes, got {actual}")]
    ShortRead {
        stage: Stage,
        expected: usize,
        actual: usize,
    },

    /// 扩展名缺失或不可用于构造文件名。
    ///
    /// `stage` 为 [`Stage::Open`] 表示输入校验失败，为 [`Stage::Extension`] 表示图像中恢复出的扩展名不可用。
    #[error("invalid file extension during {stage}: {reason}")]
    InvalidExtension { stage: Stage, reason: String },

    /// 恢复出的魔数字符串与预期不符，图像很可能不是由本工具生成的。
    #[error("magic string mismatch: expected {expected:?}, got {actual:?}")]
    MagicMismatch { expected: Vec<u8>, actual: Vec<u8> },

    /// 字段长度超过配置的上限或 `u32` 长度字段所能表示的范围。
    #[error("payload of {len} bytes exceeds the limit of {limit} bytes during {stage}")]
    PayloadTooLarge { stage: Stage, len: u64, limit: u64 },

    /// 写入目标流失败。
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// 失败发生在流水线的哪个阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePhase {
    /// 还没有开始处理载体数据 (打开文件、容量检查、参数校验)。
    Setup,
    /// 已经开始读写载体数据，目标输出不完整，必须丢弃。
    MidStream,
}

impl StegoError {
    pub fn phase(&self) -> FailurePhase {
        match self {
            StegoError::Open { .. } | StegoError::InsufficientCapacity { .. } => FailurePhase::Setup,
            StegoError::InvalidExtension { stage, .. }
            | StegoError::PayloadTooLarge { stage, .. }
                if stage.is_setup() =>
            {
                FailurePhase::Setup
            }
            StegoError::InvalidExtension { .. }
            | StegoError::PayloadTooLarge { .. }
            | StegoError::ShortRead { .. }
            | StegoError::MagicMismatch { .. }
            | StegoError::Io(_) => FailurePhase::MidStream,
        }
    }
}

pub type Result<T, E = StegoError> = std::result::Result<T, E>;
