//! # 流水线公共部分
//!
//! 编码器和解码器共享的状态机步骤名称，以及按步骤报告短读的载体读取器。

use std::fmt;
use std::io::{self, ErrorKind, Read, Write};

use crate::error::{Result, StegoError};

/// 编码/解码状态机中的各个步骤。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Open,
    CapacityCheck,
    HeaderCopy,
    HeaderSkip,
    Magic,
    Extension,
    Size,
    Payload,
    Passthrough,
}

impl Stage {
    /// 该步骤是否发生在读取任何载体字节之前。
    pub fn is_setup(&self) -> bool {
        matches!(self, Stage::Open | Stage::CapacityCheck)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Open => "input validation",
            Stage::CapacityCheck => "capacity check",
            Stage::HeaderCopy => "header copy",
            Stage::HeaderSkip => "header skip",
            Stage::Magic => "magic string",
            Stage::Extension => "file extension",
            Stage::Size => "payload size",
            Stage::Payload => "payload data",
            Stage::Passthrough => "passthrough copy",
        };
        f.write_str(name)
    }
}

/// 顺序读取载体字节，记录已消耗的字节数。
///
/// 读取不足时返回带有当前步骤的 [`StegoError::ShortRead`]，而不是普通的 `UnexpectedEof`。
pub struct CarrierReader<R> {
    inner: R,
    consumed: u64,
}

impl<R: Read> CarrierReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, consumed: 0 }
    }

    /// 到目前为止读取的载体字节数。
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// 填满 `buf`，流提前结束时返回 `ShortRead`。
    pub fn fill(&mut self, buf: &mut [u8], stage: Stage) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    self.consumed += filled as u64;
                    return Err(StegoError::ShortRead {
                        stage,
                        expected: buf.len(),
                        actual: filled,
                    });
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.consumed += filled as u64;
        Ok(())
    }

    /// 读取固定数量的载体字节。
    pub fn carriers<const N: usize>(&mut self, stage: Stage) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.fill(&mut buf, stage)?;
        Ok(buf)
    }

    /// 把剩余的全部载体字节原样写入 `dest`，返回复制的字节数。
    pub fn copy_remaining<W: Write + ?Sized>(&mut self, dest: &mut W) -> io::Result<u64> {
        let copied = io::copy(&mut self.inner, dest)?;
        self.consumed += copied;
        Ok(copied)
    }
}
