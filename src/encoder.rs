//! # 流式编码器
//!
//! 按固定顺序把记录嵌入载体：
//! 容量检查 → 复制头部 → 魔数 → 扩展名 → 载荷长度 → 载荷 → 复制剩余字节。
//! 任一步骤失败都会立即中止整个流水线。

use std::io::{Read, Write};

use tracing::{debug, info};

use crate::capacity::{CapacityReport, check_capacity};
use crate::config::StegoConfig;
use crate::constants::BMP_HEADER_SIZE;
use crate::error::{Result, StegoError};
use crate::pipeline::{CarrierReader, Stage};
use crate::record::EmbeddedRecord;
use crate::steganography::{encode_byte_to_carriers, encode_u32_to_carriers};

/// 一次成功编码的统计信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeSummary {
    pub capacity: CapacityReport,
    /// 被修改过最低位的载体字节数 (不含头部)。
    pub embedded: u64,
    /// 原样复制的剩余载体字节数。
    pub passthrough: u64,
}

/// 单次编码操作的流水线上下文，独占载体读取端和隐写图像写入端。
pub struct StreamEncoder<R, W> {
    carrier: CarrierReader<R>,
    stego: W,
    carrier_len: u64,
    config: StegoConfig,
}

impl<R: Read, W: Write> StreamEncoder<R, W> {
    /// `carrier_len` 是载体图像的总字节数，容量检查以它为准。
    pub fn new(carrier: R, carrier_len: u64, stego: W, config: StegoConfig) -> Self {
        Self {
            carrier: CarrierReader::new(carrier),
            stego,
            carrier_len,
            config,
        }
    }

    /// 执行完整的编码流水线，成功后返回写入端和统计信息。
    ///
    /// # Errors
    ///
    /// * 容量不足或字段过长时返回错误，此时尚未读写任何字节。
    /// * 载体在中途耗尽时返回 [`StegoError::ShortRead`]，写入端的内容不完整，调用方应丢弃。
    /// * 写入失败时返回 [`StegoError::Io`]。
    pub fn encode(mut self, record: &EmbeddedRecord) -> Result<(W, EncodeSummary)> {
        info!("encoding started");

        let capacity = self.check_capacity(record)?;
        self.copy_header()?;
        self.encode_field(Stage::Magic, &record.magic)?;
        self.encode_field(Stage::Extension, &record.extension)?;
        self.encode_length(Stage::Size, field_len(&record.payload, Stage::Size)?)?;
        self.encode_bytes(Stage::Payload, &record.payload)?;

        let embedded = self.carrier.consumed() - BMP_HEADER_SIZE as u64;
        let passthrough = self.copy_remaining()?;
        self.stego.flush()?;

        info!(embedded, passthrough, "encoding completed");
        Ok((
            self.stego,
            EncodeSummary {
                capacity,
                embedded,
                passthrough,
            },
        ))
    }

    fn check_capacity(&self, record: &EmbeddedRecord) -> Result<CapacityReport> {
        debug!(stage = %Stage::CapacityCheck, "started");

        field_len(&record.magic, Stage::CapacityCheck)?;
        field_len(&record.extension, Stage::CapacityCheck)?;
        let payload_len = record.payload.len() as u64;
        let limit = self.config.payload_limit();
        if payload_len > limit {
            return Err(StegoError::PayloadTooLarge {
                stage: Stage::CapacityCheck,
                len: payload_len,
                limit,
            });
        }

        let report = check_capacity(
            self.carrier_len,
            record.magic.len() as u64,
            record.extension.len() as u64,
            payload_len,
        )?;
        debug!(
            required = report.required,
            available = report.available,
            "capacity check passed"
        );
        Ok(report)
    }

    fn copy_header(&mut self) -> Result<()> {
        let header: [u8; BMP_HEADER_SIZE] = self.carrier.carriers(Stage::HeaderCopy)?;
        self.stego.write_all(&header)?;
        debug!(stage = %Stage::HeaderCopy, "completed");
        Ok(())
    }

    /// 先写长度再写内容。
    fn encode_field(&mut self, stage: Stage, bytes: &[u8]) -> Result<()> {
        self.encode_length(stage, field_len(bytes, stage)?)?;
        self.encode_bytes(stage, bytes)
    }

    fn encode_length(&mut self, stage: Stage, len: u32) -> Result<()> {
        let carriers = self.carrier.carriers(stage)?;
        self.stego.write_all(&encode_u32_to_carriers(len, carriers))?;
        debug!(%stage, len, "length encoded");
        Ok(())
    }

    fn encode_bytes(&mut self, stage: Stage, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            let carriers = self.carrier.carriers(stage)?;
            self.stego.write_all(&encode_byte_to_carriers(byte, carriers))?;
        }
        debug!(%stage, bytes = bytes.len(), "data encoded");
        Ok(())
    }

    fn copy_remaining(&mut self) -> Result<u64> {
        let copied = self.carrier.copy_remaining(&mut self.stego)?;
        debug!(stage = %Stage::Passthrough, copied, "completed");
        Ok(copied)
    }
}

fn field_len(bytes: &[u8], stage: Stage) -> Result<u32> {
    u32::try_from(bytes.len()).map_err(|_| StegoError::PayloadTooLarge {
        stage,
        len: bytes.len() as u64,
        limit: u64::from(u32::MAX),
    })
}

/// 在内存中完成编码，返回完整的隐写图像。
///
/// # Errors
///
/// 与 [`StreamEncoder::encode`] 相同。
pub fn encode_to_vec(
    carrier: &[u8],
    record: &EmbeddedRecord,
    config: StegoConfig,
) -> Result<(Vec<u8>, EncodeSummary)> {
    let stego = Vec::with_capacity(carrier.len());
    StreamEncoder::new(carrier, carrier.len() as u64, stego, config).encode(record)
}
