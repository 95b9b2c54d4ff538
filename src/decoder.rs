//! # 流式解码器
//!
//! 按与编码器相同的顺序读取：跳过头部 → 魔数 → 扩展名 → 载荷长度 → 载荷。
//! 只向前读取，不回退，也不做推测性解析。

use std::io::{Read, Write};

use tracing::{debug, info, warn};

use crate::config::StegoConfig;
use crate::constants::BMP_HEADER_SIZE;
use crate::error::{Result, StegoError};
use crate::pipeline::{CarrierReader, Stage};
use crate::record::DecodedRecord;
use crate::steganography::{decode_byte_from_carriers, decode_u32_from_carriers};

/// 单次解码操作的流水线上下文。
pub struct StreamDecoder<R> {
    carrier: CarrierReader<R>,
    config: StegoConfig,
}

impl<R: Read> StreamDecoder<R> {
    pub fn new(stego: R, config: StegoConfig) -> Self {
        Self {
            carrier: CarrierReader::new(stego),
            config,
        }
    }

    /// 执行完整的解码流水线，返回恢复出的记录。
    ///
    /// # Errors
    ///
    /// * 流过短时返回 [`StegoError::ShortRead`]。
    /// * 启用校验且魔数不符时返回 [`StegoError::MagicMismatch`]，此时不再读取后续字段。
    /// * 声明的载荷长度超过配置上限时返回 [`StegoError::PayloadTooLarge`]。
    pub fn decode(mut self) -> Result<DecodedRecord> {
        info!("decoding started");

        self.skip_header()?;
        let magic = self.decode_magic()?;
        let extension = self.decode_field(Stage::Extension)?;
        let payload_len = self.decode_size()?;
        let payload = self.decode_bytes(Stage::Payload, payload_len)?;

        info!(
            extension = %String::from_utf8_lossy(&extension),
            payload_len,
            "decoding completed"
        );
        Ok(DecodedRecord {
            magic,
            extension,
            payload,
        })
    }

    /// 解码并把载荷原样写入 `output`。
    ///
    /// # Errors
    ///
    /// 与 [`StreamDecoder::decode`] 相同，另外写入失败时返回 [`StegoError::Io`]。
    pub fn decode_into<W: Write + ?Sized>(self, output: &mut W) -> Result<DecodedRecord> {
        let record = self.decode()?;
        output.write_all(&record.payload)?;
        output.flush()?;
        Ok(record)
    }

    fn skip_header(&mut self) -> Result<()> {
        let _header: [u8; BMP_HEADER_SIZE] = self.carrier.carriers(Stage::HeaderSkip)?;
        debug!(stage = %Stage::HeaderSkip, "completed");
        Ok(())
    }

    fn decode_magic(&mut self) -> Result<Vec<u8>> {
        let magic = self.decode_field(Stage::Magic)?;

        if self.config.verify_magic {
            if magic != self.config.magic {
                return Err(StegoError::MagicMismatch {
                    expected: self.config.magic.clone(),
                    actual: magic,
                });
            }
            debug!("magic string verified");
        } else if magic != self.config.magic {
            warn!(
                magic = %String::from_utf8_lossy(&magic),
                "magic string does not match, continuing without verification"
            );
        }
        Ok(magic)
    }

    fn decode_size(&mut self) -> Result<u32> {
        let len = self.decode_length(Stage::Size)?;
        let limit = self.config.payload_limit();
        if u64::from(len) > limit {
            return Err(StegoError::PayloadTooLarge {
                stage: Stage::Size,
                len: u64::from(len),
                limit,
            });
        }
        Ok(len)
    }

    /// 先读长度再读内容。
    fn decode_field(&mut self, stage: Stage) -> Result<Vec<u8>> {
        let len = self.decode_length(stage)?;
        self.decode_bytes(stage, len)
    }

    fn decode_length(&mut self, stage: Stage) -> Result<u32> {
        let len = decode_u32_from_carriers(self.carrier.carriers(stage)?);
        debug!(%stage, len, "length decoded");
        Ok(len)
    }

    // 长度来自不可信数据，按读取进度逐字节增长，不预先分配
    fn decode_bytes(&mut self, stage: Stage, len: u32) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        for _ in 0..len {
            bytes.push(decode_byte_from_carriers(self.carrier.carriers(stage)?));
        }
        debug!(%stage, bytes = bytes.len(), "data decoded");
        Ok(bytes)
    }
}

/// 从内存中的隐写图像解码。
///
/// # Errors
///
/// 与 [`StreamDecoder::decode`] 相同。
pub fn decode_from_slice(stego: &[u8], config: StegoConfig) -> Result<DecodedRecord> {
    StreamDecoder::new(stego, config).decode()
}
