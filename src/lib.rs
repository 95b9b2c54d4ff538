//! # lsb_stego 库
//!
//! 本库包含 BMP 图像 LSB 隐写工具的核心逻辑：
//! 位编解码、容量规划，以及流式的编码器和解码器。
//!
//! 隐藏记录紧跟在 54 字节的 BMP 头部之后，依次为魔数字符串、扩展名和载荷，
//! 每段内容前都有一个 `u32` 长度。每个载体字节只改动最低位。

pub mod capacity;
pub mod cli;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod handler;
pub mod pipeline;
pub mod record;
pub mod steganography;

pub use config::StegoConfig;
pub use decoder::{StreamDecoder, decode_from_slice};
pub use encoder::{EncodeSummary, StreamEncoder, encode_to_vec};
pub use error::{FailurePhase, StegoError};
pub use record::{DecodedRecord, EmbeddedRecord};
