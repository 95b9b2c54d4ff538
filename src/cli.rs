//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::StegoConfig;
use crate::constants::MAGIC_STRING;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在未压缩的 BMP 图像中隐藏或恢复任意文件。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于在未压缩的 BMP 图像中隐藏或恢复任意文件。"
)]
pub struct Cli {
    /// 输出更详细的日志 (-v 显示每个步骤，-vv 显示字段细节)。
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：encode (隐藏)、decode (恢复) 和 capacity (容量查询)。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 把文件隐藏到 BMP 图像中。
    Encode(EncodeArgs),

    /// 从经过隐写的 BMP 图像中恢复隐藏的文件。
    Decode(DecodeArgs),

    /// 显示 BMP 图像最多能隐藏多少字节。
    Capacity(CapacityArgs),
}

/// 编码端和解码端共用的选项。
#[derive(Args, Debug, Clone)]
pub struct CodecOptions {
    /// 标识隐写图像的魔数字符串，编码和解码时必须一致。
    #[arg(long, default_value = MAGIC_STRING)]
    pub magic: String,

    /// 载荷长度上限 (字节)。
    #[arg(long)]
    pub max_payload: Option<u32>,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            magic: MAGIC_STRING.to_string(),
            max_payload: None,
        }
    }
}

impl CodecOptions {
    pub fn config(&self, verify_magic: bool) -> StegoConfig {
        StegoConfig::default()
            .with_magic(self.magic.as_bytes())
            .with_verify_magic(verify_magic)
            .with_max_payload_len(self.max_payload)
    }
}

/// 'encode' 命令所需的参数。
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// 用作载体的 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文件路径，其扩展名会一并写入图像。
    #[arg(short, long)]
    pub secret: PathBuf,

    /// 隐写图像的输出路径，默认为载体所在目录下的 `output.bmp`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub codec: CodecOptions,
}

/// 'decode' 命令所需的参数。
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// 已隐藏数据的 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 恢复文件的输出路径，默认为图像所在目录下的 `secret_output` 加上恢复出的扩展名。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(short, long)]
    pub force: bool,

    /// 不校验魔数字符串，尽力解码任意图像。
    #[arg(long)]
    pub no_verify_magic: bool,

    #[command(flatten)]
    pub codec: CodecOptions,
}

/// 'capacity' 命令所需的参数。
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// 要查询的 BMP 图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 计划隐藏的文件扩展名。
    #[arg(short, long, default_value = ".txt")]
    pub extension: String,

    #[command(flatten)]
    pub codec: CodecOptions,
}
