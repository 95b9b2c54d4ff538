//! # 命令处理逻辑模块
//!
//! 包含处理 `encode`、`decode` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责文件 I/O、输入校验、默认路径，以及向用户报告结果。
//! 图像和秘密文件被完整读入内存，目标文件只在整个流水线成功后才写入，
//! 因此失败的操作不会留下不完整的输出文件。

use crate::capacity::max_payload_len;
use crate::cli::{CapacityArgs, DecodeArgs, EncodeArgs};
use crate::constants::{CARRIER_EXTENSION, DEFAULT_SECRET_FILE_STEM, DEFAULT_STEGO_FILE_NAME};
use crate::decoder::decode_from_slice;
use crate::encoder::encode_to_vec;
use crate::error::StegoError;
use crate::pipeline::Stage;
use crate::record::validate_extension;
use anyhow::{Context, Result};
use colored::Colorize;
use image::ImageFormat;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// 处理 'Encode' 命令的执行逻辑。
///
/// 校验输入路径，读取载体图像和秘密文件，把记录嵌入图像，
/// 最后将结果写入目标图像文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 载体不是 `.bmp` 图像，或秘密文件没有扩展名。
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入文件或写入目标文件。
/// * 图像没有足够的空间来隐藏文件。
pub fn handle_encode(args: EncodeArgs) -> Result<()> {
    ensure_bmp_path(&args.image)?;
    let extension = secret_extension(&args.secret)?;

    let dest = args.dest.unwrap_or_else(|| default_stego_path(&args.image));
    ensure_writable(&dest, args.force)?;

    let carrier = read_input(&args.image, "image")?;
    ensure_bmp_data(&carrier, &args.image)?;
    let secret = read_input(&args.secret, "secret")?;

    let config = args.codec.config(true);
    let record = config.record(extension.as_bytes(), secret);

    let (stego, summary) = match encode_to_vec(&carrier, &record, config) {
        Ok(encoded) => encoded,
        Err(StegoError::InsufficientCapacity {
            required,
            available,
        }) => anyhow::bail!(
            "Not enough space in the image to hide the secret file. \nRequired: more than {}, Available: {}",
            required.to_string().red().bold(),
            available.to_string().green().bold()
        ),
        Err(e) => {
            return Err(e).with_context(|| {
                format!(
                    "Failed to hide {} in {}.",
                    args.secret.to_string_lossy().red().bold(),
                    args.image.to_string_lossy().red().bold()
                )
            });
        }
    };

    fs::write(&dest, stego).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    info!(
        embedded = summary.embedded,
        passthrough = summary.passthrough,
        "stego image written"
    );
    println!(
        "The file has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Decode' 命令的执行逻辑。
///
/// 读取经过隐写的图像，恢复记录，校验扩展名，再将载荷写入输出文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入图像，或它不是 BMP 图像。
/// * 图像中没有有效的记录 (魔数不符、数据截断)。
/// * 未指定输出路径，且恢复出的扩展名不能用于构造文件名。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_decode(args: DecodeArgs) -> Result<()> {
    ensure_bmp_path(&args.image)?;
    let stego = read_input(&args.image, "image")?;
    ensure_bmp_data(&stego, &args.image)?;

    let config = args.codec.config(!args.no_verify_magic);
    let record = decode_from_slice(&stego, config).with_context(|| {
        format!(
            "Failed to recover the hidden file from '{}'. \nThe image may not contain a hidden file or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    // 扩展名只用于拼接默认路径
    let output = match args.output {
        Some(output) => output,
        None => default_secret_path(&args.image, record.extension_str()?),
    };
    ensure_writable(&output, args.force)?;

    fs::write(&output, &record.payload).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            output.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The hidden file ({} bytes) has been successfully recovered and saved: {}",
        record.payload.len().to_string().green(),
        output.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑：报告图像最多能隐藏的字节数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    ensure_bmp_path(&args.image)?;
    let carrier = read_input(&args.image, "image")?;
    ensure_bmp_data(&carrier, &args.image)?;

    match max_payload_len(
        carrier.len() as u64,
        args.codec.magic.len() as u64,
        args.extension.len() as u64,
    ) {
        Some(max) => println!(
            "{} can hide up to {} bytes of a {} file.",
            args.image.to_string_lossy().green().bold(),
            max.to_string().green().bold(),
            args.extension
        ),
        None => println!(
            "{} is too small to hide anything.",
            args.image.to_string_lossy().red().bold()
        ),
    }
    Ok(())
}

/// 隐写图像的默认路径：载体所在目录下的 `output.bmp`。
pub fn default_stego_path(image: &Path) -> PathBuf {
    image.with_file_name(DEFAULT_STEGO_FILE_NAME)
}

/// 恢复文件的默认路径：图像所在目录下的 `secret_output` 加上恢复出的扩展名。
pub fn default_secret_path(image: &Path, extension: &str) -> PathBuf {
    image.with_file_name(format!("{DEFAULT_SECRET_FILE_STEM}{extension}"))
}

/// 以 `.ext` 的形式返回秘密文件的扩展名。
fn secret_extension(path: &Path) -> Result<String, StegoError> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(|ext| format!(".{ext}"))
        .ok_or_else(|| StegoError::InvalidExtension {
            stage: Stage::Open,
            reason: format!("secret file {} has no extension", path.display()),
        })?;
    validate_extension(extension.as_bytes(), Stage::Open)?;
    Ok(extension)
}

fn ensure_bmp_path(path: &Path) -> Result<(), StegoError> {
    match ImageFormat::from_path(path) {
        Ok(ImageFormat::Bmp) => Ok(()),
        _ => Err(StegoError::InvalidExtension {
            stage: Stage::Open,
            reason: format!("{} must have a .{CARRIER_EXTENSION} extension", path.display()),
        }),
    }
}

fn ensure_bmp_data(data: &[u8], path: &Path) -> Result<()> {
    anyhow::ensure!(
        matches!(image::guess_format(data), Ok(ImageFormat::Bmp)),
        "{} is not a BMP image.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn read_input(path: &Path, kind: &str) -> Result<Vec<u8>> {
    fs::read(path)
        .map_err(|source| StegoError::Open {
            path: path.to_path_buf(),
            source,
        })
        .with_context(|| {
            format!(
                "Unable to read {} file: {}",
                kind,
                path.to_string_lossy().red().bold()
            )
        })
}
