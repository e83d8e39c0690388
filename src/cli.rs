//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。avify 是单用途工具，无子命令。
//!
//! ## 参数组
//! - 输入: 位置参数（文件或目录，至少一个）
//! - 输出: `-o/--output`, `--overwrite`
//! - 质量: `-q/--quality`
//! - 处理: `-p/--parallel`, `--no-recursive`
//! - 日志: `-v/--verbose`, `--log-file`, `--quiet`
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用

use crate::batch::BatchProcessor;
use crate::converter::DEFAULT_QUALITY;
use clap::Parser;
use std::path::PathBuf;

/// Avify - 批量 PNG/JPEG 转 AVIF 工具
#[derive(Parser, Debug)]
#[command(name = "avify")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Convert PNG and JPEG images to AVIF format", long_about = None)]
#[command(after_help = "\
Examples:
  avify photo.png                    # Convert single file
  avify photos/                      # Convert all images in folder
  avify a.jpg b.jpg -o converted/ -q 90
  avify images/ -p 8 --overwrite     # Parallel conversion")]
pub struct Cli {
    /// Input image file(s) or directory/directories to convert
    #[arg(required = true, value_name = "INPUT")]
    pub input: Vec<PathBuf>,

    /// Output directory for converted files (default: alongside each input)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Overwrite existing output files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// AVIF quality (0-100). Higher = better quality, larger file
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_QUALITY,
        value_name = "N",
        allow_negative_numbers = true
    )]
    pub quality: i32,

    /// Number of parallel workers
    #[arg(short, long, default_value_t = BatchProcessor::DEFAULT_WORKERS, value_name = "N")]
    pub parallel: usize,

    /// Don't search directories recursively
    #[arg(long, default_value_t = false)]
    pub no_recursive: bool,

    /// Enable verbose (debug) output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Suppress per-file progress lines (summary always prints)
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}
