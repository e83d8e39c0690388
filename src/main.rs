//! # Avify - PNG/JPEG 批量转 AVIF 工具
//!
//! 将零散的图片转换脚本用 Rust 重构，统一成单一可执行文件。
//! 支持单文件与目录混合输入、有界并行转换、逐文件错误隔离，
//! 以及最终的成功/失败汇总报告。
//!
//! ## 退出码
//! - `0` - 全部转换成功
//! - `1` - 未找到可转换文件，或全部转换失败
//! - `2` - 部分成功、部分失败
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli.rs      (命令行参数定义)
//!   ├── formats.rs  (支持格式与输出路径推导)
//!   ├── converter.rs(单文件转换器)
//!   ├── batch/      (文件收集 + 并行批处理)
//!   ├── utils/      (日志与进度条)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod converter;
mod error;
mod formats;
mod utils;

use batch::{BatchProcessor, BatchResult, FileCollector};
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use converter::{ImageConverter, Quality};
use utils::logger::Reporter;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    std::process::exit(run(cli));
}

/// 执行主流程，返回进程退出码
fn run(cli: Cli) -> i32 {
    let reporter = match Reporter::new(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{} Failed to open log file: {}", "[ERR]".red().bold(), e);
            return 1;
        }
    };

    reporter.info(&format!("avify v{}", env!("CARGO_PKG_VERSION")));

    let quality = Quality::new(cli.quality, &reporter);
    if cli.parallel == 0 {
        reporter.warn("Worker count must be at least 1, using 1");
    }

    let converter = ImageConverter::new(quality);
    let processor = BatchProcessor::new(converter, cli.parallel);
    reporter.info(&format!(
        "Quality: {} | Workers: {}",
        quality.value(),
        processor.workers()
    ));

    // 收集输入文件
    let files = FileCollector::new(cli.input)
        .recursive(!cli.no_recursive)
        .collect(&reporter);

    if files.is_empty() {
        reporter.error("No supported image files found.");
        reporter.info(&format!(
            "Supported formats: {}",
            formats::supported_extensions_display()
        ));
        return 1;
    }

    reporter.info(&format!("Found {} image(s) to convert", files.len()));

    let result = processor.process(&files, cli.output.as_deref(), cli.overwrite, &reporter);

    print_summary(&result, &reporter);

    if result.failed > 0 && result.successful == 0 {
        1
    } else if result.failed > 0 {
        2
    } else {
        0
    }
}

/// 打印批处理汇总报告
fn print_summary(result: &BatchResult, reporter: &Reporter) {
    reporter.header("Conversion Summary");
    reporter.plain(&format!("  Total files:    {}", result.total));
    reporter.plain(&format!("  Successful:     {}", result.successful));
    reporter.plain(&format!("  Failed:         {}", result.failed));
    reporter.plain(&format!("  Success rate:   {:.1}%", result.success_rate()));
    reporter.separator();

    if result.failed > 0 {
        reporter.warn("Failed conversions:");
        for conv in result.results.iter().filter(|r| !r.success) {
            reporter.warn(&format!(
                "  - {}: {}",
                conv.filename(),
                conv.error_message.as_deref().unwrap_or("unknown error")
            ));
        }
    }
}
