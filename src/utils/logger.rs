//! # 日志/报告上下文
//!
//! 显式构造的 `Reporter`，在启动时创建一次，按引用传入收集器、
//! 批处理器等组件。不使用进程级全局日志状态。
//!
//! ## 功能
//! - 彩色控制台输出（`[*]` / `[WARN]` / `[ERR]` / `[DBG]` 标签）
//! - 可选日志文件（纯文本 + 时间戳；调试级别始终写入文件）
//! - `--quiet` 只抑制逐文件进度行，汇总照常输出
//!
//! ## 依赖关系
//! - 被 `main.rs`, `converter.rs`, `batch/` 使用
//! - 使用 `colored`, `chrono`, `indicatif` crate

use colored::Colorize;
use indicatif::ProgressBar;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

/// 日志/报告上下文
pub struct Reporter {
    /// 是否在控制台输出调试信息
    verbose: bool,
    /// 是否抑制逐文件进度行
    quiet: bool,
    /// 可选的日志文件；多个 worker 会并发写入
    sink: Option<Mutex<File>>,
}

impl Reporter {
    /// 创建报告上下文；`log_file` 打开失败时返回错误
    pub fn new(verbose: bool, quiet: bool, log_file: Option<&Path>) -> io::Result<Self> {
        let sink = match log_file {
            Some(path) => Some(Mutex::new(File::create(path)?)),
            None => None,
        };
        Ok(Self {
            verbose,
            quiet,
            sink,
        })
    }

    /// 信息消息
    pub fn info(&self, msg: &str) {
        println!("{} {}", "[*]".blue().bold(), msg);
        self.append("INFO", msg);
    }

    /// 警告消息
    pub fn warn(&self, msg: &str) {
        println!("{} {}", "[WARN]".yellow().bold(), msg);
        self.append("WARN", msg);
    }

    /// 错误消息（输出到 stderr）
    pub fn error(&self, msg: &str) {
        eprintln!("{} {}", "[ERR]".red().bold(), msg);
        self.append("ERROR", msg);
    }

    /// 调试消息；仅 verbose 时上控制台，日志文件始终记录
    pub fn debug(&self, msg: &str) {
        if self.verbose {
            println!("{} {}", "[DBG]".dimmed(), msg);
        }
        self.append("DEBUG", msg);
    }

    /// 无标签纯文本行（用于汇总报告）
    pub fn plain(&self, msg: &str) {
        println!("{}", msg);
        self.append("INFO", msg);
    }

    /// 标题栏
    pub fn header(&self, title: &str) {
        let line = "─".repeat(50);
        println!("\n{}", line.dimmed());
        println!("  {}", title.bold());
        println!("{}", line.dimmed());
        self.append("INFO", title);
    }

    /// 分隔线
    pub fn separator(&self) {
        println!("{}", "─".repeat(50).dimmed());
    }

    /// 是否输出逐文件进度行
    pub fn progress_enabled(&self) -> bool {
        !self.quiet
    }

    /// 逐文件进度行。通过 `pb.suspend` 打印以免撕裂进度条；
    /// 成功为绿色、失败为黄色；日志文件始终记录
    pub fn progress(&self, pb: &ProgressBar, line: &str, success: bool) {
        if !self.quiet {
            pb.suspend(|| {
                if success {
                    println!("{}", line.green());
                } else {
                    println!("{}", line.yellow());
                }
            });
        }
        self.append(if success { "INFO" } else { "WARN" }, line);
    }

    /// 写入日志文件（若配置）。写入失败静默忽略
    fn append(&self, level: &str, msg: &str) {
        if let Some(sink) = &self.sink {
            if let Ok(mut file) = sink.lock() {
                let _ = writeln!(
                    file,
                    "{} | {:<8} | {}",
                    chrono::Local::now().format("%H:%M:%S"),
                    level,
                    msg
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// 测试用的静默上下文
    pub fn test_reporter() -> Reporter {
        Reporter::new(false, true, None).unwrap()
    }

    #[test]
    fn test_progress_enabled_follows_quiet() {
        let loud = Reporter::new(false, false, None).unwrap();
        assert!(loud.progress_enabled());
        let quiet = test_reporter();
        assert!(!quiet.progress_enabled());
    }

    #[test]
    fn test_log_file_receives_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("run.log");
        let reporter = Reporter::new(false, true, Some(&log_path)).unwrap();
        reporter.info("hello");
        reporter.debug("debug line goes to file even without verbose");
        let content = fs::read_to_string(&log_path).unwrap();
        assert!(content.contains("INFO"));
        assert!(content.contains("hello"));
        assert!(content.contains("DEBUG"));
    }

    #[test]
    fn test_log_file_open_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("missing").join("run.log");
        assert!(Reporter::new(false, false, Some(&bad)).is_err());
    }
}
