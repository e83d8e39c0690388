//! # 批量执行器
//!
//! 在有界 worker 池上并行执行单文件转换，按完成顺序收集逐文件
//! 结果并汇总统计。调用方同步阻塞直至所有任务结束。
//!
//! ## 功能
//! - 基于 rayon 的有界并行（worker 数最小 1，默认 4）
//! - 共享的结果集合与计数器由互斥锁串行化
//! - 任务内意外 panic 被捕获并转为失败结果，不中断批次
//! - 逐文件进度行 `[i/N] ✓|✗ 文件名[ - 错误]`，i 为完成计数
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `converter.rs` 执行单文件转换
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::converter::{ConversionResult, ImageConverter};
use crate::utils::logger::Reporter;
use crate::utils::progress;

use indicatif::ProgressBar;
use rayon::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 批次内文件总数
    pub total: usize,
    /// 成功数量
    pub successful: usize,
    /// 失败数量
    pub failed: usize,
    /// 逐文件结果（完成顺序）
    pub results: Vec<ConversionResult>,
}

impl BatchResult {
    fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    /// 记录一个完成的任务，返回当前完成总数（1 起始）
    fn record(&mut self, result: ConversionResult) -> usize {
        if result.success {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
        self.successful + self.failed
    }

    /// 成功率（百分比），空批次为 0
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.successful as f64 / self.total as f64 * 100.0
    }
}

/// 批量执行器
pub struct BatchProcessor {
    converter: ImageConverter,
    /// 并行 worker 数
    workers: usize,
}

impl BatchProcessor {
    /// 默认 worker 数
    pub const DEFAULT_WORKERS: usize = 4;

    /// 创建新的批量执行器；worker 数最小收敛到 1
    pub fn new(converter: ImageConverter, workers: usize) -> Self {
        Self {
            converter,
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// 并行处理文件列表，阻塞直至所有任务完成
    pub fn process(
        &self,
        files: &[PathBuf],
        output_dir: Option<&Path>,
        overwrite: bool,
        reporter: &Reporter,
    ) -> BatchResult {
        if files.is_empty() {
            reporter.warn("No files to process");
            return BatchResult::new(0);
        }

        let total = files.len();
        reporter.info(&format!(
            "Processing {} file(s) with {} worker(s)",
            total, self.workers
        ));

        let pb = if reporter.progress_enabled() {
            progress::create_progress_bar(total as u64, "Converting")
        } else {
            ProgressBar::hidden()
        };

        let shared = Mutex::new(BatchResult::new(total));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .unwrap();

        pool.install(|| {
            files.par_iter().for_each(|file| {
                // 转换器自身不向外抛错；这里兜底捕获任务级 panic
                let result = match panic::catch_unwind(AssertUnwindSafe(|| {
                    self.converter.convert(file, output_dir, overwrite)
                })) {
                    Ok(res) => res,
                    Err(cause) => {
                        ConversionResult::fail(file.clone(), None, panic_message(&cause))
                    }
                };

                if result.success {
                    reporter.debug(&format!(
                        "Converted {} -> {} (quality={})",
                        file.display(),
                        result
                            .output_path
                            .as_deref()
                            .unwrap_or_else(|| Path::new("?"))
                            .display(),
                        self.converter.quality().value()
                    ));
                }

                let mut line = format!(
                    "{} {}",
                    if result.success { "✓" } else { "✗" },
                    result.filename()
                );
                if let Some(msg) = &result.error_message {
                    line.push_str(&format!(" - {}", msg));
                }

                // 计数与进度行在锁内完成，保证 [i/N] 单调
                {
                    let mut batch = shared.lock().unwrap();
                    let success = result.success;
                    let done = batch.record(result);
                    reporter.progress(&pb, &format!("[{}/{}] {}", done, total, line), success);
                }
                pb.inc(1);
            });
        });

        pb.finish_and_clear();

        shared.into_inner().unwrap()
    }
}

/// 提取 panic 载荷中的消息
fn panic_message(cause: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = cause.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = cause.downcast_ref::<String>() {
        msg.clone()
    } else {
        "conversion task panicked".to_string()
    }
}
