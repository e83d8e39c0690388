//! # 批量处理模块
//!
//! 提供统一的文件批量处理能力。
//!
//! ## 功能
//! - 展开文件/目录混合输入为去重、有序的文件列表
//! - 有界并行转换与逐文件结果收集
//! - 进度反馈与统计汇总
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::FileCollector;
pub use runner::{BatchProcessor, BatchResult};
