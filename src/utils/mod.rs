//! # 工具模块
//!
//! ## 依赖关系
//! - 被 `main.rs`, `batch/` 模块使用
//! - 子模块: logger (显式日志上下文), progress (进度条样式)

pub mod logger;
pub mod progress;
