//! # 统一错误处理模块
//!
//! 定义 avify 的所有错误类型，使用 `thiserror` 派生。
//! 转换阶段的错误只会出现在 `ConversionResult` 的错误信息里，
//! 不会越过转换器边界向上传播。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// avify 统一错误类型
#[derive(Error, Debug)]
pub enum ConvertError {
    // ─────────────────────────────────────────────────────────────
    // 输入校验错误
    // ─────────────────────────────────────────────────────────────
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Unsupported format: {ext}")]
    UnsupportedFormat { ext: String },

    #[error("Output exists (use --overwrite): {path}")]
    OutputExists { path: String },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 编解码错误
    // ─────────────────────────────────────────────────────────────
    #[error("Decode failed: {source}")]
    Decode {
        #[source]
        source: image::ImageError,
    },

    #[error("Encode failed: {source}")]
    Encode {
        #[source]
        source: image::ImageError,
    },
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ConvertError>;
