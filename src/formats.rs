//! # 格式注册表
//!
//! 定义支持的输入扩展名、固定的输出扩展名，以及输出路径推导。
//! 纯函数，无 I/O，无副作用。
//!
//! ## 依赖关系
//! - 被 `converter.rs`, `batch/collector.rs`, `main.rs` 使用

use std::path::{Path, PathBuf};

/// 支持的输入扩展名（小写，不含点号）
pub const SUPPORTED_INPUT_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// 输出扩展名（不含点号）
pub const OUTPUT_EXTENSION: &str = "avif";

/// 检查路径的扩展名是否为支持的输入格式（不区分大小写）
pub fn is_supported(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => {
            let lower = ext.to_ascii_lowercase();
            SUPPORTED_INPUT_EXTENSIONS.contains(&lower.as_str())
        }
        None => false,
    }
}

/// 推导输出路径：替换扩展名为 .avif
///
/// 给定 `output_dir` 时输出放入该目录（目录可以尚不存在），
/// 否则与输入文件同目录。
pub fn output_path(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    let converted = input.with_extension(OUTPUT_EXTENSION);
    match output_dir {
        Some(dir) => dir.join(converted.file_name().unwrap_or(converted.as_os_str())),
        None => converted,
    }
}

/// 以 ".png, .jpg, .jpeg" 形式列出支持的格式（用于提示信息）
pub fn supported_extensions_display() -> String {
    SUPPORTED_INPUT_EXTENSIONS
        .iter()
        .map(|e| format!(".{}", e))
        .collect::<Vec<_>>()
        .join(", ")
}
