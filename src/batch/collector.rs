//! # 文件收集器
//!
//! 将文件/目录混合的输入列表展开为去重、确定有序的待转换文件列表。
//!
//! ## 功能
//! - 单文件输入：扩展名受支持才纳入，否则警告后丢弃
//! - 目录输入：枚举直接子文件或整个子树（默认递归），
//!   不支持的文件同样警告后丢弃
//! - 不存在的路径：警告后丢弃
//! - 以规范化路径（解析符号链接的绝对路径）判定同一文件，
//!   保留首次出现；最终按路径排序保证可复现
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `formats.rs` 判定扩展名
//! - 使用 `walkdir` 遍历目录

use crate::formats;
use crate::utils::logger::Reporter;

use std::collections::HashSet;
use std::path::PathBuf;
use walkdir::WalkDir;

/// 文件收集器
pub struct FileCollector {
    /// 输入路径（文件或目录）
    inputs: Vec<PathBuf>,
    /// 是否递归进入子目录
    recursive: bool,
}

impl FileCollector {
    /// 创建新的文件收集器（默认递归）
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            recursive: true,
        }
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有受支持的文件，去重并排序
    pub fn collect(&self, reporter: &Reporter) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = Vec::new();

        for path in &self.inputs {
            if path.is_file() {
                if formats::is_supported(path) {
                    files.push(path.clone());
                } else {
                    reporter.warn(&format!("Skipping unsupported file: {}", path.display()));
                }
            } else if path.is_dir() {
                let max_depth = if self.recursive { usize::MAX } else { 1 };
                let walker = WalkDir::new(path)
                    .max_depth(max_depth)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file());

                for entry in walker {
                    if formats::is_supported(entry.path()) {
                        files.push(entry.into_path());
                    } else {
                        reporter.warn(&format!(
                            "Skipping unsupported file: {}",
                            entry.path().display()
                        ));
                    }
                }
            } else {
                reporter.warn(&format!("Path not found: {}", path.display()));
            }
        }

        // 规范化路径去重，保留首次出现
        let mut seen = HashSet::new();
        let mut unique: Vec<PathBuf> = Vec::new();
        for file in files {
            let key = file.canonicalize().unwrap_or_else(|_| file.clone());
            if seen.insert(key) {
                unique.push(file);
            }
        }

        unique.sort();
        unique
    }
}
