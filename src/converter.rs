//! # 单文件转换器
//!
//! 校验单个输入文件，决定是否跳过（不存在、格式不支持、
//! 输出已存在且未允许覆盖），调用编解码库转码，并返回结构化的
//! 逐文件结果。所有失败都收敛进 `ConversionResult`，
//! 不会越过本模块边界向上传播。
//!
//! ## 转码细节
//! - 先完整解码再创建输出文件，损坏的输入不会留下半截输出
//! - 源图带 alpha（含调色板透明，解码器已展开）时输出 RGBA，
//!   否则输出不透明的 RGB 三通道
//! - 尽力保留 ICC 色彩配置；编码器不支持时忽略
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 使用 `formats.rs` 推导输出路径
//! - 使用 `image` crate 解码 PNG/JPEG、编码 AVIF

use crate::error::{ConvertError, Result};
use crate::formats;
use crate::utils::logger::Reporter;

use image::codecs::avif::AvifEncoder;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageReader};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// 默认 AVIF 质量
pub const DEFAULT_QUALITY: i32 = 80;

/// rav1e 编码速度档位 (1-10，越大越快、压缩率越低)
const ENCODE_SPEED: u8 = 4;

/// AVIF 压缩质量，构造时收敛到 [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u8);

impl Quality {
    pub const MIN: i32 = 0;
    pub const MAX: i32 = 100;

    /// 构造质量值；越界时收敛并给出警告
    pub fn new(value: i32, reporter: &Reporter) -> Self {
        if value < Self::MIN {
            reporter.warn(&format!(
                "Quality {} below minimum, using {}",
                value,
                Self::MIN
            ));
            return Self(Self::MIN as u8);
        }
        if value > Self::MAX {
            reporter.warn(&format!(
                "Quality {} above maximum, using {}",
                value,
                Self::MAX
            ));
            return Self(Self::MAX as u8);
        }
        Self(value as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

/// 单次转换的结构化结果
#[derive(Debug, Clone)]
pub struct ConversionResult {
    /// 输入文件路径
    pub input_path: PathBuf,
    /// 输出文件路径；转换未开始时为 None
    pub output_path: Option<PathBuf>,
    /// 是否成功
    pub success: bool,
    /// 失败原因
    pub error_message: Option<String>,
}

impl ConversionResult {
    /// 成功结果
    pub fn ok(input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            input_path,
            output_path: Some(output_path),
            success: true,
            error_message: None,
        }
    }

    /// 失败结果
    pub fn fail(
        input_path: PathBuf,
        output_path: Option<PathBuf>,
        error: impl ToString,
    ) -> Self {
        Self {
            input_path,
            output_path,
            success: false,
            error_message: Some(error.to_string()),
        }
    }

    /// 输入文件名（用于进度与汇总显示）
    pub fn filename(&self) -> String {
        self.input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.input_path.display().to_string())
    }
}

/// PNG/JPEG → AVIF 转换器
pub struct ImageConverter {
    quality: Quality,
}

impl ImageConverter {
    pub fn new(quality: Quality) -> Self {
        Self { quality }
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// 转换单个文件。决策顺序：不存在 → 格式不支持 →
    /// 输出已存在且未覆盖 → 创建输出目录 → 转码。
    /// 任何失败都转化为失败结果返回，不向外抛出。
    pub fn convert(
        &self,
        input: &Path,
        output_dir: Option<&Path>,
        overwrite: bool,
    ) -> ConversionResult {
        if !input.exists() {
            return ConversionResult::fail(
                input.to_path_buf(),
                None,
                ConvertError::FileNotFound {
                    path: input.display().to_string(),
                },
            );
        }

        if !formats::is_supported(input) {
            let ext = input
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();
            return ConversionResult::fail(
                input.to_path_buf(),
                None,
                ConvertError::UnsupportedFormat { ext },
            );
        }

        let output = formats::output_path(input, output_dir);

        // 输出已存在且未允许覆盖：保留输出路径用于报告，不做任何写入
        if output.exists() && !overwrite {
            return ConversionResult::fail(
                input.to_path_buf(),
                Some(output.clone()),
                ConvertError::OutputExists {
                    path: output.display().to_string(),
                },
            );
        }

        // 幂等创建输出目录；并发任务同时创建同一目录是合法的
        if let Some(dir) = output_dir {
            if let Err(e) = fs::create_dir_all(dir) {
                return ConversionResult::fail(
                    input.to_path_buf(),
                    Some(output),
                    ConvertError::CreateDir {
                        path: dir.display().to_string(),
                        source: e,
                    },
                );
            }
        }

        match self.transcode(input, &output) {
            Ok(()) => ConversionResult::ok(input.to_path_buf(), output),
            Err(e) => ConversionResult::fail(input.to_path_buf(), Some(output), e),
        }
    }

    /// 实际的解码/编码流程
    fn transcode(&self, input: &Path, output: &Path) -> Result<()> {
        let reader = ImageReader::open(input)
            .map_err(|e| ConvertError::Decode {
                source: image::ImageError::IoError(e),
            })?
            .with_guessed_format()
            .map_err(|e| ConvertError::Decode {
                source: image::ImageError::IoError(e),
            })?;

        let mut decoder = reader
            .into_decoder()
            .map_err(|e| ConvertError::Decode { source: e })?;

        // 解码前读取 ICC 配置，之后 decoder 被消费
        let icc_profile = decoder.icc_profile().ok().flatten();
        let has_alpha = decoder.color_type().has_alpha();

        let img = DynamicImage::from_decoder(decoder)
            .map_err(|e| ConvertError::Decode { source: e })?;

        let file = File::create(output).map_err(|e| ConvertError::FileWrite {
            path: output.display().to_string(),
            source: e,
        })?;
        let writer = BufWriter::new(file);

        let mut encoder =
            AvifEncoder::new_with_speed_quality(writer, ENCODE_SPEED, self.quality.value());
        if let Some(profile) = icc_profile {
            // 编码器不支持嵌入 ICC 时忽略，不视为失败
            let _ = encoder.set_icc_profile(profile);
        }

        if has_alpha {
            let rgba = img.to_rgba8();
            encoder
                .write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    ExtendedColorType::Rgba8,
                )
                .map_err(|e| ConvertError::Encode { source: e })?;
        } else {
            let rgb = img.to_rgb8();
            encoder
                .write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )
                .map_err(|e| ConvertError::Encode { source: e })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::fs;

    fn test_reporter() -> Reporter {
        Reporter::new(false, true, None).unwrap()
    }

    fn write_test_png(path: &Path, alpha: bool) {
        if alpha {
            let img = RgbaImage::from_pixel(10, 10, Rgba([120, 50, 200, 128]));
            img.save(path).unwrap();
        } else {
            let img = RgbImage::from_pixel(10, 10, Rgb([120, 50, 200]));
            img.save(path).unwrap();
        }
    }

    #[test]
    fn test_quality_clamps_high() {
        let reporter = test_reporter();
        assert_eq!(Quality::new(150, &reporter), Quality::new(100, &reporter));
        assert_eq!(Quality::new(150, &reporter).value(), 100);
    }

    #[test]
    fn test_quality_clamps_low() {
        let reporter = test_reporter();
        assert_eq!(Quality::new(-5, &reporter), Quality::new(0, &reporter));
        assert_eq!(Quality::new(-5, &reporter).value(), 0);
    }

    #[test]
    fn test_quality_in_range_unchanged() {
        let reporter = test_reporter();
        assert_eq!(Quality::new(80, &reporter).value(), 80);
    }

    #[test]
    fn test_convert_missing_file() {
        let reporter = test_reporter();
        let conv = ImageConverter::new(Quality::new(80, &reporter));
        let result = conv.convert(Path::new("/no/such/photo.png"), None, false);
        assert!(!result.success);
        assert!(result.output_path.is_none());
        assert!(result.error_message.unwrap().contains("File not found"));
    }

    #[test]
    fn test_convert_unsupported_format() {
        let reporter = test_reporter();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("image.bmp");
        fs::write(&input, b"not an image").unwrap();

        let conv = ImageConverter::new(Quality::new(80, &reporter));
        let result = conv.convert(&input, None, false);
        assert!(!result.success);
        assert!(result.output_path.is_none());
        assert!(result
            .error_message
            .unwrap()
            .contains("Unsupported format: .bmp"));
    }

    #[test]
    fn test_convert_output_exists_without_overwrite() {
        let reporter = test_reporter();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        write_test_png(&input, false);
        let existing = dir.path().join("photo.avif");
        fs::write(&existing, b"placeholder").unwrap();

        let conv = ImageConverter::new(Quality::new(80, &reporter));
        let result = conv.convert(&input, None, false);
        assert!(!result.success);
        assert_eq!(result.output_path.as_deref(), Some(existing.as_path()));
        assert!(result.error_message.unwrap().contains("--overwrite"));
        // 原占位内容未被触碰
        assert_eq!(fs::read(&existing).unwrap(), b"placeholder");
    }

    #[test]
    fn test_convert_rgba_png_alongside_input() {
        let reporter = test_reporter();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        write_test_png(&input, true);

        let conv = ImageConverter::new(Quality::new(80, &reporter));
        let result = conv.convert(&input, None, false);
        assert!(result.success, "{:?}", result.error_message);

        let output = dir.path().join("photo.avif");
        assert_eq!(result.output_path.as_deref(), Some(output.as_path()));
        assert!(output.exists());
        assert!(fs::metadata(&output).unwrap().len() > 0);
        // 输入原样保留
        assert!(input.exists());
    }

    #[test]
    fn test_convert_creates_output_dir() {
        let reporter = test_reporter();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.jpg");
        let img = RgbImage::from_pixel(8, 6, Rgb([10, 20, 30]));
        img.save(&input).unwrap();

        let out_dir = dir.path().join("converted").join("nested");
        let conv = ImageConverter::new(Quality::new(60, &reporter));
        let result = conv.convert(&input, Some(&out_dir), false);
        assert!(result.success, "{:?}", result.error_message);
        assert!(out_dir.join("photo.avif").exists());
    }

    #[test]
    fn test_convert_overwrite_is_idempotent() {
        let reporter = test_reporter();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        write_test_png(&input, false);

        let conv = ImageConverter::new(Quality::new(80, &reporter));
        let first = conv.convert(&input, None, true);
        assert!(first.success);
        let second = conv.convert(&input, None, true);
        assert!(second.success);

        // 未允许覆盖时第二次必然失败
        let third = conv.convert(&input, None, false);
        assert!(!third.success);
    }

    #[test]
    fn test_convert_corrupt_input() {
        let reporter = test_reporter();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.png");
        fs::write(&input, b"\x89PNG\r\n\x1a\ngarbage").unwrap();

        let conv = ImageConverter::new(Quality::new(80, &reporter));
        let result = conv.convert(&input, None, true);
        assert!(!result.success);
        assert!(result.error_message.is_some());
        // 先解码后写出，损坏输入不留半截输出
        assert!(!dir.path().join("broken.avif").exists());
    }
}
