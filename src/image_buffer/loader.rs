//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理字节与本地文件两种来源，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要的内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! 1. 文件：存在性 + metadata 体积限制 + 读取
//! 2. 签名探测：必须是图片类型
//! 3. 读取 header 尺寸，按像素上限快速拒绝
//! 4. 完整解码并转换为 RGB（丢弃 alpha 通道）

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use image::{GenericImageView, ImageReader, RgbImage};

use crate::config::PatternConfig;
use crate::error::PatternError;

/// 从本地路径读取原始字节。
pub(crate) fn read_file(path: &Path, config: &PatternConfig) -> Result<Vec<u8>, PatternError> {
    log::info!("📁 开始读取本地图片 - 路径: {}", path.display());

    if !path.exists() {
        return Err(PatternError::FileSystem(format!("文件不存在：{}", path.display())));
    }

    let metadata = std::fs::metadata(path)
        .map_err(|e| PatternError::FileSystem(format!("无法读取文件信息：{}", e)))?;

    if metadata.len() > config.max_file_size {
        return Err(PatternError::ResourceLimit(format!(
            "文件过大：{:.2} MB（限制：{:.2} MB）",
            metadata.len() as f64 / 1024.0 / 1024.0,
            config.max_file_size as f64 / 1024.0 / 1024.0
        )));
    }

    std::fs::read(path).map_err(|e| PatternError::FileSystem(format!("无法读取图片文件：{}", e)))
}

/// 将原始字节解码为 RGB 像素网格。
pub(crate) fn decode_rgb(bytes: &[u8], config: &PatternConfig) -> Result<RgbImage, PatternError> {
    let start = Instant::now();

    validate_image_signature(bytes)?;

    let (header_width, header_height) = inspect_dimensions(bytes)?;
    validate_pixel_limits(config, header_width, header_height)?;

    let decoded = image::load_from_memory(bytes)
        .map_err(|e| PatternError::Decode(format!("图片解码失败：{}", e)))?;

    let (width, height) = decoded.dimensions();
    if width == 0 || height == 0 {
        return Err(PatternError::Decode(format!("图片尺寸为空：{}x{}", width, height)));
    }
    validate_pixel_limits(config, width, height)?;

    let rgb = decoded.to_rgb8();

    log::info!(
        "✅ 图片解码成功 - 尺寸: {}x{} 耗时: {}ms",
        width,
        height,
        start.elapsed().as_millis()
    );

    Ok(rgb)
}

fn validate_image_signature(bytes: &[u8]) -> Result<(), PatternError> {
    if bytes.is_empty() {
        return Err(PatternError::Decode("图片内容为空".to_string()));
    }

    match infer::get(bytes) {
        Some(kind) if kind.matcher_type() != infer::MatcherType::Image => Err(PatternError::Decode(
            format!("文件签名不是图片类型：{}", kind.mime_type()),
        )),
        Some(_) => Ok(()),
        // infer 不认识 PNM/QOI 等格式，交给 image 自己的探测
        None => image::guess_format(bytes)
            .map(|_| ())
            .map_err(|_| PatternError::Decode("无法识别图片类型".to_string())),
    }
}

/// 仅通过图片头信息读取宽高，用于在完整解码前做像素限制检查。
fn inspect_dimensions(bytes: &[u8]) -> Result<(u32, u32), PatternError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| PatternError::Decode(format!("无法识别图片格式：{}", e)))?;

    reader
        .into_dimensions()
        .map_err(|e| PatternError::Decode(format!("无法读取图片尺寸：{}", e)))
}

fn validate_pixel_limits(config: &PatternConfig, width: u32, height: u32) -> Result<(), PatternError> {
    let pixels = (width as u64)
        .checked_mul(height as u64)
        .ok_or_else(|| PatternError::ResourceLimit("图片像素数溢出".to_string()))?;

    if pixels > config.max_decoded_pixels {
        return Err(PatternError::ResourceLimit(format!(
            "图片像素过大：{} 像素（限制：{} 像素）",
            pixels, config.max_decoded_pixels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_buffer::tests::create_png_bytes;

    #[test]
    fn decode_rgb_drops_alpha_and_keeps_size() {
        let png = create_png_bytes(7, 3);
        let rgb = decode_rgb(&png, &PatternConfig::default()).expect("decode should succeed");

        assert_eq!(rgb.dimensions(), (7, 3));
        assert_eq!(rgb.as_raw().len(), 7 * 3 * 3);
    }

    #[test]
    fn rejects_empty_payload() {
        let result = decode_rgb(&[], &PatternConfig::default());
        assert!(matches!(result, Err(PatternError::Decode(_))));
    }

    #[test]
    fn rejects_non_image_signature() {
        let result = decode_rgb(b"%PDF-1.7 definitely not a picture", &PatternConfig::default());
        assert!(matches!(result, Err(PatternError::Decode(_))));
    }

    #[test]
    fn decodes_formats_unknown_to_infer() {
        let source = RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8 * 90, y as u8 * 120, 7]));
        for format in [image::ImageFormat::Pnm, image::ImageFormat::Qoi] {
            let mut cursor = Cursor::new(Vec::new());
            image::DynamicImage::ImageRgb8(source.clone())
                .write_to(&mut cursor, format)
                .expect("encode");

            let rgb = decode_rgb(&cursor.into_inner(), &PatternConfig::default())
                .expect("decode should succeed");
            assert_eq!(rgb, source);
        }
    }

    #[test]
    fn rejects_unrecognised_bytes() {
        let result = decode_rgb(b"just some plain words", &PatternConfig::default());
        assert!(matches!(result, Err(PatternError::Decode(_))));
    }

    #[test]
    fn rejects_truncated_png() {
        let png = create_png_bytes(16, 16);
        let result = decode_rgb(&png[..40], &PatternConfig::default());
        assert!(matches!(result, Err(PatternError::Decode(_))));
    }

    #[test]
    fn rejects_too_many_pixels_before_decode() {
        let config = PatternConfig {
            max_decoded_pixels: 100,
            ..PatternConfig::default()
        };
        let png = create_png_bytes(20, 20);

        let result = decode_rgb(&png, &config);
        assert!(matches!(result, Err(PatternError::ResourceLimit(_))));
    }

    #[test]
    fn read_file_reports_missing_path() {
        let path = std::env::temp_dir().join("pleximo-definitely-missing.png");
        let result = read_file(&path, &PatternConfig::default());
        assert!(matches!(result, Err(PatternError::FileSystem(_))));
    }
}
