//! # 图像变换流水线
//!
//! ## 设计思路
//!
//! 给定源图与工作参数，确定性地产出最终像素阵列，没有任何副作用：
//!
//! 1. 缩放到目标宽高（滤镜由配置决定）
//! 2. 中位切分量化到不超过调色板大小的颜色数
//! 3. 应用边距（先补齐、后裁剪）
//!
//! 要么返回完整有效的像素阵列，要么直接失败，不存在“变换到一半”的结果。

mod margin;
mod quantize;
mod resize;

use std::time::Instant;

use image::RgbImage;

use crate::config::ResizeFilter;
use crate::error::PatternError;
use crate::image_buffer::{RasterImage, WorkingState};

/// 变换后的像素阵列（H×W×3）。
pub type PixelArray = RgbImage;

/// 按工作参数计算像素阵列。
///
/// # 示例
/// ```rust
/// use image::{Rgb, RgbImage};
/// use pleximo::{Margins, RasterImage, ResizeFilter, WorkingState, compute};
///
/// let raster = RasterImage::from_rgb(RgbImage::from_pixel(4, 4, Rgb([9, 9, 9])));
/// let state = WorkingState { width: 2, height: 3, palette_size: 1, margins: Margins::ZERO };
///
/// let pixels = compute(&raster, &state, ResizeFilter::Nearest)?;
/// assert_eq!(pixels.dimensions(), (2, 3));
/// # Ok::<(), pleximo::PatternError>(())
/// ```
pub fn compute(
    raster: &RasterImage,
    state: &WorkingState,
    filter: ResizeFilter,
) -> Result<PixelArray, PatternError> {
    let (width, height) = state.checked_dimensions()?;
    let palette_size = state.checked_palette_size()?;
    let start = Instant::now();

    let resized = resize::resize_rgb(raster.pixels(), width, height, filter);
    let quantized = quantize::quantize(&resized, palette_size);
    let pixels = margin::apply_margins(&quantized, state.margins, width, height)?;

    log::debug!(
        "🧩 变换完成：{}x{} -> {}x{}（filter={}, palette={}）耗时 {}ms",
        raster.original_width(),
        raster.original_height(),
        pixels.width(),
        pixels.height(),
        filter.as_str(),
        palette_size,
        start.elapsed().as_millis()
    );

    Ok(pixels)
}
