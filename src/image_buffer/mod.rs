//! # 图片缓冲模块（image_buffer）
//!
//! ## 设计思路
//!
//! 将“不可变的源图”和“可变的工作参数”拆开：
//! - `RasterImage` 加载后永不修改，由 `ImageBuffer` 独占
//! - `WorkingState` 保存目标宽高、调色板大小与四边边距
//!
//! 所有派生数据（像素阵列、轨迹、指令表）都不在这里缓存，
//! 每次读取时由调用方基于当前 `WorkingState` 重新计算。
//!
//! ## 实现思路
//!
//! - `loader`：字节/文件加载与安全校验
//! - 本文件：数据模型、颜色统计、参数设置与校验

mod loader;

use std::collections::HashSet;
use std::path::Path;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::config::PatternConfig;
use crate::error::PatternError;

/// 加载后的源图（RGB，3 通道）。
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pixels: RgbImage,
}

impl RasterImage {
    pub fn from_rgb(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn original_width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn original_height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

/// 四边边距：正数表示裁掉对应行/列数，负数表示按边缘复制补齐。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Margins {
    pub const ZERO: Self = Self {
        top: 0,
        bottom: 0,
        left: 0,
        right: 0,
    };

    pub fn new(top: i32, bottom: i32, left: i32, right: i32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

/// 工作参数。
///
/// 字段保持公开，展示层可直接读取用于回填输入控件。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingState {
    pub width: i32,
    pub height: i32,
    pub palette_size: i32,
    pub margins: Margins,
}

impl WorkingState {
    /// 校验目标宽高，返回可直接用于像素运算的无符号值。
    pub fn checked_dimensions(&self) -> Result<(u32, u32), PatternError> {
        validate_dimensions(self.height, self.width)?;
        Ok((self.width as u32, self.height as u32))
    }

    pub fn checked_palette_size(&self) -> Result<usize, PatternError> {
        validate_palette_size(self.palette_size)?;
        Ok(self.palette_size as usize)
    }
}

/// 统计图片中不同 (R,G,B) 颜色的数量。
pub fn count_distinct_colors(image: &RgbImage) -> usize {
    image.pixels().map(|p| p.0).collect::<HashSet<[u8; 3]>>().len()
}

fn validate_dimensions(height: i32, width: i32) -> Result<(), PatternError> {
    if width <= 0 || height <= 0 {
        return Err(PatternError::InvalidDimensions {
            width: i64::from(width),
            height: i64::from(height),
        });
    }
    Ok(())
}

fn validate_palette_size(palette_size: i32) -> Result<(), PatternError> {
    if palette_size <= 0 {
        return Err(PatternError::InvalidPaletteSize(i64::from(palette_size)));
    }
    Ok(())
}

/// 源图 + 工作参数。
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    raster: RasterImage,
    original_colors: usize,
    state: WorkingState,
}

impl ImageBuffer {
    /// 解码字节并以源图参数初始化工作状态。
    pub fn load(bytes: &[u8], config: &PatternConfig) -> Result<Self, PatternError> {
        let pixels = loader::decode_rgb(bytes, config)?;
        Self::from_raster(RasterImage::from_rgb(pixels))
    }

    /// 读取本地文件后走 [`ImageBuffer::load`]。
    pub fn load_file(path: &Path, config: &PatternConfig) -> Result<Self, PatternError> {
        let bytes = loader::read_file(path, config)?;
        Self::load(&bytes, config)
    }

    pub fn from_raster(raster: RasterImage) -> Result<Self, PatternError> {
        let width = i32::try_from(raster.original_width())
            .map_err(|_| PatternError::ResourceLimit("图片宽度超出范围".to_string()))?;
        let height = i32::try_from(raster.original_height())
            .map_err(|_| PatternError::ResourceLimit("图片高度超出范围".to_string()))?;
        validate_dimensions(height, width)?;

        let original_colors = count_distinct_colors(raster.pixels());
        let palette_size = i32::try_from(original_colors).unwrap_or(i32::MAX);

        log::debug!(
            "🎨 源图 {}x{}，共 {} 种颜色",
            width,
            height,
            original_colors
        );

        Ok(Self {
            raster,
            original_colors,
            state: WorkingState {
                width,
                height,
                palette_size,
                margins: Margins::ZERO,
            },
        })
    }

    pub fn raster(&self) -> &RasterImage {
        &self.raster
    }

    pub fn state(&self) -> &WorkingState {
        &self.state
    }

    /// 源图中不同颜色的数量（加载时计算一次）。
    pub fn original_colors(&self) -> usize {
        self.original_colors
    }

    /// 设置目标尺寸。非正数会被拒绝，工作状态保持不变。
    pub fn resize(&mut self, height: i32, width: i32) -> Result<(), PatternError> {
        validate_dimensions(height, width)?;
        self.state.height = height;
        self.state.width = width;
        Ok(())
    }

    /// 设置调色板大小。非正数会被拒绝，工作状态保持不变。
    pub fn recolor(&mut self, palette_size: i32) -> Result<(), PatternError> {
        validate_palette_size(palette_size)?;
        self.state.palette_size = palette_size;
        Ok(())
    }

    pub fn set_margins(&mut self, top: i32, bottom: i32, left: i32, right: i32) {
        self.state.margins = Margins::new(top, bottom, left, right);
    }

    /// 恢复到刚加载时的参数。
    pub fn reset(&mut self) {
        self.state = WorkingState {
            width: self.raster.original_width() as i32,
            height: self.raster.original_height() as i32,
            palette_size: i32::try_from(self.original_colors).unwrap_or(i32::MAX),
            margins: Margins::ZERO,
        };
    }
}
