//! # 会话编排模块
//!
//! ## 设计思路
//!
//! `Session` 是显式持有的值（没有全局单例），负责流程编排：
//! 1. 加载源图并初始化工作参数
//! 2. 接收缩放 / 改色 / 边距 / 重置等修改
//! 3. 每次读取时从头重新计算像素阵列、轨迹、停针与指令表
//!
//! ## 实现思路
//!
//! - 会话内不缓存任何派生数据，任何修改都天然使旧结果失效。
//! - 修改先校验再提交，失败时工作参数保持原样。
//! - 记录 `transform/trace/encode/total` 阶段耗时，便于性能诊断。
//! - `adapter`：给展示层用的观察者包装，替代回调字段。

mod adapter;

use std::path::Path;
use std::time::Instant;

use crate::config::PatternConfig;
use crate::error::PatternError;
use crate::image_buffer::{ImageBuffer, WorkingState};
use crate::instructions::{self, Color, InstructionTable};
use crate::stops;
use crate::trajectory::{self, TrajectoryPoint};
use crate::transform::{self, PixelArray};

pub use adapter::{SessionAdapter, SessionEvent, SessionObserver};

/// 一次完整计算的全部产物。
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub pixels: PixelArray,
    pub trajectory: Vec<TrajectoryPoint>,
    pub colors: Vec<Color>,
    pub stops: Vec<bool>,
    pub table: InstructionTable,
}

/// 预览：像素阵列总是有；尺寸超出指令上限时不生成图案。
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub pixels: PixelArray,
    pub pattern: Option<Pattern>,
}

/// 图案会话。
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: PatternConfig,
    buffer: Option<ImageBuffer>,
}

impl Session {
    /// # 示例
    /// ```rust,no_run
    /// use pleximo::{PatternConfig, Session};
    ///
    /// let mut session = Session::new(PatternConfig::default());
    /// session.load_file("portrait.png".as_ref())?;
    /// session.resize(40, 30)?;
    /// session.recolor(6)?;
    /// let pattern = session.compute_pattern()?;
    /// println!("{} 行指令", pattern.table.len());
    /// # Ok::<(), pleximo::PatternError>(())
    /// ```
    pub fn new(config: PatternConfig) -> Self {
        Self {
            config,
            buffer: None,
        }
    }

    pub fn config(&self) -> &PatternConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.buffer.is_some()
    }

    fn buffer(&self) -> Result<&ImageBuffer, PatternError> {
        self.buffer.as_ref().ok_or(PatternError::NotLoaded)
    }

    fn buffer_mut(&mut self) -> Result<&mut ImageBuffer, PatternError> {
        self.buffer.as_mut().ok_or(PatternError::NotLoaded)
    }

    /// 当前工作参数快照。
    pub fn state(&self) -> Result<WorkingState, PatternError> {
        Ok(*self.buffer()?.state())
    }

    pub fn image(&self) -> Result<&ImageBuffer, PatternError> {
        self.buffer()
    }

    /// 加载图片字节。失败时保留之前加载的图片与参数。
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), PatternError> {
        let buffer = ImageBuffer::load(bytes, &self.config)?;
        self.install(buffer);
        Ok(())
    }

    pub fn load_file(&mut self, path: &Path) -> Result<(), PatternError> {
        let buffer = ImageBuffer::load_file(path, &self.config)?;
        self.install(buffer);
        Ok(())
    }

    fn install(&mut self, buffer: ImageBuffer) {
        log::info!(
            "🖼️ 已加载图片 {}x{}，{} 种颜色",
            buffer.raster().original_width(),
            buffer.raster().original_height(),
            buffer.original_colors()
        );
        self.buffer = Some(buffer);
    }

    pub fn resize(&mut self, height: i32, width: i32) -> Result<(), PatternError> {
        self.buffer_mut()?.resize(height, width)
    }

    pub fn recolor(&mut self, palette_size: i32) -> Result<(), PatternError> {
        self.buffer_mut()?.recolor(palette_size)
    }

    pub fn set_margins(
        &mut self,
        top: i32,
        bottom: i32,
        left: i32,
        right: i32,
    ) -> Result<(), PatternError> {
        self.buffer_mut()?.set_margins(top, bottom, left, right);
        Ok(())
    }

    /// 恢复原始尺寸、原始颜色数与零边距。
    pub fn reset(&mut self) -> Result<(), PatternError> {
        self.buffer_mut()?.reset();
        Ok(())
    }

    /// 按当前参数计算像素阵列。
    pub fn compute_image(&self) -> Result<PixelArray, PatternError> {
        let buffer = self.buffer()?;
        transform::compute(buffer.raster(), buffer.state(), self.config.resize_filter)
    }

    /// 当前参数是否在指令生成上限之内。
    pub fn within_instruction_limit(&self) -> Result<bool, PatternError> {
        let (width, height) = self.buffer()?.state().checked_dimensions()?;
        let limit = self.config.instruction_max_dimension;
        Ok(width < limit && height < limit)
    }

    /// 计算完整图案：像素阵列 → 轨迹 → 停针 → 指令表。
    pub fn compute_pattern(&self) -> Result<Pattern, PatternError> {
        if !self.within_instruction_limit()? {
            let state = self.buffer()?.state();
            return Err(PatternError::ResourceLimit(format!(
                "指令生成要求宽高都小于 {}（当前 {}x{}）",
                self.config.instruction_max_dimension, state.width, state.height
            )));
        }

        let total_start = Instant::now();
        let pixels = self.compute_image()?;
        let transform_elapsed = total_start.elapsed();

        let pattern = build_pattern(pixels)?;

        log::info!(
            "✅ 图案计算完成 - {} 行指令 transform={}ms total={}ms",
            pattern.table.len(),
            transform_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(pattern)
    }

    /// 预览：总是返回像素阵列，尺寸允许时附带图案。
    pub fn preview(&self) -> Result<Preview, PatternError> {
        let pixels = self.compute_image()?;
        if !self.within_instruction_limit()? {
            log::debug!("📏 尺寸超出指令上限，仅返回像素预览");
            return Ok(Preview {
                pixels,
                pattern: None,
            });
        }

        let pattern = build_pattern(pixels.clone())?;
        Ok(Preview {
            pixels,
            pattern: Some(pattern),
        })
    }

    /// 打印/导出文档：内嵌预览图的 HTML 指令清单。
    pub fn export_document(&self) -> Result<String, PatternError> {
        let start = Instant::now();
        let pattern = self.compute_pattern()?;
        let png = instructions::encode_preview_png(&pattern.pixels, self.config.preview_scale)?;
        let document = instructions::render_document(&pattern.table, &png);

        log::info!(
            "🖨️ 导出文档完成 - png={}KB html={}KB 耗时 {}ms",
            png.len() / 1024,
            document.len() / 1024,
            start.elapsed().as_millis()
        );

        Ok(document)
    }
}

/// 由像素阵列推导轨迹、颜色、停针与指令表。
fn build_pattern(pixels: PixelArray) -> Result<Pattern, PatternError> {
    let (width, height) = pixels.dimensions();

    let trace_start = Instant::now();
    let trajectory = trajectory::generate(height, width);
    let colors: Vec<Color> = trajectory
        .iter()
        .map(|p| pixels.get_pixel(p.col, p.row).0)
        .collect();
    let stops = stops::flag(&trajectory, height, width);
    let trace_elapsed = trace_start.elapsed();

    let encode_start = Instant::now();
    let table = instructions::encode(&trajectory, &colors, &stops)?;

    log::debug!(
        "🧵 轨迹 {} 点，停针 {} 处 trace={}ms encode={}ms",
        trajectory.len(),
        stops.iter().filter(|&&s| s).count(),
        trace_elapsed.as_millis(),
        encode_start.elapsed().as_millis()
    );

    Ok(Pattern {
        pixels,
        trajectory,
        colors,
        stops,
        table,
    })
}
