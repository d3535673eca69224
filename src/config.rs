//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `PatternConfig`，保证行为可观测、可调整、可测试。
//! 配置可以来自 `Default`，也可以从 JSON 文件读取（缺省字段回落到默认值）。
//!
//! ## 实现思路
//!
//! - `Default` 提供可直接使用的配置。
//! - `ResizeFilter` 负责滤镜字符串解析与反向输出，并映射到
//!   `fast_image_resize` / `image::imageops` 两套滤镜。
//! - `validate` 拒绝会让守卫失效的零值。

use std::fs;
use std::path::Path;

use fast_image_resize as fr;
use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

use crate::error::PatternError;

/// 重采样滤镜。
///
/// 默认 `Nearest`：输出像素全部取自源图颜色，不会凭空引入混合色。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    #[default]
    Nearest,
    Triangle,
    CatmullRom,
    Lanczos3,
}

impl ResizeFilter {
    /// 从外部字符串解析滤镜。
    ///
    /// # 示例
    /// ```rust
    /// use pleximo::ResizeFilter;
    ///
    /// let filter = ResizeFilter::parse("Triangle")?;
    /// assert_eq!(filter.as_str(), "triangle");
    /// # Ok::<(), pleximo::PatternError>(())
    /// ```
    pub fn parse(name: &str) -> Result<Self, PatternError> {
        match name.trim().to_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "triangle" | "bilinear" => Ok(Self::Triangle),
            "catmull-rom" | "catmullrom" => Ok(Self::CatmullRom),
            "lanczos3" => Ok(Self::Lanczos3),
            other => Err(PatternError::InvalidFormat(format!(
                "未知滤镜：{}（可选：nearest / triangle / catmull-rom / lanczos3）",
                other
            ))),
        }
    }

    /// 稳定字符串，供日志与配置文件使用。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Triangle => "triangle",
            Self::CatmullRom => "catmull-rom",
            Self::Lanczos3 => "lanczos3",
        }
    }

    pub(crate) fn to_fast_alg(self) -> fr::ResizeAlg {
        match self {
            Self::Nearest => fr::ResizeAlg::Nearest,
            Self::Triangle => fr::ResizeAlg::Convolution(fr::FilterType::Bilinear),
            Self::CatmullRom => fr::ResizeAlg::Convolution(fr::FilterType::CatmullRom),
            Self::Lanczos3 => fr::ResizeAlg::Convolution(fr::FilterType::Lanczos3),
        }
    }

    pub(crate) fn to_image_filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Triangle => FilterType::Triangle,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// 图案生成配置。
///
/// 字段覆盖加载、重采样、指令生成与预览导出四个阶段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// 读取图片文件时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 重采样滤镜。
    pub resize_filter: ResizeFilter,
    /// 宽或高达到该值时不再生成指令（指令表会大到无法使用）。
    pub instruction_max_dimension: u32,
    /// 导出预览图时每个像素放大的倍数。
    pub preview_scale: u32,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            resize_filter: ResizeFilter::Nearest,
            instruction_max_dimension: 100,
            preview_scale: 8,
        }
    }
}

impl PatternConfig {
    /// 从 JSON 文件读取配置，缺省字段使用默认值。
    pub fn load_from_path(path: &Path) -> Result<Self, PatternError> {
        let content = fs::read_to_string(path)
            .map_err(|e| PatternError::FileSystem(format!("无法读取配置文件：{}", e)))?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| PatternError::InvalidFormat(format!("解析配置文件失败：{}", e)))?;
        config.validate()?;

        log::debug!("⚙️ 已加载配置 - 路径: {}", path.display());
        Ok(config)
    }

    /// 以美化 JSON 写出配置。
    pub fn save_to_path(&self, path: &Path) -> Result<(), PatternError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PatternError::Export(format!("序列化配置失败：{}", e)))?;
        fs::write(path, content)
            .map_err(|e| PatternError::FileSystem(format!("写入配置文件失败：{}", e)))
    }

    pub fn validate(&self) -> Result<(), PatternError> {
        if self.max_file_size == 0 {
            return Err(PatternError::InvalidFormat("max_file_size 不能为 0".to_string()));
        }
        if self.max_decoded_pixels == 0 {
            return Err(PatternError::InvalidFormat("max_decoded_pixels 不能为 0".to_string()));
        }
        if self.instruction_max_dimension == 0 {
            return Err(PatternError::InvalidFormat(
                "instruction_max_dimension 不能为 0".to_string(),
            ));
        }
        if !(1..=64).contains(&self.preview_scale) {
            return Err(PatternError::InvalidFormat("preview_scale 必须在 1~64 之间".to_string()));
        }
        Ok(())
    }
}
