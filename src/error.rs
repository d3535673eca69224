//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载“加载 → 变换 → 编码 → 导出”整条链路的错误来源，
//! 避免字符串拼接式错误处理。通过 `thiserror` 保持人类可读错误，
//! 同时让调用侧（展示层）可按分支匹配并映射为自己的提示文案。
//!
//! ## 实现思路
//!
//! - `code()` 输出稳定的机器可读错误码。
//! - `stage()` 标记错误发生的阶段，便于日志与诊断。
//! - 所有错误都在引发它的调用中同步返回，核心内部不做重试。

/// 图案生成统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("尺寸无效：{width}x{height}（宽高必须为正数）")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("调色板大小无效：{0}（必须为正数）")]
    InvalidPaletteSize(i64),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("尚未加载图片")]
    NotLoaded,

    #[error("导出错误：{0}")]
    Export(String),
}

impl PatternError {
    /// 稳定错误码，供展示层映射提示文案。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_failed",
            Self::InvalidFormat(_) => "invalid_format",
            Self::InvalidDimensions { .. } => "invalid_dimensions",
            Self::InvalidPaletteSize(_) => "invalid_palette_size",
            Self::ResourceLimit(_) => "resource_limit",
            Self::FileSystem(_) => "file_system",
            Self::NotLoaded => "not_loaded",
            Self::Export(_) => "export_failed",
        }
    }

    /// 错误所属阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Decode(_) | Self::FileSystem(_) | Self::ResourceLimit(_) => "load",
            Self::InvalidDimensions { .. } | Self::InvalidPaletteSize(_) => "transform",
            Self::InvalidFormat(_) => "encode",
            Self::NotLoaded => "session",
            Self::Export(_) => "export",
        }
    }
}

impl From<PatternError> for String {
    fn from(error: PatternError) -> Self {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_per_variant() {
        assert_eq!(PatternError::NotLoaded.code(), "not_loaded");
        assert_eq!(PatternError::InvalidPaletteSize(0).code(), "invalid_palette_size");
        assert_eq!(
            PatternError::InvalidDimensions { width: 0, height: 3 }.stage(),
            "transform"
        );
    }

    #[test]
    fn display_carries_offending_values() {
        let message = PatternError::InvalidDimensions { width: -2, height: 5 }.to_string();
        assert!(message.contains("-2x5"));
    }

    #[test]
    fn every_stage_belongs_to_the_documented_set() {
        let errors = [
            PatternError::Decode(String::new()),
            PatternError::InvalidFormat(String::new()),
            PatternError::InvalidDimensions { width: 0, height: 0 },
            PatternError::InvalidPaletteSize(0),
            PatternError::ResourceLimit(String::new()),
            PatternError::FileSystem(String::new()),
            PatternError::NotLoaded,
            PatternError::Export(String::new()),
        ];
        for error in &errors {
            assert!(
                ["load", "transform", "encode", "export", "session"].contains(&error.stage()),
                "{} 的阶段不在约定集合中",
                error.code()
            );
        }
        assert_eq!(PatternError::InvalidFormat(String::new()).stage(), "encode");
        assert_eq!(PatternError::ResourceLimit(String::new()).stage(), "load");
    }
}
