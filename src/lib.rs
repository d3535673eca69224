//! # pleximo — 图片转穿线指令
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            展示层（GUI / CLI，不属于核心）                 │
//! │   读取 WorkingState 回填控件 ── 调用修改 ── 渲染预览/清单  │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Result<T, PatternError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↓              核心                                │
//! │  session ─── Session / SessionAdapter（观察者）           │
//! │     │                                                    │
//! │     ├─ image_buffer  源图 + 工作参数（宽高/调色板/边距）   │
//! │     ├─ transform     缩放 → 量化 → 补齐/裁剪              │
//! │     ├─ trajectory    反对角线蛇形轨迹                     │
//! │     ├─ stops         停针点检测                           │
//! │     └─ instructions  游程编码 + HTML/文档/JSON            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `PatternError` |
//! | [`config`] | `PatternConfig` 默认值、JSON 读写、滤镜解析 |
//! | [`image_buffer`] | 图片解码、颜色统计、工作参数设置与校验 |
//! | [`transform`] | 由源图和工作参数计算像素阵列 |
//! | [`trajectory`] | 生成覆盖全部格子的蛇形轨迹 |
//! | [`stops`] | 标记路径首次到达底边/右边的点 |
//! | [`instructions`] | 指令表编码与渲染 |
//! | [`session`] | 会话编排，修改后重新推导全部结果 |

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod image_buffer;
pub mod instructions;
pub mod session;
pub mod stops;
pub mod trajectory;
pub mod transform;

pub use config::{PatternConfig, ResizeFilter};
pub use error::PatternError;
pub use image_buffer::{ImageBuffer, Margins, RasterImage, WorkingState, count_distinct_colors};
pub use instructions::{
    Color, Direction, InstructionRow, InstructionTable, Run, encode, encode_preview_png,
    render_document, render_html,
};
pub use session::{Pattern, Preview, Session, SessionAdapter, SessionEvent, SessionObserver};
pub use trajectory::{TrajectoryPoint, generate};
pub use transform::{PixelArray, compute};
