//! # 指令编码模块
//!
//! ## 设计思路
//!
//! 把（轨迹点, 颜色, 停针）三元组压缩成“按对角线分行、行内按颜色游程”的指令表：
//! 每行形如“第 N 行 ↑：3 格红色，2 格蓝色 停针 …”。
//!
//! ## 实现思路
//!
//! 两层分组都是 *相邻分组*，不是排序后分组：
//! - 对角线序号在轨迹中天然单调不减，直接按相邻相等切分；
//! - 同一对角线里被其他颜色隔开的同色格子属于不同游程。
//!
//! 调用方必须按轨迹顺序传入数据，这里不会重新排序，
//! 否则游程边界与停针语义都会被破坏。
//!
//! - `render`：HTML 清单、带预览图的打印文档、PNG 预览编码

mod render;

use serde::Serialize;

use crate::error::PatternError;
use crate::trajectory::TrajectoryPoint;

pub use render::{encode_preview_png, render_document, render_html};

/// RGB 颜色。
pub type Color = [u8; 3];

/// 对角线的走线方向（偶数行向上，奇数行向下）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn for_diagonal(index: usize) -> Self {
        if index % 2 == 0 { Self::Up } else { Self::Down }
    }
}

/// 一段同色游程。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Run {
    pub length: usize,
    pub color: Color,
    /// 游程最后一格是否停针。
    pub stop: bool,
}

/// 一条对角线对应的一行指令。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionRow {
    /// 行号（从 1 开始）。
    pub line: usize,
    pub direction: Direction,
    pub runs: Vec<Run>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstructionTable {
    pub rows: Vec<InstructionRow>,
}

impl InstructionTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 所有游程覆盖的格子总数。
    pub fn cell_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.runs.iter())
            .map(|run| run.length)
            .sum()
    }

    pub fn to_json(&self) -> Result<String, PatternError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PatternError::Export(format!("序列化指令表失败：{}", e)))
    }
}

/// 将轨迹、颜色与停针标记编码为指令表。
pub fn encode(
    trajectory: &[TrajectoryPoint],
    colors: &[Color],
    stops: &[bool],
) -> Result<InstructionTable, PatternError> {
    if trajectory.len() != colors.len() || trajectory.len() != stops.len() {
        return Err(PatternError::InvalidFormat(format!(
            "输入长度不一致：轨迹 {}，颜色 {}，停针 {}",
            trajectory.len(),
            colors.len(),
            stops.len()
        )));
    }

    let mut rows = Vec::new();
    let mut start = 0;
    while start < trajectory.len() {
        let diagonal = trajectory[start].diagonal;
        let end = start
            + trajectory[start..]
                .iter()
                .take_while(|p| p.diagonal == diagonal)
                .count();

        let index = rows.len();
        rows.push(InstructionRow {
            line: index + 1,
            direction: Direction::for_diagonal(index),
            runs: color_runs(&colors[start..end], &stops[start..end]),
        });
        start = end;
    }

    Ok(InstructionTable { rows })
}

/// 相邻同色切分游程，停针取游程最后一格。
fn color_runs(colors: &[Color], stops: &[bool]) -> Vec<Run> {
    colors
        .chunk_by(|a, b| a == b)
        .scan(0usize, |offset, chunk| {
            *offset += chunk.len();
            Some(Run {
                length: chunk.len(),
                color: chunk[0],
                stop: stops[*offset - 1],
            })
        })
        .collect()
}
