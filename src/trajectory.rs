//! 反对角线蛇形轨迹。
//!
//! 第 `line` 条（从 1 开始）反对角线是 `row + col == line - 1` 的所有格子。
//! 每条对角线先按“行从高到低”列出，序号为奇数的对角线整体反转，
//! 于是相邻对角线方向交替，整条路径在物理上连续。

use serde::Serialize;

/// 轨迹上的一个格子。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TrajectoryPoint {
    /// 对角线序号（从 0 开始）。
    pub diagonal: usize,
    pub row: u32,
    pub col: u32,
}

impl TrajectoryPoint {
    pub const fn new(diagonal: usize, row: u32, col: u32) -> Self {
        Self { diagonal, row, col }
    }
}

/// 生成 `height x width` 网格的完整轨迹，长度为 `height * width`。
///
/// 任一边为 0 时返回空轨迹。
pub fn generate(height: u32, width: u32) -> Vec<TrajectoryPoint> {
    if height == 0 || width == 0 {
        return Vec::new();
    }

    let mut trajectory = Vec::with_capacity(height as usize * width as usize);
    for (diagonal, line) in (1..width + height).enumerate() {
        let start_col = line.saturating_sub(height);
        let count = line.min(width - start_col).min(height);
        let top = height.min(line);

        let cells = (0..count).map(|j| TrajectoryPoint::new(diagonal, top - j - 1, start_col + j));
        if diagonal % 2 == 1 {
            trajectory.extend(cells.rev());
        } else {
            trajectory.extend(cells);
        }
    }
    trajectory
}
