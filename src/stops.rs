//! 停针点检测。
//!
//! 沿展开后的整条轨迹（跨越对角线分组）比较相邻两点：
//! 路径从“非底边”进入底边，或从“非右边”进入右边时，在后一点标记停针，
//! 表示线材需要在这里固定或剪断。

use crate::trajectory::TrajectoryPoint;

/// 计算与轨迹逐项对齐的停针标记，第一个点永远为 `false`。
pub fn flag(trajectory: &[TrajectoryPoint], height: u32, width: u32) -> Vec<bool> {
    let mut flags = vec![false; trajectory.len()];
    if height == 0 || width == 0 {
        return flags;
    }

    let last_row = height - 1;
    let last_col = width - 1;
    for (k, pair) in trajectory.windows(2).enumerate() {
        let (prev, cur) = (pair[0], pair[1]);
        let reaches_bottom = prev.row != last_row && cur.row == last_row;
        let reaches_right = prev.col != last_col && cur.col == last_col;
        flags[k + 1] = reaches_bottom || reaches_right;
    }
    flags
}
