//! 指令表的 HTML 清单与打印文档。
//!
//! 行背景交替 `#DDDDDD` / `#FFFFFF`，每行以“行号 + 方向箭头”开头，
//! 每个游程输出长度和一个按游程颜色着色的方块，停针游程后追加 ` stop`。

use std::fmt::Write as _;
use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};
use image::{ImageFormat, RgbImage, imageops::FilterType};

use super::{Direction, InstructionTable};
use crate::error::PatternError;

const EVEN_ROW_BACKGROUND: &str = "#DDDDDD";
const ODD_ROW_BACKGROUND: &str = "#FFFFFF";

/// 渲染指令清单。
pub fn render_html(table: &InstructionTable) -> String {
    let mut html = String::from("<font size=14><table width=\"100%\">");

    for (i, row) in table.rows.iter().enumerate() {
        let background = if i % 2 == 0 {
            EVEN_ROW_BACKGROUND
        } else {
            ODD_ROW_BACKGROUND
        };
        let arrow = match row.direction {
            Direction::Up => "&uarr;",
            Direction::Down => "&darr;",
        };

        // 写入 String 不会失败
        let _ = write!(html, "<tr><td bgcolor=\"{}\">{} {}", background, row.line, arrow);
        for run in &row.runs {
            let [r, g, b] = run.color;
            let _ = write!(
                html,
                " {} <span style=\"color:rgb({}, {}, {})\"><b>&#9632;</b></span>",
                run.length, r, g, b
            );
            if run.stop {
                html.push_str(" stop");
            }
        }
        html.push_str("</td></tr>");
    }

    html.push_str("</table></font>");
    html
}

/// 将像素阵列按最近邻放大 `scale` 倍后编码为 PNG。
pub fn encode_preview_png(pixels: &RgbImage, scale: u32) -> Result<Vec<u8>, PatternError> {
    let scale = scale.max(1);
    let (width, height) = pixels.dimensions();
    let target_width = width
        .checked_mul(scale)
        .ok_or_else(|| PatternError::ResourceLimit("预览图宽度溢出".to_string()))?;
    let target_height = height
        .checked_mul(scale)
        .ok_or_else(|| PatternError::ResourceLimit("预览图高度溢出".to_string()))?;

    let preview = if scale == 1 {
        pixels.clone()
    } else {
        image::imageops::resize(pixels, target_width, target_height, FilterType::Nearest)
    };

    let mut cursor = Cursor::new(Vec::new());
    preview
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| PatternError::Export(format!("预览图编码失败：{}", e)))?;
    Ok(cursor.into_inner())
}

/// 打印/导出文档：内嵌 PNG 预览图 + 指令清单。
pub fn render_document(table: &InstructionTable, preview_png: &[u8]) -> String {
    let encoded = general_purpose::STANDARD.encode(preview_png);
    format!(
        "<img width=\"100%\" src=\"data:image/png;base64,{}\"/>{}",
        encoded,
        render_html(table)
    )
}
