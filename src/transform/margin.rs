//! 边距：负数按边缘复制补齐，正数裁掉。
//!
//! 概念上先对四边一次性补齐，再在补齐后的阵列上按 *补齐前* 的目标宽高计算裁剪区间：
//! 行取 `[max(top,0), height - max(bottom,0))`，列同理。
//! 因此顶部/左侧补齐会把图像整体向下/右推移并截掉另一侧，
//! 底部/右侧补齐只有在同轴另一侧有裁剪时才影响结果。

use image::RgbImage;

use crate::error::PatternError;
use crate::image_buffer::Margins;

fn pad_amount(value: i32) -> i64 {
    if value < 0 { i64::from(value.unsigned_abs()) } else { 0 }
}

fn crop_amount(value: i32) -> i64 {
    i64::from(value.max(0))
}

/// 裁剪区间 `[start, stop)`，按补齐后的长度收敛。
fn crop_range(start: i64, stop: i64, len: i64) -> (i64, i64) {
    let stop = stop.clamp(0, len);
    let start = start.clamp(0, stop);
    (start, stop)
}

/// 对已缩放、量化的图片应用边距。
///
/// `width`/`height` 是补齐前的目标尺寸。补齐后的阵列不会真正分配：
/// 裁剪窗口在补齐坐标系中用 i64 计算，输出像素再按边缘复制映射回源图。
/// 裁剪后为空时返回 [`PatternError::InvalidDimensions`]，不会返回空阵列。
pub(crate) fn apply_margins(
    image: &RgbImage,
    margins: Margins,
    width: u32,
    height: u32,
) -> Result<RgbImage, PatternError> {
    if margins.is_zero() {
        return Ok(image.clone());
    }

    let (src_width, src_height) = image.dimensions();
    let (src_width, src_height) = (i64::from(src_width), i64::from(src_height));
    let pad_top = pad_amount(margins.top);
    let pad_left = pad_amount(margins.left);
    let padded_width = src_width + pad_left + pad_amount(margins.right);
    let padded_height = src_height + pad_top + pad_amount(margins.bottom);

    let (row_start, row_stop) = crop_range(
        crop_amount(margins.top),
        i64::from(height) - crop_amount(margins.bottom),
        padded_height,
    );
    let (col_start, col_stop) = crop_range(
        crop_amount(margins.left),
        i64::from(width) - crop_amount(margins.right),
        padded_width,
    );

    // stop 不超过 u32 目标尺寸，差值必然落在 u32 范围内
    let out_width = u32::try_from(col_stop - col_start).unwrap_or(0);
    let out_height = u32::try_from(row_stop - row_start).unwrap_or(0);
    if out_width == 0 || out_height == 0 || src_width == 0 || src_height == 0 {
        return Err(PatternError::InvalidDimensions {
            width: i64::from(out_width),
            height: i64::from(out_height),
        });
    }

    log::debug!(
        "✂️ 边距 {:?}：补齐后 {}x{}，保留行 {}..{} 列 {}..{}",
        margins,
        padded_width,
        padded_height,
        row_start,
        row_stop,
        col_start,
        col_stop
    );

    Ok(RgbImage::from_fn(out_width, out_height, |x, y| {
        let src_x = (col_start + i64::from(x) - pad_left).clamp(0, src_width - 1) as u32;
        let src_y = (row_start + i64::from(y) - pad_top).clamp(0, src_height - 1) as u32;
        *image.get_pixel(src_x, src_y)
    }))
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    /// 每个像素编码自己的坐标：R = 列，G = 行。
    fn coords(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]))
    }

    fn at(image: &RgbImage, x: u32, y: u32) -> (u8, u8) {
        let p = image.get_pixel(x, y);
        (p[0], p[1])
    }

    #[test]
    fn zero_margins_are_identity() {
        let image = coords(4, 3);
        assert_eq!(apply_margins(&image, Margins::ZERO, 4, 3).unwrap(), image);
    }

    #[test]
    fn positive_margins_crop_each_side() {
        let image = coords(5, 4);
        let out = apply_margins(&image, Margins::new(1, 1, 2, 0), 5, 4).unwrap();

        assert_eq!(out.dimensions(), (3, 2));
        assert_eq!(at(&out, 0, 0), (2, 1));
        assert_eq!(at(&out, 2, 1), (4, 2));
    }

    #[test]
    fn top_padding_shifts_down_and_truncates_bottom() {
        let image = coords(2, 3);
        let out = apply_margins(&image, Margins::new(-2, 0, 0, 0), 2, 3).unwrap();

        assert_eq!(out.dimensions(), (2, 3));
        assert_eq!(at(&out, 0, 0), (0, 0));
        assert_eq!(at(&out, 0, 1), (0, 0));
        assert_eq!(at(&out, 0, 2), (0, 0));
        assert_eq!(at(&out, 1, 2), (1, 0));
    }

    #[test]
    fn left_padding_replicates_first_column() {
        let image = coords(3, 2);
        let out = apply_margins(&image, Margins::new(0, 0, -1, 0), 3, 2).unwrap();

        assert_eq!(out.dimensions(), (3, 2));
        assert_eq!(at(&out, 0, 1), (0, 1));
        assert_eq!(at(&out, 1, 1), (0, 1));
        assert_eq!(at(&out, 2, 1), (1, 1));
    }

    #[test]
    fn bottom_and_right_padding_alone_leave_image_unchanged() {
        let image = coords(3, 3);
        let out = apply_margins(&image, Margins::new(0, -2, 0, -1), 3, 3).unwrap();
        assert_eq!(out, image);
    }

    #[test]
    fn mixed_pad_and_crop_on_same_axis_uses_pre_pad_bounds() {
        // 顶部补 1 行、底部裁 1 行：补齐后 5 行，取 [0, 4 - 1) = 3 行
        let image = coords(1, 4);
        let out = apply_margins(&image, Margins::new(-1, 1, 0, 0), 1, 4).unwrap();

        assert_eq!(out.dimensions(), (1, 3));
        assert_eq!(at(&out, 0, 0), (0, 0));
        assert_eq!(at(&out, 0, 1), (0, 0));
        assert_eq!(at(&out, 0, 2), (0, 1));

        // 底部补 2 行、顶部裁 1 行：补齐后 6 行，取 [1, 4) = 原图第 1..3 行
        let out = apply_margins(&image, Margins::new(1, -2, 0, 0), 1, 4).unwrap();
        assert_eq!(out.dimensions(), (1, 3));
        assert_eq!(at(&out, 0, 0), (0, 1));
        assert_eq!(at(&out, 0, 2), (0, 3));
    }

    #[test]
    fn cropping_everything_is_an_error() {
        let image = coords(3, 3);
        let result = apply_margins(&image, Margins::new(2, 1, 0, 0), 3, 3);
        assert!(matches!(result, Err(PatternError::InvalidDimensions { height: 0, .. })));

        let result = apply_margins(&image, Margins::new(0, 0, 0, 7), 3, 3);
        assert!(matches!(result, Err(PatternError::InvalidDimensions { width: 0, .. })));
    }

    #[test]
    fn extreme_margins_never_overflow() {
        let image = coords(2, 2);

        // 巨量补齐：补齐后的阵列从不分配，窗口仍是 2x2
        let out = apply_margins(&image, Margins::new(i32::MIN, i32::MIN, i32::MIN, i32::MIN), 2, 2)
            .unwrap();
        assert_eq!(out.dimensions(), (2, 2));
        assert!(out.pixels().all(|p| (p[0], p[1]) == (0, 0)));

        let out = apply_margins(&image, Margins::new(0, -50_000, 0, -50_000), 2, 2).unwrap();
        assert_eq!(out, image);

        let result = apply_margins(&image, Margins::new(i32::MAX, 0, 0, i32::MAX), 2, 2);
        assert!(matches!(result, Err(PatternError::InvalidDimensions { .. })));

        let result = apply_margins(&image, Margins::new(i32::MIN, i32::MAX, i32::MAX, i32::MIN), 2, 2);
        assert!(matches!(result, Err(PatternError::InvalidDimensions { .. })));
    }
}
