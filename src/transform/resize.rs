//! 重采样：优先 `fast_image_resize`，失败时回退 `image::imageops::resize`。

use fast_image_resize as fr;
use image::RgbImage;

use crate::config::ResizeFilter;
use crate::error::PatternError;

/// 将图片缩放到 `width x height`。尺寸不变时直接复制，不做重采样。
pub(crate) fn resize_rgb(
    image: &RgbImage,
    width: u32,
    height: u32,
    filter: ResizeFilter,
) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }

    match resize_with_fast_image_resize(image, width, height, filter) {
        Ok(resized) => resized,
        Err(err) => {
            log::warn!(
                "⚠️ fast_image_resize 缩放失败，回退 image::imageops::resize：{}",
                err
            );
            image::imageops::resize(image, width, height, filter.to_image_filter())
        }
    }
}

fn resize_with_fast_image_resize(
    image: &RgbImage,
    width: u32,
    height: u32,
    filter: ResizeFilter,
) -> Result<RgbImage, PatternError> {
    let (src_width, src_height) = image.dimensions();

    let src_image = fr::images::Image::from_vec_u8(
        src_width,
        src_height,
        image.as_raw().clone(),
        fr::PixelType::U8x3,
    )
    .map_err(|e| PatternError::Decode(format!("构建源图像缓冲失败：{}", e)))?;

    let mut dst_image = fr::images::Image::new(width, height, fr::PixelType::U8x3);

    let mut resizer = fr::Resizer::new();
    let options = fr::ResizeOptions::new().resize_alg(filter.to_fast_alg());

    resizer
        .resize(&src_image, &mut dst_image, Some(&options))
        .map_err(|e| PatternError::Decode(format!("fast_image_resize 执行失败：{}", e)))?;

    RgbImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| PatternError::Decode("fast_image_resize 输出缓冲长度异常".to_string()))
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;
    use crate::image_buffer::count_distinct_colors;

    fn quadrants(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| match (x < width / 2, y < height / 2) {
            (true, true) => Rgb([255, 0, 0]),
            (false, true) => Rgb([0, 255, 0]),
            (true, false) => Rgb([0, 0, 255]),
            (false, false) => Rgb([255, 255, 0]),
        })
    }

    #[test]
    fn identity_size_is_a_plain_copy() {
        let source = quadrants(6, 4);
        let resized = resize_rgb(&source, 6, 4, ResizeFilter::Lanczos3);
        assert_eq!(resized, source);
    }

    #[test]
    fn nearest_downscale_keeps_source_colors_only() {
        let source = quadrants(40, 40);
        let resized = resize_rgb(&source, 4, 4, ResizeFilter::Nearest);

        assert_eq!(resized.dimensions(), (4, 4));
        assert_eq!(count_distinct_colors(&resized), 4);
        assert_eq!(*resized.get_pixel(0, 0), Rgb([255, 0, 0]));
        assert_eq!(*resized.get_pixel(3, 3), Rgb([255, 255, 0]));
    }

    #[test]
    fn upscale_reaches_requested_size() {
        let source = quadrants(2, 2);
        let resized = resize_rgb(&source, 5, 3, ResizeFilter::Triangle);
        assert_eq!(resized.dimensions(), (5, 3));
    }
}
