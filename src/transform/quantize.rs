//! # 调色板量化
//!
//! ## 设计思路
//!
//! 中位切分（median cut）：把所有颜色放进一个盒子，反复沿“跨度最大的通道”
//! 在像素数中位处切开，直到盒子数量达到调色板大小或再也切不动；
//! 每个盒子取像素加权平均色作为调色板条目，最后把每个像素映射到最近条目。
//!
//! 颜色数本来就不超过调色板大小时，调色板就是这些颜色本身，图像原样返回。

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};

use image::{Rgb, RgbImage};

#[derive(Debug, Clone, Copy)]
enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }
}

/// 一个颜色盒子：颜色及其像素计数。
///
/// 像素总数与最宽通道在创建时算好，挑选下一个待切盒子时不再重扫颜色。
#[derive(Debug, Clone)]
struct ColorBox {
    colors: Vec<([u8; 3], u32)>,
    pixel_count: u64,
    channel: Channel,
    range: u8,
    seq: usize,
}

impl ColorBox {
    fn new(colors: Vec<([u8; 3], u32)>, seq: usize) -> Self {
        let pixel_count = colors.iter().map(|(_, count)| *count as u64).sum();
        let (channel, range) = widest_channel(&colors);
        Self {
            colors,
            pixel_count,
            channel,
            range,
            seq,
        }
    }

    fn can_split(&self) -> bool {
        self.colors.len() > 1
    }

    /// 堆排序键：像素最多优先，跨度次之，先创建的盒子再次之。
    fn priority(&self) -> (u64, u8, Reverse<usize>) {
        (self.pixel_count, self.range, Reverse(self.seq))
    }

    fn split(mut self, next_seq: usize) -> (ColorBox, ColorBox) {
        let c = self.channel.index();
        self.colors.sort_unstable_by_key(|(color, _)| (color[c], *color));

        let total = self.pixel_count;
        let mut running = 0u64;
        let mut split_idx = self.colors.len() / 2;
        for (i, (_, count)) in self.colors.iter().enumerate() {
            running += *count as u64;
            if running * 2 >= total {
                split_idx = i + 1;
                break;
            }
        }
        // 两边都不能为空
        split_idx = split_idx.clamp(1, self.colors.len() - 1);

        let right = self.colors.split_off(split_idx);
        (
            ColorBox::new(self.colors, self.seq),
            ColorBox::new(right, next_seq),
        )
    }

    fn average_color(&self) -> [u8; 3] {
        let total = self.pixel_count.max(1);
        let mut sums = [0u64; 3];
        for (color, count) in &self.colors {
            for c in 0..3 {
                sums[c] += color[c] as u64 * *count as u64;
            }
        }
        [
            ((sums[0] + total / 2) / total) as u8,
            ((sums[1] + total / 2) / total) as u8,
            ((sums[2] + total / 2) / total) as u8,
        ]
    }
}

impl PartialEq for ColorBox {
    fn eq(&self, other: &Self) -> bool {
        self.priority() == other.priority()
    }
}

impl Eq for ColorBox {}

impl PartialOrd for ColorBox {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ColorBox {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

/// 跨度最大的通道及其跨度。
fn widest_channel(colors: &[([u8; 3], u32)]) -> (Channel, u8) {
    let mut min = [u8::MAX; 3];
    let mut max = [u8::MIN; 3];
    for (color, _) in colors {
        for c in 0..3 {
            min[c] = min[c].min(color[c]);
            max[c] = max[c].max(color[c]);
        }
    }

    let range = |c: usize| max[c].saturating_sub(min[c]);
    let (r, g, b) = (range(0), range(1), range(2));
    if r >= g && r >= b {
        (Channel::Red, r)
    } else if g >= b {
        (Channel::Green, g)
    } else {
        (Channel::Blue, b)
    }
}

/// 颜色直方图，按颜色排序以保证结果确定。
fn histogram(image: &RgbImage) -> Vec<([u8; 3], u32)> {
    let mut counts: HashMap<[u8; 3], u32> = HashMap::new();
    for pixel in image.pixels() {
        *counts.entry(pixel.0).or_insert(0) += 1;
    }
    let mut colors: Vec<_> = counts.into_iter().collect();
    colors.sort_unstable_by_key(|(color, _)| *color);
    colors
}

/// 生成最多 `max_colors` 个条目的调色板，条目按盒子创建顺序排列。
pub(crate) fn median_cut_palette(image: &RgbImage, max_colors: usize) -> Vec<[u8; 3]> {
    let colors = histogram(image);
    if colors.len() <= max_colors {
        return colors.into_iter().map(|(color, _)| color).collect();
    }

    let mut heap = BinaryHeap::from([ColorBox::new(colors, 0)]);
    let mut settled = Vec::new();
    let mut next_seq = 1;

    while heap.len() + settled.len() < max_colors {
        let Some(candidate) = heap.pop() else {
            break;
        };
        let (left, right) = candidate.split(next_seq);
        next_seq += 1;

        for part in [left, right] {
            if part.can_split() {
                heap.push(part);
            } else {
                settled.push(part);
            }
        }
    }

    let mut boxes: Vec<ColorBox> = heap.into_vec();
    boxes.append(&mut settled);
    boxes.sort_unstable_by_key(|b| b.seq);
    boxes.iter().map(ColorBox::average_color).collect()
}

fn distance_sq(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as i32 - y as i32;
            (d * d) as u32
        })
        .sum()
}

/// 按红色通道排序的调色板，从查询色的红色值向两侧扩展搜索，
/// 红色差的平方已超过当前最优距离的一侧即可停止。
struct PaletteIndex {
    entries: Vec<([u8; 3], usize)>,
}

impl PaletteIndex {
    fn new(palette: &[[u8; 3]]) -> Self {
        let mut entries: Vec<_> = palette.iter().copied().zip(0..).collect();
        entries.sort_unstable_by_key(|(color, index)| (color[0], *index));
        Self { entries }
    }

    /// 最近的调色板条目，距离相同时取靠前的条目。
    fn nearest(&self, color: [u8; 3]) -> [u8; 3] {
        let pivot = self.entries.partition_point(|(entry, _)| entry[0] < color[0]);
        let mut best: Option<(u32, usize, [u8; 3])> = None;

        let mut visit = |entry: [u8; 3], index: usize| -> bool {
            let red = entry[0] as i32 - color[0] as i32;
            let red_sq = (red * red) as u32;
            if best.is_some_and(|(d, _, _)| red_sq > d) {
                return false;
            }
            let d = distance_sq(entry, color);
            if best.is_none_or(|(best_d, best_index, _)| (d, index) < (best_d, best_index)) {
                best = Some((d, index, entry));
            }
            true
        };

        let (mut left, mut right) = (pivot, pivot);
        let (mut left_open, mut right_open) = (true, true);
        while left_open || right_open {
            if right_open {
                right_open = right < self.entries.len() && {
                    let (entry, index) = self.entries[right];
                    right += 1;
                    visit(entry, index)
                };
            }
            if left_open {
                left_open = left > 0 && {
                    left -= 1;
                    let (entry, index) = self.entries[left];
                    visit(entry, index)
                };
            }
        }

        best.map_or(color, |(_, _, entry)| entry)
    }
}

/// 将图片量化到最多 `max_colors` 种颜色。
pub(crate) fn quantize(image: &RgbImage, max_colors: usize) -> RgbImage {
    let palette = median_cut_palette(image, max_colors.max(1));
    if palette.is_empty() {
        return image.clone();
    }

    log::debug!("🎨 量化调色板：请求 {} 色，生成 {} 色", max_colors, palette.len());

    let index = PaletteIndex::new(&palette);
    let mut lookup: HashMap<[u8; 3], [u8; 3]> = HashMap::new();
    let mut output = image.clone();
    for pixel in output.pixels_mut() {
        let mapped = *lookup
            .entry(pixel.0)
            .or_insert_with(|| index.nearest(pixel.0));
        *pixel = Rgb(mapped);
    }
    output
}
