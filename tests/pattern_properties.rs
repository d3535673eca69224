// Property tests for the trajectory, stop detector, encoder and palette bound
use std::collections::HashSet;

use image::{Rgb, RgbImage};
use pleximo::{
    Margins, RasterImage, ResizeFilter, TrajectoryPoint, WorkingState, compute,
    count_distinct_colors, encode, generate, stops,
};
use proptest::prelude::*;

fn checked_flags(trajectory: &[TrajectoryPoint], h: u32, w: u32) -> Vec<bool> {
    let mut expected = vec![false; trajectory.len()];
    for k in 1..trajectory.len() {
        let (prev, cur) = (trajectory[k - 1], trajectory[k]);
        expected[k] = (prev.row != h - 1 && cur.row == h - 1) || (prev.col != w - 1 && cur.col == w - 1);
    }
    expected
}

proptest! {
    #[test]
    fn trajectory_is_a_bijection(h in 1u32..40, w in 1u32..40) {
        let trajectory = generate(h, w);
        prop_assert_eq!(trajectory.len(), (h * w) as usize);

        let unique: HashSet<(u32, u32)> = trajectory.iter().map(|p| (p.row, p.col)).collect();
        prop_assert_eq!(unique.len(), (h * w) as usize);
        prop_assert!(trajectory.iter().all(|p| p.row < h && p.col < w));
    }

    #[test]
    fn diagonals_are_non_decreasing_and_complete(h in 1u32..30, w in 1u32..30) {
        let trajectory = generate(h, w);
        prop_assert!(trajectory.windows(2).all(|pair| pair[0].diagonal <= pair[1].diagonal));

        for diagonal in 0..(h + w - 1) as usize {
            let emitted: HashSet<(u32, u32)> = trajectory
                .iter()
                .filter(|p| p.diagonal == diagonal)
                .map(|p| (p.row, p.col))
                .collect();
            let expected: HashSet<(u32, u32)> = (0..h)
                .flat_map(|row| (0..w).map(move |col| (row, col)))
                .filter(|(row, col)| (row + col) as usize == diagonal)
                .collect();
            prop_assert_eq!(emitted, expected);
        }
    }

    #[test]
    fn even_diagonals_run_high_to_low_rows(h in 1u32..25, w in 1u32..25) {
        let trajectory = generate(h, w);
        for diagonal in 0..(h + w - 1) as usize {
            let rows: Vec<u32> = trajectory
                .iter()
                .filter(|p| p.diagonal == diagonal)
                .map(|p| p.row)
                .collect();
            let descending = rows.windows(2).all(|r| r[0] > r[1]);
            let ascending = rows.windows(2).all(|r| r[0] < r[1]);
            if diagonal % 2 == 0 {
                prop_assert!(descending);
            } else {
                prop_assert!(ascending);
            }
        }
    }

    #[test]
    fn stop_flags_match_boundary_rule(h in 1u32..20, w in 1u32..20) {
        let trajectory = generate(h, w);
        let flags = stops::flag(&trajectory, h, w);
        prop_assert!(!flags[0]);
        prop_assert_eq!(flags, checked_flags(&trajectory, h, w));
    }

    #[test]
    fn encoded_runs_cover_every_cell(h in 1u32..12, w in 1u32..12, seed in any::<u64>()) {
        let trajectory = generate(h, w);
        let colors: Vec<[u8; 3]> = trajectory
            .iter()
            .map(|p| {
                let bit = (seed >> ((p.row * 7 + p.col * 3) % 64)) & 1;
                if bit == 1 { [255, 255, 255] } else { [0, 0, 0] }
            })
            .collect();
        let flags = stops::flag(&trajectory, h, w);

        let table = encode(&trajectory, &colors, &flags).unwrap();
        prop_assert_eq!(table.len(), (h + w - 1) as usize);
        prop_assert_eq!(table.cell_count(), (h * w) as usize);

        for row in &table.rows {
            prop_assert!(row.runs.windows(2).all(|pair| pair[0].color != pair[1].color));
        }
    }

    #[test]
    fn compute_respects_palette_bound(palette in 1i32..12, w in 1i32..20, h in 1i32..20) {
        let raster = RasterImage::from_rgb(RgbImage::from_fn(13, 11, |x, y| {
            Rgb([(x * 19) as u8, (y * 23) as u8, (x * y * 5 % 256) as u8])
        }));
        let state = WorkingState { width: w, height: h, palette_size: palette, margins: Margins::ZERO };

        let pixels = compute(&raster, &state, ResizeFilter::Triangle).unwrap();
        prop_assert_eq!(pixels.dimensions(), (w as u32, h as u32));
        prop_assert!(count_distinct_colors(&pixels) <= palette as usize);
    }
}
