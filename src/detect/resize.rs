//! Bilinear resize of 8-bit frames in OpenCV's `INTER_LINEAR` arithmetic.
//!
//! Each output sample reads at most a 2x2 source neighbourhood, found with
//! half-pixel mapping `src = (dst + 0.5) * ratio - 0.5`. Weights are 11-bit
//! fixed point and the two passes are combined with the same shifts and
//! rounding as `cv::resize` on `CV_8U` data. An exact 2x downscale on both
//! axes averages each 2x2 block instead, as OpenCV does.

use image::{Rgb, RgbImage};

const COEF_BITS: u32 = 11;
const COEF_SCALE: f32 = (1 << COEF_BITS) as f32;

/// Source indices and fixed-point weights for one output coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Tap {
    first: u32,
    second: u32,
    weights: [i32; 2],
}

/// Resize `src` to `width x height`.
pub fn resize_linear(src: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (src_width, src_height) = src.dimensions();
    if (src_width, src_height) == (width, height) {
        return src.clone();
    }
    if width > 0 && height > 0 && src_width == width * 2 && src_height == height * 2 {
        return halve(src);
    }

    let columns = linear_taps(src_width, width);
    let rows = linear_taps(src_height, height);

    // Horizontal pass, kept at COEF_BITS of extra precision.
    let horizontal: Vec<Vec<[i32; 3]>> = (0..src_height)
        .map(|y| {
            columns
                .iter()
                .map(|tap| {
                    let a = src.get_pixel(tap.first, y).0;
                    let b = src.get_pixel(tap.second, y).0;
                    std::array::from_fn(|c| {
                        a[c] as i32 * tap.weights[0] + b[c] as i32 * tap.weights[1]
                    })
                })
                .collect()
        })
        .collect();

    RgbImage::from_fn(width, height, |x, y| {
        let tap = rows[y as usize];
        let upper = horizontal[tap.first as usize][x as usize];
        let lower = horizontal[tap.second as usize][x as usize];
        let [w0, w1] = tap.weights;
        Rgb(std::array::from_fn(|c| {
            let value = ((w0 * (upper[c] >> 4)) >> 16) + ((w1 * (lower[c] >> 4)) >> 16) + 2;
            (value >> 2).clamp(0, 255) as u8
        }))
    })
}

fn linear_taps(src_len: u32, dst_len: u32) -> Vec<Tap> {
    let ratio = src_len as f64 / dst_len as f64;
    let last = src_len.saturating_sub(1);
    (0..dst_len)
        .map(|d| {
            let pos = ((d as f64 + 0.5) * ratio - 0.5) as f32;
            let mut index = pos.floor() as i64;
            let mut frac = pos - index as f32;
            if index < 0 {
                index = 0;
                frac = 0.0;
            }
            if index >= last as i64 {
                index = last as i64;
                frac = 0.0;
            }
            let first = index as u32;
            Tap {
                first,
                second: (first + 1).min(last),
                weights: [fixed(1.0 - frac), fixed(frac)],
            }
        })
        .collect()
}

fn fixed(weight: f32) -> i32 {
    (weight * COEF_SCALE).round_ties_even() as i32
}

fn halve(src: &RgbImage) -> RgbImage {
    RgbImage::from_fn(src.width() / 2, src.height() / 2, |x, y| {
        let (sx, sy) = (x * 2, y * 2);
        let block = [
            src.get_pixel(sx, sy).0,
            src.get_pixel(sx + 1, sy).0,
            src.get_pixel(sx, sy + 1).0,
            src.get_pixel(sx + 1, sy + 1).0,
        ];
        Rgb(std::array::from_fn(|c| {
            let sum: u32 = block.iter().map(|p| p[c] as u32).sum();
            ((sum + 2) >> 2) as u8
        }))
    })
}
