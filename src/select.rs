//! Largest-detection selection.
//!
//! Turns the decoded rows of a detector output tensor into at most one pixel
//! box: the largest-area, geometrically valid detection whose confidence is
//! strictly above the threshold. Every qualifying row is counted, valid or not,
//! so callers can tell "nothing found" apart from "several faces".

use crate::detect::DetectionRecord;

/// Pixel dimensions of the frame a detection tensor was computed for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameDimensions {
    pub width: u32,
    pub height: u32,
}

impl FrameDimensions {
    /// Returns `None` when either side is zero.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }
}

/// Integer box in pixel space. `x + width` and `y + height` stay inside the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingBox {
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Box center with truncating integer division.
    pub fn centroid(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// `floor(sqrt(width * height))`, a linear proxy for face size.
    pub fn size_metric(&self) -> u64 {
        isqrt(self.area().max(0) as u64)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionResult {
    /// Records whose confidence exceeded the threshold, valid or not.
    pub count: usize,
    /// Largest valid box among them.
    pub largest: Option<BoundingBox>,
}

/// Convert a fractional edge to a pixel coordinate clamped into `[0, extent - 1]`.
///
/// The `as i32` cast truncates toward zero and saturates out-of-range values.
pub fn clamp_edge(frac: f32, extent: u32) -> i32 {
    clamp_pixel((frac * extent as f32) as i32, extent)
}

/// Clamp a pixel coordinate into `[0, extent - 1]`.
pub fn clamp_pixel(pixel: i32, extent: u32) -> i32 {
    let max = extent.saturating_sub(1).min(i32::MAX as u32) as i32;
    pixel.clamp(0, max)
}

/// Select the largest qualifying detection.
///
/// Ties on area keep the record seen first.
pub fn select_largest(
    records: &[DetectionRecord],
    dims: FrameDimensions,
    threshold: f32,
) -> SelectionResult {
    let mut result = SelectionResult::default();
    let mut max_area: i64 = 0;

    for record in records {
        if record.confidence <= threshold {
            continue;
        }
        result.count += 1;

        let left = clamp_edge(record.left, dims.width);
        let right = clamp_edge(record.right, dims.width);
        let top = clamp_edge(record.top, dims.height);
        let bottom = clamp_edge(record.bottom, dims.height);

        if left >= right || top >= bottom {
            continue;
        }
        let candidate = BoundingBox {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        };
        if candidate.area() > max_area {
            max_area = candidate.area();
            result.largest = Some(candidate);
        }
    }

    result
}

fn isqrt(value: u64) -> u64 {
    let squares_within = |root: u64| root.checked_mul(root).is_some_and(|sq| sq <= value);
    let mut root = (value as f64).sqrt() as u64;
    while !squares_within(root) {
        root -= 1;
    }
    while squares_within(root + 1) {
        root += 1;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(confidence: f32, left: f32, top: f32, right: f32, bottom: f32) -> DetectionRecord {
        DetectionRecord {
            class_id: Some(0),
            confidence,
            left,
            top,
            right,
            bottom,
        }
    }

    fn vga() -> FrameDimensions {
        FrameDimensions::new(640, 480).unwrap()
    }

    #[test]
    fn reference_box_centroid_and_size() {
        let result = select_largest(&[record(0.9, 0.1, 0.1, 0.5, 0.5)], vga(), 0.5);
        assert_eq!(result.count, 1);
        let bbox = result.largest.unwrap();
        assert_eq!(
            bbox,
            BoundingBox {
                x: 64,
                y: 48,
                width: 256,
                height: 192
            }
        );
        assert_eq!(bbox.centroid(), (192, 144));
        assert_eq!(bbox.size_metric(), 221);
    }

    #[test]
    fn nothing_above_threshold() {
        let records = [
            record(0.5, 0.1, 0.1, 0.5, 0.5),
            record(0.2, 0.0, 0.0, 1.0, 1.0),
        ];
        let result = select_largest(&records, vga(), 0.5);
        assert_eq!(result.count, 0);
        assert!(result.largest.is_none());
    }

    #[test]
    fn empty_tensor_selects_nothing() {
        assert_eq!(select_largest(&[], vga(), 0.5), SelectionResult::default());
    }

    #[test]
    fn invalid_box_counts_but_is_not_selected() {
        let records = [
            record(0.95, 0.6, 0.2, 0.4, 0.8),
            record(0.9, 0.2, 0.2, 0.3, 0.3),
        ];
        let result = select_largest(&records, vga(), 0.5);
        assert_eq!(result.count, 2);
        assert_eq!(
            result.largest,
            Some(BoundingBox {
                x: 128,
                y: 96,
                width: 64,
                height: 48
            })
        );
    }

    #[test]
    fn all_invalid_keeps_count_without_box() {
        let records = [
            record(0.9, 1.5, 0.2, 2.0, 0.8),
            record(0.9, 0.2, -0.4, 0.4, -0.1),
        ];
        let result = select_largest(&records, vga(), 0.5);
        assert_eq!(result.count, 2);
        assert!(result.largest.is_none());
    }

    #[test]
    fn equal_areas_keep_first_seen() {
        let records = [
            record(0.9, 0.0, 0.0, 0.25, 0.25),
            record(0.99, 0.5, 0.5, 0.75, 0.75),
        ];
        let result = select_largest(&records, vga(), 0.5);
        assert_eq!(result.count, 2);
        assert_eq!(result.largest.unwrap().x, 0);
    }

    #[test]
    fn larger_box_wins_regardless_of_confidence() {
        let records = [
            record(0.99, 0.0, 0.0, 0.1, 0.1),
            record(0.6, 0.2, 0.2, 0.9, 0.9),
        ];
        let result = select_largest(&records, vga(), 0.5);
        assert_eq!(result.largest.unwrap().x, 128);
    }

    #[test]
    fn edges_are_clamped_into_frame() {
        let result = select_largest(&[record(0.9, -0.2, -1.0, 1.7, 3.0)], vga(), 0.5);
        assert_eq!(
            result.largest,
            Some(BoundingBox {
                x: 0,
                y: 0,
                width: 639,
                height: 479
            })
        );
    }

    #[test]
    fn clamp_is_idempotent() {
        for frac in [-3.0f32, -0.01, 0.0, 0.33, 0.999, 1.0, 4.2, f32::NAN] {
            let once = clamp_edge(frac, 640);
            assert_eq!(clamp_pixel(once, 640), once);
        }
        for pixel in [i32::MIN, -1, 0, 479, 480, i32::MAX] {
            let once = clamp_pixel(pixel, 480);
            assert_eq!(clamp_pixel(once, 480), once);
        }
    }

    #[test]
    fn pixel_conversion_truncates() {
        assert_eq!(clamp_edge(0.999, 10), 9);
        assert_eq!(clamp_edge(0.19, 10), 1);
    }

    #[test]
    fn size_metric_is_floor_of_root() {
        let bbox = BoundingBox {
            x: 0,
            y: 0,
            width: 15,
            height: 15,
        };
        assert_eq!(bbox.size_metric(), 15);
        let bbox = BoundingBox {
            x: 0,
            y: 0,
            width: 16,
            height: 15,
        };
        assert_eq!(bbox.size_metric(), 15);
    }

    #[test]
    fn isqrt_terminates_near_u64_max() {
        assert_eq!(isqrt(u64::MAX), 4_294_967_295);
        assert_eq!(isqrt(4_294_967_295 * 4_294_967_295), 4_294_967_295);
        assert_eq!(isqrt(4_294_967_295 * 4_294_967_295 - 1), 4_294_967_294);
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
    }

    #[test]
    fn zero_sized_frame_is_rejected() {
        assert!(FrameDimensions::new(0, 480).is_none());
        assert!(FrameDimensions::new(640, 0).is_none());
    }
}
