//! Rows of the SSD `detection_out` tensor.

use crate::error::{LocatorError, Result};

/// Floats per row: `[image_id, class_id, confidence, left, top, right, bottom]`.
pub const ROW_LEN: usize = 7;

/// One detection as emitted by the model, before thresholding.
///
/// Edges are fractions of the frame size and may fall outside `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionRecord {
    /// Model class id minus one; the background class (raw id 0) maps to -1.
    pub class_id: Option<i32>,
    pub confidence: f32,
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl DetectionRecord {
    /// Decode a single row. Returns `None` if the row is shorter than `ROW_LEN`.
    pub fn from_row(row: &[f32]) -> Option<Self> {
        if row.len() < ROW_LEN {
            return None;
        }
        Some(Self {
            class_id: Some(row[1] as i32 - 1),
            confidence: row[2],
            left: row[3],
            top: row[4],
            right: row[5],
            bottom: row[6],
        })
    }
}

/// Decode a flattened `[.., N, 7]` detection tensor.
pub fn decode_detections(values: &[f32]) -> Result<Vec<DetectionRecord>> {
    if values.len() % ROW_LEN != 0 {
        return Err(LocatorError::Inference(format!(
            "detection tensor has {} values, not a multiple of {}",
            values.len(),
            ROW_LEN
        )));
    }
    Ok(values
        .chunks_exact(ROW_LEN)
        .filter_map(DetectionRecord::from_row)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_rows_in_order() {
        let values = [
            0.0, 1.0, 0.98, 0.1, 0.2, 0.3, 0.4, //
            0.0, 1.0, 0.12, 0.5, 0.5, 0.6, 0.7,
        ];
        let records = decode_detections(&values).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].class_id, Some(0));
        assert_eq!(records[0].confidence, 0.98);
        assert_eq!(records[0].left, 0.1);
        assert_eq!(records[0].bottom, 0.4);
        assert_eq!(records[1].confidence, 0.12);
    }

    #[test]
    fn background_class_maps_to_minus_one() {
        let record = DetectionRecord::from_row(&[0.0, 0.0, 0.7, 0.0, 0.0, 1.0, 1.0]).unwrap();
        assert_eq!(record.class_id, Some(-1));
    }

    #[test]
    fn empty_tensor_is_empty() {
        assert!(decode_detections(&[]).unwrap().is_empty());
    }

    #[test]
    fn ragged_tensor_is_rejected() {
        let err = decode_detections(&[0.0; 10]).unwrap_err();
        assert!(matches!(err, LocatorError::Inference(_)));
    }

    #[test]
    fn short_row_does_not_decode() {
        assert!(DetectionRecord::from_row(&[0.0, 1.0, 0.9]).is_none());
    }
}
