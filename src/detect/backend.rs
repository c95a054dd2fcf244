use crate::error::Result;
use crate::frame::Frame;

use super::DetectionRecord;

/// Face detector backend.
///
/// A backend owns a loaded model and turns one decoded frame into the raw
/// rows of the detector's output tensor. It does not filter or rank them;
/// that is `select::select_largest`'s job.
///
/// `detect` borrows `self` immutably: a loaded model is read-only and is
/// reused for every image of a batch.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Run one forward pass on a frame.
    fn detect(&self, frame: &Frame) -> Result<Vec<DetectionRecord>>;

    /// Optional warm-up hook.
    fn warm_up(&self) -> Result<()> {
        Ok(())
    }
}
