use crate::detect::backend::DetectorBackend;
use crate::detect::DetectionRecord;
use crate::error::Result;
use crate::frame::Frame;

type Script = Box<dyn Fn(&Frame) -> Vec<DetectionRecord> + Send>;

/// Scripted backend for tests and dry runs. Never loads a model.
pub struct StubBackend {
    script: Script,
}

impl StubBackend {
    /// Backend that never reports a detection.
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    /// Backend that returns the same rows for every frame.
    pub fn with_records(records: Vec<DetectionRecord>) -> Self {
        Self::from_fn(move |_| records.clone())
    }

    /// Backend that computes rows from the frame.
    pub fn from_fn<F>(script: F) -> Self
    where
        F: Fn(&Frame) -> Vec<DetectionRecord> + Send + 'static,
    {
        Self {
            script: Box::new(script),
        }
    }
}

impl Default for StubBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DetectorBackend for StubBackend {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn detect(&self, frame: &Frame) -> Result<Vec<DetectionRecord>> {
        Ok((self.script)(frame))
    }
}
