//! Per-image pipeline: decode, detect, select, report.
//!
//! A `Locator` owns a loaded backend and reuses it for every image. Images
//! are independent; one bad file in a batch is logged and skipped.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::MultiFacePolicy;
use crate::detect::DetectorBackend;
use crate::error::{LocatorError, Result};
use crate::frame::Frame;
use crate::ingest::{list_images, load_image};
use crate::report::Reporter;
use crate::select::{select_largest, BoundingBox, SelectionResult};

/// What was found in one image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Exactly one qualifying face with a usable box.
    Located(BoundingBox),
    /// Nothing above threshold, or nothing geometrically valid.
    NoFace,
    /// Two or more qualifying faces.
    Ambiguous {
        count: usize,
        largest: BoundingBox,
    },
}

impl Outcome {
    /// Batch classification of a selection.
    pub fn classify(selection: SelectionResult) -> Self {
        match selection.largest {
            None => Outcome::NoFace,
            Some(bbox) if selection.count == 1 => Outcome::Located(bbox),
            Some(bbox) => Outcome::Ambiguous {
                count: selection.count,
                largest: bbox,
            },
        }
    }
}

/// Per-batch counters, logged when a batch finishes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub located: usize,
    pub no_face: usize,
    pub ambiguous: usize,
    pub failed: usize,
}

pub struct Locator {
    backend: Box<dyn DetectorBackend>,
    threshold: f32,
    on_multiple: MultiFacePolicy,
}

impl Locator {
    pub fn new(backend: Box<dyn DetectorBackend>, threshold: f32) -> Self {
        Self {
            backend,
            threshold,
            on_multiple: MultiFacePolicy::default(),
        }
    }

    pub fn with_policy(mut self, on_multiple: MultiFacePolicy) -> Self {
        self.on_multiple = on_multiple;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Run detection and selection on a decoded frame.
    pub fn locate(&self, frame: &Frame) -> Result<SelectionResult> {
        let records = self.backend.detect(frame)?;
        let selection = select_largest(&records, frame.dimensions(), self.threshold);
        log::debug!(
            "{} rows, {} above {:.2}, largest={:?}",
            records.len(),
            selection.count,
            self.threshold,
            selection.largest
        );
        Ok(selection)
    }

    /// Single-image mode. Decode or inference failures are returned.
    ///
    /// The largest box is printed whenever one exists, however many faces
    /// qualified; nothing is printed otherwise.
    pub fn run_single<O: Write, E: Write>(
        &self,
        path: &Path,
        reporter: &mut Reporter<O, E>,
    ) -> Result<Option<BoundingBox>> {
        let frame = load_image(path)?;
        let selection = self.locate(&frame)?;
        if let Some(bbox) = selection.largest {
            reporter.single(&bbox).map_err(stdout_error)?;
        } else {
            log::info!("no face found in {}", path.display());
        }
        reporter.flush().map_err(stdout_error)?;
        Ok(selection.largest)
    }

    /// Directory mode. Every regular file is processed independently.
    pub fn run_batch<O: Write, E: Write>(
        &self,
        dir: &Path,
        reporter: &mut Reporter<O, E>,
    ) -> Result<BatchSummary> {
        let files = list_images(dir)?;
        log::info!(
            "processing {} files in {} (threshold {:.2})",
            files.len(),
            dir.display(),
            self.threshold
        );

        let mut summary = BatchSummary::default();
        for path in files {
            summary.processed += 1;
            let outcome = match self.process_file(&path) {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::warn!("skipping {}: {}", path.display(), e);
                    summary.failed += 1;
                    continue;
                }
            };
            self.report_outcome(outcome, &path, reporter, &mut summary)
                .map_err(stdout_error)?;
        }
        reporter.flush().map_err(stdout_error)?;

        log::info!(
            "batch done: processed={} located={} no_face={} ambiguous={} failed={}",
            summary.processed,
            summary.located,
            summary.no_face,
            summary.ambiguous,
            summary.failed
        );
        Ok(summary)
    }

    fn process_file(&self, path: &Path) -> Result<Outcome> {
        let frame = load_image(path)?;
        Ok(Outcome::classify(self.locate(&frame)?))
    }

    fn report_outcome<O: Write, E: Write>(
        &self,
        outcome: Outcome,
        path: &Path,
        reporter: &mut Reporter<O, E>,
        summary: &mut BatchSummary,
    ) -> std::io::Result<()> {
        match outcome {
            Outcome::Located(bbox) => {
                summary.located += 1;
                reporter.located(&bbox, path)
            }
            Outcome::NoFace => {
                summary.no_face += 1;
                reporter.no_face(path)
            }
            Outcome::Ambiguous { count, largest } => {
                summary.ambiguous += 1;
                log::debug!("{} faces in {}", count, path.display());
                match self.on_multiple {
                    MultiFacePolicy::Skip => Ok(()),
                    MultiFacePolicy::ZeroLine => reporter.no_face(path),
                    MultiFacePolicy::Largest => reporter.located(&largest, path),
                }
            }
        }
    }
}

fn stdout_error(source: std::io::Error) -> LocatorError {
    LocatorError::Io {
        path: PathBuf::from("<stdout>"),
        source,
    }
}
