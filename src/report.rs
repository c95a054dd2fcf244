//! Output lines.
//!
//! Single-image mode prints `cx cy size`. Batch mode prints
//! `cx\tcy\tsize\tpath` to stdout for a located face and `0\t0\t0\tpath` to
//! stderr when nothing usable was found. The JSON format carries the same
//! numbers as one object per line on the same streams.

use std::io::{self, Stderr, Stdout, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::OutputFormat;
use crate::select::BoundingBox;

#[derive(Debug, Serialize)]
struct ReportLine {
    centroid_x: i32,
    centroid_y: i32,
    size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

impl ReportLine {
    fn from_box(bbox: &BoundingBox, path: Option<&Path>) -> Self {
        let (centroid_x, centroid_y) = bbox.centroid();
        Self {
            centroid_x,
            centroid_y,
            size: bbox.size_metric(),
            path: path.map(|p| p.display().to_string()),
        }
    }

    fn zero(path: &Path) -> Self {
        Self {
            centroid_x: 0,
            centroid_y: 0,
            size: 0,
            path: Some(path.display().to_string()),
        }
    }
}

/// Writes result lines to an output and an error stream.
pub struct Reporter<O: Write, E: Write> {
    out: O,
    err: E,
    format: OutputFormat,
}

impl Reporter<Stdout, Stderr> {
    pub fn stdio(format: OutputFormat) -> Self {
        Self::new(io::stdout(), io::stderr(), format)
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E, format: OutputFormat) -> Self {
        Self { out, err, format }
    }

    /// Single-image result: `cx cy size`.
    pub fn single(&mut self, bbox: &BoundingBox) -> io::Result<()> {
        let line = ReportLine::from_box(bbox, None);
        match self.format {
            OutputFormat::Tsv => writeln!(
                self.out,
                "{} {} {}",
                line.centroid_x, line.centroid_y, line.size
            ),
            OutputFormat::Json => write_json(&mut self.out, &line),
        }
    }

    /// Batch result for a located face, on the output stream.
    pub fn located(&mut self, bbox: &BoundingBox, path: &Path) -> io::Result<()> {
        let line = ReportLine::from_box(bbox, Some(path));
        write_batch_line(&mut self.out, self.format, &line)
    }

    /// Batch result for an image without a usable face, on the error stream.
    pub fn no_face(&mut self, path: &Path) -> io::Result<()> {
        write_batch_line(&mut self.err, self.format, &ReportLine::zero(path))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

fn write_batch_line<W: Write>(w: &mut W, format: OutputFormat, line: &ReportLine) -> io::Result<()> {
    match format {
        OutputFormat::Tsv => writeln!(
            w,
            "{}\t{}\t{}\t{}",
            line.centroid_x,
            line.centroid_y,
            line.size,
            line.path.as_deref().unwrap_or_default()
        ),
        OutputFormat::Json => write_json(w, line),
    }
}

fn write_json<W: Write>(w: &mut W, line: &ReportLine) -> io::Result<()> {
    serde_json::to_writer(&mut *w, line)?;
    writeln!(w)
}
