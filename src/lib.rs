//! Largest-face locator.
//!
//! Loads a pretrained SSD face detector once, runs it over one image or every
//! regular file in a directory, and reports the centroid and size of the
//! largest detected face.
//!
//! # Module Structure
//!
//! - `select`: largest-detection selection over raw detector rows (the core)
//! - `detect`: tensor row decoding and detector backends (tract, stub)
//! - `ingest`: path resolution, directory listing, image decoding
//! - `locate`: the per-image pipeline and batch policy
//! - `report`: output line formatting
//! - `config`: layered configuration (defaults, JSON file, environment)

pub mod config;
pub mod detect;
pub mod error;
pub mod frame;
pub mod ingest;
pub mod locate;
pub mod report;
pub mod select;

pub use config::{LocatorConfig, ModelSettings, MultiFacePolicy, OutputFormat};
pub use detect::{decode_detections, DetectionRecord, DetectorBackend, StubBackend};
pub use error::LocatorError;
pub use frame::Frame;
pub use ingest::{list_images, load_image, Target};
pub use locate::{BatchSummary, Locator, Outcome};
pub use report::Reporter;
pub use select::{select_largest, BoundingBox, FrameDimensions, SelectionResult};
