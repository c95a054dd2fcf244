mod backend;
pub mod backends;
mod record;
mod resize;

pub use backend::DetectorBackend;
pub use backends::StubBackend;
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use record::{decode_detections, DetectionRecord, ROW_LEN};
pub use resize::resize_linear;
