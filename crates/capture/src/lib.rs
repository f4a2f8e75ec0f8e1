//! Camera capture pipeline configuration.
//!
//! Given the resolutions a sensor supports, the preview viewport and the
//! display/sensor orientation, this crate picks preview and still-capture
//! sizes, resolves the capture rotation and computes the display transform.
//! [`CameraSession`] drives a camera through open, preview, focus, capture
//! and close on a dedicated background worker.

pub mod aspect;
pub mod config;
pub mod error;
pub mod hardware;
pub mod lock;
pub mod orientation;
pub mod resolution;
pub mod selector;
pub mod session;
pub mod transform;

pub use aspect::{AspectMatch, AspectRatioPolicy};
pub use config::{SessionConfig, SessionConfigBuilder};
pub use error::{CameraError, CameraErrorKind};
pub use hardware::{
    CameraControl, CameraDescriptor, CameraDevice, CameraParameters, Completion, Facing,
    FileImageSink, ImageSink,
};
pub use lock::CameraLock;
pub use orientation::{DisplayRotation, resolve_rotation_degrees};
pub use resolution::Resolution;
pub use selector::{SelectionKind, SizeSelection, choose_optimal, filter_aspect, largest};
pub use session::{
    CameraEvent, CameraSession, CaptureState, DisplayInfo, PictureRequest, RequestId,
};
pub use transform::compute_transform;
