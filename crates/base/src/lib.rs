//! Shared geometry and logging for the capture workspace.

pub mod logging;
pub use logging::{FileLogger, StdoutLogger, init_file_logger, init_stdout_logger};

mod mat3;
pub use mat3::*;

mod rect;
pub use rect::*;

mod vec2;
pub use vec2::*;

mod vec3;
pub use vec3::*;

// Re-export so downstream crates can `use base::log`
pub use log;
