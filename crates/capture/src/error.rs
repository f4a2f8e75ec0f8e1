use std::{fmt, time::Duration};

/// Machine-readable kind carried by [`CameraEvent::Error`](crate::CameraEvent::Error).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraErrorKind {
    /// The device has no camera capability, or the camera refused to open.
    MissingHardwareFeature,
    /// Enumeration found no cameras.
    NoCamerasAvailable,
    /// Anything else that stopped the camera from being configured,
    /// including a timed-out exclusive-access permit.
    CameraConfiguration,
}

impl fmt::Display for CameraErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraErrorKind::MissingHardwareFeature => write!(f, "missing hardware feature"),
            CameraErrorKind::NoCamerasAvailable => write!(f, "no cameras available"),
            CameraErrorKind::CameraConfiguration => write!(f, "camera configuration"),
        }
    }
}

#[derive(Debug)]
pub enum CameraError {
    InvalidConfig(String),
    InvalidResolution { width: i64, height: i64 },
    MissingHardwareFeature,
    NoCamerasAvailable,
    LockTimeout(Duration),
    NotOpen,
    Device(String),
    Channel(String),
    Io(std::io::Error),
}

impl CameraError {
    pub fn kind(&self) -> CameraErrorKind {
        match self {
            CameraError::MissingHardwareFeature => CameraErrorKind::MissingHardwareFeature,
            CameraError::NoCamerasAvailable => CameraErrorKind::NoCamerasAvailable,
            _ => CameraErrorKind::CameraConfiguration,
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            CameraError::InvalidResolution { width, height } => {
                write!(f, "invalid resolution {width}x{height}")
            }
            CameraError::MissingHardwareFeature => write!(f, "camera hardware feature missing"),
            CameraError::NoCamerasAvailable => write!(f, "no cameras available"),
            CameraError::LockTimeout(timeout) => {
                write!(f, "timed out after {timeout:?} waiting for camera access")
            }
            CameraError::NotOpen => write!(f, "camera is not open"),
            CameraError::Device(msg) => write!(f, "device error: {msg}"),
            CameraError::Channel(msg) => write!(f, "channel error: {msg}"),
            CameraError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for CameraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CameraError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        CameraError::Io(err)
    }
}
