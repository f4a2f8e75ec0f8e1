//! Collaborator interfaces: camera hardware and image persistence.
//!
//! Every method here is called from the session's background worker only.
//! Long-running operations report back through a [`Completion`], which may be
//! completed from any thread, immediately or later.

use {
    crate::{
        CameraError, Resolution,
        session::{Command, RequestId},
    },
    base::Vec2,
    std::{
        fs,
        path::{Path, PathBuf},
    },
    tokio::sync::mpsc,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    #[default]
    Back,
    Front,
}

/// One camera as reported by enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraDescriptor {
    pub id: u32,
    pub facing: Facing,
    /// Physical rotation of the sensor relative to the device's natural orientation.
    pub mount_angle: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraParameters {
    pub picture_size: Resolution,
    /// Rotation applied to both the display orientation and saved pictures.
    pub rotation: u32,
    pub jpeg_quality: u8,
}

/// One-shot handle for reporting the result of an asynchronous hardware call.
///
/// Results that arrive after the session closed, or after the request they
/// belong to was abandoned, are dropped.
pub struct Completion<T> {
    request: RequestId,
    commands: mpsc::UnboundedSender<Command>,
    wrap: fn(RequestId, T) -> Command,
}

impl<T> Completion<T> {
    pub(crate) fn new(
        request: RequestId,
        commands: mpsc::UnboundedSender<Command>,
        wrap: fn(RequestId, T) -> Command,
    ) -> Self {
        Self {
            request,
            commands,
            wrap,
        }
    }

    pub fn request(&self) -> RequestId {
        self.request
    }

    pub fn complete(self, value: T) {
        if self.commands.send((self.wrap)(self.request, value)).is_err() {
            log::debug!("Session closed, discarding result for request {}", self.request);
        }
    }
}

impl<T> std::fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("request", &self.request)
            .finish()
    }
}

/// Entry point to the platform camera stack.
pub trait CameraControl: Send {
    /// Whether the platform has any camera capability at all.
    fn has_camera_feature(&self) -> bool {
        true
    }

    fn enumerate_cameras(&mut self) -> Result<Vec<CameraDescriptor>, CameraError>;

    fn open(&mut self, id: u32, desired: Vec2<u32>) -> Result<Box<dyn CameraDevice>, CameraError>;
}

/// An opened camera.
pub trait CameraDevice: Send {
    fn supported_resolutions(&mut self) -> Result<Vec<Resolution>, CameraError>;

    fn set_parameters(&mut self, parameters: &CameraParameters) -> Result<(), CameraError>;

    fn start_preview(&mut self) -> Result<(), CameraError>;

    fn stop_preview(&mut self);

    /// Start autofocus; report whether focus succeeded.
    fn auto_focus(&mut self, done: Completion<bool>);

    /// Take a picture; report the encoded bytes.
    fn capture(&mut self, done: Completion<Result<Vec<u8>, CameraError>>);

    /// Release the hardware. The device is dropped right after.
    fn release(&mut self);
}

/// Persists captured images.
pub trait ImageSink: Send {
    fn save(&mut self, data: Vec<u8>, path: PathBuf, done: Completion<Result<PathBuf, CameraError>>);
}

/// Writes images straight to the filesystem, creating parent directories.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageSink;

impl FileImageSink {
    fn write(data: &[u8], path: &Path) -> Result<(), CameraError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, data)?;
        Ok(())
    }
}

impl ImageSink for FileImageSink {
    fn save(&mut self, data: Vec<u8>, path: PathBuf, done: Completion<Result<PathBuf, CameraError>>) {
        let result = Self::write(&data, &path).map(|()| path);
        done.complete(result);
    }
}
