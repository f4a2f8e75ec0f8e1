//! Camera session: a background worker that owns the hardware and runs the
//! preview → focus → capture cycle.
//!
//! The host side ([`CameraSession`]) only posts [`Command`]s and awaits replies;
//! everything that touches the camera happens on the worker. Results are
//! delivered to the host as [`CameraEvent`]s.

mod worker;

use {
    crate::{
        CameraControl, CameraError, CameraErrorKind, CameraLock, DisplayRotation, ImageSink,
        SessionConfig,
    },
    base::{Mat3, Vec2},
    std::{fmt, path::PathBuf},
    tokio::{
        sync::{OwnedSemaphorePermit, mpsc, oneshot},
        task::{JoinHandle, spawn_blocking},
    },
    worker::{Hardware, Worker},
};

/// Identifies one take-picture cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureState {
    #[default]
    Preview,
    Focusing(RequestId),
    Capturing(RequestId),
}

/// Answer to a take-picture request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureRequest {
    /// A new cycle started and is now focusing.
    Started(RequestId),
    /// A cycle is already running; the request was ignored.
    Busy(CaptureState),
}

/// What the UI surface reports about itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayInfo {
    /// Size of the preview view; also the desired preview size.
    pub viewport: Vec2<u32>,
    /// Size of the whole display; bounds the preview size.
    pub display_size: Vec2<u32>,
    pub rotation: DisplayRotation,
    pub landscape: bool,
}

/// Notifications delivered to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraEvent {
    /// A fatal error; sent once per failure.
    Error(CameraErrorKind),
    ImageTaken(PathBuf),
    /// Preview size in view orientation: swapped when the device is in portrait.
    ResolvedPreviewSize { width: u32, height: u32 },
    TransformChanged(Mat3<f32>),
}

pub(crate) enum Command {
    TakePicture {
        reply: oneshot::Sender<Result<PictureRequest, CameraError>>,
    },
    State {
        reply: oneshot::Sender<CaptureState>,
    },
    UpdateDisplay(DisplayInfo),
    FocusComplete {
        request: RequestId,
        success: bool,
    },
    CaptureComplete {
        request: RequestId,
        result: Result<Vec<u8>, CameraError>,
    },
    SaveComplete {
        request: RequestId,
        result: Result<PathBuf, CameraError>,
    },
    Close {
        permit: Option<OwnedSemaphorePermit>,
    },
    Shutdown,
}

struct WorkerHandle {
    commands: mpsc::UnboundedSender<Command>,
    join_handle: JoinHandle<Hardware>,
}

/// Host-side handle of one camera binding.
///
/// The worker exists only while the session is open: [`open`](Self::open)
/// spawns it and [`close`](Self::close) joins it, handing the hardware back
/// so the session can be opened again.
pub struct CameraSession {
    config: SessionConfig,
    lock: CameraLock,
    hardware: Option<Hardware>,
    events: mpsc::UnboundedSender<CameraEvent>,
    worker: Option<WorkerHandle>,
}

impl CameraSession {
    /// Create a closed session. Events arrive on the returned receiver.
    pub fn new(
        config: SessionConfig,
        control: impl CameraControl + 'static,
        sink: impl ImageSink + 'static,
    ) -> (Self, mpsc::UnboundedReceiver<CameraEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let session = Self {
            config,
            lock: CameraLock::new(),
            hardware: Some(Hardware {
                control: Box::new(control),
                sink: Box::new(sink),
            }),
            events,
            worker: None,
        };
        (session, receiver)
    }

    /// Share an exclusive-access lock with other sessions over the same camera.
    pub fn with_lock(mut self, lock: CameraLock) -> Self {
        self.lock = lock;
        self
    }

    pub fn is_active(&self) -> bool {
        self.worker.is_some()
    }

    fn emit_error(&self, error: &CameraError) {
        log::error!("Camera error: {}", error);
        if self.events.send(CameraEvent::Error(error.kind())).is_err() {
            log::debug!("Event receiver dropped");
        }
    }

    /// Open the camera, configure sizes and rotation and start the preview.
    ///
    /// Returns once the preview is running or the attempt failed. Failures are
    /// also reported once as [`CameraEvent::Error`]. Opening an open session
    /// only logs a warning.
    pub async fn open(&mut self, display: DisplayInfo) -> Result<(), CameraError> {
        if self.worker.is_some() {
            log::warn!("Camera is already opened. Did you really mean to open the camera again?");
            return Ok(());
        }
        let Some(hardware) = self.hardware.take() else {
            let error = CameraError::Device("camera control was lost by a failed worker".to_string());
            self.emit_error(&error);
            return Err(error);
        };

        let permit = match self.lock.acquire_timeout(self.config.lock_timeout()).await {
            Ok(permit) => permit,
            Err(error) => {
                self.hardware = Some(hardware);
                self.emit_error(&error);
                return Err(error);
            }
        };

        let (commands, receiver) = mpsc::unbounded_channel();
        let (init_tx, init_rx) = oneshot::channel();
        let worker = Worker::new(
            hardware,
            self.config.clone(),
            display,
            self.events.clone(),
            commands.clone(),
        );
        let join_handle = spawn_blocking(move || worker.run(permit, receiver, init_tx));

        match init_rx.await {
            Ok(Ok(())) => {
                self.worker = Some(WorkerHandle {
                    commands,
                    join_handle,
                });
                Ok(())
            }
            Ok(Err(error)) => {
                // the worker already reported the error and is on its way out
                self.reclaim(join_handle).await;
                Err(error)
            }
            Err(_) => {
                self.reclaim(join_handle).await;
                let error = CameraError::Channel("camera worker died during open".to_string());
                self.emit_error(&error);
                Err(error)
            }
        }
    }

    async fn reclaim(&mut self, join_handle: JoinHandle<Hardware>) {
        match join_handle.await {
            Ok(hardware) => self.hardware = Some(hardware),
            Err(error) => log::error!("Camera worker failed: {}", error),
        }
    }

    /// Stop the preview, release the camera and join the worker.
    ///
    /// Waits for the exclusive-access permit without a deadline. Closing a
    /// closed session only logs a warning.
    pub async fn close(&mut self) {
        let Some(worker) = self.worker.take() else {
            log::warn!("Camera already closed. Did you really mean to close the camera again?");
            return;
        };
        let permit = match self.lock.acquire().await {
            Ok(permit) => Some(permit),
            Err(error) => {
                log::error!("Closing without the camera lock: {}", error);
                None
            }
        };
        if worker.commands.send(Command::Close { permit }).is_err() {
            log::debug!("Camera worker already stopped");
        }
        self.reclaim(worker.join_handle).await;
    }

    fn commands(&self) -> Result<&mpsc::UnboundedSender<Command>, CameraError> {
        self.worker
            .as_ref()
            .map(|worker| &worker.commands)
            .ok_or(CameraError::NotOpen)
    }

    fn send(&self, command: Command) -> Result<(), CameraError> {
        self.commands()?
            .send(command)
            .map_err(|_| CameraError::Channel("camera worker stopped".to_string()))
    }

    /// Start a focus → capture → save cycle.
    ///
    /// While a cycle is running this is a no-op answered with
    /// [`PictureRequest::Busy`].
    pub async fn take_picture(&self) -> Result<PictureRequest, CameraError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::TakePicture { reply })?;
        response
            .await
            .map_err(|_| CameraError::Channel("camera worker dropped the request".to_string()))?
    }

    /// Snapshot of the capture state machine.
    pub async fn state(&self) -> Result<CaptureState, CameraError> {
        let (reply, response) = oneshot::channel();
        self.send(Command::State { reply })?;
        response
            .await
            .map_err(|_| CameraError::Channel("camera worker dropped the request".to_string()))
    }

    /// Report a new viewport or display rotation; the transform is recomputed.
    pub fn update_display(&self, display: DisplayInfo) -> Result<(), CameraError> {
        self.send(Command::UpdateDisplay(display))
    }
}

/// Sends [`Command::Shutdown`] unless disarmed, so the worker always stops.
struct ShutdownGuard(Option<mpsc::UnboundedSender<Command>>);

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        if let Some(commands) = self.0.take() {
            let _ = commands.send(Command::Shutdown);
        }
    }
}

/// Dropping an open session closes it without joining the worker.
///
/// Inside a tokio runtime the close waits for the exclusive-access permit
/// like [`close`](CameraSession::close) does, on a detached task. Outside a
/// runtime, or if that task is cancelled, the worker is shut down without
/// the permit.
impl Drop for CameraSession {
    fn drop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        let mut guard = ShutdownGuard(Some(worker.commands));
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let lock = self.lock.clone();
        runtime.spawn(async move {
            let permit = match lock.acquire().await {
                Ok(permit) => Some(permit),
                Err(error) => {
                    log::error!("Closing without the camera lock: {}", error);
                    None
                }
            };
            if let Some(commands) = guard.0.take() {
                if commands.send(Command::Close { permit }).is_err() {
                    log::debug!("Camera worker already stopped");
                }
            }
        });
    }
}
