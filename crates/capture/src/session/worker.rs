use {
    super::{CameraEvent, CaptureState, Command, DisplayInfo, PictureRequest, RequestId},
    crate::{
        CameraControl, CameraDescriptor, CameraDevice, CameraError, CameraParameters, Completion,
        ImageSink, Resolution, SessionConfig, compute_transform,
        orientation::OrientationContext,
        selector::{choose_optimal, filter_aspect, largest},
    },
    std::path::PathBuf,
    tokio::sync::{OwnedSemaphorePermit, mpsc, oneshot},
};

/// Collaborators moved into the worker while the session is open.
pub(crate) struct Hardware {
    pub(crate) control: Box<dyn CameraControl>,
    pub(crate) sink: Box<dyn ImageSink>,
}

struct BoundCamera {
    device: Box<dyn CameraDevice>,
    descriptor: CameraDescriptor,
    picture_size: Resolution,
    preview_size: Resolution,
    rotation: u32,
}

pub(crate) struct Worker {
    hardware: Hardware,
    config: SessionConfig,
    display: DisplayInfo,
    events: mpsc::UnboundedSender<CameraEvent>,
    commands: mpsc::UnboundedSender<Command>,
    camera: Option<BoundCamera>,
    state: CaptureState,
    next_request: u64,
}

impl Worker {
    pub(crate) fn new(
        hardware: Hardware,
        config: SessionConfig,
        display: DisplayInfo,
        events: mpsc::UnboundedSender<CameraEvent>,
        commands: mpsc::UnboundedSender<Command>,
    ) -> Self {
        Self {
            hardware,
            config,
            display,
            events,
            commands,
            camera: None,
            state: CaptureState::Preview,
            next_request: 0,
        }
    }

    /// Open and configure the camera, report the outcome on `init`, then
    /// serve commands until closed. Hands the collaborators back on exit.
    pub(crate) fn run(
        mut self,
        permit: OwnedSemaphorePermit,
        mut receiver: mpsc::UnboundedReceiver<Command>,
        init: oneshot::Sender<Result<(), CameraError>>,
    ) -> Hardware {
        let started = self
            .open_camera(permit)
            .and_then(|(device, descriptor)| self.bind(device, descriptor));
        if let Err(error) = started {
            log::error!("Failed to start camera: {}", error);
            self.release_camera();
            self.emit(CameraEvent::Error(error.kind()));
            let _ = init.send(Err(error));
            return self.hardware;
        }
        let _ = init.send(Ok(()));

        while let Some(command) = receiver.blocking_recv() {
            match command {
                Command::TakePicture { reply } => {
                    let _ = reply.send(self.take_picture());
                }
                Command::State { reply } => {
                    let _ = reply.send(self.state);
                }
                Command::UpdateDisplay(display) => self.update_display(display),
                Command::FocusComplete { request, success } => {
                    self.on_focus_complete(request, success)
                }
                Command::CaptureComplete { request, result } => {
                    self.on_capture_complete(request, result)
                }
                Command::SaveComplete { request, result } => self.on_save_complete(request, result),
                Command::Close { permit } => {
                    self.release_camera();
                    drop(permit);
                    break;
                }
                Command::Shutdown => {
                    self.release_camera();
                    break;
                }
            }
        }
        log::debug!("camera worker: stopped");
        self.hardware
    }

    fn emit(&self, event: CameraEvent) {
        if self.events.send(event).is_err() {
            log::debug!("Event receiver dropped");
        }
    }

    fn open_camera(
        &mut self,
        permit: OwnedSemaphorePermit,
    ) -> Result<(Box<dyn CameraDevice>, CameraDescriptor), CameraError> {
        let control = &mut self.hardware.control;
        if !control.has_camera_feature() {
            return Err(CameraError::MissingHardwareFeature);
        }

        let cameras = control.enumerate_cameras()?;
        let wanted = self.config.facing();
        let descriptor = match cameras.iter().find(|camera| camera.facing == wanted) {
            Some(descriptor) => *descriptor,
            None => {
                let first = *cameras.first().ok_or(CameraError::NoCamerasAvailable)?;
                log::warn!(
                    "No {:?} camera available, using camera {} ({:?})",
                    wanted,
                    first.id,
                    first.facing
                );
                first
            }
        };

        let device = control
            .open(descriptor.id, self.display.viewport)
            .map_err(|error| {
                log::error!("Opening camera {} failed: {}", descriptor.id, error);
                CameraError::MissingHardwareFeature
            })?;
        // opening is done, configuration does not need exclusive access
        drop(permit);
        log::info!("Opened camera {} ({:?})", descriptor.id, descriptor.facing);
        Ok((device, descriptor))
    }

    fn orientation(&self, descriptor: &CameraDescriptor) -> OrientationContext {
        OrientationContext {
            display_rotation: self.display.rotation,
            landscape: self.display.landscape,
            sensor_mount_angle: descriptor.mount_angle,
            facing: descriptor.facing,
        }
    }

    fn bind(
        &mut self,
        mut device: Box<dyn CameraDevice>,
        descriptor: CameraDescriptor,
    ) -> Result<(), CameraError> {
        match self.configure(device.as_mut(), &descriptor) {
            Ok((picture_size, preview_size, rotation)) => {
                self.camera = Some(BoundCamera {
                    device,
                    descriptor,
                    picture_size,
                    preview_size,
                    rotation,
                });
                Ok(())
            }
            Err(error) => {
                device.release();
                Err(error)
            }
        }
    }

    /// Apply parameters, publish the preview size and transform, then start
    /// the preview. Returns the picture size, preview size and rotation.
    fn configure(
        &mut self,
        device: &mut dyn CameraDevice,
        descriptor: &CameraDescriptor,
    ) -> Result<(Resolution, Resolution, u32), CameraError> {
        let display = self.display;
        let policy = *self.config.aspect();
        let rotation = self.orientation(descriptor).capture_rotation();

        // sizes are compared in sensor orientation
        let (desired, bound) = if display.landscape {
            (display.viewport, display.display_size)
        } else {
            (display.viewport.swapped(), display.display_size.swapped())
        };
        let bound = bound.min(self.config.max_preview());

        let supported = device.supported_resolutions()?;
        let candidates = filter_aspect(&supported, &policy);
        let picture_size = largest(&candidates)
            .ok_or_else(|| CameraError::Device("camera reports no supported sizes".to_string()))?;

        device.set_parameters(&CameraParameters {
            picture_size,
            rotation,
            jpeg_quality: self.config.jpeg_quality(),
        })?;

        let selection = choose_optimal(&candidates, desired, bound, &picture_size, &policy)
            .ok_or_else(|| CameraError::Device("camera reports no supported sizes".to_string()))?;
        let preview_size = selection.resolution;
        log::info!(
            "Picture size {}, preview size {} ({:?}), rotation {}",
            picture_size,
            preview_size,
            selection.kind,
            rotation
        );

        let reported = if display.landscape {
            preview_size
        } else {
            preview_size.swapped()
        };
        // the view must be sized and transformed before the first frame shows up
        self.emit(CameraEvent::ResolvedPreviewSize {
            width: reported.width(),
            height: reported.height(),
        });
        self.emit(CameraEvent::TransformChanged(compute_transform(
            &preview_size,
            display.viewport,
            display.rotation,
        )));

        device.start_preview()?;
        Ok((picture_size, preview_size, rotation))
    }

    fn update_display(&mut self, display: DisplayInfo) {
        self.display = display;
        let Some(descriptor) = self.camera.as_ref().map(|camera| camera.descriptor) else {
            return;
        };
        let rotation = self.orientation(&descriptor).capture_rotation();
        let jpeg_quality = self.config.jpeg_quality();
        let Some(camera) = self.camera.as_mut() else {
            return;
        };

        if rotation != camera.rotation {
            let parameters = CameraParameters {
                picture_size: camera.picture_size,
                rotation,
                jpeg_quality,
            };
            match camera.device.set_parameters(&parameters) {
                Ok(()) => camera.rotation = rotation,
                Err(error) => log::error!("Failed to update camera rotation: {}", error),
            }
        }

        let transform = compute_transform(&camera.preview_size, display.viewport, display.rotation);
        self.emit(CameraEvent::TransformChanged(transform));
    }

    fn take_picture(&mut self) -> Result<PictureRequest, CameraError> {
        let Some(camera) = self.camera.as_mut() else {
            return Err(CameraError::NotOpen);
        };
        if self.state != CaptureState::Preview {
            log::warn!("Camera is busy ({:?}), ignoring take-picture request", self.state);
            return Ok(PictureRequest::Busy(self.state));
        }

        self.next_request += 1;
        let request = RequestId(self.next_request);
        self.state = CaptureState::Focusing(request);
        log::debug!("request {}: focusing", request);
        camera
            .device
            .auto_focus(Completion::new(request, self.commands.clone(), |request, success| {
                Command::FocusComplete { request, success }
            }));
        Ok(PictureRequest::Started(request))
    }

    fn on_focus_complete(&mut self, request: RequestId, success: bool) {
        if self.state != CaptureState::Focusing(request) {
            log::debug!("Discarding stale focus result for request {}", request);
            return;
        }
        let Some(camera) = self.camera.as_mut() else {
            return;
        };
        if !success {
            log::info!("request {}: focus failed, capturing anyway", request);
        }
        self.state = CaptureState::Capturing(request);
        camera
            .device
            .capture(Completion::new(request, self.commands.clone(), |request, result| {
                Command::CaptureComplete { request, result }
            }));
    }

    fn on_capture_complete(&mut self, request: RequestId, result: Result<Vec<u8>, CameraError>) {
        if self.state != CaptureState::Capturing(request) {
            log::debug!("Discarding stale capture result for request {}", request);
            return;
        }
        match result {
            Ok(data) => {
                let path = self.config.next_image_path();
                log::debug!("request {}: saving {} bytes to {}", request, data.len(), path.display());
                self.hardware.sink.save(
                    data,
                    path,
                    Completion::new(request, self.commands.clone(), |request, result| {
                        Command::SaveComplete { request, result }
                    }),
                );
            }
            Err(error) => {
                log::error!("request {}: capture failed: {}", request, error);
                self.state = CaptureState::Preview;
            }
        }
    }

    fn on_save_complete(&mut self, request: RequestId, result: Result<PathBuf, CameraError>) {
        if self.state != CaptureState::Capturing(request) {
            log::debug!("Discarding stale save result for request {}", request);
            return;
        }
        self.state = CaptureState::Preview;
        match result {
            Ok(path) => self.emit(CameraEvent::ImageTaken(path)),
            Err(error) => log::error!("request {}: saving image failed: {}", request, error),
        }
    }

    fn release_camera(&mut self) {
        self.state = CaptureState::Preview;
        if let Some(mut camera) = self.camera.take() {
            camera.device.stop_preview();
            camera.device.release();
            log::info!("Released camera {}", camera.descriptor.id);
        }
    }
}
