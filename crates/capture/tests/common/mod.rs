#![allow(dead_code)]

use {
    base::Vec2,
    capture::{
        CameraControl, CameraDescriptor, CameraDevice, CameraError, CameraParameters, Completion,
        DisplayInfo, DisplayRotation, Facing, ImageSink, RequestId, Resolution,
    },
    std::{
        path::PathBuf,
        sync::{Arc, Mutex},
        time::Duration,
    },
};

pub const JPEG_BYTES: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xD9];

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Enumerate,
    Open(u32, Vec2<u32>),
    SupportedResolutions,
    SetParameters(CameraParameters),
    StartPreview,
    StopPreview,
    AutoFocus(RequestId),
    Capture(RequestId),
    Release,
    Save(PathBuf, usize),
}

/// How the mock hardware behaves.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub has_feature: bool,
    pub cameras: Vec<CameraDescriptor>,
    pub resolutions: Vec<Resolution>,
    pub fail_open: bool,
    pub fail_set_parameters: bool,
    /// `Some(success)` completes autofocus immediately, `None` holds it.
    pub focus: Option<bool>,
    /// Complete captures immediately instead of holding them.
    pub auto_capture: bool,
    pub fail_save: bool,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            has_feature: true,
            cameras: vec![
                CameraDescriptor {
                    id: 0,
                    facing: Facing::Back,
                    mount_angle: 90,
                },
                CameraDescriptor {
                    id: 1,
                    facing: Facing::Front,
                    mount_angle: 270,
                },
            ],
            resolutions: vec![res(1920, 1080), res(1280, 720), res(640, 480)],
            fail_open: false,
            fail_set_parameters: false,
            focus: Some(true),
            auto_capture: true,
            fail_save: false,
        }
    }
}

/// Shared view of what the mocks did, plus any completions they are holding.
#[derive(Clone, Default)]
pub struct Probe {
    calls: Arc<Mutex<Vec<Call>>>,
    focus: Arc<Mutex<Vec<Completion<bool>>>>,
    capture: Arc<Mutex<Vec<Completion<Result<Vec<u8>, CameraError>>>>>,
}

impl Probe {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn take_focus(&self) -> Completion<bool> {
        self.focus.lock().unwrap().pop().expect("no pending focus")
    }

    pub fn take_capture(&self) -> Completion<Result<Vec<u8>, CameraError>> {
        self.capture.lock().unwrap().pop().expect("no pending capture")
    }

    /// Poll until `call` was recorded, for work that finishes after the host stopped waiting.
    pub async fn wait_for(&self, call: &Call) {
        for _ in 0..200 {
            if self.count(call) > 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("{call:?} never happened; calls: {:?}", self.calls());
    }
}

pub struct MockControl {
    pub probe: Probe,
    pub behavior: Behavior,
}

impl CameraControl for MockControl {
    fn has_camera_feature(&self) -> bool {
        self.behavior.has_feature
    }

    fn enumerate_cameras(&mut self) -> Result<Vec<CameraDescriptor>, CameraError> {
        self.probe.record(Call::Enumerate);
        Ok(self.behavior.cameras.clone())
    }

    fn open(&mut self, id: u32, desired: Vec2<u32>) -> Result<Box<dyn CameraDevice>, CameraError> {
        self.probe.record(Call::Open(id, desired));
        if self.behavior.fail_open {
            return Err(CameraError::Device("camera in use".to_string()));
        }
        Ok(Box::new(MockDevice {
            probe: self.probe.clone(),
            behavior: self.behavior.clone(),
        }))
    }
}

pub struct MockDevice {
    probe: Probe,
    behavior: Behavior,
}

impl CameraDevice for MockDevice {
    fn supported_resolutions(&mut self) -> Result<Vec<Resolution>, CameraError> {
        self.probe.record(Call::SupportedResolutions);
        Ok(self.behavior.resolutions.clone())
    }

    fn set_parameters(&mut self, parameters: &CameraParameters) -> Result<(), CameraError> {
        self.probe.record(Call::SetParameters(*parameters));
        if self.behavior.fail_set_parameters {
            return Err(CameraError::Device("setParameters failed".to_string()));
        }
        Ok(())
    }

    fn start_preview(&mut self) -> Result<(), CameraError> {
        self.probe.record(Call::StartPreview);
        Ok(())
    }

    fn stop_preview(&mut self) {
        self.probe.record(Call::StopPreview);
    }

    fn auto_focus(&mut self, done: Completion<bool>) {
        self.probe.record(Call::AutoFocus(done.request()));
        match self.behavior.focus {
            Some(success) => done.complete(success),
            None => self.probe.focus.lock().unwrap().push(done),
        }
    }

    fn capture(&mut self, done: Completion<Result<Vec<u8>, CameraError>>) {
        self.probe.record(Call::Capture(done.request()));
        if self.behavior.auto_capture {
            done.complete(Ok(JPEG_BYTES.to_vec()));
        } else {
            self.probe.capture.lock().unwrap().push(done);
        }
    }

    fn release(&mut self) {
        self.probe.record(Call::Release);
    }
}

pub struct MockSink {
    pub probe: Probe,
    pub fail: bool,
}

impl ImageSink for MockSink {
    fn save(&mut self, data: Vec<u8>, path: PathBuf, done: Completion<Result<PathBuf, CameraError>>) {
        self.probe.record(Call::Save(path.clone(), data.len()));
        if self.fail {
            done.complete(Err(CameraError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only storage",
            ))));
        } else {
            done.complete(Ok(path));
        }
    }
}

pub fn res(width: i64, height: i64) -> Resolution {
    Resolution::new(width, height).unwrap()
}

pub fn mocks(behavior: Behavior) -> (MockControl, MockSink, Probe) {
    let probe = Probe::default();
    let fail_save = behavior.fail_save;
    (
        MockControl {
            probe: probe.clone(),
            behavior,
        },
        MockSink {
            probe: probe.clone(),
            fail: fail_save,
        },
        probe,
    )
}

/// Phone held upright: 720x1280 preview view on a 1080x1920 screen.
pub fn portrait() -> DisplayInfo {
    DisplayInfo {
        viewport: Vec2::new(720, 1280),
        display_size: Vec2::new(1080, 1920),
        rotation: DisplayRotation::Rotation0,
        landscape: false,
    }
}

/// Phone turned a quarter counter-clockwise: 1280x720 view on a 1920x1080 screen.
pub fn landscape() -> DisplayInfo {
    DisplayInfo {
        viewport: Vec2::new(1280, 720),
        display_size: Vec2::new(1920, 1080),
        rotation: DisplayRotation::Rotation90,
        landscape: true,
    }
}
