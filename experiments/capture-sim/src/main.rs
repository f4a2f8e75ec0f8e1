//! Drives a capture session against a simulated camera and writes the
//! pictures into the directory given on the command line. Logs go to
//! stdout, or to day files in the optional log directory.

use {
    anyhow::{Context, Result, bail},
    base::{Vec2, log},
    capture::{
        CameraControl, CameraDescriptor, CameraDevice, CameraError, CameraEvent, CameraParameters,
        CameraSession, Completion, DisplayInfo, DisplayRotation, Facing, FileImageSink,
        PictureRequest, Resolution, SessionConfig,
    },
    std::{thread, time::Duration},
    tokio::sync::mpsc::UnboundedReceiver,
};

const FOCUS_TIME: Duration = Duration::from_millis(150);
const EXPOSURE_TIME: Duration = Duration::from_millis(80);

struct SimControl;

impl CameraControl for SimControl {
    fn enumerate_cameras(&mut self) -> Result<Vec<CameraDescriptor>, CameraError> {
        Ok(vec![
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
        ])
    }

    fn open(&mut self, id: u32, desired: Vec2<u32>) -> Result<Box<dyn CameraDevice>, CameraError> {
        log::info!("sim: opening camera {} for a {}x{} view", id, desired.x, desired.y);
        Ok(Box::new(SimDevice { parameters: None }))
    }
}

struct SimDevice {
    parameters: Option<CameraParameters>,
}

impl CameraDevice for SimDevice {
    fn supported_resolutions(&mut self) -> Result<Vec<Resolution>, CameraError> {
        [(4032, 3024), (1920, 1080), (1440, 1080), (1280, 720), (640, 480)]
            .into_iter()
            .map(|(w, h)| Resolution::new(w, h))
            .collect()
    }

    fn set_parameters(&mut self, parameters: &CameraParameters) -> Result<(), CameraError> {
        log::info!(
            "sim: picture {}, rotation {}, quality {}",
            parameters.picture_size,
            parameters.rotation,
            parameters.jpeg_quality
        );
        self.parameters = Some(*parameters);
        Ok(())
    }

    fn start_preview(&mut self) -> Result<(), CameraError> {
        log::info!("sim: preview running");
        Ok(())
    }

    fn stop_preview(&mut self) {
        log::info!("sim: preview stopped");
    }

    fn auto_focus(&mut self, done: Completion<bool>) {
        thread::spawn(move || {
            thread::sleep(FOCUS_TIME);
            done.complete(true);
        });
    }

    fn capture(&mut self, done: Completion<Result<Vec<u8>, CameraError>>) {
        let Some(parameters) = self.parameters else {
            done.complete(Err(CameraError::Device("capture before configuration".to_string())));
            return;
        };
        thread::spawn(move || {
            thread::sleep(EXPOSURE_TIME);
            // SOI, a comment segment naming the shot, EOI
            let comment = format!("{} rot {}", parameters.picture_size, parameters.rotation);
            let length = (comment.len() + 2) as u16;
            let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xFE];
            jpeg.extend_from_slice(&length.to_be_bytes());
            jpeg.extend_from_slice(comment.as_bytes());
            jpeg.extend_from_slice(&[0xFF, 0xD9]);
            done.complete(Ok(jpeg));
        });
    }

    fn release(&mut self) {
        log::info!("sim: camera released");
    }
}

async fn wait_for_picture(events: &mut UnboundedReceiver<CameraEvent>) -> Result<()> {
    loop {
        let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
            .await
            .context("no picture within 5 seconds")?
            .context("session dropped its event channel")?;
        match event {
            CameraEvent::ImageTaken(path) => {
                println!("Saved {}", path.display());
                return Ok(());
            }
            CameraEvent::Error(kind) => bail!("camera error: {}", kind),
            other => log::info!("event: {:?}", other),
        }
    }
}

fn program_name(args: &[String]) -> &str {
    args.first().map_or("capture-sim", String::as_str)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <output-dir> [log-dir]", program_name(&args));
        std::process::exit(1);
    }
    match args.get(2) {
        Some(log_dir) => base::init_file_logger(log_dir)?,
        None => base::init_stdout_logger(),
    }

    let config = SessionConfig::builder()
        .with_storage_dir(&args[1])
        .with_aspect_ratio(16.0 / 9.0)
        .with_aspect_ratio_tolerance(0.01)
        .with_jpeg_quality(90)
        .build()?;
    let (mut session, mut events) = CameraSession::new(config, SimControl, FileImageSink);

    let portrait = DisplayInfo {
        viewport: Vec2::new(1080, 1920),
        display_size: Vec2::new(1080, 2340),
        rotation: DisplayRotation::Rotation0,
        landscape: false,
    };
    session.open(portrait).await?;

    match session.take_picture().await? {
        PictureRequest::Started(request) => log::info!("picture {} started", request),
        PictureRequest::Busy(state) => bail!("fresh session is busy: {:?}", state),
    }
    // a second press while focusing is ignored
    if let PictureRequest::Busy(state) = session.take_picture().await? {
        println!("Busy while {:?}", state);
    }
    wait_for_picture(&mut events).await?;

    let landscape = DisplayInfo {
        viewport: Vec2::new(1920, 1080),
        display_size: Vec2::new(2340, 1080),
        rotation: DisplayRotation::Rotation90,
        landscape: true,
    };
    session.update_display(landscape)?;
    session.take_picture().await?;
    wait_for_picture(&mut events).await?;

    session.close().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_name_without_argv() {
        assert_eq!(program_name(&[]), "capture-sim");
        assert_eq!(program_name(&["./sim".to_string()]), "./sim");
    }
}
