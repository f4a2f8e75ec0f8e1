use {
    crate::{AspectRatioPolicy, CameraError, Facing},
    base::Vec2,
    std::{
        path::{Path, PathBuf},
        time::{Duration, SystemTime, UNIX_EPOCH},
    },
};

const DEFAULT_JPEG_QUALITY: u8 = 100;
const DEFAULT_MAX_PREVIEW: Vec2<u32> = Vec2::new(1920, 1080);
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(2500);

/// Validated configuration for a [`CameraSession`](crate::CameraSession).
#[derive(Clone, Debug)]
pub struct SessionConfig {
    aspect: AspectRatioPolicy,
    output_path: Option<PathBuf>,
    storage_dir: PathBuf,
    facing: Facing,
    jpeg_quality: u8,
    max_preview: Vec2<u32>,
    lock_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            aspect: AspectRatioPolicy::unset(),
            output_path: None,
            storage_dir: std::env::temp_dir(),
            facing: Facing::Back,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_preview: DEFAULT_MAX_PREVIEW,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

impl SessionConfig {
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    pub fn aspect(&self) -> &AspectRatioPolicy {
        &self.aspect
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn max_preview(&self) -> Vec2<u32> {
        self.max_preview
    }

    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// Where the next picture goes: the configured path, or `<storage_dir>/<unix-millis>.jpg`.
    pub fn next_image_path(&self) -> PathBuf {
        match &self.output_path {
            Some(path) => path.clone(),
            None => {
                let millis = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_millis())
                    .unwrap_or(0);
                self.storage_dir.join(format!("{}.jpg", millis))
            }
        }
    }
}

/// Builder for [`SessionConfig`]; validation happens in [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct SessionConfigBuilder {
    aspect_ratio: Option<f64>,
    aspect_ratio_tolerance: f64,
    output_path: Option<PathBuf>,
    storage_dir: Option<PathBuf>,
    facing: Facing,
    jpeg_quality: u8,
    max_preview: Vec2<u32>,
    lock_timeout: Duration,
}

impl Default for SessionConfigBuilder {
    fn default() -> Self {
        Self {
            aspect_ratio: None,
            aspect_ratio_tolerance: 0.0,
            output_path: None,
            storage_dir: None,
            facing: Facing::Back,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            max_preview: DEFAULT_MAX_PREVIEW,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

impl SessionConfigBuilder {
    /// Target ratio as long side over short side, e.g. `4.0 / 3.0`. Must be `>= 1.0`.
    pub fn with_aspect_ratio(mut self, ratio: f64) -> Self {
        self.aspect_ratio = Some(ratio);
        self
    }

    /// Absolute ratio delta still accepted as a match. Must be `>= 0.0`.
    pub fn with_aspect_ratio_tolerance(mut self, tolerance: f64) -> Self {
        self.aspect_ratio_tolerance = tolerance;
        self
    }

    /// Fixed output file for every picture. Must not be empty.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    /// Directory for generated file names when no output path is set.
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    pub fn with_facing(mut self, facing: Facing) -> Self {
        self.facing = facing;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    pub fn with_max_preview(mut self, width: u32, height: u32) -> Self {
        self.max_preview = Vec2::new(width, height);
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<SessionConfig, CameraError> {
        let aspect = AspectRatioPolicy::new(self.aspect_ratio, self.aspect_ratio_tolerance)?;
        if let Some(path) = &self.output_path {
            if path.as_os_str().is_empty() {
                return Err(CameraError::InvalidConfig(
                    "output path cannot be empty".to_string(),
                ));
            }
        }
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(CameraError::InvalidConfig(format!(
                "jpeg quality must be in 1..=100 (got {})",
                self.jpeg_quality
            )));
        }
        if self.max_preview.x == 0 || self.max_preview.y == 0 {
            return Err(CameraError::InvalidConfig(
                "max preview size must be non-zero".to_string(),
            ));
        }
        Ok(SessionConfig {
            aspect,
            output_path: self.output_path,
            storage_dir: self.storage_dir.unwrap_or_else(std::env::temp_dir),
            facing: self.facing,
            jpeg_quality: self.jpeg_quality,
            max_preview: self.max_preview,
            lock_timeout: self.lock_timeout,
        })
    }
}
