use {
    crate::CameraError,
    std::{sync::Arc, time::Duration},
    tokio::sync::{OwnedSemaphorePermit, Semaphore},
};

/// Exclusive-access permit for the camera hardware.
///
/// Clones share the same permit, so sessions built over the same physical
/// camera can pass one lock around to keep their open/close sequences apart.
#[derive(Debug, Clone)]
pub struct CameraLock {
    semaphore: Arc<Semaphore>,
}

impl Default for CameraLock {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraLock {
    pub fn new() -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
        }
    }

    /// Wait at most `timeout` for the permit.
    pub async fn acquire_timeout(&self, timeout: Duration) -> Result<OwnedSemaphorePermit, CameraError> {
        match tokio::time::timeout(timeout, Arc::clone(&self.semaphore).acquire_owned()).await {
            Ok(permit) => permit.map_err(|_| CameraError::Channel("camera lock closed".to_string())),
            Err(_) => Err(CameraError::LockTimeout(timeout)),
        }
    }

    /// Wait for the permit with no deadline.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit, CameraError> {
        Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| CameraError::Channel("camera lock closed".to_string()))
    }

    pub fn is_available(&self) -> bool {
        self.semaphore.available_permits() > 0
    }
}
