use crate::{CameraError, Resolution};

/// Result of checking a candidate ratio against an [`AspectRatioPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectMatch {
    Match,
    OutOfBounds,
    /// No target ratio configured; callers fall back to exact matching.
    Unset,
}

/// Target aspect ratio (long side over short side) with an absolute tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AspectRatioPolicy {
    ratio: Option<f64>,
    tolerance: f64,
}

impl AspectRatioPolicy {
    /// Policy that never filters.
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn new(ratio: Option<f64>, tolerance: f64) -> Result<Self, CameraError> {
        if let Some(ratio) = ratio {
            if !ratio.is_finite() || ratio < 1.0 {
                return Err(CameraError::InvalidConfig(format!(
                    "aspect ratio must be a finite value >= 1.0 (got {ratio})"
                )));
            }
        }
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(CameraError::InvalidConfig(format!(
                "aspect ratio tolerance must be a finite value >= 0.0 (got {tolerance})"
            )));
        }
        Ok(Self { ratio, tolerance })
    }

    pub fn ratio(&self) -> Option<f64> {
        self.ratio
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn is_set(&self) -> bool {
        self.ratio.is_some()
    }

    pub fn classify(&self, candidate_ratio: f64) -> AspectMatch {
        match self.ratio {
            None => AspectMatch::Unset,
            // bounds use the same arithmetic as callers, so `ratio ± tolerance` matches exactly
            Some(ratio)
                if candidate_ratio >= ratio - self.tolerance
                    && candidate_ratio <= ratio + self.tolerance =>
            {
                AspectMatch::Match
            }
            Some(_) => AspectMatch::OutOfBounds,
        }
    }

    /// Whether `candidate` passes the aspect check: tolerance matching when a
    /// ratio is configured, otherwise exact cross-multiplied equality with `reference`.
    pub fn accepts(&self, candidate: &Resolution, reference: &Resolution) -> bool {
        match self.classify(candidate.ratio()) {
            AspectMatch::Match => true,
            AspectMatch::OutOfBounds => false,
            AspectMatch::Unset => candidate.same_ratio(reference),
        }
    }
}
