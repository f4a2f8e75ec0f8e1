use {
    crate::CameraError,
    base::Vec2,
    std::fmt,
};

/// Width/height pair reported by the sensor. Both dimensions are strictly positive.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution {
    width: u32,
    height: u32,
}

impl Resolution {
    pub fn new(width: i64, height: i64) -> Result<Self, CameraError> {
        if width <= 0 || height <= 0 || width > u32::MAX as i64 || height > u32::MAX as i64 {
            return Err(CameraError::InvalidResolution { width, height });
        }
        Ok(Self {
            width: width as u32,
            height: height as u32,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Larger dimension over smaller dimension, always `>= 1.0`.
    pub fn ratio(&self) -> f64 {
        let (long, short) = if self.width >= self.height {
            (self.width, self.height)
        } else {
            (self.height, self.width)
        };
        long as f64 / short as f64
    }

    /// Exact ratio equality by cross-multiplication: `self.w / self.h == other.w / other.h`.
    pub fn same_ratio(&self, other: &Resolution) -> bool {
        self.height as u64 * other.width as u64 == self.width as u64 * other.height as u64
    }

    /// Whether this resolution fits inside `bound` on both axes.
    pub fn fits_within(&self, bound: Vec2<u32>) -> bool {
        self.width <= bound.x && self.height <= bound.y
    }

    /// Whether this resolution covers `desired` on both axes.
    pub fn covers(&self, desired: Vec2<u32>) -> bool {
        self.width >= desired.x && self.height >= desired.y
    }

    pub fn swapped(&self) -> Resolution {
        Resolution {
            width: self.height,
            height: self.width,
        }
    }

    pub fn size(&self) -> Vec2<u32> {
        Vec2::new(self.width, self.height)
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
