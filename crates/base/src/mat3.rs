use std::ops::{Add, Mul};

use crate::{Rect, Vec2, Vec3};

/// Column-major 3×3 matrix.
///
/// `Mat3<f32>` doubles as a 2D affine transform: the third column holds the
/// translation and points are multiplied as `(x, y, 1)`. The `post_*` helpers
/// compose a new operation *after* the existing one, i.e. `op * self`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3<T> {
    pub cols: [Vec3<T>; 3],
}

impl<T> Mat3<T> {
    pub const fn from_cols(c0: Vec3<T>, c1: Vec3<T>, c2: Vec3<T>) -> Self {
        Self { cols: [c0, c1, c2] }
    }
}

impl Mat3<f32> {
    pub const fn identity() -> Self {
        Self::from_cols(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    pub const fn translation(tx: f32, ty: f32) -> Self {
        Self::from_cols(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(tx, ty, 1.0),
        )
    }

    pub const fn scaling(sx: f32, sy: f32) -> Self {
        Self::from_cols(
            Vec3::new(sx, 0.0, 0.0),
            Vec3::new(0.0, sy, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    /// Rotation about the origin. Quarter turns are exact.
    pub fn rotation(degrees: f32) -> Self {
        let (sin, cos) = sin_cos_degrees(degrees);
        Self::from_cols(
            Vec3::new(cos, sin, 0.0),
            Vec3::new(-sin, cos, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    /// Map `src` onto `dst`, scaling each axis independently so the
    /// rectangles coincide exactly.
    pub fn rect_to_rect(src: Rect<f32>, dst: Rect<f32>) -> Self {
        let sx = dst.size.x / src.size.x;
        let sy = dst.size.y / src.size.y;
        Self::from_cols(
            Vec3::new(sx, 0.0, 0.0),
            Vec3::new(0.0, sy, 0.0),
            Vec3::new(
                dst.origin.x - src.origin.x * sx,
                dst.origin.y - src.origin.y * sy,
                1.0,
            ),
        )
    }

    pub fn post_scale_about(self, sx: f32, sy: f32, pivot: Vec2<f32>) -> Self {
        about(pivot, Self::scaling(sx, sy)) * self
    }

    pub fn post_rotate_about(self, degrees: f32, pivot: Vec2<f32>) -> Self {
        about(pivot, Self::rotation(degrees)) * self
    }

    pub fn transform_point(&self, point: Vec2<f32>) -> Vec2<f32> {
        let v = *self * Vec3::new(point.x, point.y, 1.0);
        Vec2::new(v.x, v.y)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.cols.iter().zip(other.cols.iter()).all(|(a, b)| {
            (a.x - b.x).abs() <= epsilon
                && (a.y - b.y).abs() <= epsilon
                && (a.z - b.z).abs() <= epsilon
        })
    }
}

fn about(pivot: Vec2<f32>, op: Mat3<f32>) -> Mat3<f32> {
    Mat3::translation(pivot.x, pivot.y) * op * Mat3::translation(-pivot.x, -pivot.y)
}

fn sin_cos_degrees(degrees: f32) -> (f32, f32) {
    let normalized = degrees.rem_euclid(360.0);
    if normalized == 0.0 {
        (0.0, 1.0)
    } else if normalized == 90.0 {
        (1.0, 0.0)
    } else if normalized == 180.0 {
        (0.0, -1.0)
    } else if normalized == 270.0 {
        (-1.0, 0.0)
    } else {
        normalized.to_radians().sin_cos()
    }
}

// Mat3 * Vec3
impl<T: Mul<Output = T> + Add<Output = T> + Copy> Mul<Vec3<T>> for Mat3<T> {
    type Output = Vec3<T>;
    fn mul(self, v: Vec3<T>) -> Vec3<T> {
        self.cols[0] * v.x + self.cols[1] * v.y + self.cols[2] * v.z
    }
}

// Mat3 * Mat3
impl<T: Mul<Output = T> + Add<Output = T> + Copy> Mul<Mat3<T>> for Mat3<T> {
    type Output = Self;
    fn mul(self, rhs: Mat3<T>) -> Self {
        Self::from_cols(self * rhs.cols[0], self * rhs.cols[1], self * rhs.cols[2])
    }
}
