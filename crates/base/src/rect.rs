use std::ops::{Add, Div, Mul, Sub};

use crate::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T> {
    pub origin: Vec2<T>,
    pub size: Vec2<T>,
}

impl<T: Default> Default for Rect<T> {
    fn default() -> Self {
        Self {
            origin: Vec2::zero(),
            size: Vec2::zero(),
        }
    }
}

impl<T> Rect<T> {
    pub const fn new(origin: Vec2<T>, size: Vec2<T>) -> Self {
        Self { origin, size }
    }
}

impl<T: Default> Rect<T> {
    /// Rectangle anchored at the origin.
    pub fn from_size(size: Vec2<T>) -> Self {
        Self {
            origin: Vec2::zero(),
            size,
        }
    }
}

impl<T: Add<Output = T> + Copy> Rect<T> {
    pub fn max(&self) -> Vec2<T> {
        self.origin + self.size
    }

    /// Same size, origin moved by `delta`.
    pub fn offset(self, delta: Vec2<T>) -> Self {
        Self {
            origin: self.origin + delta,
            size: self.size,
        }
    }
}

impl<T: Mul<Output = T> + Copy> Rect<T> {
    pub fn area(&self) -> T {
        self.size.x * self.size.y
    }
}

impl<T: Add<Output = T> + Div<Output = T> + Copy + From<u8>> Rect<T> {
    pub fn center(&self) -> Vec2<T> {
        let two: T = T::from(2u8);
        Vec2::new(
            self.origin.x + self.size.x / two,
            self.origin.y + self.size.y / two,
        )
    }
}

impl<T: Add<Output = T> + Sub<Output = T> + Div<Output = T> + Copy + From<u8>> Rect<T> {
    /// Move this rectangle so its center lands on `center`.
    pub fn centered_on(self, center: Vec2<T>) -> Self {
        self.offset(center - self.center())
    }
}
