// src/utils/geometry.rs
use crate::bsp::{Point2D, Seg};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn between(from: &Point2D, to: &Point2D) -> Self {
        Self::new(to.x - from.x, to.y - from.y)
    }

    pub fn of_seg(seg: &Seg) -> Self {
        Self::between(&seg.start, &seg.end)
    }

    pub fn dot(&self, other: &Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(&self, other: &Vector2D) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector, or `self` unchanged when the length is zero.
    pub fn normalize(&self) -> Vector2D {
        let length = self.length();
        if length == 0.0 {
            return *self;
        }
        Vector2D::new(self.x / length, self.y / length)
    }

    /// Scalar projection of `p` onto this direction.
    pub fn project(&self, p: &Point2D) -> f64 {
        self.x * p.x + self.y * p.y
    }
}
