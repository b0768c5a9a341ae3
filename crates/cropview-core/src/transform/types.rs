//! Geometry types shared by the transform and session code.

use serde::{Deserialize, Serialize};

/// A 2D offset or point in viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// The on-screen drawing area the image and crop rectangle are rendered in.
///
/// Fixed for the duration of a crop interaction except on layout change,
/// which replaces the stored size without touching scale or pan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Viewport width in viewport units.
    pub width: f64,
    /// Viewport height in viewport units.
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The crop rectangle, in viewport coordinates.
///
/// Width and height are fixed per session (see `CropConfig`); only the
/// position moves, and only while the rectangle stays fully inside the
/// viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Return a copy shifted by `delta`, size unchanged.
    pub fn translated(&self, delta: Vec2) -> CropRect {
        CropRect::new(self.left + delta.x, self.top + delta.y, self.width, self.height)
    }

    /// Check that the rectangle lies fully inside the viewport.
    pub fn fits_in(&self, viewport: &Viewport) -> bool {
        self.left >= 0.0
            && self.top >= 0.0
            && self.right() <= viewport.width
            && self.bottom() <= viewport.height
    }

    /// Move the rectangle by `delta` if the result stays inside the
    /// viewport. Returns whether the move was applied; a rejected move
    /// leaves the rectangle at its previous position.
    pub fn try_translate(&mut self, delta: Vec2, viewport: &Viewport) -> bool {
        let moved = self.translated(delta);
        if moved.fits_in(viewport) {
            *self = moved;
            true
        } else {
            false
        }
    }
}
