//! Axis-aligned integer rectangles
//!
//! All entity hitboxes are 32x32 rects in whole world units. Edge setters
//! move the rect (size is fixed), which is what collision correction needs:
//! `set_right(wall.left())` lands the rect flush against the wall.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Left edge
    pub fn left(&self) -> i32 {
        self.x
    }

    /// Right edge (exclusive)
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Top edge
    pub fn top(&self) -> i32 {
        self.y
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Rectangle origin as a point
    pub fn pos(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: i32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.h;
    }

    /// Strict overlap test: rects sharing only an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Move the rect the minimum distance to lie fully inside
    /// `[0, width) x [0, height)`
    pub fn clamp_to(&mut self, width: i32, height: i32) {
        self.x = self.x.clamp(0, width - self.w);
        self.y = self.y.clamp(0, height - self.h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_strict() {
        let a = Rect::new(0, 0, 32, 32);
        let b = Rect::new(31, 0, 32, 32);
        assert!(a.overlaps(&b));

        // Touching edges is not an overlap
        let c = Rect::new(32, 0, 32, 32);
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_edge_setters_move_rect() {
        let mut r = Rect::new(10, 20, 32, 32);
        r.set_right(64);
        assert_eq!(r.x, 32);
        r.set_bottom(32);
        assert_eq!(r.y, 0);
        assert_eq!((r.w, r.h), (32, 32));
    }

    #[test]
    fn test_clamp_to_screen() {
        let mut r = Rect::new(-5, 600, 32, 32);
        r.clamp_to(800, 608);
        assert_eq!((r.x, r.y), (0, 608 - 32));

        let mut inside = Rect::new(100, 100, 32, 32);
        inside.clamp_to(800, 608);
        assert_eq!((inside.x, inside.y), (100, 100));
    }
}
