//! Axis-separated collision resolution
//!
//! Movement is corrected one axis at a time: apply the X delta and resolve,
//! then the Y delta and resolve. This sidesteps diagonal-corner ambiguity
//! and keeps each correction a single edge alignment. The resolver snaps to
//! the FIRST overlapping obstacle in stored order, not the nearest; group
//! order is the grid scan order, so the tie-break is deterministic.

use super::rect::Rect;

/// Resolution axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Anything with a coarse axis-aligned bounding rectangle.
///
/// The single seam between entities and collision math; a pixel-mask
/// refinement would extend this trait without touching callers.
pub trait Bounds {
    fn bounds(&self) -> Rect;
}

impl Bounds for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Move `rect` by `delta` along `axis` and resolve against `obstacles`.
///
/// On overlap the rect is snapped flush to the hit obstacle: a positive
/// delta aligns the trailing edge to the obstacle's leading edge, otherwise
/// the leading edge to the obstacle's trailing edge. Returns the index of
/// the hit obstacle so callers can react (e.g. reverse velocity).
pub fn move_and_resolve<B: Bounds>(
    rect: &mut Rect,
    axis: Axis,
    delta: i32,
    obstacles: &[B],
) -> Option<usize> {
    match axis {
        Axis::X => rect.x += delta,
        Axis::Y => rect.y += delta,
    }

    let hit = obstacles.iter().position(|o| rect.overlaps(&o.bounds()))?;
    let wall = obstacles[hit].bounds();

    match axis {
        Axis::X => {
            if delta > 0 {
                rect.set_right(wall.left());
            } else {
                rect.set_left(wall.right());
            }
        }
        Axis::Y => {
            if delta > 0 {
                rect.set_bottom(wall.top());
            } else {
                rect.set_top(wall.bottom());
            }
        }
    }

    Some(hit)
}

/// Index of the first group member overlapping `rect`, in stored order
pub fn first_hit<B: Bounds>(rect: &Rect, group: &[B]) -> Option<usize> {
    group.iter().position(|m| rect.overlaps(&m.bounds()))
}
