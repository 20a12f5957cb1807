// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch-side types: synthetic touches and the native delegate interfaces.
//!
//! Mouse events reach code written against the engine's touch API through
//! synthetic [`Touch`] values. A touch is a plain owned value: the filter that
//! claims a press keeps it until the matching release and then drops it, so a
//! touch is never shared between two press/release cycles.

use kurbo::{Point, Vec2};

/// A touch point in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Touch {
    start: Point,
    previous: Point,
    current: Point,
}

impl Touch {
    /// A touch that starts, was previously, and is currently at `at`.
    pub fn new(at: Point) -> Self {
        Self {
            start: at,
            previous: at,
            current: at,
        }
    }

    /// Current location.
    pub fn location(&self) -> Point {
        self.current
    }

    /// Location before the most recent move.
    pub fn previous_location(&self) -> Point {
        self.previous
    }

    /// Location where the touch began.
    pub fn start_location(&self) -> Point {
        self.start
    }

    /// Movement since the previous location.
    pub fn delta(&self) -> Vec2 {
        self.current - self.previous
    }

    /// Advance to `to`, keeping the start point.
    pub fn move_to(&mut self, to: Point) {
        self.previous = self.current;
        self.current = to;
    }

    /// Overwrite the current location without touching history.
    ///
    /// Used by touch hooks that remap coordinates before delivery.
    pub fn set_location(&mut self, at: Point) {
        self.current = at;
    }
}

/// Phase of a touch delivery through the native dispatch entry point.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// A touch went down.
    Began,
    /// A touch moved.
    Moved,
    /// A touch was lifted.
    Ended,
    /// A touch was interrupted.
    Cancelled,
    /// Input with no touch meaning, such as scrolling.
    Other,
}

/// Extra information passed alongside a touch to delegates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TouchContext {
    /// True when the touch was synthesized from mouse input.
    pub emulated: bool,
}

/// The engine's native per-node touch handler.
pub trait TouchDelegate {
    /// A touch began on the node. Returns whether the delegate claims it.
    fn touch_began(&mut self, touch: &Touch, context: &TouchContext) -> bool;

    /// A claimed touch moved.
    fn touch_moved(&mut self, touch: &Touch, context: &TouchContext) {
        let _ = (touch, context);
    }

    /// A claimed touch ended.
    fn touch_ended(&mut self, touch: &Touch, context: &TouchContext) {
        let _ = (touch, context);
    }

    /// A claimed touch was cancelled. Emulated touches are cancelled when the
    /// node loses a mouse press it had claimed.
    fn touch_cancelled(&mut self, touch: &Touch, context: &TouchContext) {
        let _ = (touch, context);
    }
}

/// The engine's native scroll handler capability.
pub trait ScrollDelegate {
    /// Scroll by `delta_x` horizontally and `delta_y` vertically.
    fn scroll_wheel(&mut self, delta_x: f64, delta_y: f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_keeps_start_and_shifts_previous() {
        let mut touch = Touch::new(Point::new(1.0, 1.0));
        assert_eq!(touch.delta(), Vec2::ZERO);

        touch.move_to(Point::new(4.0, 5.0));
        touch.move_to(Point::new(6.0, 5.0));
        assert_eq!(touch.start_location(), Point::new(1.0, 1.0));
        assert_eq!(touch.previous_location(), Point::new(4.0, 5.0));
        assert_eq!(touch.location(), Point::new(6.0, 5.0));
        assert_eq!(touch.delta(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn set_location_leaves_history() {
        let mut touch = Touch::new(Point::new(1.0, 1.0));
        touch.set_location(Point::new(9.0, 9.0));
        assert_eq!(touch.previous_location(), Point::new(1.0, 1.0));
        assert_eq!(touch.start_location(), Point::new(1.0, 1.0));
    }
}
