// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mouse event values.
//!
//! A [`MouseEvent`] is one pointer occurrence: a click, a move, a scroll, or a
//! hover transition. Everything except the swallowed flag is fixed at
//! construction; [`MouseEvent::set_position`] exists only so the touch bridge
//! can write back a position a touch hook moved.
//!
//! ## Default forwarding
//!
//! After a filter has run its callback, [`MouseEvent::dispatch_default`] hands
//! the event to the node's native handlers:
//!
//! - `Click`: left button only, and only with a synthetic touch. Press calls
//!   `touch_began`, release calls `touch_ended`.
//! - `Move`: only with a synthetic touch and while the node holds the left
//!   button, calls `touch_moved`.
//! - `Scroll`: `scroll_wheel(delta.x, delta.y)` on the node's scroll delegate.
//! - `Hover`: nothing.

use kurbo::{Point, Vec2};

use crate::button::MouseButton;
use crate::host::MouseHost;
use crate::state::MouseAttributes;
use crate::touch::{Touch, TouchContext};

/// Variant-specific payload of a [`MouseEvent`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MouseEventKind {
    /// A button was pressed (`down`) or released.
    Click {
        /// The button.
        button: MouseButton,
        /// Press when true, release when false.
        down: bool,
    },
    /// The pointer moved.
    Move,
    /// The wheel scrolled; `x` is horizontal, `y` vertical.
    Scroll {
        /// Scroll amount.
        delta: Vec2,
    },
    /// The pointer entered (`enter`) or left a node.
    Hover {
        /// Enter when true, leave when false.
        enter: bool,
    },
}

/// A single pointer occurrence.
#[derive(Clone, Debug, PartialEq)]
pub struct MouseEvent<K> {
    target: Option<K>,
    position: Point,
    swallowed: bool,
    kind: MouseEventKind,
}

impl<K> MouseEvent<K> {
    /// An untargeted event of `kind` at world-space `position`.
    pub fn new(kind: MouseEventKind, position: Point) -> Self {
        Self {
            target: None,
            position,
            swallowed: false,
            kind,
        }
    }

    /// A press or release of `button`.
    pub fn click(button: MouseButton, down: bool, position: Point) -> Self {
        Self::new(MouseEventKind::Click { button, down }, position)
    }

    /// A pointer move.
    pub fn moved(position: Point) -> Self {
        Self::new(MouseEventKind::Move, position)
    }

    /// A wheel scroll by `delta`.
    pub fn scroll(delta: Vec2, position: Point) -> Self {
        Self::new(MouseEventKind::Scroll { delta }, position)
    }

    /// A hover transition addressed to `node`.
    pub fn hover(node: K, enter: bool, position: Point) -> Self {
        Self::new(MouseEventKind::Hover { enter }, position).with_target(Some(node))
    }

    /// Address the event to `target`. `None` makes it untargeted.
    #[must_use]
    pub fn with_target(mut self, target: Option<K>) -> Self {
        self.target = target;
        self
    }

    /// Mark the event consumed. Idempotent.
    pub fn swallow(&mut self) {
        self.swallowed = true;
    }

    /// Whether some filter consumed the event.
    pub fn is_swallowed(&self) -> bool {
        self.swallowed
    }

    /// Pointer position in world space.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Replace the pointer position.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// The node the event is addressed to, if any.
    pub fn target(&self) -> Option<&K> {
        self.target.as_ref()
    }

    /// The variant payload.
    pub fn kind(&self) -> &MouseEventKind {
        &self.kind
    }

    /// `Some((button, down))` for click events.
    pub fn as_click(&self) -> Option<(MouseButton, bool)> {
        match self.kind {
            MouseEventKind::Click { button, down } => Some((button, down)),
            _ => None,
        }
    }

    /// True for a button press.
    pub fn is_press(&self) -> bool {
        matches!(self.kind, MouseEventKind::Click { down: true, .. })
    }

    /// True for a button release.
    pub fn is_release(&self) -> bool {
        matches!(self.kind, MouseEventKind::Click { down: false, .. })
    }

    /// A fresh synthetic touch at the event position.
    pub fn create_touch(&self) -> Touch {
        Touch::new(self.position)
    }

    /// Advance `touch` to the event position, keeping its start point.
    pub fn update_touch(&self, touch: &mut Touch) {
        touch.move_to(self.position);
    }

    /// Forward the event to `node`'s native handlers.
    ///
    /// See the [module docs](self) for the per-variant rules.
    pub fn dispatch_default<H: MouseHost<K>>(&self, host: &mut H, node: &K, touch: Option<&Touch>)
    where
        K: Copy,
    {
        let context = TouchContext { emulated: true };
        match self.kind {
            MouseEventKind::Click { button, down } => {
                if button != MouseButton::Left {
                    return;
                }
                let Some(touch) = touch else {
                    return;
                };
                if let Some(delegate) = host.touch_delegate(node) {
                    if down {
                        delegate.touch_began(touch, &context);
                    } else {
                        delegate.touch_ended(touch, &context);
                    }
                }
            }
            MouseEventKind::Move => {
                let Some(touch) = touch else {
                    return;
                };
                if !MouseAttributes::of(*node).is_held(host, MouseButton::Left) {
                    return;
                }
                if let Some(delegate) = host.touch_delegate(node) {
                    delegate.touch_moved(touch, &context);
                }
            }
            MouseEventKind::Scroll { delta } => {
                if let Some(delegate) = host.scroll_delegate(node) {
                    delegate.scroll_wheel(delta.x, delta.y);
                }
            }
            MouseEventKind::Hover { .. } => {}
        }
    }
}

impl<K: PartialEq> MouseEvent<K> {
    /// Whether the event is addressed to `node`.
    pub fn is_targeted_at(&self, node: &K) -> bool {
        self.target.as_ref() == Some(node)
    }
}
