// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node mouse event filter.
//!
//! ## Overview
//!
//! A [`MouseEventFilter`] decides, for one registered node, whether an event
//! reaches that node's callback and what happens around the call: hover
//! transitions, held-button bookkeeping, the synthetic touch kept for an
//! in-progress press, native default forwarding, and capture requests.
//! A filter without a node is a global listener.
//!
//! ## Decision
//!
//! For a targeted filter the node must be alive: existing, attached to the
//! running scene, and visible with all of its ancestors. Dead nodes are
//! skipped. The node is *inside* when the filter ignores position or when its
//! parent-space bounding box contains the event position, edges included.
//!
//! The node is *eligible* when the event is not swallowed and either the event
//! is addressed to the node, the filter holds a synthetic touch, or the event
//! is untargeted and the node is inside.
//!
//! [`MouseEventFilter::admit`] settles hover for an eligible or capturing
//! node, unless a filter on another node is capturing, and reports the
//! transition. The pool delivers it to every listener on the node. Then
//! [`MouseEventFilter::run`] goes through, in order:
//!
//! 1. Held-set update for clicks, so the callback sees the new state.
//! 2. The callback, returning a [`MouseResult`].
//! 3. `Leave` undoes the held change; otherwise a press creates the touch.
//! 4. The touch, if any, advances to the event position.
//! 5. [`MouseEvent::dispatch_default`].
//! 6. A claimed release drops the touch.
//! 7. `Swallow`, an event addressed to the node, or holding capture swallows
//!    the event and asks for capture on press or release on release.
//!
//! Any other node leaves hover once the pointer is outside it. It also forgets
//! its held buttons and cancels its touch, except while another filter on the
//! same node captures; then the filter only drops its own touch. Nodes that
//! are gone or hidden lose all of their mouse state.
//!
//! Filters never touch the capture slot themselves. They return a
//! [`CaptureRequest`] that the [`ListenerPool`](crate::pool::ListenerPool)
//! applies.
//!
//! ## Ordering
//!
//! [`MouseEventFilter::priority`] is the path of sibling indices from the root
//! down to the node. Higher paths dispatch first, so later siblings come before
//! earlier ones and children before their parents. Global listeners come after
//! every targeted one, and ties go to the earlier registration.

use alloc::boxed::Box;
use core::cmp::Ordering;

use kurbo::{Point, Rect};
use smallvec::SmallVec;

use crate::button::MouseButton;
use crate::event::MouseEvent;
use crate::host::{MouseHost, SceneQuery};
use crate::state::MouseAttributes;
use crate::touch::{Touch, TouchContext};

/// What a callback wants done with the event it saw.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseResult {
    /// Claim the event; a press takes capture.
    Swallow,
    /// Claim the event without swallowing it, so filters behind still see it.
    Eat,
    /// Not interested; undo this event's held-button change.
    Leave,
}

/// Capture change a filter asks the pool to apply after handling an event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CaptureRequest {
    /// Leave capture as it is.
    #[default]
    None,
    /// Make this filter the capturing one.
    Capture,
    /// Release capture if this filter holds it.
    Release,
}

/// Who holds capture when a filter handles an event, from that filter's view.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Capturing {
    /// No filter is capturing.
    Nothing,
    /// This filter is capturing.
    This,
    /// Another filter on the same node is capturing.
    SameNode,
    /// A filter on some other node, or a global listener, is capturing.
    Other,
}

/// Outcome of [`MouseEventFilter::admit`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Admission {
    /// Hover change of the filter's node: `Some(true)` on enter, `Some(false)`
    /// on leave.
    pub hover: Option<bool>,
    /// Whether [`MouseEventFilter::run`] should follow.
    pub proceed: bool,
    /// Capture change to apply when not proceeding.
    pub request: CaptureRequest,
}

/// A node callback. Receives the host so it can inspect node state.
pub type MouseCallback<K, H> = Box<dyn FnMut(&mut H, &MouseEvent<K>) -> MouseResult>;

/// Root-to-node path of sibling indices.
pub type Priority = SmallVec<[usize; 8]>;

/// Decision state for one registered node, or for a global listener.
#[derive(Clone, Debug)]
pub struct MouseEventFilter<K> {
    target: Option<K>,
    ignore_position: bool,
    key: Option<&'static str>,
    eaten: Option<Touch>,
    registration: u64,
    priority: Priority,
}

impl<K> MouseEventFilter<K> {
    /// A filter for `node`.
    pub fn node(node: K) -> Self {
        Self::with_target(Some(node))
    }

    /// A global listener, only reached by untargeted events while nothing is
    /// capturing.
    pub fn global() -> Self {
        Self::with_target(None)
    }

    fn with_target(target: Option<K>) -> Self {
        Self {
            target,
            ignore_position: false,
            key: None,
            eaten: None,
            registration: 0,
            priority: Priority::new(),
        }
    }

    /// Treat every position as inside the node, e.g. for overlays.
    #[must_use]
    pub fn ignoring_position(mut self) -> Self {
        self.ignore_position = true;
        self
    }

    /// Name the filter's slot on its node. A node has at most one filter per
    /// key.
    #[must_use]
    pub fn with_key(mut self, key: &'static str) -> Self {
        self.key = Some(key);
        self
    }

    /// The node, `None` for global listeners.
    pub fn target(&self) -> Option<&K> {
        self.target.as_ref()
    }

    /// Whether position is ignored.
    pub fn ignores_position(&self) -> bool {
        self.ignore_position
    }

    /// The slot key, if any.
    pub fn key(&self) -> Option<&'static str> {
        self.key
    }

    /// The synthetic touch held for an in-progress press.
    pub fn eaten(&self) -> Option<&Touch> {
        self.eaten.as_ref()
    }

    /// Order of registration within the owning pool.
    pub fn registration_index(&self) -> u64 {
        self.registration
    }

    /// Sibling index path from the last resort.
    pub fn priority(&self) -> &[usize] {
        &self.priority
    }

    pub(crate) fn set_registration_index(&mut self, index: u64) {
        self.registration = index;
    }

    /// Dispatch order between two filters: `Less` runs first.
    pub fn dispatch_order(&self, other: &Self) -> Ordering {
        match (&self.target, &other.target) {
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), Some(_)) => other.priority.cmp(&self.priority),
            (None, None) => Ordering::Equal,
        }
        .then(self.registration.cmp(&other.registration))
    }
}

impl<K: Copy + PartialEq> MouseEventFilter<K> {
    /// Recompute [`priority`](Self::priority) from the current scene.
    pub fn refresh_priority(&mut self, scene: &impl SceneQuery<K>) {
        self.priority.clear();
        let Some(mut node) = self.target else {
            return;
        };
        while let Some(parent) = scene.parent_of(&node) {
            if let Some(index) = scene.child_index(&node) {
                self.priority.push(index);
            }
            node = parent;
        }
        self.priority.reverse();
    }

    /// Whether the node can receive events at all.
    pub fn is_alive(&self, scene: &impl SceneQuery<K>) -> bool {
        self.target.is_some_and(|node| {
            scene.is_alive(&node) && scene.is_attached(&node) && scene.is_visible(&node)
        })
    }

    /// Whether `position` counts as inside the node.
    pub fn is_inside(&self, scene: &impl SceneQuery<K>, position: Point) -> bool {
        if self.ignore_position {
            return true;
        }
        let Some(node) = self.target else {
            return false;
        };
        match (
            scene.bounding_box(&node),
            scene.to_parent_space(&node, position),
        ) {
            (Some(bounds), Some(local)) => contains_inclusive(bounds, local),
            _ => false,
        }
    }

    /// First half of the decision: liveness, eligibility and hover state.
    ///
    /// A node that is gone, hidden or detached forgets its held buttons and
    /// hover flag without callbacks. A reported hover transition has already
    /// been written to the node's state; the caller delivers it to the node's
    /// listeners before calling [`run`](Self::run).
    pub fn admit<H: MouseHost<K>>(
        &mut self,
        host: &mut H,
        event: &MouseEvent<K>,
        capturing: Capturing,
    ) -> Admission {
        let Some(node) = self.target else {
            return Admission {
                proceed: event.target().is_none() && capturing == Capturing::Nothing,
                ..Admission::default()
            };
        };
        let attrs = MouseAttributes::of(node);

        if !self.is_alive(host) {
            self.forfeit(host, node);
            attrs.clear(host);
            if capturing == Capturing::This {
                log::warn!("capturing node is gone or hidden, releasing capture");
                return Admission {
                    request: CaptureRequest::Release,
                    ..Admission::default()
                };
            }
            return Admission::default();
        }

        let inside = self.is_inside(host, event.position());
        let eligible = !event.is_swallowed()
            && (event.is_targeted_at(&node)
                || self.eaten.is_some()
                || (event.target().is_none() && inside));
        let hovered = attrs.is_hovered(host);

        if capturing != Capturing::This && !eligible {
            let mut hover = None;
            if hovered && !inside {
                attrs.set_hovered(host, false);
                hover = Some(false);
            }
            if capturing == Capturing::SameNode {
                // The node's gesture belongs to the capturing filter.
                self.eaten = None;
            } else {
                self.forfeit(host, node);
                attrs.clear_held(host);
            }
            return Admission {
                hover,
                ..Admission::default()
            };
        }

        let mut hover = None;
        if capturing != Capturing::Other {
            if inside && !hovered {
                attrs.set_hovered(host, true);
                hover = Some(true);
            } else if hovered && !inside {
                attrs.set_hovered(host, false);
                hover = Some(false);
            }
        }
        Admission {
            hover,
            proceed: true,
            request: CaptureRequest::None,
        }
    }

    /// Second half of the decision, for admitted events: held buttons, the
    /// callback, the synthetic touch, default forwarding and capture.
    pub fn run<H: MouseHost<K>>(
        &mut self,
        host: &mut H,
        event: &mut MouseEvent<K>,
        capturing: Capturing,
        callback: &mut MouseCallback<K, H>,
    ) -> CaptureRequest {
        let Some(node) = self.target else {
            if callback(host, event) == MouseResult::Swallow {
                event.swallow();
            }
            return CaptureRequest::None;
        };
        let attrs = MouseAttributes::of(node);
        let capturing_this = capturing == Capturing::This;

        let click = event.as_click();
        if let Some((button, down)) = click {
            if down {
                attrs.add_held(host, button);
            } else {
                attrs.remove_held(host, button);
            }
        }

        let result = callback(host, event);
        if result == MouseResult::Leave {
            if let Some((button, _)) = click {
                attrs.remove_held(host, button);
            }
        } else if event.is_press() {
            self.eaten = Some(event.create_touch());
        }

        if let Some(touch) = &mut self.eaten {
            event.update_touch(touch);
        }
        event.dispatch_default(host, &node, self.eaten.as_ref());

        if result != MouseResult::Leave && event.is_release() {
            self.eaten = None;
        }

        if result == MouseResult::Swallow || event.is_targeted_at(&node) || capturing_this {
            event.swallow();
            if event.is_press() {
                return CaptureRequest::Capture;
            }
            if event.is_release() {
                return CaptureRequest::Release;
            }
        }
        CaptureRequest::None
    }

    /// [`admit`](Self::admit) then [`run`](Self::run) for a filter handled on
    /// its own. Hover transitions reach only `callback`; the
    /// [`ListenerPool`](crate::pool::ListenerPool) delivers them to every
    /// listener on the node instead.
    pub fn handle<H: MouseHost<K>>(
        &mut self,
        host: &mut H,
        event: &mut MouseEvent<K>,
        capturing: Capturing,
        callback: &mut MouseCallback<K, H>,
    ) -> CaptureRequest {
        let admission = self.admit(host, event, capturing);
        if let (Some(enter), Some(node)) = (admission.hover, self.target) {
            log::trace!("hover {}", if enter { "enter" } else { "leave" });
            // Hover results carry no meaning.
            let _ = callback(host, &MouseEvent::hover(node, enter, event.position()));
        }
        if admission.proceed {
            self.run(host, event, capturing, callback)
        } else {
            admission.request
        }
    }

    /// Drop the synthetic touch. A press that reached the node's native
    /// delegate is cancelled there.
    fn forfeit<H: MouseHost<K>>(&mut self, host: &mut H, node: K) {
        let Some(touch) = self.eaten.take() else {
            return;
        };
        if MouseAttributes::of(node).is_held(host, MouseButton::Left)
            && let Some(delegate) = host.touch_delegate(&node)
        {
            log::debug!("cancelling a forfeited mouse touch");
            delegate.touch_cancelled(&touch, &TouchContext { emulated: true });
        }
    }
}

fn contains_inclusive(rect: Rect, p: Point) -> bool {
    let rect = rect.abs();
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}
