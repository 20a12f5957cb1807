// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-side interfaces consumed by the mouse layer.
//!
//! The mouse layer does not own nodes. It refers to them by a copyable key `K`
//! and asks the host about them through these traits every time it needs to,
//! so a key that outlives its node is simply reported as not alive.
//!
//! - [`SceneQuery`]: liveness, visibility, attachment, sibling order, geometry.
//! - [`AttributeStore`]: typed per-node values under namespaced keys; hosts
//!   [`NodeMouseState`](crate::state::NodeMouseState).
//! - [`DelegateLookup`]: capability checks for native touch and scroll handlers.
//!
//! [`MouseHost`] is implemented for every type that provides all three.

use core::any::Any;
use kurbo::{Point, Rect};

use crate::touch::{ScrollDelegate, TouchDelegate};

/// Read-only view of the scene graph.
pub trait SceneQuery<K> {
    /// True while the node behind `node` still exists.
    fn is_alive(&self, node: &K) -> bool;

    /// True if the node and all of its ancestors are visible.
    fn is_visible(&self, node: &K) -> bool;

    /// True if the node belongs to the active scene.
    fn is_attached(&self, node: &K) -> bool;

    /// Parent of `node`, `None` for roots.
    fn parent_of(&self, node: &K) -> Option<K>;

    /// Index of `node` among its parent's children, `None` for roots.
    fn child_index(&self, node: &K) -> Option<usize>;

    /// Node bounds in its parent's coordinate space.
    fn bounding_box(&self, node: &K) -> Option<Rect>;

    /// Convert a world-space point into the coordinate space of the node's
    /// parent (world space for roots).
    fn to_parent_space(&self, node: &K, world: Point) -> Option<Point>;
}

/// Arbitrary typed values attached to nodes.
pub trait AttributeStore<K> {
    /// The value stored under `key`, if present and of type `T`.
    fn attribute<T: Any>(&self, node: &K, key: &str) -> Option<&T>;

    /// Store `value` under `key`. Ignored when the node no longer exists.
    fn set_attribute<T: Any>(&mut self, node: &K, key: &'static str, value: T);
}

/// Capability lookup for the engine's native input handlers.
pub trait DelegateLookup<K> {
    /// The node's touch delegate, if it handles touches.
    fn touch_delegate(&mut self, node: &K) -> Option<&mut dyn TouchDelegate>;

    /// The node's scroll delegate, if it handles scroll input.
    fn scroll_delegate(&mut self, node: &K) -> Option<&mut dyn ScrollDelegate> {
        let _ = node;
        None
    }
}

/// Everything the mouse layer needs from its host.
pub trait MouseHost<K>: SceneQuery<K> + AttributeStore<K> + DelegateLookup<K> {}

impl<K, T> MouseHost<K> for T where T: SceneQuery<K> + AttributeStore<K> + DelegateLookup<K> {}
