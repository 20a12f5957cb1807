// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Understory Scene.
//!
//! ## Feature
//!
//! Enable with `scene_adapter`.
//!
//! ## Notes
//!
//! [`Scene`] implements [`SceneQuery`] and [`AttributeStore`] directly.
//! [`SceneHost`] pairs a scene with tables of native touch and scroll
//! delegates so it satisfies [`MouseHost`](crate::host::MouseHost) as a whole.
//! Adding or removing a touch delegate through [`SceneHost`] keeps the
//! node's touch filter in sync.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use hashbrown::HashMap;
use kurbo::{Point, Rect};
use understory_scene::{NodeId, Scene};

use crate::bridge;
use crate::host::{AttributeStore, DelegateLookup, SceneQuery};
use crate::mouse::Mouse;
use crate::pool::ListenerId;
use crate::touch::{ScrollDelegate, TouchDelegate};

impl SceneQuery<NodeId> for Scene {
    fn is_alive(&self, node: &NodeId) -> bool {
        Self::is_alive(self, *node)
    }

    fn is_visible(&self, node: &NodeId) -> bool {
        Self::is_visible(self, *node)
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        Self::is_attached(self, *node)
    }

    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        Self::parent_of(self, *node)
    }

    fn child_index(&self, node: &NodeId) -> Option<usize> {
        Self::child_index(self, *node)
    }

    fn bounding_box(&self, node: &NodeId) -> Option<Rect> {
        Self::bounding_box(self, *node)
    }

    fn to_parent_space(&self, node: &NodeId, world: Point) -> Option<Point> {
        Self::to_parent_space(self, *node, world)
    }
}

impl AttributeStore<NodeId> for Scene {
    fn attribute<T: Any>(&self, node: &NodeId, key: &str) -> Option<&T> {
        Self::attribute(self, *node, key)
    }

    fn set_attribute<T: Any>(&mut self, node: &NodeId, key: &'static str, value: T) {
        Self::set_attribute(self, *node, key, value);
    }
}

/// How a node's touch delegate was registered with the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DelegateKind {
    /// Receives every touch.
    Standard,
    /// Claims touches one at a time.
    Targeted {
        /// Whether claimed touches are hidden from delegates behind it.
        swallows: bool,
    },
}

/// A [`Scene`] together with its nodes' native input handlers.
#[derive(Default)]
pub struct SceneHost {
    /// The scene graph.
    pub scene: Scene,
    touch: HashMap<NodeId, Box<dyn TouchDelegate>>,
    scroll: HashMap<NodeId, Box<dyn ScrollDelegate>>,
}

impl core::fmt::Debug for SceneHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SceneHost")
            .field("scene", &self.scene)
            .field("touch_delegates", &self.touch.len())
            .field("scroll_delegates", &self.scroll.len())
            .finish()
    }
}

impl SceneHost {
    /// Wrap `scene` with empty delegate tables.
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            touch: HashMap::new(),
            scroll: HashMap::new(),
        }
    }

    /// Give `node` a touch delegate and a matching mouse filter.
    ///
    /// Returns the filter's id, or `None` when the node is stale or already
    /// has a touch filter. The delegate is installed either way for live nodes.
    pub fn add_touch_delegate(
        &mut self,
        mouse: &mut Mouse<NodeId, Self>,
        node: NodeId,
        kind: DelegateKind,
        delegate: impl TouchDelegate + 'static,
    ) -> Option<ListenerId> {
        if !self.scene.is_alive(node) {
            return None;
        }
        self.touch.insert(node, Box::new(delegate));
        match kind {
            DelegateKind::Standard => bridge::standard_delegate_added(mouse, node),
            DelegateKind::Targeted { swallows } => {
                bridge::targeted_delegate_added(mouse, node, swallows)
            }
        }
    }

    /// Remove `node`'s touch delegate and its mouse filter.
    pub fn remove_touch_delegate(
        &mut self,
        mouse: &mut Mouse<NodeId, Self>,
        node: NodeId,
    ) -> Option<Box<dyn TouchDelegate>> {
        bridge::delegate_removed(mouse, &node);
        self.touch.remove(&node)
    }

    /// Give `node` a scroll delegate. Ignored for stale nodes.
    pub fn set_scroll_delegate(&mut self, node: NodeId, delegate: impl ScrollDelegate + 'static) {
        if self.scene.is_alive(node) {
            self.scroll.insert(node, Box::new(delegate));
        }
    }

    /// Remove `node`'s scroll delegate.
    pub fn remove_scroll_delegate(&mut self, node: NodeId) -> Option<Box<dyn ScrollDelegate>> {
        self.scroll.remove(&node)
    }

    /// Remove a node's subtree, its delegates and its listeners.
    pub fn remove(&mut self, mouse: &mut Mouse<NodeId, Self>, node: NodeId) {
        self.scene.remove(node);
        let scene = &self.scene;
        self.touch.retain(|n, _| scene.is_alive(*n));
        self.scroll.retain(|n, _| scene.is_alive(*n));
        let dead: Vec<_> = mouse
            .pool()
            .ids()
            .filter_map(|id| mouse.pool().filter(id)?.target().copied())
            .filter(|n| !scene.is_alive(*n))
            .collect();
        for n in dead {
            mouse.unregister_node(&n);
        }
    }
}

impl SceneQuery<NodeId> for SceneHost {
    fn is_alive(&self, node: &NodeId) -> bool {
        self.scene.is_alive(*node)
    }

    fn is_visible(&self, node: &NodeId) -> bool {
        self.scene.is_visible(*node)
    }

    fn is_attached(&self, node: &NodeId) -> bool {
        self.scene.is_attached(*node)
    }

    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.scene.parent_of(*node)
    }

    fn child_index(&self, node: &NodeId) -> Option<usize> {
        self.scene.child_index(*node)
    }

    fn bounding_box(&self, node: &NodeId) -> Option<Rect> {
        self.scene.bounding_box(*node)
    }

    fn to_parent_space(&self, node: &NodeId, world: Point) -> Option<Point> {
        self.scene.to_parent_space(*node, world)
    }
}

impl AttributeStore<NodeId> for SceneHost {
    fn attribute<T: Any>(&self, node: &NodeId, key: &str) -> Option<&T> {
        self.scene.attribute(*node, key)
    }

    fn set_attribute<T: Any>(&mut self, node: &NodeId, key: &'static str, value: T) {
        self.scene.set_attribute(*node, key, value);
    }
}

impl DelegateLookup<NodeId> for SceneHost {
    fn touch_delegate(&mut self, node: &NodeId) -> Option<&mut dyn TouchDelegate> {
        self.touch
            .get_mut(node)
            .map(|d| d.as_mut() as &mut dyn TouchDelegate)
    }

    fn scroll_delegate(&mut self, node: &NodeId) -> Option<&mut dyn ScrollDelegate> {
        self.scroll
            .get_mut(node)
            .map(|d| d.as_mut() as &mut dyn ScrollDelegate)
    }
}
