// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core scene implementation: structure, geometry queries, attributes.

use alloc::vec::Vec;
use core::any::Any;
use kurbo::{Affine, Point, Rect};

use crate::attributes::Attributes;
use crate::types::{LocalNode, NodeFlags, NodeId};

/// A forest of nodes with one optional running root.
///
/// Children are kept in insertion order. A child's position in its parent's
/// list is its sibling index; later siblings are drawn on top of earlier ones.
///
/// ## Example
///
/// ```rust
/// use kurbo::Rect;
/// use understory_scene::{LocalNode, NodeFlags, Scene};
///
/// let mut scene = Scene::new();
/// let root = scene.insert(None, LocalNode::default());
/// let panel = scene.insert(
///     Some(root),
///     LocalNode {
///         local_bounds: Rect::new(0.0, 0.0, 50.0, 50.0),
///         ..LocalNode::default()
///     },
/// );
///
/// // Not attached until the root is the running scene.
/// assert!(!scene.is_attached(panel));
/// scene.set_running(Some(root));
/// assert!(scene.is_attached(panel));
///
/// // Hiding an ancestor hides the subtree.
/// scene.set_flags(root, NodeFlags::empty());
/// assert!(!scene.is_visible(panel));
/// ```
pub struct Scene {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    running: Option<NodeId>,
}

impl core::fmt::Debug for Scene {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        f.debug_struct("Scene")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &self.free_list.len())
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    local: LocalNode,
    attributes: Attributes,
}

impl Node {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            local,
            attributes: Attributes::default(),
        }
    }
}

impl Scene {
    /// Create a new empty scene with no running root.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            running: None,
        }
    }

    /// Insert a new node as the last child of `parent` (or as a root if `None`).
    ///
    /// A stale `parent` inserts the node as a root.
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "slot counts are bounded by NodeId's 32-bit index"
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "slot counts are bounded by NodeId's 32-bit index"
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && self.is_alive(p)
        {
            self.link_parent(id, p);
        }
        id
    }

    /// Remove a node and its subtree. Attributes are dropped with the nodes.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.remove(child);
        }
        if self.running == Some(id) {
            self.running = None;
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move `id` to the end of `new_parent`'s children (or make it a root).
    ///
    /// Reparenting a node under itself or one of its descendants is ignored.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) {
        if !self.is_alive(id) {
            return;
        }
        if let Some(p) = new_parent
            && (!self.is_alive(p) || self.is_ancestor_or_self(id, p))
        {
            return;
        }
        if let Some(parent) = self.node(id).parent {
            self.unlink_parent(id, parent);
        }
        if let Some(p) = new_parent {
            self.link_parent(id, p);
        }
    }

    /// Mark `root` as the running scene. Only nodes under it are attached.
    pub fn set_running(&mut self, root: Option<NodeId>) {
        self.running = root.filter(|&r| self.is_alive(r));
    }

    /// The running root, if any.
    pub fn running(&self) -> Option<NodeId> {
        self.running
    }

    /// Update local transform.
    pub fn set_local_transform(&mut self, id: NodeId, tf: Affine) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_transform = tf;
        }
    }

    /// Update local bounds.
    pub fn set_local_bounds(&mut self, id: NodeId, bounds: Rect) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.local_bounds = bounds;
        }
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Show or hide a node, leaving other flags untouched.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags.set(NodeFlags::VISIBLE, visible);
        }
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is live if its slot is occupied and the generation matches.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node_opt(id).is_some()
    }

    /// Returns the flags of a node if the identifier is live.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.node_opt(id).map(|n| n.local.flags)
    }

    /// Returns the local data of a node if the identifier is live.
    pub fn local(&self, id: NodeId) -> Option<&LocalNode> {
        self.node_opt(id).map(|n| &n.local)
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node_opt(id).and_then(|n| n.parent)
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.node_opt(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Index of `id` among its parent's children. `None` for roots and stale ids.
    pub fn child_index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent_of(id)?;
        self.node(parent).children.iter().position(|&c| c == id)
    }

    /// True if the node and every ancestor carry [`NodeFlags::VISIBLE`].
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            let Some(node) = self.node_opt(c) else {
                return false;
            };
            if !node.local.flags.contains(NodeFlags::VISIBLE) {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// True if the node's root is the running scene.
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.root_of(id).is_some_and(|root| Some(root) == self.running)
    }

    /// The root of the tree containing `id`.
    pub fn root_of(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_alive(id) {
            return None;
        }
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            current = parent;
        }
        Some(current)
    }

    /// Transform from the node's local space into world space.
    pub fn world_transform(&self, id: NodeId) -> Option<Affine> {
        let mut node = self.node_opt(id)?;
        let mut tf = node.local.local_transform;
        while let Some(parent) = node.parent {
            node = self.node(parent);
            tf = node.local.local_transform * tf;
        }
        Some(tf)
    }

    /// The node's local bounds mapped through its local transform, in parent space.
    pub fn bounding_box(&self, id: NodeId) -> Option<Rect> {
        self.node_opt(id)
            .map(|n| n.local.local_transform.transform_rect_bbox(n.local.local_bounds))
    }

    /// Convert a world-space point into the node's local space.
    pub fn to_node_space(&self, id: NodeId, world: Point) -> Option<Point> {
        self.world_transform(id).map(|tf| tf.inverse() * world)
    }

    /// Convert a world-space point into the space of the node's parent.
    ///
    /// For roots the parent space is world space.
    pub fn to_parent_space(&self, id: NodeId, world: Point) -> Option<Point> {
        match self.node_opt(id)?.parent {
            Some(parent) => self.to_node_space(parent, world),
            None => Some(world),
        }
    }

    /// Typed attribute lookup. `None` when absent, of another type, or stale.
    pub fn attribute<T: Any>(&self, id: NodeId, key: &str) -> Option<&T> {
        self.node_opt(id)?.attributes.get(key)
    }

    /// Mutable typed attribute lookup.
    pub fn attribute_mut<T: Any>(&mut self, id: NodeId, key: &str) -> Option<&mut T> {
        self.node_opt_mut(id)?.attributes.get_mut(key)
    }

    /// Typed attribute lookup falling back to `T::default()`.
    pub fn attribute_or_default<T: Any + Clone + Default>(&self, id: NodeId, key: &str) -> T {
        self.attribute::<T>(id, key).cloned().unwrap_or_default()
    }

    /// Store an attribute on a live node. Ignored for stale ids.
    pub fn set_attribute<T: Any>(&mut self, id: NodeId, key: &'static str, value: T) {
        if let Some(n) = self.node_opt_mut(id) {
            n.attributes.set(key, value);
        }
    }

    /// Remove an attribute, returning whether one was present.
    pub fn remove_attribute(&mut self, id: NodeId, key: &str) -> bool {
        self.node_opt_mut(id).is_some_and(|n| n.attributes.remove(key))
    }

    // --- internals ---

    fn node(&self, id: NodeId) -> &Node {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent_of(c);
        }
        false
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        self.node_mut(parent).children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }
}
