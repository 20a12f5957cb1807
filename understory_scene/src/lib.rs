// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Scene: a Kurbo-native scene graph for touch-first engines.
//!
//! This crate models the node hierarchy that an input layer such as
//! `understory_mouse` routes pointer events through.
//!
//! - Nodes form a forest of ordered children; a node's index among its
//!   siblings is stable until the sibling list changes, and later siblings
//!   draw on top of earlier ones.
//! - Each node has local bounds, a local transform relative to its parent, and
//!   visibility flags. Visibility is inherited: a node is only visible when all
//!   of its ancestors are.
//! - One root may be marked as the running scene. Nodes outside the running
//!   scene are considered detached.
//! - Every node carries a keyed attribute store for arbitrary typed values, so
//!   collaborating crates can persist per-node state without wrapping the node
//!   type.
//!
//! ## Not a layout engine
//!
//! Positions and sizes are set by the caller. There is no commit step: world
//! transforms are derived on demand by walking the parent chain, which keeps
//! queries exact after any mutation.
//!
//! ## API overview
//!
//! - [`Scene`]: container managing nodes, the running root, and attributes.
//! - [`LocalNode`]: per-node local data (bounds, transform, flags).
//! - [`NodeFlags`]: visibility control.
//! - [`NodeId`]: generational handle of a node. Stale handles are safe to use:
//!   queries return `None`/`false` and mutations are ignored.
//!
//! ```rust
//! use kurbo::{Affine, Point, Rect};
//! use understory_scene::{LocalNode, Scene};
//!
//! let mut scene = Scene::new();
//! let root = scene.insert(None, LocalNode::default());
//! scene.set_running(Some(root));
//!
//! let button = scene.insert(
//!     Some(root),
//!     LocalNode {
//!         local_bounds: Rect::new(0.0, 0.0, 100.0, 40.0),
//!         local_transform: Affine::translate((20.0, 20.0)),
//!         ..LocalNode::default()
//!     },
//! );
//!
//! assert!(scene.is_attached(button));
//! assert_eq!(scene.child_index(button), Some(0));
//! assert_eq!(scene.bounding_box(button), Some(Rect::new(20.0, 20.0, 120.0, 60.0)));
//! assert_eq!(scene.to_node_space(button, Point::new(30.0, 30.0)), Some(Point::new(10.0, 10.0)));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod attributes;
mod scene;
mod types;

pub use scene::Scene;
pub use types::{LocalNode, NodeFlags, NodeId};
