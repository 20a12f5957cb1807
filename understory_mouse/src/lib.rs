// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_mouse --heading-base-level=0

//! Understory Mouse: mouse routing and pointer capture for touch-first scene graphs.
//!
//! ## Overview
//!
//! Engines whose only native pointer abstraction is a touch get a richer mouse
//! model from this crate: per-button clicks, motion, scroll, hover enter and
//! leave, and exclusive capture so one node can own the pointer while dragging.
//! Existing touch delegates keep working because mouse presses, drags and
//! releases are forwarded to them as synthetic touches.
//!
//! ## Pieces
//!
//! - [`event`]: [`MouseEvent`](event::MouseEvent) values and default
//!   forwarding to native handlers.
//! - [`state`]: held buttons and hover flag stored on each node.
//! - [`filter`]: the per-node decision algorithm.
//! - [`pool`]: listeners in dispatch order and the capture slot.
//! - [`mouse`]: the [`Mouse`](mouse::Mouse) coordinator that the host owns.
//! - [`frame`]: the single-slot queue that debounces resorts.
//! - [`touch`] and [`bridge`]: synthetic touches, the touch entry point with
//!   its hooks, and delegate synchronization.
//! - [`host`]: the traits a scene graph implements to be routed over.
//!
//! ## Ordering
//!
//! Listeners dispatch front to back: a later sibling before an earlier one,
//! a child before its parent, and global listeners last. The order is only
//! rebuilt in [`Mouse::begin_frame`](mouse::Mouse::begin_frame) after
//! registrations changed, so registering many listeners in one frame costs a
//! single sort.
//!
//! ## Capture
//!
//! A press that a listener swallows captures the pointer for that listener
//! until the matching release. While captured, no other node gains hover, and
//! the coordinator's `post_*` helpers address events to the capturing node.
//! Capture is released when the capturing listener is unregistered or its node
//! disappears, is hidden, or leaves the running scene.
//!
//! ## Adapters
//!
//! - **Scene Adapter** (`scene_adapter` feature): implements the host traits
//!   for `understory_scene::Scene` and provides `SceneHost`, which also owns
//!   native touch and scroll delegates.
//!
//! ## Features
//!
//! - `std` (default): `std` support in dependencies.
//! - `libm`: `no_std` float math through `libm`.
//! - `serde`: integer-ordinal serialization of [`MouseButton`](button::MouseButton)
//!   and [`MouseButtons`](button::MouseButtons).
//!
//! The crate logs through the `log` facade and never installs a logger.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod bridge;
pub mod button;
pub mod event;
pub mod filter;
pub mod frame;
pub mod host;
pub mod mouse;
pub mod pool;
pub mod state;
pub mod touch;

#[cfg(test)]
mod testing;
