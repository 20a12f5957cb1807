// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Understory crates.
//!
//! Each adapter is gated behind a feature flag so the core stays independent
//! of any particular scene graph.
//!
//! ## Available Adapters
//!
//! - [`scene`] (`scene_adapter` feature): host traits for
//!   [`understory_scene::Scene`], plus delegate tables for native touch and
//!   scroll handlers keyed by node.

#[cfg(feature = "scene_adapter")]
pub mod scene;
