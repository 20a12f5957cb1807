// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node mouse state: held buttons and hover.
//!
//! The state lives in the host's [`AttributeStore`] under [`MOUSE_STATE_KEY`],
//! so it is owned by the node and dies with it. A node that never saw the
//! pointer has no stored state; reads then behave as "nothing held, not
//! hovered".
//!
//! ```
//! # use understory_mouse::state::{MouseAttributes, NodeMouseState, MOUSE_STATE_KEY};
//! # use understory_mouse::button::MouseButton;
//! # use understory_mouse::host::AttributeStore;
//! # use std::any::Any;
//! # use std::collections::HashMap;
//! # #[derive(Default)]
//! # struct Attrs(HashMap<(u32, &'static str), Box<dyn Any>>);
//! # impl AttributeStore<u32> for Attrs {
//! #     fn attribute<T: Any>(&self, node: &u32, key: &str) -> Option<&T> {
//! #         self.0.iter().find(|((n, k), _)| n == node && *k == key)?.1.downcast_ref()
//! #     }
//! #     fn set_attribute<T: Any>(&mut self, node: &u32, key: &'static str, value: T) {
//! #         self.0.insert((*node, key), Box::new(value));
//! #     }
//! # }
//! let mut host = Attrs::default();
//! let attrs = MouseAttributes::of(7_u32);
//! assert!(!attrs.is_held(&host, MouseButton::Right));
//!
//! attrs.add_held(&mut host, MouseButton::Right);
//! assert!(attrs.is_held(&host, MouseButton::Right));
//!
//! attrs.clear_held(&mut host);
//! assert_eq!(attrs.get(&host), NodeMouseState::default());
//! ```

use crate::button::{MouseButton, MouseButtons};
use crate::host::AttributeStore;

/// Attribute key under which [`NodeMouseState`] is stored.
pub const MOUSE_STATE_KEY: &str = "understory_mouse/state";

/// Mouse state recorded on a node.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeMouseState {
    /// Buttons pressed while the node owns the pointer.
    pub held: MouseButtons,
    /// Whether the pointer is over the node.
    pub hovered: bool,
}

/// Handle for reading and updating a node's [`NodeMouseState`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MouseAttributes<K> {
    node: K,
}

impl<K> MouseAttributes<K> {
    /// Handle for `node`.
    pub fn of(node: K) -> Self {
        Self { node }
    }

    /// The node this handle refers to.
    pub fn node(&self) -> &K {
        &self.node
    }

    /// Current state, defaulted when absent.
    pub fn get(&self, store: &impl AttributeStore<K>) -> NodeMouseState {
        store
            .attribute::<NodeMouseState>(&self.node, MOUSE_STATE_KEY)
            .copied()
            .unwrap_or_default()
    }

    /// Buttons the node currently holds.
    pub fn held(&self, store: &impl AttributeStore<K>) -> MouseButtons {
        self.get(store).held
    }

    /// Whether the node holds `button`.
    pub fn is_held(&self, store: &impl AttributeStore<K>, button: MouseButton) -> bool {
        self.held(store).has(button)
    }

    /// Whether the pointer is over the node.
    pub fn is_hovered(&self, store: &impl AttributeStore<K>) -> bool {
        self.get(store).hovered
    }

    /// Record `button` as held.
    pub fn add_held(&self, store: &mut impl AttributeStore<K>, button: MouseButton) {
        self.update(store, |s| s.held.add(button));
    }

    /// Forget `button`. A button that was never held is a no-op.
    pub fn remove_held(&self, store: &mut impl AttributeStore<K>, button: MouseButton) {
        self.update(store, |s| s.held.discard(button));
    }

    /// Forget every held button.
    pub fn clear_held(&self, store: &mut impl AttributeStore<K>) {
        self.update(store, |s| s.held = MouseButtons::empty());
    }

    /// Set the hover flag.
    pub fn set_hovered(&self, store: &mut impl AttributeStore<K>, hovered: bool) {
        self.update(store, |s| s.hovered = hovered);
    }

    /// Reset to nothing held, not hovered.
    pub fn clear(&self, store: &mut impl AttributeStore<K>) {
        self.update(store, |s| *s = NodeMouseState::default());
    }

    fn update(&self, store: &mut impl AttributeStore<K>, f: impl FnOnce(&mut NodeMouseState)) {
        let mut state = self.get(store);
        let before = state;
        f(&mut state);
        if state != before {
            store.set_attribute(&self.node, MOUSE_STATE_KEY, state);
        }
    }
}
