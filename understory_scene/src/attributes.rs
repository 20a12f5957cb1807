// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node keyed attribute storage.

use alloc::boxed::Box;
use core::any::Any;
use hashbrown::HashMap;

/// Typed values keyed by a namespaced string, e.g. `"my_crate/state"`.
#[derive(Default)]
pub(crate) struct Attributes {
    values: HashMap<&'static str, Box<dyn Any>>,
}

impl core::fmt::Debug for Attributes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

impl Attributes {
    /// Returns the value under `key` if present and of type `T`.
    pub(crate) fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key)?.downcast_ref()
    }

    pub(crate) fn get_mut<T: Any>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key)?.downcast_mut()
    }

    /// Stores `value` under `key`, replacing any previous value of any type.
    pub(crate) fn set<T: Any>(&mut self, key: &'static str, value: T) {
        self.values.insert(key, Box::new(value));
    }

    pub(crate) fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_lookup_rejects_other_types() {
        let mut attrs = Attributes::default();
        attrs.set("test/flag", true);
        assert_eq!(attrs.get::<bool>("test/flag"), Some(&true));
        assert!(attrs.get::<u32>("test/flag").is_none());
        assert!(attrs.get::<bool>("test/missing").is_none());
    }

    #[test]
    fn set_replaces_value_of_another_type() {
        let mut attrs = Attributes::default();
        attrs.set("test/value", 1_u32);
        attrs.set("test/value", "text");
        assert_eq!(attrs.len(), 1);
        assert!(attrs.get::<u32>("test/value").is_none());
        assert_eq!(attrs.get::<&str>("test/value"), Some(&"text"));
        assert!(attrs.remove("test/value"));
        assert!(!attrs.remove("test/value"));
    }
}
