// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered collection of registered filters and the capture slot.
//!
//! The pool does not keep itself sorted. New listeners are appended and the
//! order is rebuilt by [`ListenerPool::resort`], which the
//! [`Mouse`](crate::mouse::Mouse) coordinator runs at most once per frame.
//!
//! [`ListenerPool::dispatch`] visits every listener for every event. A swallowed
//! or captured event still reaches the remaining filters so that they can
//! update their hover state; the filters themselves skip claims and default
//! forwarding.
//!
//! Exactly one listener can capture. Filters ask for capture changes through
//! [`CaptureRequest`] and the pool applies them with [`ListenerPool::capture`]
//! and [`ListenerPool::release`], the only writers of the slot.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::event::MouseEvent;
use crate::filter::{CaptureRequest, Capturing, MouseCallback, MouseEventFilter, MouseResult};
use crate::host::{MouseHost, SceneQuery};

/// Identifier of a registered listener. Never reused within a pool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

struct Listener<K, H> {
    id: ListenerId,
    filter: MouseEventFilter<K>,
    callback: MouseCallback<K, H>,
}

/// All registered filters in dispatch order, plus the capture slot.
pub struct ListenerPool<K, H> {
    listeners: Vec<Listener<K, H>>,
    capturing: Option<ListenerId>,
    next_index: u64,
    sort_epoch: u64,
}

impl<K, H> core::fmt::Debug for ListenerPool<K, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListenerPool")
            .field("len", &self.listeners.len())
            .field("capturing", &self.capturing)
            .field("sort_epoch", &self.sort_epoch)
            .finish_non_exhaustive()
    }
}

impl<K, H> Default for ListenerPool<K, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, H> ListenerPool<K, H> {
    /// An empty pool.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            capturing: None,
            next_index: 0,
            sort_epoch: 0,
        }
    }

    /// Number of registered listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// How many times the pool has been resorted.
    pub fn sort_epoch(&self) -> u64 {
        self.sort_epoch
    }

    /// Listener ids in current dispatch order.
    pub fn ids(&self) -> impl Iterator<Item = ListenerId> + '_ {
        self.listeners.iter().map(|l| l.id)
    }

    /// The filter registered under `id`.
    pub fn filter(&self, id: ListenerId) -> Option<&MouseEventFilter<K>> {
        self.position(id).map(|i| &self.listeners[i].filter)
    }

    /// The capturing listener, if any.
    pub fn capturing(&self) -> Option<ListenerId> {
        self.capturing
    }

    /// Make `id` the capturing listener.
    ///
    /// Returns false when `id` is not registered or another listener already
    /// captures; capture is never taken over.
    pub fn capture(&mut self, id: ListenerId) -> bool {
        if self.position(id).is_none() {
            return false;
        }
        match self.capturing {
            Some(current) if current == id => true,
            Some(current) => {
                log::debug!("capture refused for {id:?}, held by {current:?}");
                false
            }
            None => {
                log::debug!("capture granted to {id:?}");
                self.capturing = Some(id);
                true
            }
        }
    }

    /// Release capture if `id` holds it. Returns whether it did.
    pub fn release(&mut self, id: ListenerId) -> bool {
        if self.capturing != Some(id) {
            return false;
        }
        log::debug!("capture released by {id:?}");
        self.capturing = None;
        true
    }

    /// Remove a listener, releasing capture first if it holds it.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let Some(i) = self.position(id) else {
            return false;
        };
        self.release(id);
        self.listeners.remove(i);
        log::debug!("unregistered mouse listener {id:?}");
        true
    }

    /// Recompute every filter's priority and re-sort.
    pub fn resort(&mut self, scene: &impl SceneQuery<K>)
    where
        K: Copy + PartialEq,
    {
        for listener in &mut self.listeners {
            listener.filter.refresh_priority(scene);
        }
        self.listeners
            .sort_by(|a, b| a.filter.dispatch_order(&b.filter));
        self.sort_epoch += 1;
        log::debug!("resorted {} mouse listeners", self.listeners.len());
    }

    fn position(&self, id: ListenerId) -> Option<usize> {
        self.listeners.iter().position(|l| l.id == id)
    }
}

impl<K: Copy + PartialEq, H> ListenerPool<K, H> {
    /// Add a listener and return its id.
    ///
    /// A keyed filter replaces the listener already holding the same key on
    /// the same node.
    pub fn register(
        &mut self,
        mut filter: MouseEventFilter<K>,
        callback: impl FnMut(&mut H, &MouseEvent<K>) -> MouseResult + 'static,
    ) -> ListenerId {
        if let (Some(node), Some(key)) = (filter.target().copied(), filter.key())
            && let Some(old) = self.listener_for(&node, key)
        {
            self.unregister(old);
        }
        let id = ListenerId(self.next_index);
        filter.set_registration_index(self.next_index);
        self.next_index += 1;
        self.listeners.push(Listener {
            id,
            filter,
            callback: Box::new(callback),
        });
        log::debug!("registered mouse listener {id:?}");
        id
    }

    /// The listener holding `key` on `node`.
    pub fn listener_for(&self, node: &K, key: &str) -> Option<ListenerId> {
        self.listeners
            .iter()
            .find(|l| l.filter.target() == Some(node) && l.filter.key() == Some(key))
            .map(|l| l.id)
    }

    /// Remove the listener holding `key` on `node`.
    pub fn unregister_keyed(&mut self, node: &K, key: &str) -> bool {
        self.listener_for(node, key)
            .is_some_and(|id| self.unregister(id))
    }

    /// Remove every listener targeting `node`. Returns how many were removed.
    pub fn unregister_node(&mut self, node: &K) -> usize {
        let ids: Vec<_> = self
            .listeners
            .iter()
            .filter(|l| l.filter.target() == Some(node))
            .map(|l| l.id)
            .collect();
        for id in &ids {
            self.unregister(*id);
        }
        ids.len()
    }

    /// The node of the capturing listener. `None` when nothing captures or the
    /// capturing listener is global.
    pub fn capturing_node(&self) -> Option<K> {
        self.filter(self.capturing?)?.target().copied()
    }

    /// Run `event` through every listener in order.
    ///
    /// A hover transition noticed by one filter is delivered to every listener
    /// on that node, before the noticing filter's callback sees the event.
    pub fn dispatch(&mut self, host: &mut H, event: &mut MouseEvent<K>)
    where
        H: MouseHost<K>,
    {
        log::trace!("dispatching {:?}", event.kind());
        debug_assert!(
            self.capturing.is_none_or(|id| self.position(id).is_some()),
            "capture slot refers to an unregistered listener"
        );
        let mut owner = self.capturing_node();
        for i in 0..self.listeners.len() {
            let capturing = self.capturing_for(i, owner.as_ref());
            let listener = &mut self.listeners[i];
            let id = listener.id;
            let admission = listener.filter.admit(host, event, capturing);
            if let (Some(enter), Some(node)) = (admission.hover, listener.filter.target().copied())
            {
                self.deliver_hover(host, node, enter, event);
            }
            let request = if admission.proceed {
                let listener = &mut self.listeners[i];
                listener
                    .filter
                    .run(host, event, capturing, &mut listener.callback)
            } else {
                admission.request
            };
            match request {
                CaptureRequest::None => continue,
                CaptureRequest::Capture => {
                    self.capture(id);
                }
                CaptureRequest::Release => {
                    self.release(id);
                }
            }
            owner = self.capturing_node();
        }
    }

    fn capturing_for(&self, i: usize, owner: Option<&K>) -> Capturing {
        let listener = &self.listeners[i];
        match self.capturing {
            None => Capturing::Nothing,
            Some(id) if id == listener.id => Capturing::This,
            Some(_) if owner.is_some() && listener.filter.target() == owner => Capturing::SameNode,
            Some(_) => Capturing::Other,
        }
    }

    fn deliver_hover(&mut self, host: &mut H, node: K, enter: bool, event: &MouseEvent<K>) {
        log::trace!("hover {}", if enter { "enter" } else { "leave" });
        let hover = MouseEvent::hover(node, enter, event.position());
        for listener in &mut self.listeners {
            if listener.filter.target() == Some(&node) {
                // Hover results carry no meaning.
                let _ = (listener.callback)(host, &hover);
            }
        }
    }
}
