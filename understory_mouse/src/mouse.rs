// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The mouse coordinator.
//!
//! [`Mouse`] is the handle the host application owns. It wraps a
//! [`ListenerPool`] and a [`FrameQueue`], exposes capture and held-button
//! queries, and debounces resorts: registering or unregistering listeners only
//! schedules a resort, which runs once in the next [`Mouse::begin_frame`].
//!
//! ```
//! # use understory_mouse::button::MouseButton;
//! # use understory_mouse::filter::{MouseEventFilter, MouseResult};
//! # use understory_mouse::mouse::Mouse;
//! # use understory_mouse::host::*;
//! # use understory_mouse::touch::TouchDelegate;
//! # use kurbo::{Point, Rect};
//! # use std::any::Any;
//! # use std::collections::HashMap;
//! # #[derive(Default)]
//! # struct Host(HashMap<&'static str, Box<dyn Any>>);
//! # impl SceneQuery<u32> for Host {
//! #     fn is_alive(&self, _: &u32) -> bool { true }
//! #     fn is_visible(&self, _: &u32) -> bool { true }
//! #     fn is_attached(&self, _: &u32) -> bool { true }
//! #     fn parent_of(&self, _: &u32) -> Option<u32> { None }
//! #     fn child_index(&self, _: &u32) -> Option<usize> { None }
//! #     fn bounding_box(&self, _: &u32) -> Option<Rect> { Some(Rect::new(0.0, 0.0, 50.0, 50.0)) }
//! #     fn to_parent_space(&self, _: &u32, p: Point) -> Option<Point> { Some(p) }
//! # }
//! # impl AttributeStore<u32> for Host {
//! #     fn attribute<T: Any>(&self, _: &u32, key: &str) -> Option<&T> { self.0.get(key)?.downcast_ref() }
//! #     fn set_attribute<T: Any>(&mut self, _: &u32, key: &'static str, v: T) { self.0.insert(key, Box::new(v)); }
//! # }
//! # impl DelegateLookup<u32> for Host {
//! #     fn touch_delegate(&mut self, _: &u32) -> Option<&mut dyn TouchDelegate> { None }
//! # }
//! let mut host = Host::default();
//! let mut mouse = Mouse::new();
//! mouse.register(MouseEventFilter::node(1), |_, _| MouseResult::Swallow);
//! assert!(mouse.resort_scheduled());
//! assert!(mouse.begin_frame(&host));
//!
//! assert!(mouse.post_click(&mut host, MouseButton::Left, true, Point::new(10.0, 10.0)));
//! assert_eq!(mouse.capturing_node(), Some(1));
//! assert!(mouse.is_held(&host, MouseButton::Left));
//!
//! mouse.post_click(&mut host, MouseButton::Left, false, Point::new(90.0, 90.0));
//! assert_eq!(mouse.capturing_node(), None);
//! ```

use kurbo::{Point, Vec2};

use crate::button::{MouseButton, MouseButtons};
use crate::event::MouseEvent;
use crate::filter::{MouseEventFilter, MouseResult};
use crate::frame::{Deferred, FrameQueue};
use crate::host::{AttributeStore, MouseHost, SceneQuery};
use crate::pool::{ListenerId, ListenerPool};
use crate::state::MouseAttributes;

/// Mouse coordinator: listener pool, capture, and resort scheduling.
pub struct Mouse<K, H> {
    pool: ListenerPool<K, H>,
    frame: FrameQueue,
}

impl<K, H> core::fmt::Debug for Mouse<K, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mouse")
            .field("pool", &self.pool)
            .field("frame", &self.frame)
            .finish()
    }
}

impl<K, H> Default for Mouse<K, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, H> Mouse<K, H> {
    /// A coordinator with no listeners.
    pub fn new() -> Self {
        Self {
            pool: ListenerPool::new(),
            frame: FrameQueue::new(),
        }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &ListenerPool<K, H> {
        &self.pool
    }

    /// The capturing listener, if any.
    pub fn capturing(&self) -> Option<ListenerId> {
        self.pool.capturing()
    }

    /// See [`ListenerPool::capture`].
    pub fn capture(&mut self, id: ListenerId) -> bool {
        self.pool.capture(id)
    }

    /// See [`ListenerPool::release`].
    pub fn release(&mut self, id: ListenerId) -> bool {
        self.pool.release(id)
    }

    /// Remove a listener and schedule a resort.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let removed = self.pool.unregister(id);
        if removed {
            self.schedule_resort();
        }
        removed
    }

    /// Ask for a resort at the next frame. Returns false if one was already
    /// pending.
    pub fn schedule_resort(&mut self) -> bool {
        self.frame.schedule(Deferred::Resort)
    }

    /// Whether a resort is waiting for the next frame.
    pub fn resort_scheduled(&self) -> bool {
        self.frame.is_pending()
    }

    /// The active scene changed; listener order must be rebuilt.
    pub fn scene_switched(&mut self) {
        log::debug!("scene switched, scheduling listener resort");
        self.schedule_resort();
    }
}

impl<K: Copy + PartialEq, H> Mouse<K, H> {
    /// Register a listener and schedule a resort.
    pub fn register(
        &mut self,
        filter: MouseEventFilter<K>,
        callback: impl FnMut(&mut H, &MouseEvent<K>) -> MouseResult + 'static,
    ) -> ListenerId {
        let id = self.pool.register(filter, callback);
        self.schedule_resort();
        id
    }

    /// Remove every listener on `node` and schedule a resort if any were
    /// removed.
    pub fn unregister_node(&mut self, node: &K) -> usize {
        let removed = self.pool.unregister_node(node);
        if removed > 0 {
            self.schedule_resort();
        }
        removed
    }

    /// Remove the listener holding `key` on `node`.
    pub fn unregister_keyed(&mut self, node: &K, key: &str) -> bool {
        let removed = self.pool.unregister_keyed(node, key);
        if removed {
            self.schedule_resort();
        }
        removed
    }

    /// See [`ListenerPool::listener_for`].
    pub fn listener_for(&self, node: &K, key: &str) -> Option<ListenerId> {
        self.pool.listener_for(node, key)
    }

    /// The capturing listener's node.
    pub fn capturing_node(&self) -> Option<K> {
        self.pool.capturing_node()
    }

    /// Buttons held by the capturing node; empty when nothing captures.
    pub fn held_buttons(&self, host: &impl AttributeStore<K>) -> MouseButtons {
        self.capturing_node()
            .map(|node| MouseAttributes::of(node).held(host))
            .unwrap_or_default()
    }

    /// Whether the capturing node holds `button`.
    pub fn is_held(&self, host: &impl AttributeStore<K>, button: MouseButton) -> bool {
        self.held_buttons(host).has(button)
    }

    /// Run deferred work for a new frame. Returns whether a resort ran.
    pub fn begin_frame(&mut self, scene: &impl SceneQuery<K>) -> bool {
        match self.frame.take() {
            Some(Deferred::Resort) => {
                self.pool.resort(scene);
                true
            }
            None => false,
        }
    }

    /// Run `event` through every listener.
    pub fn dispatch(&mut self, host: &mut H, event: &mut MouseEvent<K>)
    where
        H: MouseHost<K>,
    {
        self.pool.dispatch(host, event);
    }

    /// Post a click addressed to the capturing node, or untargeted when
    /// nothing captures. Returns whether it was swallowed.
    pub fn post_click(
        &mut self,
        host: &mut H,
        button: MouseButton,
        down: bool,
        position: Point,
    ) -> bool
    where
        H: MouseHost<K>,
    {
        self.post(host, MouseEvent::click(button, down, position))
    }

    /// Post a move; see [`post_click`](Self::post_click).
    pub fn post_move(&mut self, host: &mut H, position: Point) -> bool
    where
        H: MouseHost<K>,
    {
        self.post(host, MouseEvent::moved(position))
    }

    /// Post a scroll; see [`post_click`](Self::post_click).
    ///
    /// An unswallowed scroll should continue to the engine's own scroll
    /// handling.
    pub fn post_scroll(&mut self, host: &mut H, delta: Vec2, position: Point) -> bool
    where
        H: MouseHost<K>,
    {
        self.post(host, MouseEvent::scroll(delta, position))
    }

    fn post(&mut self, host: &mut H, event: MouseEvent<K>) -> bool
    where
        H: MouseHost<K>,
    {
        let mut event = event.with_target(self.capturing_node());
        self.dispatch(host, &mut event);
        event.is_swallowed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseEventKind;
    use crate::testing::{Call, TestScene};
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    #[test]
    fn fifty_registrations_resort_once() {
        let mut scene = TestScene::new();
        let mut mouse = Mouse::<u32, TestScene>::new();
        for _ in 0..50 {
            let n = scene.add(TestScene::ROOT, (0.0, 0.0, 10.0, 10.0));
            mouse.register(MouseEventFilter::node(n), |_, _| MouseResult::Eat);
        }
        assert!(mouse.resort_scheduled());
        assert_eq!(mouse.pool().sort_epoch(), 0, "nothing sorts inline");

        assert!(mouse.begin_frame(&scene));
        assert!(!mouse.begin_frame(&scene));
        assert_eq!(mouse.pool().sort_epoch(), 1);
        assert_eq!(mouse.pool().len(), 50);
    }

    #[test]
    fn held_follows_the_capturing_node() {
        let mut scene = TestScene::new();
        let n = scene.add(TestScene::ROOT, (0.0, 0.0, 10.0, 10.0));
        let mut mouse = Mouse::new();
        mouse.register(MouseEventFilter::node(n), |_, _| MouseResult::Swallow);
        mouse.begin_frame(&scene);

        assert!(!mouse.is_held(&scene, MouseButton::Right));
        mouse.post_click(&mut scene, MouseButton::Right, true, Point::new(5.0, 5.0));
        assert_eq!(mouse.capturing_node(), Some(n));
        assert!(mouse.is_held(&scene, MouseButton::Right));
        assert_eq!(mouse.held_buttons(&scene), MouseButtons::RIGHT);

        mouse.post_click(&mut scene, MouseButton::Right, false, Point::new(5.0, 5.0));
        assert_eq!(mouse.capturing(), None);
        assert!(!mouse.is_held(&scene, MouseButton::Right));
    }

    #[test]
    fn no_other_node_hovers_while_captured() {
        let mut scene = TestScene::new();
        let left = scene.add(TestScene::ROOT, (0.0, 0.0, 100.0, 100.0));
        let right = scene.add(TestScene::ROOT, (200.0, 0.0, 300.0, 100.0));
        let hovers = Rc::new(RefCell::new(Vec::new()));
        let mut mouse = Mouse::new();
        for node in [left, right] {
            let hovers = hovers.clone();
            mouse.register(MouseEventFilter::node(node), move |_, ev| {
                if let MouseEventKind::Hover { enter } = ev.kind() {
                    hovers.borrow_mut().push((node, *enter));
                }
                MouseResult::Swallow
            });
        }
        mouse.begin_frame(&scene);

        mouse.post_click(&mut scene, MouseButton::Left, true, Point::new(50.0, 50.0));
        assert_eq!(mouse.capturing_node(), Some(left));
        for x in [150.0, 250.0, 260.0] {
            mouse.post_move(&mut scene, Point::new(x, 50.0));
            assert!(!MouseAttributes::of(right).is_hovered(&scene));
        }
        assert_eq!(*hovers.borrow(), [(left, true), (left, false)]);

        mouse.post_click(&mut scene, MouseButton::Left, false, Point::new(260.0, 50.0));
        assert_eq!(mouse.capturing(), None);
        mouse.post_move(&mut scene, Point::new(261.0, 50.0));
        assert_eq!(hovers.borrow().last(), Some(&(right, true)));
    }

    #[test]
    fn captured_drag_reaches_native_delegate() {
        let mut scene = TestScene::new();
        let n = scene.add(TestScene::ROOT, (0.0, 0.0, 10.0, 10.0));
        let calls = scene.record_touches(n);
        let mut mouse = Mouse::new();
        mouse.register(MouseEventFilter::node(n), |_, _| MouseResult::Swallow);
        mouse.begin_frame(&scene);

        mouse.post_click(&mut scene, MouseButton::Left, true, Point::new(5.0, 5.0));
        mouse.post_move(&mut scene, Point::new(40.0, 5.0));
        mouse.post_click(&mut scene, MouseButton::Left, false, Point::new(40.0, 5.0));
        assert_eq!(
            *calls.borrow(),
            [
                Call::Began(Point::new(5.0, 5.0)),
                Call::Moved(Point::new(40.0, 5.0)),
                Call::Ended(Point::new(40.0, 5.0)),
            ]
        );
    }

    #[test]
    fn unswallowed_scroll_falls_through() {
        let mut scene = TestScene::new();
        let n = scene.add(TestScene::ROOT, (0.0, 0.0, 10.0, 10.0));
        let scrolls = scene.record_scrolls(n);
        let mut mouse = Mouse::new();
        mouse.register(MouseEventFilter::node(n), |_, _| MouseResult::Eat);
        mouse.begin_frame(&scene);

        let swallowed = mouse.post_scroll(&mut scene, Vec2::new(1.0, -2.0), Point::new(5.0, 5.0));
        assert!(!swallowed);
        assert_eq!(*scrolls.borrow(), [Call::Scroll(1.0, -2.0)]);
    }

    #[test]
    fn unregister_schedules_resort_only_when_something_changed() {
        let scene = TestScene::new();
        let mut mouse = Mouse::<u32, TestScene>::new();
        let id = mouse.register(MouseEventFilter::global(), |_, _| MouseResult::Eat);
        mouse.begin_frame(&scene);

        assert_eq!(mouse.unregister_node(&7), 0);
        assert!(!mouse.resort_scheduled());
        assert!(mouse.unregister(id));
        assert!(mouse.resort_scheduled());

        mouse.begin_frame(&scene);
        mouse.scene_switched();
        assert!(mouse.resort_scheduled());
    }
}
