// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch emulation bridge.
//!
//! ## Touch dispatch
//!
//! [`TouchDispatcher`] models the engine's touch entry point: an ordered chain
//! of [`TouchHook`]s that see every touch and may move it, followed by final
//! delivery. Mouse events go through the same chain wrapped in
//! [`TouchPayload::Mouse`]. Final delivery recognizes the wrapper, copies the
//! touch location (possibly moved by a hook) back into the event, and hands the
//! event to the [`Mouse`] coordinator instead of the native delegates.
//!
//! ## Delegate synchronization
//!
//! Nodes that register a native touch delegate get a mouse filter too, so
//! mouse clicks reach them even when nobody registered one explicitly. The
//! filter lives under [`TOUCH_FILTER_KEY`], giving each node at most one.

use alloc::boxed::Box;
use alloc::vec::Vec;

use kurbo::Point;

use crate::event::MouseEvent;
use crate::filter::{MouseEventFilter, MouseResult};
use crate::host::MouseHost;
use crate::mouse::Mouse;
use crate::pool::ListenerId;
use crate::touch::{Touch, TouchPhase};

/// Key of the filter registered for a node's native touch delegate.
pub const TOUCH_FILTER_KEY: &str = "understory_mouse/touch";

/// Observer on the touch entry point.
pub trait TouchHook {
    /// Called for every touch before delivery. May move the touch.
    fn on_touch(&mut self, touch: &mut Touch, phase: TouchPhase);
}

impl<F: FnMut(&mut Touch, TouchPhase)> TouchHook for F {
    fn on_touch(&mut self, touch: &mut Touch, phase: TouchPhase) {
        self(touch, phase);
    }
}

/// What travels alongside a touch through the entry point.
#[derive(Debug)]
pub enum TouchPayload<'a, K> {
    /// A real touch.
    Native,
    /// A mouse event replayed as a touch.
    Mouse(&'a mut MouseEvent<K>),
}

/// Outcome of [`TouchDispatcher::touches`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Native touch; the caller continues with the engine's delegate
    /// iteration.
    Native,
    /// A mouse event was routed to the coordinator.
    Routed {
        /// Whether a listener swallowed it.
        swallowed: bool,
    },
}

/// The touch entry point with its hook chain.
#[derive(Default)]
pub struct TouchDispatcher {
    hooks: Vec<Box<dyn TouchHook>>,
}

impl core::fmt::Debug for TouchDispatcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TouchDispatcher")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl TouchDispatcher {
    /// A dispatcher without hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook; hooks run in the order they were added.
    pub fn add_hook(&mut self, hook: impl TouchHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    /// Number of installed hooks.
    pub fn hook_count(&self) -> usize {
        self.hooks.len()
    }

    /// Run `touch` through the hooks, then deliver it.
    pub fn touches<K, H>(
        &mut self,
        mouse: &mut Mouse<K, H>,
        host: &mut H,
        touch: &mut Touch,
        phase: TouchPhase,
        payload: TouchPayload<'_, K>,
    ) -> Delivery
    where
        K: Copy + PartialEq,
        H: MouseHost<K>,
    {
        for hook in &mut self.hooks {
            hook.on_touch(touch, phase);
        }
        match payload {
            TouchPayload::Native => Delivery::Native,
            TouchPayload::Mouse(event) => {
                event.set_position(touch.location());
                mouse.dispatch(host, event);
                Delivery::Routed {
                    swallowed: event.is_swallowed(),
                }
            }
        }
    }

    /// Replay `event` through the entry point as a synthetic touch.
    ///
    /// Returns whether a listener swallowed it.
    pub fn post_through_touches<K, H>(
        &mut self,
        mouse: &mut Mouse<K, H>,
        host: &mut H,
        event: &mut MouseEvent<K>,
    ) -> bool
    where
        K: Copy + PartialEq,
        H: MouseHost<K>,
    {
        let mut touch = event.create_touch();
        let phase = touch_phase(event);
        let delivery = self.touches(mouse, host, &mut touch, phase, TouchPayload::Mouse(event));
        matches!(delivery, Delivery::Routed { swallowed: true })
    }
}

/// Touch phase a mouse event is replayed as.
pub fn touch_phase<K>(event: &MouseEvent<K>) -> TouchPhase {
    use crate::event::MouseEventKind;
    match event.kind() {
        MouseEventKind::Click { down: true, .. } => TouchPhase::Began,
        MouseEventKind::Click { down: false, .. } => TouchPhase::Ended,
        MouseEventKind::Move => TouchPhase::Moved,
        MouseEventKind::Scroll { .. } | MouseEventKind::Hover { .. } => TouchPhase::Other,
    }
}

/// A node registered a standard (multi-touch) delegate: it eats mouse events.
///
/// Returns `None` when the node already has a touch filter.
pub fn standard_delegate_added<K, H>(mouse: &mut Mouse<K, H>, node: K) -> Option<ListenerId>
where
    K: Copy + PartialEq + 'static,
    H: 'static,
{
    add_delegate_filter(mouse, node, MouseResult::Eat)
}

/// A node registered a targeted delegate: it swallows mouse events if the
/// delegate swallows touches, and eats them otherwise.
///
/// Returns `None` when the node already has a touch filter.
pub fn targeted_delegate_added<K, H>(
    mouse: &mut Mouse<K, H>,
    node: K,
    swallows: bool,
) -> Option<ListenerId>
where
    K: Copy + PartialEq + 'static,
    H: 'static,
{
    let result = if swallows {
        MouseResult::Swallow
    } else {
        MouseResult::Eat
    };
    add_delegate_filter(mouse, node, result)
}

/// A node's touch delegate went away. Returns whether a filter was removed.
pub fn delegate_removed<K, H>(mouse: &mut Mouse<K, H>, node: &K) -> bool
where
    K: Copy + PartialEq,
{
    let removed = mouse.unregister_keyed(node, TOUCH_FILTER_KEY);
    mouse.schedule_resort();
    removed
}

fn add_delegate_filter<K, H>(
    mouse: &mut Mouse<K, H>,
    node: K,
    result: MouseResult,
) -> Option<ListenerId>
where
    K: Copy + PartialEq + 'static,
    H: 'static,
{
    if mouse.listener_for(&node, TOUCH_FILTER_KEY).is_some() {
        return None;
    }
    let filter = MouseEventFilter::node(node).with_key(TOUCH_FILTER_KEY);
    Some(mouse.register(filter, move |_, _| result))
}

/// Filter and callback for a menu: a full-screen listener that swallows when
/// `item_at` reports an item under the pointer and leaves otherwise.
///
/// The filter takes the touch slot, so a later delegate registration for the
/// same node is ignored.
pub fn menu_filter<K, H>(
    node: K,
    item_at: impl Fn(&H, &K, Point) -> bool + 'static,
) -> (
    MouseEventFilter<K>,
    impl FnMut(&mut H, &MouseEvent<K>) -> MouseResult + 'static,
)
where
    K: Copy + 'static,
    H: 'static,
{
    let filter = MouseEventFilter::node(node)
        .ignoring_position()
        .with_key(TOUCH_FILTER_KEY);
    let callback = move |host: &mut H, event: &MouseEvent<K>| {
        if item_at(&*host, &node, event.position()) {
            MouseResult::Swallow
        } else {
            MouseResult::Leave
        }
    };
    (filter, callback)
}

/// Register [`menu_filter`] for `node`.
pub fn register_menu<K, H>(
    mouse: &mut Mouse<K, H>,
    node: K,
    item_at: impl Fn(&H, &K, Point) -> bool + 'static,
) -> ListenerId
where
    K: Copy + PartialEq + 'static,
    H: 'static,
{
    let (filter, callback) = menu_filter(node, item_at);
    mouse.register(filter, callback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::MouseButton;
    use crate::testing::{Call, TestScene};
    use alloc::rc::Rc;
    use core::cell::RefCell;
    use kurbo::Vec2;

    #[test]
    fn hook_moves_the_mouse_event() {
        let mut scene = TestScene::new();
        let n = scene.add(TestScene::ROOT, (100.0, 0.0, 110.0, 10.0));
        let calls = scene.record_touches(n);
        let mut mouse = Mouse::new();
        mouse.register(MouseEventFilter::node(n), |_, _| MouseResult::Swallow);
        mouse.begin_frame(&scene);

        let phases = Rc::new(RefCell::new(Vec::new()));
        let seen = phases.clone();
        let mut dispatcher = TouchDispatcher::new();
        dispatcher.add_hook(move |touch: &mut Touch, phase: TouchPhase| {
            seen.borrow_mut().push(phase);
            touch.set_location(touch.location() + Vec2::new(100.0, 0.0));
        });

        let mut ev = MouseEvent::click(MouseButton::Left, true, Point::new(5.0, 5.0));
        assert!(dispatcher.post_through_touches(&mut mouse, &mut scene, &mut ev));
        assert_eq!(ev.position(), Point::new(105.0, 5.0));
        assert_eq!(mouse.capturing_node(), Some(n));
        assert_eq!(*calls.borrow(), [Call::Began(Point::new(105.0, 5.0))]);
        assert_eq!(*phases.borrow(), [TouchPhase::Began]);
    }

    #[test]
    fn native_touches_are_left_to_the_engine() {
        let mut scene = TestScene::new();
        let mut mouse = Mouse::<u32, TestScene>::new();
        let mut dispatcher = TouchDispatcher::new();
        assert_eq!(dispatcher.hook_count(), 0);
        let phases = Rc::new(RefCell::new(Vec::new()));
        let seen = phases.clone();
        dispatcher.add_hook(move |_: &mut Touch, phase: TouchPhase| {
            seen.borrow_mut().push(phase);
        });

        let mut touch = Touch::new(Point::ZERO);
        for phase in [TouchPhase::Began, TouchPhase::Cancelled] {
            let delivery = dispatcher.touches(
                &mut mouse,
                &mut scene,
                &mut touch,
                phase,
                TouchPayload::Native,
            );
            assert_eq!(delivery, Delivery::Native);
        }
        assert_eq!(*phases.borrow(), [TouchPhase::Began, TouchPhase::Cancelled]);
    }

    #[test]
    fn phases_follow_the_event() {
        let at = Point::ZERO;
        assert_eq!(
            touch_phase(&MouseEvent::<u32>::click(MouseButton::Right, true, at)),
            TouchPhase::Began
        );
        assert_eq!(
            touch_phase(&MouseEvent::<u32>::click(MouseButton::Left, false, at)),
            TouchPhase::Ended
        );
        assert_eq!(touch_phase(&MouseEvent::<u32>::moved(at)), TouchPhase::Moved);
        assert_eq!(
            touch_phase(&MouseEvent::<u32>::scroll(Vec2::new(0.0, 1.0), at)),
            TouchPhase::Other
        );
    }

    #[test]
    fn duplicate_delegate_registration_is_ignored() {
        let scene = TestScene::new();
        let mut mouse = Mouse::<u32, TestScene>::new();
        let first = standard_delegate_added(&mut mouse, 4);
        assert!(first.is_some());
        assert!(targeted_delegate_added(&mut mouse, 4, true).is_none());
        assert_eq!(mouse.pool().len(), 1);
        mouse.begin_frame(&scene);

        assert!(delegate_removed(&mut mouse, &4));
        assert!(mouse.resort_scheduled());
        assert!(!delegate_removed(&mut mouse, &4));
        assert!(mouse.pool().is_empty());
    }

    #[test]
    fn targeted_delegate_swallow_flag_decides_capture() {
        let mut scene = TestScene::new();
        let eats = scene.add(TestScene::ROOT, (0.0, 0.0, 10.0, 10.0));
        let swallows = scene.add(TestScene::ROOT, (20.0, 0.0, 30.0, 10.0));
        let mut mouse = Mouse::new();
        targeted_delegate_added(&mut mouse, eats, false);
        targeted_delegate_added(&mut mouse, swallows, true);
        mouse.begin_frame(&scene);

        assert!(!mouse.post_click(&mut scene, MouseButton::Left, true, Point::new(5.0, 5.0)));
        assert_eq!(mouse.capturing(), None);
        mouse.post_click(&mut scene, MouseButton::Left, false, Point::new(5.0, 5.0));

        assert!(mouse.post_click(&mut scene, MouseButton::Left, true, Point::new(25.0, 5.0)));
        assert_eq!(mouse.capturing_node(), Some(swallows));
    }

    #[test]
    fn app_listener_beside_delegate_filter_sees_hover() {
        use crate::event::MouseEventKind;
        use crate::state::MouseAttributes;

        let mut scene = TestScene::new();
        let n = scene.add(TestScene::ROOT, (0.0, 0.0, 100.0, 100.0));
        let mut mouse = Mouse::new();
        targeted_delegate_added(&mut mouse, n, true);
        let hovers = Rc::new(RefCell::new(Vec::new()));
        let seen = hovers.clone();
        mouse.register(MouseEventFilter::node(n), move |_, ev| {
            if let MouseEventKind::Hover { enter } = ev.kind() {
                seen.borrow_mut().push(*enter);
            }
            MouseResult::Eat
        });
        mouse.begin_frame(&scene);

        for x in [10.0, 20.0, 30.0] {
            mouse.post_move(&mut scene, Point::new(x, 10.0));
            assert!(MouseAttributes::of(n).is_hovered(&scene));
        }
        mouse.post_click(&mut scene, MouseButton::Left, true, Point::new(30.0, 10.0));
        mouse.post_move(&mut scene, Point::new(40.0, 10.0));
        assert!(mouse.is_held(&scene, MouseButton::Left));
        mouse.post_click(&mut scene, MouseButton::Left, false, Point::new(40.0, 10.0));
        mouse.post_move(&mut scene, Point::new(300.0, 10.0));
        assert!(!MouseAttributes::of(n).is_hovered(&scene));
        assert_eq!(*hovers.borrow(), [true, false]);
    }

    #[test]
    fn menu_swallows_only_over_items() {
        let mut scene = TestScene::new();
        let menu = scene.add(TestScene::ROOT, (0.0, 0.0, 10.0, 10.0));
        let mut mouse = Mouse::new();
        register_menu(&mut mouse, menu, |_: &TestScene, _: &u32, p: Point| {
            p.x < 50.0
        });
        assert!(
            standard_delegate_added(&mut mouse, menu).is_none(),
            "the menu holds the touch slot"
        );
        mouse.begin_frame(&scene);

        assert!(!mouse.post_click(&mut scene, MouseButton::Left, true, Point::new(80.0, 5.0)));
        assert_eq!(mouse.capturing(), None);
        assert!(mouse.post_click(&mut scene, MouseButton::Left, true, Point::new(40.0, 500.0)));
        assert_eq!(mouse.capturing_node(), Some(menu));
    }
}
