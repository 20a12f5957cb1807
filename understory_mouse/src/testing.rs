// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-crate test host: a tiny untransformed scene keyed by `u32`.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::Any;
use core::cell::RefCell;

use hashbrown::HashMap;
use kurbo::{Point, Rect};

use crate::host::{AttributeStore, DelegateLookup, SceneQuery};
use crate::touch::{ScrollDelegate, Touch, TouchContext, TouchDelegate};

/// A native handler call seen by a recording delegate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Call {
    Began(Point),
    Moved(Point),
    Ended(Point),
    Cancelled(Point),
    Scroll(f64, f64),
}

pub(crate) type Calls = Rc<RefCell<Vec<Call>>>;

struct Recorder {
    calls: Calls,
}

impl TouchDelegate for Recorder {
    fn touch_began(&mut self, touch: &Touch, _: &TouchContext) -> bool {
        self.calls.borrow_mut().push(Call::Began(touch.location()));
        true
    }

    fn touch_moved(&mut self, touch: &Touch, _: &TouchContext) {
        self.calls.borrow_mut().push(Call::Moved(touch.location()));
    }

    fn touch_ended(&mut self, touch: &Touch, _: &TouchContext) {
        self.calls.borrow_mut().push(Call::Ended(touch.location()));
    }

    fn touch_cancelled(&mut self, touch: &Touch, _: &TouchContext) {
        self.calls
            .borrow_mut()
            .push(Call::Cancelled(touch.location()));
    }
}

impl ScrollDelegate for Recorder {
    fn scroll_wheel(&mut self, delta_x: f64, delta_y: f64) {
        self.calls.borrow_mut().push(Call::Scroll(delta_x, delta_y));
    }
}

struct TestNode {
    parent: Option<u32>,
    children: Vec<u32>,
    rect: Rect,
    visible: bool,
}

/// Every node's bounds are given directly in world space.
pub(crate) struct TestScene {
    nodes: Vec<Option<TestNode>>,
    attributes: HashMap<(u32, &'static str), Box<dyn Any>>,
    touch: HashMap<u32, Recorder>,
    scroll: HashMap<u32, Recorder>,
}

impl TestScene {
    pub(crate) const ROOT: u32 = 0;

    pub(crate) fn new() -> Self {
        Self {
            nodes: alloc::vec![Some(TestNode {
                parent: None,
                children: Vec::new(),
                rect: Rect::new(0.0, 0.0, 1000.0, 1000.0),
                visible: true,
            })],
            attributes: HashMap::new(),
            touch: HashMap::new(),
            scroll: HashMap::new(),
        }
    }

    /// Append a child of `parent` covering `(x0, y0, x1, y1)`.
    pub(crate) fn add(&mut self, parent: u32, (x0, y0, x1, y1): (f64, f64, f64, f64)) -> u32 {
        let id = u32::try_from(self.nodes.len()).unwrap();
        self.nodes.push(Some(TestNode {
            parent: Some(parent),
            children: Vec::new(),
            rect: Rect::new(x0, y0, x1, y1),
            visible: true,
        }));
        self.node_mut(parent).children.push(id);
        id
    }

    pub(crate) fn set_visible(&mut self, node: u32, visible: bool) {
        self.node_mut(node).visible = visible;
    }

    /// Unlink `node` from its parent; it stays alive but is no longer attached.
    pub(crate) fn detach(&mut self, node: u32) {
        if let Some(parent) = self.node_mut(node).parent.take() {
            self.node_mut(parent).children.retain(|c| *c != node);
        }
    }

    /// Drop `node` (not its children).
    pub(crate) fn destroy(&mut self, node: u32) {
        self.detach(node);
        self.nodes[node as usize] = None;
        self.attributes.retain(|(n, _), _| *n != node);
        self.touch.remove(&node);
        self.scroll.remove(&node);
    }

    /// Move `node` to the end of its parent's children.
    pub(crate) fn raise(&mut self, node: u32) {
        let parent = self.node_mut(node).parent.unwrap();
        let children = &mut self.node_mut(parent).children;
        children.retain(|c| *c != node);
        children.push(node);
    }

    pub(crate) fn record_touches(&mut self, node: u32) -> Calls {
        let calls = Calls::default();
        self.touch.insert(
            node,
            Recorder {
                calls: calls.clone(),
            },
        );
        calls
    }

    pub(crate) fn record_scrolls(&mut self, node: u32) -> Calls {
        let calls = Calls::default();
        self.scroll.insert(
            node,
            Recorder {
                calls: calls.clone(),
            },
        );
        calls
    }

    fn node(&self, node: u32) -> Option<&TestNode> {
        self.nodes.get(node as usize)?.as_ref()
    }

    fn node_mut(&mut self, node: u32) -> &mut TestNode {
        self.nodes[node as usize].as_mut().unwrap()
    }
}

impl SceneQuery<u32> for TestScene {
    fn is_alive(&self, node: &u32) -> bool {
        self.node(*node).is_some()
    }

    fn is_visible(&self, node: &u32) -> bool {
        let mut cur = Some(*node);
        while let Some(id) = cur {
            let Some(n) = self.node(id) else {
                return false;
            };
            if !n.visible {
                return false;
            }
            cur = n.parent;
        }
        true
    }

    fn is_attached(&self, node: &u32) -> bool {
        let mut cur = *node;
        loop {
            match self.node(cur) {
                None => return false,
                Some(n) => match n.parent {
                    None => return cur == Self::ROOT,
                    Some(p) => cur = p,
                },
            }
        }
    }

    fn parent_of(&self, node: &u32) -> Option<u32> {
        self.node(*node)?.parent
    }

    fn child_index(&self, node: &u32) -> Option<usize> {
        let parent = self.node(*node)?.parent?;
        self.node(parent)?.children.iter().position(|c| c == node)
    }

    fn bounding_box(&self, node: &u32) -> Option<Rect> {
        Some(self.node(*node)?.rect)
    }

    fn to_parent_space(&self, node: &u32, world: Point) -> Option<Point> {
        self.node(*node).map(|_| world)
    }
}

impl AttributeStore<u32> for TestScene {
    fn attribute<T: Any>(&self, node: &u32, key: &str) -> Option<&T> {
        self.attributes
            .iter()
            .find(|((n, k), _)| n == node && *k == key)?
            .1
            .downcast_ref()
    }

    fn set_attribute<T: Any>(&mut self, node: &u32, key: &'static str, value: T) {
        if self.node(*node).is_some() {
            self.attributes.insert((*node, key), Box::new(value));
        }
    }
}

impl DelegateLookup<u32> for TestScene {
    fn touch_delegate(&mut self, node: &u32) -> Option<&mut dyn TouchDelegate> {
        self.touch
            .get_mut(node)
            .map(|r| r as &mut dyn TouchDelegate)
    }

    fn scroll_delegate(&mut self, node: &u32) -> Option<&mut dyn ScrollDelegate> {
        self.scroll
            .get_mut(node)
            .map(|r| r as &mut dyn ScrollDelegate)
    }
}
