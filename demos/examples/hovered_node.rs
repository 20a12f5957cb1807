// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover, right-click and capture on a scene graph, fed through the touch entry point.
//!
//! This example shows how to combine:
//! - `understory_scene` for the node tree, transforms and per-node attributes,
//! - `understory_mouse` for hover tracking, held buttons and pointer capture,
//! - a [`TouchDispatcher`] hook that maps device pixels to scene points.
//!
//! A labelled node reports whether it is hovered or right-clicked, a button
//! with a native touch delegate gets mouse presses as touches, and a menu
//! swallows clicks only over its items.
//!
//! Set `RUST_LOG=understory_mouse=trace` to watch the routing decisions.
//!
//! Run:
//! - `cargo run -p understory_demos --example hovered_node`

use kurbo::{Affine, Point, Rect};
use understory_mouse::adapters::scene::{DelegateKind, SceneHost};
use understory_mouse::bridge::{self, TouchDispatcher};
use understory_mouse::button::MouseButton;
use understory_mouse::event::MouseEvent;
use understory_mouse::filter::{MouseEventFilter, MouseResult};
use understory_mouse::mouse::Mouse;
use understory_mouse::state::MouseAttributes;
use understory_mouse::touch::{Touch, TouchContext, TouchDelegate, TouchPhase};
use understory_scene::{LocalNode, NodeId, Scene};

const LABEL_KEY: &str = "demo/label";
const DEVICE_SCALE: f64 = 2.0;

/// Native delegate of the button node.
struct Button {
    name: &'static str,
}

impl TouchDelegate for Button {
    fn touch_began(&mut self, touch: &Touch, context: &TouchContext) -> bool {
        log::info!(
            "{} pressed at {:?} (emulated: {})",
            self.name,
            touch.location(),
            context.emulated
        );
        true
    }

    fn touch_moved(&mut self, touch: &Touch, _: &TouchContext) {
        log::info!("{} dragged by {:?}", self.name, touch.delta());
    }

    fn touch_ended(&mut self, touch: &Touch, _: &TouchContext) {
        let dragged = touch.location() - touch.start_location();
        println!("{} released after dragging {dragged:?}", self.name);
    }
}

fn node_at(origin: (f64, f64), size: (f64, f64)) -> LocalNode {
    LocalNode {
        local_bounds: Rect::new(0.0, 0.0, size.0, size.1),
        local_transform: Affine::translate(origin),
        ..LocalNode::default()
    }
}

fn label(host: &SceneHost, node: NodeId) -> &str {
    host.scene
        .attribute::<&'static str>(node, LABEL_KEY)
        .copied()
        .unwrap_or("Hi")
}

/// Send an event in device pixels through the touch entry point, addressed to
/// the capturing node if there is one.
fn send(
    dispatcher: &mut TouchDispatcher,
    mouse: &mut Mouse<NodeId, SceneHost>,
    host: &mut SceneHost,
    event: MouseEvent<NodeId>,
) -> bool {
    let mut event = event.with_target(mouse.capturing_node());
    dispatcher.post_through_touches(mouse, host, &mut event)
}

fn main() {
    env_logger::init();

    let mut scene = Scene::new();
    let root = scene.insert(None, node_at((0.0, 0.0), (800.0, 600.0)));
    scene.set_running(Some(root));
    let hovered = scene.insert(Some(root), node_at((60.0, 80.0), (100.0, 50.0)));
    let panel = scene.insert(Some(root), node_at((200.0, 200.0), (200.0, 120.0)));
    let button = scene.insert(Some(panel), node_at((20.0, 20.0), (80.0, 30.0)));
    let menu = scene.insert(Some(root), node_at((500.0, 100.0), (120.0, 90.0)));
    let mut host = SceneHost::new(scene);
    let mut mouse = Mouse::new();

    mouse.register(
        MouseEventFilter::node(hovered),
        move |host: &mut SceneHost, _: &MouseEvent<NodeId>| {
            let attrs = MouseAttributes::of(hovered);
            let text = if attrs.is_held(&*host, MouseButton::Right) {
                "Right-clicked!"
            } else if attrs.is_hovered(&*host) {
                "Hovered!"
            } else {
                "Hi"
            };
            host.scene.set_attribute(hovered, LABEL_KEY, text);
            MouseResult::Swallow
        },
    );

    host.add_touch_delegate(
        &mut mouse,
        button,
        DelegateKind::Targeted { swallows: true },
        Button { name: "ok-button" },
    );

    // Items fill the top two thirds of the menu.
    bridge::register_menu(
        &mut mouse,
        menu,
        |host: &SceneHost, node: &NodeId, world: Point| {
            host.scene
                .to_node_space(*node, world)
                .is_some_and(|local| Rect::new(0.0, 0.0, 120.0, 60.0).contains(local))
        },
    );

    // A whole frame's worth of registrations costs one sort.
    assert!(mouse.begin_frame(&host));
    assert!(!mouse.begin_frame(&host));

    let mut dispatcher = TouchDispatcher::new();
    dispatcher.add_hook(|touch: &mut Touch, phase: TouchPhase| {
        let device = touch.location();
        touch.set_location(Point::new(device.x / DEVICE_SCALE, device.y / DEVICE_SCALE));
        log::trace!("{phase:?} touch at device {device:?}");
    });

    let px = |x: f64, y: f64| Point::new(x * DEVICE_SCALE, y * DEVICE_SCALE);

    send(&mut dispatcher, &mut mouse, &mut host, MouseEvent::moved(px(100.0, 100.0)));
    println!("over the label: {}", label(&host, hovered));

    let click = |down, at| MouseEvent::click(MouseButton::Right, down, at);
    send(&mut dispatcher, &mut mouse, &mut host, click(true, px(100.0, 100.0)));
    println!("right press: {}", label(&host, hovered));

    // Captured: leaving the node keeps the button held and hides hover from
    // everyone else.
    send(&mut dispatcher, &mut mouse, &mut host, MouseEvent::moved(px(250.0, 230.0)));
    println!(
        "dragged onto the panel: {} (capturing {:?})",
        label(&host, hovered),
        mouse.capturing_node()
    );
    assert!(!MouseAttributes::of(button).is_hovered(&host));

    send(&mut dispatcher, &mut mouse, &mut host, click(false, px(250.0, 230.0)));
    println!("released: {}", label(&host, hovered));
    assert_eq!(mouse.capturing(), None);

    // Left drag on the button goes to its native delegate as touches.
    let left = |down, at| MouseEvent::click(MouseButton::Left, down, at);
    send(&mut dispatcher, &mut mouse, &mut host, left(true, px(230.0, 230.0)));
    send(&mut dispatcher, &mut mouse, &mut host, MouseEvent::moved(px(260.0, 240.0)));
    send(&mut dispatcher, &mut mouse, &mut host, MouseEvent::moved(px(600.0, 400.0)));
    send(&mut dispatcher, &mut mouse, &mut host, left(false, px(600.0, 400.0)));

    let on_item = send(&mut dispatcher, &mut mouse, &mut host, left(true, px(510.0, 110.0)));
    send(&mut dispatcher, &mut mouse, &mut host, left(false, px(510.0, 110.0)));
    let below_items = send(&mut dispatcher, &mut mouse, &mut host, left(true, px(510.0, 180.0)));
    println!("menu swallowed item click: {on_item}, click below items: {below_items}");

    host.remove(&mut mouse, panel);
    mouse.begin_frame(&host);
    println!("listeners after removing the panel: {}", mouse.pool().len());
}
