// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dragging a focusable group by its handle.
//!
//! The group keeps focus while the press lasts, even when the pointer outruns the
//! handle, and gives it up on release without needing another motion event.
//!
//! Run:
//! - `RUST_LOG=trace cargo run -p understory_demos --example drag_group`

use std::rc::Rc;

use kurbo::{Affine, Point, Rect, Vec2};
use tracing_subscriber::EnvFilter;
use understory_focus_router::{
    DragNodeKind, FocusDispatcher, FocusRouter, Focusable, FocusableDragGroup, PointerButtons,
};
use understory_region_tree::{Layers, LocalRegion, NodeId, Tree};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init();
}

fn main() {
    init_tracing();

    // Window > { TitleBar (handle), Body > Grip (handle) }, plus an empty Panel.
    let mut tree = Tree::new();
    let window = tree.insert(None, LocalRegion::named("Window", Rect::new(0.0, 0.0, 200.0, 150.0)));
    let title = tree.insert(Some(window), LocalRegion::named("TitleBar", Rect::new(0.0, 0.0, 200.0, 20.0)));
    let body = tree.insert(Some(window), LocalRegion::named("Body", Rect::new(0.0, 20.0, 200.0, 150.0)));
    let grip = tree.insert(Some(body), LocalRegion::named("Grip", Rect::new(185.0, 135.0, 200.0, 150.0)));
    let panel = tree.insert(None, LocalRegion::named("Panel", Rect::new(300.0, 0.0, 400.0, 100.0)));
    tree.commit();

    let handles = [title, grip];
    let kind = |node: &NodeId| {
        if handles.contains(node) {
            DragNodeKind::Handle
        } else {
            DragNodeKind::Other
        }
    };
    let group = Rc::new(FocusableDragGroup::from_scene(&tree, window, kind));
    // Logs a warning: nothing under the panel is a handle.
    let empty = FocusableDragGroup::from_scene(&tree, panel, kind);
    println!("panel warnings: {:?}", empty.configuration_warnings());

    let router = FocusRouter::new(Layers::all());
    if let Err(err) = group.register_to(&router) {
        eprintln!("{err}");
        return;
    }

    let mut dispatcher = FocusDispatcher::new(Layers::all());
    dispatcher.add_router(Rc::clone(&router));
    dispatcher.add_drag_group(Rc::clone(&group));

    let mut offset = Vec2::ZERO;
    let mut frame = |dispatcher: &FocusDispatcher<NodeId, Layers>, tree: &mut Tree, label: &str| {
        dispatcher.tick(|_, delta| offset += delta);
        tree.set_local_transform(window, Affine::translate(offset));
        tree.commit();
        println!(
            "{label:<20} focused={} dragging={} offset=({}, {})",
            group.is_focused(),
            group.is_being_dragged(),
            offset.x,
            offset.y
        );
    };

    dispatcher.pointer_moved(&tree, Point::new(50.0, 10.0));
    frame(&dispatcher, &mut tree, "hover title");

    dispatcher.pointer_pressed(&tree, PointerButtons::PRIMARY);
    frame(&dispatcher, &mut tree, "press");

    // Fast motion: the pointer leaves the title bar before the window catches up.
    dispatcher.pointer_moved(&tree, Point::new(250.0, 90.0));
    frame(&dispatcher, &mut tree, "fast drag");

    dispatcher.pointer_released(PointerButtons::PRIMARY);
    frame(&dispatcher, &mut tree, "release");
}
