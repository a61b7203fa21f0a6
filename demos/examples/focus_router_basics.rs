// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer focus over a region tree: a hand of cards with nested routers.
//!
//! This example shows how to combine:
//! - `understory_region_tree` for named, layered, stacked regions,
//! - `understory_focus_router` routers declared by region paths,
//! - a nested router per card that focuses the card's own buttons.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example focus_router_basics`

use std::rc::Rc;

use hashbrown::HashMap;
use kurbo::{Affine, Point, Rect};
use tracing_subscriber::EnvFilter;
use understory_focus_router::{
    FocusDispatcher, FocusRouter, FocusState, Focusable, RouteDecl, RouterConfig,
};
use understory_region_tree::{Layers, LocalRegion, NodeId, Tree};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed by the host; keep going without ours.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .try_init();
}

struct Card {
    node: NodeId,
    router: Rc<FocusRouter<NodeId, Layers>>,
    button: Rc<FocusState>,
}

fn main() {
    init_tracing();

    // Table > Hand > CardN > { Area, Button }. Cards fan out to the right and each
    // stacks one above the previous.
    let mut tree = Tree::new();
    let table = tree.insert(None, LocalRegion::named("Table", Rect::new(0.0, 0.0, 400.0, 300.0)));
    let hand = tree.insert(Some(table), LocalRegion::named("Hand", Rect::new(0.0, 0.0, 400.0, 120.0)));

    let mut cards = Vec::new();
    let mut endpoints: HashMap<NodeId, Rc<dyn Focusable>> = HashMap::new();
    for i in 0..3 {
        let bounds = Rect::new(0.0, 0.0, 80.0, 110.0);
        let card = tree.insert(
            Some(hand),
            LocalRegion {
                local_transform: Affine::translate((60.0 * f64::from(i), 5.0)),
                z_index: i + 1,
                ..LocalRegion::named(format!("Card{}", i + 1), bounds)
            },
        );
        tree.insert(Some(card), LocalRegion::named("Area", bounds));
        let button = tree.insert(
            Some(card),
            LocalRegion {
                z_index: 1,
                ..LocalRegion::named("Button", Rect::new(60.0, 10.0, 75.0, 25.0))
            },
        );

        let router = FocusRouter::with_config(RouterConfig {
            focused: false,
            ..RouterConfig::new(Layers::all())
        });
        let state = Rc::new(FocusState::new());
        router
            .register_route(button, state.clone())
            .expect("fresh router has no routes");
        endpoints.insert(card, router.clone());
        cards.push(Card {
            node: card,
            router,
            button: state,
        });
    }
    tree.commit();

    // The root router is declared by paths relative to the hand.
    let root = FocusRouter::with_config(RouterConfig {
        routes: (1..=3)
            .map(|i| RouteDecl::new(format!("Card{i}/Area"), format!("Card{i}")))
            .collect(),
        ..RouterConfig::new(Layers::all())
    });
    match root.register_declared(&tree, hand, &endpoints) {
        Ok(warnings) => println!("declared routes registered ({} warnings)", warnings.len()),
        Err(err) => {
            eprintln!("declared routes rejected: {err}");
            return;
        }
    }

    let mut dispatcher = FocusDispatcher::new(Layers::all());
    dispatcher.add_router(Rc::clone(&root));
    for card in &cards {
        dispatcher.add_router(Rc::clone(&card.router));
    }

    let report = |label: &str, cards: &[Card]| {
        let focused: Vec<String> = cards
            .iter()
            .filter(|c| c.router.is_focused())
            .map(|c| {
                let button = if c.button.is_focused() { " (button)" } else { "" };
                format!("{}{button}", tree.name_of(c.node).unwrap_or("?"))
            })
            .collect();
        println!("{label:<28} focused: {focused:?}");
    };

    for (label, point) in [
        ("over Card1", Point::new(20.0, 60.0)),
        ("Card1/Card2 overlap", Point::new(70.0, 60.0)),
        ("Card3 button", Point::new(190.0, 20.0)),
        ("off the hand", Point::new(300.0, 250.0)),
    ] {
        dispatcher.pointer_moved(&tree, point);
        report(label, &cards);
    }

    // A modal button: holding and claiming sole focus freezes the hand.
    dispatcher.pointer_moved(&tree, Point::new(190.0, 20.0));
    cards[2].button.set_hold_focus(true);
    cards[2].button.set_sole_focus(true);
    println!("root hold={} sole={}", root.hold_focus(), root.sole_focus());
    dispatcher.pointer_moved(&tree, Point::new(20.0, 60.0));
    report("over Card1 while sole", &cards);

    cards[2].button.set_sole_focus(false);
    cards[2].button.set_hold_focus(false);
    dispatcher.pointer_moved(&tree, Point::new(20.0, 60.0));
    report("over Card1 after release", &cards);
}
