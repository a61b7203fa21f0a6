// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Routes declared by scene paths and resolved at initialization.

mod common;

use std::rc::Rc;

use hashbrown::HashMap;
use understory_focus_router::{
    ConfigWarning, FocusRouter, FocusState, Focusable, RouteDecl, RouterConfig,
};

use common::hand_of_cards;

fn config(routes: Vec<RouteDecl>) -> RouterConfig<u32> {
    RouterConfig {
        routes,
        ..RouterConfig::new(u32::MAX)
    }
}

#[test]
fn resolves_paths_relative_to_the_origin() {
    let scene = hand_of_cards();
    let hand = scene.find("Hand");
    let card1 = scene.find("Card1");
    let card2 = scene.find("Card2");

    let states = [Rc::new(FocusState::new()), Rc::new(FocusState::new())];
    let mut lookup: HashMap<usize, Rc<dyn Focusable>> = HashMap::new();
    lookup.insert(card1, states[0].clone());
    lookup.insert(card2, states[1].clone());

    let router = FocusRouter::with_config(config(vec![
        RouteDecl::new("Card1/Area", "Card1"),
        RouteDecl::new("Card2/Area", "./Card2"),
        RouteDecl::new("Card2/Button", "../Hand/Card2"),
    ]));
    let warnings = router.register_declared(&scene, hand, &lookup).unwrap();
    assert!(warnings.is_empty());
    assert_eq!(router.route_count(), 3);
    assert!(router.pending_declarations().is_empty());
}

#[test]
fn unresolvable_declarations_are_skipped_with_warnings() {
    let scene = hand_of_cards();
    let hand = scene.find("Hand");
    let mut lookup: HashMap<usize, Rc<dyn Focusable>> = HashMap::new();
    lookup.insert(scene.find("Card1"), Rc::new(FocusState::new()));

    let router = FocusRouter::with_config(config(vec![
        RouteDecl::new("Card1/Area", "Card1"),
        RouteDecl::new("Card3/Area", "Card1"),
        RouteDecl::new("Card2/Area", "Card3"),
        RouteDecl::new("Card2/Area", "Card2"),
    ]));
    let warnings = router.register_declared(&scene, hand, &lookup).unwrap();
    assert_eq!(
        warnings,
        vec![
            ConfigWarning::ActivatorNotFound {
                path: "Card3/Area".into()
            },
            ConfigWarning::EndpointNotFound {
                path: "Card3".into()
            },
            ConfigWarning::EndpointNotFocusable {
                path: "Card2".into()
            },
        ]
    );
    assert_eq!(router.route_count(), 1);
}

#[test]
fn duplicate_declarations_register_nothing() {
    let scene = hand_of_cards();
    let hand = scene.find("Hand");
    let mut lookup: HashMap<usize, Rc<dyn Focusable>> = HashMap::new();
    lookup.insert(scene.find("Card1"), Rc::new(FocusState::new()));
    lookup.insert(scene.find("Card2"), Rc::new(FocusState::new()));

    let declared = vec![
        RouteDecl::new("Card1/Area", "Card1"),
        RouteDecl::new("Card2/Area", "Card2"),
        RouteDecl::new("Card1/Area", "Card2"),
    ];
    let router = FocusRouter::with_config(config(declared.clone()));
    let err = router.register_declared(&scene, hand, &lookup).unwrap_err();
    assert_eq!(err.activator, scene.find("Area"));
    assert_eq!(router.route_count(), 0);
    assert_eq!(router.pending_declarations(), declared);
}

#[test]
fn declared_route_clashing_with_a_runtime_route_fails() {
    let scene = hand_of_cards();
    let hand = scene.find("Hand");
    let card1 = scene.find("Card1");
    let mut lookup: HashMap<usize, Rc<dyn Focusable>> = HashMap::new();
    lookup.insert(card1, Rc::new(FocusState::new()));

    let router = FocusRouter::with_config(config(vec![RouteDecl::new("Card1/Area", "Card1")]));
    let area = scene.find("Area");
    router.register_route(area, Rc::new(FocusState::new())).unwrap();

    assert_eq!(router.register_declared(&scene, hand, &lookup).unwrap_err().activator, area);
    assert_eq!(router.route_count(), 1);
}
