// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small named scene of world-space rectangles for integration tests.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use kurbo::{Point, Rect};
use understory_focus_router::{SceneGraph, SpatialQuery, StackingLookup};

#[derive(Clone, Debug)]
pub struct TestNode {
    pub name: &'static str,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub rect: Rect,
    pub z: i32,
    pub relative: bool,
    pub layers: u32,
}

/// Regions are queried in insertion order.
#[derive(Clone, Debug, Default)]
pub struct TestScene {
    pub nodes: Vec<TestNode>,
}

impl TestScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a region with relative stacking on layer 1.
    pub fn add(&mut self, parent: Option<usize>, name: &'static str, rect: Rect, z: i32) -> usize {
        let id = self.nodes.len();
        self.nodes.push(TestNode {
            name,
            parent,
            children: Vec::new(),
            rect,
            z,
            relative: true,
            layers: 1,
        });
        if let Some(p) = parent {
            self.nodes[p].children.push(id);
        }
        id
    }

    pub fn find(&self, name: &str) -> usize {
        self.nodes
            .iter()
            .position(|n| n.name == name)
            .unwrap_or_else(|| panic!("no node named {name}"))
    }
}

impl StackingLookup<usize> for TestScene {
    fn z_index(&self, node: &usize) -> i32 {
        self.nodes[*node].z
    }

    fn z_as_relative(&self, node: &usize) -> bool {
        self.nodes[*node].relative
    }

    fn parent_of(&self, node: &usize) -> Option<usize> {
        self.nodes[*node].parent
    }
}

impl SpatialQuery<usize> for TestScene {
    type Mask = u32;

    fn intersect_point(&self, point: Point, mask: u32, max_results: usize, out: &mut Vec<usize>) {
        out.extend(
            self.nodes
                .iter()
                .enumerate()
                .filter(|(_, n)| n.layers & mask != 0 && n.rect.contains(point))
                .map(|(i, _)| i)
                .take(max_results),
        );
    }
}

impl SceneGraph<usize> for TestScene {
    fn resolve_path(&self, origin: usize, path: &str) -> Option<usize> {
        let mut current = origin;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = match segment {
                "." => current,
                ".." => self.nodes[current].parent?,
                name => self.nodes[current]
                    .children
                    .iter()
                    .copied()
                    .find(|&c| self.nodes[c].name == name)?,
            };
        }
        Some(current)
    }

    fn children_of(&self, node: usize) -> Vec<usize> {
        self.nodes[node].children.clone()
    }
}

/// A table with a hand of two overlapping cards, each with an area and a button.
///
/// Card 2 stacks above card 1 where they overlap (x in 40..50).
pub fn hand_of_cards() -> TestScene {
    let mut scene = TestScene::new();
    let table = scene.add(None, "Table", Rect::new(0.0, 0.0, 200.0, 200.0), 0);
    let hand = scene.add(Some(table), "Hand", Rect::new(0.0, 0.0, 200.0, 100.0), 0);
    for (i, name) in ["Card1", "Card2"].into_iter().enumerate() {
        let x = 40.0 * i as f64;
        let rect = Rect::new(x, 0.0, x + 50.0, 80.0);
        let z = i as i32 + 1;
        let card = scene.add(Some(hand), name, rect, z);
        scene.add(Some(card), "Area", rect, 0);
        scene.add(Some(card), "Button", Rect::new(x + 10.0, 10.0, x + 20.0, 20.0), 1);
    }
    scene
}
