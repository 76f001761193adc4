//! Integration tests: load → route → mutate → verify connectors.
//!
//! Exercises the `cw-core` pipeline on a small approval flow:
//! JSON → Document → routed connector paths → pruning on removal.

use cw_core::consts::{GRID_SIZE, MIN_HEIGHT, MIN_WIDTH};
use cw_core::route::{Side, route_connector};
use cw_core::{Document, Key, Node, segment_point_collision, snap_to_grid};
use pretty_assertions::assert_eq;

fn load() -> Document {
    Document::from_json(include_str!("fixtures/approval_flow.json")).unwrap()
}

// ─── Loading ────────────────────────────────────────────────────────────

#[test]
fn fixture_loads_with_defaults() {
    let doc = load();
    assert_eq!(doc.nodes.len(), 4);
    assert_eq!(doc.height(), 600.0);
    assert!(doc.show_grid());
    assert_eq!(doc.nodes[2].stroke_color(), "#cccccc");
    assert_eq!(doc.nodes[2].font_size(), 16.0);
}

// ─── Routing ────────────────────────────────────────────────────────────

#[test]
fn dangling_connector_is_skipped_not_fatal() {
    let doc = load();
    let paths: Vec<_> = doc
        .connectors
        .iter()
        .map(|c| route_connector(c, &doc.nodes))
        .collect();
    assert!(paths[0].is_some());
    assert!(paths[1].is_some());
    assert!(paths[2].is_some());
    assert!(paths[3].is_none(), "unknown port must not route");
}

#[test]
fn reject_branch_drops_into_top_edge() {
    let doc = load();
    let path = route_connector(&doc.connectors[2], &doc.nodes).unwrap();
    assert_eq!(path.end_side, Side::Top);
    let rejected = doc.node(Key::intern("rejected")).unwrap();
    assert_eq!(path.end.y, rejected.y);
}

#[test]
fn every_routed_path_hits_its_own_midpoints() {
    let doc = load();
    for c in &doc.connectors {
        let Some(path) = route_connector(c, &doc.nodes) else {
            continue;
        };
        let line = path.polyline();
        for seg in line.windows(2) {
            let mid = cw_core::Point::new((seg[0].x + seg[1].x) / 2.0, (seg[0].y + seg[1].y) / 2.0);
            assert!(segment_point_collision(mid, &line, 0.2), "{mid:?} not on {line:?}");
        }
    }
}

// ─── Mutation ───────────────────────────────────────────────────────────

#[test]
fn removing_review_prunes_everything_touching_it() {
    let mut doc = load();
    let idx = doc.node_index(Key::intern("review")).unwrap();
    doc.remove_node(idx);
    assert!(doc.connectors.is_empty());
    assert_eq!(doc.nodes.len(), 3);
}

#[test]
fn prune_drops_only_dangling() {
    let mut doc = load();
    assert_eq!(doc.prune_connectors(), 1);
    assert_eq!(doc.connectors.len(), 3);
    assert_eq!(doc.prune_connectors(), 0);
}

#[test]
fn dropped_node_is_grid_aligned_and_valid() {
    let mut doc = load();
    let node = Node::default_at(433.0, 257.0);
    assert!(node.w >= MIN_WIDTH && node.h >= MIN_HEIGHT);
    assert_eq!(snap_to_grid(node.x, node.y), cw_core::Point::new(node.x, node.y));
    assert!((node.rect().center().x - 433.0).abs() <= GRID_SIZE);
    let idx = doc.add_node(node);
    assert_eq!(idx, 4);
    assert_ne!(doc.nodes[4].key, doc.nodes[0].key);
}
