//! Hit testing: point → node, handle, or connector.
//!
//! Nodes and connectors are walked in reverse (last painted = topmost).

use cw_core::consts::LINE_HIT_BUFFER;
use cw_core::{
    Document, Node, NodeGeometry, Point, rect_collision, route_connector,
    segment_point_collision, selection_handles,
};

/// Topmost node whose interior contains `p`.
pub fn hit_test_node(nodes: &[Node], p: Point) -> Option<usize> {
    nodes
        .iter()
        .rposition(|n| rect_collision(p.x, p.y, &n.rect()))
}

/// Resize handle of `node` under `p`, indexed clockwise from top-left.
pub fn hit_test_handle(node: &Node, p: Point) -> Option<usize> {
    selection_handles(&node.rect())
        .iter()
        .position(|h| rect_collision(p.x, p.y, h))
}

/// Port whose "start connector" affordance is under `p`.
pub fn hit_test_connect_handle(node: &Node, p: Point) -> Option<usize> {
    let geom = NodeGeometry::of(node);
    (0..node.ports.len()).find(|&i| rect_collision(p.x, p.y, &geom.connect_handle(i)))
}

/// Topmost connector whose routed path passes through `p`. Connectors that
/// do not resolve are never hit.
pub fn hit_test_connector(doc: &Document, p: Point) -> Option<usize> {
    doc.connectors.iter().rposition(|c| {
        route_connector(c, &doc.nodes)
            .is_some_and(|path| segment_point_collision(p, &path.polyline(), LINE_HIT_BUFFER))
    })
}
