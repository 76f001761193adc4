//! Per-node geometric queries: edge anchors, relative-position predicates,
//! and the port row layout.

use crate::consts::{CONNECT_HANDLE_GAP, CONNECT_HANDLE_SIZE, OPTION_HEIGHT};
use crate::model::{Node, Point, Rect};

/// Geometry view of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeGeometry {
    pub rect: Rect,
    pub port_count: usize,
}

impl NodeGeometry {
    pub fn of(node: &Node) -> Self {
        Self {
            rect: node.rect(),
            port_count: node.ports.len(),
        }
    }

    pub fn left_mid(&self) -> Point {
        Point::new(self.rect.x, self.rect.y + self.rect.h / 2.0)
    }

    pub fn right_mid(&self) -> Point {
        Point::new(self.rect.right(), self.rect.y + self.rect.h / 2.0)
    }

    pub fn top_mid(&self) -> Point {
        Point::new(self.rect.x + self.rect.w / 2.0, self.rect.y)
    }

    pub fn bottom_mid(&self) -> Point {
        Point::new(self.rect.x + self.rect.w / 2.0, self.rect.bottom())
    }

    // The predicates answer "does the node lie on that side of `p`, clear of
    // it by at least `threshold`". A negative threshold lets the node overlap
    // the point by that much.

    pub fn is_on_right(&self, p: Point, threshold: f64) -> bool {
        p.x + threshold < self.rect.x
    }

    pub fn is_on_left(&self, p: Point, threshold: f64) -> bool {
        p.x - threshold >= self.rect.right()
    }

    pub fn is_on_bottom(&self, p: Point, threshold: f64) -> bool {
        p.y + threshold < self.rect.y
    }

    pub fn is_on_top(&self, p: Point, threshold: f64) -> bool {
        p.y - threshold > self.rect.bottom()
    }

    /// Row of port `i`. Rows stack upward from the bottom edge, so the last
    /// port sits flush with it.
    pub fn port_row(&self, i: usize) -> Rect {
        let from_bottom = self.port_count.saturating_sub(i) as f64;
        Rect::new(
            self.rect.x,
            self.rect.bottom() - OPTION_HEIGHT * from_bottom,
            self.rect.w,
            OPTION_HEIGHT,
        )
    }

    /// Where a connector leaving port `i` starts.
    pub fn port_anchor(&self, i: usize) -> Point {
        let row = self.port_row(i);
        Point::new(self.rect.right(), row.y + row.h / 2.0)
    }

    /// The "start connector" affordance beside port `i`.
    pub fn connect_handle(&self, i: usize) -> Rect {
        let row = self.port_row(i);
        Rect::new(
            self.rect.right() + CONNECT_HANDLE_GAP,
            row.y,
            CONNECT_HANDLE_SIZE,
            CONNECT_HANDLE_SIZE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Port;
    use pretty_assertions::assert_eq;

    fn node_with_ports(n: usize) -> Node {
        let mut node = Node::new(100.0, 100.0, 200.0, 100.0);
        for i in 0..n {
            node.ports.push(Port::new(format!("Option {}", i + 1)));
        }
        node
    }

    #[test]
    fn edge_midpoints() {
        let g = NodeGeometry::of(&node_with_ports(0));
        assert_eq!(g.left_mid(), Point::new(100.0, 150.0));
        assert_eq!(g.right_mid(), Point::new(300.0, 150.0));
        assert_eq!(g.top_mid(), Point::new(200.0, 100.0));
        assert_eq!(g.bottom_mid(), Point::new(200.0, 200.0));
    }

    #[test]
    fn side_predicates_respect_threshold() {
        let g = NodeGeometry::of(&node_with_ports(0));
        assert!(g.is_on_right(Point::new(60.0, 150.0), 30.0));
        assert!(!g.is_on_right(Point::new(80.0, 150.0), 30.0));
        assert!(g.is_on_left(Point::new(330.0, 150.0), 30.0));
        assert!(!g.is_on_left(Point::new(320.0, 150.0), 30.0));
        assert!(g.is_on_bottom(Point::new(150.0, 50.0), 30.0));
        assert!(g.is_on_top(Point::new(150.0, 240.0), 30.0));
        assert!(!g.is_on_top(Point::new(150.0, 220.0), 30.0));
    }

    #[test]
    fn ports_stack_from_bottom() {
        let g = NodeGeometry::of(&node_with_ports(3));
        assert_eq!(g.port_row(2), Rect::new(100.0, 180.0, 200.0, 20.0));
        assert_eq!(g.port_row(0), Rect::new(100.0, 140.0, 200.0, 20.0));
        assert_eq!(g.port_anchor(2), Point::new(300.0, 190.0));
        assert_eq!(g.connect_handle(1), Rect::new(305.0, 160.0, 20.0, 20.0));
    }
}
