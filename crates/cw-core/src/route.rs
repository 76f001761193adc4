//! Connector routing.
//!
//! A connector leaves its port on the source node's right edge and enters the
//! target on whichever edge faces the start point. Up to two joints keep the
//! line from cutting through the target in the common layouts.

use crate::consts::MIN_LINE_BEND_MARGIN;
use crate::helper::NodeGeometry;
use crate::model::{Connector, Node, Point};
use smallvec::{SmallVec, smallvec};

/// Target edge a connector enters through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Bend points of a routed connector.
pub type Joints = SmallVec<[Point; 2]>;

/// A resolved connector path.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorPath {
    pub start: Point,
    pub end: Point,
    pub end_side: Side,
    pub joints: Joints,
}

impl ConnectorPath {
    /// Start, joints, end.
    pub fn polyline(&self) -> SmallVec<[Point; 4]> {
        let mut points = SmallVec::with_capacity(self.joints.len() + 2);
        points.push(self.start);
        points.extend(self.joints.iter().copied());
        points.push(self.end);
        points
    }

    /// The point the final segment comes from; orients the arrowhead.
    pub fn approach(&self) -> Point {
        self.joints.last().copied().unwrap_or(self.start)
    }
}

/// Find the source node, port index, and target node a connector refers to.
pub fn resolve<'a>(connector: &Connector, nodes: &'a [Node]) -> Option<(&'a Node, usize, &'a Node)> {
    let source = nodes.iter().find(|n| n.key == connector.source_key)?;
    let port = source.port_index(connector.port_key)?;
    let target = nodes.iter().find(|n| n.key == connector.target_key)?;
    Some((source, port, target))
}

/// Compute the path of `connector`, or `None` if any reference is missing.
pub fn route_connector(connector: &Connector, nodes: &[Node]) -> Option<ConnectorPath> {
    let (source, port, target) = resolve(connector, nodes)?;
    let start = NodeGeometry::of(source).port_anchor(port);
    Some(route_from(start, &NodeGeometry::of(target)))
}

/// Route from an arbitrary start point into `target`.
pub fn route_from(start: Point, target: &NodeGeometry) -> ConnectorPath {
    let margin = MIN_LINE_BEND_MARGIN;
    let above = target.is_on_top(start, margin);
    let below = target.is_on_bottom(start, margin);
    // Target's center is left of the start point.
    let left = target.is_on_left(start, -target.rect.w / 2.0);
    let right = target.is_on_right(start, margin);

    // Vertical jog just outside the source, and one clear of both nodes.
    let near_x = start.x + margin;
    let far_x = start.x.max(target.rect.right()) + margin;

    let jog = |x: f64, end: Point| -> Joints {
        smallvec![Point::new(x, start.y), Point::new(x, end.y)]
    };

    let (end, end_side, joints) = if right && !above && !below {
        let end = target.left_mid();
        let joints = if (end.y - start.y).abs() < 0.5 {
            SmallVec::new()
        } else {
            jog(near_x, end)
        };
        (end, Side::Left, joints)
    } else if (above || below) && !left {
        let (end, side) = if above {
            (target.bottom_mid(), Side::Bottom)
        } else {
            (target.top_mid(), Side::Top)
        };
        (end, side, smallvec![Point::new(end.x, start.y)])
    } else if left {
        let end = target.right_mid();
        (end, Side::Right, jog(far_x, end))
    } else {
        let end = target.left_mid();
        (end, Side::Left, jog(near_x, end))
    };

    log::trace!("route {start:?} -> {end:?} via {} joint(s)", joints.len());
    ConnectorPath {
        start,
        end,
        end_side,
        joints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::Key;
    use crate::model::Port;
    use pretty_assertions::assert_eq;

    fn pair(tx: f64, ty: f64) -> (Vec<Node>, Connector) {
        let mut a = Node::new(0.0, 0.0, 100.0, 100.0);
        a.key = Key::intern("route_a");
        a.ports.push(Port {
            key: Key::intern("route_p"),
            label: "go".into(),
        });
        let mut b = Node::new(tx, ty, 100.0, 100.0);
        b.key = Key::intern("route_b");
        let c = Connector::new(a.key, Key::intern("route_p"), b.key);
        (vec![a, b], c)
    }

    #[test]
    fn aligned_target_to_the_right_is_straight() {
        // Port row is y 80..100, anchor y 90; target left-mid y = 40 + 50.
        let (nodes, c) = pair(300.0, 40.0);
        let path = route_connector(&c, &nodes).unwrap();
        assert!(path.joints.is_empty());
        assert_eq!(path.start, Point::new(100.0, 90.0));
        assert_eq!(path.end, Point::new(300.0, 90.0));
        assert_eq!(path.end_side, Side::Left);
    }

    #[test]
    fn offset_target_to_the_right_jogs_near_source() {
        let (nodes, c) = pair(300.0, 100.0);
        let path = route_connector(&c, &nodes).unwrap();
        assert_eq!(
            path.joints.as_slice(),
            &[Point::new(130.0, 90.0), Point::new(130.0, 150.0)]
        );
        assert_eq!(path.polyline().len(), 4);
    }

    #[test]
    fn target_below_enters_from_top() {
        let (nodes, c) = pair(80.0, 300.0);
        let path = route_connector(&c, &nodes).unwrap();
        assert_eq!(path.end_side, Side::Top);
        assert_eq!(path.end, Point::new(130.0, 300.0));
        assert_eq!(path.joints.as_slice(), &[Point::new(130.0, 90.0)]);
    }

    #[test]
    fn target_above_enters_from_bottom() {
        let (nodes, c) = pair(150.0, -300.0);
        let path = route_connector(&c, &nodes).unwrap();
        assert_eq!(path.end_side, Side::Bottom);
        assert_eq!(path.end, Point::new(200.0, -200.0));
    }

    #[test]
    fn target_to_the_left_enters_from_right() {
        let (nodes, c) = pair(-300.0, 0.0);
        let path = route_connector(&c, &nodes).unwrap();
        assert_eq!(path.end_side, Side::Right);
        assert_eq!(path.end, Point::new(-200.0, 50.0));
        assert_eq!(path.joints[0], Point::new(130.0, 90.0));
    }

    #[test]
    fn unresolved_connector_has_no_path() {
        let (nodes, mut c) = pair(300.0, 0.0);
        c.port_key = Key::intern("route_missing");
        assert!(route_connector(&c, &nodes).is_none());
        let (nodes, mut c) = pair(300.0, 0.0);
        c.target_key = Key::intern("route_gone");
        assert!(route_connector(&c, &nodes).is_none());
    }
}
