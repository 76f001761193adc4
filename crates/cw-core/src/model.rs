//! Document model for canvas workflows.
//!
//! A `Document` is a flat, ordered list of box nodes plus the connectors that
//! link a node's port to another node. Vector order is z-order: later nodes
//! paint over and hit-test before earlier ones. The host owns the persisted
//! shape; the editor mutates it in place during gestures.

use crate::consts::*;
use crate::geometry::{snap_size, snap_to_grid};
use crate::id::Key;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

// ─── Primitives ──────────────────────────────────────────────────────────

/// A 2D point in canvas coordinates (device-independent pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Axis-aligned rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Grow the rectangle by `d` on every side.
    pub fn inflate(&self, d: f64) -> Rect {
        Rect::new(self.x - d, self.y - d, self.w + d * 2.0, self.h + d * 2.0)
    }
}

// ─── Border radius ───────────────────────────────────────────────────────

/// Resolved per-corner radii.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerRadii {
    pub tl: f64,
    pub tr: f64,
    pub br: f64,
    pub bl: f64,
}

/// Per-corner radii where unset corners fall back to zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PartialCornerRadii {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tl: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub br: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bl: Option<f64>,
}

/// Border radius as stored: one number for all corners, or a partial
/// per-corner object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BorderRadius {
    Uniform(f64),
    Corners(PartialCornerRadii),
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// Shape of a node. Only boxes exist today; the router and renderer match
/// on this so new shapes slot in as variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    #[default]
    Box,
}

/// A named anchor row on a node, from which one connector may originate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    #[serde(default = "fresh_port_key")]
    pub key: Key,
    #[serde(default, alias = "name")]
    pub label: String,
}

impl Port {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            key: fresh_port_key(),
            label: label.into(),
        }
    }
}

/// One visual box on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default = "fresh_node_key")]
    pub key: Key,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<BorderRadius>,
    #[serde(default, alias = "options")]
    pub ports: Vec<Port>,
}

fn fresh_node_key() -> Key {
    Key::fresh("node")
}

fn fresh_port_key() -> Key {
    Key::fresh("port")
}

impl Node {
    /// A bare box with the given geometry and a fresh key.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            key: fresh_node_key(),
            kind: NodeKind::Box,
            x,
            y,
            w,
            h,
            title: String::new(),
            description: None,
            fill_color: None,
            stroke_color: None,
            text_color: None,
            line_width: None,
            font_size: None,
            font_family: None,
            border_radius: None,
            ports: Vec::new(),
        }
    }

    /// The node a palette drop creates: default size, centered on `(x, y)`,
    /// snapped to the grid, with one default port.
    pub fn default_at(x: f64, y: f64) -> Self {
        let origin = snap_to_grid(x - DEFAULT_NODE_WIDTH / 2.0, y - DEFAULT_NODE_HEIGHT / 2.0);
        let mut node = Self::new(origin.x, origin.y, DEFAULT_NODE_WIDTH, DEFAULT_NODE_HEIGHT);
        node.title = "Title".to_string();
        node.description = Some("Description".to_string());
        node.fill_color = Some("#ffffff".to_string());
        node.ports.push(Port::new("Option 1"));
        node
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn port_index(&self, key: Key) -> Option<usize> {
        self.ports.iter().position(|p| p.key == key)
    }

    /// Enforce the minimum size.
    pub fn clamp_size(&mut self) {
        self.w = self.w.max(MIN_WIDTH);
        self.h = self.h.max(MIN_HEIGHT);
    }

    // Presentation with defaults applied.

    pub fn stroke_color(&self) -> &str {
        self.stroke_color.as_deref().unwrap_or(STROKE_COLOR)
    }

    pub fn text_color(&self) -> &str {
        self.text_color.as_deref().unwrap_or(TEXT_COLOR)
    }

    pub fn line_width(&self) -> f64 {
        self.line_width.unwrap_or(LINE_WIDTH)
    }

    pub fn font_size(&self) -> f64 {
        self.font_size.unwrap_or(FONT_SIZE)
    }

    pub fn font_family(&self) -> &str {
        self.font_family.as_deref().unwrap_or(FONT_FAMILY)
    }

    pub fn border_radius(&self) -> BorderRadius {
        self.border_radius
            .unwrap_or(BorderRadius::Uniform(BORDER_RADIUS))
    }

    /// Apply a property edit coming from a host panel.
    ///
    /// Numeric fields are clamped to their allowed range; geometry is
    /// snapped. Empty strings clear optional fields.
    pub fn apply_prop(&mut self, name: &str, value: &str) -> Result<(), String> {
        let number = || {
            value
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("{name}: expected a number, got {value:?} ({e})"))
        };
        let optional = || (!value.is_empty()).then(|| value.to_string());

        match name {
            "title" => self.title = value.to_string(),
            "description" => self.description = optional(),
            "fillColor" => self.fill_color = optional(),
            "strokeColor" => self.stroke_color = optional(),
            "textColor" => self.text_color = optional(),
            "fontFamily" => self.font_family = optional(),
            "lineWidth" => self.line_width = Some(number()?.clamp(1.0, MAX_LINE_WIDTH)),
            "fontSize" => self.font_size = Some(number()?.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)),
            "borderRadius" => {
                self.border_radius = Some(BorderRadius::Uniform(number()?.clamp(0.0, MAX_BORDER_RADIUS)))
            }
            "x" | "y" => {
                let v = number()?;
                let (x, y) = if name == "x" { (v, self.y) } else { (self.x, v) };
                let p = snap_to_grid(x, y);
                self.x = p.x;
                self.y = p.y;
            }
            "w" | "h" => {
                let v = number()?;
                let (w, h) = if name == "w" { (v, self.h) } else { (self.w, v) };
                let (w, h) = snap_size(w.max(MIN_WIDTH), h.max(MIN_HEIGHT));
                self.w = w;
                self.h = h;
            }
            _ => return Err(format!("unknown node property {name:?}")),
        }
        Ok(())
    }
}

// ─── Connectors ──────────────────────────────────────────────────────────

/// A routed edge from a port on `source_key` to the node `target_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    #[serde(alias = "componentKey")]
    pub source_key: Key,
    #[serde(alias = "optionKey")]
    pub port_key: Key,
    pub target_key: Key,
    /// Bend points. Recomputed by the router on every frame; carried only so
    /// hosts round-trip whatever they stored.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub joints: SmallVec<[Point; 2]>,
}

impl Connector {
    pub fn new(source_key: Key, port_key: Key, target_key: Key) -> Self {
        Self {
            source_key,
            port_key,
            target_key,
            joints: SmallVec::new(),
        }
    }

    /// Same endpoints, ignoring stored joints.
    pub fn same_route(&self, other: &Connector) -> bool {
        self.source_key == other.source_key
            && self.port_key == other.port_key
            && self.target_key == other.target_key
    }
}

// ─── Document ────────────────────────────────────────────────────────────

/// The root object shared with the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_grid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_stroke_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_line_width: Option<f64>,
    #[serde(default, alias = "components")]
    pub nodes: Vec<Node>,
    #[serde(default, alias = "lines")]
    pub connectors: Vec<Connector>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from host JSON.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid document: {e}"))
    }

    pub fn to_json(&self) -> Result<String, String> {
        serde_json::to_string(self).map_err(|e| format!("cannot serialize document: {e}"))
    }

    // ─── Presentation with defaults ──────────────────────────────────────

    pub fn height(&self) -> f64 {
        self.height.unwrap_or(CANVAS_HEIGHT)
    }

    pub fn background(&self) -> &str {
        self.background.as_deref().unwrap_or(CANVAS_BG)
    }

    pub fn grid_color(&self) -> &str {
        self.grid_color.as_deref().unwrap_or(CANVAS_GRID_COLOR)
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid.unwrap_or(DEFAULT_SHOW_GRID)
    }

    pub fn selection_stroke_color(&self) -> &str {
        self.selection_stroke_color
            .as_deref()
            .unwrap_or(SELECTION_STROKE_COLOR)
    }

    pub fn selection_line_width(&self) -> f64 {
        self.selection_line_width.unwrap_or(SELECTION_LINE_WIDTH)
    }

    /// Set the canvas height. Missing or non-positive values fall back to the
    /// default; anything smaller than the minimum is raised to it.
    pub fn set_height(&mut self, value: Option<f64>) {
        self.height = match value {
            Some(h) if h > 0.0 => Some(h.max(MIN_CANVAS_HEIGHT)),
            _ => None,
        };
    }

    // ─── Lookup ──────────────────────────────────────────────────────────

    pub fn node_index(&self, key: Key) -> Option<usize> {
        self.nodes.iter().position(|n| n.key == key)
    }

    pub fn node(&self, key: Key) -> Option<&Node> {
        self.nodes.iter().find(|n| n.key == key)
    }

    /// Whether the connector's source, port, and target all exist.
    pub fn resolves(&self, connector: &Connector) -> bool {
        let source_ok = self
            .node(connector.source_key)
            .is_some_and(|n| n.port_index(connector.port_key).is_some());
        source_ok && self.node(connector.target_key).is_some()
    }

    // ─── Mutation ────────────────────────────────────────────────────────

    /// Append a node on top of the z-order. Returns its index.
    pub fn add_node(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Append a connector if it resolves and is not already present.
    /// Returns the new index.
    pub fn add_connector(&mut self, connector: Connector) -> Option<usize> {
        if connector.source_key == connector.target_key || !self.resolves(&connector) {
            return None;
        }
        if self.connectors.iter().any(|c| c.same_route(&connector)) {
            return None;
        }
        self.connectors.push(connector);
        Some(self.connectors.len() - 1)
    }

    /// Remove the node at `index` and every connector that referenced it or
    /// one of its ports.
    pub fn remove_node(&mut self, index: usize) -> Option<Node> {
        if index >= self.nodes.len() {
            return None;
        }
        let removed = self.nodes.remove(index);
        let pruned = self.prune_connectors();
        log::debug!(
            "removed node {} at {index}, pruned {pruned} connector(s)",
            removed.key
        );
        Some(removed)
    }

    /// Index of the connector with the same endpoints as `connector`.
    pub fn connector_index(&self, connector: &Connector) -> Option<usize> {
        self.connectors.iter().position(|c| c.same_route(connector))
    }

    pub fn remove_connector(&mut self, index: usize) -> Option<Connector> {
        (index < self.connectors.len()).then(|| self.connectors.remove(index))
    }

    /// Remove a port from a node, pruning connectors that used it.
    pub fn remove_port(&mut self, node_index: usize, port_index: usize) -> Option<Port> {
        let node = self.nodes.get_mut(node_index)?;
        if port_index >= node.ports.len() {
            return None;
        }
        let port = node.ports.remove(port_index);
        self.prune_connectors();
        Some(port)
    }

    /// Drop connectors whose references no longer resolve. Returns how many
    /// were removed.
    pub fn prune_connectors(&mut self) -> usize {
        let before = self.connectors.len();
        let connectors = std::mem::take(&mut self.connectors);
        self.connectors = connectors.into_iter().filter(|c| self.resolves(c)).collect();
        before - self.connectors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc_with_two_nodes() -> Document {
        let mut a = Node::new(0.0, 0.0, 100.0, 100.0);
        a.key = Key::intern("a");
        a.ports.push(Port {
            key: Key::intern("p1"),
            label: "yes".into(),
        });
        let mut b = Node::new(300.0, 0.0, 100.0, 100.0);
        b.key = Key::intern("b");
        let mut doc = Document::new();
        doc.add_node(a);
        doc.add_node(b);
        doc.add_connector(Connector::new(
            Key::intern("a"),
            Key::intern("p1"),
            Key::intern("b"),
        ));
        doc
    }

    #[test]
    fn removing_target_prunes_connector() {
        let mut doc = doc_with_two_nodes();
        assert_eq!(doc.connectors.len(), 1);
        let idx = doc.node_index(Key::intern("b")).unwrap();
        doc.remove_node(idx);
        assert!(doc.connectors.is_empty());
    }

    #[test]
    fn removing_source_prunes_connector() {
        let mut doc = doc_with_two_nodes();
        doc.remove_node(0);
        assert!(doc.connectors.is_empty());
        assert_eq!(doc.nodes.len(), 1);
    }

    #[test]
    fn removing_port_prunes_connector() {
        let mut doc = doc_with_two_nodes();
        let port = doc.remove_port(0, 0).unwrap();
        assert_eq!(port.label, "yes");
        assert!(doc.connectors.is_empty());
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut doc = doc_with_two_nodes();
        assert!(doc.remove_node(7).is_none());
        assert!(doc.remove_connector(7).is_none());
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.connectors.len(), 1);
    }

    #[test]
    fn add_connector_rejects_duplicates_and_dangling() {
        let mut doc = doc_with_two_nodes();
        let dup = Connector::new(Key::intern("a"), Key::intern("p1"), Key::intern("b"));
        assert_eq!(doc.add_connector(dup), None);

        let dangling = Connector::new(Key::intern("a"), Key::intern("nope"), Key::intern("b"));
        assert_eq!(doc.add_connector(dangling), None);

        let self_loop = Connector::new(Key::intern("a"), Key::intern("p1"), Key::intern("a"));
        assert_eq!(doc.add_connector(self_loop), None);
        assert_eq!(doc.connectors.len(), 1);
    }

    #[test]
    fn default_node_is_centered_and_snapped() {
        let node = Node::default_at(105.0, 205.0);
        assert_eq!(node.x % GRID_SIZE, 0.0);
        assert_eq!(node.y % GRID_SIZE, 0.0);
        let c = node.rect().center();
        assert!((c.x - 105.0).abs() <= GRID_SIZE, "center x {}", c.x);
        assert!((c.y - 205.0).abs() <= GRID_SIZE, "center y {}", c.y);
        assert_eq!(node.ports.len(), 1);
    }

    #[test]
    fn set_height_clamps() {
        let mut doc = Document::new();
        doc.set_height(Some(100.0));
        assert_eq!(doc.height(), MIN_CANVAS_HEIGHT);
        doc.set_height(Some(0.0));
        assert_eq!(doc.height(), CANVAS_HEIGHT);
        doc.set_height(Some(800.0));
        assert_eq!(doc.height(), 800.0);
    }

    #[test]
    fn apply_prop_clamps_and_snaps() {
        let mut node = Node::new(0.0, 0.0, 100.0, 100.0);
        node.apply_prop("fontSize", "200").unwrap();
        assert_eq!(node.font_size(), MAX_FONT_SIZE);
        node.apply_prop("lineWidth", "0").unwrap();
        assert_eq!(node.line_width(), 1.0);
        node.apply_prop("w", "12").unwrap();
        assert_eq!(node.w, MIN_WIDTH);
        node.apply_prop("x", "33").unwrap();
        assert_eq!(node.x, 30.0);
        node.apply_prop("description", "").unwrap();
        assert_eq!(node.description, None);
        assert!(node.apply_prop("fontSize", "big").is_err());
        assert!(node.apply_prop("rotation", "45").is_err());
    }

    #[test]
    fn legacy_json_field_names_are_accepted() {
        let json = r#"{
            "components": [
                {"key": "start", "type": "box", "x": 10, "y": 20, "w": 150, "h": 100,
                 "title": "Begin", "options": [{"key": "o1", "name": "Next"}]},
                {"key": "end", "x": 300, "y": 20, "w": 150, "h": 100}
            ],
            "lines": [{"componentKey": "start", "optionKey": "o1", "targetKey": "end"}]
        }"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.nodes[0].ports[0].label, "Next");
        assert_eq!(doc.connectors.len(), 1);
        assert!(doc.resolves(&doc.connectors[0]));
    }

    #[test]
    fn json_roundtrip_preserves_document() {
        let mut doc = doc_with_two_nodes();
        doc.nodes[0].border_radius = Some(BorderRadius::Corners(PartialCornerRadii {
            tl: Some(4.0),
            ..Default::default()
        }));
        doc.show_grid = Some(true);
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"sourceKey\":\"a\""));
        let back = Document::from_json(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn invalid_json_reports_error() {
        let err = Document::from_json("{\"nodes\": 3}").unwrap_err();
        assert!(err.starts_with("invalid document"));
    }
}
