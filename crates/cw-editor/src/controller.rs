//! Interaction controller: the pointer/keyboard state machine.
//!
//! The controller owns only transient state (current gesture, selection,
//! hover). It borrows the document per call and reports what the session
//! must do next as a list of [`Effect`]s.
//!
//! ## Pointer-down priority
//!
//! | # | Condition | Enters |
//! |---|-----------|--------|
//! | 1 | pan key held | `PanningCanvas` |
//! | 2 | start-connector handle of the selected node | `DrawingConnector` |
//! | 3 | on a connector path | `DraggingConnectorJoint` |
//! | 4 | inside a node, or on the selected node's resize handle (topmost first) | `DraggingNode` / `ResizingNode` |
//! | 5 | nothing | deselect |

use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::timers::Task;
use cw_core::consts::{MIN_HEIGHT, MIN_WIDTH, SELECTION_RESIZE_BOX_CURSORS};
use cw_core::{
    Connector, Document, Node, NodeGeometry, Point, Rect, rect_collision, snap_size, snap_to_grid,
};
use cw_render::hit::{hit_test_connect_handle, hit_test_connector, hit_test_handle, hit_test_node};

/// The gesture in progress.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Whole-canvas move. `snapshot` holds every node's position at press.
    PanningCanvas { origin: Point, snapshot: Vec<Point> },
    /// `offset` is the press point relative to the node origin.
    DraggingNode { index: usize, offset: Point },
    /// `snapshot` is the node rect at press.
    ResizingNode {
        index: usize,
        handle: usize,
        origin: Point,
        snapshot: Rect,
    },
    DrawingConnector {
        node: usize,
        port: usize,
        cursor: Point,
    },
    /// A connector was pressed. Joints are always routed, so moving does
    /// nothing beyond keeping it selected.
    DraggingConnectorJoint { index: usize },
}

/// What is selected. The two fields are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub node: Option<usize>,
    pub connector: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Move,
    Grab,
    Grabbing,
    Crosshair,
    /// Over resize handle `n`, clockwise from top-left.
    Resize(usize),
}

impl Cursor {
    /// CSS `cursor` value.
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Move => "move",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::Crosshair => "crosshair",
            Cursor::Resize(i) => SELECTION_RESIZE_BOX_CURSORS
                .get(i)
                .copied()
                .unwrap_or("default"),
        }
    }
}

/// Something the session must do after a controller call.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Repaint. `notify` also reports the document to the host.
    Render { notify: bool },
    /// Selection was recomputed; tell listeners about both kinds.
    SelectionChanged,
    Schedule(Task),
}

#[derive(Debug, Default)]
pub struct Controller {
    pub state: InteractionState,
    pub selection: Selection,
    pub hovered_connector: Option<usize>,
    pub cursor: Cursor,
    /// Space is held.
    pub pan_mode: bool,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the in-flight gesture and hover state.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
        self.hovered_connector = None;
        self.cursor = if self.pan_mode {
            Cursor::Grab
        } else {
            Cursor::Default
        };
    }

    /// Clear selection and hover indices that no longer point into `doc`.
    pub fn validate(&mut self, doc: &Document) {
        if self.selection.node.is_some_and(|i| i >= doc.nodes.len()) {
            log::debug!("selected node {:?} out of range, clearing", self.selection.node);
            self.selection.node = None;
        }
        if self
            .selection
            .connector
            .is_some_and(|i| i >= doc.connectors.len())
        {
            self.selection.connector = None;
        }
        if self
            .hovered_connector
            .is_some_and(|i| i >= doc.connectors.len())
        {
            self.hovered_connector = None;
        }
    }

    /// Keep indices coherent after node `index` was removed. Connector
    /// indices may have shifted when `pruned` connectors went with it.
    pub fn node_removed(&mut self, index: usize, pruned: bool) {
        self.selection.node = match self.selection.node {
            Some(i) if i == index => None,
            Some(i) if i > index => Some(i - 1),
            other => other,
        };
        if pruned {
            self.selection.connector = None;
            self.hovered_connector = None;
        }
        // Node indices held by the gesture may have shifted.
        self.state = InteractionState::Idle;
    }

    pub fn connector_removed(&mut self, index: usize) {
        self.selection.connector = match self.selection.connector {
            Some(i) if i == index => None,
            Some(i) if i > index => Some(i - 1),
            other => other,
        };
        self.hovered_connector = None;
        if matches!(self.state, InteractionState::DraggingConnectorJoint { .. }) {
            self.state = InteractionState::Idle;
        }
    }

    /// Live connector preview: port anchor to cursor.
    pub fn rubber_band(&self, doc: &Document) -> Option<(Point, Point)> {
        let InteractionState::DrawingConnector { node, port, cursor } = self.state else {
            return None;
        };
        let node = doc.nodes.get(node)?;
        Some((NodeGeometry::of(node).port_anchor(port), cursor))
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, doc: &Document, p: Point) -> Vec<Effect> {
        self.hovered_connector = None;

        if self.pan_mode {
            if matches!(self.state, InteractionState::PanningCanvas { .. }) {
                return Vec::new();
            }
            let snapshot = doc.nodes.iter().map(|n| Point::new(n.x, n.y)).collect();
            self.state = InteractionState::PanningCanvas { origin: p, snapshot };
            self.cursor = Cursor::Grabbing;
            log::debug!("pan start at {p:?}");
            return Vec::new();
        }

        if let Some(node) = self.selection.node
            && let Some(port) = doc
                .nodes
                .get(node)
                .and_then(|n| hit_test_connect_handle(n, p))
        {
            self.state = InteractionState::DrawingConnector {
                node,
                port,
                cursor: p,
            };
            self.cursor = Cursor::Grabbing;
            log::debug!("draw connector from node {node} port {port}");
            return vec![Effect::Render { notify: false }];
        }

        if let Some(index) = hit_test_connector(doc, p) {
            self.state = InteractionState::DraggingConnectorJoint { index };
            self.selection = Selection {
                node: None,
                connector: Some(index),
            };
            log::debug!("connector {index} selected");
            return vec![Effect::SelectionChanged, Effect::Render { notify: false }];
        }

        for (index, node) in doc.nodes.iter().enumerate().rev() {
            if rect_collision(p.x, p.y, &node.rect()) {
                self.state = InteractionState::DraggingNode {
                    index,
                    offset: Point::new(p.x - node.x, p.y - node.y),
                };
                self.selection = Selection {
                    node: Some(index),
                    connector: None,
                };
                self.cursor = Cursor::Move;
                log::debug!("drag node {index}");
                return vec![Effect::SelectionChanged, Effect::Render { notify: false }];
            }
            if self.selection.node == Some(index)
                && let Some(handle) = hit_test_handle(node, p)
            {
                self.state = InteractionState::ResizingNode {
                    index,
                    handle,
                    origin: p,
                    snapshot: node.rect(),
                };
                self.selection.connector = None;
                self.cursor = Cursor::Resize(handle);
                log::debug!("resize node {index} by handle {handle}");
                return vec![Effect::SelectionChanged, Effect::Render { notify: false }];
            }
        }

        self.state = InteractionState::Idle;
        self.selection = Selection::default();
        self.cursor = Cursor::Default;
        vec![Effect::SelectionChanged, Effect::Render { notify: false }]
    }

    pub fn pointer_move(&mut self, doc: &mut Document, p: Point) -> Vec<Effect> {
        if self.state == InteractionState::Idle {
            return self.hover(doc, p);
        }
        match &mut self.state {
            InteractionState::Idle | InteractionState::DraggingConnectorJoint { .. } => Vec::new(),

            InteractionState::PanningCanvas { origin, snapshot } => {
                let (dx, dy) = (p.x - origin.x, p.y - origin.y);
                for (node, start) in doc.nodes.iter_mut().zip(snapshot.iter()) {
                    let at = snap_to_grid(start.x + dx, start.y + dy);
                    node.x = at.x;
                    node.y = at.y;
                }
                vec![Effect::Render { notify: true }]
            }

            InteractionState::DraggingNode { index, offset } => {
                let Some(node) = doc.nodes.get_mut(*index) else {
                    self.state = InteractionState::Idle;
                    return Vec::new();
                };
                let at = snap_to_grid(p.x - offset.x, p.y - offset.y);
                if at.x == node.x && at.y == node.y {
                    return Vec::new();
                }
                node.x = at.x;
                node.y = at.y;
                vec![Effect::Render { notify: true }]
            }

            InteractionState::ResizingNode {
                index,
                handle,
                origin,
                snapshot,
            } => {
                let Some(node) = doc.nodes.get_mut(*index) else {
                    self.state = InteractionState::Idle;
                    return Vec::new();
                };
                let rect = resize_rect(*snapshot, *handle, p.x - origin.x, p.y - origin.y);
                node.x = rect.x;
                node.y = rect.y;
                node.w = rect.w;
                node.h = rect.h;
                vec![Effect::Render { notify: true }]
            }

            InteractionState::DrawingConnector { cursor, .. } => {
                *cursor = p;
                vec![Effect::Render { notify: false }]
            }
        }
    }

    /// Idle hover: pick a cursor and highlight the connector under `p`.
    fn hover(&mut self, doc: &Document, p: Point) -> Vec<Effect> {
        let selected = self.selection.node.and_then(|i| doc.nodes.get(i));
        let hovered = hit_test_connector(doc, p);

        self.cursor = if self.pan_mode {
            Cursor::Grab
        } else if let Some(handle) = selected.and_then(|n| hit_test_handle(n, p)) {
            Cursor::Resize(handle)
        } else if selected.and_then(|n| hit_test_connect_handle(n, p)).is_some() {
            Cursor::Grab
        } else if hovered.is_some() {
            Cursor::Crosshair
        } else if hit_test_node(&doc.nodes, p).is_some() {
            Cursor::Move
        } else {
            Cursor::Default
        };

        if hovered == self.hovered_connector {
            return Vec::new();
        }
        self.hovered_connector = hovered;
        vec![Effect::Render { notify: false }]
    }

    pub fn pointer_up(&mut self, doc: &mut Document, p: Point) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        self.cursor = if self.pan_mode {
            Cursor::Grab
        } else {
            Cursor::Default
        };

        let InteractionState::DrawingConnector { node, port, .. } = state else {
            return Vec::new();
        };
        let created = hit_test_node(&doc.nodes, p)
            .filter(|&target| target != node)
            .and_then(|target| {
                let source = doc.nodes.get(node)?;
                let port_key = source.ports.get(port)?.key;
                let connector = Connector::new(source.key, port_key, doc.nodes[target].key);
                doc.add_connector(connector)
            });
        match created {
            Some(index) => {
                log::debug!("connector {index} created");
                vec![Effect::Render { notify: true }]
            }
            None => vec![Effect::Render { notify: false }],
        }
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    pub fn key_down(&mut self, doc: &Document, key: &str) -> Vec<Effect> {
        match ShortcutMap::resolve(key, true) {
            Some(ShortcutAction::PanStart) => {
                self.pan_mode = true;
                if self.state == InteractionState::Idle {
                    self.cursor = Cursor::Grab;
                }
                Vec::new()
            }
            Some(ShortcutAction::Delete) => {
                if let Some(node) = self.selection.node.and_then(|i| doc.nodes.get(i)) {
                    vec![Effect::Schedule(Task::DeleteNode { key: node.key })]
                } else if let Some(connector) =
                    self.selection.connector.and_then(|i| doc.connectors.get(i))
                {
                    vec![Effect::Schedule(Task::DeleteConnector {
                        connector: connector.clone(),
                    })]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    pub fn key_up(&mut self, key: &str) -> Vec<Effect> {
        if ShortcutMap::resolve(key, false) == Some(ShortcutAction::PanEnd) {
            self.pan_mode = false;
            if matches!(self.state, InteractionState::PanningCanvas { .. }) {
                self.state = InteractionState::Idle;
            }
            self.cursor = Cursor::Default;
        }
        Vec::new()
    }

    // ─── Drop ────────────────────────────────────────────────────────────

    /// Create a node for a palette item centered on `p` and select it.
    pub fn drop_item(&mut self, doc: &mut Document, item: &str, p: Point) -> Vec<Effect> {
        let node = match item {
            "box" => Node::default_at(p.x, p.y),
            other => {
                log::warn!("unknown palette item {other:?}");
                return Vec::new();
            }
        };
        let index = doc.add_node(node);
        self.state = InteractionState::Idle;
        self.selection = Selection {
            node: Some(index),
            connector: None,
        };
        vec![Effect::SelectionChanged, Effect::Render { notify: true }]
    }
}

/// Apply a resize-handle drag of `(dx, dy)` to `start`.
///
/// Left-side handles (0, 6, 7) and top-side handles (0, 1, 2) snap the edge
/// they drag and keep the opposite one fixed; right/bottom handles snap the
/// size. Width and height never drop below the minimum.
pub fn resize_rect(start: Rect, handle: usize, dx: f64, dy: f64) -> Rect {
    let moved = snap_to_grid(start.x + dx, start.y + dy);
    let (grown_w, grown_h) = snap_size(start.w + dx, start.h + dy);
    let mut r = start;
    if matches!(handle, 0 | 6 | 7) {
        r.x = moved.x.min(start.right() - MIN_WIDTH);
        r.w = start.right() - r.x;
    } else if matches!(handle, 2..=4) {
        r.w = grown_w.max(MIN_WIDTH);
    }
    if matches!(handle, 0..=2) {
        r.y = moved.y.min(start.bottom() - MIN_HEIGHT);
        r.h = start.bottom() - r.y;
    } else if matches!(handle, 4..=6) {
        r.h = grown_h.max(MIN_HEIGHT);
    }
    r
}
