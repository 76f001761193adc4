//! Shared constants: grid, size limits, selection chrome, connector routing,
//! and the presentation defaults applied when a node leaves a field unset.

// ── Canvas ──────────────────────────────────────────────────────────────

/// Canvas height used when the document does not specify one.
pub const CANVAS_HEIGHT: f64 = 500.0;
/// Smallest canvas height a host may set.
pub const MIN_CANVAS_HEIGHT: f64 = 250.0;
pub const CANVAS_BG: &str = "#f5f5f5";

/// Grid pitch; node positions and sizes snap to multiples of this.
pub const GRID_SIZE: f64 = 10.0;
pub const CANVAS_GRID_COLOR: &str = "#cccccc";
pub const DEFAULT_SHOW_GRID: bool = false;

// ── Nodes ───────────────────────────────────────────────────────────────

pub const MIN_WIDTH: f64 = 50.0;
pub const MIN_HEIGHT: f64 = 50.0;

/// Size of a node created by drop or `Node::default_at`.
pub const DEFAULT_NODE_WIDTH: f64 = 150.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 100.0;

pub const FONT_SIZE: f64 = 16.0;
pub const MIN_FONT_SIZE: f64 = 8.0;
pub const MAX_FONT_SIZE: f64 = 70.0;
pub const FONT_FAMILY: &str = "Arial";
pub const TEXT_COLOR: &str = "#000000";
pub const STROKE_COLOR: &str = "#cccccc";
pub const BORDER_RADIUS: f64 = 2.0;
pub const MAX_BORDER_RADIUS: f64 = 20.0;
pub const LINE_WIDTH: f64 = 1.0;
pub const MAX_LINE_WIDTH: f64 = 10.0;

/// Inner padding between a node's border and its text.
pub const TEXT_PADDING: f64 = 5.0;

// ── Ports (options) ─────────────────────────────────────────────────────

/// Height of one port row; rows stack upward from the node's bottom edge.
pub const OPTION_HEIGHT: f64 = 20.0;
pub const OPTION_BG_COLOR: &str = "#eeeeee";
pub const OPTION_TEXT_COLOR: &str = "#333333";
pub const OPTION_FONT_SIZE: f64 = 12.0;

/// Gap between a node's right edge and its "start connector" handle.
pub const CONNECT_HANDLE_GAP: f64 = 5.0;
/// Side of the square "start connector" handle.
pub const CONNECT_HANDLE_SIZE: f64 = OPTION_HEIGHT;

// ── Selection ───────────────────────────────────────────────────────────

pub const SELECTION_BOX_OFFSET: f64 = 3.0;
pub const SELECTION_RESIZE_BOX_SIZE: f64 = 7.0;
pub const SELECTION_STROKE_COLOR: &str = "#7f7f7f";
pub const SELECTION_LINE_WIDTH: f64 = 1.0;
pub const SELECTION_DASH: [f64; 2] = [5.0, 5.0];

/// CSS cursor per resize handle, clockwise from top-left.
pub const SELECTION_RESIZE_BOX_CURSORS: [&str; 8] = [
    "nwse-resize",
    "ns-resize",
    "nesw-resize",
    "ew-resize",
    "nwse-resize",
    "ns-resize",
    "nesw-resize",
    "ew-resize",
];

// ── Connectors ──────────────────────────────────────────────────────────

/// Minimum clearance before a connector bends away from a node.
pub const MIN_LINE_BEND_MARGIN: f64 = 30.0;
/// Distance trimmed from each segment before curving through a joint.
pub const LINE_BEND_TENSION: f64 = 10.0;
/// Slack allowed by the triangle-inequality test when hit-testing a segment.
pub const LINE_HIT_BUFFER: f64 = 0.2;
pub const LINE_COLOR: &str = "#000000";
pub const LINE_HOVER_COLOR: &str = "#9fc6f5";
pub const LINE_HOVER_WIDTH: f64 = 6.0;
pub const ARROW_HEAD_SIZE: f64 = 7.0;

// ── Timing ──────────────────────────────────────────────────────────────

/// Window-resize bursts collapse into one render this long after the last event.
pub const RESIZE_DEBOUNCE_MS: f64 = 300.0;
/// Delay between a delete key press and the node/connector removal.
pub const DELETE_DELAY_MS: f64 = 100.0;
