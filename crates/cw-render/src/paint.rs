//! Document → draw-surface commands.
//!
//! Immediate mode: every call repaints the whole scene from the document
//! and the editor's transient state. Nothing is cached between frames.

use crate::surface::{LineCap, Surface, TextAlign, TextBaseline};
use crate::wrap::wrap_words;
use cw_core::consts::*;
use cw_core::route::{ConnectorPath, route_connector};
use cw_core::{
    CornerRadii, Document, Node, NodeGeometry, Point, Rect, line_angle_degrees,
    normalize_border_radius, reduce_line_size, selection_handles,
};
use kurbo::BezPath;

/// Whether the canvas accepts editing input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Editor,
    Viewer,
}

/// Transient state the renderer reads on top of the document.
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub mode: Mode,
    pub selected_node: Option<usize>,
    pub selected_connector: Option<usize>,
    pub hovered_connector: Option<usize>,
    /// Live connector preview while drawing: port anchor → cursor.
    pub rubber_band: Option<(Point, Point)>,
    pub container_width: f64,
    pub pixel_ratio: f64,
}

/// Paint the whole scene.
pub fn render_scene<S: Surface>(surface: &mut S, doc: &Document, state: &RenderState) {
    let width = state.container_width;
    let height = doc.height();
    let ratio = if state.pixel_ratio > 0.0 {
        state.pixel_ratio
    } else {
        1.0
    };
    surface.set_size(width, height, ratio);

    surface.set_fill_style(doc.background());
    surface.fill_rect(Rect::new(0.0, 0.0, width, height));

    if doc.show_grid() {
        draw_grid(surface, width, height, doc.grid_color());
    }

    for node in &doc.nodes {
        draw_node(surface, node);
    }

    for (i, connector) in doc.connectors.iter().enumerate() {
        let Some(path) = route_connector(connector, &doc.nodes) else {
            log::trace!("skip unresolved connector {i}");
            continue;
        };
        let line = connector_path(&path);
        if state.hovered_connector == Some(i) || state.selected_connector == Some(i) {
            draw_highlight(surface, &line);
        }
        surface.set_stroke_style(LINE_COLOR);
        surface.set_line_width(LINE_WIDTH);
        surface.stroke_path(&line);
        draw_arrowhead(surface, path.approach(), path.end, LINE_COLOR);
    }

    if state.mode == Mode::Editor
        && let Some(node) = state.selected_node.and_then(|i| doc.nodes.get(i))
    {
        draw_selection(surface, node, doc);
    }

    if let Some((from, to)) = state.rubber_band {
        let mut line = BezPath::new();
        line.move_to((from.x, from.y));
        line.line_to((to.x, to.y));
        surface.set_stroke_style(LINE_COLOR);
        surface.set_line_width(LINE_WIDTH);
        surface.stroke_path(&line);
        draw_arrowhead(surface, from, to, LINE_COLOR);
    }
}

fn draw_grid<S: Surface>(surface: &mut S, width: f64, height: f64, color: &str) {
    surface.set_fill_style(color);
    let mut y = 0.0;
    while y < height {
        let mut x = 0.0;
        while x < width {
            surface.fill_rect(Rect::new(x, y, 1.0, 1.0));
            x += GRID_SIZE;
        }
        y += GRID_SIZE;
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

fn draw_node<S: Surface>(surface: &mut S, node: &Node) {
    log::trace!("paint node {} at ({}, {})", node.key, node.x, node.y);
    let rect = node.rect();
    let outline = rounded_rect_path(rect, normalize_border_radius(node.border_radius()));
    let lw = node.line_width();
    let fs = node.font_size();
    let family = node.font_family();

    surface.save();
    if let Some(fill) = node.fill_color.as_deref() {
        surface.set_fill_style(fill);
        surface.fill_path(&outline);
    }
    surface.set_line_width(lw);
    surface.set_stroke_style(node.stroke_color());
    surface.stroke_path(&outline);
    surface.clip_path(&outline);

    let text_x = rect.x + TEXT_PADDING + lw;
    surface.set_fill_style(node.text_color());
    surface.set_text_align(TextAlign::Left);
    surface.set_text_baseline(TextBaseline::Alphabetic);
    surface.set_font(&format!("bold {fs}px {family}"));
    surface.fill_text(&node.title, text_x, rect.y + TEXT_PADDING + fs + lw - 5.0);

    if let Some(desc) = node.description.as_deref() {
        surface.set_font(&format!("{fs}px {family}"));
        let max_width = rect.w - TEXT_PADDING * 2.0 - lw;
        let lines = wrap_words(desc, max_width, |s| surface.measure_text(s));
        let top = rect.y + TEXT_PADDING * 2.0 + fs * 2.0 + lw - 5.0;
        for (i, line) in lines.iter().enumerate() {
            surface.fill_text(line, text_x, top + fs * i as f64);
        }
    }

    let geom = NodeGeometry::of(node);
    for (i, port) in node.ports.iter().enumerate() {
        let row = geom.port_row(i);
        surface.set_fill_style(OPTION_BG_COLOR);
        surface.fill_rect(row);

        let mut sep = BezPath::new();
        sep.move_to((row.x, row.y));
        sep.line_to((row.right(), row.y));
        surface.stroke_path(&sep);

        let mid = row.center();
        surface.set_fill_style(OPTION_TEXT_COLOR);
        surface.set_font(&format!("{OPTION_FONT_SIZE}px {family}"));
        surface.set_text_align(TextAlign::Center);
        surface.set_text_baseline(TextBaseline::Middle);
        surface.fill_text(&port.label, mid.x, mid.y);
    }
    surface.restore();
}

/// Rounded rectangle outline with quadratic corners. Radii larger than half
/// the shorter side are clamped.
pub fn rounded_rect_path(rect: Rect, radii: CornerRadii) -> BezPath {
    let max = rect.w.min(rect.h) / 2.0;
    let r = |v: f64| v.clamp(0.0, max.max(0.0));
    let (tl, tr, br, bl) = (r(radii.tl), r(radii.tr), r(radii.br), r(radii.bl));
    let (x, y, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());

    let mut path = BezPath::new();
    path.move_to((x + tl, y));
    path.line_to((right - tr, y));
    path.quad_to((right, y), (right, y + tr));
    path.line_to((right, bottom - br));
    path.quad_to((right, bottom), (right - br, bottom));
    path.line_to((x + bl, bottom));
    path.quad_to((x, bottom), (x, bottom - bl));
    path.line_to((x, y + tl));
    path.quad_to((x, y), (x + tl, y));
    path.close_path();
    path
}

// ─── Connectors ──────────────────────────────────────────────────────────

/// The stroked shape of a routed connector: straight runs with each joint
/// rounded by a quadratic curve `LINE_BEND_TENSION` pixels either side.
pub fn connector_path(path: &ConnectorPath) -> BezPath {
    let points = path.polyline();
    let mut bez = BezPath::new();
    bez.move_to((path.start.x, path.start.y));
    for w in points.windows(3) {
        let (prev, joint, next) = (w[0], w[1], w[2]);
        let enter = reduce_line_size(prev, joint, LINE_BEND_TENSION);
        let exit = reduce_line_size(next, joint, LINE_BEND_TENSION);
        bez.line_to((enter.x, enter.y));
        bez.quad_to((joint.x, joint.y), (exit.x, exit.y));
    }
    bez.line_to((path.end.x, path.end.y));
    bez
}

fn draw_highlight<S: Surface>(surface: &mut S, line: &BezPath) {
    surface.save();
    surface.set_stroke_style(LINE_HOVER_COLOR);
    surface.set_line_width(LINE_HOVER_WIDTH);
    surface.set_line_cap(LineCap::Round);
    surface.stroke_path(line);
    surface.restore();
}

/// Filled triangle with its tip at `to`, pointing away from `from`.
fn draw_arrowhead<S: Surface>(surface: &mut S, from: Point, to: Point, color: &str) {
    let angle = line_angle_degrees(from.x, from.y, to.x, to.y).to_radians();
    let s = ARROW_HEAD_SIZE;
    let mut tri = BezPath::new();
    tri.move_to((0.0, 0.0));
    tri.line_to((-s, -s / 2.0));
    tri.line_to((-s, s / 2.0));
    tri.close_path();

    surface.save();
    surface.translate(to.x, to.y);
    surface.rotate(angle);
    surface.set_fill_style(color);
    surface.fill_path(&tri);
    surface.restore();
}

// ─── Selection overlay ───────────────────────────────────────────────────

fn draw_selection<S: Surface>(surface: &mut S, node: &Node, doc: &Document) {
    let color = doc.selection_stroke_color();
    let outer = node.rect().inflate(SELECTION_BOX_OFFSET);

    surface.save();
    surface.set_stroke_style(color);
    surface.set_line_width(doc.selection_line_width());
    surface.set_line_dash(&SELECTION_DASH);
    surface.stroke_path(&rounded_rect_path(outer, CornerRadii::default()));
    surface.set_line_dash(&[]);

    surface.set_fill_style(color);
    for handle in selection_handles(&node.rect()) {
        surface.fill_rect(handle);
    }

    let geom = NodeGeometry::of(node);
    for i in 0..node.ports.len() {
        draw_connect_handle(surface, geom.connect_handle(i), color);
    }
    surface.restore();
}

/// Rounded square with a right-pointing arrow.
fn draw_connect_handle<S: Surface>(surface: &mut S, r: Rect, color: &str) {
    let radius = BORDER_RADIUS * 2.0;
    surface.stroke_path(&rounded_rect_path(
        r,
        CornerRadii {
            tl: radius,
            tr: radius,
            br: radius,
            bl: radius,
        },
    ));
    let mid = r.center();
    let from = Point::new(r.x + 4.0, mid.y);
    let to = Point::new(r.right() - 4.0, mid.y);
    let mut shaft = BezPath::new();
    shaft.move_to((from.x, from.y));
    shaft.line_to((to.x, to.y));
    surface.stroke_path(&shaft);
    draw_arrowhead(surface, from, to, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};
    use cw_core::{Connector, Key, Port};
    use pretty_assertions::assert_eq;

    fn scene() -> Document {
        let mut doc = Document::new();
        let mut a = Node::new(20.0, 20.0, 200.0, 100.0);
        a.key = Key::intern("paint_a");
        a.title = "Start".into();
        a.description = Some("kick things off".into());
        a.ports.push(Port {
            key: Key::intern("paint_p"),
            label: "Next".into(),
        });
        let mut b = Node::new(300.0, 20.0, 150.0, 100.0);
        b.key = Key::intern("paint_b");
        b.title = "End".into();
        doc.add_node(a);
        doc.add_node(b);
        doc.add_connector(Connector::new(
            Key::intern("paint_a"),
            Key::intern("paint_p"),
            Key::intern("paint_b"),
        ));
        doc
    }

    fn state() -> RenderState {
        RenderState {
            container_width: 600.0,
            pixel_ratio: 2.0,
            ..Default::default()
        }
    }

    #[test]
    fn frame_starts_with_size_and_background() {
        let doc = scene();
        let mut s = RecordingSurface::new();
        render_scene(&mut s, &doc, &state());
        assert_eq!(
            s.ops[0],
            DrawOp::SetSize {
                width: 600.0,
                height: 500.0,
                ratio: 2.0
            }
        );
        assert_eq!(s.ops[1], DrawOp::FillStyle(CANVAS_BG.into()));
        assert_eq!(s.ops[2], DrawOp::FillRect(Rect::new(0.0, 0.0, 600.0, 500.0)));
    }

    #[test]
    fn draws_titles_descriptions_and_ports() {
        let doc = scene();
        let mut s = RecordingSurface::new();
        render_scene(&mut s, &doc, &state());
        assert_eq!(s.texts(), vec!["Start", "kick things off", "Next", "End"]);
    }

    #[test]
    fn grid_is_optional() {
        let mut doc = scene();
        let mut s = RecordingSurface::new();
        render_scene(&mut s, &doc, &state());
        let without = s.count(|op| matches!(op, DrawOp::FillRect(_)));

        doc.show_grid = Some(true);
        s.clear();
        render_scene(&mut s, &doc, &state());
        let with = s.count(|op| matches!(op, DrawOp::FillRect(_)));
        assert_eq!(with - without, 60 * 50);
    }

    #[test]
    fn selection_overlay_only_in_editor_mode() {
        let doc = scene();
        let dashed = |s: &RecordingSurface| {
            s.count(|op| matches!(op, DrawOp::LineDash(d) if !d.is_empty()))
        };

        let mut s = RecordingSurface::new();
        let mut st = state();
        st.selected_node = Some(0);
        render_scene(&mut s, &doc, &st);
        assert_eq!(dashed(&s), 1);

        s.clear();
        st.mode = Mode::Viewer;
        render_scene(&mut s, &doc, &st);
        assert_eq!(dashed(&s), 0);
    }

    #[test]
    fn stale_selection_index_is_ignored() {
        let doc = scene();
        let mut s = RecordingSurface::new();
        let mut st = state();
        st.selected_node = Some(9);
        st.hovered_connector = Some(9);
        render_scene(&mut s, &doc, &st);
        assert_eq!(s.count(|op| matches!(op, DrawOp::LineDash(_))), 0);
    }

    #[test]
    fn hovered_connector_gets_wide_underlay() {
        let doc = scene();
        let mut s = RecordingSurface::new();
        let mut st = state();
        st.hovered_connector = Some(0);
        render_scene(&mut s, &doc, &st);
        assert_eq!(
            s.count(|op| *op == DrawOp::LineWidth(LINE_HOVER_WIDTH)),
            1
        );
    }

    #[test]
    fn joints_are_rounded() {
        let path = ConnectorPath {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 100.0),
            end_side: cw_core::Side::Left,
            joints: smallvec_of(&[Point::new(50.0, 0.0), Point::new(50.0, 100.0)]),
        };
        let bez = connector_path(&path);
        let quads = bez
            .elements()
            .iter()
            .filter(|el| matches!(el, kurbo::PathEl::QuadTo(..)))
            .count();
        assert_eq!(quads, 2);
    }

    fn smallvec_of(points: &[Point]) -> cw_core::route::Joints {
        points.iter().copied().collect()
    }
}
