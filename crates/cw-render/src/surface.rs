//! Draw-surface abstraction.
//!
//! The renderer speaks a small Canvas2D-shaped vocabulary so the same paint
//! code drives a browser `<canvas>` and the headless [`RecordingSurface`].
//! Paths are passed as `kurbo::BezPath` and replayed by the backend.

use cw_core::Rect;
use kurbo::BezPath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextBaseline {
    Alphabetic,
    Middle,
}

/// An immediate-mode 2D drawing target.
pub trait Surface {
    /// Resize the backing store to `width × height` logical pixels at
    /// `ratio` device pixels each, and reset the transform to scale by
    /// `ratio`. Called at the start of every frame.
    fn set_size(&mut self, width: f64, height: f64, ratio: f64);

    fn save(&mut self);
    fn restore(&mut self);

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_line_dash(&mut self, dash: &[f64]);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);

    fn fill_rect(&mut self, rect: Rect);
    fn fill_path(&mut self, path: &BezPath);
    fn stroke_path(&mut self, path: &BezPath);
    /// Intersect the clip region with `path` until the matching `restore`.
    fn clip_path(&mut self, path: &BezPath);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    /// Advance width of `text` in the current font.
    fn measure_text(&self, text: &str) -> f64;

    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, radians: f64);
}

// ─── Recording surface ───────────────────────────────────────────────────

/// One call made against a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    SetSize { width: f64, height: f64, ratio: f64 },
    Save,
    Restore,
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f64),
    LineDash(Vec<f64>),
    LineCap(LineCap),
    Font(String),
    TextAlign(TextAlign),
    TextBaseline(TextBaseline),
    FillRect(Rect),
    FillPath(BezPath),
    StrokePath(BezPath),
    ClipPath(BezPath),
    FillText { text: String, x: f64, y: f64 },
    Translate(f64, f64),
    Rotate(f64),
}

/// Surface that records every call. Text is measured with a fixed
/// average glyph width of 0.6 em.
#[derive(Debug)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    font_px: f64,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            font_px: 10.0,
        }
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// All text drawn, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    /// Pixel size from a CSS font shorthand such as `bold 16px Arial`.
    fn parse_font_px(font: &str) -> Option<f64> {
        font.split_whitespace()
            .find_map(|tok| tok.strip_suffix("px")?.parse().ok())
    }
}

impl Surface for RecordingSurface {
    fn set_size(&mut self, width: f64, height: f64, ratio: f64) {
        self.ops.push(DrawOp::SetSize {
            width,
            height,
            ratio,
        });
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ops.push(DrawOp::FillStyle(color.to_string()));
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ops.push(DrawOp::StrokeStyle(color.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn set_line_dash(&mut self, dash: &[f64]) {
        self.ops.push(DrawOp::LineDash(dash.to_vec()));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ops.push(DrawOp::LineCap(cap));
    }

    fn set_font(&mut self, font: &str) {
        if let Some(px) = Self::parse_font_px(font) {
            self.font_px = px;
        }
        self.ops.push(DrawOp::Font(font.to_string()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ops.push(DrawOp::TextAlign(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ops.push(DrawOp::TextBaseline(baseline));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::FillRect(rect));
    }

    fn fill_path(&mut self, path: &BezPath) {
        self.ops.push(DrawOp::FillPath(path.clone()));
    }

    fn stroke_path(&mut self, path: &BezPath) {
        self.ops.push(DrawOp::StrokePath(path.clone()));
    }

    fn clip_path(&mut self, path: &BezPath) {
        self.ops.push(DrawOp::ClipPath(path.clone()));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn measure_text(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.font_px * 0.6
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.ops.push(DrawOp::Translate(x, y));
    }

    fn rotate(&mut self, radians: f64) {
        self.ops.push(DrawOp::Rotate(radians));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measures_with_current_font() {
        let mut s = RecordingSurface::new();
        s.set_font("bold 20px Arial");
        assert_eq!(s.measure_text("abcde"), 60.0);
        s.set_font("12px Helvetica");
        assert!((s.measure_text("ab") - 14.4).abs() < 1e-9);
    }

    #[test]
    fn records_text_in_order() {
        let mut s = RecordingSurface::new();
        s.fill_text("one", 0.0, 0.0);
        s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        s.fill_text("two", 0.0, 10.0);
        assert_eq!(s.texts(), vec!["one", "two"]);
        assert_eq!(s.count(|op| matches!(op, DrawOp::FillRect(_))), 1);
    }
}
