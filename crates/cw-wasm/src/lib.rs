//! WASM bridge for Canvas Workflow: exposes the editor session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the
//! `<canvas>`, forwards DOM events, and drives deferred work with `tick`.
//! Documents cross the boundary as JSON strings.

mod surface2d;

use cw_core::Document;
use cw_editor::{CanvasSession, Mode, SelectionEvent, SessionConfig};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use surface2d::Canvas2dSurface;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

type JsCallback = Rc<RefCell<Option<js_sys::Function>>>;

/// One canvas editor bound to a `<canvas>` element.
#[wasm_bindgen]
pub struct CwCanvas {
    session: CanvasSession<Canvas2dSurface>,
    on_change: JsCallback,
    on_select: JsCallback,
}

#[wasm_bindgen]
impl CwCanvas {
    /// Bind to `canvas` and paint the first frame.
    ///
    /// `mode` is `"editor"` or `"viewer"`. An unparsable document is logged
    /// and replaced by an empty one.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        container_width: f64,
        pixel_ratio: f64,
        mode: &str,
        document_json: &str,
    ) -> Result<CwCanvas, JsValue> {
        console_error_panic_hook_setup();
        let _ = console_log::init_with_level(log::Level::Info);

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let document = Document::from_json(document_json).unwrap_or_else(|e| {
            log::warn!("{e}; starting with an empty document");
            Document::new()
        });
        let config = SessionConfig {
            mode: parse_mode(mode),
            container_width,
            pixel_ratio,
            ..Default::default()
        };

        let on_change: JsCallback = Rc::new(RefCell::new(None));
        let on_select: JsCallback = Rc::new(RefCell::new(None));

        let change_cb = on_change.clone();
        let mut session = CanvasSession::init(
            Canvas2dSurface::new(canvas, ctx),
            config,
            document,
            move |doc: &Document| {
                let Some(f) = change_cb.borrow().clone() else {
                    return;
                };
                match doc.to_json() {
                    Ok(json) => {
                        let _ = f.call1(&JsValue::NULL, &JsValue::from_str(&json));
                    }
                    Err(e) => log::warn!("{e}"),
                }
            },
        );

        let select_cb = on_select.clone();
        session.subscribe(move |event| {
            let Some(f) = select_cb.borrow().clone() else {
                return;
            };
            let _ = f.call1(&JsValue::NULL, &JsValue::from_str(&selection_json(event)));
        });

        Ok(Self {
            session,
            on_change,
            on_select,
        })
    }

    /// `f(documentJson)` after every change made through the canvas.
    pub fn set_on_change(&mut self, f: js_sys::Function) {
        *self.on_change.borrow_mut() = Some(f);
    }

    /// `f(eventJson)` with `{"type": "nodeSelected" | "connectorSelected", "index", ...}`.
    pub fn set_on_select(&mut self, f: js_sys::Function) {
        *self.on_select.borrow_mut() = Some(f);
    }

    // ─── Events ──────────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.session.pointer_down(x, y, js_sys::Date::now());
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.session.pointer_move(x, y, js_sys::Date::now());
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) {
        self.session.pointer_up(x, y, js_sys::Date::now());
    }

    /// `key` is `KeyboardEvent.key`.
    pub fn key_down(&mut self, key: &str) {
        self.session.key_down(key, js_sys::Date::now());
    }

    pub fn key_up(&mut self, key: &str) {
        self.session.key_up(key, js_sys::Date::now());
    }

    /// A palette item (e.g. `"box"`) dropped at canvas position `(x, y)`.
    pub fn drop_item(&mut self, id: &str, x: f64, y: f64) {
        self.session.drop_item(id, x, y, js_sys::Date::now());
    }

    /// The container's width changed. The repaint is debounced.
    pub fn resize(&mut self, container_width: f64) {
        self.session
            .window_resized(container_width, js_sys::Date::now());
    }

    /// Run due deferred work. Returns true if anything ran.
    pub fn tick(&mut self) -> bool {
        self.session.run_due(js_sys::Date::now()) > 0
    }

    /// Milliseconds until the next deferred task, if any.
    pub fn next_due_in(&self) -> Option<f64> {
        self.session
            .next_due()
            .map(|at| (at - js_sys::Date::now()).max(0.0))
    }

    // ─── Host API ────────────────────────────────────────────────────────

    pub fn trigger_render(&mut self, notify: bool) {
        self.session.trigger_render(notify);
    }

    pub fn remove_node(&mut self, index: usize) -> bool {
        self.session.remove_node(index)
    }

    pub fn remove_connector(&mut self, index: usize) -> bool {
        self.session.remove_connector(index)
    }

    pub fn document_json(&self) -> String {
        self.session.document().to_json().unwrap_or_else(|e| {
            log::warn!("{e}");
            String::from("{}")
        })
    }

    /// Replace the document. Returns false on bad JSON.
    pub fn set_document_json(&mut self, json: &str) -> bool {
        match Document::from_json(json) {
            Ok(doc) => {
                self.session.replace_document(doc);
                true
            }
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    /// CSS cursor for the canvas element.
    pub fn cursor(&self) -> String {
        self.session.cursor().css().to_string()
    }

    /// `{"node": index | null, "connector": index | null}`.
    pub fn selection_json(&self) -> String {
        let sel = self.session.selection();
        json!({ "node": sel.node, "connector": sel.connector }).to_string()
    }

    /// Edit a node field (`title`, `fontSize`, `fillColor`, ...). Returns
    /// false if the index, name, or value is rejected.
    pub fn set_node_prop(&mut self, index: usize, key: &str, value: &str) -> bool {
        match self.session.set_node_prop(index, key, value) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("set_node_prop: {e}");
                false
            }
        }
    }

    /// Canvas height; values `<= 0` restore the default.
    pub fn set_height(&mut self, height: f64) {
        self.session.set_height(Some(height));
    }

    /// Returns the new port key.
    pub fn add_port(&mut self, index: usize, label: &str) -> Option<String> {
        self.session
            .add_port(index, label)
            .map(|k| k.as_str().to_string())
    }

    pub fn remove_port(&mut self, index: usize, port: usize) -> bool {
        self.session.remove_port(index, port)
    }

    /// Detach from the canvas. The instance ignores everything afterwards.
    pub fn teardown(&mut self) {
        self.session.teardown();
        *self.on_change.borrow_mut() = None;
        *self.on_select.borrow_mut() = None;
    }
}

fn parse_mode(mode: &str) -> Mode {
    match mode {
        "viewer" => Mode::Viewer,
        "editor" => Mode::Editor,
        other => {
            log::warn!("unknown mode {other:?}, using editor");
            Mode::Editor
        }
    }
}

fn selection_json(event: &SelectionEvent) -> String {
    match event {
        SelectionEvent::NodeSelected { index, node } => {
            json!({ "type": "nodeSelected", "index": index, "node": node })
        }
        SelectionEvent::ConnectorSelected { index, connector } => {
            json!({ "type": "connectorSelected", "index": index, "connector": connector })
        }
    }
    .to_string()
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Canvas Workflow WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_core::{Key, Node};
    use pretty_assertions::assert_eq;

    #[test]
    fn modes_parse() {
        assert_eq!(parse_mode("viewer"), Mode::Viewer);
        assert_eq!(parse_mode("editor"), Mode::Editor);
        assert_eq!(parse_mode("kiosk"), Mode::Editor);
    }

    #[test]
    fn selection_events_serialize_for_js() {
        let json = selection_json(&SelectionEvent::ConnectorSelected {
            index: None,
            connector: None,
        });
        assert_eq!(json, r#"{"connector":null,"index":null,"type":"connectorSelected"}"#);

        let mut node = Node::new(0.0, 0.0, 100.0, 100.0);
        node.key = Key::intern("wasm_n");
        let json = selection_json(&SelectionEvent::NodeSelected {
            index: Some(3),
            node: Some(node),
        });
        assert!(json.contains(r#""index":3"#));
        assert!(json.contains(r#""key":"wasm_n""#));
    }
}
