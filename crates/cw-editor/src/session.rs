//! Canvas session: one editor instance.
//!
//! The session owns the authoritative `Document`, the draw surface, and the
//! interaction controller. Host events go in through `handle` (or the thin
//! wrappers below); the session applies the controller's effects, repaints,
//! and reports document changes through the `on_change` callback.
//!
//! Multiple sessions never share state, so several canvases can live on one
//! page.

use crate::controller::{Controller, Cursor, Effect, InteractionState, Selection};
use crate::events::{ListenerId, Listeners, SelectionEvent};
use crate::input::InputEvent;
use crate::timers::{Task, TaskQueue};
use cw_core::consts::{DELETE_DELAY_MS, RESIZE_DEBOUNCE_MS};
use cw_core::{Document, Key, Point, Port};
use cw_render::{Mode, RenderState, Surface, render_scene};

/// Session configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub mode: Mode,
    /// Width of the element hosting the canvas, in logical pixels.
    pub container_width: f64,
    /// Device pixels per logical pixel.
    pub pixel_ratio: f64,
    pub resize_debounce_ms: f64,
    pub delete_delay_ms: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Editor,
            container_width: 800.0,
            pixel_ratio: 1.0,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            delete_delay_ms: DELETE_DELAY_MS,
        }
    }
}

type ChangeCallback = Box<dyn FnMut(&Document)>;

pub struct CanvasSession<S: Surface> {
    surface: Option<S>,
    doc: Document,
    config: SessionConfig,
    controller: Controller,
    listeners: Listeners,
    tasks: TaskQueue,
    on_change: Option<ChangeCallback>,
}

impl<S: Surface> CanvasSession<S> {
    /// Bind a surface and document, then paint the first frame without
    /// notifying the host.
    pub fn init(
        surface: S,
        config: SessionConfig,
        document: Document,
        on_change: impl FnMut(&Document) + 'static,
    ) -> Self {
        let mut session = Self {
            surface: Some(surface),
            doc: document,
            config,
            controller: Controller::new(),
            listeners: Listeners::new(),
            tasks: TaskQueue::new(),
            on_change: Some(Box::new(on_change)),
        };
        log::debug!(
            "session init: {} node(s), {} connector(s), {:?}",
            session.doc.nodes.len(),
            session.doc.connectors.len(),
            session.config.mode
        );
        session.trigger_render(false);
        session
    }

    /// Unbind: drop listeners, pending tasks, and the change callback, and
    /// hand the surface back. Later input and renders are ignored.
    pub fn teardown(&mut self) -> Option<S> {
        log::debug!("session teardown");
        self.listeners.clear();
        self.tasks.clear();
        self.on_change = None;
        self.controller.reset();
        self.surface.take()
    }

    pub fn is_bound(&self) -> bool {
        self.surface.is_some()
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn selection(&self) -> Selection {
        self.controller.selection
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.controller.state
    }

    pub fn cursor(&self) -> Cursor {
        self.controller.cursor
    }

    /// Earliest pending deferred task, for hosts that arm a single timer.
    pub fn next_due(&self) -> Option<f64> {
        self.tasks.next_due()
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    /// Repaint from the current document. With `notify`, the host's change
    /// callback receives the document afterwards. No-op when unbound.
    pub fn trigger_render(&mut self, notify: bool) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        self.controller.validate(&self.doc);
        let state = RenderState {
            mode: self.config.mode,
            selected_node: self.controller.selection.node,
            selected_connector: self.controller.selection.connector,
            hovered_connector: self.controller.hovered_connector,
            rubber_band: self.controller.rubber_band(&self.doc),
            container_width: self.config.container_width,
            pixel_ratio: self.config.pixel_ratio,
        };
        render_scene(surface, &self.doc, &state);
        if notify && let Some(cb) = self.on_change.as_mut() {
            cb(&self.doc);
        }
    }

    // ─── Host mutations ──────────────────────────────────────────────────

    /// Remove the node at `index` and the connectors that referenced it.
    pub fn remove_node(&mut self, index: usize) -> bool {
        let before = self.doc.connectors.len();
        if self.doc.remove_node(index).is_none() {
            return false;
        }
        let pruned = self.doc.connectors.len() != before;
        self.controller.node_removed(index, pruned);
        self.emit_selection();
        self.trigger_render(true);
        true
    }

    pub fn remove_connector(&mut self, index: usize) -> bool {
        if self.doc.remove_connector(index).is_none() {
            return false;
        }
        self.controller.connector_removed(index);
        self.emit_selection();
        self.trigger_render(true);
        true
    }

    /// Swap in a document from the host. An equal document is ignored;
    /// a different one discards the in-flight gesture, the selection, and
    /// pending deletes. Returns whether anything changed.
    pub fn replace_document(&mut self, document: Document) -> bool {
        if document == self.doc {
            return false;
        }
        log::debug!("document replaced by host");
        self.doc = document;
        self.controller.reset();
        self.controller.selection = Selection::default();
        self.tasks.clear();
        self.trigger_render(false);
        true
    }

    /// Edit one node property from a host panel.
    pub fn set_node_prop(&mut self, index: usize, name: &str, value: &str) -> Result<(), String> {
        let node = self
            .doc
            .nodes
            .get_mut(index)
            .ok_or_else(|| format!("no node at index {index}"))?;
        node.apply_prop(name, value)?;
        self.trigger_render(true);
        Ok(())
    }

    pub fn set_height(&mut self, height: Option<f64>) {
        self.doc.set_height(height);
        self.trigger_render(true);
    }

    /// Append a port to a node. Returns the new port's key.
    pub fn add_port(&mut self, index: usize, label: &str) -> Option<Key> {
        let node = self.doc.nodes.get_mut(index)?;
        let port = Port::new(label);
        let key = port.key;
        node.ports.push(port);
        self.trigger_render(true);
        Some(key)
    }

    /// Remove a port and any connector leaving from it.
    pub fn remove_port(&mut self, index: usize, port: usize) -> bool {
        let before = self.doc.connectors.len();
        if self.doc.remove_port(index, port).is_none() {
            return false;
        }
        if self.doc.connectors.len() != before {
            self.controller.selection.connector = None;
            self.controller.hovered_connector = None;
        }
        self.controller.reset();
        self.trigger_render(true);
        true
    }

    pub fn subscribe(&mut self, f: impl FnMut(&SelectionEvent) + 'static) -> ListenerId {
        self.listeners.subscribe(f)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ─── Host events ─────────────────────────────────────────────────────

    /// Dispatch one host event. `now_ms` is the host clock, used to schedule
    /// deferred work. Ignored in viewer mode and after teardown.
    pub fn handle(&mut self, event: InputEvent, now_ms: f64) {
        if !self.is_bound() || self.config.mode == Mode::Viewer {
            return;
        }
        let effects = match event {
            InputEvent::PointerDown { x, y } => {
                self.controller.pointer_down(&self.doc, Point::new(x, y))
            }
            InputEvent::PointerMove { x, y } => {
                self.controller.pointer_move(&mut self.doc, Point::new(x, y))
            }
            InputEvent::PointerUp { x, y } => {
                self.controller.pointer_up(&mut self.doc, Point::new(x, y))
            }
            InputEvent::KeyDown { key } => self.controller.key_down(&self.doc, &key),
            InputEvent::KeyUp { key } => self.controller.key_up(&key),
            InputEvent::Drop { item, x, y } => {
                self.controller
                    .drop_item(&mut self.doc, &item, Point::new(x, y))
            }
        };
        self.apply(effects, now_ms);
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, now_ms: f64) {
        self.handle(InputEvent::PointerDown { x, y }, now_ms);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, now_ms: f64) {
        self.handle(InputEvent::PointerMove { x, y }, now_ms);
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, now_ms: f64) {
        self.handle(InputEvent::PointerUp { x, y }, now_ms);
    }

    pub fn key_down(&mut self, key: &str, now_ms: f64) {
        self.handle(
            InputEvent::KeyDown {
                key: key.to_string(),
            },
            now_ms,
        );
    }

    pub fn key_up(&mut self, key: &str, now_ms: f64) {
        self.handle(
            InputEvent::KeyUp {
                key: key.to_string(),
            },
            now_ms,
        );
    }

    pub fn drop_item(&mut self, item: &str, x: f64, y: f64, now_ms: f64) {
        self.handle(
            InputEvent::Drop {
                item: item.to_string(),
                x,
                y,
            },
            now_ms,
        );
    }

    /// The container changed width. Bursts collapse into one repaint
    /// `resize_debounce_ms` after the last call. Viewers resize too.
    pub fn window_resized(&mut self, container_width: f64, now_ms: f64) {
        if !self.is_bound() {
            return;
        }
        self.config.container_width = container_width;
        self.tasks
            .debounce(Task::ResizeRender, now_ms + self.config.resize_debounce_ms);
    }

    /// Run every deferred task due by `now_ms`. Returns how many ran.
    pub fn run_due(&mut self, now_ms: f64) -> usize {
        let due = self.tasks.take_due(now_ms);
        let count = due.len();
        for task in due {
            match task {
                Task::ResizeRender => self.trigger_render(false),
                Task::DeleteNode { key } => match self.doc.node_index(key) {
                    Some(index) => {
                        self.remove_node(index);
                    }
                    None => log::debug!("deferred delete: node {key} already gone"),
                },
                Task::DeleteConnector { connector } => {
                    match self.doc.connector_index(&connector) {
                        Some(index) => {
                            self.remove_connector(index);
                        }
                        None => log::debug!(
                            "deferred delete: connector {} -> {} already gone",
                            connector.source_key,
                            connector.target_key
                        ),
                    }
                }
            }
        }
        count
    }

    // ─── Effects ─────────────────────────────────────────────────────────

    fn apply(&mut self, effects: Vec<Effect>, now_ms: f64) {
        let mut render = None;
        for effect in effects {
            match effect {
                Effect::Render { notify } => render = Some(render.unwrap_or(false) || notify),
                Effect::SelectionChanged => self.emit_selection(),
                Effect::Schedule(task) => {
                    log::debug!("schedule {task:?}");
                    self.tasks.schedule(task, now_ms + self.config.delete_delay_ms);
                }
            }
        }
        if let Some(notify) = render {
            self.trigger_render(notify);
        }
    }

    /// Tell listeners the current node and connector selection.
    fn emit_selection(&mut self) {
        self.controller.validate(&self.doc);
        let Selection { node, connector } = self.controller.selection;
        self.listeners.emit(&SelectionEvent::NodeSelected {
            index: node,
            node: node.and_then(|i| self.doc.nodes.get(i)).cloned(),
        });
        self.listeners.emit(&SelectionEvent::ConnectorSelected {
            index: connector,
            connector: connector.and_then(|i| self.doc.connectors.get(i)).cloned(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_render::{DrawOp, RecordingSurface};

    fn session() -> CanvasSession<RecordingSurface> {
        CanvasSession::init(
            RecordingSurface::new(),
            SessionConfig::default(),
            Document::new(),
            |_| {},
        )
    }

    #[test]
    fn init_paints_first_frame() {
        let s = session();
        let surface = s.surface().unwrap();
        assert!(matches!(surface.ops[0], DrawOp::SetSize { .. }));
    }

    #[test]
    fn teardown_ignores_further_input() {
        let mut s = session();
        let surface = s.teardown();
        assert!(surface.is_some());
        s.drop_item("box", 100.0, 100.0, 0.0);
        assert!(s.document().nodes.is_empty());
        s.trigger_render(true);
        assert!(!s.is_bound());
    }

    #[test]
    fn set_node_prop_reports_bad_input() {
        let mut s = session();
        assert!(s.set_node_prop(0, "title", "x").is_err());
        s.drop_item("box", 200.0, 200.0, 0.0);
        s.set_node_prop(0, "title", "Approve").unwrap();
        assert_eq!(s.document().nodes[0].title, "Approve");
        assert!(s.set_node_prop(0, "nope", "1").is_err());
    }

    #[test]
    fn ports_can_be_added_and_removed() {
        let mut s = session();
        s.drop_item("box", 200.0, 200.0, 0.0);
        let key = s.add_port(0, "Option 2").unwrap();
        assert_eq!(s.document().nodes[0].ports[1].key, key);
        assert!(s.remove_port(0, 0));
        assert_eq!(s.document().nodes[0].ports.len(), 1);
        assert!(!s.remove_port(0, 5));
    }
}
