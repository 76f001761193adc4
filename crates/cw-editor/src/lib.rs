pub mod controller;
pub mod events;
pub mod input;
pub mod session;
pub mod shortcuts;
pub mod timers;

pub use controller::{Controller, Cursor, Effect, InteractionState, Selection};
pub use cw_render::Mode;
pub use events::{ListenerId, Listeners, SelectionEvent};
pub use input::InputEvent;
pub use session::{CanvasSession, SessionConfig};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use timers::{Task, TaskQueue};
