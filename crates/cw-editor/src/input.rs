//! Input abstraction layer.
//!
//! Normalizes host events into a single `InputEvent` enum consumed by the
//! session. Coordinates are canvas-local logical pixels.

/// A normalized input event forwarded by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },

    /// `key` is the `KeyboardEvent.key` value (e.g. `" "`, `"Delete"`).
    KeyDown { key: String },
    KeyUp { key: String },

    /// A palette item dropped onto the canvas.
    Drop { item: String, x: f64, y: f64 },
}

impl InputEvent {
    /// Extract position if this is a pointer or drop event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y }
            | Self::PointerMove { x, y }
            | Self::PointerUp { x, y }
            | Self::Drop { x, y, .. } => Some((*x, *y)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_only_for_located_events() {
        assert_eq!(
            InputEvent::Drop {
                item: "box".into(),
                x: 3.0,
                y: 4.0
            }
            .position(),
            Some((3.0, 4.0))
        );
        assert_eq!(InputEvent::KeyDown { key: " ".into() }.position(), None);
    }
}
