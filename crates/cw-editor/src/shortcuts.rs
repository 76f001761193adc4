//! Keyboard shortcut mapping.
//!
//! Maps `KeyboardEvent.key` values to semantic `ShortcutAction`s. The canvas
//! only binds two things: hold Space to pan, Delete/Backspace to remove the
//! current selection.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    PanStart,
    PanEnd,
    Delete,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key transition to an action. `pressed` is true on key-down.
    /// Returns `None` if the key has no binding in that direction.
    pub fn resolve(key: &str, pressed: bool) -> Option<ShortcutAction> {
        match (key, pressed) {
            (" " | "Space" | "Spacebar", true) => Some(ShortcutAction::PanStart),
            (" " | "Space" | "Spacebar", false) => Some(ShortcutAction::PanEnd),
            ("Delete" | "Backspace", true) => Some(ShortcutAction::Delete),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_toggles_pan() {
        assert_eq!(ShortcutMap::resolve(" ", true), Some(ShortcutAction::PanStart));
        assert_eq!(ShortcutMap::resolve(" ", false), Some(ShortcutAction::PanEnd));
    }

    #[test]
    fn delete_fires_on_key_down_only() {
        assert_eq!(ShortcutMap::resolve("Delete", true), Some(ShortcutAction::Delete));
        assert_eq!(ShortcutMap::resolve("Backspace", true), Some(ShortcutAction::Delete));
        assert_eq!(ShortcutMap::resolve("Backspace", false), None);
    }

    #[test]
    fn unbound_keys() {
        assert_eq!(ShortcutMap::resolve("a", true), None);
        assert_eq!(ShortcutMap::resolve("Escape", true), None);
    }
}
