use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Process-wide table behind every `Key`.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Interned key of a node or a port. Compares as an integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(Spur);

impl Key {
    /// Intern a string as a Key, or return the existing one.
    pub fn intern(s: &str) -> Self {
        Key(INTERNER.get_or_intern(s))
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &str {
        INTERNER.resolve(&self.0)
    }

    /// Generate a key that has never been seen in this process (e.g. `box_3`).
    ///
    /// Keys loaded from a document are interned on deserialize, so a
    /// generated key can never collide with one already in use.
    pub fn fresh(prefix: &str) -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        loop {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{prefix}_{n}");
            if !INTERNER.contains(&candidate) {
                return Self::intern(&candidate);
            }
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.as_str())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Key::intern(&s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_roundtrip() {
        let a = Key::intern("start_node");
        let b = Key::intern("start_node");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "start_node");
    }

    #[test]
    fn fresh_keys_are_unique() {
        let a = Key::fresh("box");
        let b = Key::fresh("box");
        assert_ne!(a, b);
    }

    #[test]
    fn fresh_keys_skip_loaded_keys() {
        // Pretend a document already used the next few generated names.
        for n in 0..64 {
            Key::intern(&format!("port_taken_{n}"));
        }
        let key = Key::fresh("port_taken");
        let n: u64 = key.as_str().trim_start_matches("port_taken_").parse().unwrap();
        assert!(n >= 64, "generated {key} collides with a loaded key");
    }
}
