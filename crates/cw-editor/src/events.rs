//! Selection notifications.
//!
//! Hosts (e.g. a property panel) subscribe to learn which node or connector
//! became selected. Listeners run synchronously, in subscription order.

use cw_core::{Connector, Node};

/// Emitted after every pointer-down, drop, or removal that changes what is
/// selected. `None` means nothing of that kind is selected.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    NodeSelected {
        index: Option<usize>,
        node: Option<Node>,
    },
    ConnectorSelected {
        index: Option<usize>,
        connector: Option<Connector>,
    },
}

/// Handle returned by [`Listeners::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&SelectionEvent)>;

/// Observer list for selection events.
#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Callback)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, f: impl FnMut(&SelectionEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(f)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(eid, _)| *eid != id);
        self.entries.len() != before
    }

    pub fn emit(&mut self, event: &SelectionEvent) {
        for (_, f) in &mut self.entries {
            f(event);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
