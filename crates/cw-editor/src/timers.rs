//! Deferred work keyed by host-supplied timestamps.
//!
//! The engine never sleeps or spawns. The host drives time by calling
//! `take_due(now_ms)` from its own timer (`setTimeout`,
//! `requestAnimationFrame`, or a test loop).

use cw_core::{Connector, Key};

/// Work the session performs later.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Re-render after the container settled on a new size.
    ResizeRender,
    /// Remove a node, looked up again by key when the task fires.
    DeleteNode { key: Key },
    /// Remove a connector, looked up again by its endpoints when the task
    /// fires.
    DeleteConnector { connector: Connector },
}

impl Task {
    fn same_kind(&self, other: &Task) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

#[derive(Debug, Default)]
pub struct TaskQueue {
    pending: Vec<(f64, Task)>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` at `due_ms`.
    pub fn schedule(&mut self, task: Task, due_ms: f64) {
        self.pending.push((due_ms, task));
    }

    /// Run `task` at `due_ms`, replacing any pending task of the same kind.
    pub fn debounce(&mut self, task: Task, due_ms: f64) {
        self.pending.retain(|(_, t)| !t.same_kind(&task));
        self.pending.push((due_ms, task));
    }

    /// Remove and return every task due at or before `now_ms`, earliest first.
    pub fn take_due(&mut self, now_ms: f64) -> Vec<Task> {
        let (mut due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|(at, _)| *at <= now_ms);
        self.pending = rest;
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        due.into_iter().map(|(_, t)| t).collect()
    }

    pub fn next_due(&self) -> Option<f64> {
        self.pending.iter().map(|(at, _)| *at).min_by(f64::total_cmp)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn debounce_keeps_newest() {
        let mut q = TaskQueue::new();
        q.debounce(Task::ResizeRender, 300.0);
        q.debounce(Task::ResizeRender, 350.0);
        q.debounce(Task::ResizeRender, 420.0);
        assert_eq!(q.len(), 1);
        assert!(q.take_due(400.0).is_empty());
        assert_eq!(q.take_due(420.0), vec![Task::ResizeRender]);
        assert!(q.is_empty());
    }

    #[test]
    fn due_tasks_come_out_in_time_order() {
        let mut q = TaskQueue::new();
        let (a, b) = (Key::intern("tq_a"), Key::intern("tq_b"));
        q.schedule(Task::DeleteNode { key: b }, 200.0);
        q.schedule(Task::DeleteNode { key: a }, 100.0);
        q.debounce(Task::ResizeRender, 500.0);
        assert_eq!(q.next_due(), Some(100.0));
        assert_eq!(
            q.take_due(250.0),
            vec![Task::DeleteNode { key: a }, Task::DeleteNode { key: b }]
        );
        assert_eq!(q.next_due(), Some(500.0));
    }
}
