#![forbid(unsafe_code)]

//! Change-notification registry.
//!
//! A payload-free "history changed" signal. The host's modification
//! indicator subscribes here; listeners are called synchronously, in
//! registration order, whenever an edit is recorded in an editing context
//! (or when a caller triggers [`UndoHistory::notify_changed`] manually).
//!
//! [`UndoHistory::notify_changed`]: crate::UndoHistory::notify_changed

use std::fmt;

/// Token identifying a registered change listener.
///
/// Returned by subscribe; pass it back to unsubscribe. Tokens are never
/// reused within one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Registry of change listeners.
pub(crate) struct ChangeListeners {
    entries: Vec<(ListenerId, Box<dyn FnMut()>)>,
    next_id: u64,
}

impl ChangeListeners {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn subscribe(&mut self, listener: Box<dyn FnMut()>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if the token was unknown.
    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self) {
        for (_, listener) in &mut self.entries {
            listener();
        }
    }
}

impl fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn notify_calls_all_listeners_in_order() {
        let order = Rc::new(Cell::new(0));
        let mut listeners = ChangeListeners::new();

        let first = order.clone();
        listeners.subscribe(Box::new(move || {
            assert_eq!(first.get(), 0);
            first.set(1);
        }));
        let second = order.clone();
        listeners.subscribe(Box::new(move || {
            assert_eq!(second.get(), 1);
            second.set(2);
        }));

        listeners.notify();
        assert_eq!(order.get(), 2);
    }

    #[test]
    fn unsubscribe_removes_only_the_target() {
        let count = Rc::new(Cell::new(0));
        let mut listeners = ChangeListeners::new();

        let a = count.clone();
        let id_a = listeners.subscribe(Box::new(move || a.set(a.get() + 1)));
        let b = count.clone();
        let _id_b = listeners.subscribe(Box::new(move || b.set(b.get() + 10)));

        assert!(listeners.unsubscribe(id_a));
        assert!(!listeners.unsubscribe(id_a), "token already removed");

        listeners.notify();
        assert_eq!(count.get(), 10);
    }

    #[test]
    fn tokens_are_not_reused() {
        let mut listeners = ChangeListeners::new();
        let id_a = listeners.subscribe(Box::new(|| {}));
        listeners.unsubscribe(id_a);
        let id_b = listeners.subscribe(Box::new(|| {}));
        assert_ne!(id_a, id_b);
    }
}
