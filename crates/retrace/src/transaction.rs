#![forbid(unsafe_code)]

//! RAII scope guard.
//!
//! A scope must be closed on every exit path, including early returns
//! and panics, or the history is left mid-transaction. [`Transaction`]
//! encodes that discipline in the type system: it opens the scope on
//! construction and closes it on drop, and derefs to the engine so edits
//! can be recorded through it.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::history::UndoHistory;

/// An open logical transaction, closed when dropped.
///
/// Obtained from [`UndoHistory::transaction`] or
/// [`UndoHistory::transaction_with`].
///
/// ```
/// use retrace::{EditResult, UndoHistory};
///
/// let mut history = UndoHistory::default();
/// {
///     let mut tx = history.transaction("insert row");
///     tx.push(|_: &mut UndoHistory| -> EditResult { Ok(()) });
///     tx.commit();
/// }
/// assert_eq!(history.next_undo_description(), Some("insert row"));
/// ```
pub struct Transaction<'a> {
    history: &'a mut UndoHistory,
    name: Option<String>,
    is_editing: bool,
}

impl<'a> Transaction<'a> {
    pub(crate) fn begin(
        history: &'a mut UndoHistory,
        name: Option<String>,
        is_editing: bool,
    ) -> Self {
        history.begin_scope_with(name.clone(), is_editing);
        Self {
            history,
            name,
            is_editing,
        }
    }

    /// Close the transaction.
    ///
    /// Equivalent to dropping the guard (there is no rollback); the method
    /// exists so call sites can mark the intended end of the scope.
    pub fn commit(self) {}
}

impl Deref for Transaction<'_> {
    type Target = UndoHistory;

    fn deref(&self) -> &UndoHistory {
        self.history
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut UndoHistory {
        self.history
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        self.history.end_scope_with(self.name.take(), self.is_editing);
    }
}

impl fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("name", &self.name)
            .field("is_editing", &self.is_editing)
            .finish()
    }
}
