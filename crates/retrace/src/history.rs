#![forbid(unsafe_code)]

//! The scoped undo/redo engine.
//!
//! [`UndoHistory`] maintains two bounded, most-recent-first record lists
//! plus a stack of currently open scopes. Edits pushed between
//! [`begin_scope`](UndoHistory::begin_scope) and
//! [`end_scope`](UndoHistory::end_scope) form one logical unit: a single
//! [`undo`](UndoHistory::undo) reverts the whole unit, never a sub-step.
//!
//! # Architecture
//!
//! ```text
//! push(a); begin_scope("X"); push(b); push(c); end_scope("X")
//! ┌─────────────────────────────────────────────────────────┐
//! │ Undo list (head first): [close X, c, b, open X, a]      │
//! │ Redo list:              []                               │
//! └─────────────────────────────────────────────────────────┘
//!
//! undo()  (one call consumes the whole scope)
//! ┌─────────────────────────────────────────────────────────┐
//! │ Undo list: [a]                                           │
//! │ Redo list: [close X, c', b', open X]                     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The redo-side records (`b'`, `c'`) are not copies: they are fresh
//! inverses recorded by the replayed edits themselves, which call back
//! into [`push`](UndoHistory::push) while the undo pass is draining the
//! other list.
//!
//! # Invariants
//!
//! 1. At most one replay direction is active at a time (single [`Replay`]
//!    flag), and it is `Idle` between calls, restored by a drop guard on
//!    every exit path, including a failing edit.
//! 2. Pushing a new edit outside of replay clears the redo list.
//! 3. Neither list ever exceeds `limit` entries; the oldest records are
//!    evicted silently.
//! 4. An empty scope (begin immediately followed by end) leaves no trace
//!    in history.
//! 5. The engine-wide editing state is true iff no currently open scope
//!    was opened with `is_editing = false`; it gates change notifications,
//!    not replay correctness.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::edit::{EditResult, ReversibleEdit};
use crate::notify::{ChangeListeners, ListenerId};
use crate::record::{HistoryRecord, RecordList, RecordPayload};
use crate::transaction::Transaction;

/// Default maximum number of records retained per history list.
pub const DEFAULT_LIMIT: usize = 1024;

/// Which replay, if any, is currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Replay {
    #[default]
    Idle,
    Undoing,
    Redoing,
}

/// A currently open scope descriptor. Reflects only "currently open",
/// not history.
struct ScopeFrame {
    name: Option<String>,
    is_editing: bool,
}

/// Scoped undo/redo transaction engine.
///
/// One instance per document/session; the engine is single-threaded and
/// intentionally reentrant: replayed edits may call back into it while a
/// pass is in progress.
pub struct UndoHistory {
    undo_list: RecordList,
    redo_list: RecordList,
    scopes: Vec<ScopeFrame>,
    replay: Replay,
    limit: usize,
    listeners: ChangeListeners,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl fmt::Debug for UndoHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoHistory")
            .field("undo_len", &self.undo_list.len())
            .field("redo_len", &self.redo_list.len())
            .field("scope_depth", &self.scopes.len())
            .field("replay", &self.replay)
            .field("limit", &self.limit)
            .finish()
    }
}

impl UndoHistory {
    /// Create an engine retaining at most `limit` records per list.
    #[must_use]
    pub fn new(limit: usize) -> Self {
        Self {
            undo_list: RecordList::new(),
            redo_list: RecordList::new(),
            scopes: Vec::new(),
            replay: Replay::Idle,
            limit,
            listeners: ChangeListeners::new(),
        }
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Record one reversible edit.
    ///
    /// Outside of replay this clears the redo list: a genuinely new edit
    /// invalidates previously available redo steps. During an undo pass
    /// the record lands on the redo list instead; during a redo pass it
    /// lands on the undo list (redoing an edit must itself produce a fresh
    /// undo counterpart).
    pub fn push(&mut self, edit: impl ReversibleEdit) {
        self.push_record(None, Box::new(edit));
    }

    /// Record one reversible edit with a display name for undo/redo menus.
    pub fn push_named(&mut self, name: impl Into<String>, edit: impl ReversibleEdit) {
        self.push_record(Some(name.into()), Box::new(edit));
    }

    /// Object-safe form of [`push`](Self::push) for pre-boxed edits.
    pub fn push_boxed(&mut self, name: Option<String>, edit: Box<dyn ReversibleEdit>) {
        self.push_record(name, edit);
    }

    fn push_record(&mut self, name: Option<String>, edit: Box<dyn ReversibleEdit>) {
        if self.replay == Replay::Idle {
            // Clear redo list (new branch).
            self.redo_list.clear();
        }
        let is_editing = self.is_editing();
        tracing::trace!(
            name = name.as_deref().unwrap_or(""),
            editing = is_editing,
            replay = ?self.replay,
            "push edit"
        );
        self.push_active(HistoryRecord::edit(name, is_editing, edit));
        if is_editing {
            self.listeners.notify();
        }
    }

    /// Open a logical transaction counted as a user-visible edit.
    pub fn begin_scope(&mut self, name: impl Into<String>) {
        self.begin_scope_with(Some(name.into()), true);
    }

    /// Open a logical transaction, choosing the editing flag explicitly.
    ///
    /// A scope opened with `is_editing = false` suppresses change
    /// notifications for everything pushed inside it, and its records
    /// never terminate an undo/redo pass on their own; they ride along
    /// with the adjacent user-visible unit.
    pub fn begin_scope_with(&mut self, name: Option<String>, is_editing: bool) {
        self.scopes.push(ScopeFrame {
            name: name.clone(),
            is_editing,
        });
        self.push_active(HistoryRecord::scope_open(name, is_editing));
    }

    /// Close the innermost open transaction.
    pub fn end_scope(&mut self, name: impl Into<String>) {
        self.end_scope_with(Some(name.into()), true);
    }

    /// Close the innermost open transaction, choosing the editing flag
    /// explicitly.
    ///
    /// An `end_scope` with no open scope is dropped with a warning rather
    /// than treated as a protocol error.
    pub fn end_scope_with(&mut self, name: Option<String>, is_editing: bool) {
        if self.scopes.pop().is_none() {
            tracing::warn!(
                scope = name.as_deref().unwrap_or(""),
                "end_scope without a matching begin_scope"
            );
            return;
        }
        if self.active_head_is_scope_open() {
            // Nothing was recorded inside the scope: remove the open
            // marker so the empty scope is invisible to history.
            self.pop_active_head();
            return;
        }
        self.push_active(HistoryRecord::scope_close(name, is_editing));
    }

    /// Open a scope guarded by RAII: the returned [`Transaction`] closes
    /// it when dropped, on every exit path.
    pub fn transaction(&mut self, name: impl Into<String>) -> Transaction<'_> {
        Transaction::begin(self, Some(name.into()), true)
    }

    /// RAII scope with an explicit editing flag.
    pub fn transaction_with(&mut self, name: Option<String>, is_editing: bool) -> Transaction<'_> {
        Transaction::begin(self, name, is_editing)
    }

    // ========================================================================
    // Replay
    // ========================================================================

    /// Revert exactly one complete logical unit.
    ///
    /// No-op if the undo list is empty. A failing edit propagates its
    /// error; the replay flag is still reset and the remaining records
    /// stay queued, so the engine stays usable.
    pub fn undo(&mut self) -> EditResult {
        if self.undo_list.is_empty() {
            return Ok(());
        }
        tracing::debug!(records = self.undo_list.len(), "undo");
        let mut guard = ReplayGuard::enter(self, Replay::Undoing);
        guard.drain_one_unit()
    }

    /// Re-apply exactly one complete logical unit.
    ///
    /// Structural mirror of [`undo`](Self::undo) over the redo list.
    pub fn redo(&mut self) -> EditResult {
        if self.redo_list.is_empty() {
            return Ok(());
        }
        tracing::debug!(records = self.redo_list.len(), "redo");
        let mut guard = ReplayGuard::enter(self, Replay::Redoing);
        guard.drain_one_unit()
    }

    /// Consume records from the drained list until one logical unit has
    /// been replayed.
    ///
    /// `level` tracks scope nesting: a close marker at level 0 opens the
    /// mirrored scope on the opposite list, an open marker returning the
    /// level to 0 closes it. The pass stops once the level is back at (or
    /// below) 0 and the last record handled was a user-visible edit.
    fn drain_one_unit(&mut self) -> EditResult {
        let mut level: i32 = 0;
        while let Some(record) = self.pop_drained() {
            let HistoryRecord {
                name,
                is_editing,
                payload,
            } = record;
            match payload {
                RecordPayload::ScopeClose => {
                    if level == 0 {
                        self.begin_scope_with(name, is_editing);
                    }
                    level += 1;
                }
                RecordPayload::Edit(edit) => edit.apply(self)?,
                RecordPayload::ScopeOpen => {
                    level -= 1;
                    if level == 0 {
                        self.end_scope_with(name, is_editing);
                    }
                }
            }
            if level <= 0 && is_editing {
                break;
            }
        }
        Ok(())
    }

    /// Head of the list currently being drained by a replay pass.
    fn pop_drained(&mut self) -> Option<HistoryRecord> {
        match self.replay {
            Replay::Undoing => self.undo_list.pop_head(),
            Replay::Redoing => self.redo_list.pop_head(),
            Replay::Idle => None,
        }
    }

    /// Append to the *active* list: the redo list while an undo pass is
    /// draining the undo list, otherwise the undo list.
    fn push_active(&mut self, record: HistoryRecord) {
        let limit = self.limit;
        match self.replay {
            Replay::Undoing => self.redo_list.push_head(record, limit),
            Replay::Redoing | Replay::Idle => self.undo_list.push_head(record, limit),
        }
    }

    fn active_head_is_scope_open(&self) -> bool {
        let head = match self.replay {
            Replay::Undoing => self.redo_list.head(),
            Replay::Redoing | Replay::Idle => self.undo_list.head(),
        };
        head.is_some_and(HistoryRecord::is_scope_open)
    }

    fn pop_active_head(&mut self) -> Option<HistoryRecord> {
        match self.replay {
            Replay::Undoing => self.redo_list.pop_head(),
            Replay::Redoing | Replay::Idle => self.undo_list.pop_head(),
        }
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Discard all history and reset the scope stack (e.g. on document
    /// load).
    pub fn clear(&mut self) {
        self.undo_list.clear();
        self.redo_list.clear();
        self.scopes.clear();
        tracing::debug!("history cleared");
    }

    /// Maximum retained records per list.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Change the retention limit, re-enforcing it immediately on both
    /// lists.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit;
        self.undo_list.truncate(limit);
        self.redo_list.truncate(limit);
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Whether the current nesting context counts as a user-visible edit:
    /// true iff no currently open scope was opened with
    /// `is_editing = false`.
    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.scopes.iter().all(|frame| frame.is_editing)
    }

    /// Whether an undo or redo pass is currently in progress.
    #[must_use]
    pub fn is_replaying(&self) -> bool {
        self.replay != Replay::Idle
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_list.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_list.is_empty()
    }

    /// Number of records (not logical units) on the undo list.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo_list.len()
    }

    /// Number of records (not logical units) on the redo list.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo_list.len()
    }

    /// Number of currently open scopes.
    #[must_use]
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// Name of the innermost open scope, if it has one.
    #[must_use]
    pub fn current_scope_name(&self) -> Option<&str> {
        self.scopes.last().and_then(|frame| frame.name.as_deref())
    }

    /// Display name of the next unit [`undo`](Self::undo) would revert.
    #[must_use]
    pub fn next_undo_description(&self) -> Option<&str> {
        self.undo_list.head().and_then(|record| record.name.as_deref())
    }

    /// Display name of the next unit [`redo`](Self::redo) would re-apply.
    #[must_use]
    pub fn next_redo_description(&self) -> Option<&str> {
        self.redo_list.head().and_then(|record| record.name.as_deref())
    }

    // ========================================================================
    // Change notification
    // ========================================================================

    /// Register a listener for the payload-free "history changed" signal.
    pub fn subscribe(&mut self, listener: impl FnMut() + 'static) -> ListenerId {
        self.listeners.subscribe(Box::new(listener))
    }

    /// Remove a listener. Returns `false` if the token was unknown.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Fire the change signal manually, for callers that mutate state
    /// outside the push path.
    pub fn notify_changed(&mut self) {
        self.listeners.notify();
    }
}

/// Sets the replay flag on entry and restores `Idle` on drop, so a
/// failing or panicking edit never leaves the engine stuck mid-replay.
struct ReplayGuard<'a> {
    history: &'a mut UndoHistory,
}

impl<'a> ReplayGuard<'a> {
    fn enter(history: &'a mut UndoHistory, replay: Replay) -> Self {
        history.replay = replay;
        Self { history }
    }
}

impl Deref for ReplayGuard<'_> {
    type Target = UndoHistory;

    fn deref(&self) -> &UndoHistory {
        self.history
    }
}

impl DerefMut for ReplayGuard<'_> {
    fn deref_mut(&mut self) -> &mut UndoHistory {
        self.history
    }
}

impl Drop for ReplayGuard<'_> {
    fn drop(&mut self) {
        self.history.replay = Replay::Idle;
    }
}

// ============================================================================
// Tests
// ============================================================================
