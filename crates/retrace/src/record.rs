#![forbid(unsafe_code)]

//! History records and the bounded record list.
//!
//! A [`HistoryRecord`] is one entry in a history list: either a reversible
//! edit or a scope marker, never both. [`RecordList`] is the bounded,
//! most-recent-first sequence both history lists are built from.
//!
//! # Invariants
//!
//! 1. A record is exclusively owned by whichever list holds it.
//! 2. `RecordList` never holds more than the limit passed to
//!    [`push_head`](RecordList::push_head); the oldest (tail) entry is
//!    evicted silently when the bound is exceeded.

use std::collections::VecDeque;
use std::fmt;

use crate::edit::ReversibleEdit;

/// Payload of a history record: exactly one of an edit or a scope marker.
pub(crate) enum RecordPayload {
    /// A reversible edit, consumed when replayed.
    Edit(Box<dyn ReversibleEdit>),
    /// Marks the start of a logical transaction.
    ScopeOpen,
    /// Marks the end of a logical transaction.
    ScopeClose,
}

impl RecordPayload {
    fn kind(&self) -> &'static str {
        match self {
            Self::Edit(_) => "edit",
            Self::ScopeOpen => "scope_open",
            Self::ScopeClose => "scope_close",
        }
    }
}

/// One entry in a history list.
pub(crate) struct HistoryRecord {
    /// Display name for undo/redo menus, if the caller supplied one.
    pub(crate) name: Option<String>,
    /// Whether this record counts as a user-visible edit. Governs both
    /// change notifications and where an undo/redo pass stops.
    pub(crate) is_editing: bool,
    pub(crate) payload: RecordPayload,
}

impl HistoryRecord {
    pub(crate) fn edit(
        name: Option<String>,
        is_editing: bool,
        edit: Box<dyn ReversibleEdit>,
    ) -> Self {
        Self {
            name,
            is_editing,
            payload: RecordPayload::Edit(edit),
        }
    }

    pub(crate) fn scope_open(name: Option<String>, is_editing: bool) -> Self {
        Self {
            name,
            is_editing,
            payload: RecordPayload::ScopeOpen,
        }
    }

    pub(crate) fn scope_close(name: Option<String>, is_editing: bool) -> Self {
        Self {
            name,
            is_editing,
            payload: RecordPayload::ScopeClose,
        }
    }

    pub(crate) fn is_scope_open(&self) -> bool {
        matches!(self.payload, RecordPayload::ScopeOpen)
    }
}

impl fmt::Debug for HistoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryRecord")
            .field("kind", &self.payload.kind())
            .field("name", &self.name)
            .field("is_editing", &self.is_editing)
            .finish()
    }
}

/// Bounded, most-recent-first record sequence.
///
/// The head is the most recent record; insertion and removal happen at the
/// head, eviction at the tail.
pub(crate) struct RecordList {
    records: VecDeque<HistoryRecord>,
}

impl RecordList {
    pub(crate) fn new() -> Self {
        Self {
            records: VecDeque::new(),
        }
    }

    /// Insert at the head, then evict from the tail until within `limit`.
    pub(crate) fn push_head(&mut self, record: HistoryRecord, limit: usize) {
        self.records.push_front(record);
        self.truncate(limit);
    }

    pub(crate) fn pop_head(&mut self) -> Option<HistoryRecord> {
        self.records.pop_front()
    }

    pub(crate) fn head(&self) -> Option<&HistoryRecord> {
        self.records.front()
    }

    /// Evict oldest entries until the list holds at most `limit` records.
    pub(crate) fn truncate(&mut self, limit: usize) {
        while self.records.len() > limit {
            self.records.pop_back();
        }
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Debug for RecordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordList")
            .field("len", &self.records.len())
            .finish()
    }
}
