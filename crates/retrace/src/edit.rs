#![forbid(unsafe_code)]

//! Reversible edit capability.
//!
//! A [`ReversibleEdit`] is a single-use inverse operation supplied by the
//! host: it captures whatever before/after state it needs at the call site
//! and, when invoked, restores that state. The engine never computes diffs
//! itself; it only sequences and replays what callers hand it.
//!
//! # Invariants
//!
//! 1. An edit is consumed exactly once: `apply` takes `self: Box<Self>`,
//!    so a replayed edit cannot be re-invoked or duplicated.
//! 2. During `apply`, the edit may call back into the engine (`push`,
//!    `begin_scope`, `end_scope`); this reentrancy is how the mirrored
//!    history is constructed, not an incidental hazard.
//! 3. Edits are `'static` but deliberately not `Send`/`Sync`: the engine
//!    is confined to a single logical thread of control, one engine per
//!    document.

use std::fmt;

use crate::history::UndoHistory;

/// Result of invoking a reversible edit.
pub type EditResult = Result<(), EditError>;

/// Errors raised by host-supplied edits during replay.
///
/// The engine itself never fabricates these; it only propagates them out
/// of [`UndoHistory::undo`]/[`UndoHistory::redo`] to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The document is no longer in the state the edit was captured
    /// against (e.g. an external mutation bypassed the history).
    InvalidState(String),
    /// Generic failure with a message.
    Other(String),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState(msg) => write!(f, "invalid state: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EditError {}

/// A single-use reversible operation.
///
/// Implemented per call site, usually as a closure. Invoking the edit
/// consumes it; to keep the history bidirectional, an edit re-records its
/// own inverse by calling [`UndoHistory::push`] on the engine it is handed.
pub trait ReversibleEdit: 'static {
    /// Invoke the edit, consuming it.
    fn apply(self: Box<Self>, history: &mut UndoHistory) -> EditResult;
}

impl<F> ReversibleEdit for F
where
    F: FnOnce(&mut UndoHistory) -> EditResult + 'static,
{
    fn apply(self: Box<Self>, history: &mut UndoHistory) -> EditResult {
        (*self)(history)
    }
}
