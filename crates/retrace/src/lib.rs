#![forbid(unsafe_code)]

//! Scoped undo/redo transaction engine.
//!
//! `retrace` groups reversible edits into nameable, nestable logical
//! transactions and guarantees that undo/redo always operates on whole
//! logical units, not arbitrary sub-steps. It is the history core a host
//! editor builds on: UI input handlers open a scope around a gesture, push
//! one [`ReversibleEdit`] per atomic step, and close the scope; a
//! modification indicator subscribes to the change notification.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         UndoHistory                          │
//! │  ┌────────────────┐                    ┌────────────────┐    │
//! │  │   Undo list    │       undo()       │   Redo list    │    │
//! │  │ [close, b, a,  │  ────────────────► │ [close, a', b',│    │
//! │  │  open]         │  ◄──────────────── │  open]         │    │
//! │  └────────────────┘       redo()       └────────────────┘    │
//! │          ▲                                     ▲             │
//! │          └────────── reentrant push ───────────┘             │
//! │  ScopeStack: currently open transactions (name + editing)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Replay is reentrant by design: an edit invoked during `undo()` calls
//! [`UndoHistory::push`] to record its own inverse, which lands on the
//! redo list because an undo pass is in progress. The mirrored history is
//! constructed by the traversal itself, never copied.
//!
//! # Quick start
//!
//! ```
//! use retrace::{EditResult, UndoHistory};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! # fn main() -> EditResult {
//! let mut history = UndoHistory::default();
//! let value = Rc::new(Cell::new(0));
//!
//! // Mutate, then record the inverse. A production edit would also
//! // re-record its own inverse inside the closure to keep redo alive.
//! value.set(1);
//! let undo_value = value.clone();
//! history.push_named("set to 1", move |_: &mut UndoHistory| -> EditResult {
//!     undo_value.set(0);
//!     Ok(())
//! });
//!
//! history.undo()?;
//! assert_eq!(value.get(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! The engine is single-threaded and intentionally reentrant: one
//! instance per document/session, all calls serialized by the caller.
//! [`ReversibleEdit`] is deliberately not `Send`/`Sync`.

pub mod edit;
pub mod history;
pub mod notify;
mod record;
pub mod transaction;

pub use edit::{EditError, EditResult, ReversibleEdit};
pub use history::{DEFAULT_LIMIT, UndoHistory};
pub use notify::ListenerId;
pub use transaction::Transaction;
