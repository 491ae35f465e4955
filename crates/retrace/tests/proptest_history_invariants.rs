//! Property-based invariant tests for the undo/redo engine.
//!
//! These verify structural invariants over arbitrary operation sequences:
//!
//! 1. Neither history list ever exceeds the configured limit
//! 2. The replay flag is idle between calls
//! 3. No panics on arbitrary operation sequences (including unbalanced
//!    scopes)
//! 4. Unscoped round-trip: undo-all restores the origin, redo-all the
//!    final state
//! 5. Scoped round-trip: one undo per non-empty scope
//! 6. A divergent push always invalidates redo

use proptest::prelude::*;
use retrace::{EditResult, UndoHistory};
use std::cell::Cell;
use std::rc::Rc;

// ── Strategies ──────────────────────────────────────────────────────────

/// Operations a host can issue against the engine.
#[derive(Debug, Clone)]
enum Op {
    Push(i8),
    BeginScope(bool),
    EndScope,
    Undo,
    Redo,
    Clear,
    SetLimit(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i8>().prop_map(Op::Push),
        any::<bool>().prop_map(Op::BeginScope),
        Just(Op::EndScope),
        Just(Op::Undo),
        Just(Op::Redo),
        Just(Op::Clear),
        (1usize..64).prop_map(Op::SetLimit),
    ]
}

// ── Accumulator document ────────────────────────────────────────────────

/// Apply "add `delta`" to the accumulator and record its inverse.
fn record_add(history: &mut UndoHistory, total: &Rc<Cell<i64>>, delta: i64) {
    total.set(total.get() + delta);
    push_sub(history, total.clone(), delta);
}

fn push_sub(history: &mut UndoHistory, total: Rc<Cell<i64>>, delta: i64) {
    history.push(move |h: &mut UndoHistory| -> EditResult {
        total.set(total.get() - delta);
        push_add(h, total.clone(), delta);
        Ok(())
    });
}

fn push_add(history: &mut UndoHistory, total: Rc<Cell<i64>>, delta: i64) {
    history.push(move |h: &mut UndoHistory| -> EditResult {
        total.set(total.get() + delta);
        push_sub(h, total.clone(), delta);
        Ok(())
    });
}

// ═══════════════════════════════════════════════════════════════════════
// Structural invariants under arbitrary operation sequences
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arbitrary_ops_respect_bounds_and_reset_replay(
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let mut history = UndoHistory::default();
        let total = Rc::new(Cell::new(0i64));

        for op in &ops {
            match op {
                Op::Push(delta) => record_add(&mut history, &total, i64::from(*delta)),
                Op::BeginScope(editing) => {
                    history.begin_scope_with(Some("scope".into()), *editing);
                }
                Op::EndScope => history.end_scope_with(Some("scope".into()), true),
                Op::Undo => prop_assert!(history.undo().is_ok()),
                Op::Redo => prop_assert!(history.redo().is_ok()),
                Op::Clear => history.clear(),
                Op::SetLimit(limit) => history.set_limit(*limit),
            }

            prop_assert!(history.undo_len() <= history.limit());
            prop_assert!(history.redo_len() <= history.limit());
            prop_assert!(!history.is_replaying());
        }
    }

    #[test]
    fn unscoped_round_trip(values in prop::collection::vec(any::<i8>(), 1..64)) {
        let mut history = UndoHistory::default();
        let total = Rc::new(Cell::new(0i64));
        let sum: i64 = values.iter().map(|v| i64::from(*v)).sum();

        for value in &values {
            record_add(&mut history, &total, i64::from(*value));
        }
        prop_assert_eq!(total.get(), sum);

        for _ in 0..values.len() {
            history.undo().unwrap();
        }
        prop_assert_eq!(total.get(), 0);
        prop_assert!(!history.can_undo());

        for _ in 0..values.len() {
            history.redo().unwrap();
        }
        prop_assert_eq!(total.get(), sum);
        prop_assert!(!history.can_redo());
    }

    #[test]
    fn scoped_round_trip(
        chunks in prop::collection::vec(prop::collection::vec(any::<i8>(), 0..5), 1..10),
    ) {
        let mut history = UndoHistory::default();
        let total = Rc::new(Cell::new(0i64));
        let sum: i64 = chunks
            .iter()
            .flatten()
            .map(|v| i64::from(*v))
            .sum();
        let units = chunks.iter().filter(|chunk| !chunk.is_empty()).count();

        for chunk in &chunks {
            history.begin_scope("chunk");
            for value in chunk {
                record_add(&mut history, &total, i64::from(*value));
            }
            history.end_scope("chunk");
        }

        // Empty chunks elide; every non-empty chunk is exactly one unit.
        for _ in 0..units {
            history.undo().unwrap();
        }
        prop_assert_eq!(total.get(), 0);
        prop_assert!(!history.can_undo());

        for _ in 0..units {
            history.redo().unwrap();
        }
        prop_assert_eq!(total.get(), sum);
        prop_assert!(!history.can_redo());
    }

    #[test]
    fn divergent_push_invalidates_redo(
        setup in prop::collection::vec(any::<i8>(), 1..16),
        divergent in any::<i8>(),
    ) {
        let mut history = UndoHistory::default();
        let total = Rc::new(Cell::new(0i64));

        for value in &setup {
            record_add(&mut history, &total, i64::from(*value));
        }
        history.undo().unwrap();
        prop_assert!(history.can_redo());

        record_add(&mut history, &total, i64::from(divergent));
        prop_assert!(!history.can_redo());
    }
}
