//! Side-channel notification hook for ledger mutations.
//!
//! The engine calls the installed [`LedgerNotifier`] after a ledger-affecting
//! create or update has committed. The hook is fire-and-forget: it returns
//! nothing, runs outside the DB transaction and can never roll the mutation
//! back.

use std::fmt;

use uuid::Uuid;

/// Snapshot of a budget or goal total after a committed ledger mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    BudgetCharged {
        budget_id: Uuid,
        user_id: String,
        spent_minor: i64,
        allocated_minor: i64,
    },
    GoalFunded {
        goal_id: Uuid,
        user_id: String,
        current_minor: i64,
        target_minor: i64,
    },
}

pub trait LedgerNotifier: Send + Sync + fmt::Debug {
    fn ledger_updated(&self, event: &LedgerEvent);
}

/// Default notifier: drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

impl LedgerNotifier for NoopNotifier {
    fn ledger_updated(&self, _event: &LedgerEvent) {}
}
