//! Ledger notifications logged through tracing.

use engine::{LedgerEvent, LedgerNotifier};

/// Logs ledger updates; budgets at or past their allocation are warnings.
#[derive(Debug)]
pub struct TracingNotifier;

impl LedgerNotifier for TracingNotifier {
    fn ledger_updated(&self, event: &LedgerEvent) {
        match event {
            LedgerEvent::BudgetCharged {
                budget_id,
                user_id,
                spent_minor,
                allocated_minor,
            } => {
                if spent_minor >= allocated_minor {
                    tracing::warn!(
                        "budget {budget_id} of {user_id} over allocation: {spent_minor}/{allocated_minor}"
                    );
                } else {
                    tracing::info!(
                        "budget {budget_id} of {user_id} at {spent_minor}/{allocated_minor}"
                    );
                }
            }
            LedgerEvent::GoalFunded {
                goal_id,
                user_id,
                current_minor,
                target_minor,
            } => {
                tracing::info!(
                    "goal {goal_id} of {user_id} at {current_minor}/{target_minor}"
                );
            }
        }
    }
}
