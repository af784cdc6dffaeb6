pub use budgets::Budget;
pub use categories::Category;
pub use commands::{
    NewBudgetCmd, NewTaskCmd, NewTransactionCmd, UpdateTaskCmd, UpdateTransactionCmd,
};
pub use error::EngineError;
pub use goals::SavingsGoal;
pub use notify::{LedgerEvent, LedgerNotifier, NoopNotifier};
pub use occurrences::{OccurrencesInRange, TaskOccurrence, occurrences_in_range};
pub use ops::{Engine, EngineBuilder, SweepFailure, SweepReport};
pub use recurrence::{RecurrenceRule, is_visible_on, next_occurrence, should_reset};
pub use subtasks::Subtask;
pub use tasks::{Task, TaskStatus};
pub use transactions::{Transaction, TransactionKind};

mod budgets;
mod categories;
mod commands;
mod error;
mod goals;
mod notify;
mod occurrences;
mod ops;
mod recurrence;
mod subtasks;
mod tasks;
mod transactions;
mod users;
mod util;

pub type ResultEngine<T> = Result<T, EngineError>;
