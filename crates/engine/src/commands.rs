//! Command structs for engine operations.
//!
//! These types group parameters for write operations (task create/update,
//! transaction create/update, budget create), keeping call sites readable
//! and avoiding long argument lists.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{recurrence::RecurrenceRule, transactions::TransactionKind};

/// Create a task, optionally recurring and with initial subtasks.
#[derive(Clone, Debug)]
pub struct NewTaskCmd {
    pub user_id: String,
    pub title: String,
    pub notes: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub recurrence_type: Option<RecurrenceRule>,
    pub recurring_until: Option<NaiveDate>,
    pub subtasks: Vec<String>,
}

impl NewTaskCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            title: title.into(),
            notes: None,
            due_date: None,
            recurrence_type: None,
            recurring_until: None,
            subtasks: Vec::new(),
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn recurrence(mut self, rule: RecurrenceRule, until: NaiveDate) -> Self {
        self.recurrence_type = Some(rule);
        self.recurring_until = Some(until);
        self
    }

    #[must_use]
    pub fn subtask(mut self, title: impl Into<String>) -> Self {
        self.subtasks.push(title.into());
        self
    }
}

/// Update an existing task. `None` fields are kept as stored.
#[derive(Clone, Debug)]
pub struct UpdateTaskCmd {
    pub user_id: String,
    pub task_id: Uuid,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub recurrence_type: Option<RecurrenceRule>,
    pub recurring_until: Option<NaiveDate>,
}

impl UpdateTaskCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, task_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            task_id,
            title: None,
            notes: None,
            due_date: None,
            recurrence_type: None,
            recurring_until: None,
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn recurrence(mut self, rule: RecurrenceRule, until: NaiveDate) -> Self {
        self.recurrence_type = Some(rule);
        self.recurring_until = Some(until);
        self
    }
}

/// Create a transaction.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub occurred_at: NaiveDate,
    pub note: Option<String>,
    pub category_id: Option<Uuid>,
    pub budget_id: Option<Uuid>,
    pub goal_id: Option<Uuid>,
    pub idempotency_key: Option<String>,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        kind: TransactionKind,
        amount_minor: i64,
        occurred_at: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            amount_minor,
            occurred_at,
            note: None,
            category_id: None,
            budget_id: None,
            goal_id: None,
            idempotency_key: None,
        }
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn budget_id(mut self, budget_id: Uuid) -> Self {
        self.budget_id = Some(budget_id);
        self
    }

    #[must_use]
    pub fn goal_id(mut self, goal_id: Uuid) -> Self {
        self.goal_id = Some(goal_id);
        self
    }

    #[must_use]
    pub fn idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Update an existing transaction. `None` fields are kept as stored.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub user_id: String,
    pub transaction_id: Uuid,
    pub kind: Option<TransactionKind>,
    pub amount_minor: Option<i64>,
    pub occurred_at: Option<NaiveDate>,
    pub note: Option<String>,
    pub category_id: Option<Uuid>,
    pub budget_id: Option<Uuid>,
    pub goal_id: Option<Uuid>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, transaction_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            transaction_id,
            kind: None,
            amount_minor: None,
            occurred_at: None,
            note: None,
            category_id: None,
            budget_id: None,
            goal_id: None,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, occurred_at: NaiveDate) -> Self {
        self.occurred_at = Some(occurred_at);
        self
    }

    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn budget_id(mut self, budget_id: Uuid) -> Self {
        self.budget_id = Some(budget_id);
        self
    }

    #[must_use]
    pub fn goal_id(mut self, goal_id: Uuid) -> Self {
        self.goal_id = Some(goal_id);
        self
    }
}

/// Create a budget.
#[derive(Clone, Debug)]
pub struct NewBudgetCmd {
    pub user_id: String,
    pub name: String,
    pub amount_minor: i64,
    pub category_id: Option<Uuid>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
}

impl NewBudgetCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, amount_minor: i64) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            amount_minor,
            category_id: None,
            starts_on: None,
            ends_on: None,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn window(mut self, starts_on: NaiveDate, ends_on: NaiveDate) -> Self {
        self.starts_on = Some(starts_on);
        self.ends_on = Some(ends_on);
        self
    }

    #[must_use]
    pub fn starts_on(mut self, starts_on: NaiveDate) -> Self {
        self.starts_on = Some(starts_on);
        self
    }

    #[must_use]
    pub fn ends_on(mut self, ends_on: NaiveDate) -> Self {
        self.ends_on = Some(ends_on);
        self
    }
}
