use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a task.
///
/// The daily sweep flips `completed` back to `pending` on a recurring
/// task's next occurrence day.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

pub mod task {
    use super::*;

    /// Step of a recurrence pattern, anchored at the task's creation day.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RecurrenceKind {
        Daily,
        Weekly,
        Monthly,
        Yearly,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaskNew {
        pub title: String,
        pub notes: Option<String>,
        pub due_date: Option<NaiveDate>,
        /// Must be paired with `recurring_until`; a task with only one of
        /// the two is rejected.
        pub recurrence_type: Option<RecurrenceKind>,
        pub recurring_until: Option<NaiveDate>,
        /// Initial subtask titles, created together with the task.
        #[serde(default)]
        pub subtasks: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaskUpdate {
        pub title: Option<String>,
        pub notes: Option<String>,
        pub due_date: Option<NaiveDate>,
        /// Must be paired with `recurring_until`; a patch with only one of
        /// the two is rejected.
        pub recurrence_type: Option<RecurrenceKind>,
        pub recurring_until: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaskComplete {
        /// Optional: if absent, server uses now().
        pub completed_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaskCreated {
        pub id: Uuid,
    }

    /// Query parameters for listing tasks.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaskList {
        pub status: Option<TaskStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaskView {
        pub id: Uuid,
        pub title: String,
        pub notes: Option<String>,
        pub status: TaskStatus,
        pub due_date: Option<NaiveDate>,
        pub completed_at: Option<DateTime<Utc>>,
        pub recurrence_type: Option<RecurrenceKind>,
        pub recurring_until: Option<NaiveDate>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TaskListResponse {
        pub tasks: Vec<TaskView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubtaskView {
        pub id: Uuid,
        pub title: String,
        pub is_completed: bool,
        pub completed_at: Option<DateTime<Utc>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubtasksResponse {
        pub subtasks: Vec<SubtaskView>,
    }

    /// Request body for checking or unchecking a subtask.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubtaskToggle {
        pub is_completed: bool,
    }
}

pub mod calendar {
    use super::*;

    /// Query parameters for the calendar expansion, both days inclusive.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CalendarRange {
        pub start: NaiveDate,
        pub end: NaiveDate,
    }

    /// One scheduled instance of a task on a specific day.
    ///
    /// Projected on read; occurrences have no backing row of their own.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OccurrenceView {
        pub task_id: Uuid,
        pub title: String,
        pub notes: Option<String>,
        pub status: TaskStatus,
        pub date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CalendarResponse {
        pub occurrences: Vec<OccurrenceView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
        Savings,
        Loan,
        Transfer,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        /// Minor units (cents), must be > 0. The kind defines the direction.
        pub amount_minor: i64,
        /// Calendar day in the user's local time; budgets match on it.
        pub occurred_at: NaiveDate,
        pub note: Option<String>,
        pub category_id: Option<Uuid>,
        /// Pins an expense to this budget, bypassing the matching rule.
        pub budget_id: Option<Uuid>,
        /// Directs a savings transaction into this goal.
        pub goal_id: Option<Uuid>,
        /// Optional idempotency key for safely retrying the same create request.
        pub idempotency_key: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub kind: Option<TransactionKind>,
        pub amount_minor: Option<i64>,
        pub occurred_at: Option<NaiveDate>,
        pub note: Option<String>,
        pub category_id: Option<Uuid>,
        pub budget_id: Option<Uuid>,
        pub goal_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: Uuid,
    }

    /// Query parameters for listing transactions, newest first.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionList {
        pub limit: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub occurred_at: NaiveDate,
        pub note: Option<String>,
        pub category_id: Option<Uuid>,
        pub budget_id: Option<Uuid>,
        pub goal_id: Option<Uuid>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        /// Display name. Uniqueness is checked on the case-folded form, so
        /// "Café" and "CAFÉ" collide.
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub archived: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryListResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub name: String,
        /// Allocated amount in minor units, must be > 0.
        pub amount_minor: i64,
        /// Restricts matching to expenses in this category; absent means
        /// the budget matches any category.
        pub category_id: Option<Uuid>,
        pub starts_on: Option<NaiveDate>,
        pub ends_on: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetCreated {
        pub id: Uuid,
    }

    /// Query parameters for listing budgets.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetList {
        pub include_archived: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub name: String,
        pub amount_minor: i64,
        /// Running total of matched expenses, floored at zero.
        pub current_spent_minor: i64,
        pub category_id: Option<Uuid>,
        pub starts_on: Option<NaiveDate>,
        pub ends_on: Option<NaiveDate>,
        pub archived: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub budgets: Vec<BudgetView>,
    }
}

pub mod goal {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: String,
        /// Target amount in minor units, must be > 0.
        pub target_amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        pub target_amount_minor: i64,
        /// Running total of linked savings, floored at zero.
        pub current_amount_minor: i64,
        pub archived: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalListResponse {
        pub goals: Vec<GoalView>,
    }
}
