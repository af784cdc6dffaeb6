//! Task primitives.
//!
//! A `Task` is a user-owned to-do item, optionally recurring. Recurring
//! tasks carry a rule and a horizon; completing one does not end it, the
//! daily sweep reopens it on the next occurrence day.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, recurrence::RecurrenceRule};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid task status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub notes: Option<String>,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub recurrence_type: Option<RecurrenceRule>,
    pub recurring_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        user_id: String,
        title: String,
        notes: Option<String>,
        due_date: Option<NaiveDate>,
        recurrence_type: Option<RecurrenceRule>,
        recurring_until: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            notes,
            status: TaskStatus::Pending,
            due_date,
            completed_at: None,
            recurrence_type,
            recurring_until,
            created_at: Utc::now(),
        }
    }

    /// Returns the rule and horizon iff the task is recurring.
    ///
    /// Both fields must be present: a rule without a horizon (or the other
    /// way round) behaves as a plain one-off task everywhere in the engine.
    pub fn recurrence(&self) -> Option<(RecurrenceRule, NaiveDate)> {
        Some((self.recurrence_type?, self.recurring_until?))
    }

    /// The day the recurrence pattern is anchored at.
    pub fn anchor_day(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    /// Tests whether the task shows up on `date`.
    ///
    /// Recurring tasks follow their pattern up to the horizon; one-off tasks
    /// show up on their due day only. Agrees with
    /// [`occurrences_in_range`](crate::occurrences_in_range) on any day the
    /// expansion can reach.
    pub fn visible_on(&self, date: NaiveDate) -> bool {
        match self.recurrence() {
            Some((rule, until)) => {
                crate::recurrence::is_visible_on(rule, self.anchor_day(), until, date)
            }
            None => self.due_date == Some(date),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub notes: Option<String>,
    pub status: String,
    pub due_date: Option<Date>,
    pub completed_at: Option<DateTimeUtc>,
    pub recurrence_type: Option<String>,
    pub recurring_until: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::subtasks::Entity")]
    Subtasks,
}

impl Related<super::subtasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subtasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Task> for ActiveModel {
    fn from(task: &Task) -> Self {
        Self {
            id: ActiveValue::Set(task.id.to_string()),
            user_id: ActiveValue::Set(task.user_id.clone()),
            title: ActiveValue::Set(task.title.clone()),
            notes: ActiveValue::Set(task.notes.clone()),
            status: ActiveValue::Set(task.status.as_str().to_string()),
            due_date: ActiveValue::Set(task.due_date),
            completed_at: ActiveValue::Set(task.completed_at),
            recurrence_type: ActiveValue::Set(
                task.recurrence_type.map(|r| r.as_str().to_string()),
            ),
            recurring_until: ActiveValue::Set(task.recurring_until),
            created_at: ActiveValue::Set(task.created_at),
        }
    }
}

impl TryFrom<Model> for Task {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("task not exists".to_string()))?,
            user_id: model.user_id,
            title: model.title,
            notes: model.notes,
            status: TaskStatus::try_from(model.status.as_str())?,
            due_date: model.due_date,
            completed_at: model.completed_at,
            // Lenient: unknown stored rules degrade to non-recurring.
            recurrence_type: model.recurrence_type.as_deref().and_then(RecurrenceRule::parse),
            recurring_until: model.recurring_until,
            created_at: model.created_at,
        })
    }
}
