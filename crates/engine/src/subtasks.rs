//! Subtask rows attached to a task.
//!
//! Subtasks carry their own completion flag but follow the parent through
//! the recurrence reset: reopening a task reopens every subtask in the same
//! write.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: Uuid,
    pub task_id: Uuid,
    pub title: String,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Subtask {
    pub fn new(task_id: Uuid, title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            task_id,
            title,
            is_completed: false,
            completed_at: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subtasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub task_id: String,
    pub title: String,
    pub is_completed: bool,
    pub completed_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tasks::Entity",
        from = "Column::TaskId",
        to = "super::tasks::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Task,
}

impl Related<super::tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Task.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Subtask> for ActiveModel {
    fn from(subtask: &Subtask) -> Self {
        Self {
            id: ActiveValue::Set(subtask.id.to_string()),
            task_id: ActiveValue::Set(subtask.task_id.to_string()),
            title: ActiveValue::Set(subtask.title.clone()),
            is_completed: ActiveValue::Set(subtask.is_completed),
            completed_at: ActiveValue::Set(subtask.completed_at),
        }
    }
}

impl TryFrom<Model> for Subtask {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("subtask not exists".to_string()))?,
            task_id: Uuid::parse_str(&model.task_id)
                .map_err(|_| EngineError::KeyNotFound("task not exists".to_string()))?,
            title: model.title,
            is_completed: model.is_completed,
            completed_at: model.completed_at,
        })
    }
}
