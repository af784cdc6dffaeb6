use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, NewTaskCmd, ResultEngine, Subtask, Task, TaskStatus, UpdateTaskCmd, subtasks,
    tasks,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Creates a task together with its initial subtasks.
    pub async fn create_task(&self, cmd: NewTaskCmd) -> ResultEngine<Uuid> {
        let title = normalize_required_name(&cmd.title, "task")?;
        let notes = normalize_optional_text(cmd.notes.as_deref());
        let task = Task::new(
            cmd.user_id.clone(),
            title,
            notes,
            cmd.due_date,
            cmd.recurrence_type,
            cmd.recurring_until,
        );
        let mut subtask_rows = Vec::with_capacity(cmd.subtasks.len());
        for subtask_title in &cmd.subtasks {
            let subtask_title = normalize_required_name(subtask_title, "subtask")?;
            subtask_rows.push(Subtask::new(task.id, subtask_title));
        }

        with_tx!(self, |db_tx| {
            tasks::ActiveModel::from(&task).insert(&db_tx).await?;
            for subtask in &subtask_rows {
                subtasks::ActiveModel::from(subtask).insert(&db_tx).await?;
            }
            Ok(task.id)
        })
    }

    /// Applies a partial update to a task. `None` fields keep their stored
    /// value.
    pub async fn update_task(&self, cmd: UpdateTaskCmd) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_task_owned(&db_tx, &cmd.user_id, cmd.task_id)
                .await?;

            let mut active = tasks::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                ..Default::default()
            };
            let mut changed = false;
            if let Some(title) = cmd.title.as_deref() {
                active.title = ActiveValue::Set(normalize_required_name(title, "task")?);
                changed = true;
            }
            if let Some(notes) = normalize_optional_text(cmd.notes.as_deref()) {
                active.notes = ActiveValue::Set(Some(notes));
                changed = true;
            }
            if let Some(due_date) = cmd.due_date {
                active.due_date = ActiveValue::Set(Some(due_date));
                changed = true;
            }
            if let Some(rule) = cmd.recurrence_type {
                active.recurrence_type = ActiveValue::Set(Some(rule.as_str().to_string()));
                changed = true;
            }
            if let Some(until) = cmd.recurring_until {
                active.recurring_until = ActiveValue::Set(Some(until));
                changed = true;
            }

            if changed {
                active.update(&db_tx).await?;
            }
            Ok(())
        })
    }

    /// Marks a task completed.
    ///
    /// `completed_at` comes from the caller so the recurrence sweep can be
    /// exercised against fixed instants.
    pub async fn complete_task(
        &self,
        user_id: &str,
        task_id: Uuid,
        completed_at: DateTime<Utc>,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_task_owned(&db_tx, user_id, task_id).await?;
            let active = tasks::ActiveModel {
                id: ActiveValue::Set(model.id),
                status: ActiveValue::Set(TaskStatus::Completed.as_str().to_string()),
                completed_at: ActiveValue::Set(Some(completed_at)),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deletes a task and its subtasks.
    pub async fn delete_task(&self, user_id: &str, task_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_task_owned(&db_tx, user_id, task_id).await?;
            subtasks::Entity::delete_many()
                .filter(subtasks::Column::TaskId.eq(model.id.clone()))
                .exec(&db_tx)
                .await?;
            tasks::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }

    /// Lists the user's tasks, newest first, optionally filtered by status.
    pub async fn list_tasks(
        &self,
        user_id: &str,
        status: Option<TaskStatus>,
    ) -> ResultEngine<Vec<Task>> {
        let mut query = tasks::Entity::find()
            .filter(tasks::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(tasks::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(tasks::Column::Status.eq(status.as_str().to_string()));
        }
        let models = query.all(&self.database).await?;
        models.into_iter().map(Task::try_from).collect()
    }

    /// Fetches one task owned by the user.
    pub async fn task(&self, user_id: &str, task_id: Uuid) -> ResultEngine<Task> {
        with_tx!(self, |db_tx| {
            let model = self.require_task_owned(&db_tx, user_id, task_id).await?;
            Task::try_from(model)
        })
    }

    /// Fetches a task's subtasks.
    pub async fn subtasks(&self, user_id: &str, task_id: Uuid) -> ResultEngine<Vec<Subtask>> {
        with_tx!(self, |db_tx| {
            let model = self.require_task_owned(&db_tx, user_id, task_id).await?;
            let rows = subtasks::Entity::find()
                .filter(subtasks::Column::TaskId.eq(model.id))
                .all(&db_tx)
                .await?;
            rows.into_iter().map(Subtask::try_from).collect()
        })
    }

    /// Toggles a subtask's completion flag.
    ///
    /// Ownership is checked through the parent task.
    pub async fn set_subtask_completed(
        &self,
        user_id: &str,
        task_id: Uuid,
        subtask_id: Uuid,
        is_completed: bool,
        at: DateTime<Utc>,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_task_owned(&db_tx, user_id, task_id).await?;
            let Some(subtask) = subtasks::Entity::find_by_id(subtask_id.to_string())
                .one(&db_tx)
                .await?
            else {
                return Err(EngineError::KeyNotFound("subtask not exists".to_string()));
            };
            if subtask.task_id != task_id.to_string() {
                return Err(EngineError::KeyNotFound("subtask not exists".to_string()));
            }

            let active = subtasks::ActiveModel {
                id: ActiveValue::Set(subtask.id),
                is_completed: ActiveValue::Set(is_completed),
                completed_at: ActiveValue::Set(is_completed.then_some(at)),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }
}
