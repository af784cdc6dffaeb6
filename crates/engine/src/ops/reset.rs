use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{ResultEngine, Task, TaskStatus, recurrence, subtasks, tasks, users};

use super::{Engine, with_tx};

/// Outcome of one reset sweep run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub users: usize,
    pub scanned: usize,
    pub reset: usize,
    pub skipped: usize,
    pub failures: Vec<SweepFailure>,
}

/// One task the sweep could not reset. Recorded, never fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepFailure {
    pub task_id: String,
    pub error: String,
}

impl Engine {
    /// Runs the daily reset sweep at the current instant.
    pub async fn run_reset_sweep(&self) -> ResultEngine<SweepReport> {
        self.run_reset_sweep_at(Utc::now()).await
    }

    /// Runs the reset sweep as of `now`.
    ///
    /// Each user's local "today" comes from their stored IANA timezone (UTC
    /// when the stored name does not parse). Candidates are that user's
    /// completed recurring tasks whose horizon has not passed; each one that
    /// is due again is reopened in its own transaction. Running the sweep a
    /// second time on the same day finds no completed candidates and changes
    /// nothing.
    pub async fn run_reset_sweep_at(&self, now: DateTime<Utc>) -> ResultEngine<SweepReport> {
        let mut report = SweepReport::default();

        let user_rows = users::Entity::find().all(&self.database).await?;
        report.users = user_rows.len();

        for user in user_rows {
            let tz = Tz::from_str(&user.timezone).unwrap_or(Tz::UTC);
            let today = now.with_timezone(&tz).date_naive();

            let candidates = tasks::Entity::find()
                .filter(tasks::Column::UserId.eq(user.username.clone()))
                .filter(tasks::Column::Status.eq(TaskStatus::Completed.as_str()))
                .filter(tasks::Column::CompletedAt.is_not_null())
                .filter(tasks::Column::RecurrenceType.is_not_null())
                .filter(tasks::Column::RecurringUntil.is_not_null())
                .filter(tasks::Column::RecurringUntil.gte(today))
                .all(&self.database)
                .await?;
            report.scanned += candidates.len();

            for model in candidates {
                let task_id = model.id.clone();
                match self.reset_candidate(model, tz, today).await {
                    Ok(true) => report.reset += 1,
                    Ok(false) => report.skipped += 1,
                    Err(err) => report.failures.push(SweepFailure {
                        task_id,
                        error: err.to_string(),
                    }),
                }
            }
        }

        Ok(report)
    }

    /// Reopens one candidate task if its next occurrence is due on `today`.
    ///
    /// The new due day is the next occurrence, clamped forward to `today` so
    /// a reset never lands in the past. The task row and the bulk subtask
    /// reset commit together.
    async fn reset_candidate(
        &self,
        model: tasks::Model,
        tz: Tz,
        today: NaiveDate,
    ) -> ResultEngine<bool> {
        let task = Task::try_from(model)?;
        let Some((rule, until)) = task.recurrence() else {
            return Ok(false);
        };
        let Some(completed_at) = task.completed_at else {
            return Ok(false);
        };

        let completed_on = completed_at.with_timezone(&tz).date_naive();
        if !recurrence::should_reset(rule, completed_on, until, today) {
            return Ok(false);
        }
        let Some(next) = recurrence::next_occurrence(rule, completed_on) else {
            return Ok(false);
        };
        let new_due = next.max(today);

        with_tx!(self, |db_tx| {
            let active = tasks::ActiveModel {
                id: ActiveValue::Set(task.id.to_string()),
                status: ActiveValue::Set(TaskStatus::Pending.as_str().to_string()),
                completed_at: ActiveValue::Set(None),
                due_date: ActiveValue::Set(Some(new_due)),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            subtasks::Entity::update_many()
                .set(subtasks::ActiveModel {
                    is_completed: ActiveValue::Set(false),
                    completed_at: ActiveValue::Set(None),
                    ..Default::default()
                })
                .filter(subtasks::Column::TaskId.eq(task.id.to_string()))
                .exec(&db_tx)
                .await?;
            Ok(true)
        })
    }
}
