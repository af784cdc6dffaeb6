use chrono::NaiveDate;

use sea_orm::{QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, Task, TaskOccurrence, occurrences_in_range, tasks};

use super::Engine;

impl Engine {
    /// Expands all of the user's tasks into calendar occurrences within
    /// `[start, end]`, sorted by day.
    ///
    /// Purely read-side: recurring tasks stay single rows, the returned
    /// occurrences are projections.
    pub async fn calendar_occurrences(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ResultEngine<Vec<TaskOccurrence>> {
        if start > end {
            return Err(EngineError::InvalidDate(
                "invalid range: start must be <= end".to_string(),
            ));
        }

        let models = tasks::Entity::find()
            .filter(tasks::Column::UserId.eq(user_id.to_string()))
            .all(&self.database)
            .await?;

        let mut out = Vec::new();
        for model in models {
            let task = Task::try_from(model)?;
            out.extend(occurrences_in_range(&task, start, end));
        }
        out.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.task_id.cmp(&b.task_id)));
        Ok(out)
    }
}
