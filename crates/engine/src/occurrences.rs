//! Calendar projection of tasks.
//!
//! Expansion never touches storage: recurring tasks are projected into
//! [`TaskOccurrence`] values, a plain data type with no backing row, so a
//! projected day can never be saved by accident.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    recurrence::{self, RecurrenceRule},
    tasks::{Task, TaskStatus},
};

/// One scheduled instance of a task on a specific day.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOccurrence {
    pub task_id: Uuid,
    pub title: String,
    pub notes: Option<String>,
    pub status: TaskStatus,
    pub date: NaiveDate,
}

impl TaskOccurrence {
    fn project(task: &Task, date: NaiveDate) -> Self {
        Self {
            task_id: task.id,
            title: task.title.clone(),
            notes: task.notes.clone(),
            status: task.status,
            date,
        }
    }
}

/// Lazily expands `task` into its occurrences within `[start, end]`.
///
/// Recurring tasks start at `max(anchor day, start)` and step through
/// [`recurrence::next_occurrence`] until the cursor passes
/// `min(end, recurring_until)`. One-off tasks yield themselves iff their due
/// day falls in the range. Single pass, nothing is persisted.
pub fn occurrences_in_range(
    task: &Task,
    start: NaiveDate,
    end: NaiveDate,
) -> OccurrencesInRange<'_> {
    let state = match task.recurrence() {
        Some((rule, until)) => State::Recurring {
            rule,
            cursor: Some(task.anchor_day().max(start)),
            stop: end.min(until),
        },
        None => State::OneOff {
            pending: task.due_date.is_some_and(|due| start <= due && due <= end),
        },
    };
    OccurrencesInRange { task, state }
}

pub struct OccurrencesInRange<'a> {
    task: &'a Task,
    state: State,
}

enum State {
    Recurring {
        rule: RecurrenceRule,
        cursor: Option<NaiveDate>,
        stop: NaiveDate,
    },
    OneOff {
        pending: bool,
    },
}

impl Iterator for OccurrencesInRange<'_> {
    type Item = TaskOccurrence;

    fn next(&mut self) -> Option<TaskOccurrence> {
        match &mut self.state {
            State::Recurring { rule, cursor, stop } => {
                let date = (*cursor)?;
                if date > *stop {
                    *cursor = None;
                    return None;
                }
                *cursor = recurrence::next_occurrence(*rule, date);
                Some(TaskOccurrence::project(self.task, date))
            }
            State::OneOff { pending } => {
                if !*pending {
                    return None;
                }
                *pending = false;
                let due = self.task.due_date?;
                Some(TaskOccurrence::project(self.task, due))
            }
        }
    }
}
