//! Calendar expansion endpoint

use api_types::TaskStatus as ApiTaskStatus;
use api_types::calendar::{CalendarRange, CalendarResponse, OccurrenceView};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState, user};

pub async fn range(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<CalendarRange>,
) -> Result<Json<CalendarResponse>, ServerError> {
    let occurrences = state
        .engine
        .calendar_occurrences(&user.username, query.start, query.end)
        .await?
        .into_iter()
        .map(|occurrence| OccurrenceView {
            task_id: occurrence.task_id,
            title: occurrence.title,
            notes: occurrence.notes,
            status: match occurrence.status {
                engine::TaskStatus::Pending => ApiTaskStatus::Pending,
                engine::TaskStatus::Completed => ApiTaskStatus::Completed,
            },
            date: occurrence.date,
        })
        .collect();

    Ok(Json(CalendarResponse { occurrences }))
}
