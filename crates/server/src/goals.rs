//! Savings goal API endpoints

use api_types::goal::{GoalCreated, GoalListResponse, GoalNew, GoalView};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState, user};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalCreated>), ServerError> {
    let id = state
        .engine
        .create_goal(&user.username, &payload.name, payload.target_amount_minor)
        .await?;

    Ok((StatusCode::CREATED, Json(GoalCreated { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<GoalListResponse>, ServerError> {
    let goals = state
        .engine
        .list_goals(&user.username)
        .await?
        .into_iter()
        .map(|goal| GoalView {
            id: goal.id,
            name: goal.name,
            target_amount_minor: goal.target_amount_minor,
            current_amount_minor: goal.current_amount_minor,
            archived: goal.archived,
        })
        .collect();

    Ok(Json(GoalListResponse { goals }))
}
