//! Budget API endpoints

use api_types::budget::{BudgetCreated, BudgetList, BudgetListResponse, BudgetNew, BudgetView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetCreated>), ServerError> {
    let id = state
        .engine
        .create_budget(engine::NewBudgetCmd {
            user_id: user.username.clone(),
            name: payload.name,
            amount_minor: payload.amount_minor,
            category_id: payload.category_id,
            starts_on: payload.starts_on,
            ends_on: payload.ends_on,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(BudgetCreated { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<BudgetList>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let include_archived = query.include_archived.unwrap_or(false);
    let budgets = state
        .engine
        .list_budgets(&user.username, include_archived)
        .await?
        .into_iter()
        .map(|budget| BudgetView {
            id: budget.id,
            name: budget.name,
            amount_minor: budget.amount_minor,
            current_spent_minor: budget.current_spent_minor,
            category_id: budget.category_id,
            starts_on: budget.starts_on,
            ends_on: budget.ends_on,
            archived: budget.archived,
        })
        .collect();

    Ok(Json(BudgetListResponse { budgets }))
}

pub async fn archive(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.archive_budget(&user.username, id).await?;

    Ok(StatusCode::OK)
}
