//! Categories API endpoints.

use api_types::category::{CategoryCreated, CategoryListResponse, CategoryNew, CategoryView};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState, user};

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryCreated>), ServerError> {
    let id = state
        .engine
        .create_category(&user.username, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(CategoryCreated { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<CategoryListResponse>, ServerError> {
    let categories = state
        .engine
        .list_categories(&user.username)
        .await?
        .into_iter()
        .map(|category| CategoryView {
            id: category.id,
            name: category.name,
            archived: category.archived,
        })
        .collect();

    Ok(Json(CategoryListResponse { categories }))
}
