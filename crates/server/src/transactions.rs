//! Transactions API endpoints

use api_types::transaction::{
    TransactionCreated, TransactionKind as ApiKind, TransactionList, TransactionListResponse,
    TransactionNew, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
        engine::TransactionKind::Savings => ApiKind::Savings,
        engine::TransactionKind::Loan => ApiKind::Loan,
        engine::TransactionKind::Transfer => ApiKind::Transfer,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let id = state
        .engine
        .create_transaction(engine::NewTransactionCmd {
            user_id: user.username.clone(),
            kind: match payload.kind {
                ApiKind::Income => engine::TransactionKind::Income,
                ApiKind::Expense => engine::TransactionKind::Expense,
                ApiKind::Savings => engine::TransactionKind::Savings,
                ApiKind::Loan => engine::TransactionKind::Loan,
                ApiKind::Transfer => engine::TransactionKind::Transfer,
            },
            amount_minor: payload.amount_minor,
            occurred_at: payload.occurred_at,
            note: payload.note,
            category_id: payload.category_id,
            budget_id: payload.budget_id,
            goal_id: payload.goal_id,
            idempotency_key: payload.idempotency_key,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let transactions = state
        .engine
        .list_transactions(&user.username, query.limit)
        .await?
        .into_iter()
        .map(|tx| TransactionView {
            id: tx.id,
            kind: map_kind(tx.kind),
            amount_minor: tx.amount_minor,
            occurred_at: tx.occurred_at,
            note: tx.note,
            category_id: tx.category_id,
            budget_id: tx.budget_id,
            goal_id: tx.goal_id,
            created_at: tx.created_at,
        })
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_transaction(engine::UpdateTransactionCmd {
            user_id: user.username.clone(),
            transaction_id: id,
            kind: payload.kind.map(|kind| match kind {
                ApiKind::Income => engine::TransactionKind::Income,
                ApiKind::Expense => engine::TransactionKind::Expense,
                ApiKind::Savings => engine::TransactionKind::Savings,
                ApiKind::Loan => engine::TransactionKind::Loan,
                ApiKind::Transfer => engine::TransactionKind::Transfer,
            }),
            amount_minor: payload.amount_minor,
            occurred_at: payload.occurred_at,
            note: payload.note,
            category_id: payload.category_id,
            budget_id: payload.budget_id,
            goal_id: payload.goal_id,
        })
        .await?;

    Ok(StatusCode::OK)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(&user.username, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
