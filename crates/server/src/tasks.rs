//! Task API endpoints

use api_types::TaskStatus as ApiTaskStatus;
use api_types::task::{
    RecurrenceKind, SubtaskToggle, SubtaskView, SubtasksResponse, TaskComplete, TaskCreated,
    TaskList, TaskListResponse, TaskNew, TaskUpdate, TaskView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_status(status: engine::TaskStatus) -> ApiTaskStatus {
    match status {
        engine::TaskStatus::Pending => ApiTaskStatus::Pending,
        engine::TaskStatus::Completed => ApiTaskStatus::Completed,
    }
}

fn map_rule(rule: engine::RecurrenceRule) -> RecurrenceKind {
    match rule {
        engine::RecurrenceRule::Daily => RecurrenceKind::Daily,
        engine::RecurrenceRule::Weekly => RecurrenceKind::Weekly,
        engine::RecurrenceRule::Monthly => RecurrenceKind::Monthly,
        engine::RecurrenceRule::Yearly => RecurrenceKind::Yearly,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TaskNew>,
) -> Result<(StatusCode, Json<TaskCreated>), ServerError> {
    if payload.recurrence_type.is_some() != payload.recurring_until.is_some() {
        return Err(ServerError::Generic(
            "recurrence_type and recurring_until must be provided together".to_string(),
        ));
    }

    let id = state
        .engine
        .create_task(engine::NewTaskCmd {
            user_id: user.username.clone(),
            title: payload.title,
            notes: payload.notes,
            due_date: payload.due_date,
            recurrence_type: payload.recurrence_type.map(|kind| match kind {
                RecurrenceKind::Daily => engine::RecurrenceRule::Daily,
                RecurrenceKind::Weekly => engine::RecurrenceRule::Weekly,
                RecurrenceKind::Monthly => engine::RecurrenceRule::Monthly,
                RecurrenceKind::Yearly => engine::RecurrenceRule::Yearly,
            }),
            recurring_until: payload.recurring_until,
            subtasks: payload.subtasks,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TaskCreated { id })))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TaskList>,
) -> Result<Json<TaskListResponse>, ServerError> {
    let status = query.status.map(|status| match status {
        ApiTaskStatus::Pending => engine::TaskStatus::Pending,
        ApiTaskStatus::Completed => engine::TaskStatus::Completed,
    });

    let tasks = state
        .engine
        .list_tasks(&user.username, status)
        .await?
        .into_iter()
        .map(|task| TaskView {
            id: task.id,
            title: task.title,
            notes: task.notes,
            status: map_status(task.status),
            due_date: task.due_date,
            completed_at: task.completed_at,
            recurrence_type: task.recurrence_type.map(map_rule),
            recurring_until: task.recurring_until,
            created_at: task.created_at,
        })
        .collect();

    Ok(Json(TaskListResponse { tasks }))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TaskUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_task(engine::UpdateTaskCmd {
            user_id: user.username.clone(),
            task_id: id,
            title: payload.title,
            notes: payload.notes,
            due_date: payload.due_date,
            recurrence_type: payload.recurrence_type.map(|kind| match kind {
                RecurrenceKind::Daily => engine::RecurrenceRule::Daily,
                RecurrenceKind::Weekly => engine::RecurrenceRule::Weekly,
                RecurrenceKind::Monthly => engine::RecurrenceRule::Monthly,
                RecurrenceKind::Yearly => engine::RecurrenceRule::Yearly,
            }),
            recurring_until: payload.recurring_until,
        })
        .await?;

    Ok(StatusCode::OK)
}

pub async fn complete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TaskComplete>,
) -> Result<StatusCode, ServerError> {
    let completed_at = payload.completed_at.unwrap_or_else(Utc::now);
    state
        .engine
        .complete_task(&user.username, id, completed_at)
        .await?;

    Ok(StatusCode::OK)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_task(&user.username, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn subtasks(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SubtasksResponse>, ServerError> {
    let subtasks = state
        .engine
        .subtasks(&user.username, id)
        .await?
        .into_iter()
        .map(|subtask| SubtaskView {
            id: subtask.id,
            title: subtask.title,
            is_completed: subtask.is_completed,
            completed_at: subtask.completed_at,
        })
        .collect();

    Ok(Json(SubtasksResponse { subtasks }))
}

pub async fn set_subtask(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((task_id, subtask_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<SubtaskToggle>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .set_subtask_completed(
            &user.username,
            task_id,
            subtask_id,
            payload.is_completed,
            Utc::now(),
        )
        .await?;

    Ok(StatusCode::OK)
}
