use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{app, run_with_listener};

mod budgets;
mod calendar;
mod categories;
mod goals;
mod server;
mod tasks;
mod transactions;
mod user;

pub mod types {
    pub mod task {
        pub use api_types::TaskStatus;
        pub use api_types::task::{
            RecurrenceKind, SubtaskToggle, SubtaskView, SubtasksResponse, TaskComplete,
            TaskCreated, TaskList, TaskListResponse, TaskNew, TaskUpdate, TaskView,
        };
    }

    pub mod calendar {
        pub use api_types::calendar::{CalendarRange, CalendarResponse, OccurrenceView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            TransactionCreated, TransactionKind, TransactionList, TransactionListResponse,
            TransactionNew, TransactionUpdate, TransactionView,
        };
    }

    pub mod category {
        pub use api_types::category::{
            CategoryCreated, CategoryListResponse, CategoryNew, CategoryView,
        };
    }

    pub mod budget {
        pub use api_types::budget::{
            BudgetCreated, BudgetList, BudgetListResponse, BudgetNew, BudgetView,
        };
    }

    pub mod goal {
        pub use api_types::goal::{GoalCreated, GoalListResponse, GoalNew, GoalView};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidDate(_)
        | EngineError::InvalidRecurrence(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(EngineError::InvalidDate("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res =
            ServerError::from(EngineError::InvalidRecurrence("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
