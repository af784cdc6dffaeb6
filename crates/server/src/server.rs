use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, patch, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{budgets, calendar, categories, goals, tasks, transactions, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = if let Some(user) = user {
        user
    } else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/tasks", post(tasks::create).get(tasks::list))
        .route("/tasks/{id}", patch(tasks::update).delete(tasks::remove))
        .route("/tasks/{id}/complete", post(tasks::complete))
        .route("/tasks/{id}/subtasks", get(tasks::subtasks))
        .route(
            "/tasks/{id}/subtasks/{subtask_id}",
            put(tasks::set_subtask),
        )
        .route("/calendar", get(calendar::range))
        .route(
            "/transactions",
            post(transactions::create).get(transactions::list),
        )
        .route(
            "/transactions/{id}",
            patch(transactions::update).delete(transactions::remove),
        )
        .route("/budgets", post(budgets::create).get(budgets::list))
        .route("/budgets/{id}/archive", post(budgets::archive))
        .route("/goals", post(goals::create).get(goals::list))
        .route("/categories", post(categories::create).get(categories::list))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

/// Builds the full authenticated router. Exposed so tests can drive it
/// in-process without a listener.
pub fn app(engine: Engine, db: DatabaseConnection) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };
    router(state)
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, db)).await
}
