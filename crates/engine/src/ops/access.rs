use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, budgets, categories, goals, tasks, transactions};

use super::Engine;

/// Generates a `require_*` method resolving a target by id scoped to its
/// owning user.
///
/// A row owned by another user resolves exactly like a missing row, so
/// foreign ids cannot be probed.
macro_rules! impl_owned_lookup {
    ($require_fn:ident, $entity:path, $user_col:expr, $model:ty, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            user_id: &str,
            target_id: Uuid,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(target_id.to_string())
                .filter($user_col.eq(user_id.to_string()))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_owned_lookup!(
        require_task_owned,
        tasks::Entity,
        tasks::Column::UserId,
        tasks::Model,
        "task not exists"
    );

    impl_owned_lookup!(
        require_transaction_owned,
        transactions::Entity,
        transactions::Column::UserId,
        transactions::Model,
        "transaction not exists"
    );

    impl_owned_lookup!(
        require_budget_owned,
        budgets::Entity,
        budgets::Column::UserId,
        budgets::Model,
        "budget not exists"
    );

    impl_owned_lookup!(
        require_goal_owned,
        goals::Entity,
        goals::Column::UserId,
        goals::Model,
        "goal not exists"
    );

    impl_owned_lookup!(
        require_category_owned,
        categories::Entity,
        categories::Column::UserId,
        categories::Model,
        "category not exists"
    );
}
