use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{ResultEngine, SavingsGoal, goals};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Creates a savings goal.
    pub async fn create_goal(
        &self,
        user_id: &str,
        name: &str,
        target_amount_minor: i64,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "goal")?;
        let goal = SavingsGoal::new(user_id.to_string(), name, target_amount_minor)?;

        with_tx!(self, |db_tx| {
            goals::ActiveModel::from(&goal).insert(&db_tx).await?;
            Ok(goal.id)
        })
    }

    /// Lists the user's savings goals sorted by name.
    pub async fn list_goals(&self, user_id: &str) -> ResultEngine<Vec<SavingsGoal>> {
        let models = goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(goals::Column::Name)
            .all(&self.database)
            .await?;
        models.into_iter().map(SavingsGoal::try_from).collect()
    }

    /// Fetches one goal owned by the user.
    pub async fn goal(&self, user_id: &str, goal_id: Uuid) -> ResultEngine<SavingsGoal> {
        with_tx!(self, |db_tx| {
            let model = self.require_goal_owned(&db_tx, user_id, goal_id).await?;
            SavingsGoal::try_from(model)
        })
    }
}
