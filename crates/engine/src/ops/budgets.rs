use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{Budget, NewBudgetCmd, ResultEngine, budgets};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Creates a budget. A linked category must belong to the same user.
    pub async fn create_budget(&self, cmd: NewBudgetCmd) -> ResultEngine<Uuid> {
        let name = normalize_required_name(&cmd.name, "budget")?;
        let budget = Budget::new(
            cmd.user_id.clone(),
            name,
            cmd.amount_minor,
            cmd.category_id,
            cmd.starts_on,
            cmd.ends_on,
        )?;

        with_tx!(self, |db_tx| {
            if let Some(category_id) = cmd.category_id {
                self.require_category_owned(&db_tx, &cmd.user_id, category_id)
                    .await?;
            }
            budgets::ActiveModel::from(&budget).insert(&db_tx).await?;
            Ok(budget.id)
        })
    }

    /// Lists the user's budgets sorted by name, optionally including
    /// archived ones.
    pub async fn list_budgets(
        &self,
        user_id: &str,
        include_archived: bool,
    ) -> ResultEngine<Vec<Budget>> {
        let mut query = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(budgets::Column::Name);
        if !include_archived {
            query = query.filter(budgets::Column::Archived.eq(false));
        }
        let models = query.all(&self.database).await?;
        models.into_iter().map(Budget::try_from).collect()
    }

    /// Archives a budget. Archived budgets stop matching unlinked expenses;
    /// explicitly linked rows still adjust it.
    pub async fn archive_budget(&self, user_id: &str, budget_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget_owned(&db_tx, user_id, budget_id).await?;
            let active = budgets::ActiveModel {
                id: ActiveValue::Set(model.id),
                archived: ActiveValue::Set(true),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Fetches one budget owned by the user.
    pub async fn budget(&self, user_id: &str, budget_id: Uuid) -> ResultEngine<Budget> {
        with_tx!(self, |db_tx| {
            let model = self.require_budget_owned(&db_tx, user_id, budget_id).await?;
            Budget::try_from(model)
        })
    }
}
