use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, prelude::*};

use crate::{
    Budget, LedgerEvent, ResultEngine, Transaction, TransactionKind, budgets, goals,
};

use super::super::Engine;

impl Engine {
    /// Applies (`direction = 1`) or reverses (`direction = -1`) the ledger
    /// impact of one transaction snapshot.
    ///
    /// `savings` rows fund their linked goal; `expense` rows charge either
    /// the explicitly linked budget (bypassing the matching rules, archived
    /// included) or every active budget whose category filter and date
    /// window match. Totals clamp at zero. Returns the post-adjustment
    /// snapshots for the notification hook.
    pub(super) async fn apply_transaction_impact(
        &self,
        db_tx: &DatabaseTransaction,
        tx: &Transaction,
        direction: i64,
    ) -> ResultEngine<Vec<LedgerEvent>> {
        let mut events = Vec::new();
        match tx.kind {
            TransactionKind::Savings => {
                let Some(goal_id) = tx.goal_id else {
                    return Ok(events);
                };
                let model = self.require_goal_owned(db_tx, &tx.user_id, goal_id).await?;
                let target_minor = model.target_amount_minor;
                let current = (model.current_amount_minor + direction * tx.amount_minor).max(0);
                let active = goals::ActiveModel {
                    id: ActiveValue::Set(model.id),
                    current_amount_minor: ActiveValue::Set(current),
                    ..Default::default()
                };
                active.update(db_tx).await?;
                events.push(LedgerEvent::GoalFunded {
                    goal_id,
                    user_id: tx.user_id.clone(),
                    current_minor: current,
                    target_minor,
                });
            }
            TransactionKind::Expense => {
                if let Some(budget_id) = tx.budget_id {
                    let model = self
                        .require_budget_owned(db_tx, &tx.user_id, budget_id)
                        .await?;
                    let budget = Budget::try_from(model)?;
                    let event = self
                        .charge_budget(db_tx, &budget, direction * tx.amount_minor)
                        .await?;
                    events.push(event);
                } else {
                    let models = budgets::Entity::find()
                        .filter(budgets::Column::UserId.eq(tx.user_id.clone()))
                        .filter(budgets::Column::Archived.eq(false))
                        .all(db_tx)
                        .await?;
                    for model in models {
                        let budget = Budget::try_from(model)?;
                        if budget.matches_expense(tx.category_id, tx.occurred_at) {
                            let event = self
                                .charge_budget(db_tx, &budget, direction * tx.amount_minor)
                                .await?;
                            events.push(event);
                        }
                    }
                }
            }
            TransactionKind::Income | TransactionKind::Loan | TransactionKind::Transfer => {}
        }
        Ok(events)
    }

    async fn charge_budget(
        &self,
        db_tx: &DatabaseTransaction,
        budget: &Budget,
        delta_minor: i64,
    ) -> ResultEngine<LedgerEvent> {
        let spent = (budget.current_spent_minor + delta_minor).max(0);
        let active = budgets::ActiveModel {
            id: ActiveValue::Set(budget.id.to_string()),
            current_spent_minor: ActiveValue::Set(spent),
            ..Default::default()
        };
        active.update(db_tx).await?;
        Ok(LedgerEvent::BudgetCharged {
            budget_id: budget.id,
            user_id: budget.user_id.clone(),
            spent_minor: spent,
            allocated_minor: budget.amount_minor,
        })
    }
}
