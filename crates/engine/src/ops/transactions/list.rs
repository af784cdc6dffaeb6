use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{ResultEngine, Transaction, transactions};

use super::super::{Engine, with_tx};

impl Engine {
    /// Lists the user's transactions, most recent occurrence date first.
    /// Rows sharing a date tie-break on id so pages are stable.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        limit: Option<u64>,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(transactions::Column::OccurredAt)
            .order_by_desc(transactions::Column::Id);
        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    pub async fn transaction(&self, user_id: &str, transaction_id: Uuid) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction_owned(&db_tx, user_id, transaction_id)
                .await?;
            Ok(Transaction::try_from(model)?)
        })
    }
}
