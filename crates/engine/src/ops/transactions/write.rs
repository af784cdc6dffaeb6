use uuid::Uuid;

use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};

use crate::{
    EngineError, LedgerEvent, NewTransactionCmd, ResultEngine, Transaction,
    UpdateTransactionCmd, transactions,
};

use super::super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Creates a transaction and applies its ledger impact, in one DB
    /// transaction.
    ///
    /// A repeated create carrying the same idempotency key for the same user
    /// returns the existing row id and applies nothing.
    pub async fn create_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<Uuid> {
        let (id, events) = self.persist_new_transaction(cmd).await?;
        self.emit(&events);
        Ok(id)
    }

    /// Applies a partial update: the stored snapshot's ledger impact is
    /// reversed, the new values persisted and their impact applied, all in
    /// one DB transaction. `None` fields keep their stored value.
    pub async fn update_transaction(&self, cmd: UpdateTransactionCmd) -> ResultEngine<()> {
        let events = self.persist_transaction_patch(cmd).await?;
        self.emit(&events);
        Ok(())
    }

    /// Reverses a transaction's ledger impact and deletes the row, in one DB
    /// transaction. Deletes fire no notification.
    pub async fn delete_transaction(&self, user_id: &str, transaction_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction_owned(&db_tx, user_id, transaction_id)
                .await?;
            let tx = Transaction::try_from(model)?;
            self.apply_transaction_impact(&db_tx, &tx, -1).await?;
            transactions::Entity::delete_by_id(tx.id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn persist_new_transaction(
        &self,
        cmd: NewTransactionCmd,
    ) -> ResultEngine<(Uuid, Vec<LedgerEvent>)> {
        let NewTransactionCmd {
            user_id,
            kind,
            amount_minor,
            occurred_at,
            note,
            category_id,
            budget_id,
            goal_id,
            idempotency_key,
        } = cmd;
        let note = normalize_optional_text(note.as_deref());
        let mut tx = Transaction::new(
            user_id,
            kind,
            amount_minor,
            occurred_at,
            note,
            category_id,
            budget_id,
            goal_id,
        )?;
        tx.idempotency_key = normalize_optional_text(idempotency_key.as_deref());

        with_tx!(self, |db_tx| {
            self.validate_links(&db_tx, &tx).await?;

            if let Some(key) = tx.idempotency_key.as_deref()
                && let Some(existing) = self
                    .find_by_idempotency_key(&db_tx, &tx.user_id, key)
                    .await?
            {
                return Ok((existing, Vec::new()));
            }

            if let Err(err) = transactions::ActiveModel::from(&tx).insert(&db_tx).await {
                // Lost a race on the unique (user, key) index: surface the winner.
                if let Some(key) = tx.idempotency_key.as_deref()
                    && let Some(existing) = self
                        .find_by_idempotency_key(&db_tx, &tx.user_id, key)
                        .await?
                {
                    return Ok((existing, Vec::new()));
                }
                return Err(err.into());
            }

            let events = self.apply_transaction_impact(&db_tx, &tx, 1).await?;
            Ok((tx.id, events))
        })
    }

    async fn persist_transaction_patch(
        &self,
        cmd: UpdateTransactionCmd,
    ) -> ResultEngine<Vec<LedgerEvent>> {
        if let Some(amount_minor) = cmd.amount_minor
            && amount_minor <= 0
        {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction_owned(&db_tx, &cmd.user_id, cmd.transaction_id)
                .await?;
            let before = Transaction::try_from(model)?;

            let mut after = before.clone();
            if let Some(kind) = cmd.kind {
                after.kind = kind;
            }
            if let Some(amount_minor) = cmd.amount_minor {
                after.amount_minor = amount_minor;
            }
            if let Some(occurred_at) = cmd.occurred_at {
                after.occurred_at = occurred_at;
            }
            if let Some(note) = normalize_optional_text(cmd.note.as_deref()) {
                after.note = Some(note);
            }
            if let Some(category_id) = cmd.category_id {
                after.category_id = Some(category_id);
            }
            if let Some(budget_id) = cmd.budget_id {
                after.budget_id = Some(budget_id);
            }
            if let Some(goal_id) = cmd.goal_id {
                after.goal_id = Some(goal_id);
            }

            self.validate_links(&db_tx, &after).await?;

            let mut events = self.apply_transaction_impact(&db_tx, &before, -1).await?;
            transactions::ActiveModel::from(&after).update(&db_tx).await?;
            let applied = self.apply_transaction_impact(&db_tx, &after, 1).await?;
            events.extend(applied);
            Ok(events)
        })
    }

    /// Ownership guard over every link the row carries, run before any
    /// balance is touched. A link owned by another user resolves as missing.
    async fn validate_links(
        &self,
        db_tx: &DatabaseTransaction,
        tx: &Transaction,
    ) -> ResultEngine<()> {
        if let Some(category_id) = tx.category_id {
            self.require_category_owned(db_tx, &tx.user_id, category_id)
                .await?;
        }
        if let Some(budget_id) = tx.budget_id {
            self.require_budget_owned(db_tx, &tx.user_id, budget_id)
                .await?;
        }
        if let Some(goal_id) = tx.goal_id {
            self.require_goal_owned(db_tx, &tx.user_id, goal_id).await?;
        }
        Ok(())
    }

    async fn find_by_idempotency_key(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        key: &str,
    ) -> ResultEngine<Option<Uuid>> {
        let existing = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .filter(transactions::Column::IdempotencyKey.eq(key.to_string()))
            .one(db_tx)
            .await?;
        existing
            .map(|model| {
                Uuid::parse_str(&model.id)
                    .map_err(|_| EngineError::KeyNotFound("transaction not exists".to_string()))
            })
            .transpose()
    }

    fn emit(&self, events: &[LedgerEvent]) {
        for event in events {
            self.notifier.ledger_updated(event);
        }
    }
}
