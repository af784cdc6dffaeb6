//! Transaction primitives.
//!
//! A `Transaction` is an atomic financial event owned by one user. Expense
//! and savings rows drive the incremental budget / goal totals; the other
//! kinds are recorded but carry no ledger impact.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Savings,
    Loan,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Savings => "savings",
            Self::Loan => "loan",
            Self::Transfer => "transfer",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "savings" => Ok(Self::Savings),
            "loan" => Ok(Self::Loan),
            "transfer" => Ok(Self::Transfer),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub occurred_at: NaiveDate,
    pub note: Option<String>,
    pub category_id: Option<Uuid>,
    pub budget_id: Option<Uuid>,
    pub goal_id: Option<Uuid>,
    pub idempotency_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: String,
        kind: TransactionKind,
        amount_minor: i64,
        occurred_at: NaiveDate,
        note: Option<String>,
        category_id: Option<Uuid>,
        budget_id: Option<Uuid>,
        goal_id: Option<Uuid>,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            amount_minor,
            occurred_at,
            note,
            category_id,
            budget_id,
            goal_id,
            idempotency_key: None,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub occurred_at: Date,
    pub note: Option<String>,
    pub category_id: Option<String>,
    pub budget_id: Option<String>,
    pub goal_id: Option<String>,
    pub idempotency_key: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            note: ActiveValue::Set(tx.note.clone()),
            category_id: ActiveValue::Set(tx.category_id.map(|id| id.to_string())),
            budget_id: ActiveValue::Set(tx.budget_id.map(|id| id.to_string())),
            goal_id: ActiveValue::Set(tx.goal_id.map(|id| id.to_string())),
            idempotency_key: ActiveValue::Set(tx.idempotency_key.clone()),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction not exists".to_string()))?,
            user_id: model.user_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            occurred_at: model.occurred_at,
            note: model.note,
            category_id: model.category_id.and_then(|s| Uuid::parse_str(&s).ok()),
            budget_id: model.budget_id.and_then(|s| Uuid::parse_str(&s).ok()),
            goal_id: model.goal_id.and_then(|s| Uuid::parse_str(&s).ok()),
            idempotency_key: model.idempotency_key,
            created_at: model.created_at,
        })
    }
}
