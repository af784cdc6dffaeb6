//! Budget rows and the expense-matching rule.
//!
//! `current_spent_minor` is a running total maintained incrementally by the
//! ledger impact path; nothing else writes it.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub amount_minor: i64,
    pub current_spent_minor: i64,
    pub category_id: Option<Uuid>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub archived: bool,
}

impl Budget {
    pub fn new(
        user_id: String,
        name: String,
        amount_minor: i64,
        category_id: Option<Uuid>,
        starts_on: Option<NaiveDate>,
        ends_on: Option<NaiveDate>,
    ) -> ResultEngine<Self> {
        if amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount_minor must be > 0".to_string(),
            ));
        }
        if let (Some(starts), Some(ends)) = (starts_on, ends_on)
            && starts > ends
        {
            return Err(EngineError::InvalidDate(
                "starts_on must be <= ends_on".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            amount_minor,
            current_spent_minor: 0,
            category_id,
            starts_on,
            ends_on,
            archived: false,
        })
    }

    /// Matching rule for expenses with no explicit budget link.
    ///
    /// The category filter and the date window each apply only when set; a
    /// budget with neither is a catch-all and matches every expense. A
    /// category filter never matches an uncategorized expense.
    pub fn matches_expense(&self, category_id: Option<Uuid>, occurred_at: NaiveDate) -> bool {
        if self.archived {
            return false;
        }
        if let Some(filter) = self.category_id
            && category_id != Some(filter)
        {
            return false;
        }
        if let Some(starts) = self.starts_on
            && occurred_at < starts
        {
            return false;
        }
        if let Some(ends) = self.ends_on
            && occurred_at > ends
        {
            return false;
        }
        true
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub amount_minor: i64,
    pub current_spent_minor: i64,
    pub category_id: Option<String>,
    pub starts_on: Option<Date>,
    pub ends_on: Option<Date>,
    pub archived: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id.to_string()),
            user_id: ActiveValue::Set(budget.user_id.clone()),
            name: ActiveValue::Set(budget.name.clone()),
            amount_minor: ActiveValue::Set(budget.amount_minor),
            current_spent_minor: ActiveValue::Set(budget.current_spent_minor),
            category_id: ActiveValue::Set(budget.category_id.map(|id| id.to_string())),
            starts_on: ActiveValue::Set(budget.starts_on),
            ends_on: ActiveValue::Set(budget.ends_on),
            archived: ActiveValue::Set(budget.archived),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("budget not exists".to_string()))?,
            user_id: model.user_id,
            name: model.name,
            amount_minor: model.amount_minor,
            current_spent_minor: model.current_spent_minor,
            category_id: model.category_id.and_then(|s| Uuid::parse_str(&s).ok()),
            starts_on: model.starts_on,
            ends_on: model.ends_on,
            archived: model.archived,
        })
    }
}
