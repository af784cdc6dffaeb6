//! Savings goal rows.
//!
//! `current_amount_minor` is maintained by the ledger impact path from
//! `savings` transactions linked to the goal, clamped at zero.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub target_amount_minor: i64,
    pub current_amount_minor: i64,
    pub archived: bool,
}

impl SavingsGoal {
    pub fn new(user_id: String, name: String, target_amount_minor: i64) -> ResultEngine<Self> {
        if target_amount_minor <= 0 {
            return Err(EngineError::InvalidAmount(
                "target_amount_minor must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            target_amount_minor,
            current_amount_minor: 0,
            archived: false,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "savings_goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount_minor: i64,
    pub current_amount_minor: i64,
    pub archived: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SavingsGoal> for ActiveModel {
    fn from(goal: &SavingsGoal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            user_id: ActiveValue::Set(goal.user_id.clone()),
            name: ActiveValue::Set(goal.name.clone()),
            target_amount_minor: ActiveValue::Set(goal.target_amount_minor),
            current_amount_minor: ActiveValue::Set(goal.current_amount_minor),
            archived: ActiveValue::Set(goal.archived),
        }
    }
}

impl TryFrom<Model> for SavingsGoal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("goal not exists".to_string()))?,
            user_id: model.user_id,
            name: model.name,
            target_amount_minor: model.target_amount_minor,
            current_amount_minor: model.current_amount_minor,
            archived: model.archived,
        })
    }
}
