use uuid::Uuid;

use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Category, EngineError, ResultEngine, categories,
    util::{normalize_category_display, normalize_category_key},
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a finance category. Names are unique per user after
    /// normalization, so "Café" and "CAFÉ" collide.
    pub async fn create_category(&self, user_id: &str, name: &str) -> ResultEngine<Uuid> {
        let display = normalize_category_display(name)?;
        let name_norm = normalize_category_key(&display);

        with_tx!(self, |db_tx| {
            let existing = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id.to_string()))
                .filter(categories::Column::NameNorm.eq(name_norm.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(display));
            }

            let category = Category {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                name: display,
                name_norm,
                archived: false,
            };
            categories::ActiveModel::from(&category).insert(&db_tx).await?;
            Ok(category.id)
        })
    }

    /// Lists the user's categories sorted by normalized name.
    pub async fn list_categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(categories::Column::NameNorm)
            .all(&self.database)
            .await?;
        models.into_iter().map(Category::try_from).collect()
    }
}
