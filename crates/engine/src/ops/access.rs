use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, categories, expenses};

use super::Engine;

impl Engine {
    /// Loads a category only if it belongs to `owner_id`.
    ///
    /// The single `id = ? AND user_id = ?` predicate makes "no such row" and
    /// "row owned by someone else" indistinguishable to the caller.
    pub(super) async fn require_category_owned<C: ConnectionTrait>(
        &self,
        db: &C,
        owner_id: i32,
        category_id: i32,
    ) -> ResultEngine<categories::Model> {
        categories::Entity::find_by_id(category_id)
            .filter(categories::Column::UserId.eq(owner_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))
    }

    pub(super) async fn require_expense_owned<C: ConnectionTrait>(
        &self,
        db: &C,
        owner_id: i32,
        expense_id: i32,
    ) -> ResultEngine<expenses::Model> {
        expenses::Entity::find_by_id(expense_id)
            .filter(expenses::Column::UserId.eq(owner_id))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))
    }
}
