use sea_orm::{ActiveValue, IntoActiveModel, ModelTrait, QueryFilter, TransactionTrait, prelude::*};

use crate::{CategoryKind, ResultEngine, categories, expenses};

use super::{Engine, normalize_required_text, with_tx};

/// Partial update for a category.
///
/// Absent fields are left untouched; a present name must be non-empty.
#[derive(Clone, Debug, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub kind: Option<CategoryKind>,
}

impl Engine {
    /// Creates a category owned by `owner_id`.
    ///
    /// Ownership is taken from the authenticated caller, never from the
    /// request body.
    pub async fn create_category(
        &self,
        owner_id: i32,
        name: &str,
        kind: CategoryKind,
    ) -> ResultEngine<categories::Model> {
        let name = normalize_required_text(name, "category name")?;

        with_tx!(self, |db_tx| {
            let active = categories::ActiveModel {
                user_id: ActiveValue::Set(owner_id),
                name: ActiveValue::Set(name),
                kind: ActiveValue::Set(kind.as_str().to_string()),
                ..Default::default()
            };
            Ok(active.insert(&db_tx).await?)
        })
    }

    /// Lists the caller's categories. Order is unspecified.
    pub async fn list_categories(&self, owner_id: i32) -> ResultEngine<Vec<categories::Model>> {
        categories::Entity::find()
            .filter(categories::Column::UserId.eq(owner_id))
            .all(&self.database)
            .await
            .map_err(Into::into)
    }

    pub async fn category(
        &self,
        owner_id: i32,
        category_id: i32,
    ) -> ResultEngine<categories::Model> {
        self.require_category_owned(&self.database, owner_id, category_id)
            .await
    }

    /// Applies a partial update. Every provided field is validated before
    /// any of them is written.
    pub async fn update_category(
        &self,
        owner_id: i32,
        category_id: i32,
        patch: CategoryPatch,
    ) -> ResultEngine<categories::Model> {
        let name = patch
            .name
            .as_deref()
            .map(|name| normalize_required_text(name, "category name"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self
                .require_category_owned(&db_tx, owner_id, category_id)
                .await?;
            if name.is_none() && patch.kind.is_none() {
                return Ok(model);
            }

            let mut active = model.into_active_model();
            if let Some(name) = name {
                active.name = ActiveValue::Set(name);
            }
            if let Some(kind) = patch.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
            }
            Ok(active.update(&db_tx).await?)
        })
    }

    /// Deletes a category and every expense filed under it.
    ///
    /// The expense delete is orchestrated here so the cascade holds even if
    /// the SQLite `foreign_keys` pragma is off.
    pub async fn delete_category(&self, owner_id: i32, category_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_category_owned(&db_tx, owner_id, category_id)
                .await?;

            expenses::Entity::delete_many()
                .filter(expenses::Column::CategoryId.eq(category_id))
                .exec(&db_tx)
                .await?;
            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
