use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};

use crate::{EngineError, ResultEngine, users};

use super::{Engine, normalize_email, normalize_required_text, with_tx};

impl Engine {
    /// Creates a user account.
    ///
    /// The password arrives already hashed; the engine never sees plaintext
    /// credentials.
    pub async fn register_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        password_hash: &str,
    ) -> ResultEngine<users::Model> {
        let email = normalize_email(email)?;
        let first_name = normalize_required_text(first_name, "first name")?;
        let last_name = normalize_required_text(last_name, "last name")?;
        let password_hash = password_hash.to_string();

        with_tx!(self, |db_tx| {
            let existing = users::Entity::find()
                .filter(users::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(
                    "email already registered".to_string(),
                ));
            }

            let active = users::ActiveModel {
                email: ActiveValue::Set(email),
                password_hash: ActiveValue::Set(password_hash),
                first_name: ActiveValue::Set(first_name),
                last_name: ActiveValue::Set(last_name),
                created_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            Ok(active.insert(&db_tx).await?)
        })
    }

    /// Looks up a user by email. Returns `None` when absent so the caller
    /// can collapse "no such user" and "wrong password" into one failure.
    pub async fn user_by_email(&self, email: &str) -> ResultEngine<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.to_string()))
            .one(&self.database)
            .await
            .map_err(Into::into)
    }
}
