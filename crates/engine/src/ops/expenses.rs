use chrono::{Local, NaiveDate, Utc};
use sea_orm::{
    ActiveValue, IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait, prelude::*,
};

use crate::{EngineError, ResultEngine, expenses};

use super::{Engine, normalize_required_text, with_tx};

pub const DEFAULT_LIST_LIMIT: u64 = 100;
const MAX_LIST_LIMIT: u64 = 100;

/// Filters for listing expenses (offset pagination, newest date first).
#[derive(Clone, Debug)]
pub struct ExpenseListFilter {
    pub skip: u64,
    /// 1..=100.
    pub limit: u64,
    pub category_id: Option<i32>,
}

impl Default for ExpenseListFilter {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIST_LIMIT,
            category_id: None,
        }
    }
}

/// Partial update for an expense.
///
/// Absent fields are left untouched. A present amount must be positive
/// (`Some(0.0)` is a validation error, not "unset"), a present description
/// must be non-empty, a present date must not be in the future.
#[derive(Clone, Debug, Default)]
pub struct ExpensePatch {
    pub category_id: Option<i32>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
}

impl ExpensePatch {
    fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.date.is_none()
    }
}

fn validate_amount(amount: f64) -> ResultEngine<()> {
    if amount <= 0.0 {
        return Err(EngineError::InvalidAmount(
            "amount must be greater than 0".to_string(),
        ));
    }
    Ok(())
}

fn validate_date(date: NaiveDate) -> ResultEngine<()> {
    // "Today" is the server's local calendar date, not a client-supplied now.
    if date > Local::now().date_naive() {
        return Err(EngineError::InvalidDate(
            "expense date cannot be in the future".to_string(),
        ));
    }
    Ok(())
}

fn validate_list_filter(filter: &ExpenseListFilter) -> ResultEngine<()> {
    if filter.limit < 1 || filter.limit > MAX_LIST_LIMIT {
        return Err(EngineError::InvalidAmount(format!(
            "limit must be between 1 and {MAX_LIST_LIMIT}"
        )));
    }
    Ok(())
}

impl Engine {
    /// Records an expense against one of the caller's categories.
    pub async fn create_expense(
        &self,
        owner_id: i32,
        category_id: i32,
        amount: f64,
        description: &str,
        date: NaiveDate,
    ) -> ResultEngine<expenses::Model> {
        let description = normalize_required_text(description, "description")?;
        validate_amount(amount)?;
        validate_date(date)?;

        with_tx!(self, |db_tx| {
            self.require_category_owned(&db_tx, owner_id, category_id)
                .await?;

            let active = expenses::ActiveModel {
                user_id: ActiveValue::Set(owner_id),
                category_id: ActiveValue::Set(category_id),
                amount: ActiveValue::Set(amount),
                description: ActiveValue::Set(description),
                date: ActiveValue::Set(date),
                created_at: ActiveValue::Set(Utc::now()),
                ..Default::default()
            };
            Ok(active.insert(&db_tx).await?)
        })
    }

    /// Lists the caller's expenses, newest date first.
    ///
    /// Offset pagination: stable only while no concurrent write reorders the
    /// underlying rows.
    pub async fn list_expenses(
        &self,
        owner_id: i32,
        filter: &ExpenseListFilter,
    ) -> ResultEngine<Vec<expenses::Model>> {
        validate_list_filter(filter)?;

        let mut query = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(owner_id))
            .order_by_desc(expenses::Column::Date)
            .offset(filter.skip)
            .limit(filter.limit);
        if let Some(category_id) = filter.category_id {
            query = query.filter(expenses::Column::CategoryId.eq(category_id));
        }

        query.all(&self.database).await.map_err(Into::into)
    }

    pub async fn expense(&self, owner_id: i32, expense_id: i32) -> ResultEngine<expenses::Model> {
        self.require_expense_owned(&self.database, owner_id, expense_id)
            .await
    }

    /// Applies a partial update. Every provided field is validated before
    /// any of them is written, so a failing patch leaves the row unchanged.
    pub async fn update_expense(
        &self,
        owner_id: i32,
        expense_id: i32,
        patch: ExpensePatch,
    ) -> ResultEngine<expenses::Model> {
        let description = patch
            .description
            .as_deref()
            .map(|description| normalize_required_text(description, "description"))
            .transpose()?;
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }
        if let Some(date) = patch.date {
            validate_date(date)?;
        }

        with_tx!(self, |db_tx| {
            let model = self
                .require_expense_owned(&db_tx, owner_id, expense_id)
                .await?;
            if patch.is_empty() {
                return Ok(model);
            }

            // A new category must resolve under the same owner before the
            // move is applied.
            if let Some(category_id) = patch.category_id {
                self.require_category_owned(&db_tx, owner_id, category_id)
                    .await?;
            }

            let mut active = model.into_active_model();
            if let Some(category_id) = patch.category_id {
                active.category_id = ActiveValue::Set(category_id);
            }
            if let Some(amount) = patch.amount {
                active.amount = ActiveValue::Set(amount);
            }
            if let Some(description) = description {
                active.description = ActiveValue::Set(description);
            }
            if let Some(date) = patch.date {
                active.date = ActiveValue::Set(date);
            }
            Ok(active.update(&db_tx).await?)
        })
    }

    pub async fn delete_expense(&self, owner_id: i32, expense_id: i32) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_expense_owned(&db_tx, owner_id, expense_id)
                .await?;
            model.delete(&db_tx).await?;
            Ok(())
        })
    }
}
