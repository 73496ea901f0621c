//! Read-only aggregation over a user's expenses.
//!
//! All queries join expenses to categories and are scoped by `user_id` at
//! statement time; nothing here mutates state.

use sea_orm::{ConnectionTrait, Statement};

use crate::{CategoryKind, EngineError, ResultEngine};

use super::Engine;

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
    /// Category name with the largest summed amount of that kind; `None`
    /// when the user has no rows of that kind. Tie-break is unspecified.
    pub top_expense_category: Option<String>,
    pub top_income_category: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryBreakdownRow {
    pub category_id: i32,
    pub category_name: String,
    pub category_kind: CategoryKind,
    pub total_amount: f64,
    pub transaction_count: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyBucket {
    /// `"YYYY-MM"`.
    pub month: String,
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
}

impl MonthlyBucket {
    fn merge(&mut self, kind: CategoryKind, total: f64) {
        match kind {
            CategoryKind::Income => self.total_income = total,
            CategoryKind::Expense => self.total_expenses = total,
        }
        self.net_balance = self.total_income - self.total_expenses;
    }
}

impl Engine {
    /// Returns overall totals and the top category per kind.
    pub async fn dashboard_summary(&self, owner_id: i32) -> ResultEngine<DashboardSummary> {
        let total_income = self.kind_total(owner_id, CategoryKind::Income).await?;
        let total_expenses = self.kind_total(owner_id, CategoryKind::Expense).await?;
        let top_income_category = self.top_category(owner_id, CategoryKind::Income).await?;
        let top_expense_category = self.top_category(owner_id, CategoryKind::Expense).await?;

        Ok(DashboardSummary {
            total_income,
            total_expenses,
            net_balance: total_income - total_expenses,
            top_expense_category,
            top_income_category,
        })
    }

    async fn kind_total(&self, owner_id: i32, kind: CategoryKind) -> ResultEngine<f64> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COALESCE(SUM(e.amount), 0.0) AS total \
             FROM expenses e \
             INNER JOIN categories c ON c.id = e.category_id \
             WHERE e.user_id = ? AND c.kind = ?",
            vec![owner_id.into(), kind.as_str().into()],
        );
        let row = self.database.query_one(stmt).await?;
        Ok(row.and_then(|r| r.try_get("", "total").ok()).unwrap_or(0.0))
    }

    async fn top_category(
        &self,
        owner_id: i32,
        kind: CategoryKind,
    ) -> ResultEngine<Option<String>> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT c.name AS name, SUM(e.amount) AS total \
             FROM expenses e \
             INNER JOIN categories c ON c.id = e.category_id \
             WHERE e.user_id = ? AND c.kind = ? \
             GROUP BY c.id, c.name \
             ORDER BY total DESC \
             LIMIT 1",
            vec![owner_id.into(), kind.as_str().into()],
        );
        let row = self.database.query_one(stmt).await?;
        Ok(row.and_then(|r| r.try_get("", "name").ok()))
    }

    /// One row per category holding at least one expense (inner-join
    /// semantics), sorted by summed amount descending.
    pub async fn category_breakdown(
        &self,
        owner_id: i32,
    ) -> ResultEngine<Vec<CategoryBreakdownRow>> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT c.id AS category_id, c.name AS category_name, c.kind AS category_kind, \
                    SUM(e.amount) AS total_amount, COUNT(e.id) AS transaction_count \
             FROM expenses e \
             INNER JOIN categories c ON c.id = e.category_id \
             WHERE e.user_id = ? \
             GROUP BY c.id, c.name, c.kind \
             ORDER BY total_amount DESC",
            vec![owner_id.into()],
        );

        let rows = self.database.query_all(stmt).await?;
        rows.into_iter()
            .map(|row| {
                let kind: String = row.try_get("", "category_kind")?;
                Ok(CategoryBreakdownRow {
                    category_id: row.try_get("", "category_id")?,
                    category_name: row.try_get("", "category_name")?,
                    category_kind: CategoryKind::try_from(kind.as_str())?,
                    total_amount: row.try_get("", "total_amount")?,
                    transaction_count: row.try_get("", "transaction_count")?,
                })
            })
            .collect()
    }

    /// Income/expense totals per calendar month, newest month first, capped
    /// to the most recent `months` distinct month buckets.
    pub async fn monthly_summary(
        &self,
        owner_id: i32,
        months: u32,
    ) -> ResultEngine<Vec<MonthlyBucket>> {
        if !(1..=12).contains(&months) {
            return Err(EngineError::InvalidAmount(
                "months must be between 1 and 12".to_string(),
            ));
        }

        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT strftime('%Y-%m', e.date) AS month, c.kind AS kind, \
                    SUM(e.amount) AS total \
             FROM expenses e \
             INNER JOIN categories c ON c.id = e.category_id \
             WHERE e.user_id = ? \
             GROUP BY month, c.kind \
             ORDER BY month DESC",
            vec![owner_id.into()],
        );
        let rows = self.database.query_all(stmt).await?;

        // The cap counts distinct month keys, never raw grouped rows: a
        // month holding only income (or only expenses) still fills one
        // bucket. Rows arrive month-descending, so same-month rows are
        // adjacent and the loop can stop at the first excess month.
        let mut out: Vec<MonthlyBucket> = Vec::new();
        for row in rows {
            let month: String = row.try_get("", "month")?;
            let kind: String = row.try_get("", "kind")?;
            let kind = CategoryKind::try_from(kind.as_str())?;
            let total: f64 = row.try_get("", "total")?;

            match out.last_mut() {
                Some(last) if last.month == month => last.merge(kind, total),
                _ => {
                    if out.len() == months as usize {
                        break;
                    }
                    let mut bucket = MonthlyBucket {
                        month,
                        total_income: 0.0,
                        total_expenses: 0.0,
                        net_balance: 0.0,
                    };
                    bucket.merge(kind, total);
                    out.push(bucket);
                }
            }
        }

        Ok(out)
    }
}
