//! Analytics API endpoints (read-only).

use api_types::analytics::{CategoryBreakdownRow, DashboardSummary, MonthlyQuery, MonthlySummary};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{ServerError, server::ServerState};
use engine::users;

const DEFAULT_MONTHS: u32 = 6;

pub async fn dashboard(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<DashboardSummary>, ServerError> {
    let summary = state.engine.dashboard_summary(user.id).await?;

    Ok(Json(DashboardSummary {
        total_income: summary.total_income,
        total_expenses: summary.total_expenses,
        net_balance: summary.net_balance,
        top_expense_category: summary.top_expense_category,
        top_income_category: summary.top_income_category,
    }))
}

pub async fn by_category(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryBreakdownRow>>, ServerError> {
    let rows = state
        .engine
        .category_breakdown(user.id)
        .await?
        .into_iter()
        .map(|row| CategoryBreakdownRow {
            category_id: row.category_id,
            category_name: row.category_name,
            category_kind: row.category_kind.as_str().to_string(),
            total_amount: row.total_amount,
            transaction_count: row.transaction_count,
        })
        .collect();

    Ok(Json(rows))
}

pub async fn monthly(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<Vec<MonthlySummary>>, ServerError> {
    let months = query.months.unwrap_or(DEFAULT_MONTHS);
    let buckets = state
        .engine
        .monthly_summary(user.id, months)
        .await?
        .into_iter()
        .map(|bucket| MonthlySummary {
            month: bucket.month,
            total_income: bucket.total_income,
            total_expenses: bucket.total_expenses,
            net_balance: bucket.net_balance,
        })
        .collect();

    Ok(Json(buckets))
}
