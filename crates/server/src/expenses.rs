//! Expenses API endpoints.

use api_types::expense::{ExpenseListQuery, ExpenseNew, ExpenseUpdate, ExpenseView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use engine::{DEFAULT_LIST_LIMIT, ExpenseListFilter, ExpensePatch, expenses, users};

fn map_expense(expense: expenses::Model) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        user_id: expense.user_id,
        category_id: expense.category_id,
        amount: expense.amount,
        description: expense.description,
        date: expense.date,
        created_at: expense.created_at,
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = state
        .engine
        .create_expense(
            user.id,
            payload.category_id,
            payload.amount,
            &payload.description,
            payload.date,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(query): Query<ExpenseListQuery>,
) -> Result<Json<Vec<ExpenseView>>, ServerError> {
    let filter = ExpenseListFilter {
        skip: query.skip.unwrap_or(0),
        limit: query.limit.unwrap_or(DEFAULT_LIST_LIMIT),
        category_id: query.category_id,
    };

    let expenses = state
        .engine
        .list_expenses(user.id, &filter)
        .await?
        .into_iter()
        .map(map_expense)
        .collect();

    Ok(Json(expenses))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<i32>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state.engine.expense(user.id, expense_id).await?;
    Ok(Json(map_expense(expense)))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<i32>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<ExpenseView>, ServerError> {
    let expense = state
        .engine
        .update_expense(
            user.id,
            expense_id,
            ExpensePatch {
                category_id: payload.category_id,
                amount: payload.amount,
                description: payload.description,
                date: payload.date,
            },
        )
        .await?;

    Ok(Json(map_expense(expense)))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_expense(user.id, expense_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
