//! Categories API endpoints.

use api_types::category::{CategoryNew, CategoryUpdate, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use engine::{CategoryKind, CategoryPatch, categories, users};

fn map_category(category: categories::Model) -> CategoryView {
    CategoryView {
        id: category.id,
        user_id: category.user_id,
        name: category.name,
        kind: category.kind,
    }
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let kind = CategoryKind::try_from(payload.kind.as_str())?;
    let category = state
        .engine
        .create_category(user.id, &payload.name, kind)
        .await?;

    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .list_categories(user.id)
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(categories))
}

pub async fn get(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(category_id): Path<i32>,
) -> Result<Json<CategoryView>, ServerError> {
    let category = state.engine.category(user.id, category_id).await?;
    Ok(Json(map_category(category)))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(category_id): Path<i32>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    if payload.name.is_none() && payload.kind.is_none() {
        return Err(ServerError::Generic(
            "provide at least one of name or type".to_string(),
        ));
    }

    let kind = payload
        .kind
        .as_deref()
        .map(CategoryKind::try_from)
        .transpose()?;
    let category = state
        .engine
        .update_category(
            user.id,
            category_id,
            CategoryPatch {
                name: payload.name,
                kind,
            },
        )
        .await?;

    Ok(Json(map_category(category)))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(category_id): Path<i32>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(user.id, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
