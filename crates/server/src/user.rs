//! Registration, login and identity endpoints.

use api_types::{
    auth::{Credentials, TokenResponse},
    user::{UserNew, UserView},
};
use axum::{Extension, Form, Json, extract::State, http::StatusCode};
use chrono::Duration;

use crate::{ServerError, auth, server::ServerState};
use engine::users;

const MIN_PASSWORD_LEN: usize = 8;

fn map_user(user: users::Model) -> UserView {
    UserView {
        id: user.id,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        created_at: user.created_at,
    }
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(ServerError::Generic(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let password_hash = auth::hash_password(&payload.password)
        .map_err(|_| ServerError::Generic("failed to hash password".to_string()))?;

    let user = state
        .engine
        .register_user(
            &payload.email,
            &payload.first_name,
            &payload.last_name,
            &password_hash,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(map_user(user))))
}

/// Login with form-encoded credentials (`username` carries the email).
pub async fn login(
    State(state): State<ServerState>,
    Form(payload): Form<Credentials>,
) -> Result<Json<TokenResponse>, ServerError> {
    // Unknown email and wrong password produce the same answer.
    let Some(user) = state.engine.user_by_email(&payload.username).await? else {
        return Err(ServerError::Unauthorized);
    };
    if !auth::verify_password(&payload.password, &user.password_hash) {
        return Err(ServerError::Unauthorized);
    }

    let token = state
        .auth
        .issue_with_ttl(&user.email, Duration::minutes(auth::LOGIN_TOKEN_TTL_MINUTES))
        .map_err(|_| ServerError::Generic("failed to issue token".to_string()))?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
    }))
}

pub async fn me(Extension(user): Extension<users::Model>) -> Json<UserView> {
    Json(map_user(user))
}
