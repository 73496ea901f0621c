use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;

pub use auth::AuthKeys;
pub use server::{ServerState, router, run, run_with_listener, spawn_with_listener};

mod analytics;
mod auth;
mod categories;
mod expenses;
mod server;
mod user;

pub mod types {
    pub mod user {
        pub use api_types::user::{UserNew, UserView};
    }

    pub mod auth {
        pub use api_types::auth::{Credentials, TokenResponse};
    }

    pub mod category {
        pub use api_types::category::{CategoryNew, CategoryUpdate, CategoryView};
    }

    pub mod expense {
        pub use api_types::expense::{ExpenseListQuery, ExpenseNew, ExpenseUpdate, ExpenseView};
    }

    pub mod analytics {
        pub use api_types::analytics::{
            CategoryBreakdownRow, DashboardSummary, MonthlyQuery, MonthlySummary,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    /// Uniform 401: the body never says whether the token, the subject or
    /// the password was the problem.
    Unauthorized,
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidKind(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidDate(_)
        | EngineError::InvalidName(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "could not validate credentials".to_string(),
            ),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
