use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use std::sync::Arc;

use crate::{analytics, auth::AuthKeys, categories, expenses, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub auth: Arc<AuthKeys>,
}

/// Auth gate for every protected route.
///
/// Bearer token → subject email → persisted user. A missing header, a bad
/// or expired token, and a subject with no matching user all collapse into
/// the same bare 401: the response must not reveal which check failed.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(auth_header) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let subject = state
        .auth
        .validate(auth_header.token())
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let user = state
        .engine
        .user_by_email(&subject)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

async fn health() -> &'static str {
    "ok"
}

pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(user::me))
        .route("/categories", post(categories::create).get(categories::list))
        .route(
            "/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/expenses", post(expenses::create).get(expenses::list))
        .route(
            "/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route("/analytics/dashboard", get(analytics::dashboard))
        .route("/analytics/by-category", get(analytics::by_category))
        .route("/analytics/monthly", get(analytics::monthly))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/auth/register", post(user::register))
        .route("/auth/login", post(user::login))
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
}

pub async fn run(engine: Engine, auth_keys: AuthKeys) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, auth_keys, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    auth_keys: AuthKeys,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        auth: Arc::new(auth_keys),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    auth_keys: AuthKeys,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, auth_keys, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
