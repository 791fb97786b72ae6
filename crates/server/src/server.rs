use axum::{
    extract::{DefaultBodyLimit, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use sea_orm::DatabaseConnection;

use std::path::PathBuf;
use std::sync::Arc;

use crate::{analytics, auth, categories, expenses, receipts::ReceiptStore, user, ServerError};
use engine::Engine;

// Receipt limit plus multipart field overhead.
const MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

/// Runtime settings the HTTP layer needs beyond the engine itself.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub jwt_secret: String,
    pub receipts_dir: PathBuf,
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    pub(crate) jwt_secret: Arc<str>,
    pub(crate) receipts: ReceiptStore,
}

async fn require_auth(
    State(state): State<ServerState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(ServerError::unauthorized(
            "UNAUTHORIZED",
            "access token required",
        ));
    };

    let user = auth::verify_token(&state.jwt_secret, bearer.token())?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(engine: Engine, db: DatabaseConnection, config: ServerConfig) -> Router {
    let state = ServerState {
        engine: Arc::new(engine),
        db,
        jwt_secret: config.jwt_secret.into(),
        receipts: ReceiptStore::new(config.receipts_dir),
    };

    let protected = Router::new()
        .route("/user/profile", get(user::profile).put(user::update_profile))
        .route("/expenses", post(expenses::create).get(expenses::list))
        .route("/expenses/export", get(expenses::export_csv))
        .route("/expenses/bulk-delete", post(expenses::bulk_delete))
        .route(
            "/expenses/:id",
            put(expenses::update).delete(expenses::remove),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            put(categories::update).delete(categories::remove),
        )
        .route("/analytics/overview", get(analytics::overview))
        .route(
            "/analytics/charts/spending-by-category",
            get(analytics::spending_by_category),
        )
        .route(
            "/analytics/charts/monthly-trends",
            get(analytics::monthly_trends),
        )
        .route(
            "/analytics/predictions/forecast",
            get(analytics::forecast),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection, config: ServerConfig) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, config, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(engine, db, config)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, config, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
