use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE, ORIGIN},
    },
    middleware,
    routing::{get, post, put},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use std::{io, sync::Arc, time::Duration};

use crate::{auth, categories, exchange, profile, token::TokenIssuer, transactions, wallets};
use engine::Engine;

const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// Settings the HTTP layer needs besides the engine.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub tokens: Arc<TokenIssuer>,
}

impl ServerState {
    pub fn new(engine: Engine, config: &ServerConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            tokens: Arc::new(TokenIssuer::new(&config.jwt_secret)),
        }
    }
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer, io::Error> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin.trim()).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("invalid CORS origin: {origin}"),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE))
}

async fn health() -> &'static str {
    "ok"
}

pub fn router(state: ServerState, cors_origins: &[String]) -> Result<Router, io::Error> {
    let api = Router::new()
        .route("/profile", get(profile::get).put(profile::update))
        .route("/profile/password", put(profile::change_password))
        .route("/wallets", get(wallets::list).post(wallets::wallet_new))
        .route(
            "/wallets/{id}",
            get(wallets::get)
                .put(wallets::wallet_update)
                .delete(wallets::wallet_delete),
        )
        .route(
            "/categories",
            get(categories::list).post(categories::category_new),
        )
        .route(
            "/categories/{id}",
            get(categories::get)
                .put(categories::category_update)
                .delete(categories::category_delete),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::transaction_new),
        )
        .route("/exchange-rates", get(exchange::rates))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_account,
        ));

    Ok(Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .nest("/api", api)
        .layer(cors_layer(cors_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

pub async fn run(engine: Engine, config: ServerConfig, addr: &str) -> Result<(), io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(|err| {
        tracing::error!("failed to bind server listener on {addr}: {err}");
        err
    })?;
    run_with_listener(engine, config, listener).await
}

pub async fn run_with_listener(
    engine: Engine,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), io::Error> {
    let addr = listener.local_addr()?;
    let state = ServerState::new(engine, &config);
    let app = router(state, &config.cors_origins)?;

    tracing::info!("Server listening on {}", addr);
    axum::serve(listener, app).await
}
