//! MentorMatch API - mentorship matching REST backend.
//!
//! The main entry point for the MentorMatch API service.

mod config;
mod domain;
mod error;
mod middleware;
mod state;

#[cfg(test)]
mod test_utils;

use std::net::SocketAddr;

use axum::{
    http::{header, Method},
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{create_db_pool, Config};
use crate::domain::{auth, health, matching, mentors, profile};
use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mentormatch_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();

    tracing::info!("Starting MentorMatch API");
    tracing::info!("Environment: {}", config.environment);

    // Create database pool
    tracing::info!("Connecting to database...");
    let db_pool = create_db_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    // Run migrations
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&db_pool).await?;
    tracing::info!("Migrations complete");

    // Create app state
    let state = AppState::new(db_pool, config.clone());

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware.
fn create_router(state: AppState) -> Router {
    // Health routes (no auth required)
    let health_routes = Router::new()
        .route("/", get(health::health_check))
        .route("/live", get(health::liveness))
        .route("/ready", get(health::readiness));

    // Public API routes
    let public_api_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login));

    // Protected API routes
    let protected_api_routes = Router::new()
        .route("/me", get(profile::me))
        .route("/profile", put(profile::update_profile))
        .route("/mentors", get(mentors::list_mentors))
        .route("/match-requests", post(matching::create_request))
        .route("/match-requests/incoming", get(matching::incoming_requests))
        .route("/match-requests/outgoing", get(matching::outgoing_requests))
        .route("/match-requests/{id}/accept", put(matching::accept_request))
        .route("/match-requests/{id}/reject", put(matching::reject_request))
        .route("/match-requests/{id}", delete(matching::cancel_request))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine API routes
    let api_routes = Router::new()
        .merge(public_api_routes)
        .merge(protected_api_routes);

    // Profile images are public; missing images redirect to a placeholder
    let image_routes = Router::new().route("/images/{role}/{id}", get(profile::profile_image));

    // CORS configuration - permissive for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
        ]);

    // Main router
    // Note: Layers are applied bottom-up, so CORS must be last to wrap everything
    Router::new()
        .nest("/health", health_routes)
        .nest("/api", api_routes)
        .merge(image_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
