// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{attempt, auth, exam},
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, exams, attempts).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (attempt service, config).
pub fn create_router(state: AppState) -> Router {
    let allowed = &state.config.allowed_origins;
    let origins = if allowed.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed.iter().filter_map(|origin| {
            match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            }
        }))
    };

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let auth_routes = Router::new().route("/token", post(auth::issue_token));

    let exam_routes = Router::new()
        .route("/", get(exam::list_exams))
        .route("/{id}", get(exam::get_exam))
        .route("/{id}/leaderboard", get(exam::get_leaderboard))
        // Protected: starting an attempt needs a taker
        .merge(
            Router::new()
                .route("/{id}/attempts", post(attempt::start_attempt))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth_middleware,
                )),
        );

    let attempt_routes = Router::new()
        .route(
            "/{id}",
            get(attempt::get_attempt).delete(attempt::abandon_attempt),
        )
        .route("/{id}/answers", put(attempt::select_answer))
        .route("/{id}/navigate", post(attempt::navigate))
        .route("/{id}/submit", post(attempt::submit_attempt))
        .route("/{id}/report", get(attempt::get_report))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/exams", exam_routes)
        .nest("/api/attempts", attempt_routes)
        // Global Middleware (applied from top to bottom)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        config::{Config, SubmitPolicy},
        engine::{
            leaderboard::Leaderboard,
            notifier::TracingNotifier,
            provider::{Catalog, CatalogProvider},
        },
        services::attempts::AttemptService,
    };

    fn app() -> Router {
        let config = Config {
            jwt_secret: "router_test_secret".to_string(),
            jwt_expiration: 600,
            rust_log: "error".to_string(),
            bind_addr: ([127, 0, 0, 1], 0).into(),
            exam_catalog: None,
            submit_policy: SubmitPolicy::Immediate,
            attempt_retention_seconds: 60,
            allowed_origins: vec!["not a header\n".to_string()],
        };
        let attempts = AttemptService::new(
            Arc::new(CatalogProvider::new(Catalog::demo().unwrap().exams).unwrap()),
            Arc::new(Leaderboard::new()),
            Arc::new(TracingNotifier),
            config.submit_policy,
        );
        create_router(AppState { attempts, config })
    }

    #[tokio::test]
    async fn test_attempt_routes_require_token() {
        let response = app()
            .oneshot(
                Request::post("/api/exams/rust-fundamentals/attempts")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 401);
    }

    #[tokio::test]
    async fn test_exam_listing_is_public() {
        let response = app()
            .oneshot(Request::get("/api/exams").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }
}
