//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all mock handler
//! - Mount the admin API when enabled
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch requests to the route store and matcher
//! - Serve canned responses or the fall-through response

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin;
use crate::config::MockConfig;
use crate::http::request::{
    log_request, match_request, propagate_request_id_layer, request_id, set_request_id_layer,
};
use crate::http::response::{fallback_response, route_response};
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;
use crate::routing::{MatchResult, RouteMatcher};
use crate::store::RouteStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RouteStore>,
    pub matcher: Arc<RouteMatcher>,
    pub config: Arc<MockConfig>,
}

/// HTTP server for the mock engine.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server over an existing route store.
    pub fn new(config: MockConfig, store: Arc<RouteStore>) -> Self {
        let state = AppState {
            store,
            matcher: Arc::new(RouteMatcher::new()),
            config: Arc::new(config),
        };

        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let request_timeout = Duration::from_secs(state.config.timeouts.request_secs);

        let mut router = Router::new()
            .route("/", any(mock_handler))
            .route("/{*path}", any(mock_handler));

        if state.config.admin.enabled {
            router = router.merge(admin::admin_router(state.clone()));
        }

        router.with_state(state).layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(request_timeout))
                .layer(propagate_request_id_layer()),
        )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            admin = self.state.config.admin.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &MockConfig {
        &self.state.config
    }
}

/// Main mock handler.
/// Looks up a route and serves its canned response, or falls through.
async fn mock_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request = if state.config.observability.log_requests {
        log_request(request).await
    } else {
        request
    };

    let id = request_id(request.headers()).to_string();
    let descriptor = match_request(&request);

    tracing::debug!(
        request_id = %id,
        method = %descriptor.method,
        path = %descriptor.path,
        query = %descriptor.query,
        "Matching request"
    );

    let routes = match state.store.get_routes().await {
        Ok(routes) => routes,
        Err(e) => {
            tracing::error!(request_id = %id, error = %e, "Failed to load route definitions");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to load route definitions: {}", e),
            )
                .into_response();
        }
    };

    let lookup_start = Instant::now();
    let result = state.matcher.match_request(&routes, &descriptor);
    metrics::record_request(&descriptor.method, result.is_match(), lookup_start);

    match result {
        MatchResult::Matched { route, variables, .. } => {
            tracing::info!(
                request_id = %id,
                method = %descriptor.method,
                path = %descriptor.path,
                file = %route.file_name,
                status = route.status_code,
                "Serving canned response"
            );
            route_response(route, &variables)
        }
        MatchResult::NoMatch => {
            tracing::warn!(request_id = %id, path = %descriptor.path, "No route matched");
            fallback_response(&state.config.fallback)
        }
    }
}
