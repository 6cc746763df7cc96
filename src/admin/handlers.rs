use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::httpfile::Route;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub directory: String,
    /// `None` until the route cache has been populated.
    pub routes: Option<usize>,
}

#[derive(Serialize)]
pub struct ReloadSummary {
    pub routes: usize,
}

type AdminError = (StatusCode, String);

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let routes = if state.store.is_populated() {
        state.store.get_routes().await.ok().map(|r| r.len())
    } else {
        None
    };

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        directory: state.store.directory().display().to_string(),
        routes,
    })
}

pub async fn get_routes(State(state): State<AppState>) -> Result<Json<Vec<Route>>, AdminError> {
    let routes = state
        .store
        .get_routes()
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(routes.to_vec()))
}

pub async fn post_reload(State(state): State<AppState>) -> Result<Json<ReloadSummary>, AdminError> {
    match state.store.reload().await {
        Ok(routes) => {
            tracing::info!(routes = routes.len(), "Route definitions reloaded via admin API");
            Ok(Json(ReloadSummary { routes: routes.len() }))
        }
        Err(e) => {
            tracing::error!(error = %e, "Admin reload failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
