use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::domain::status::StatusService;
use shared::{Actor, UserRole};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub status_service: StatusService,
}

impl AppState {
    pub fn new(status_service: StatusService) -> Self {
        Self { status_service }
    }
}

/// Actor context for the status endpoints. The service runs behind the
/// deployment's auth proxy, so identity arrives as explicit parameters
/// instead of ambient session state.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StatusQuery {
    pub role: UserRole,
    pub user_id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    /// Child selected by a parent; ignored for student actors.
    #[serde(default)]
    pub child_id: Option<i64>,
    /// Explicit `"YYYY-MM"` month for the drill-down table.
    #[serde(default)]
    pub month: Option<String>,
}

impl StatusQuery {
    fn actor(&self) -> Actor {
        Actor {
            id: self.user_id,
            name: self.name.clone().unwrap_or_default(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Axum handler for GET /api/status
pub async fn get_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> impl IntoResponse {
    info!("GET /api/status - query: {:?}", query);

    match state
        .status_service
        .overview(&query.actor(), query.child_id)
        .await
    {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => {
            tracing::error!("Error building status view: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error building status view").into_response()
        }
    }
}

/// Axum handler for GET /api/status/groups/:group_id/table
pub async fn get_group_table(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Query(query): Query<StatusQuery>,
) -> impl IntoResponse {
    info!("GET /api/status/groups/{}/table - query: {:?}", group_id, query);

    match state
        .status_service
        .group_monthly_table(&query.actor(), query.child_id, group_id, query.month.as_deref())
        .await
    {
        Ok(Some(table)) => (StatusCode::OK, Json(table)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "No monthly data for this group").into_response(),
        Err(e) => {
            tracing::error!("Error building monthly table: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error building monthly table").into_response()
        }
    }
}
