//! CVE routes
//!
//! Mounted behind `require_auth`; handlers assume an authenticated caller.

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::services::CveService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use cve_registry_shared::{CreateCveRequest, Cve, CveListQuery, UpdateCveRequest};
use tracing::debug;

/// Create CVE routes
///
/// The collection answers with and without the trailing slash.
pub fn cve_routes() -> Router<AppState> {
    Router::new()
        .route("/cves", get(list_cves).post(create_cve))
        .route("/cves/", get(list_cves).post(create_cve))
        .route(
            "/cves/:cve_id",
            get(get_cve).put(update_cve).delete(delete_cve),
        )
}

/// GET /cves/?skip=0&limit=100
async fn list_cves(
    State(state): State<AppState>,
    Query(query): Query<CveListQuery>,
) -> ApiResult<Json<Vec<Cve>>> {
    let cves = CveService::list(state.cves(), &query).await?;
    Ok(Json(cves))
}

/// GET /cves/{cve_id}
async fn get_cve(
    State(state): State<AppState>,
    Path(cve_id): Path<String>,
) -> ApiResult<Json<Cve>> {
    let cve = CveService::get(state.cves(), &cve_id).await?;
    Ok(Json(cve))
}

/// POST /cves/
async fn create_cve(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Json(req): Json<CreateCveRequest>,
) -> ApiResult<(StatusCode, Json<Cve>)> {
    debug!(email = %identity.email, cve_id = %req.cve_id, "Creating CVE");
    let cve = CveService::create(state.cves(), req).await?;
    Ok((StatusCode::CREATED, Json(cve)))
}

/// PUT /cves/{cve_id}
async fn update_cve(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(cve_id): Path<String>,
    Json(changes): Json<UpdateCveRequest>,
) -> ApiResult<Json<Cve>> {
    debug!(email = %identity.email, %cve_id, "Updating CVE");
    let cve = CveService::update(state.cves(), &cve_id, changes).await?;
    Ok(Json(cve))
}

/// DELETE /cves/{cve_id}
async fn delete_cve(
    State(state): State<AppState>,
    CurrentUser(identity): CurrentUser,
    Path(cve_id): Path<String>,
) -> ApiResult<Json<Cve>> {
    debug!(email = %identity.email, %cve_id, "Deleting CVE");
    let cve = CveService::delete(state.cves(), &cve_id).await?;
    Ok(Json(cve))
}
