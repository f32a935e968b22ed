//! User routes: registration, login, and the current user
//!
//! # Performance Optimizations
//!
//! - Uses pre-computed JWT keys from AppState (no per-request allocation)
//! - Password hashing runs on blocking thread pool (doesn't block async runtime)

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::services::UserService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use cve_registry_shared::{AccessToken, CreateUserRequest, LoginRequest, User};

/// Create user routes
///
/// Registration answers with and without the trailing slash.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/users/", post(register))
        .route("/users/token", post(login))
        .route("/users/me", get(current_user))
}

/// Register a new user
///
/// POST /users/
///
/// Answers 200 with the profile; a taken email is a 400.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Json<User>> {
    let user = UserService::register(state.users(), req).await?;
    Ok(Json(user))
}

/// Exchange email and password for a bearer token
///
/// POST /users/token
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AccessToken>> {
    let ttl = state.config().auth.login_token_ttl();
    let token = UserService::login(state.gateway(), ttl, &req.email, &req.password).await?;
    Ok(Json(token))
}

/// GET /users/me
///
/// # Authentication
/// Requires a Bearer token or Basic credentials.
async fn current_user(CurrentUser(identity): CurrentUser) -> Json<User> {
    Json(identity.into())
}
