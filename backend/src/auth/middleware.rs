//! Authentication middleware
//!
//! Provides an Axum extractor and a route-layer middleware, both backed by
//! the [`AuthGateway`](super::AuthGateway) held in application state.

use super::gateway::AuthenticatedIdentity;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use cve_registry_shared::AuthError;
use tracing::debug;

/// Authenticated caller, resolved from the `Authorization` header
///
/// If [`require_auth`] already ran for this request the identity it stored
/// is reused instead of authenticating twice.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthenticatedIdentity);

fn authorization_header(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AuthError::MalformedHeader)
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, ApiError> {
    let header = authorization_header(headers)?;
    let identity = state.gateway().resolve(header).await?;
    debug!(email = %identity.email, "User authenticated");
    Ok(CurrentUser(identity))
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let app_state = AppState::from_ref(state);
        authenticate(&app_state, &parts.headers).await
    }
}

/// Reject the request unless it carries valid credentials
///
/// Apply with `axum::middleware::from_fn_with_state` to gate a group of routes.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, request.headers()).await?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
