use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::auth::{CurrentUser, SignInRequest, SignInResponse},
    error::AppError,
    services::auth_service,
    state::SharedState,
};

const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// Identifier of the signed-in user, inserted by [`require_user`].
#[derive(Debug, Clone)]
pub struct SessionUser(
    /// Authenticated user id.
    pub String,
);

/// Session token from `Authorization: Bearer` or `X-Session-Token`.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));
    bearer
        .or_else(|| {
            headers
                .get(SESSION_TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
        })
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Reject requests without a valid session and expose the user to handlers.
pub async fn require_user(
    State(state): State<SharedState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = auth_service::authenticate(&state, session_token(req.headers()))?;
    req.extensions_mut().insert(SessionUser(user_id));
    Ok(next.run(req).await)
}

/// Open a session for a user id.
#[utoipa::path(
    post,
    path = "/auth/sign-in",
    tag = "auth",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Session opened", body = SignInResponse),
        (status = 400, description = "Blank user id")
    )
)]
pub async fn sign_in(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SignInRequest>>,
) -> Json<SignInResponse> {
    Json(auth_service::sign_in(&state, payload))
}

/// Revoke the presented session.
#[utoipa::path(
    post,
    path = "/auth/sign-out",
    tag = "auth",
    responses(
        (status = 204, description = "Session revoked"),
        (status = 401, description = "Unknown session")
    )
)]
pub async fn sign_out(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    auth_service::sign_out(&state, session_token(&headers))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Report the user behind the presented session, if any.
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses((status = 200, description = "Current user", body = CurrentUser))
)]
pub async fn me(State(state): State<SharedState>, headers: HeaderMap) -> Json<CurrentUser> {
    Json(auth_service::current_user(&state, session_token(&headers)))
}

/// Session routes, open to anonymous callers.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/auth/sign-in", post(sign_in))
        .route("/auth/sign-out", post(sign_out))
        .route("/auth/me", get(me))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_takes_precedence_over_session_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(SESSION_TOKEN_HEADER, HeaderValue::from_static("abc"));
        assert_eq!(session_token(&headers), Some("abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer xyz"));
        assert_eq!(session_token(&headers), Some("xyz"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer  "));
        assert_eq!(session_token(&headers), None);
    }
}
