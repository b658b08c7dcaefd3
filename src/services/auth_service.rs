use tracing::info;

use crate::{
    dto::auth::{CurrentUser, SignInRequest, SignInResponse},
    error::ServiceError,
    state::SharedState,
};

/// Message of every 401.
pub const SIGN_IN_REQUIRED: &str = "sign in required";

/// Open a session for the requested user.
pub fn sign_in(state: &SharedState, request: SignInRequest) -> SignInResponse {
    let user_id = request.user_id.trim().to_owned();
    let token = state.identity().sign_in(&user_id);
    info!(user_id = %user_id, "user signed in");
    SignInResponse { user_id, token }
}

/// Close the session of `token`.
pub fn sign_out(state: &SharedState, token: Option<&str>) -> Result<(), ServiceError> {
    match token {
        Some(token) if state.identity().sign_out(token) => Ok(()),
        _ => Err(ServiceError::Unauthorized(SIGN_IN_REQUIRED.into())),
    }
}

/// Resolve the user of a session token.
pub fn authenticate(state: &SharedState, token: Option<&str>) -> Result<String, ServiceError> {
    token
        .and_then(|token| state.identity().resolve(token))
        .ok_or_else(|| ServiceError::Unauthorized(SIGN_IN_REQUIRED.into()))
}

/// Identity behind `token`, anonymous when it is missing or unknown.
pub fn current_user(state: &SharedState, token: Option<&str>) -> CurrentUser {
    CurrentUser {
        user_id: token.and_then(|token| state.identity().resolve(token)),
        is_loading: false,
    }
}
