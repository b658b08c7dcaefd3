use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::dto::validation::validate_not_blank;

/// Sign-in payload.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SignInRequest {
    /// User to sign in as.
    #[validate(length(max = 128), custom(function = validate_not_blank))]
    pub user_id: String,
}

/// Opened session.
#[derive(Debug, Serialize, ToSchema)]
pub struct SignInResponse {
    /// Signed-in user.
    pub user_id: String,
    /// Session token to send as `Authorization: Bearer <token>` or `X-Session-Token`.
    pub token: String,
}

/// Current identity as seen by the client, mirroring a sign-in widget.
#[derive(Debug, Serialize, ToSchema)]
pub struct CurrentUser {
    /// Signed-in user, `null` when anonymous.
    pub user_id: Option<String>,
    /// Always `false`; sessions resolve synchronously.
    pub is_loading: bool,
}
