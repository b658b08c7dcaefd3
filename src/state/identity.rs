use dashmap::DashMap;
use uuid::Uuid;

/// Minimal identity provider mapping opaque session tokens to user ids.
#[derive(Default)]
pub struct IdentityProvider {
    sessions: DashMap<String, String>,
}

impl IdentityProvider {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `user_id` and return its token.
    pub fn sign_in(&self, user_id: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(token.clone(), user_id.to_owned());
        token
    }

    /// Revoke a session. Returns whether the token was known.
    pub fn sign_out(&self, token: &str) -> bool {
        self.sessions.remove(token).is_some()
    }

    /// User owning the session, if the token is still valid.
    pub fn resolve(&self, token: &str) -> Option<String> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_resolve_until_signed_out() {
        let identity = IdentityProvider::new();
        let token = identity.sign_in("alice");
        let other = identity.sign_in("alice");
        assert_ne!(token, other);
        assert_eq!(identity.resolve(&token).as_deref(), Some("alice"));

        assert!(identity.sign_out(&token));
        assert!(!identity.sign_out(&token));
        assert!(identity.resolve(&token).is_none());
        assert_eq!(identity.resolve(&other).as_deref(), Some("alice"));
    }
}
