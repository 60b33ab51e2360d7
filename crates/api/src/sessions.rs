//! Session token lookup.
//!
//! The HTTP layer resolves the `Authorization` header to a user id before
//! calling into checkout. Login, logout and token issuance live elsewhere.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use common::UserId;
use tokio::sync::RwLock;

use crate::AppState;
use crate::error::ApiError;

/// Resolves an opaque session token to the user it belongs to.
#[async_trait]
pub trait SessionLookup: Send + Sync {
    async fn user_for_token(&self, token: &str) -> Option<UserId>;
}

/// Session table held in memory.
#[derive(Debug, Default)]
pub struct InMemorySessions {
    tokens: RwLock<HashMap<String, UserId>>,
}

impl InMemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions for the demo accounts: token `test` for user `test` and
    /// token `admin` for user `admin`.
    pub fn with_demo_users() -> Self {
        let tokens = ["test", "admin"]
            .into_iter()
            .map(|name| (name.to_string(), UserId::new(name)))
            .collect();
        Self {
            tokens: RwLock::new(tokens),
        }
    }

    #[cfg(test)]
    async fn insert(&self, token: impl Into<String>, user_id: UserId) {
        self.tokens.write().await.insert(token.into(), user_id);
    }
}

#[async_trait]
impl SessionLookup for InMemorySessions {
    async fn user_for_token(&self, token: &str) -> Option<UserId> {
        self.tokens.read().await.get(token).cloned()
    }
}

/// The caller resolved from the request's session token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserId);

impl FromRequestParts<std::sync::Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &std::sync::Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.trim_start_matches("Bearer ").trim())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Missing session token".to_string()))?;

        state
            .sessions
            .user_for_token(token)
            .await
            .map(CurrentUser)
            .ok_or_else(|| ApiError::Unauthorized("Unknown session token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_tokens_resolve() {
        let sessions = InMemorySessions::with_demo_users();
        assert_eq!(
            sessions.user_for_token("admin").await,
            Some(UserId::new("admin"))
        );
        assert_eq!(sessions.user_for_token("guest").await, None);
    }

    #[tokio::test]
    async fn inserted_token_resolves() {
        let sessions = InMemorySessions::new();
        assert_eq!(sessions.user_for_token("t0k3n").await, None);

        sessions.insert("t0k3n", UserId::new("alice")).await;
        assert_eq!(
            sessions.user_for_token("t0k3n").await,
            Some(UserId::new("alice"))
        );
    }
}
