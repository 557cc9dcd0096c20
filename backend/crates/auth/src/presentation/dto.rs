//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::token_codec::TokenPair;

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
}

/// Sign up response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Login / Refresh
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token pair returned by login and refresh
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

/// Refresh answered without rotating
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StillValidResponse {
    pub still_valid: bool,
}

/// Refresh response: a new pair, or `{"stillValid": true}`
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RefreshResponse {
    Rotated(TokenPairResponse),
    StillValid(StillValidResponse),
}

// ============================================================================
// Current Account
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: i64,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_response_shapes() {
        let rotated = RefreshResponse::Rotated(TokenPairResponse {
            access_token: "a".into(),
            refresh_token: "r".into(),
        });
        assert_eq!(
            serde_json::to_value(&rotated).unwrap(),
            serde_json::json!({"accessToken": "a", "refreshToken": "r"})
        );

        let still = RefreshResponse::StillValid(StillValidResponse { still_valid: true });
        assert_eq!(
            serde_json::to_value(&still).unwrap(),
            serde_json::json!({"stillValid": true})
        );
    }

    #[test]
    fn test_sign_up_response_is_camel_case() {
        let value = serde_json::to_value(SignUpResponse {
            id: 1,
            email: "a@example.com".into(),
            created_at: Utc::now(),
        })
        .unwrap();
        assert!(value.get("createdAt").is_some());
        assert_eq!(value["id"], 1);
    }
}
