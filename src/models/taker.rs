// src/models/taker.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// DTO for requesting a taker token.
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(
        min = 1,
        max = 32,
        message = "Name length must be between 1 and 32 characters."
    ))]
    pub name: String,
}

/// Issued taker token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub taker_id: Uuid,
    /// The display name as it will appear on leaderboards.
    pub name: String,
    pub expires_in: u64,
}

/// Whoever holds a token. Every token gets its own `id`; display names may
/// repeat between takers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Taker {
    pub id: Uuid,
    pub name: String,
}

impl Taker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}
