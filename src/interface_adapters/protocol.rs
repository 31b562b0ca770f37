use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Response payload for the root welcome endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

// Response payload for the v1 health endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
}

// Uniform error envelope for unhandled failures. Built fresh per response;
// the timestamp serializes as RFC 3339.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub status_code: u16,
    pub timestamp: DateTime<Utc>,
}
