use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::models::scores::{Exclusion, RankedCandidate};

/// Response for the rank candidates endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankCandidatesResponse {
    #[serde(rename = "bookingId")]
    pub booking_id: Uuid,
    pub candidates: Vec<RankedCandidate>,
    pub excluded: Vec<Exclusion>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
