// Service exports
pub mod geocoder;
pub mod match_service;
pub mod postgres;

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AvailabilitySlot, CandidateQuery, Coordinates, Provider};

pub use geocoder::{HttpGeocoder, GeocoderError};
pub use match_service::{MatchService, MatchError};
pub use postgres::{PostgresClient, PostgresError};

/// Failure of a single collaborator lookup
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Database error: {0}")]
    Postgres(#[from] PostgresError),

    #[error("Geocoder error: {0}")]
    Geocoder(#[from] GeocoderError),

    #[error("Lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("Collaborator unavailable: {0}")]
    Unavailable(String),
}

/// Source of candidate providers for a booking
#[async_trait]
pub trait ProviderDirectory: Send + Sync {
    /// Active, approved providers for the query's city or radius
    async fn find_candidates(&self, query: &CandidateQuery) -> Result<Vec<Provider>, LookupError>;
}

/// Availability slots, fetched for all candidates at once
#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn slots_for(
        &self,
        provider_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<AvailabilitySlot>>, LookupError>;
}

/// Live count of non-terminal assignments, fetched for all candidates at once.
/// Providers with no active assignment may be absent from the map.
#[async_trait]
pub trait WorkloadCounter: Send + Sync {
    async fn active_counts(&self, provider_ids: &[Uuid]) -> Result<HashMap<Uuid, u32>, LookupError>;
}

/// Address or locality to coordinates. `Ok(None)` means unresolved.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, LookupError>;
}
