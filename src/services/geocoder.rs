use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::Coordinates;
use crate::services::{Geocoder, LookupError};

/// Errors that can occur when talking to the geocoding API
#[derive(Debug, Error)]
pub enum GeocoderError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Nominatim-style HTTP geocoder
///
/// Calls `GET {endpoint}/search?q=...&format=json&limit=1` and reads the
/// first result's `lat`/`lon`. An empty result list means the address could
/// not be resolved. Resolved coordinates are kept in an in-memory cache;
/// unresolved lookups and failures are not cached.
pub struct HttpGeocoder {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
    cache: moka::future::Cache<String, Coordinates>,
}

impl HttpGeocoder {
    /// Create a new geocoder client
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
        cache_size: u64,
        cache_ttl: Duration,
    ) -> Result<Self, GeocoderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let cache = moka::future::CacheBuilder::new(cache_size)
            .time_to_live(cache_ttl)
            .build();

        Ok(Self {
            endpoint,
            api_key,
            client,
            cache,
        })
    }

    /// Resolve a free-form address to coordinates
    pub async fn resolve(&self, query: &str) -> Result<Option<Coordinates>, GeocoderError> {
        let key = query.trim().to_lowercase();
        if key.is_empty() {
            return Ok(None);
        }

        if let Some(coords) = self.cache.get(&key).await {
            tracing::trace!("Geocode cache hit: {}", key);
            return Ok(Some(coords));
        }

        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.endpoint.trim_end_matches('/'),
            urlencoding::encode(query.trim())
        );

        tracing::debug!("Geocoding via: {}", url);

        let mut request = self.client.get(&url);
        if let Some(api_key) = &self.api_key {
            request = request.query(&[("key", api_key)]);
        }
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(GeocoderError::ApiError(format!(
                "Geocoding failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        let results = json
            .as_array()
            .ok_or_else(|| GeocoderError::InvalidResponse("Expected a result array".into()))?;

        let Some(first) = results.first() else {
            tracing::debug!("No geocoding result for {}", key);
            return Ok(None);
        };

        let coords = Coordinates::new(coordinate_field(first, "lat")?, coordinate_field(first, "lon")?);
        self.cache.insert(key, coords).await;

        Ok(Some(coords))
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>, LookupError> {
        Ok(self.resolve(query).await?)
    }
}

/// Nominatim returns coordinates as strings; plain numbers are accepted too
fn coordinate_field(result: &Value, name: &str) -> Result<f64, GeocoderError> {
    let value = result
        .get(name)
        .ok_or_else(|| GeocoderError::InvalidResponse(format!("Missing {}", name)))?;

    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| GeocoderError::InvalidResponse(format!("Invalid {}: {}", name, value)))
}
