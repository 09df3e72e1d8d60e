use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ErrorResponse, HealthResponse, RankCandidatesRequest, RankCandidatesResponse, RankOptions};
use crate::services::{MatchError, MatchService, PostgresClient};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: MatchService,
    pub postgres: Arc<PostgresClient>,
    pub default_top_k: Option<usize>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/rank", web::post().to(rank_candidates));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Resolve the effective top-K: auto-assignment wants only the head,
/// otherwise the request wins over the configured default
fn effective_top_k(req: &RankCandidatesRequest, default_top_k: Option<usize>) -> Option<usize> {
    if req.auto_assign {
        Some(1)
    } else {
        req.top_k.map(usize::from).or(default_top_k)
    }
}

/// Rank candidates endpoint
///
/// POST /api/v1/matches/rank
///
/// Request body:
/// ```json
/// {
///   "booking": {
///     "id": "uuid",
///     "scheduledDate": "2024-06-03",
///     "scheduledTime": "10:00:00",
///     "serviceType": "DEEP_CLEANING",
///     "addons": { "windowCleaning": true },
///     "address": { "street": "string", "city": "string" }
///   },
///   "topK": 10,
///   "autoAssign": false
/// }
/// ```
async fn rank_candidates(
    state: web::Data<AppState>,
    req: web::Json<RankCandidatesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for rank request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let options = RankOptions {
        top_k: effective_top_k(&req, state.default_top_k),
    };

    tracing::info!("Ranking candidates for booking: {}, top_k: {:?}", req.booking.id, options.top_k);

    match state.service.rank_candidates(&req.booking, options).await {
        Ok(ranking) => HttpResponse::Ok().json(RankCandidatesResponse {
            booking_id: ranking.booking_id,
            candidates: ranking.candidates,
            excluded: ranking.excluded,
            total_candidates: ranking.total_candidates,
        }),
        Err(e) => {
            tracing::error!("Failed to rank candidates for {}: {}", req.booking.id, e);
            directory_failure(&e)
        }
    }
}

/// 504 when the directory timed out, 502 for any other directory failure
fn directory_failure(e: &MatchError) -> HttpResponse {
    let (mut response, status_code) = match e {
        MatchError::DirectoryTimeout(_) => (HttpResponse::GatewayTimeout(), 504),
        MatchError::Directory(_) => (HttpResponse::BadGateway(), 502),
    };
    response.json(ErrorResponse {
        error: "Failed to fetch candidates".to_string(),
        message: e.to_string(),
        status_code,
    })
}
