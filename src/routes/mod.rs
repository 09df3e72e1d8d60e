// Route exports
pub mod matches;

use actix_web::web;

/// Mount the versioned API: `/api/v1/health` and `/api/v1/matches/rank`
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure),
    );
}
