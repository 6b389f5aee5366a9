use crate::core::{EngineError, MatchEngine};
use crate::models::{
    CandidateView, ErrorResponse, HealthResponse, ProcessSwipeRequest, ProcessSwipeResponse,
    RankCandidatesRequest, RankCandidatesResponse, SwipeDecision, UnreadCountResponse,
};
use crate::services::PostgresStore;
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MatchEngine>,
    pub postgres: Arc<PostgresStore>,
}

/// Configure all matching routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/candidates/rank", web::post().to(rank_candidates))
        .route("/swipes", web::post().to(process_swipe))
        .route("/unread", web::get().to(unread_count));
}

fn engine_error_response(err: EngineError) -> HttpResponse {
    match err {
        EngineError::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse {
            error: "not_found".to_string(),
            message,
            status_code: 404,
        }),
        EngineError::InvalidInput(message) => HttpResponse::BadRequest().json(ErrorResponse {
            error: "invalid_input".to_string(),
            message,
            status_code: 400,
        }),
        EngineError::Repository(message) => {
            tracing::error!("Repository failure: {}", message);
            HttpResponse::ServiceUnavailable().json(ErrorResponse {
                error: "store_unavailable".to_string(),
                message,
                status_code: 503,
            })
        }
    }
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

/// Rank candidates endpoint
///
/// POST /api/v1/candidates/rank
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "limit": 20
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

    // Cap at 100 to prevent excessive queries; the ranker applies its own
    // configured cap on top
    let limit = req.limit.unwrap_or(20).min(100) as usize;

    tracing::info!("Ranking candidates for user: {}, limit: {}", req.user_id, limit);

    match state.engine.rank_candidates(&req.user_id, limit).await {
        Ok(ranked) => {
            let total_results = ranked.len();
            let candidates: Vec<CandidateView> =
                ranked.into_iter().map(CandidateView::from).collect();
            HttpResponse::Ok().json(RankCandidatesResponse {
                candidates,
                total_results,
            })
        }
        Err(e) => engine_error_response(e),
    }
}

/// Process swipe endpoint
///
/// POST /api/v1/swipes
///
/// Request body:
/// ```json
/// {
///   "actorId": "string",
///   "targetId": "string",
///   "decision": "like|pass"
/// }
/// ```
async fn process_swipe(
    state: web::Data<AppState>,
    req: web::Json<ProcessSwipeRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let decision = match req.decision.to_lowercase().as_str() {
        "like" => SwipeDecision::Like,
        "pass" => SwipeDecision::Pass,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid decision".to_string(),
                message: "Decision must be one of: like, pass".to_string(),
                status_code: 400,
            });
        }
    };

    match state
        .engine
        .process_swipe(&req.actor_id, &req.target_id, decision)
        .await
    {
        Ok(outcome) => HttpResponse::Ok().json(ProcessSwipeResponse {
            matched: outcome.matched,
            match_record: outcome.record.map(Into::into),
            target_available: outcome.target_available,
        }),
        Err(e) => engine_error_response(e),
    }
}

/// Unread count endpoint
///
/// GET /api/v1/unread?userId={userId}
async fn unread_count(
    state: web::Data<AppState>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let user_id = match query.get("userId") {
        Some(id) => id,
        None => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Missing userId parameter".to_string(),
                message: "userId query parameter is required".to_string(),
                status_code: 400,
            });
        }
    };

    match state.engine.unread_count(user_id).await {
        Ok(unread) => HttpResponse::Ok().json(UnreadCountResponse {
            user_id: user_id.clone(),
            unread,
        }),
        Err(e) => engine_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HealthResponse;

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[test]
    fn test_decision_parsing_matches_wire_values() {
        for (raw, expected) in [("like", SwipeDecision::Like), ("PASS", SwipeDecision::Pass)] {
            let parsed = match raw.to_lowercase().as_str() {
                "like" => SwipeDecision::Like,
                "pass" => SwipeDecision::Pass,
                _ => panic!("unparsed decision"),
            };
            assert_eq!(parsed, expected);
        }
    }
}
