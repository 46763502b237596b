use crate::models::*;
use crate::services::cache::CacheStats;
use crate::services::recommendation::BuildOutcome;
use crate::utils::clamp_count;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RebuildQuery {
    pub force: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
        }
    }

    fn failure(data: Option<T>, message: String) -> Self {
        Self {
            success: false,
            data,
            message,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RebuildSummary {
    pub outcome: String,
    pub cache: Option<CacheStats>,
}

async fn health_check() -> Json<ApiResponse<HashMap<String, String>>> {
    let mut status = HashMap::new();
    status.insert("status".to_string(), "healthy".to_string());
    status.insert("service".to_string(), "engagerec".to_string());
    status.insert("version".to_string(), env!("CARGO_PKG_VERSION").to_string());

    Json(ApiResponse::success(status))
}

async fn get_recommendations(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(params): Query<RecommendationQuery>,
) -> Result<Json<ApiResponse<RecommendationResponse>>, StatusCode> {
    let settings = state.recommendation_service.config();
    let count = clamp_count(params.count, settings.default_count, settings.max_count);

    let service = state.recommendation_service.clone();
    match tokio::task::spawn_blocking(move || service.recommend(user_id, count)).await {
        Ok(items) => Ok(Json(ApiResponse::success(RecommendationResponse {
            user_id,
            items,
            generated_at: Utc::now(),
        }))),
        Err(e) => {
            error!("Recommendation task for user {} failed: {}", user_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn rebuild_cache(
    State(state): State<AppState>,
    Query(params): Query<RebuildQuery>,
) -> Result<Json<ApiResponse<RebuildSummary>>, StatusCode> {
    let force = params.force.unwrap_or(true);

    let service = state.recommendation_service.clone();
    let outcome = tokio::task::spawn_blocking(move || service.build(force))
        .await
        .map_err(|e| {
            error!("Rebuild task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let summary = RebuildSummary {
        outcome: outcome.label().to_string(),
        cache: outcome.snapshot().map(|snapshot| snapshot.stats()),
    };

    let response = match outcome {
        BuildOutcome::Failed(e) => ApiResponse::failure(Some(summary), e.to_string()),
        _ => ApiResponse::success(summary),
    };
    Ok(Json(response))
}

async fn cache_stats(State(state): State<AppState>) -> Json<ApiResponse<CacheStats>> {
    match state.recommendation_service.cache_stats() {
        Some(stats) => Json(ApiResponse::success(stats)),
        None => Json(ApiResponse::failure(None, "Recommendation cache is empty".to_string())),
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/recommendations/:user_id", get(get_recommendations))
        .route("/rebuild", post(rebuild_cache))
        .route("/cache", get(cache_stats))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
        )
        .with_state(state)
}
