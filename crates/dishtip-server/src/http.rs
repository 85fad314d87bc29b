use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::AppError;
use crate::service::{RecommendRequest, RecommendResponse, RecommendationService};

pub fn router(service: Arc<RecommendationService>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/recommendations", post(recommendations))
        .with_state(service)
}

pub async fn serve(addr: &str, service: Arc<RecommendationService>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(listen_addr = %addr, "HTTP server ready");
    axum::serve(listener, router(service)).await?;
    Ok(())
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "DishTip API is ready to serve dish tips" }))
}

async fn recommendations(
    State(service): State<Arc<RecommendationService>>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let response = service.recommend(request).await?;
    Ok(Json(response))
}

pub struct ApiError(AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "recommendation request failed");
        let body = Json(json!({ "detail": self.0.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use dishtip_core::error::PipelineError;
    use dishtip_core::model::ReviewSource;

    use super::*;
    use crate::test_support;

    #[tokio::test]
    async fn recommendations_endpoint_returns_ranked_dishes() {
        let request: RecommendRequest = serde_json::from_value(json!({
            "google_reviews": [{
                "authorAttribution": {"displayName": "Ann Lee"},
                "text": {"text": "Get the laksa."},
                "publishTime": "2024-05-01T12:30:00Z",
                "googleMapsUri": "https://maps.google.com/r/2"
            }]
        }))
        .unwrap();

        let Ok(Json(response)) =
            recommendations(State(test_support::service()), Json(request)).await
        else {
            panic!("recommendations handler failed");
        };
        assert_eq!(response.recommendations.len(), 1);
        let rec = &response.recommendations[0];
        assert_eq!(rec.dish_name, "laksa");
        assert_eq!(rec.ranking, Some(11));
        assert_eq!(rec.source, ReviewSource::Google);
        assert_eq!(rec.review_link.as_deref(), Some("https://maps.google.com/r/2"));

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["recommendations"][0]["timestamp"], "2024-05-01T12:30:00Z");
    }

    #[tokio::test]
    async fn empty_body_yields_no_recommendations() {
        let request: RecommendRequest = serde_json::from_value(json!({})).unwrap();
        let Ok(Json(response)) =
            recommendations(State(test_support::service()), Json(request)).await
        else {
            panic!("recommendations handler failed");
        };
        assert!(response.recommendations.is_empty());
    }

    #[test]
    fn pipeline_failures_map_to_500() {
        let err = ApiError(AppError::Pipeline(PipelineError::Worker("panicked".to_string())));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
