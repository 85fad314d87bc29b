use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use dishtip_core::model::{Recommendation, ReviewSource};
use dishtip_core::normalise::normalise_reviews;
use dishtip_core::pipeline::Pipeline;

use crate::error::AppError;

/// Raw review records as the review-source collaborator hands them over.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct RecommendRequest {
    /// Google Places review objects (legacy Place Details or Places v1 shape).
    #[serde(default)]
    pub google_reviews: Vec<serde_json::Value>,
    /// Blog article objects with `provider`, `description`, `datePublished` and `url`.
    #[serde(default)]
    pub blog_reviews: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct RecommendResponse {
    pub recommendations: Vec<Recommendation>,
}

pub struct RecommendationService {
    pipeline: Pipeline,
}

impl RecommendationService {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub async fn recommend(&self, request: RecommendRequest) -> Result<RecommendResponse, AppError> {
        let mut reviews = normalise_reviews(&request.google_reviews, ReviewSource::Google);
        reviews.extend(normalise_reviews(&request.blog_reviews, ReviewSource::Blog));
        info!(
            google = request.google_reviews.len(),
            blog = request.blog_reviews.len(),
            normalised = reviews.len(),
            "recommendation request received"
        );

        let recommendations = self.pipeline.run(reviews).await?;
        Ok(RecommendResponse { recommendations })
    }
}
