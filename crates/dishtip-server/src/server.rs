use std::sync::Arc;

use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};

use crate::service::{RecommendRequest, RecommendResponse, RecommendationService};

#[derive(Clone)]
pub struct DishTipServer {
    service: Arc<RecommendationService>,
    tool_router: ToolRouter<DishTipServer>,
}

impl DishTipServer {
    pub fn new(service: Arc<RecommendationService>) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl DishTipServer {
    #[tool(description = "Extract dishes mentioned in raw Google and blog reviews of one restaurant and return them as recommendations, highest ranking first. Blog mentions outrank Google mentions; longer dish names and named Google reviewers add points.")]
    async fn recommend_dishes(
        &self,
        Parameters(params): Parameters<RecommendRequest>,
    ) -> Result<Json<RecommendResponse>, String> {
        self.service
            .recommend(params)
            .await
            .map(Json)
            .map_err(|e| format!("recommend_dishes failed: {e}"))
    }
}

#[tool_handler]
impl ServerHandler for DishTipServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "dishtip".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "DishTip dish recommender. Pass the raw reviews of a single restaurant to \
recommend_dishes (google_reviews and/or blog_reviews) to get a ranked list of dishes worth \
ordering, each with its author, source, timestamp and review link."
                    .to_string(),
            ),
        }
    }
}
