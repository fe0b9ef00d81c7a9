use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::{info, warn};

use crate::models::{
    ActionResponse, AppState, BuyingGuideRequest, CompareRequest, DisplayPrefs, ErrorResponse,
    RecommendationRequest, ReviewsRequest,
};
use crate::types::AppError;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/recommendations", post(recommend))
        .route("/api/reviews", post(reviews))
        .route("/api/buying-guide", post(buying_guide))
        .route("/api/compare", post(compare))
        .route("/api/trending", post(trending))
        .with_state(state)
}

/// Rejected input, answered before any collaborator runs
pub struct InvalidInput(AppError);

impl From<AppError> for InvalidInput {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl From<JsonRejection> for InvalidInput {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::InvalidRequest(rejection.body_text()))
    }
}

impl IntoResponse for InvalidInput {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "Rejected request");
        let status = match &self.0 {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}

type ActionResult = Result<Json<ActionResponse>, InvalidInput>;

async fn recommend(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> ActionResult {
    let Json(request) = payload?;
    let input = request.validate()?;
    info!(budget = input.budget, priority = %input.priority, "Recommendation request received");

    let content = state.assistant.recommend(&input).await;
    Ok(render(&state, "Product Recommendations", &content, &request.display))
}

async fn reviews(
    State(state): State<AppState>,
    payload: Result<Json<ReviewsRequest>, JsonRejection>,
) -> ActionResult {
    let Json(request) = payload?;
    let url = request.validate()?;
    info!(url = %url, "Review analysis request received");

    let content = state.assistant.analyze_reviews(&url).await;
    Ok(render(&state, "Review Analysis Results", &content, &request.display))
}

async fn buying_guide(
    State(state): State<AppState>,
    payload: Result<Json<BuyingGuideRequest>, JsonRejection>,
) -> ActionResult {
    let Json(request) = payload?;
    let product_type = request.validate()?;
    info!(product_type = %product_type, "Buying guide request received");

    let content = state.assistant.buying_guide(&product_type).await;
    let title = format!("Buying Guide: {}", product_type);
    Ok(render(&state, title, &content, &request.display))
}

async fn compare(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> ActionResult {
    let Json(request) = payload?;
    let product_name = request.validate()?;
    info!(product = %product_name, "Comparison request received");

    let content = state.assistant.compare(&product_name).await;
    Ok(render(&state, "Product Comparison Results", &content, &request.display))
}

async fn trending(
    State(state): State<AppState>,
    payload: Result<Option<Json<DisplayPrefs>>, JsonRejection>,
) -> ActionResult {
    let prefs = payload?.map(|Json(p)| p).unwrap_or_default();
    info!("Trending request received");

    let content = state.assistant.trending().await;
    Ok(render(&state, "Trending Products", &content, &prefs))
}

fn render(state: &AppState, title: impl Into<String>, content: &str, prefs: &DisplayPrefs) -> Json<ActionResponse> {
    Json(ActionResponse::render(title, content, prefs, &state.config.display))
}
