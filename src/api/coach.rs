use axum::{
    extract::{Query, State},
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{jwt_auth_middleware, AuthService, UserSession};
use crate::errors::AppError;
use crate::services::coach_service::ChatRequest;
use crate::services::CoachService;

#[derive(Debug, Deserialize)]
pub struct TipsQuery {
    pub category: Option<String>,
}

pub fn coach_routes(coach_service: CoachService, auth_service: AuthService) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/tips", get(tips))
        .route("/insight", get(insight))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(coach_service)
}

#[tracing::instrument(skip(service, request))]
async fn chat(
    State(service): State<CoachService>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, AppError> {
    let reply = service.chat(request)?;
    Ok(Json(json!({ "success": true, "reply": reply })))
}

#[tracing::instrument(skip(service))]
async fn tips(State(service): State<CoachService>, Query(query): Query<TipsQuery>) -> Json<Value> {
    let (topic, tips) = service.tips(query.category.as_deref());
    Json(json!({ "success": true, "category": topic, "tips": tips }))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn insight(
    State(service): State<CoachService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Value>, AppError> {
    let insight = service.insight(session.user_id, Utc::now().date_naive()).await?;
    Ok(Json(json!({ "success": true, "insight": insight })))
}
