use axum::{
    extract::{Query, State},
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{jwt_auth_middleware, AuthService, UserSession};
use crate::errors::AppError;
use crate::services::DashboardService;

#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    pub days: Option<i64>,
}

pub fn dashboard_routes(dashboard_service: DashboardService, auth_service: AuthService) -> Router {
    Router::new()
        .route("/stats", get(get_stats))
        .route("/emissions-trend", get(get_emissions_trend))
        .route("/top-emitters", get(get_top_emitters))
        .route("/categories", get(get_categories))
        .route("/metrics", get(get_metrics))
        .route("/weekly-trend", get(get_weekly_trend))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(dashboard_service)
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn get_stats(
    State(service): State<DashboardService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Value>, AppError> {
    let stats = service.stats(session.user_id).await?;
    Ok(Json(json!({ "success": true, "stats": stats })))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn get_emissions_trend(
    State(service): State<DashboardService>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<Value>, AppError> {
    let trend = service
        .emissions_trend(session.user_id, query.days, Utc::now().date_naive())
        .await?;
    Ok(Json(json!({ "success": true, "trend": trend })))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn get_top_emitters(
    State(service): State<DashboardService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Value>, AppError> {
    let emitters = service.top_emitters(session.user_id).await?;
    Ok(Json(json!({ "success": true, "top_emitters": emitters })))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn get_categories(
    State(service): State<DashboardService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Value>, AppError> {
    let categories = service.categories(session.user_id).await?;
    Ok(Json(json!({ "success": true, "categories": categories })))
}

/// This month against last month
#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn get_metrics(
    State(service): State<DashboardService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Value>, AppError> {
    let metrics = service.metrics(session.user_id, Utc::now().date_naive()).await?;
    Ok(Json(json!({ "success": true, "metrics": metrics })))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn get_weekly_trend(
    State(service): State<DashboardService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Value>, AppError> {
    let trend = service.weekly_trend(session.user_id, Utc::now().date_naive()).await?;
    Ok(Json(json!({ "success": true, "trend": trend })))
}
