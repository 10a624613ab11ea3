use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde_json::{json, Map, Value};
use uuid::Uuid;
use validator::Validate;

use crate::auth::{jwt_auth_middleware, AuthService, UserSession};
use crate::errors::AppError;
use crate::models::{ActivityQuery, CalculateEmissionRequest, CreateActivityRequest, UpdateActivityRequest};
use crate::services::{ActivityService, CarbonCalculator};

pub fn activities_routes(activity_service: ActivityService, auth_service: AuthService) -> Router {
    let protected = Router::new()
        .route("/", get(list_activities).post(create_activity))
        .route("/stats", get(activity_stats))
        .route(
            "/:activity_id",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware));

    Router::new()
        .route("/categories", get(list_categories))
        .route("/calculate", post(calculate_emission))
        .merge(protected)
        .with_state(activity_service)
}

/// Emission factor catalogue keyed by category
async fn list_categories() -> Json<Value> {
    let mut categories = Map::new();
    for (category, info) in CarbonCalculator::categories() {
        categories.insert(category.as_str().to_string(), json!(info));
    }

    Json(json!({ "success": true, "categories": categories }))
}

/// Preview an emission without storing anything
#[tracing::instrument(skip(request))]
async fn calculate_emission(Json(request): Json<CalculateEmissionRequest>) -> Result<Json<Value>, AppError> {
    request.validate()?;
    let emission = CarbonCalculator::calculate(
        request.category,
        &request.activity_type,
        request.value,
        request.emission_factor,
    )?;

    Ok(Json(json!({ "success": true, "emission": emission })))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn list_activities(
    State(service): State<ActivityService>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Value>, AppError> {
    let page = service.list(session.user_id, query).await?;

    Ok(Json(json!({
        "success": true,
        "activities": page.activities,
        "total": page.total,
        "page": page.page,
        "limit": page.limit,
        "pages": page.pages,
    })))
}

#[tracing::instrument(skip(service, session, request), fields(user_id = %session.user_id))]
async fn create_activity(
    State(service): State<ActivityService>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<CreateActivityRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let activity = service.create(session.user_id, request).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "activity": activity })),
    ))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn activity_stats(
    State(service): State<ActivityService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Value>, AppError> {
    let stats = service.stats(session.user_id).await?;
    Ok(Json(json!({ "success": true, "stats": stats })))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn get_activity(
    State(service): State<ActivityService>,
    Extension(session): Extension<UserSession>,
    Path(activity_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let activity = service.get(session.user_id, activity_id).await?;
    Ok(Json(json!({ "success": true, "activity": activity })))
}

#[tracing::instrument(skip(service, session, request), fields(user_id = %session.user_id))]
async fn update_activity(
    State(service): State<ActivityService>,
    Extension(session): Extension<UserSession>,
    Path(activity_id): Path<Uuid>,
    Json(request): Json<UpdateActivityRequest>,
) -> Result<Json<Value>, AppError> {
    let activity = service.update(session.user_id, activity_id, request).await?;
    Ok(Json(json!({ "success": true, "activity": activity })))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn delete_activity(
    State(service): State<ActivityService>,
    Extension(session): Extension<UserSession>,
    Path(activity_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    service.delete(session.user_id, activity_id).await?;
    Ok(Json(json!({ "success": true, "message": "Activity deleted" })))
}
