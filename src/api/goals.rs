use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{jwt_auth_middleware, AuthService, UserSession};
use crate::errors::AppError;
use crate::models::{CreateGoalRequest, GoalQuery, ProgressQuery, UpdateGoalRequest};
use crate::services::GoalService;

pub fn goals_routes(goal_service: GoalService, auth_service: AuthService) -> Router {
    Router::new()
        .route("/", get(get_goals).post(create_goal))
        .route("/summary", get(get_goals_summary))
        .route("/:goal_id", get(get_goal).put(update_goal).delete(delete_goal))
        .route("/:goal_id/progress", get(get_goal_progress))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(goal_service)
}

/// Get all goals for the authenticated user
#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
pub async fn get_goals(
    State(service): State<GoalService>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<GoalQuery>,
) -> Result<Json<Value>, AppError> {
    let goals = service.list(session.user_id, query.status).await?;
    Ok(Json(json!({ "success": true, "goals": goals })))
}

#[tracing::instrument(skip(service, session, request), fields(user_id = %session.user_id))]
pub async fn create_goal(
    State(service): State<GoalService>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<CreateGoalRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let goal = service.create(session.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "goal": goal }))))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
pub async fn get_goal(
    State(service): State<GoalService>,
    Extension(session): Extension<UserSession>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let goal = service.get(session.user_id, goal_id).await?;
    Ok(Json(json!({ "success": true, "goal": goal })))
}

/// Update an existing goal; leaving a completed or cancelled state is a conflict
#[tracing::instrument(skip(service, session, request), fields(user_id = %session.user_id))]
pub async fn update_goal(
    State(service): State<GoalService>,
    Extension(session): Extension<UserSession>,
    Path(goal_id): Path<Uuid>,
    Json(request): Json<UpdateGoalRequest>,
) -> Result<Json<Value>, AppError> {
    let goal = service.update(session.user_id, goal_id, request).await?;
    Ok(Json(json!({ "success": true, "goal": goal })))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
pub async fn delete_goal(
    State(service): State<GoalService>,
    Extension(session): Extension<UserSession>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    service.delete(session.user_id, goal_id).await?;
    Ok(Json(json!({ "success": true, "message": "Goal deleted" })))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
pub async fn get_goal_progress(
    State(service): State<GoalService>,
    Extension(session): Extension<UserSession>,
    Path(goal_id): Path<Uuid>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<Value>, AppError> {
    let progress = service.progress(session.user_id, goal_id, query.as_of).await?;

    Ok(Json(json!({
        "success": true,
        "goal": progress.goal,
        "as_of": progress.as_of,
        "progress": progress.progress,
        "insight": progress.insight,
    })))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
pub async fn get_goals_summary(
    State(service): State<GoalService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Value>, AppError> {
    let summary = service.summary(session.user_id).await?;
    Ok(Json(json!({ "success": true, "summary": summary })))
}
