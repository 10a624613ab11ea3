use axum::{
    extract::{Path, State},
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
use crate::models::{CreateAssetRequest, UpdateAssetRequest};
use crate::services::AssetService;

pub fn assets_routes(asset_service: AssetService, auth_service: AuthService) -> Router {
    Router::new()
        .route("/", get(list_assets).post(create_asset))
        .route("/:asset_id", get(get_asset).put(update_asset).delete(delete_asset))
        .route_layer(middleware::from_fn_with_state(auth_service, jwt_auth_middleware))
        .with_state(asset_service)
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn list_assets(
    State(service): State<AssetService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Value>, AppError> {
    let assets = service.list(session.user_id).await?;
    Ok(Json(json!({ "success": true, "assets": assets })))
}

#[tracing::instrument(skip(service, session, request), fields(user_id = %session.user_id))]
async fn create_asset(
    State(service): State<AssetService>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<CreateAssetRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let asset = service.create(session.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "asset": asset }))))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn get_asset(
    State(service): State<AssetService>,
    Extension(session): Extension<UserSession>,
    Path(asset_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let asset = service.get(session.user_id, asset_id).await?;
    Ok(Json(json!({ "success": true, "asset": asset })))
}

#[tracing::instrument(skip(service, session, request), fields(user_id = %session.user_id))]
async fn update_asset(
    State(service): State<AssetService>,
    Extension(session): Extension<UserSession>,
    Path(asset_id): Path<Uuid>,
    Json(request): Json<UpdateAssetRequest>,
) -> Result<Json<Value>, AppError> {
    let asset = service.update(session.user_id, asset_id, request).await?;
    Ok(Json(json!({ "success": true, "asset": asset })))
}

#[tracing::instrument(skip(service, session), fields(user_id = %session.user_id))]
async fn delete_asset(
    State(service): State<AssetService>,
    Extension(session): Extension<UserSession>,
    Path(asset_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    service.delete(session.user_id, asset_id).await?;
    Ok(Json(json!({ "success": true, "message": "Asset deleted" })))
}
