use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use super::activities::activities_routes;
use super::assets::assets_routes;
use super::auth::auth_routes;
use super::coach::coach_routes;
use super::dashboard::dashboard_routes;
use super::goals::goals_routes;
use super::health::{health_check, index};
use crate::auth::{cors_layer, security_headers_layer, AuthService};
use crate::config::AnalyticsConfig;
use crate::services::{
    ActivityService, AssetService, CoachService, DashboardService, EmissionAnalyzer, GoalService,
};

pub fn create_routes(db: PgPool, jwt_secret: &str, analytics: AnalyticsConfig) -> Router {
    let auth_service = AuthService::new(db.clone(), jwt_secret);
    let analyzer = EmissionAnalyzer::new(analytics);

    let activity_service = ActivityService::new(db.clone());
    let dashboard_service = DashboardService::new(db.clone(), analyzer);
    let coach_service = CoachService::new(activity_service.clone(), dashboard_service.clone());

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes(auth_service.clone()))
        .nest("/api/activities", activities_routes(activity_service, auth_service.clone()))
        .nest("/api/assets", assets_routes(AssetService::new(db.clone()), auth_service.clone()))
        .nest("/api/goals", goals_routes(GoalService::new(db, analyzer), auth_service.clone()))
        .nest("/api/dashboard", dashboard_routes(dashboard_service, auth_service.clone()))
        .nest("/api/coach", coach_routes(coach_service, auth_service))
        .layer(security_headers_layer())
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
