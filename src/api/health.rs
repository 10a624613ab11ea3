use axum::{http::StatusCode, response::Json};
use serde_json::{json, Value};

pub async fn health_check() -> Result<Json<Value>, StatusCode> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "carbon-iq",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}

/// Service banner listing the endpoint groups
pub async fn index() -> Json<Value> {
    Json(json!({
        "service": "CarbonIQ API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "auth": "/api/auth",
            "activities": "/api/activities",
            "assets": "/api/assets",
            "goals": "/api/goals",
            "dashboard": "/api/dashboard",
            "coach": "/api/coach"
        }
    }))
}
