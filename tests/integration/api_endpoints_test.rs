use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{bearer, json_request, lazy_pool, read_json, test_app};

// Every request here is rejected or answered before the handler reaches the
// database, so the lazy pool never connects.
#[cfg(test)]
mod api_endpoint_tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_endpoint() {
        let app = test_app(lazy_pool());

        let response = app.oneshot(json_request("GET", "/health", None, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        let body = read_json(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "carbon-iq");
    }

    #[tokio::test]
    async fn test_index_lists_endpoint_groups() {
        let app = test_app(lazy_pool());

        let response = app.oneshot(json_request("GET", "/", None, None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["endpoints"]["goals"], "/api/goals");
        assert_eq!(body["endpoints"]["coach"], "/api/coach");
    }

    #[tokio::test]
    async fn test_categories_are_public() {
        let app = test_app(lazy_pool());

        let response = app
            .oneshot(json_request("GET", "/api/activities/categories", None, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["categories"]["transport"]["name"], "Transportation");
        assert_eq!(body["categories"]["food"]["types"][0]["value"], "beef");
    }

    #[tokio::test]
    async fn test_calculate_preview() {
        let app = test_app(lazy_pool());
        let payload = json!({ "category": "transport", "activity_type": "car_petrol", "value": 100.0 });

        let response = app
            .oneshot(json_request("POST", "/api/activities/calculate", None, Some(payload)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["emission"]["amount"], 19.2);
        assert_eq!(body["emission"]["unit"], "kg CO₂");
    }

    #[tokio::test]
    async fn test_calculate_rejects_negative_value() {
        let app = test_app(lazy_pool());
        let payload = json!({ "category": "energy", "activity_type": "electricity_grid", "value": -5.0 });

        let response = app
            .oneshot(json_request("POST", "/api/activities/calculate", None, Some(payload)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_calculate_rejects_overflowing_emission() {
        let app = test_app(lazy_pool());
        let payload = json!({
            "category": "other",
            "activity_type": "custom",
            "value": 1e300,
            "emission_factor": 1e10
        });

        let response = app
            .oneshot(json_request("POST", "/api/activities/calculate", None, Some(payload)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        for uri in ["/api/goals", "/api/activities", "/api/dashboard/metrics", "/api/coach/tips", "/api/auth/me"] {
            let app = test_app(lazy_pool());
            let response = app.oneshot(json_request("GET", uri, None, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{} should need a token", uri);
        }
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let app = test_app(lazy_pool());

        let response = app
            .oneshot(json_request("GET", "/api/goals", Some("Bearer not-a-jwt"), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_goal_with_zero_target_is_rejected() {
        let app = test_app(lazy_pool());
        let auth = bearer(Uuid::new_v4());
        let payload = json!({ "title": "Do nothing", "target_reduction_percent": 0.0 });

        let response = app
            .oneshot(json_request("POST", "/api/goals", Some(&auth), Some(payload)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_goal_ending_before_start_is_rejected() {
        let app = test_app(lazy_pool());
        let auth = bearer(Uuid::new_v4());
        let payload = json!({
            "title": "Backwards",
            "target_reduction_percent": 15.0,
            "start_date": "2024-06-01",
            "end_date": "2024-05-01"
        });

        let response = app
            .oneshot(json_request("POST", "/api/goals", Some(&auth), Some(payload)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_coach_chat_and_tips() {
        let auth = bearer(Uuid::new_v4());

        let response = test_app(lazy_pool())
            .oneshot(json_request(
                "POST",
                "/api/coach/chat",
                Some(&auth),
                Some(json!({ "message": "How can I make my commute greener?" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["reply"]["topic"], "transport");
        assert_eq!(body["reply"]["source"], "rules");

        let response = test_app(lazy_pool())
            .oneshot(json_request("GET", "/api/coach/tips?category=energy", Some(&auth), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["category"], "energy");
        assert_eq!(body["tips"].as_array().unwrap().len(), 3);
    }
}
