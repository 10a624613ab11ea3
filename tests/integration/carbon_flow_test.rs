use axum::{http::StatusCode, Router};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use crate::common::{json_request, read_json, test_app, test_database};

async fn send(app: &Router, method: &str, uri: &str, auth: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(json_request(method, uri, Some(auth), body))
        .await
        .unwrap();
    let status = response.status();
    (status, read_json(response).await)
}

/// Signs up a fresh user and returns their bearer header
async fn sign_up(app: &Router) -> String {
    let email = format!("flow-{}@example.com", Uuid::new_v4());
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({ "email": email, "password": "greener123" })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = read_json(response).await;
    assert_eq!(body["token_type"], "Bearer");
    format!("Bearer {}", body["token"].as_str().unwrap())
}

fn custom_activity(kg: f64, date: &str) -> Value {
    json!({
        "title": "Logged emissions",
        "category": "other",
        "activity_type": "custom",
        "value": kg,
        "emission_factor": 1.0,
        "date": date
    })
}

#[cfg(test)]
mod carbon_flow_tests {
    use super::*;

    #[tokio::test]
    async fn test_signup_login_and_me() {
        let Some(pool) = test_database().await else {
            return;
        };
        let app = test_app(pool);
        let email = format!("Login-{}@Example.com", Uuid::new_v4());

        let signup = json!({ "email": email, "password": "greener123" });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/signup", None, Some(signup.clone())))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/signup", None, Some(signup)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let wrong = json!({ "email": email, "password": "not-the-one1" });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/login", None, Some(wrong)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let right = json!({ "email": email.to_lowercase(), "password": "greener123" });
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/login", None, Some(right)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        let auth = format!("Bearer {}", body["token"].as_str().unwrap());

        let (status, body) = send(&app, "GET", "/api/auth/me", &auth, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], email.to_lowercase());
        assert_eq!(body["user"]["name"], email.to_lowercase().split('@').next().unwrap());
    }

    #[tokio::test]
    async fn test_goal_progress_from_logged_activities() {
        let Some(pool) = test_database().await else {
            return;
        };
        let app = test_app(pool);
        let auth = sign_up(&app).await;

        // 300kg in the 30 days before Feb 1, then 70kg over Feb 1-10
        for (kg, date) in [(300.0, "2024-01-10"), (70.0, "2024-02-05")] {
            let (status, body) = send(&app, "POST", "/api/activities", &auth, Some(custom_activity(kg, date))).await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(body["activity"]["emission_kg"], kg);
        }

        let (status, body) = send(
            &app,
            "POST",
            "/api/goals",
            &auth,
            Some(json!({ "title": "Cut 20%", "target_reduction_percent": 20.0, "start_date": "2024-02-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let goal_id = body["goal"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "GET",
            &format!("/api/goals/{}/progress?as_of=2024-02-10", goal_id),
            &auth,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let progress = &body["progress"];
        assert!((progress["baseline_daily_avg"].as_f64().unwrap() - 10.0).abs() < 1e-9);
        assert!((progress["current_daily_avg"].as_f64().unwrap() - 7.0).abs() < 1e-9);
        assert!((progress["actual_reduction_percent"].as_f64().unwrap() - 30.0).abs() < 1e-9);
        assert_eq!(progress["current_progress_percent"], 100.0);
        assert_eq!(progress["on_track"], true);
        assert_eq!(body["insight"]["change_type"], "decrease");

        let (status, body) = send(&app, "GET", "/api/activities?limit=1", &auth, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 2);
        assert_eq!(body["pages"], 2);
    }

    #[tokio::test]
    async fn test_finished_goal_cannot_be_reopened() {
        let Some(pool) = test_database().await else {
            return;
        };
        let app = test_app(pool);
        let auth = sign_up(&app).await;

        let (_, body) = send(
            &app,
            "POST",
            "/api/goals",
            &auth,
            Some(json!({ "title": "Fly less", "target_reduction_percent": 10.0 })),
        )
        .await;
        let uri = format!("/api/goals/{}", body["goal"]["id"].as_str().unwrap());

        let (status, body) = send(&app, "PUT", &uri, &auth, Some(json!({ "status": "completed" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["goal"]["status"], "completed");

        let (status, body) = send(&app, "PUT", &uri, &auth, Some(json!({ "status": "active" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "CONFLICT");

        let (status, body) = send(&app, "GET", "/api/goals/summary", &auth, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["completed_goals"], 1);
    }

    #[tokio::test]
    async fn test_goal_end_date_can_be_cleared() {
        let Some(pool) = test_database().await else {
            return;
        };
        let app = test_app(pool);
        let auth = sign_up(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/goals",
            &auth,
            Some(json!({
                "title": "Quarter of cleaner travel",
                "target_reduction_percent": 15.0,
                "start_date": "2024-03-01",
                "end_date": "2024-05-31"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/api/goals/{}", body["goal"]["id"].as_str().unwrap());

        let (status, body) = send(&app, "PUT", &uri, &auth, Some(json!({ "title": "Ongoing" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["goal"]["end_date"], "2024-05-31");

        let (status, body) = send(&app, "PUT", &uri, &auth, Some(json!({ "end_date": null }))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["goal"]["end_date"].is_null());
        assert_eq!(body["goal"]["title"], "Ongoing");
    }

    #[tokio::test]
    async fn test_deleted_assets_drop_out_of_listing() {
        let Some(pool) = test_database().await else {
            return;
        };
        let app = test_app(pool);
        let auth = sign_up(&app).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/assets",
            &auth,
            Some(json!({ "name": "Family Car", "asset_type": "Vehicle", "fuel_type": "petrol" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["asset"]["asset_type"], "vehicle");
        assert_eq!(body["asset"]["emoji"], "🚗");
        let uri = format!("/api/assets/{}", body["asset"]["id"].as_str().unwrap());

        let other = sign_up(&app).await;
        let (status, _) = send(&app, "GET", &uri, &other, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", &uri, &auth, None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, "GET", "/api/assets", &auth, None).await;
        assert_eq!(body["assets"].as_array().unwrap().len(), 0);
        let (status, _) = send(&app, "GET", &uri, &auth, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
