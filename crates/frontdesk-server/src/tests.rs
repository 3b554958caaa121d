//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

fn setup_test_app() -> Router {
    create_router(PricingEngine::default(), None, ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

// ========== Health Tests ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_security_headers_present() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["referrer-policy"], "strict-origin-when-cross-origin");
    assert!(headers.contains_key("content-security-policy"));
}

// ========== Pricing API Tests ==========

#[tokio::test]
async fn test_starting_price() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/pricing/starting-price")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["client_price"], 61);
    assert_eq!(json["voice_cost"], 19.5);
    assert_eq!(json["total_backend_cost"], 27.5);
    assert_eq!(json["formatted_monthly"], "$61");
}

#[tokio::test]
async fn test_quote_single_location() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "calls_per_month": 50,
        "avg_call_duration_minutes": 3.0,
        "locations": 1,
        "sms_confirmations": false,
        "sms_reminders": false
    });

    let response = app
        .oneshot(post_json("/api/pricing/quote", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["voice_cost"], 19.5);
    assert_eq!(json["platform_cost"], 5.0);
    assert_eq!(json["sms_cost"], 0.0);
    assert_eq!(json["phone_cost"], 3.0);
    assert_eq!(json["multi_location_fee"], 0.0);
    assert_eq!(json["total_backend_cost"], 27.5);
    assert_eq!(json["client_price"], 61);
    assert_eq!(json["annual_price"], 622);
    assert_eq!(json["annual_savings"], 110);
}

#[tokio::test]
async fn test_quote_multi_location_with_sms() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "calls_per_month": 200,
        "avg_call_duration_minutes": 4.0,
        "locations": 2,
        "sms_confirmations": true,
        "sms_reminders": true
    });

    let response = app
        .oneshot(post_json("/api/pricing/quote", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["voice_cost"], 104.0);
    assert_eq!(json["platform_cost"], 10.0);
    assert_eq!(json["sms_cost"], 4.0);
    assert_eq!(json["phone_cost"], 6.0);
    assert_eq!(json["multi_location_fee"], 25.0);
    assert_eq!(json["total_backend_cost"], 149.0);
    assert_eq!(json["client_price"], 331);
    assert_eq!(json["formatted_monthly"], "$331");
    assert_eq!(json["formatted_annual"], "$3,376");
}

#[tokio::test]
async fn test_quote_rejects_negative_call_volume() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "calls_per_month": -5,
        "avg_call_duration_minutes": 3.0,
        "locations": 1,
        "sms_confirmations": false,
        "sms_reminders": false
    });

    let response = app
        .oneshot(post_json("/api/pricing/quote", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// ========== ROI API Tests ==========

#[tokio::test]
async fn test_roi_with_explicit_price() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "avg_revenue_per_client": 50.0,
        "missed_calls_per_day": 5.0,
        "conversion_rate": 0.5,
        "business_days_per_month": 22,
        "monthly_subscription_price": 100.0
    });

    let response = app
        .oneshot(post_json("/api/roi/estimate", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["missed_calls_per_month"], 110.0);
    assert_eq!(json["lost_bookings"], 55);
    assert_eq!(json["lost_revenue"], 2750);
    assert_eq!(json["extra_revenue"], 2750);
    assert_eq!(json["net_profit"], 2650);
    assert_eq!(json["roi_percentage"], 2650);
    assert_eq!(json["payback_days"], 1);
    assert_eq!(json["annual_impact"], 33000);
    assert_eq!(json["formatted_roi"], "2650%");
    assert_eq!(json["formatted_net_profit"], "$2,650");
}

#[tokio::test]
async fn test_roi_derives_price_from_pricing_config() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "avg_revenue_per_client": 45.0,
        "missed_calls_per_day": 3.0,
        "conversion_rate": 0.4,
        "business_days_per_month": 26,
        "pricing": {
            "calls_per_month": 50,
            "avg_call_duration_minutes": 3.0,
            "locations": 1,
            "sms_confirmations": false,
            "sms_reminders": false
        }
    });

    let response = app
        .oneshot(post_json("/api/roi/estimate", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    // Derived price is the starting quote's $61/month.
    let json = get_body_json(response).await;
    assert_eq!(json["investment"], 61.0);
    assert_eq!(json["net_profit"], 1334);
    assert_eq!(json["roi_percentage"], 2187);
}

#[tokio::test]
async fn test_roi_requires_price_or_pricing() {
    let app = setup_test_app();

    let body = serde_json::json!({
        "avg_revenue_per_client": 50.0,
        "missed_calls_per_day": 5.0,
        "conversion_rate": 0.5,
        "business_days_per_month": 22
    });

    let response = app
        .oneshot(post_json("/api/roi/estimate", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert_eq!(
        json["error"],
        "monthly_subscription_price or pricing required"
    );
}

// ========== Error Handling Tests ==========

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_internal_errors_are_sanitized() {
    let error: AppError = anyhow::anyhow!("cost model file corrupted").into();
    let response = error.into_response();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "An internal error occurred");
}
