//! ROI estimate handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AppError, AppState};
use frontdesk_core::money::{format_percentage, format_price};
use frontdesk_core::pricing::PricingConfig;
use frontdesk_core::roi::{calculate_roi, RoiConfig, RoiReport};

/// ROI estimate request.
///
/// The subscription price can be given directly, or derived by pricing a
/// shop's expected usage. Omitting both is an error.
#[derive(Debug, Deserialize)]
pub struct RoiEstimateRequest {
    pub avg_revenue_per_client: f64,
    pub missed_calls_per_day: f64,
    pub conversion_rate: f64,
    pub business_days_per_month: u32,
    pub monthly_subscription_price: Option<f64>,
    pub pricing: Option<PricingConfig>,
}

/// ROI estimate response: the report plus display strings
#[derive(Serialize)]
pub struct RoiEstimateResponse {
    #[serde(flatten)]
    pub report: RoiReport,
    pub formatted_extra_revenue: String,
    pub formatted_net_profit: String,
    pub formatted_roi: String,
}

/// POST /api/roi/estimate - Estimate monthly return for a shop
pub async fn estimate_roi(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RoiEstimateRequest>,
) -> Result<Json<RoiEstimateResponse>, AppError> {
    let price = match (request.monthly_subscription_price, &request.pricing) {
        (Some(price), _) => price,
        (None, Some(config)) => state.pricing.calculate(config).client_price as f64,
        (None, None) => {
            return Err(AppError::bad_request(
                "monthly_subscription_price or pricing required",
            ))
        }
    };

    let report = calculate_roi(&RoiConfig {
        avg_revenue_per_client: request.avg_revenue_per_client,
        missed_calls_per_day: request.missed_calls_per_day,
        conversion_rate: request.conversion_rate,
        business_days_per_month: request.business_days_per_month,
        monthly_subscription_price: price,
    });

    debug!(roi = report.roi_percentage, "ROI estimate computed");

    Ok(Json(RoiEstimateResponse {
        formatted_extra_revenue: format_price(report.extra_revenue as f64),
        formatted_net_profit: format_price(report.net_profit as f64),
        formatted_roi: format_percentage(report.roi_percentage),
        report,
    }))
}
