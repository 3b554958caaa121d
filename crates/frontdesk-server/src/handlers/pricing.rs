//! Pricing quote handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::debug;

use crate::AppState;
use frontdesk_core::money::format_price;
use frontdesk_core::pricing::{PricingBreakdown, PricingConfig};

/// Quote response: the full cost breakdown plus display strings
#[derive(Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub breakdown: PricingBreakdown,
    pub formatted_monthly: String,
    pub formatted_annual: String,
}

fn quote_response(breakdown: PricingBreakdown) -> QuoteResponse {
    QuoteResponse {
        formatted_monthly: format_price(breakdown.client_price as f64),
        formatted_annual: format_price(breakdown.annual_price as f64),
        breakdown,
    }
}

/// POST /api/pricing/quote - Price a shop's expected usage
pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    Json(config): Json<PricingConfig>,
) -> Json<QuoteResponse> {
    debug!(
        calls = config.calls_per_month,
        locations = config.locations,
        "pricing quote requested"
    );
    Json(quote_response(state.pricing.calculate(&config)))
}

/// GET /api/pricing/starting-price - Quote for the smallest shop
pub async fn get_starting_price(State(state): State<Arc<AppState>>) -> Json<QuoteResponse> {
    Json(quote_response(state.pricing.starting_quote()))
}
