//! Pricing engine for subscription quotes
//!
//! Computes the customer-facing monthly price from a usage configuration by
//! itemizing provider-side backend costs and inverting a fixed profit margin.
//! Supports:
//! - Itemized cost breakdown (voice, platform, SMS, phone numbers, multi-location)
//! - Annual pricing with a flat discount
//! - A "starting at" floor quote for marketing display
//! - Config-driven cost models via override files
//!
//! ## Cost Model Resolution
//!
//! The cost model is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/frontdesk/cost_model.toml)
//! 2. Fall back to embedded defaults (compiled into binary)

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Embedded default cost model (compiled into binary)
const DEFAULT_COST_MODEL: &str = include_str!("../../../config/cost_model.toml");

/// Usage configuration for a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Total inbound call volume per month, aggregated across all locations
    pub calls_per_month: u32,
    /// Average handled-call length in minutes
    pub avg_call_duration_minutes: f64,
    /// Number of business locations covered
    pub locations: u32,
    /// SMS booking confirmations enabled
    pub sms_confirmations: bool,
    /// SMS reminder messages enabled
    pub sms_reminders: bool,
}

impl PricingConfig {
    /// The floor configuration behind the marketing "starting at" figure:
    /// 50 calls/month, 3-minute average, 1 location, no SMS features.
    pub fn starting() -> Self {
        Self {
            calls_per_month: 50,
            avg_call_duration_minutes: 3.0,
            locations: 1,
            sms_confirmations: false,
            sms_reminders: false,
        }
    }
}

/// Itemized quote derived from a [`PricingConfig`]
///
/// A value object: recomputed on every call, never cached or mutated.
/// Cost components keep full precision; only the customer-facing prices
/// are rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    /// Voice minutes cost (total minutes x per-minute rate)
    pub voice_cost: f64,
    /// Platform fee across locations
    pub platform_cost: f64,
    /// SMS cost across enabled features
    pub sms_cost: f64,
    /// Phone number cost across locations
    pub phone_cost: f64,
    /// Surcharge per location beyond the first
    pub multi_location_fee: f64,
    /// Sum of the five cost components
    pub total_backend_cost: f64,
    /// Customer-facing monthly price (margin-inverted, rounded)
    pub client_price: i64,
    /// Annual price: twelve months less the annual discount, rounded
    pub annual_price: i64,
    /// Undiscounted annual cost minus the annual price
    pub annual_savings: i64,
}

/// Provider-side cost constants and pricing parameters
///
/// Bound into a [`PricingEngine`] at construction so the same engine can be
/// parameterized for different cost structures or markets.
#[derive(Debug, Clone, PartialEq)]
pub struct CostModel {
    /// Voice cost per handled minute
    pub cost_per_minute: f64,
    /// Monthly platform fee per location
    pub platform_fee_per_location: f64,
    /// Cost per SMS message sent
    pub sms_cost_per_message: f64,
    /// Monthly phone number cost per location
    pub phone_number_cost_per_location: f64,
    /// Monthly surcharge per location beyond the first
    pub multi_location_fee: f64,
    /// Profit margin as a fraction of revenue (not of cost)
    pub profit_margin: f64,
    /// Annual prepay discount as a fraction of the yearly price
    pub annual_discount: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            cost_per_minute: 0.13,
            platform_fee_per_location: 5.0,
            sms_cost_per_message: 0.005,
            phone_number_cost_per_location: 3.0,
            multi_location_fee: 25.0,
            profit_margin: 0.55,
            annual_discount: 0.15,
        }
    }
}

impl CostModel {
    /// Load the cost model with default resolution (data-dir override,
    /// then embedded defaults)
    pub fn load() -> Result<Self> {
        load_model(None)
    }

    /// Load the cost model from an explicit TOML file
    pub fn from_path(path: &PathBuf) -> Result<Self> {
        load_model(Some(path))
    }
}

/// Pricing engine bound to a cost model
#[derive(Debug)]
pub struct PricingEngine {
    model: CostModel,
}

impl PricingEngine {
    /// Create an engine with an explicit cost model
    pub fn new(model: CostModel) -> Self {
        Self { model }
    }

    /// Compute an itemized quote for a usage configuration.
    ///
    /// Pure and total: identical inputs always produce identical outputs,
    /// and no input is rejected. Decimal inputs pass through the arithmetic
    /// unchecked; callers enforce sanity upstream.
    pub fn calculate(&self, config: &PricingConfig) -> PricingBreakdown {
        let m = &self.model;

        // Call volume is already an aggregate across locations, so total
        // minutes does not scale with the location count.
        let total_minutes = config.calls_per_month as f64 * config.avg_call_duration_minutes;
        let voice_cost = total_minutes * m.cost_per_minute;

        let locations = config.locations as f64;
        let platform_cost = m.platform_fee_per_location * locations;

        let sms_feature_count = config.sms_confirmations as u32 + config.sms_reminders as u32;
        let sms_cost = config.calls_per_month as f64
            * locations
            * m.sms_cost_per_message
            * sms_feature_count as f64;

        let phone_cost = m.phone_number_cost_per_location * locations;

        let multi_location_fee = if config.locations > 1 {
            m.multi_location_fee * (config.locations - 1) as f64
        } else {
            0.0
        };

        let total_backend_cost =
            voice_cost + platform_cost + sms_cost + phone_cost + multi_location_fee;

        // Margin inversion: dividing by (1 - margin) makes the margin a
        // fraction of revenue, not of cost.
        let client_price = (total_backend_cost / (1.0 - m.profit_margin)).round() as i64;

        let annual_price = (client_price as f64 * 12.0 * (1.0 - m.annual_discount)).round() as i64;
        let annual_savings = client_price * 12 - annual_price;

        PricingBreakdown {
            voice_cost,
            platform_cost,
            sms_cost,
            phone_cost,
            multi_location_fee,
            total_backend_cost,
            client_price,
            annual_price,
            annual_savings,
        }
    }

    /// The quote behind the marketing "starting at" figure.
    ///
    /// Derived from the same engine and cost model as every other quote,
    /// so it can never drift out of sync with the constants.
    pub fn starting_quote(&self) -> PricingBreakdown {
        self.calculate(&PricingConfig::starting())
    }

    /// The cost model this engine is bound to
    pub fn model(&self) -> &CostModel {
        &self.model
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(CostModel::default())
    }
}

/// Default cost model override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("frontdesk").join("cost_model.toml"))
}

/// Load the cost model (override first, then embedded default)
fn load_model(override_path: Option<&PathBuf>) -> Result<CostModel> {
    let content = if let Some(path) = override_path {
        // An explicit path is a user request; failing to read it is an error
        // rather than a silent fallback.
        fs::read_to_string(path).map_err(|e| {
            Error::InvalidData(format!("Failed to read cost model {}: {}", path.display(), e))
        })?
    } else if let Some(default_path) = default_config_path().filter(|p| p.exists()) {
        fs::read_to_string(&default_path)
            .map_err(|e| Error::InvalidData(format!("Failed to read cost model: {}", e)))?
    } else {
        DEFAULT_COST_MODEL.to_string()
    };

    parse_model(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    costs: Option<RawCosts>,
    pricing: Option<RawPricing>,
}

#[derive(Debug, Deserialize)]
struct RawCosts {
    cost_per_minute: Option<f64>,
    platform_fee_per_location: Option<f64>,
    sms_cost_per_message: Option<f64>,
    phone_number_cost_per_location: Option<f64>,
    multi_location_fee: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawPricing {
    profit_margin: Option<f64>,
    annual_discount: Option<f64>,
}

/// Parse a cost model from TOML content, overlaying defaults
fn parse_model(content: &str) -> Result<CostModel> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::InvalidData(format!("Invalid cost model TOML: {}", e)))?;

    let mut model = CostModel::default();

    if let Some(costs) = raw.costs {
        if let Some(v) = costs.cost_per_minute {
            model.cost_per_minute = v;
        }
        if let Some(v) = costs.platform_fee_per_location {
            model.platform_fee_per_location = v;
        }
        if let Some(v) = costs.sms_cost_per_message {
            model.sms_cost_per_message = v;
        }
        if let Some(v) = costs.phone_number_cost_per_location {
            model.phone_number_cost_per_location = v;
        }
        if let Some(v) = costs.multi_location_fee {
            model.multi_location_fee = v;
        }
    }

    if let Some(pricing) = raw.pricing {
        if let Some(v) = pricing.profit_margin {
            model.profit_margin = v;
        }
        if let Some(v) = pricing.annual_discount {
            model.annual_discount = v;
        }
    }

    Ok(model)
}
