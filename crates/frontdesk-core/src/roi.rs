//! ROI projection for the missed-call recovery model
//!
//! Projects what a shop loses today to unanswered calls and what the AI
//! receptionist recovers, from the same inputs the marketing calculator
//! collects. Pure arithmetic over a value-object config; the subscription
//! price normally comes from [`crate::pricing::PricingBreakdown::client_price`].

use serde::{Deserialize, Serialize};

/// Assumed fraction of otherwise-missed calls the AI answers once active.
///
/// Held at 100% pending a product decision on a lower capture assumption.
/// `captured_bookings` is computed through this constant rather than aliased
/// to `lost_bookings` so the assumption can change without restructuring.
pub const AI_CAPTURE_RATE: f64 = 1.0;

/// Inputs for an ROI projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiConfig {
    /// Revenue value of one converted booking
    pub avg_revenue_per_client: f64,
    /// Calls that go unanswered per business day
    pub missed_calls_per_day: f64,
    /// Fraction of answered calls that convert to a booking, in [0, 1]
    pub conversion_rate: f64,
    /// Business days per month
    pub business_days_per_month: u32,
    /// Monthly subscription price, normally the quoted client price
    pub monthly_subscription_price: f64,
}

/// Projected monthly and annual impact derived from an [`RoiConfig`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiReport {
    /// Missed calls per month (full precision)
    pub missed_calls_per_month: f64,
    /// Bookings lost today, before AI
    pub lost_bookings: i64,
    /// Revenue lost today, before AI
    pub lost_revenue: i64,
    /// Bookings recovered at the assumed capture rate
    pub captured_bookings: i64,
    /// Revenue recovered at the assumed capture rate
    pub extra_revenue: i64,
    /// The monthly subscription price, passed through
    pub investment: f64,
    /// Recovered revenue minus the investment
    pub net_profit: i64,
    /// Net profit as a percentage of the investment (0 when investment is 0)
    pub roi_percentage: i64,
    /// Days to recoup the monthly investment (0 when nothing is recovered)
    pub payback_days: i64,
    /// Recovered revenue over twelve months
    pub annual_impact: i64,
}

/// Compute an ROI projection.
///
/// Pure and total, same non-validation stance as the pricing engine: inputs
/// pass through the arithmetic unchecked, with explicit zero-guards on the
/// two divisions so a free tier or a zero-recovery scenario reports 0 rather
/// than dividing by zero.
pub fn calculate_roi(config: &RoiConfig) -> RoiReport {
    let missed_calls_per_month =
        config.missed_calls_per_day * config.business_days_per_month as f64;

    let lost_bookings = (missed_calls_per_month * config.conversion_rate).round() as i64;
    let lost_revenue = (lost_bookings as f64 * config.avg_revenue_per_client).round() as i64;

    let captured_bookings =
        (missed_calls_per_month * AI_CAPTURE_RATE * config.conversion_rate).round() as i64;
    let extra_revenue = (captured_bookings as f64 * config.avg_revenue_per_client).round() as i64;

    let investment = config.monthly_subscription_price;
    let net_profit = (extra_revenue as f64 - investment).round() as i64;

    let roi_percentage = if investment > 0.0 {
        ((net_profit as f64 / investment) * 100.0).round() as i64
    } else {
        0
    };

    // Approximates days to recoup the monthly investment assuming linear
    // revenue accrual over a 30-day month.
    let payback_days = if extra_revenue > 0 {
        ((investment / extra_revenue as f64) * 30.0).round() as i64
    } else {
        0
    };

    let annual_impact = extra_revenue * 12;

    RoiReport {
        missed_calls_per_month,
        lost_bookings,
        lost_revenue,
        captured_bookings,
        extra_revenue,
        investment,
        net_profit,
        roi_percentage,
        payback_days,
        annual_impact,
    }
}
