//! Frontdesk Core Library
//!
//! This library provides the core functionality for Frontdesk:
//! - Subscription pricing engine with a configurable cost model
//! - Missed-call ROI estimates for prospective shops
//! - Price and percentage formatting for quote surfaces
//! - Popup-based authorization handshake for connecting external accounts

pub mod error;
pub mod handshake;
pub mod money;
pub mod pricing;
pub mod roi;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{Error, Result};
pub use handshake::{
    AuthorizationGateway, FlowSpec, GatewayClient, HandshakeOutcome, HandshakeReport,
    HandshakeSession,
};
pub use money::{format_percentage, format_price};
pub use pricing::{CostModel, PricingBreakdown, PricingConfig, PricingEngine};
pub use roi::{calculate_roi, RoiConfig, RoiReport};
