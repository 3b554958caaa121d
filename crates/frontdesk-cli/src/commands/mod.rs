//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `quote` - Pricing commands (quote, starting-price)
//! - `roi` - ROI projection command
//! - `serve` - Web server command

pub mod quote;
pub mod roi;
pub mod serve;

// Re-export command functions for main.rs
pub use quote::*;
pub use roi::*;
pub use serve::*;

use std::path::PathBuf;

use anyhow::{Context, Result};
use frontdesk_core::{CostModel, PricingEngine};

/// Build a pricing engine from an optional cost model file.
///
/// Without a path this follows the default resolution: a user override in the
/// data directory when present, otherwise the rates compiled into the binary.
pub fn load_engine(cost_model: Option<&PathBuf>) -> Result<PricingEngine> {
    let model = match cost_model {
        Some(path) => {
            tracing::debug!("Loading cost model from {}", path.display());
            CostModel::from_path(path)
                .with_context(|| format!("Failed to load cost model from {}", path.display()))?
        }
        None => CostModel::load().context("Failed to load cost model")?,
    };
    Ok(PricingEngine::new(model))
}
