//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Frontdesk - AI receptionist pricing and ROI tools
#[derive(Parser)]
#[command(name = "frontdesk")]
#[command(about = "Pricing quotes and ROI projections for the AI receptionist", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Cost model TOML file (defaults to the built-in rates)
    ///
    /// Without this flag, an override at
    /// ~/.local/share/frontdesk/cost_model.toml is used when present,
    /// otherwise the rates compiled into the binary.
    #[arg(long, global = true)]
    pub cost_model: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Price a subscription from expected usage
    Quote {
        /// Calls answered per month, aggregated across locations
        #[arg(short, long, default_value = "100")]
        calls: u32,

        /// Average call duration in minutes
        #[arg(short, long, default_value = "3.0")]
        duration: f64,

        /// Number of business locations
        #[arg(short, long, default_value = "1")]
        locations: u32,

        /// Include SMS booking confirmations
        #[arg(long)]
        sms_confirmations: bool,

        /// Include SMS appointment reminders
        #[arg(long)]
        sms_reminders: bool,

        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the advertised "starting at" quote
    StartingPrice {
        /// Print the quote as JSON
        #[arg(long)]
        json: bool,
    },

    /// Project revenue recovered from missed calls
    Roi {
        /// Average revenue per client visit in dollars
        #[arg(short, long, default_value = "45.0")]
        revenue: f64,

        /// Missed calls per business day
        #[arg(short, long, default_value = "3.0")]
        missed_calls: f64,

        /// Fraction of missed callers who would have booked (0.0-1.0)
        #[arg(long, default_value = "0.4")]
        conversion: f64,

        /// Business days per month
        #[arg(long, default_value = "26")]
        business_days: u32,

        /// Monthly subscription price (defaults to the starting quote)
        #[arg(short, long)]
        price: Option<f64>,

        /// Print the projection as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory containing static files to serve (e.g., ui/dist)
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Allowed CORS origins, comma-separated
        ///
        /// Leave unset for the restrictive same-origin default. Set this when
        /// the marketing site calls the API from its own domain.
        /// Example: --allowed-origins https://frontdeskhq.com
        #[arg(long)]
        allowed_origins: Option<String>,
    },
}
