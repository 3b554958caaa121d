//! Frontdesk CLI - Pricing and ROI tools for the AI receptionist
//!
//! Usage:
//!   frontdesk quote --calls 200      Price a subscription
//!   frontdesk starting-price         Show the advertised floor quote
//!   frontdesk roi --missed-calls 5   Project missed-call recovery
//!   frontdesk serve --port 3000      Start the web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let engine = commands::load_engine(cli.cost_model.as_ref())?;

    match cli.command {
        Commands::Quote {
            calls,
            duration,
            locations,
            sms_confirmations,
            sms_reminders,
            json,
        } => commands::cmd_quote(
            &engine,
            calls,
            duration,
            locations,
            sms_confirmations,
            sms_reminders,
            json,
        ),
        Commands::StartingPrice { json } => commands::cmd_starting_price(&engine, json),
        Commands::Roi {
            revenue,
            missed_calls,
            conversion,
            business_days,
            price,
            json,
        } => commands::cmd_roi(
            &engine,
            revenue,
            missed_calls,
            conversion,
            business_days,
            price,
            json,
        ),
        Commands::Serve {
            port,
            host,
            static_dir,
            allowed_origins,
        } => {
            commands::cmd_serve(
                engine,
                &host,
                port,
                static_dir.as_deref(),
                allowed_origins.as_deref(),
            )
            .await
        }
    }
}
