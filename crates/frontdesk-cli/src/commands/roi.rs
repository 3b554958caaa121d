//! ROI projection command implementation

use anyhow::Result;
use frontdesk_core::money::{format_percentage, format_price};
use frontdesk_core::pricing::PricingEngine;
use frontdesk_core::roi::{calculate_roi, RoiConfig};

pub fn cmd_roi(
    engine: &PricingEngine,
    revenue: f64,
    missed_calls: f64,
    conversion: f64,
    business_days: u32,
    price: Option<f64>,
    json: bool,
) -> Result<()> {
    if !(0.0..=1.0).contains(&conversion) {
        anyhow::bail!("--conversion must be between 0.0 and 1.0 (got {})", conversion);
    }

    // Without an explicit price, project against the advertised starting quote
    let monthly_subscription_price = match price {
        Some(p) => p,
        None => engine.starting_quote().client_price as f64,
    };

    let config = RoiConfig {
        avg_revenue_per_client: revenue,
        missed_calls_per_day: missed_calls,
        conversion_rate: conversion,
        business_days_per_month: business_days,
        monthly_subscription_price,
    };
    let report = calculate_roi(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("╭─────────────────────────────────────────╮");
    println!("│       📞 Missed-Call ROI Projection     │");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Missed calls/month:   {:.1}", report.missed_calls_per_month);
    println!("  Lost bookings:        {}", report.lost_bookings);
    println!(
        "  Revenue walking out:  {}/mo",
        format_price(report.lost_revenue as f64)
    );
    println!();
    println!("  With the AI answering:");
    println!("  Recovered bookings:   {}", report.captured_bookings);
    println!(
        "  Recovered revenue:    {}/mo",
        format_price(report.extra_revenue as f64)
    );
    println!("  Subscription cost:    {}/mo", format_price(report.investment));
    println!(
        "  Net monthly profit:   {}",
        format_price(report.net_profit as f64)
    );
    println!();
    println!("  📊 ROI: {}", format_percentage(report.roi_percentage));
    if report.payback_days > 0 {
        println!(
            "  ⏱️  Pays for itself in {} day{}",
            report.payback_days,
            if report.payback_days == 1 { "" } else { "s" }
        );
    }
    println!(
        "  💵 Annual impact: {}",
        format_price(report.annual_impact as f64)
    );
    println!();

    Ok(())
}
