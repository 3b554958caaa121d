//! Pricing command implementations (quote, starting-price)

use anyhow::Result;
use frontdesk_core::money::format_price;
use frontdesk_core::pricing::{PricingBreakdown, PricingConfig, PricingEngine};

pub fn cmd_quote(
    engine: &PricingEngine,
    calls: u32,
    duration: f64,
    locations: u32,
    sms_confirmations: bool,
    sms_reminders: bool,
    json: bool,
) -> Result<()> {
    let config = PricingConfig {
        calls_per_month: calls,
        avg_call_duration_minutes: duration,
        locations,
        sms_confirmations,
        sms_reminders,
    };
    let breakdown = engine.calculate(&config);

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    println!();
    println!("💇 Frontdesk Quote");
    println!("   ─────────────────────────────────────────────");
    println!(
        "   {} calls/mo × {:.1} min avg × {} location{}",
        config.calls_per_month,
        config.avg_call_duration_minutes,
        config.locations,
        if config.locations == 1 { "" } else { "s" }
    );
    println!();
    print_cost_lines(&breakdown);
    println!();
    println!(
        "   💰 Monthly price: {}/mo",
        format_price(breakdown.client_price as f64)
    );
    println!(
        "   📅 Annual price:  {}/yr (save {})",
        format_price(breakdown.annual_price as f64),
        format_price(breakdown.annual_savings as f64)
    );
    println!();

    Ok(())
}

pub fn cmd_starting_price(engine: &PricingEngine, json: bool) -> Result<()> {
    let breakdown = engine.starting_quote();

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    println!();
    println!(
        "✨ Starting at {}/mo ({}/yr billed annually)",
        format_price(breakdown.client_price as f64),
        format_price(breakdown.annual_price as f64)
    );
    println!("   Covers 50 calls/mo at a 3 minute average, single location, no SMS");
    println!();
    print_cost_lines(&breakdown);
    println!();

    Ok(())
}

/// Print the itemized cost lines of a breakdown, skipping zero components.
fn print_cost_lines(breakdown: &PricingBreakdown) {
    println!("   Voice minutes:       ${:>8.2}", breakdown.voice_cost);
    println!("   Platform fee:        ${:>8.2}", breakdown.platform_cost);
    if breakdown.sms_cost > 0.0 {
        println!("   SMS messages:        ${:>8.2}", breakdown.sms_cost);
    }
    println!("   Phone numbers:       ${:>8.2}", breakdown.phone_cost);
    if breakdown.multi_location_fee > 0.0 {
        println!(
            "   Multi-location fee:  ${:>8.2}",
            breakdown.multi_location_fee
        );
    }
    println!("   ─────────────────────────────");
    println!(
        "   Backend cost:        ${:>8.2}",
        breakdown.total_backend_cost
    );
}
