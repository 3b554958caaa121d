//! Server command implementation

use std::path::Path;

use anyhow::Result;
use frontdesk_core::pricing::PricingEngine;

pub async fn cmd_serve(
    engine: PricingEngine,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    allowed_origins: Option<&str>,
) -> Result<()> {
    println!("🚀 Starting Frontdesk web server...");
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Parse allowed origins (comma-separated)
    let allowed_origins: Vec<String> = allowed_origins
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only");
    } else {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let config = frontdesk_server::ServerConfig { allowed_origins };

    let static_dir_str =
        static_dir.map(|p| p.to_str().expect("static_dir path must be valid UTF-8"));
    frontdesk_server::serve_with_config(engine, host, port, static_dir_str, config).await?;

    Ok(())
}
