// =============================================================================
// Finance Agent — Main Entry Point
// =============================================================================
//
// Two modes:
//   finance-agent AAPL BTC-USD   one-shot analysis of the given symbols
//   finance-agent                serve the REST API on AGENT_BIND_ADDR
// =============================================================================

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use finance_agent::api;
use finance_agent::app_state::AppState;
use finance_agent::market_data::YahooClient;
use finance_agent::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = RuntimeConfig::load("agent_config.json").unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(syms) = std::env::var("AGENT_SYMBOLS") {
        config.symbols = parse_symbols(syms.split(','));
    }
    if config.symbols.is_empty() {
        config.symbols = RuntimeConfig::default().symbols;
    }
    info!(symbols = ?config.symbols, period = %config.period, "Configured symbols");

    // ── 2. Shared state ──────────────────────────────────────────────────
    let client = YahooClient::new()?;
    let state = Arc::new(AppState::new(config, client));

    // ── 3a. One-shot workflow ────────────────────────────────────────────
    let cli_symbols = parse_symbols(std::env::args().skip(1));
    if !cli_symbols.is_empty() {
        run_once(&state, &cli_symbols).await;
        return Ok(());
    }

    // ── 3b. Cache housekeeping ───────────────────────────────────────────
    let purge_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            let purged = purge_state.cache.purge_expired();
            if purged > 0 {
                info!(purged, "expired analyses purged");
            }
        }
    });

    // ── 4. REST API ──────────────────────────────────────────────────────
    let bind_addr =
        std::env::var("AGENT_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".into());
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server on {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            warn!("Shutdown signal received — stopping gracefully");
        })
        .await
        .context("API server failed")?;

    info!("Finance Agent shut down complete.");
    Ok(())
}

fn parse_symbols<S: AsRef<str>>(raw: impl Iterator<Item = S>) -> Vec<String> {
    raw.map(|s| s.as_ref().trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Analyse each symbol once and print a short summary.
async fn run_once(state: &AppState, symbols: &[String]) {
    let (period, allow_fallback) = {
        let config = state.runtime_config.read();
        (config.period, config.demo_fallback)
    };

    for symbol in symbols {
        match state.analyze(symbol, period, allow_fallback).await {
            Ok(report) => {
                let a = &report.analysis;
                let source = if report.is_demo { " (demo data)" } else { "" };
                println!("{}{source}", report.symbol);
                println!("  price      {:.4} ({:+.2}%)", a.last_price, a.change_pct);
                println!("  decision   {} [{}]", a.decision, a.trend_strength);
                println!("  risk       {} (volatility {:.2}%)", a.risk_level, a.volatility);
                println!("  confidence {:.1}", a.confidence);
                println!("  {}", a.comment);
            }
            Err(e) => {
                error!(symbol = %symbol, error = %e, "analysis failed");
                println!("{symbol}: analysis failed: {e:#}");
            }
        }
    }
}
