//! Test Binance API credentials and connectivity
//!
//! 1. Loads credentials from .env
//! 2. Tests public connectivity (ping, server time, clock skew)
//! 3. Tests signed SAPI calls with the configured recvWindow

use anyhow::{bail, Context};
use sapi_connector::prelude::*;
use std::env;

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_logging();

    println!("🚀 SAPI Connector Credentials Test");
    println!("==================================");

    let use_testnet = env::var("BINANCE_TESTNET")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    let base = if use_testnet {
        BinanceConfig::testnet()
    } else {
        BinanceConfig::default().with_auto_discover(true)
    };
    let config = base
        .with_env_credentials()
        .context("set BINANCE_API_KEY and BINANCE_SECRET_KEY in .env")?;

    if config.api_key == "your_binance_api_key_here" {
        bail!("Please update your .env file with real Binance API credentials");
    }

    let key = &config.api_key;
    println!("✅ Environment variables loaded");
    println!("   API Key: {}...", key.chars().take(8).collect::<String>());
    println!("   Using testnet: {use_testnet}");
    println!();

    let client = BlockingRestClient::new(config)?;
    println!("🔗 Endpoint: {}", client.inner().base_url());

    client.ping()?;
    let server_time = client.server_time()?;
    let skew = server_time as i64 - now_ms() as i64;
    println!("🕐 Server time: {} (skew {skew}ms)", Timestamp::from_millis(server_time));

    if use_testnet {
        println!("ℹ️  SAPI endpoints are not served on testnet, stopping here");
        return Ok(());
    }

    println!();
    println!("🔐 Testing signed SAPI endpoints...");

    let asset = client.margin_asset("BTC")?;
    println!("   Margin asset: {} borrowable={}", asset.asset_full_name, asset.is_borrowable);

    let details = client.asset_detail(Some("BTC"))?;
    if let Some(btc) = details.get("BTC") {
        println!("   BTC withdraw fee: {} (min {})", btc.withdraw_fee, btc.min_withdraw_amount);
    }

    let earn = client.simple_earn_flexible_list(&FlexibleListQuery::default().page(1, 10))?;
    println!("   Flexible products: {} of {}", earn.rows.len(), earn.total);

    match client.margin_interest_history(&InterestHistoryQuery::default()) {
        Ok(page) => println!("   Interest records: {} of {}", page.rows.len(), page.total),
        Err(err) if err.kind() == ErrorKind::Server => println!("   Interest history unavailable: {err}"),
        Err(err) => return Err(err.into()),
    }

    println!();
    println!("✅ All checks passed");
    Ok(())
}
