//! Example: Fetching a page of orders from the GameLink API
//!
//! Loads configuration the same way the desktop client does, reads the token
//! from a JSON token file, and prints the first page of orders.
//!
//! # Setup
//!
//! ```bash
//! export GAMELINK_API_BASE_URL=http://localhost:8080
//! echo '{"token": "<your token>"}' > tokens.json
//! RUST_LOG=gamelink_infra=debug cargo run --example fetch_orders -- tokens.json
//! ```

use std::sync::Arc;

use anyhow::Context;
use gamelink_domain::{PageQuery, PageResult, SortOrder};
use gamelink_infra::{config, ApiClient, FileTokenProvider, FileTokenStore};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize)]
struct Order {
    id: u64,
    status: String,
    #[serde(default)]
    amount: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gamelink_infra=debug")),
        )
        .init();

    let config = config::load().context("loading GameLink configuration")?;
    let token_file = std::env::args().nth(1).unwrap_or_else(|| "tokens.json".to_string());
    let tokens =
        FileTokenProvider::new(FileTokenStore::new(token_file), config.token_storage_key.clone());

    let client = ApiClient::from_config(&config, Arc::new(tokens))?;
    info!(base_url = client.base_url(), "client ready");

    let query = PageQuery::new().page(1).page_size(20).sort_by("created_at", SortOrder::Desc);
    match client.get_page::<Order>("/api/orders", &query).await {
        Ok(PageResult { items, total, .. }) => {
            info!(total, shown = items.len(), "fetched orders");
            for order in items {
                info!(id = order.id, status = %order.status, amount = order.amount, "order");
            }
        }
        Err(err) => {
            tracing::error!(code = err.code, category = %err.category(), "{}", err.friendly_message());
            return Err(err.into());
        }
    }

    Ok(())
}
