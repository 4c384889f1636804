//! wishlist-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) overlaid by
//! `WISHLIST_*` environment variables, opens the SQLite account store, and
//! serves the wishlist API over HTTP. Wishlists themselves live in memory.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wishlist_accounts_sqlite::SqliteAccounts;
use wishlist_core::store::WishlistStore as _;
use wishlist_server::{AppState, ServerConfig};
use wishlist_store_memory::MemoryStore;

#[derive(Parser)]
#[command(author, version, about = "Wishlist HTTP server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("WISHLIST").try_parsing(true))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let token_ttl = server_cfg.token_ttl().context("invalid configuration")?;

  let accounts_path = expand_tilde(&server_cfg.accounts_path);
  let accounts = SqliteAccounts::open(&accounts_path, token_ttl)
    .await
    .with_context(|| format!("failed to open account store at {accounts_path:?}"))?;

  let store = if server_cfg.seed_demo_data {
    MemoryStore::seeded().context("failed to load demo wishlists")?
  } else {
    MemoryStore::new()
  };
  tracing::info!(
    wishlists = store.list_wishlists()?.len(),
    gifts = store.list_all_gifts()?.len(),
    "wishlist store ready"
  );

  let address = server_cfg.address();
  let state = AppState {
    store:    Arc::new(store),
    accounts: Arc::new(accounts),
  };
  let app = wishlist_server::router(state);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
