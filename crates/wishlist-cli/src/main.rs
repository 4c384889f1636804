//! `wishlist` — command-line client for the wishlist server.
//!
//! # Usage
//!
//! ```text
//! wishlist --url http://localhost:8000 login kate_rosan
//! wishlist list --owner aleksandra_petrova
//! wishlist reserve 2 7
//! ```

mod client;
mod output;
mod session;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, GiftChanges, NewGift, NewWishlist, WishlistChanges};
use serde::Deserialize;
use session::Session;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wishlist_core::{
  gift::{GiftId, StatusKind},
  wishlist::WishlistId,
};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "wishlist", about = "Command-line client for the wishlist server")]
struct Args {
  /// Path to a TOML config file (url, session).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the wishlist server (default: http://localhost:8000).
  #[arg(long, env = "WISHLIST_URL")]
  url: Option<String>,

  /// Where the bearer token is kept between runs.
  #[arg(long, value_name = "FILE")]
  session: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create an account.
  Register {
    login:    String,
    email:    String,
    #[arg(long, env = "WISHLIST_PASSWORD")]
    password: String,
  },
  /// Log in with a login or email and save the token.
  Login {
    username: String,
    #[arg(long, env = "WISHLIST_PASSWORD")]
    password: String,
  },
  /// Revoke the saved token and forget it.
  Logout,
  /// Show the logged-in user.
  Whoami,
  /// List wishlists.
  List {
    #[arg(long)]
    owner: Option<String>,
  },
  /// Show one wishlist with its gifts.
  Show { id: i64 },
  /// Open a wishlist by its public link.
  Find { link: String },
  /// Create a wishlist.
  Create {
    title:       String,
    /// Event date, YYYY-MM-DD.
    #[arg(long)]
    date:        NaiveDate,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    private:     bool,
  },
  /// Change one of your wishlists. Unset options are left as they are.
  Edit {
    id:          i64,
    #[arg(long)]
    title:       Option<String>,
    /// Event date, YYYY-MM-DD.
    #[arg(long)]
    date:        Option<NaiveDate>,
    #[arg(long)]
    description: Option<String>,
    /// `true` hides the wishlist, `false` publishes it with a new link.
    #[arg(long)]
    private:     Option<bool>,
  },
  /// Replace the public link of one of your wishlists.
  RegenerateLink { id: i64 },
  /// Delete one of your wishlists and all its gifts.
  Delete { id: i64 },
  /// List gifts, optionally of one wishlist or in one state.
  Gifts {
    #[arg(long)]
    wishlist: Option<i64>,
    /// `available` or `reserved`.
    #[arg(long)]
    status:   Option<StatusKind>,
  },
  /// Add a gift to one of your wishlists.
  AddGift {
    wishlist:    i64,
    name:        String,
    #[arg(long, default_value = "")]
    price:       String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long)]
    link:        Option<String>,
  },
  /// Change one of your gifts. An empty `--link` removes the link.
  EditGift {
    id:          i64,
    #[arg(long)]
    name:        Option<String>,
    #[arg(long)]
    price:       Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    link:        Option<String>,
  },
  /// Delete one of your gifts.
  DeleteGift { id: i64 },
  /// Reserve a gift in someone's wishlist.
  Reserve { wishlist: i64, gift: i64 },
  /// Cancel a reservation.
  Cancel { gift: i64 },
  /// Gifts you have reserved.
  Reservations,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:     String,
  #[serde(default)]
  session: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let base_url = args
    .url
    .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
    .unwrap_or_else(|| "http://localhost:8000".to_string());
  let session = Session::new(
    args
      .session
      .or(file_cfg.session)
      .unwrap_or_else(Session::default_path),
  );

  let client = ApiClient::new(ApiConfig {
    base_url,
    token: session.token()?,
  })?;

  run(args.command, &client, &session).await
}

async fn run(command: Command, client: &ApiClient, session: &Session) -> Result<()> {
  match command {
    Command::Register { login, email, password } => {
      client.register(&login, &email, &password).await?;
      println!("Registered {login}. Log in with `wishlist login {login}`.");
    }
    Command::Login { username, password } => {
      let token = client.login(&username, &password).await?;
      session.save_token(&token)?;
      println!("Logged in as {username} (session: {}).", session.path().display());
    }
    Command::Logout => {
      if session.token()?.is_none() {
        bail!("not logged in");
      }
      if let Err(e) = client.logout().await {
        tracing::warn!(error = %e, "server did not accept logout");
      }
      session.clear()?;
      println!("Logged out.");
    }
    Command::Whoami => {
      let user = client.me().await?;
      println!("{} <{}> (user #{})", user.login, user.email, user.user_id);
    }
    Command::List { owner } => {
      for w in client.list_wishlists(owner.as_deref()).await? {
        println!("{}", output::wishlist_line(&w));
      }
    }
    Command::Show { id } => {
      let w = client.get_wishlist(WishlistId(id)).await?;
      println!("{}", output::wishlist_detail(&w));
    }
    Command::Find { link } => {
      let w = client.find_by_link(&link).await?;
      println!("{}", output::wishlist_detail(&w));
    }
    Command::Create { title, date, description, private } => {
      let w = client
        .create_wishlist(&NewWishlist {
          title,
          description,
          event_date: date,
          is_private: private,
        })
        .await?;
      println!("Created {}", output::wishlist_line(&w));
    }
    Command::Edit { id, title, date, description, private } => {
      let changes = WishlistChanges {
        title,
        description,
        event_date: date,
        is_private: private,
      };
      let w = client.update_wishlist(WishlistId(id), &changes).await?;
      println!("Updated {}", output::wishlist_line(&w));
    }
    Command::RegenerateLink { id } => {
      let w = client.regenerate_link(WishlistId(id)).await?;
      println!("Updated {}", output::wishlist_line(&w));
    }
    Command::Delete { id } => {
      client.delete_wishlist(WishlistId(id)).await?;
      println!("Deleted wishlist #{id}.");
    }
    Command::Gifts { wishlist, status } => {
      for g in client.list_gifts(wishlist.map(WishlistId), status).await? {
        println!("{}", output::gift_line(&g));
      }
    }
    Command::AddGift { wishlist, name, price, description, link } => {
      let g = client
        .add_gift(&NewGift {
          wishlist_id: WishlistId(wishlist),
          name,
          price,
          description,
          link,
        })
        .await?;
      println!("Added{}", output::gift_line(&g));
    }
    Command::EditGift { id, name, price, description, link } => {
      let changes = GiftChanges { name, price, description, link };
      let g = client.update_gift(GiftId(id), &changes).await?;
      println!("Updated{}", output::gift_line(&g));
    }
    Command::DeleteGift { id } => {
      client.delete_gift(GiftId(id)).await?;
      println!("Deleted gift #{id}.");
    }
    Command::Reserve { wishlist, gift } => {
      let g = client.reserve(WishlistId(wishlist), GiftId(gift)).await?;
      println!("Reserved{}", output::gift_line(&g));
    }
    Command::Cancel { gift } => {
      let g = client.cancel(GiftId(gift)).await?;
      println!("Cancelled{}", output::gift_line(&g));
    }
    Command::Reservations => {
      let gifts = client.reservations().await?;
      if gifts.is_empty() {
        println!("You have not reserved anything.");
      }
      for g in gifts {
        println!("{}", output::gift_line(&g));
      }
    }
  }
  Ok(())
}
