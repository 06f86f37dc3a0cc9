//! techpro-intake server binary.
//!
//! Reads `intake.toml` (or the path given with `--config`), layers
//! `TECHPRO_*` environment variables on top, opens the SQLite inbox, and
//! serves the contact intake API over HTTP.
//!
//! # Secret hash generation
//!
//! To generate the argon2 PHC string for `secret_hash`:
//!
//! ```
//! cargo run -p techpro-intake --bin intake -- --hash-secret
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use techpro_intake::{AppState, IntakeConfig, auth::hash_secret};
use techpro_store_sqlite::SqliteInbox;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "TechPro contact intake server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "intake.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a secret entered on stdin and exit.
  #[arg(long)]
  hash_secret: bool,
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

  if cli.hash_secret {
    let secret = read_secret()?;
    let hash = hash_secret(&secret).map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("TECHPRO"))
    .build()
    .context("failed to read config file")?;

  let intake_cfg: IntakeConfig = settings
    .try_deserialize()
    .context("failed to deserialise IntakeConfig")?;

  let store_path = expand_tilde(&intake_cfg.store_path);
  let inbox = SqliteInbox::open(&store_path)
    .await
    .with_context(|| format!("failed to open inbox at {store_path:?}"))?;

  if intake_cfg.secret_hash.is_none() {
    tracing::warn!("no secret_hash configured; accepting submissions from anyone");
  }

  let address = format!("{}:{}", intake_cfg.host, intake_cfg.port);
  let app = techpro_intake::router(AppState::new(inbox, intake_cfg));

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Read a secret from stdin.
fn read_secret() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Secret: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  let secret = line.trim_end_matches(['\n', '\r']).to_string();
  anyhow::ensure!(!secret.is_empty(), "secret must not be empty");
  Ok(secret)
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
