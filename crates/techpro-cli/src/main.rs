//! `techpro`, a command-line front end for the TechPro site data.
//!
//! # Usage
//!
//! ```
//! techpro projects --tag Web
//! techpro login admin@innovate.local 'Admin123!'
//! techpro contact --name Ada --details ada@example.com --message "Hello"
//! techpro --config ~/.config/techpro/config.toml contacts export --format csv
//! ```

mod app;
mod client;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use app::App;
use chrono::Utc;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use client::HttpCourier;
use serde::Deserialize;
use techpro_core::{
  RecordStore,
  collection::{ALL_TAGS, parse_tags},
  export::ExportFormat,
  model::{ProjectDraft, RecordId},
  submission::{ClientInfo, DEFAULT_SOURCE, Inquiry},
};
use techpro_store_sqlite::SqliteKv;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/contact";
const DEFAULT_STORE: &str = "~/.local/share/techpro/site.db";

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "techpro", version, about = "TechPro site data from the command line")]
struct Args {
  /// Path to a TOML config file (endpoint, secret, store_path, source, user_agent).
  #[arg(short, long, value_name = "FILE", env = "TECHPRO_CONFIG")]
  config: Option<PathBuf>,

  /// Contact endpoint URL. An empty value disables delivery.
  #[arg(long, env = "TECHPRO_ENDPOINT")]
  endpoint: Option<String>,

  /// Shared secret sent with submissions.
  #[arg(long, env = "TECHPRO_SECRET")]
  secret: Option<String>,

  /// SQLite file holding the local site data.
  #[arg(long, value_name = "FILE", env = "TECHPRO_STORE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List projects, optionally only those with a tag.
  Projects {
    #[arg(long, default_value = ALL_TAGS)]
    tag: String,
  },
  #[command(subcommand)]
  Project(ProjectCommand),
  Login {
    email:    String,
    password: String,
  },
  Register {
    email:    String,
    password: String,
    #[arg(long)]
    name:     Option<String>,
  },
  Logout,
  Whoami,
  /// Send a contact or service request.
  Contact {
    #[arg(long)]
    name:    String,
    /// Email or phone.
    #[arg(long)]
    details: String,
    #[arg(long)]
    message: String,
    /// Service this request is about.
    #[arg(long)]
    service: Option<String>,
  },
  #[command(subcommand)]
  Contacts(ContactsCommand),
}

#[derive(Subcommand, Debug)]
enum ProjectCommand {
  Show { id: RecordId },
  /// Print the slide deck link (sign-in required).
  Deck { id: RecordId },
  /// Create a project, or edit one with --id (admin only).
  Save(SaveArgs),
  /// Delete a project (admin only).
  Delete { id: RecordId },
}

#[derive(ClapArgs, Debug)]
struct SaveArgs {
  #[arg(long)]
  id:       Option<RecordId>,
  #[arg(long)]
  title:    String,
  #[arg(long = "abstract")]
  summary:  String,
  #[arg(long, default_value = "")]
  algo:     String,
  #[arg(long, default_value = "")]
  tech:     String,
  #[arg(long)]
  video:    Option<String>,
  #[arg(long)]
  ppt:      Option<String>,
  /// Comma-separated tags.
  #[arg(long, default_value = "")]
  tags:     String,
}

impl From<SaveArgs> for ProjectDraft {
  fn from(a: SaveArgs) -> Self {
    ProjectDraft {
      title:   a.title,
      summary: a.summary,
      algo:    a.algo,
      tech:    a.tech,
      video:   a.video,
      ppt:     a.ppt,
      tags:    parse_tags(&a.tags),
    }
  }
}

#[derive(Subcommand, Debug)]
enum ContactsCommand {
  /// Show locally stored submissions (admin only).
  List,
  /// Write locally stored submissions to a file (admin only).
  Export {
    #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
    format: FormatArg,
    /// Directory to write into.
    #[arg(long, default_value = ".")]
    out:    PathBuf,
  },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
  Csv,
  Json,
}

impl From<FormatArg> for ExportFormat {
  fn from(f: FormatArg) -> Self {
    match f {
      FormatArg::Csv => ExportFormat::Csv,
      FormatArg::Json => ExportFormat::Json,
    }
  }
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  endpoint:   Option<String>,
  secret:     Option<String>,
  store_path: Option<PathBuf>,
  source:     Option<String>,
  user_agent: Option<String>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
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
  let endpoint = args
    .endpoint
    .or(file_cfg.endpoint)
    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
  let store_path = expand_tilde(
    &args
      .store
      .or(file_cfg.store_path)
      .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE)),
  );
  let defaults = ClientInfo::default();
  let client = ClientInfo {
    source:     file_cfg.source.unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
    user_agent: file_cfg.user_agent.unwrap_or(defaults.user_agent),
    secret:     args.secret.or(file_cfg.secret),
  };

  let courier = if endpoint.trim().is_empty() {
    None
  } else {
    Some(HttpCourier::new(endpoint)?)
  };

  if let Some(dir) = store_path.parent()
    && !dir.as_os_str().is_empty()
  {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("creating {}", dir.display()))?;
  }
  let kv = SqliteKv::open(&store_path)
    .with_context(|| format!("opening store at {}", store_path.display()))?;
  let app = App::new(RecordStore::new(kv), courier, client)?;

  let output = run(&app, args.command).await?;
  print!("{output}");
  if !output.ends_with('\n') {
    println!();
  }
  Ok(())
}

async fn run(app: &App<SqliteKv, HttpCourier>, command: Command) -> Result<String> {
  match command {
    Command::Projects { tag } => Ok(app.projects(&tag)),
    Command::Project(cmd) => match cmd {
      ProjectCommand::Show { id } => app.project_show(id),
      ProjectCommand::Deck { id } => app.project_deck(id),
      ProjectCommand::Save(save) => {
        let id = save.id;
        app.project_save(id, save.into())
      }
      ProjectCommand::Delete { id } => app.project_delete(id),
    },
    Command::Login { email, password } => app.login(&email, &password),
    Command::Register { email, password, name } => {
      app.register(&email, &password, name.as_deref())
    }
    Command::Logout => app.logout(),
    Command::Whoami => Ok(app.whoami()),
    Command::Contact { name, details, message, service } => {
      let mut inquiry = Inquiry::new(name, details, message)?;
      if let Some(service) = service {
        inquiry = inquiry.for_service(service);
      }
      let outcome = app.contact(inquiry).await?;
      Ok(outcome.notice().to_string())
    }
    Command::Contacts(cmd) => match cmd {
      ContactsCommand::List => app.contacts_list(),
      ContactsCommand::Export { format, out } => {
        app.contacts_export(format.into(), &out, Utc::now())
      }
    },
  }
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
