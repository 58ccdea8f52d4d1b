//! leetnote · LeetCode problem -> Markdown note importer
//!
//! - `leetnote serve`        : Axum HTTP + WebSocket API (default when no subcommand is given)
//! - `leetnote import <URL>` : one-shot import, prints the note path
//!
//! Important env variables:
//!   PORT                 : u16 (default 3000), serve only
//!   LEETNOTE_CONFIG_PATH : path to TOML settings (same as --config)
//!   LOG_LEVEL            : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT           : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod slug;
mod markup;
mod note;
mod leetcode;
mod vault;
mod import;
mod state;
mod protocol;
mod routes;

use std::{net::SocketAddr, path::PathBuf, process::ExitCode, sync::Arc};

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::load_settings_or_default;
use crate::routes::build_router;
use crate::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "leetnote", version, about = "Import LeetCode problems as Markdown notes")]
struct Cli {
  /// TOML settings file (created on first save from the settings endpoint)
  #[arg(long, global = true, env = "LEETNOTE_CONFIG_PATH", value_name = "PATH")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Serve the HTTP + WebSocket API
  Serve {
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
  },
  /// Import a single problem by its page URL
  Import {
    /// e.g. https://leetcode.com/problems/two-sum/
    url: String,
  },
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
  let cli = Cli::parse();
  telemetry::init_tracing(match cli.command {
    Some(Command::Import { .. }) => telemetry::Mode::OneShot,
    _ => telemetry::Mode::Server,
  });

  let settings = load_settings_or_default(cli.config.as_deref());
  let state = Arc::new(AppState::new(settings, cli.config.clone())?);

  // Bare `leetnote` serves; PORT still applies.
  let command = cli.command.unwrap_or_else(|| Command::Serve {
    port: std::env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3000),
  });

  match command {
    Command::Serve { port } => {
      let app = build_router(state);
      let addr = SocketAddr::from(([0, 0, 0, 0], port));
      let listener = TcpListener::bind(addr).await?;
      info!(target: "leetnote", %addr, "HTTP server listening");
      axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
      Ok(ExitCode::SUCCESS)
    }
    Command::Import { url } => match state.import(&url).await {
      Ok(outcome) => {
        info!(target: "import", "{}", outcome.message());
        println!("{}", outcome.path.display());
        Ok(ExitCode::SUCCESS)
      }
      Err(e) => {
        error!(target: "import", error = %e, "Import failed");
        eprintln!("{}", e);
        Ok(ExitCode::FAILURE)
      }
    },
  }
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!(target: "leetnote", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "leetnote", "Shutdown signal received");
}
