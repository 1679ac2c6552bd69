//! calendars-provider-google - Google Calendar provider for quarkus-calendars
//!
//! Speaks the provider protocol: one JSON request per line on stdin, one
//! JSON response per line on stdout. Logs go to stderr.
//!
//! Credentials are read from the `google_credentials` path in the `[remote]`
//! config section, or by default from:
//!   ~/.config/quarkus-calendars/providers/google/credentials.json

mod api;
mod app_config;
mod commands;
mod google_event;
mod session;

use std::io::{self, BufRead, Write};

use calendars_core::remote::protocol::{Command, Request, Response};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request).await,
            Err(e) => Response::error(&format!("Failed to parse request: {}", e)),
        };

        if let Err(e) = writeln!(stdout, "{}", response).and_then(|_| stdout.flush()) {
            tracing::error!("Failed to write response: {}", e);
            break;
        }
    }
}

async fn handle_request(request: Request) -> String {
    tracing::debug!(command = ?request.command, "Handling request");

    let result = match request.command {
        Command::ListEvents => commands::list_events::handle(request.params).await,
        Command::CreateEvent => commands::create_event::handle(request.params).await,
        Command::UpdateEvent => commands::update_event::handle(request.params).await,
        Command::DeleteEvent => commands::delete_event::handle(request.params).await,
    };

    match result {
        Ok(data) => Response::success(data),
        Err(e) => Response::error(&format!("{:#}", e)),
    }
}
