//! PromiseService client CLI
//!
//! Wires the file-backed session store and terminal interaction into the
//! API client and maps each subcommand onto an endpoint helper.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use promise_client::api::{ApiClient, ApiResult};
use promise_client::cli::{Cli, Commands};
use promise_client::config::Config;
use promise_client::guard;
use promise_client::session::{FileSessionStore, SessionStore};
use promise_client::ui::{ConsoleInteraction, Interaction};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(server) = &cli.server {
        config.base_url = server.trim_end_matches('/').to_string();
    }

    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new());
    let ui: Arc<dyn Interaction> = Arc::new(ConsoleInteraction::new(config.base_url.clone()));

    if !guard::enforce(cli.command.page(), store.as_ref(), ui.as_ref()) {
        println!("Login required. Finish logging in, then run `promise-client login <token>`.");
        return Ok(());
    }

    let client = ApiClient::new(&config, store.clone(), ui);

    match cli.command {
        Commands::Login { token } => {
            store.save(&token)?;
            println!("Token stored.");
        }
        Commands::Status => match client.token() {
            Some(token) => {
                let preview = if token.len() > 20 {
                    format!("{}...", &token[0..20])
                } else {
                    token.clone()
                };
                println!("Logged in (token: {})", preview);
            }
            None => println!("Not logged in."),
        },
        Commands::Logout => {
            client.logout()?;
            println!("Logged out.");
        }
        Commands::Confirm { appointment_id } => {
            report(client.confirm_appointment(appointment_id).await)?;
        }
        Commands::Participants { appointment_id } => {
            report(client.get_participants(appointment_id).await)?;
        }
        Commands::Resend {
            appointment_id,
            participant_ids,
        } => {
            report(
                client
                    .resend_notifications(appointment_id, &participant_ids)
                    .await,
            )?;
        }
        Commands::Cancel {
            appointment_id,
            reason,
        } => {
            report(
                client
                    .cancel_appointment(appointment_id, reason.as_deref())
                    .await,
            )?;
        }
        Commands::Respond {
            appointment_id,
            accept,
        } => {
            report(client.respond_to_invitation(appointment_id, accept).await)?;
        }
    }

    Ok(())
}

/// Print an API outcome the way the original page scripts surfaced it:
/// the JSON payload on success, a note when the expired session was
/// already handled, the error otherwise.
fn report(outcome: ApiResult<Option<serde_json::Value>>) -> Result<()> {
    match outcome {
        Ok(Some(value)) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Ok(None) => {
            println!("Session expired; sent to the login page.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
