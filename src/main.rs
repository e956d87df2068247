//! Command-line companion for the Haus admin session core.
//!
//! Handy while developing against a local backend: log in and store a
//! credential, check what the backend thinks of the stored one, or log out.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hausgate::{ApiClient, Config, CredentialStore, GateView, Navigator, SessionGate};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Navigator for a terminal: just says where the UI would go.
struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn redirect(&self, route: &str) {
        println!("-> redirect to {}", route);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let mut config = Config::load()?;
    let store = CredentialStore::new(Config::credential_dir()?);
    let client = ApiClient::new(config.backend_url())?;

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("login") => {
            let email = match args.get(2) {
                Some(e) => e.clone(),
                None => prompt("Email: ")?,
            };
            let password = prompt("Password: ")?;

            let token = client
                .login(&email, &password)
                .await
                .context("Login failed")?;
            store.save(&token)?;

            config.last_email = Some(email);
            config.save()?;

            info!("Credential stored");
            println!("Logged in against {}", client.base_url());
        }
        Some("status") => {
            let gate = SessionGate::mount(client, store, Arc::new(PrintNavigator)).await;
            match gate.view() {
                GateView::Content => {
                    println!("Session valid ({:?})", gate.state());
                }
                GateView::AccessDenied => {
                    println!("Authenticated, but this account is not an administrator");
                }
                GateView::RedirectToLogin => {
                    println!("Not authenticated");
                }
                GateView::Loading => unreachable!("mount resolves before returning"),
            }
        }
        Some("logout") => {
            store.clear()?;
            println!("Credential cleared");
        }
        _ => {
            eprintln!("Usage: hausgate <login [email] | status | logout>");
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
