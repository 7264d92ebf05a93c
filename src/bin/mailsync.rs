use std::io::{BufRead, Read, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use log::{info, warn};

use mailsync::api::{ApiClient, StatsBackend};
use mailsync::auth::oauth::{self, CALLBACK_TIMEOUT, RedirectStatus};
use mailsync::auth::{MockAuthenticator, session_store};
use mailsync::config::{Config, load_config, resolve_log_path, resolve_storage_path};
use mailsync::domain::stats::{group_thousands, rank_senders};
use mailsync::logging;
use mailsync::router::Route;
use mailsync::store::JsonFileStorage;
use mailsync::terminal::{run_tui, state::App};

#[derive(Parser)]
#[command(name = "mailsync")]
#[command(about = "Gmail inbox analytics (TUI + command line)", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the TUI
    Tui {
        /// Screen to open first, e.g. /login or /dashboard
        #[arg(long, default_value = "/")]
        start: String,
    },

    /// Sync the inbox and print the counters
    Sync,

    /// Print the top senders, largest first
    TopSenders,

    /// Print the connected Gmail address
    Profile,

    /// Move every email from a sender to the trash
    DeleteSender {
        sender: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Forget the Gmail account held by the backend session
    Disconnect,

    /// Open the browser to connect a Gmail account
    Connect,

    /// Store the backend session cookie (`name=value`) in keyring; empty input clears it
    SetSessionCookie,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cmd = cli.cmd.unwrap_or(Command::Tui {
        start: "/".to_string(),
    });

    let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;

    if let Command::Tui { start } = cmd {
        logging::init_to_file(&resolve_log_path(&cfg)?)?;
        color_eyre::install().map_err(|e| anyhow!("{e}"))?;
        return tui(&cfg, &start);
    }

    logging::init_to_stderr();
    match cmd {
        Command::Tui { .. } => Ok(()),

        Command::SetSessionCookie => {
            eprintln!("Paste the session cookie as name=value (end with Ctrl-D):");
            let mut cookie = String::new();
            std::io::stdin().read_to_string(&mut cookie)?;
            let cookie = cookie.trim();
            if cookie.is_empty() {
                session_store::clear_session_cookie(&cfg.api_url)?;
                println!("Cleared session cookie for {}", cfg.api_url);
                return Ok(());
            }
            session_store::save_session_cookie(&cfg.api_url, cookie)?;
            println!("Saved session cookie for {}", cfg.api_url);
            Ok(())
        }

        Command::Sync => {
            let stats = client(&cfg)?.sync()?;
            println!("Processed: {}", group_thousands(stats.processed));
            println!("Inserted:  {}", group_thousands(stats.inserted));
            println!("Time:      {:.2}s", stats.time_elapsed);
            println!("{}", stats.summary());
            Ok(())
        }

        Command::TopSenders => {
            let senders = client(&cfg)?.top_senders()?;
            let ranked = rank_senders(&senders);
            if ranked.is_empty() {
                println!("No Data Available");
            }
            for (i, row) in ranked.iter().enumerate() {
                println!(
                    "{:>2}. {:<40} {:>8}",
                    i + 1,
                    row.email,
                    group_thousands(row.count)
                );
            }
            Ok(())
        }

        Command::Profile => {
            let email = client(&cfg)?.profile()?;
            println!("{email}");
            Ok(())
        }

        Command::DeleteSender { sender, yes } => {
            if !yes && !confirm(&format!("Delete all emails from {sender}?"))? {
                println!("Cancelled");
                return Ok(());
            }
            let deleted = client(&cfg)?.delete_sender(&sender)?;
            println!("Deleted {deleted} emails from {sender}.");
            Ok(())
        }

        Command::Disconnect => {
            client(&cfg)?.disconnect()?;
            println!("Disconnected");
            Ok(())
        }

        Command::Connect => {
            let url = client(&cfg)?.authorize_url();
            println!("Opening {url}");
            oauth::open_authorize(&url);
            let Some(addr) = cfg.callback_addr.as_deref() else {
                return Ok(());
            };
            match oauth::wait_for_redirect(addr, CALLBACK_TIMEOUT)? {
                RedirectStatus::Success => println!("Gmail account connected"),
                RedirectStatus::Error => return Err(anyhow!("connecting Gmail failed")),
                RedirectStatus::Loading => {}
            }
            Ok(())
        }
    }
}

fn session_cookie(cfg: &Config) -> Option<String> {
    if let Some(c) = &cfg.session_cookie {
        return Some(c.clone());
    }
    match session_store::load_session_cookie(&cfg.api_url) {
        Ok(c) => c,
        Err(e) => {
            warn!("keyring unavailable: {e:#}");
            None
        }
    }
}

fn client(cfg: &Config) -> Result<ApiClient> {
    let cookie = session_cookie(cfg);
    Ok(ApiClient::new(
        &cfg.api_url,
        cookie.as_deref(),
        cfg.accept_invalid_certs,
    )?)
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}

fn tui(cfg: &Config, start: &str) -> Result<()> {
    let backend = Arc::new(client(cfg)?);
    let authenticator = Arc::new(match cfg.mock_auth_delay_ms {
        Some(ms) => MockAuthenticator {
            delay: Duration::from_millis(ms),
        },
        None => MockAuthenticator::default(),
    });
    let storage = JsonFileStorage::open(&resolve_storage_path(cfg)?)?;

    info!("starting TUI against {}", cfg.api_url);
    let mut app = App::new(
        backend,
        authenticator,
        Box::new(storage),
        cfg.callback_addr.clone(),
    );
    app.navigate(Route::from_path(start).unwrap_or(Route::Landing));
    run_tui(&mut app)
}
