use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docadmin_client::{dirs, AdminConsole, ClientConfig, FileSlot, PdfSource, StatusMessage};
use tracing_subscriber::EnvFilter;

// ── CLI definition ─────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "docadmin",
    about = "Upload PDF documents and trigger reindexing on a content backend",
    version
)]
struct Cli {
    /// Backend base URL ($DOCADMIN_API_BASE, also read from .env.local / .env)
    #[arg(long, env = "DOCADMIN_API_BASE")]
    api_base: Option<String>,

    /// Request timeout e.g. 30s, 2m ($DOCADMIN_TIMEOUT)
    #[arg(long, env = "DOCADMIN_TIMEOUT", default_value = "30s")]
    timeout: String,

    /// Directory holding the saved login token ($DOCADMIN_DATA_DIR)
    #[arg(long, env = "DOCADMIN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and save the token for later commands
    Login {
        #[arg(long)]
        email: String,
        /// Password ($DOCADMIN_PASSWORD)
        #[arg(long, env = "DOCADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the saved token
    Logout,
    /// Show the configured backend and login state
    Status,
    /// Upload a PDF document
    Upload {
        /// Document title (required)
        #[arg(long, default_value = "")]
        title: String,
        /// Short description
        #[arg(long, default_value = "")]
        summary: String,
        /// URL slug; derived by the backend when omitted
        #[arg(long, default_value = "")]
        slug: String,
        /// Path to the PDF file (required)
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Rebuild the backend's search index
    Reindex,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // .env.local wins over .env; neither overrides the real environment.
    load_env_file(Path::new(".env.local"))?;
    load_env_file(Path::new(".env"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("DOCADMIN_LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = ClientConfig {
        timeout: parse_duration(&cli.timeout)?,
        data_dir: cli.data_dir,
        ..ClientConfig::new(cli.api_base)
    };
    let data_dir = dirs::data_dir(config.data_dir.as_ref()).context("resolve data directory")?;
    let mut console = AdminConsole::new(config, FileSlot::in_dir(&data_dir))
        .context("initialise admin console")?;

    match cli.command {
        Commands::Login { email, password } => {
            let msg = console.login(&email, &password).await;
            finish(msg)
        }

        Commands::Logout => finish(console.logout()),

        Commands::Status => {
            println!("API: {}", console.config().api_base_label());
            if console.session().is_authenticated() {
                println!("Logged in (token saved in {})", data_dir.display());
            } else {
                println!("Not logged in");
            }
            Ok(())
        }

        Commands::Upload {
            title,
            summary,
            slug,
            file,
        } => {
            console.form.title = title;
            console.form.summary = summary;
            console.form.slug = slug;
            console.form.file = file.map(PdfSource::from);
            finish(console.upload().await)
        }

        Commands::Reindex => finish(console.reindex().await),
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Print the status message; error messages exit non-zero.
fn finish(msg: &StatusMessage) -> Result<()> {
    if msg.is_error() {
        eprintln!("{msg}");
        std::process::exit(1);
    }
    println!("{msg}");
    Ok(())
}

/// Load `KEY=value` lines from `path` if it exists. A missing file is fine;
/// a malformed one is an error.
fn load_env_file(path: &Path) -> Result<()> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("read env file: {}", path.display())),
    }
}

/// Parse human duration strings like "30s", "2m" into a [`Duration`].
fn parse_duration(s: &str) -> Result<Duration> {
    let d: humantime::Duration = s
        .parse()
        .with_context(|| format!("invalid duration: {s}"))?;
    Ok(d.into())
}
