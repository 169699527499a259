mod analysis;
mod api;
mod config;
mod display;
mod error;
mod presenter;

use anyhow::Context;
use api::client::{DataSource, HttpDataSource};
use clap::{Parser, Subcommand};
use config::Config;
use display::html::render_document;
use display::output::{display_error, display_info, display_success};
use display::repl::{self, Host};
use error::AppError;
use indicatif::ProgressBar;
use presenter::loader::load_session;
use presenter::session::Session;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "League Pages")]
#[command(about = "Browse per-player champion statistics from the analytics exports", long_about = None)]
struct Args {
    /// Rows per table page (default: PAGE_SIZE or 10)
    #[arg(short, long, global = true)]
    page_size: Option<usize>,

    /// Item efficiency endpoint (overrides ITEM_EFFICIENCY_URL)
    #[arg(long, global = true)]
    items_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a static HTML page with every player
    Render {
        /// Output file
        #[arg(short, long, default_value = "index.html")]
        output: PathBuf,
    },
    /// Browse players interactively in the terminal
    Browse,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = init_tracing() {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    if let Err(e) = run(args) {
        display_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr so they never mix with tables on stdout.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("league_pages=info,warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

fn run(args: Args) -> Result<(), AppError> {
    let mut config = Config::from_env()?;
    if let Some(page_size) = args.page_size {
        config = config.with_page_size(page_size)?;
    }
    if let Some(url) = args.items_url {
        config.items_url = Some(url);
    }

    let source = HttpDataSource::new();

    match args.command {
        Command::Render { output } => {
            let session = load_with_spinner(&source, &config);
            write_page(&session, &output)?;
            display_success(&format!(
                "{} jogadores gravados em {}",
                session.players().len(),
                output.display()
            ));
        }
        Command::Browse => {
            let session = load_with_spinner(&source, &config);
            let mut host = TerminalHost {
                source: &source,
                config: &config,
            };
            repl::run(io::stdin().lock(), session, &mut host)?;
        }
    }

    Ok(())
}

fn load_with_spinner(source: &dyn DataSource, config: &Config) -> Session {
    display_info(&format!(
        "Buscando {} e {}",
        config.stats_url, config.underperformance_url
    ));

    let pb = ProgressBar::new_spinner();
    pb.set_message("Carregando dados dos jogadores");
    pb.enable_steady_tick(Duration::from_millis(100));
    let session = load_session(source, config);
    pb.finish_and_clear();

    if session.players().is_empty() {
        display_info("Nenhum jogador carregado");
    } else {
        display_success(&format!("{} jogadores carregados", session.players().len()));
    }
    session
}

fn write_page(session: &Session, path: &Path) -> Result<(), AppError> {
    let html = render_document(session, chrono::Utc::now());
    fs::write(path, html)
        .map_err(|e| AppError::IoError(format!("{}: {}", path.display(), e)))?;
    info!(path = %path.display(), "page written");
    Ok(())
}

struct TerminalHost<'a> {
    source: &'a dyn DataSource,
    config: &'a Config,
}

impl Host for TerminalHost<'_> {
    fn reload(&mut self) -> Session {
        load_with_spinner(self.source, self.config)
    }

    fn export(&mut self, session: &Session, path: &Path) -> Result<(), AppError> {
        write_page(session, path)
    }
}
