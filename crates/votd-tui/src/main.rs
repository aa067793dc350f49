use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use votd_core::config::API_KEY_ENV;
use votd_core::{
    ApiBibleClient, CanonicalVerseId, Config, FetcherOptions, LabsBibleClient, Translation,
    VerseFetcher,
};

mod app;
mod handler;
mod platform;
mod tui;
mod ui;

use app::{App, Fetcher};
use platform::SystemPlatform;

#[derive(Parser)]
#[command(name = "votd", version)]
#[command(about = "A random Bible verse in your terminal, in the translation you pick")]
struct Cli {
    /// Translation code (WEB, KJV, ASV, BSB)
    #[arg(short, long, global = true, value_parser = parse_translation)]
    translation: Option<Translation>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one random verse and exit
    Random,
    /// Print a specific verse, e.g. JHN.3.16
    Verse {
        /// Canonical verse id (BOOK.CHAPTER.VERSE)
        id: String,
    },
    /// List the supported translations
    Translations,
}

fn parse_translation(s: &str) -> Result<Translation, String> {
    Translation::from_code(s).ok_or_else(|| {
        let codes: Vec<&str> = Translation::all().iter().map(|t| t.as_str()).collect();
        format!("unknown translation \"{}\" (expected one of {})", s, codes.join(", "))
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Translations) = cli.command {
        for translation in Translation::all() {
            println!("{:<4} {}", translation.as_str(), translation.display_name());
        }
        return Ok(());
    }

    let log_path = init_logging()?;
    let config = Config::load()?.with_env_api_key(std::env::var(API_KEY_ENV).ok());
    tracing::info!(log = %log_path.display(), "starting votd");

    let translation = cli.translation.unwrap_or(config.default_translation);
    let fetcher = build_fetcher(&config, translation)?;

    match cli.command {
        None => run_tui(fetcher).await,
        Some(Commands::Random) => {
            let mut fetcher = fetcher;
            fetcher.request_random_verse();
            print_verse(fetcher).await
        }
        Some(Commands::Verse { id }) => {
            let id: CanonicalVerseId = id.parse()?;
            let mut fetcher = fetcher;
            fetcher.fetch_canonical_verse(translation, id);
            print_verse(fetcher).await
        }
        Some(Commands::Translations) => Ok(()),
    }
}

/// Log to `<cache_dir>/votd/votd.log`; the terminal belongs to the UI.
fn init_logging() -> Result<PathBuf> {
    let log_dir = dirs::cache_dir()
        .ok_or_else(|| anyhow!("Could not determine cache directory"))?
        .join("votd");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("votd.log");

    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;
    let filter = EnvFilter::try_from_env("VOTD_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(log_path)
}

fn build_fetcher(config: &Config, translation: Translation) -> Result<Fetcher> {
    // Read once here and handed to the client; request code never looks it up.
    let api_key = config.api_key()?;

    let random = LabsBibleClient::new(&config.random_verse_url);
    let canonical = ApiBibleClient::new(&config.canonical_base_url, api_key);
    let platform = SystemPlatform::detect(config.share_command.clone());

    Ok(VerseFetcher::new(
        Arc::new(random),
        Arc::new(canonical),
        Arc::new(platform),
        FetcherOptions {
            translation,
            timeout: config.request_timeout(),
            share_url: config.share_url.clone(),
        },
    ))
}

async fn print_verse(mut fetcher: Fetcher) -> Result<()> {
    fetcher.settle().await;
    let state = fetcher.state();

    if let Some(err) = &state.error {
        bail!("Could not load verse: {}", err);
    }
    let payload = state
        .payload
        .as_ref()
        .ok_or_else(|| anyhow!("Could not load verse"))?;

    println!("{}", payload.plain_text());
    println!("  \u{2014} {} ({})", payload.reference, payload.translation);
    Ok(())
}

async fn run_tui(fetcher: Fetcher) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(fetcher);

    // First verse on startup
    app.request_random_verse();

    let result = run_loop(&mut terminal, &mut app, &mut events).await;
    tui::restore()?;
    result
}

async fn run_loop(
    terminal: &mut tui::Tui,
    app: &mut App,
    events: &mut tui::EventHandler,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}
