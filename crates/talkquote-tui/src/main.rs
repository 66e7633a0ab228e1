use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use talkquote_core::{Category, ConfigField, GeminiClient, NotificationKind, Session, Settings, TalkClient};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "talkquote")]
#[command(about = "Generate quotes with Gemini and post them to a Nextcloud Talk room")]
#[command(version)]
struct Cli {
    /// Write logs here instead of the default data directory
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal UI (default)
    Tui {
        /// Category selected at startup
        #[arg(short, long, value_parser = parse_category, default_value = "motivational")]
        category: Category,
    },
    /// Generate one quote and print it
    Generate {
        #[arg(short, long, value_parser = parse_category, default_value = "motivational")]
        category: Category,
    },
    /// Post a quote to a Talk room, generating one unless --quote and --author are given
    Post {
        /// Nextcloud base URL, e.g. https://cloud.example.com
        #[arg(long)]
        url: String,
        /// Talk room token
        #[arg(long)]
        room: String,
        /// Bot username
        #[arg(long)]
        user: String,
        /// Bot app password
        #[arg(long, env = "TALK_BOT_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(short, long, value_parser = parse_category, default_value = "motivational")]
        category: Category,
        #[arg(long, requires = "author")]
        quote: Option<String>,
        #[arg(long, requires = "quote")]
        author: Option<String>,
    },
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::from_str(s).ok_or_else(|| {
        let names: Vec<&str> = Category::all().iter().map(|c| c.as_str()).collect();
        format!("unknown category '{}', expected one of: {}", s, names.join(", "))
    })
}

fn default_log_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("talkquote"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("talkquote.log")
}

/// Send tracing output to a file so it never draws over the TUI
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(default_log_path);
    init_logging(&log_path)?;

    // The Gemini key must be present before anything else runs
    let settings = Settings::load()?;
    let gemini = GeminiClient::from_settings(&settings)?;
    tracing::info!(model = gemini.model(), log = %log_path.display(), "starting talkquote");

    match cli.command.unwrap_or(Commands::Tui { category: Category::default() }) {
        Commands::Tui { category } => run_tui(gemini, category).await,
        Commands::Generate { category } => generate_once(&gemini, category).await,
        Commands::Post { url, room, user, password, category, quote, author } => {
            let mut session = Session::new();
            session.set_category(category);
            session.set_config_field(ConfigField::Url, url);
            session.set_config_field(ConfigField::RoomToken, room);
            session.set_config_field(ConfigField::BotUser, user);
            session.set_config_field(ConfigField::BotPassword, password);
            post_once(session, &gemini, quote.zip(author)).await
        }
    }
}

async fn run_tui(gemini: GeminiClient, category: Category) -> Result<()> {
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut app = App::new(gemini, TalkClient::new(), category);
    let mut events = EventHandler::new();

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }
    Ok(())
}

/// Fail with the session's error notification, if that is what the last action left
fn check_outcome(session: &Session) -> Result<()> {
    match session.notification() {
        Some(n) if n.kind == NotificationKind::Error => bail!("{}", n.message),
        _ => Ok(()),
    }
}

async fn generate_once(gemini: &GeminiClient, category: Category) -> Result<()> {
    let mut session = Session::new();
    session.set_category(category);
    session.generate(gemini).await;
    check_outcome(&session)?;

    if let Some(quote) = session.current_quote() {
        println!("{}", quote.to_message());
    }
    Ok(())
}

async fn post_once(
    mut session: Session,
    gemini: &GeminiClient,
    given: Option<(String, String)>,
) -> Result<()> {
    match given {
        Some((quote, author)) => {
            session.add_custom_quote(&quote, &author);
            check_outcome(&session)?;
            session.select_custom_quote(0);
        }
        None => {
            session.generate(gemini).await;
            check_outcome(&session)?;
        }
    }

    session.post(&TalkClient::new()).await;
    check_outcome(&session)?;

    if let Some(quote) = session.current_quote() {
        println!("Posted: {}", quote.to_message());
    }
    Ok(())
}
