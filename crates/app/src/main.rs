use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::QuizRules;
use services::{BankSource, Clock, QuestionBankLoader, QuizLoopService, ShareTarget};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;
use ui::{App, DesktopLinkOpener, LinkOpenerRef, UiApp, build_app_context};

const DEFAULT_BANK: &str = "quiz-data.json";
const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
const DEFAULT_SHARE_RECIPIENT: &str = "09163106930";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidTimeout { raw: String },
    InvalidRecipient { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTimeout { raw } => {
                write!(f, "invalid --fetch-timeout-secs value: {raw}")
            }
            ArgsError::InvalidRecipient { raw } => write!(f, "invalid --share-to value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    quiz_loop: Arc<QuizLoopService>,
    share_target: ShareTarget,
}

impl UiApp for DesktopApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn share_target(&self) -> ShareTarget {
        self.share_target.clone()
    }

    fn link_opener(&self) -> LinkOpenerRef {
        Arc::new(DesktopLinkOpener)
    }
}

struct Args {
    bank: String,
    db_url: String,
    share_to: String,
    fetch_timeout: Option<Duration>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- [--bank <path_or_url>] [--db <sqlite_url>] [--share-to <digits>] [--fetch-timeout-secs <n>]"
    );
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --bank {DEFAULT_BANK}");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --share-to {DEFAULT_SHARE_RECIPIENT}");
    eprintln!("  --fetch-timeout-secs 5");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_BANK, QUIZ_DB_URL, QUIZ_SHARE_RECIPIENT, QUIZ_FETCH_TIMEOUT_SECS");
    eprintln!("  RUST_LOG (default info), QUIZ_DEBUG_LOG=1 forces debug");
}

fn parse_timeout(raw: String) -> Result<Duration, ArgsError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ArgsError::InvalidTimeout { raw }),
    }
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut bank = std::env::var("QUIZ_BANK").unwrap_or_else(|_| DEFAULT_BANK.into());
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut share_to = std::env::var("QUIZ_SHARE_RECIPIENT")
            .unwrap_or_else(|_| DEFAULT_SHARE_RECIPIENT.into());
        let mut fetch_timeout = std::env::var("QUIZ_FETCH_TIMEOUT_SECS")
            .ok()
            .map(parse_timeout)
            .transpose()?;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--bank" => bank = require_value(args, "--bank")?,
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--share-to" => share_to = require_value(args, "--share-to")?,
                "--fetch-timeout-secs" => {
                    let value = require_value(args, "--fetch-timeout-secs")?;
                    fetch_timeout = Some(parse_timeout(value)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            bank,
            db_url,
            share_to,
            fetch_timeout,
        })
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_logging() {
    let debug_enabled = std::env::var("QUIZ_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let share_target = ShareTarget::new(Some(&parsed.share_to)).map_err(|_| {
        ArgsError::InvalidRecipient {
            raw: parsed.share_to.clone(),
        }
    })?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let storage = Storage::sqlite(&parsed.db_url).await?;

    let mut rules = QuizRules::default();
    if let Some(timeout) = parsed.fetch_timeout {
        rules = rules.with_fetch_timeout(timeout);
    }
    let source = BankSource::parse(&parsed.bank);
    tracing::info!(source = ?source, db = %parsed.db_url, "starting quiz");
    let loader = QuestionBankLoader::new(source, &rules);
    let quiz_loop = Arc::new(QuizLoopService::new(
        Clock::default_clock(),
        rules,
        loader,
        &storage,
    ));

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        quiz_loop,
        share_target,
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Front-end Quiz")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    init_logging();
    if let Err(err) = run().await {
        tracing::error!(error = %err, "quiz failed to launch");
        eprintln!("{err}");
        std::process::exit(2);
    }
}
