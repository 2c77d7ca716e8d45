use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use plan_core::model::{Session, UserId};
use services::{
    AppServices, AssessmentService, AuthService, Clock, GoalService, InterestService,
    ProfileService,
};
use storage::repository::{SessionRepository, Storage};
use storage::rest::{RestConfig, RestRepository};
use storage::sqlite::SqliteRepository;
use tracing::info;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    MissingApiKey,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::MissingApiKey => write!(f, "PLAN_API_KEY is required with --backend-url"),
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
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn auth(&self) -> Arc<AuthService> {
        self.services.auth()
    }

    fn profiles(&self) -> Arc<ProfileService> {
        self.services.profiles()
    }

    fn goals(&self) -> Arc<GoalService> {
        self.services.goals()
    }

    fn assessments(&self) -> Arc<AssessmentService> {
        self.services.assessments()
    }

    fn interests(&self) -> Arc<InterestService> {
        self.services.interests()
    }
}

enum Backend {
    Sqlite { db_url: String },
    Rest(RestConfig),
}

struct Args {
    backend: Backend,
    user_email: Option<String>,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [ui] [--db <sqlite_url>] [--user-email <email>]");
    eprintln!("  cargo run -p app -- [ui] --backend-url <url>");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:dev.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PLAN_DB_URL, PLAN_BACKEND_URL, PLAN_API_KEY, PLAN_ACCESS_TOKEN,");
    eprintln!("  PLAN_USER_EMAIL, RUST_LOG");
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("PLAN_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("sqlite:dev.sqlite3".into()), normalize_sqlite_url);
        let mut backend_url = std::env::var("PLAN_BACKEND_URL").ok();
        let mut user_email = std::env::var("PLAN_USER_EMAIL").ok();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--backend-url" => backend_url = Some(require_value(args, "--backend-url")?),
                "--user-email" => user_email = Some(require_value(args, "--user-email")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let backend = match backend_url {
            Some(base_url) => Backend::Rest(RestConfig {
                base_url,
                api_key: std::env::var("PLAN_API_KEY").map_err(|_| ArgsError::MissingApiKey)?,
                access_token: std::env::var("PLAN_ACCESS_TOKEN").ok(),
            }),
            None => Backend::Sqlite { db_url },
        };

        Ok(Self {
            backend,
            user_email,
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

/// Open the `SQLite` store and make sure someone is signed in when an email is given.
async fn sqlite_storage(
    db_url: &str,
    user_email: Option<String>,
) -> Result<Storage, Box<dyn std::error::Error>> {
    prepare_sqlite_file(db_url)?;
    let repo = SqliteRepository::connect(db_url).await?;
    repo.migrate().await?;

    match (repo.current_session().await?, user_email) {
        (Some(session), _) => info!(user_id = %session.user_id, "resuming local session"),
        (None, Some(email)) => {
            let session = Session::new(UserId::random(), Some(email));
            repo.sign_in(&session).await?;
            info!(user_id = %session.user_id, "signed in local dev user");
        }
        (None, None) => info!("no local session; run the storage seed binary or pass --user-email"),
    }

    Ok(Storage::from_sqlite(&repo))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    match argv.first().map(String::as_str) {
        None => {}
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some("ui") => {
            argv.remove(0);
        }
        Some(first) if first.starts_with("--") => {}
        Some(first) => {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            return Err(
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand").into(),
            );
        }
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = match parsed.backend {
        Backend::Sqlite { db_url } => {
            info!(%db_url, "using local SQLite store");
            sqlite_storage(&db_url, parsed.user_email).await?
        }
        Backend::Rest(config) => {
            info!(base_url = %config.base_url, "using hosted store");
            let access_token = config.access_token.clone();
            let repo = RestRepository::new(RestConfig {
                access_token: None,
                ..config
            })?;
            match access_token {
                Some(token) => {
                    let session = repo.sign_in_with_token(token).await?;
                    info!(user_id = %session.user_id, "signed in with PLAN_ACCESS_TOKEN");
                }
                None => info!("no PLAN_ACCESS_TOKEN; onboarding will report a missing session"),
            }
            Storage::from_rest(&repo)
        }
    };

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services: AppServices::new(&storage, Clock::system()),
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Gather")
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
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
