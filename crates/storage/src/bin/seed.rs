use std::fmt;

use plan_core::model::{
    GOAL_CATALOG, Goal, INTEREST_CATALOG, OnboardingStage, ProfileUpdate, Session, UserId,
};
use storage::repository::ProfileRepository;
use storage::sqlite::SqliteRepository;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    email: String,
    user_id: Option<UserId>,
    completed: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUserId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user-id value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("PLAN_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3?mode=rwc".into());
        let mut email =
            std::env::var("PLAN_USER_EMAIL").unwrap_or_else(|_| "dev@example.com".into());
        let mut user_id = None;
        let mut completed = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--email" => {
                    email = require_value(&mut args, "--email")?;
                }
                "--user-id" => {
                    let value = require_value(&mut args, "--user-id")?;
                    let parsed = value
                        .parse::<UserId>()
                        .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?;
                    user_id = Some(parsed);
                }
                "--completed" => completed = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            email,
            user_id,
            completed,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3?mode=rwc)");
    eprintln!("  --email <address>         Email of the signed-in dev user");
    eprintln!("  --user-id <uuid>          Fixed user id (default: random)");
    eprintln!("  --completed               Also write a finished onboarding profile");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  PLAN_DB_URL, PLAN_USER_EMAIL");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let repo = SqliteRepository::connect(&args.db_url).await?;
    repo.migrate().await?;

    let user_id = args.user_id.unwrap_or_else(UserId::random);
    repo.sign_in(&Session::new(user_id, Some(args.email.clone())))
        .await?;

    if args.completed {
        let goals = GOAL_CATALOG
            .iter()
            .take(2)
            .zip(1_u32..)
            .map(|(option, priority)| Goal {
                id: option.id.to_owned(),
                label: option.label.to_owned(),
                priority,
            })
            .collect();
        let update = ProfileUpdate::new()
            .with_goals(goals)
            .with_interests(vec![INTEREST_CATALOG[0].to_owned()])
            .with_onboarding_step(OnboardingStage::Done.progress_step())
            .with_onboarding_completed(true);
        repo.update_profile(user_id, &update).await?;
    }

    println!(
        "Signed in {} as {} in {}{}",
        args.email,
        user_id,
        args.db_url,
        if args.completed { " with a completed profile" } else { "" }
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
