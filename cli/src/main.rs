use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use migration::Migrator;
use sea_orm_migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use services::{FieldArgs, ModelKind};
use std::str::FromStr;
use tracing::{error, info, warn};
use util::config;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Action {
    Create,
    List,
    Update,
    Remove,
}

/// Academic records manager. Without `--action` it verifies the database,
/// seeds it when empty and runs the full report battery.
#[derive(Parser, Debug)]
#[command(name = "gradebook", version, about)]
struct Args {
    /// CRUD action to perform
    #[arg(long, value_enum)]
    action: Option<Action>,
    /// Target model: Teacher, Group, Student, Subject or Grade
    #[arg(long)]
    model: Option<String>,
    /// Name value (groups, students, teachers, subjects)
    #[arg(long)]
    name: Option<String>,
    /// Grade value in [1, 100]
    #[arg(long)]
    grade: Option<i32>,
    /// Row id for update/remove
    #[arg(long)]
    id: Option<i64>,
    #[arg(long)]
    student_id: Option<i64>,
    #[arg(long)]
    subject_id: Option<i64>,
    #[arg(long)]
    group_id: Option<i64>,
    #[arg(long)]
    teacher_id: Option<i64>,
    /// RFC 3339 timestamp for a grade's date_received (defaults to now)
    #[arg(long)]
    date_received: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let _log_guard = init_logging(&config::log_file());

    if let Err(e) = run(args).await {
        error!("unexpected error, aborting this run: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let db = db::connect().await;
    Migrator::up(&db, None).await?;

    match args.action {
        None => run_reports(&db).await?,
        Some(action) => run_crud(&db, action, args).await?,
    }
    Ok(())
}

async fn run_reports(db: &DatabaseConnection) -> Result<(), Box<dyn std::error::Error>> {
    if seeder::verify::all_tables_populated(db).await? {
        info!("Tables already populated, skipping seeding");
    } else {
        let summary = seeder::seed_all(db).await;
        for (phase, err) in &summary.failed {
            warn!("seed phase '{phase}' failed and was rolled back: {err}");
        }
    }

    reports::run_all(db).await;
    Ok(())
}

async fn run_crud(
    db: &DatabaseConnection,
    action: Action,
    args: Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(model) = args.model.as_deref() else {
        warn!("--model is required with --action");
        return Ok(());
    };
    let kind = match ModelKind::from_str(model) {
        Ok(kind) => kind,
        Err(_) => {
            warn!("Unrecognized model '{model}', ignoring");
            return Ok(());
        }
    };

    let date_received = match args.date_received.as_deref() {
        Some(raw) => Some(parse_timestamp(raw)?),
        None => None,
    };
    let fields = FieldArgs {
        name: args.name,
        grade: args.grade,
        student_id: args.student_id,
        subject_id: args.subject_id,
        group_id: args.group_id,
        teacher_id: args.teacher_id,
        date_received,
    };

    match action {
        Action::Create => {
            // Constraint and validation failures roll back this unit only.
            if let Err(e) = services::crud::create(db, kind, &fields).await {
                warn!("create {kind} failed: {e}");
            }
        }
        Action::List => {
            services::crud::list(db, kind).await?;
        }
        Action::Update => {
            let Some(id) = args.id else {
                warn!("--id is required for update");
                return Ok(());
            };
            if let Err(e) = services::crud::update(db, kind, id, &fields).await {
                warn!("update {kind} failed: {e}");
            }
        }
        Action::Remove => {
            let Some(id) = args.id else {
                warn!("--id is required for remove");
                return Ok(());
            };
            if let Err(e) = services::crud::remove(db, kind, id).await {
                warn!("remove {kind} failed: {e}");
            }
        }
    }
    Ok(())
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}

fn init_logging(log_file: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_appender::rolling;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(false);

    let env_filter = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new(config::log_level()));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if config::log_to_stdout() {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::parse_timestamp;

    #[test]
    fn test_parse_timestamp_accepts_rfc3339() {
        let parsed = parse_timestamp("2025-05-01T10:30:00Z").unwrap();
        assert_eq!(parsed.timestamp(), 1746095400);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("last tuesday").is_err());
    }
}
