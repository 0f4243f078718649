//! `fitness` command-line client.
//!
//! Thin front end over the library: every subcommand is one or two calls on
//! [`Client`], with the session persisted in a JSON file between runs.

#![allow(clippy::too_many_lines)]

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use serde::Serialize;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use fitness_client::config::{AppConfig, ConfigArgs, LogConfig};
use fitness_client::types::{
    Category, ExerciseFilter, Experience, Objective, PasswordChange, RegisterRequest, Role,
    RoutineExercise,
};
use fitness_client::views::{RoutineView, stats};
use fitness_client::{Client, FileSessionStore, LogNavigator, UserRecord};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FITNESS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account
    Register(RegisterArgs),
    /// Revoke the session on the server and clear it locally
    Logout,
    /// Show the stored user record
    Whoami,
    /// Exercise catalogue
    #[command(subcommand)]
    Exercises(ExerciseCommand),
    /// Your routines
    #[command(subcommand)]
    Routines(RoutineCommand),
    /// Completed routines
    #[command(subcommand)]
    Workouts(WorkoutCommand),
    /// Your profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Admin dashboard
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(clap::Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    user_name: String,
    #[arg(long)]
    email: String,
    #[arg(long, env = "FITNESS_PASSWORD", hide_env_values = true)]
    password: String,
    /// YYYY-MM-DD
    #[arg(long)]
    birth_date: NaiveDate,
    /// Kilograms
    #[arg(long)]
    weight: f32,
    /// Centimetres
    #[arg(long)]
    height: f32,
    #[arg(long, value_enum)]
    experience: Experience,
    #[arg(long, value_enum)]
    objective: Objective,
}

#[derive(Subcommand, Debug)]
enum ExerciseCommand {
    List,
    Get {
        id: String,
    },
    Filter {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long)]
        muscle_group: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum RoutineCommand {
    List,
    /// Show a routine with the name of every exercise in it
    View {
        id: String,
    },
    Create {
        name: String,
    },
    Delete {
        id: String,
    },
    AddExercise {
        routine_id: String,
        #[arg(long)]
        exercise: String,
        #[arg(long)]
        repetitions: u32,
        #[arg(long)]
        series: u32,
        #[arg(long, default_value_t = 0.0)]
        weight: f64,
    },
}

#[derive(Subcommand, Debug)]
enum WorkoutCommand {
    List,
    /// Record a routine as done now
    Complete {
        routine_id: String,
    },
    Stats,
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
    Show,
    Password {
        #[arg(long)]
        current: String,
        #[arg(long)]
        new: String,
        #[arg(long)]
        confirm: String,
    },
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// User count and age brackets
    Users,
    /// Most used exercises
    Ranking {
        #[arg(long, default_value_t = 3)]
        top: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env (if present)
    let _ = dotenv();

    let cli = Cli::parse();

    let config = match AppConfig::from_args(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log);

    info!(
        name: "config.loaded",
        base_url = %config.backend.base_url,
        session_file = %config.session.file,
        "Configuration loaded"
    );

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing (M-LOG-STRUCTURED). Logs go to stderr so stdout
/// carries only command output.
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let json = log.is_json();
    tracing_subscriber::registry()
        .with(filter)
        .with(
            json.then(|| {
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr)
            }),
        )
        .with((!json).then(|| fmt::layer().with_target(true).with_writer(std::io::stderr)))
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The stored user, or an error telling the user to log in.
fn require_user(client: &Client) -> anyhow::Result<UserRecord> {
    match client.current_user()? {
        Some(user) => Ok(user),
        None => bail!("not logged in; run `fitness login` first"),
    }
}

fn require_user_id(client: &Client) -> anyhow::Result<String> {
    let user = require_user(client)?;
    user.id()
        .map(str::to_string)
        .context("stored user record has no id")
}

async fn run(command: Command, config: &AppConfig) -> anyhow::Result<()> {
    let client = Client::builder(&config.backend.base_url)
        .store(Arc::new(FileSessionStore::new(&config.session.file)))
        .navigator(Arc::new(LogNavigator))
        .routes(config.session.routes())
        .build()
        .context("invalid backend URL")?;

    match command {
        Command::Login { email, password } => {
            let user = client.auth().login(&email, &password).await?;
            print_json(&user)?;
        }
        Command::Register(args) => {
            let req = RegisterRequest {
                name: args.name,
                last_name: args.last_name,
                user_name: args.user_name,
                email: args.email,
                password: args.password,
                birth_date: args
                    .birth_date
                    .and_hms_opt(0, 0, 0)
                    .context("invalid birth date")?
                    .and_utc(),
                weight: args.weight,
                height: args.height,
                experience: args.experience,
                objetive: args.objective,
                role: Role::Client,
            };
            print_json(&client.auth().register(&req).await?)?;
        }
        Command::Logout => {
            client.auth().sign_out().await?;
            println!("Logged out");
        }
        Command::Whoami => print_json(&require_user(&client)?)?,
        Command::Exercises(cmd) => exercises(&client, cmd).await?,
        Command::Routines(cmd) => routines(&client, cmd).await?,
        Command::Workouts(cmd) => workouts(&client, cmd).await?,
        Command::Profile(cmd) => profile(&client, cmd).await?,
        Command::Admin(cmd) => admin(&client, cmd).await?,
    }
    Ok(())
}

async fn exercises(client: &Client, cmd: ExerciseCommand) -> anyhow::Result<()> {
    let api = client.exercises();
    match cmd {
        ExerciseCommand::List => print_json(&api.list().await?)?,
        ExerciseCommand::Get { id } => print_json(&api.get(&id).await?)?,
        ExerciseCommand::Filter {
            name,
            category,
            muscle_group,
        } => {
            let filter = ExerciseFilter {
                name,
                category: category.map(|c| c.as_str().to_string()),
                muscle_group,
            };
            print_json(&api.filter(&filter).await?)?;
        }
        ExerciseCommand::Delete { id } => {
            api.delete(&id).await?;
            println!("Exercise {id} deleted");
        }
    }
    Ok(())
}

async fn routines(client: &Client, cmd: RoutineCommand) -> anyhow::Result<()> {
    let api = client.routines();
    match cmd {
        RoutineCommand::List => print_json(&api.mine().await?)?,
        RoutineCommand::View { id } => {
            let view = RoutineView::load(client, &id).await?;
            let entries: Vec<_> = view
                .entries
                .iter()
                .map(|e| {
                    json!({
                        "name": e.label(),
                        "series": e.slot.series,
                        "repetitions": e.slot.repetitions,
                        "weight": e.slot.weight,
                    })
                })
                .collect();
            print_json(&json!({ "name": view.name, "exercises": entries }))?;
        }
        RoutineCommand::Create { name } => print_json(&api.create(&name).await?)?,
        RoutineCommand::Delete { id } => {
            api.delete(&id).await?;
            println!("Routine {id} deleted");
        }
        RoutineCommand::AddExercise {
            routine_id,
            exercise,
            repetitions,
            series,
            weight,
        } => {
            let item = RoutineExercise {
                exercise_id: exercise,
                repetitions,
                series,
                weight,
            };
            api.add_exercise(&routine_id, &item).await?;
            println!("Exercise added to routine {routine_id}");
        }
    }
    Ok(())
}

async fn workouts(client: &Client, cmd: WorkoutCommand) -> anyhow::Result<()> {
    let api = client.workouts();
    match cmd {
        WorkoutCommand::List => print_json(&api.list().await?)?,
        WorkoutCommand::Complete { routine_id } => print_json(&api.complete(&routine_id).await?)?,
        WorkoutCommand::Stats => print_json(&api.stats().await?)?,
        WorkoutCommand::Delete { id } => {
            api.delete(&id).await?;
            println!("Workout {id} deleted");
        }
    }
    Ok(())
}

async fn profile(client: &Client, cmd: ProfileCommand) -> anyhow::Result<()> {
    let user_id = require_user_id(client)?;
    match cmd {
        ProfileCommand::Show => print_json(&client.users().get(&user_id).await?)?,
        ProfileCommand::Password {
            current,
            new,
            confirm,
        } => {
            let change = PasswordChange {
                current_password: current,
                new_password: new,
                confirm_password: confirm,
            };
            let message = client.users().change_password(&user_id, &change).await?;
            println!("{message}");
        }
    }
    Ok(())
}

async fn admin(client: &Client, cmd: AdminCommand) -> anyhow::Result<()> {
    let api = client.admin();
    match cmd {
        AdminCommand::Users => {
            let user_stats = api.user_stats().await?;
            let groups = stats::age_groups(&user_stats.users, Utc::now().date_naive());
            print_json(&json!({ "total": user_stats.total, "age_groups": groups }))?;
        }
        AdminCommand::Ranking { top } => {
            let ranking = api.exercise_ranking().await?;
            print_json(stats::top_exercises(&ranking, top))?;
        }
    }
    Ok(())
}
