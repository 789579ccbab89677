//! User Service - administrative CLI for the user registry.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common::{AppError, AppResult};
use domain::{DomainError, NewUser, PasswordHash, UserRecord, UserRole};
use user_service_lib::config::UserServiceConfig;
use user_service_lib::infra::Database;
use user_service_lib::service::UserService;

#[derive(Parser)]
#[command(name = "user-service")]
#[command(about = "User registry administration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the users table if it does not exist
    InitSchema,
    #[command(flatten)]
    User(UserCommand),
}

#[derive(Subcommand)]
enum UserCommand {
    /// Register a new user in PENDING state
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Pre-computed credential hash
        #[arg(long)]
        password_hash: String,
        #[arg(long)]
        employee_number: Option<String>,
    },
    /// List users awaiting approval
    Pending,
    /// Show a single user
    Show { email: String },
    /// Approve a pending user
    Approve { email: String },
    /// Change a user's role (researcher or admin)
    SetRole {
        email: String,
        #[arg(value_parser = parse_role_arg)]
        role: UserRole,
    },
}

/// Roles on the command line are case-insensitive (`admin`, `ADMIN`).
fn parse_role_arg(arg: &str) -> Result<UserRole, DomainError> {
    arg.to_ascii_uppercase().parse()
}

fn render_error(err: &AppError) -> String {
    format!("{}: {}", err.code(), err.user_message())
}

fn print_user(user: &UserRecord) -> AppResult<()> {
    let line = serde_json::to_string(user).map_err(|e| AppError::internal(e.to_string()))?;
    println!("{}", line);
    Ok(())
}

async fn init_schema(config: &UserServiceConfig) -> AppResult<()> {
    let db = Database::connect(&config.database).await?;
    db.ensure_schema().await?;
    Ok(())
}

async fn run_user_command(command: UserCommand, config: &UserServiceConfig) -> AppResult<()> {
    let service = user_service_lib::build_service(config).await?;

    match command {
        UserCommand::Register {
            name,
            email,
            password_hash,
            employee_number,
        } => {
            let user = service
                .register(NewUser {
                    name,
                    email,
                    password_hash: PasswordHash::from_hash(password_hash),
                    employee_number,
                })
                .await?;
            print_user(&user)
        }
        UserCommand::Pending => {
            for user in service.list_pending().await? {
                print_user(&user)?;
            }
            Ok(())
        }
        UserCommand::Show { email } => print_user(&service.get_user_by_email(&email).await?),
        UserCommand::Approve { email } => print_user(&service.approve(&email).await?),
        UserCommand::SetRole { email, role } => {
            print_user(&service.assign_role(&email, role).await?)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();
    let config = UserServiceConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::InitSchema => init_schema(&config).await,
        Commands::User(command) => run_user_command(command, &config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", render_error(&err));
            ExitCode::FAILURE
        }
    }
}
