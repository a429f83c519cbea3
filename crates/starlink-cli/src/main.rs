use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dialoguer::{Input, Password};
use dotenvy::dotenv;
use starlink_cli::seed::{self, DEFAULT_SEED_COST, DEFAULT_SEED_PASSWORD, SeedOptions};
use starlink_config::SessionConfig;
use starlink_core::permissions::ROLE_CLIENT;
use starlink_models::{Credentials, UserProfile};
use starlink_observability::init_basic_console_logging;
use starlink_session::{FileTokenStore, HttpIssuer, SessionStatus, SessionStore};

const DEFAULT_TOKEN_FILE: &str = "storage/session/tokens.json";

#[derive(Parser)]
#[command(name = "starlink-cli")]
#[command(about = "Starlink CLI - Administrative tools for the Starlink Platform", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a password with bcrypt (for seed files or manual inserts)
    HashPassword {
        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,

        /// bcrypt cost
        #[arg(short = 'c', long, default_value = "12")]
        cost: u32,
    },
    /// Generate a JSON file of fake users for USERS_SEED_FILE
    GenerateSeed {
        /// Number of users to generate
        #[arg(short = 'n', long, default_value = "50")]
        count: usize,

        /// Output file
        #[arg(short = 'o', long, default_value = "storage/seed/users.json")]
        output: PathBuf,

        /// Role given to every generated user
        #[arg(short = 'r', long, default_value = ROLE_CLIENT)]
        role: String,

        /// Shared password of the generated users
        #[arg(short = 'p', long, default_value = DEFAULT_SEED_PASSWORD)]
        password: String,

        /// bcrypt cost used for the shared hash
        #[arg(long, default_value_t = DEFAULT_SEED_COST)]
        cost: u32,
    },
    /// Log in against the API and persist the session tokens
    Login {
        /// Email address
        #[arg(short = 'e', long)]
        email: Option<String>,

        /// Password (will be prompted securely if not provided)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },
    /// Restore the persisted session and print the current user
    Whoami,
    /// End the persisted session
    Logout,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_basic_console_logging();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::HashPassword { password, cost } => handle_hash_password(password, cost),
        Commands::GenerateSeed {
            count,
            output,
            role,
            password,
            cost,
        } => handle_generate_seed(count, output, role, password, cost),
        Commands::Login { email, password } => handle_login(email, password).await,
        Commands::Whoami => handle_whoami().await,
        Commands::Logout => handle_logout().await,
    };

    if let Err(e) = result {
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

fn handle_hash_password(password: Option<String>, cost: u32) -> anyhow::Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords don't match")
            .interact()
            .context("failed to read password")?,
    };

    let hash = starlink_core::hash_password_with_cost(&password, cost).map_err(|e| e.error)?;
    println!("{}", hash);
    Ok(())
}

fn handle_generate_seed(
    count: usize,
    output: PathBuf,
    role: String,
    password: String,
    cost: u32,
) -> anyhow::Result<()> {
    let options = SeedOptions::new(count)
        .with_role(role)
        .with_password(password)
        .with_cost(cost);

    let users = seed::generate_seed(&options).map_err(|e| e.error)?;
    seed::write_seed_file(&output, &users)?;

    println!("\n✅ Seed file written!");
    println!("   Path: {}", output.display());
    println!("   Users: {}", users.len());
    println!("   Load it with USERS_SEED_FILE={}", output.display());
    Ok(())
}

async fn handle_login(email: Option<String>, password: Option<String>) -> anyhow::Result<()> {
    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Email address")
            .interact_text()
            .context("failed to read email")?,
    };

    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .context("failed to read password")?,
    };

    let store = session_store()?;
    let user = store.login(&Credentials::new(email, password)).await?;
    store.shutdown();

    println!("\n✅ Logged in!");
    print_profile(&user);
    Ok(())
}

async fn handle_whoami() -> anyhow::Result<()> {
    let store = session_store()?;
    let status = store.initialize().await;
    store.shutdown();

    match (status, store.user()) {
        (SessionStatus::Authenticated, Some(user)) => {
            print_profile(&user);
            Ok(())
        }
        _ => anyhow::bail!("Not logged in. Run `starlink-cli login` first."),
    }
}

async fn handle_logout() -> anyhow::Result<()> {
    let store = session_store()?;
    if store.initialize().await != SessionStatus::Authenticated {
        println!("Not logged in.");
        return Ok(());
    }

    store.logout().await;
    println!("\n✅ Logged out.");
    Ok(())
}

fn session_store() -> anyhow::Result<SessionStore> {
    let config = SessionConfig::from_env();
    let token_file = config
        .token_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_FILE));

    let issuer = HttpIssuer::new(&config)?;
    Ok(SessionStore::new(
        Arc::new(issuer),
        Arc::new(FileTokenStore::new(token_file)),
        config,
    ))
}

fn print_profile(user: &UserProfile) {
    let name = [user.first_name.as_deref(), user.last_name.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    println!("   Email: {}", user.email);
    if !name.is_empty() {
        println!("   Name: {}", name);
    }
    println!(
        "   Roles: {}",
        user.role_names().collect::<Vec<_>>().join(", ")
    );
    println!(
        "   Permissions: {}",
        user.permissions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
}
