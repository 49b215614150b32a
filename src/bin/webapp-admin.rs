//! Administration CLI
//!
//! Account maintenance that cannot go through the HTTP API, most importantly
//! bootstrapping the first administrator. Talks to PostgreSQL directly.

use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;

use webapp_api::{
    config::SecurityConfig,
    database::{run_migrations, DatabaseConfig, StorageBackend},
    service::UserService,
    store::PgStore,
};

/// Web application administration CLI
#[derive(Parser)]
#[command(name = "webapp-admin", about = "Web application administration CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account with the admin role
    CreateAdmin(CreateAdminArgs),
    /// Grant the admin role to an existing account
    Promote(PromoteArgs),
    /// List all accounts
    ListUsers,
}

#[derive(Args)]
struct CreateAdminArgs {
    /// Display name
    #[arg(short, long)]
    name: String,

    /// Email address (must not be registered yet)
    #[arg(short, long)]
    email: String,

    /// Password (8-128 characters, letters and digits)
    #[arg(short, long)]
    password: String,
}

#[derive(Args)]
struct PromoteArgs {
    /// Email address of the account to promote
    #[arg(short, long)]
    email: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    let db_config = DatabaseConfig::from_env().context("Invalid database configuration")?;
    if db_config.backend != StorageBackend::Postgres {
        bail!("webapp-admin requires STORAGE_BACKEND=postgres");
    }

    let security = SecurityConfig::from_env();
    security.validate()?;

    let database_pool = db_config
        .create_pool()
        .await
        .context("Failed to connect to database")?;

    // Run migrations to ensure database is up to date
    run_migrations(&database_pool)
        .await
        .context("Failed to run migrations")?;

    let store = Arc::new(PgStore::new(database_pool));
    let user_service = UserService::with_bcrypt_cost(store, security.bcrypt_cost);

    match cli.command {
        Commands::CreateAdmin(args) => create_admin(&user_service, args).await?,
        Commands::Promote(args) => promote(&user_service, args).await?,
        Commands::ListUsers => list_users(&user_service).await?,
    }

    Ok(())
}

async fn create_admin(
    service: &UserService,
    args: CreateAdminArgs,
) -> anyhow::Result<()> {
    println!("🔧 Creating admin account...");

    let user = service
        .create_admin(&args.name, &args.email, &args.password)
        .await
        .context("Failed to create admin account")?;

    println!("✅ Admin account created!");
    println!();
    println!("📋 Account Details:");
    println!("   ID: {}", user.id);
    println!("   Name: {}", user.name);
    println!("   Email: {}", user.email);
    println!("   Role: {}", user.role);
    println!();
    println!("Log in with POST /api/auth/login to obtain an admin token.");

    Ok(())
}

async fn promote(
    service: &UserService,
    args: PromoteArgs,
) -> anyhow::Result<()> {
    println!("🔧 Promoting {}...", args.email);

    let user = service
        .promote_by_email(&args.email)
        .await
        .with_context(|| format!("Failed to promote {}", args.email))?;

    println!("✅ {} ({}) is now an admin.", user.name, user.email);
    println!("⚠️  Tokens issued before this change still carry the old role until they expire.");

    Ok(())
}

async fn list_users(service: &UserService) -> anyhow::Result<()> {
    println!("📋 Listing all users...");

    let users = service.list_users().await?;

    if users.is_empty() {
        println!("No users found.");
        println!("Create the first admin with: webapp-admin create-admin --name \"Admin\" --email admin@example.com --password <password>");
        return Ok(());
    }

    println!();
    println!("{:<38} {:<30} {:<8} {:<20}", "ID", "Email", "Role", "Created");
    println!("{}", "-".repeat(96));

    for user in users {
        println!(
            "{:<38} {:<30} {:<8} {:<20}",
            user.id,
            truncate_string(&user.email, 29),
            user.role,
            user.created_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
