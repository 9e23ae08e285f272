//! CLI administration tool for hr-talent.
//!
//! Provides commands for managing user accounts, viewing platform statistics,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # List accounts
//! cargo run --bin admin -- user list
//!
//! # Lift a login lockout
//! cargo run --bin admin -- user unlock amina@example.com
//!
//! # Disable or re-enable an account
//! cargo run --bin admin -- user deactivate amina@example.com
//! cargo run --bin admin -- user activate amina@example.com
//!
//! # Create an administrator
//! cargo run --bin admin -- user create-admin --email ops@example.com
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Drop stale logout records
//! cargo run --bin admin -- db purge-tokens
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//!
//! # Features
//!
//! - **User Management**: List, unlock, activate, deactivate, create admins
//! - **Statistics**: Accounts, postings, applications, subscriptions, deliveries
//! - **Database Tools**: Connection checks and info queries
//! - **Interactive Prompts**: Confirmation dialogs and hidden password input
//! - **Colored Output**: Terminal-friendly formatting using `colored` crate

use hr_talent::domain::entities::{NewUser, User, UserRole};
use hr_talent::domain::repositories::{RevokedTokenRepository, UserRepository};
use hr_talent::infrastructure::persistence::{PgRevokedTokenRepository, PgUserRepository};
use hr_talent::utils::password::hash_password;
use hr_talent::utils::secrets::generate_token;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// CLI tool for managing hr-talent.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// List accounts, newest first
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,

        /// Accounts per page
        #[arg(long, default_value_t = 25)]
        per_page: u32,
    },

    /// Clear failed login attempts and any lockout
    Unlock { email: String },

    /// Allow an account to sign in again
    Activate { email: String },

    /// Block an account from signing in
    Deactivate {
        email: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Create an administrator account
    CreateAdmin {
        #[arg(short, long)]
        email: Option<String>,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        /// Grant the super-admin role
        #[arg(long = "super")]
        super_admin: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Delete revoked-token entries whose tokens have expired
    PurgeTokens,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgUserRepository::new(Arc::new(pool.clone())));

    match action {
        UserAction::List { page, per_page } => list_users(repo, page, per_page).await?,
        UserAction::Unlock { email } => unlock_user(repo, &email).await?,
        UserAction::Activate { email } => set_active(repo, &email, true, true).await?,
        UserAction::Deactivate { email, yes } => set_active(repo, &email, false, yes).await?,
        UserAction::CreateAdmin {
            email,
            first_name,
            last_name,
            super_admin,
        } => create_admin(repo, email, first_name, last_name, super_admin).await?,
    }

    Ok(())
}

async fn find_user(repo: &PgUserRepository, email: &str) -> Result<User> {
    repo.find_by_email(&email.trim().to_lowercase())
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("No account with email {email}"))
}

/// Lists accounts with status indicators.
///
/// # Output Format
///
/// ```text
/// 👥 Users
///
///   ID    Email                          Role         Created            Status
///   ──────────────────────────────────────────────────────────────────────────────
///   12    amina@example.com              job-seeker   2025-10-01 09:12   ACTIVE
///   9     hr@acme.co.ke                  employer     2025-09-28 16:40   LOCKED
/// ```
async fn list_users(repo: Arc<PgUserRepository>, page: u32, per_page: u32) -> Result<()> {
    println!("{}", "👥 Users".bright_blue().bold());
    println!();

    let per_page = per_page.clamp(1, 500);
    let offset = i64::from(page.max(1) - 1) * i64::from(per_page);

    let users = repo
        .list(offset, i64::from(per_page))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;
    let total = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<12} {:<18} {:<10}",
        "ID".bright_white().bold(),
        "Email".bright_white().bold(),
        "Role".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    let now = chrono::Utc::now();
    for user in &users {
        let status = if !user.is_active {
            "INACTIVE".red()
        } else if user.locked_until.is_some_and(|until| until > now) {
            "LOCKED".yellow()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<5} {:<30} {:<12} {:<18} {}",
            user.id.to_string().bright_black(),
            user.email.cyan(),
            user.role.as_str(),
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Showing {} of {}",
        users.len().to_string().bright_white().bold(),
        total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn unlock_user(repo: Arc<PgUserRepository>, email: &str) -> Result<()> {
    let user = find_user(&repo, email).await?;

    repo.clear_lock(user.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to unlock account: {}", e))?;

    println!(
        "{} {}",
        "✅ Unlocked".green().bold(),
        user.email.cyan()
    );
    Ok(())
}

async fn set_active(
    repo: Arc<PgUserRepository>,
    email: &str,
    active: bool,
    skip_confirm: bool,
) -> Result<()> {
    let user = find_user(&repo, email).await?;

    if user.is_active == active {
        let state = if active { "active" } else { "inactive" };
        println!("{}", format!("⚠️  {} is already {state}", user.email).yellow());
        return Ok(());
    }

    if !skip_confirm {
        println!("  User: {} ({})", user.full_name().cyan(), user.email);
        let confirmed = Confirm::new()
            .with_prompt("Deactivate this account?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    repo.set_active(user.id, active)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update account: {}", e))?;

    let verb = if active { "Activated" } else { "Deactivated" };
    println!("{} {}", format!("✅ {verb}").green().bold(), user.email.cyan());
    Ok(())
}

/// Creates an administrator account with interactive prompts.
///
/// The account is created with a verified email and no company or job seeker
/// profile.
async fn create_admin(
    repo: Arc<PgUserRepository>,
    email: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    super_admin: bool,
) -> Result<()> {
    println!("{}", "🛡️  Create Administrator".bright_blue().bold());
    println!();

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    }
    .trim()
    .to_lowercase();

    if repo
        .find_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .is_some()
    {
        anyhow::bail!("An account with email {email} already exists");
    }

    let first_name = match first_name {
        Some(n) => n,
        None => Input::new().with_prompt("First name").interact_text()?,
    };
    let last_name = match last_name {
        Some(n) => n,
        None => Input::new().with_prompt("Last name").interact_text()?,
    };

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .validate_with(|input: &String| -> Result<(), &str> {
            if input.len() >= 8 {
                Ok(())
            } else {
                Err("Password must be at least 8 characters")
            }
        })
        .interact()?;

    let role = if super_admin {
        UserRole::SuperAdmin
    } else {
        UserRole::Admin
    };

    let password_hash = hash_password(password)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    let verification_token =
        generate_token().map_err(|e| anyhow::anyhow!("Failed to generate token: {}", e))?;

    let user = repo
        .create(NewUser {
            uuid: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            phone: None,
            password_hash,
            role,
            email_verification_token: verification_token,
            company: None,
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create account: {}", e))?;

    repo.mark_email_verified(user.id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to verify email: {}", e))?;

    println!();
    println!(
        "{} {} ({})",
        "✅ Created".green().bold(),
        user.email.cyan(),
        role.as_str().bright_white()
    );
    println!();

    Ok(())
}

/// Displays platform statistics.
///
/// Shows:
/// - Accounts per role
/// - Companies, active job postings and applications
/// - Active subscriptions
/// - Email and SMS deliveries per status
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let roles: Vec<(String, i64)> = sqlx::query_as(
        "SELECT role, COUNT(*) FROM users WHERE deleted_at IS NULL GROUP BY role ORDER BY role",
    )
    .fetch_all(pool)
    .await?;

    println!("{}", "  Users".bright_white().bold());
    for (role, count) in &roles {
        println!("    {:<14} {}", role, count.to_string().bright_green().bold());
    }
    println!();

    let companies: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies WHERE is_active AND deleted_at IS NULL")
        .fetch_one(pool)
        .await?;
    let active_jobs: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM job_postings WHERE status = 'active' AND deleted_at IS NULL",
    )
    .fetch_one(pool)
    .await?;
    let applications: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM job_applications WHERE deleted_at IS NULL")
            .fetch_one(pool)
            .await?;
    let subscriptions: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM subscriptions WHERE status IN ('trial', 'active') AND ends_at > NOW()",
    )
    .fetch_one(pool)
    .await?;

    println!(
        "  Companies:            {}",
        companies.to_string().bright_green().bold()
    );
    println!(
        "  Active jobs:          {}",
        active_jobs.to_string().bright_green().bold()
    );
    println!(
        "  Applications:         {}",
        applications.to_string().bright_green().bold()
    );
    println!(
        "  Active subscriptions: {}",
        subscriptions.to_string().bright_green().bold()
    );
    println!();

    for (label, table) in [("Emails", "email_logs"), ("SMS", "sms_logs")] {
        let rows: Vec<(String, i64)> = sqlx::query_as(&format!(
            "SELECT status, COUNT(*) FROM {table} GROUP BY status ORDER BY status"
        ))
        .fetch_all(pool)
        .await?;

        println!("{}", format!("  {label}").bright_white().bold());
        if rows.is_empty() {
            println!("    {}", "none".bright_black());
        }
        for (status, count) in &rows {
            println!("    {:<14} {}", status, count.to_string().bright_green().bold());
        }
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let migrations: Vec<(i64, String)> = sqlx::query_as(
                "SELECT version, description FROM _sqlx_migrations ORDER BY version",
            )
            .fetch_all(pool)
            .await
            .unwrap_or_default();

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", migrations.len().to_string().bright_white());
            for (version, description) in &migrations {
                println!("    {} {}", version.to_string().bright_black(), description);
            }
            println!();
        }
        DbAction::PurgeTokens => {
            let revoked = PgRevokedTokenRepository::new(Arc::new(pool.clone()));
            let purged = revoked.purge_expired().await?;

            println!(
                "{} {} expired revoked-token entries removed",
                "✅".green(),
                purged.to_string().bright_white()
            );
        }
    }

    Ok(())
}
