//! CLI administration tool for url-shortener.
//!
//! Inspects entries, resets or removes edit passwords, and checks the
//! database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show an entry
//! cargo run --bin admin -- entry show aZ3k9Q
//!
//! # Find the entry for a long URL
//! cargo run --bin admin -- entry find https://example.com
//!
//! # Reset the edit password (prompts if --password is omitted)
//! cargo run --bin admin -- entry set-password aZ3k9Q
//!
//! # Make an entry permanently read-only
//! cargo run --bin admin -- entry disable-editing aZ3k9Q
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server (see `url_shortener::config`).
//! `ID_STRATEGY` must match the server's so identifiers parse the same way.

use url_shortener::application::services::{EditGrantService, UrlService};
use url_shortener::config::{self, Config};
use url_shortener::domain::entities::UrlEntry;
use url_shortener::infrastructure::persistence::{SqliteUrlRepository, database};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Password};
use sqlx::SqlitePool;
use std::sync::Arc;

/// CLI tool for managing url-shortener.
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
    /// Inspect and manage short URL entries
    Entry {
        #[command(subcommand)]
        action: EntryAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Entry management subcommands.
#[derive(Subcommand)]
enum EntryAction {
    /// Show an entry by short identifier
    Show { short_id: String },

    /// Find the oldest entry for an exact long URL
    Find { url: String },

    /// Replace the edit password
    SetPassword {
        short_id: String,

        /// New password (prompted for if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Remove the edit password so the entry can never change again
    DisableEditing {
        short_id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection and apply migrations
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let pool = database::connect(&config).await?;
    database::migrate(&pool).await?;

    match cli.command {
        Commands::Entry { action } => handle_entry_action(action, &config, pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn build_service(config: &Config, pool: SqlitePool) -> UrlService<SqliteUrlRepository> {
    let repository = Arc::new(SqliteUrlRepository::with_codec(
        Arc::new(pool),
        config.id_codec,
        config.id_max_attempts,
    ));
    let grants = EditGrantService::new(
        config.session_secret.clone(),
        config.edit_token_ttl_seconds,
    );
    UrlService::new(repository, grants, config.duplicate_policy)
}

/// Dispatches entry management commands.
async fn handle_entry_action(action: EntryAction, config: &Config, pool: SqlitePool) -> Result<()> {
    let service = build_service(config, pool);

    match action {
        EntryAction::Show { short_id } => {
            let entry = service.resolve(&short_id).await?;
            print_entry(&entry);
        }
        EntryAction::Find { url } => match service.find_by_url(&url).await? {
            Some(entry) => print_entry(&entry),
            None => println!("{}", "  No entry for this URL".yellow()),
        },
        EntryAction::SetPassword { short_id, password } => {
            set_password(&service, &short_id, password).await?;
        }
        EntryAction::DisableEditing { short_id, yes } => {
            disable_editing(&service, &short_id, yes).await?;
        }
    }

    Ok(())
}

/// Prints an entry without its password digest.
fn print_entry(entry: &UrlEntry) {
    println!("{}", "🔗 Entry".bright_blue().bold());
    println!();
    println!("  ID:            {}", entry.short_id.cyan());
    println!("  URL:           {}", entry.url.bright_white());
    println!(
        "  Created:       {}",
        entry
            .created
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .bright_black()
    );
    let modified = entry
        .last_modified
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    println!("  Last modified: {}", modified.bright_black());
    let editable = if entry.can_be_modified {
        "YES".green()
    } else {
        "NO".red()
    };
    println!("  Editable:      {}", editable);
    println!();
}

/// Replaces the edit password, prompting with confirmation when needed.
///
/// An empty password disables editing. Does not touch `last_modified`.
async fn set_password(
    service: &UrlService<SqliteUrlRepository>,
    short_id: &str,
    password: Option<String>,
) -> Result<()> {
    println!("{}", "🔑 Set Edit Password".bright_blue().bold());
    println!();

    let password = match password {
        Some(p) => p,
        None => Password::new()
            .with_prompt("New password (empty disables editing)")
            .with_confirmation("Repeat password", "Passwords do not match")
            .allow_empty_password(true)
            .interact()?,
    };

    let entry = service.reset_password(short_id, &password).await?;

    if entry.can_be_modified {
        println!("{}", "✅ Password updated".green().bold());
    } else {
        println!("{}", "✅ Editing disabled".green().bold());
    }
    println!();

    Ok(())
}

/// Removes the edit password after confirmation (default: No).
async fn disable_editing(
    service: &UrlService<SqliteUrlRepository>,
    short_id: &str,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔒 Disable Editing".bright_blue().bold());
    println!();

    let entry = service.resolve(short_id).await?;
    if !entry.can_be_modified {
        println!("{}", "⚠️  This entry is already read-only".yellow());
        return Ok(());
    }

    println!("  ID:  {}", entry.short_id.cyan());
    println!("  URL: {}", entry.url.bright_white());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Disable editing for this entry? This cannot be undone by its owner.")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service.reset_password(short_id, "").await?;

    println!();
    println!("{}", "✅ Editing disabled".green().bold());
    println!();

    Ok(())
}

/// Displays entry counts.
async fn handle_stats(pool: &SqlitePool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await?;

    let editable: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE can_be_modified = 1")
        .fetch_one(pool)
        .await?;

    let modified: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE last_modified IS NOT NULL")
            .fetch_one(pool)
            .await?;

    println!("  Entries:  {}", total.to_string().bright_green().bold());
    println!("  Editable: {}", editable.to_string().bright_green().bold());
    println!("  Modified: {}", modified.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &SqlitePool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  SQLite: {}", version.bright_white());
        }
    }

    Ok(())
}
