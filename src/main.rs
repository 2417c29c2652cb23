mod cli;
mod config;
mod db;
mod models;
mod progress;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::migrations::run_migrations;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Loading config")?;
    if !AppConfig::config_path()?.exists() {
        config.save().context("Writing default config")?;
    }

    // Ensure data directory exists and open DB
    AppConfig::ensure_data_dir()?;
    let db_path = AppConfig::db_path()?;
    let conn = Connection::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    // Enable WAL mode for better concurrent access
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    // Run migrations on every startup
    run_migrations(&conn)?;

    match cli.command {
        Some(Commands::Add {
            name,
            description,
            color,
            icon,
            frequency,
            days,
            target,
            unit,
        }) => {
            handlers::handle_add(
                &conn,
                &config,
                &name,
                description,
                color,
                icon,
                &frequency,
                days.as_deref(),
                target,
                unit,
            )?;
        }
        Some(Commands::List { archived }) => {
            handlers::handle_list(&conn, archived)?;
        }
        Some(Commands::Done {
            habit,
            date,
            value,
            note,
        }) => {
            handlers::handle_done(&conn, &habit, date.as_deref(), value, note.as_deref())?;
        }
        Some(Commands::Edit {
            habit,
            name,
            description,
            color,
            icon,
            frequency,
            days,
            target,
            unit,
        }) => {
            handlers::handle_edit(
                &conn,
                &habit,
                name,
                description,
                color,
                icon,
                frequency.as_deref(),
                days.as_deref(),
                target,
                unit,
            )?;
        }
        Some(Commands::Archive { habit }) => {
            handlers::handle_archive(&conn, &habit)?;
        }
        Some(Commands::Unarchive { habit }) => {
            handlers::handle_unarchive(&conn, &habit)?;
        }
        Some(Commands::Today) => {
            handlers::handle_today(&conn)?;
        }
        Some(Commands::Stats { week }) => {
            handlers::handle_stats(&conn, week)?;
        }
        Some(Commands::Calendar { month }) => {
            handlers::handle_calendar(&conn, month.as_deref())?;
        }
        Some(Commands::Goal { action }) => {
            handlers::handle_goal(&conn, &action)?;
        }
        Some(Commands::Report { days }) => {
            handlers::handle_report(&conn, &config, days)?;
        }
        Some(Commands::Export) => {
            handlers::handle_export(&conn)?;
        }

        // No subcommand → launch TUI
        None => {
            tui::app::run(conn, config)?;
        }
    }

    Ok(())
}
