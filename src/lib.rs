pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod ranking;
pub mod services;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use colored::Colorize;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::ranking::Granularity;
use crate::services::ladder::LadderService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init() -> Result<()> {
    let pool = open_pool()?;
    let mut conn = database::get_connection(&pool)?;
    database::setup::init_schema(&mut conn)
}

pub fn handle_leaderboard(group: Option<i64>, min_games: u32) -> Result<()> {
    let service = LadderService::new(open_pool()?, AppConfig::new());
    let entries = service.build_leaderboard(group, min_games, Granularity::Players)?;

    if entries.is_empty() {
        println!("{}", "No ranked players yet.".yellow());
        return Ok(());
    }

    println!(
        "{:<6} {:<24} {:>5} {:>5} {:>7} {:>6} {:>7}",
        "Rank".bold(),
        "Player".bold(),
        "W".bold(),
        "L".bold(),
        "Win%".bold(),
        "Diff".bold(),
        "Streak".bold(),
    );
    for entry in entries {
        let streak = match entry.record.streak {
            s if s > 0 => format!("W{s}").green().to_string(),
            s if s < 0 => format!("L{}", -s).red().to_string(),
            _ => "-".to_string(),
        };
        println!(
            "{:<6} {:<24} {:>5} {:>5} {:>6.1}% {:>6} {:>7}",
            entry.rank,
            entry.display_name,
            entry.record.wins,
            entry.record.losses,
            entry.record.win_pct() * 100.0,
            entry.record.point_diff(),
            streak,
        );
    }
    Ok(())
}

fn open_pool() -> Result<database::DbPool> {
    let db_path =
        std::env::var("DATABASE_PATH").unwrap_or_else(|_| "pickleball_ladder.db".to_string());
    database::create_pool(&db_path)
}
