use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Local};
use clap::Parser;

use nfl_game_dates::archive;
use nfl_game_dates::config::FetchConfig;
use nfl_game_dates::logging::init_logging;
use nfl_game_dates::week_fetch::WeekFetcher;

#[derive(Parser, Debug)]
#[command(about = "Fetch whole seasons into the local season archive")]
struct Args {
    /// First season to fetch
    #[arg(long, default_value_t = 2009)]
    from: u16,

    /// Last season to fetch (defaults to the most recently started season)
    #[arg(long)]
    to: Option<u16>,

    /// sqlite archive path
    #[arg(long, env = "NFL_DATES_DB")]
    db: Option<PathBuf>,
}

/// Seasons kick off in September; before that the previous year's season is the latest.
fn latest_started_season() -> u16 {
    let today = Local::now().date_naive();
    let year = today.year() as u16;
    if today.month() >= 9 { year } else { year - 1 }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging("info");

    let to = args.to.unwrap_or_else(latest_started_season);
    if to < args.from {
        return Err(anyhow!("--to {to} is before --from {}", args.from));
    }
    let seasons: Vec<u16> = (args.from..=to).collect();

    let db_path = args
        .db
        .or_else(archive::default_db_path)
        .context("unable to resolve sqlite path")?;
    let mut conn = archive::open_archive(&db_path)?;

    let fetcher = WeekFetcher::from_config(FetchConfig::from_env());
    let summary = archive::ingest_seasons(&mut conn, db_path, &fetcher, &seasons)?;

    println!("Season ingest complete");
    println!("DB: {}", summary.db_path.display());
    println!("Games upserted: {}", summary.games_upserted());
    for item in &summary.seasons {
        println!(
            "season {}: weeks {}/{} games={}",
            item.season, item.weeks_succeeded, item.weeks_total, item.games_upserted
        );
        if !item.errors.is_empty() {
            println!("  errors: {}", item.errors.len());
            for err in item.errors.iter().take(6) {
                println!("   - {err}");
            }
        }
    }

    let failed = summary.failed_weeks();
    if failed > 0 {
        return Err(anyhow!("{failed} week(s) failed to ingest"));
    }
    Ok(())
}
