use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use nfl_game_dates::archive;
use nfl_game_dates::config::FetchConfig;
use nfl_game_dates::logging::init_logging;
use nfl_game_dates::site::{self, SiteOptions};

#[derive(Parser, Debug)]
#[command(about = "Render the season archive into markdown pages")]
struct Args {
    /// sqlite archive path
    #[arg(long, env = "NFL_DATES_DB")]
    db: Option<PathBuf>,

    /// Output folder for the generated pages
    #[arg(long, default_value = "docs")]
    out: PathBuf,

    /// Text placed above the season list on the top-level page
    #[arg(long)]
    header: Option<PathBuf>,

    /// Text placed below the season list on the top-level page
    #[arg(long)]
    trailer: Option<PathBuf>,

    /// Link every game to its game pass page
    #[arg(long)]
    links: bool,
}

fn read_optional(path: Option<&PathBuf>) -> Result<Option<String>> {
    path.map(|p| fs::read_to_string(p).with_context(|| format!("read {}", p.display())))
        .transpose()
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging("info");

    let db_path = args
        .db
        .clone()
        .or_else(archive::default_db_path)
        .context("unable to resolve sqlite path")?;
    let conn = archive::open_archive(&db_path)?;

    let seasons = archive::stored_seasons(&conn)?;
    if seasons.is_empty() {
        return Err(anyhow!("archive {} holds no seasons", db_path.display()));
    }
    let mut loaded = Vec::with_capacity(seasons.len());
    for season in seasons {
        loaded.push((season, archive::load_season(&conn, season)?));
    }

    let opts = SiteOptions {
        header: read_optional(args.header.as_ref())?,
        trailer: read_optional(args.trailer.as_ref())?,
        game_pass: args.links.then(|| FetchConfig::from_env().gamepass_url),
    };
    let report = site::build_site(&args.out, &loaded, &opts)?;

    println!("Site build complete");
    println!("Out: {}", args.out.display());
    println!("Files written: {}", report.files_written.len());
    if !report.warnings.is_empty() {
        println!("  warnings: {}", report.warnings.len());
        for warning in &report.warnings {
            println!("   - {warning}");
        }
    }
    Ok(())
}
