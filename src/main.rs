use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use nfl_game_dates::config::FetchConfig;
use nfl_game_dates::logging::init_logging;
use nfl_game_dates::quality::QualityRules;
use nfl_game_dates::render::{OutputFormat, RenderOptions, in_kickoff_order, render};
use nfl_game_dates::season::{self, WeekId};
use nfl_game_dates::standings::standings_entering;
use nfl_game_dates::week_fetch::WeekFetcher;

#[derive(Parser, Debug)]
#[command(version, about = "List an NFL week's games in kickoff order", long_about = None)]
struct Cli {
    /// Year of the season start (the 2012 season's playoffs are played in 2013)
    year: u16,

    /// Week to fetch: a number (1-22) or a playoff round
    /// (wild card, divisional, championship, super bowl)
    #[arg(required = true, num_args = 1..)]
    week: Vec<String>,

    /// HTML with game pass links instead of plain text
    #[arg(long, conflicts_with_all = ["markdown", "json"])]
    html: bool,

    /// Markdown with game pass links instead of plain text
    #[arg(long, conflicts_with = "json")]
    markdown: bool,

    /// Print the games as JSON
    #[arg(long)]
    json: bool,

    /// Show each team's record entering the week (fetches every earlier week)
    #[arg(long)]
    records: bool,

    /// Mark good and bad games
    #[arg(long)]
    quality: bool,

    /// Leave out game pass links in HTML and markdown
    #[arg(long)]
    no_links: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging("warn");

    match run(&cli) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let config = FetchConfig::from_env();
    let week_id: WeekId = cli.week.join(" ").parse()?;
    let week = season::resolve_week(cli.year, week_id)?;

    let fetcher = WeekFetcher::from_config(config.clone());
    let games = fetcher
        .fetch_week(cli.year, week)
        .with_context(|| format!("loading {} week {week_id}", cli.year))?;

    if cli.json {
        let ordered = in_kickoff_order(&games);
        return serde_json::to_string_pretty(&ordered).context("serialize games");
    }

    let standings = if cli.records {
        let earlier = fetcher
            .fetch_weeks_through(cli.year, week - 1)
            .with_context(|| format!("loading {} weeks before {week_id}", cli.year))?;
        let mut season_games = earlier;
        season_games.extend(games.iter().cloned());
        Some(standings_entering(&season_games, week))
    } else {
        None
    };

    let format = if cli.html {
        OutputFormat::Html
    } else if cli.markdown {
        OutputFormat::Markdown
    } else {
        OutputFormat::Text
    };
    let links = format != OutputFormat::Text && !cli.no_links;
    let opts = RenderOptions {
        format,
        records: standings.as_ref(),
        quality: cli.quality.then(QualityRules::default),
        game_pass: links.then_some(config.gamepass_url.as_str()),
    };
    Ok(render(&games, &opts))
}
