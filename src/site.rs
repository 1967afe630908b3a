use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::game::Game;
use crate::quality::QualityRules;
use crate::render::{OutputFormat, RenderOptions, render};
use crate::season;
use crate::standings::{record_totals_balance, standings_entering};

const PAGE_TITLE: &str = "NFL simulated-real-time schedules, 2009-present";
const TEAMS_PER_SEASON: usize = 32;

#[derive(Debug, Clone, Default)]
pub struct SiteOptions {
    pub header: Option<String>,
    pub trailer: Option<String>,
    pub game_pass: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SiteReport {
    pub files_written: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

fn front_matter() -> String {
    format!("---\ntitle: {PAGE_TITLE}\ndescription: \" \"\n---\n\n")
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn week_file_name(season: u16, week_index: usize, with_quality: bool) -> String {
    let kind = if with_quality { "with_quality" } else { "no_quality" };
    format!("year_{season}_week_{week_index}_{kind}.md")
}

pub fn season_file_name(season: u16) -> String {
    format!("season_{season}.md")
}

/// One week's markdown page. `season_games` is every game of the season,
/// used for the entering records.
pub fn week_page(
    season: u16,
    week: u8,
    week_games: &[Game],
    season_games: &[Game],
    with_quality: bool,
    opts: &SiteOptions,
) -> Result<String> {
    let name = season::week_name(season, week)?;
    let records = standings_entering(season_games, week);
    let render_opts = RenderOptions {
        format: OutputFormat::Markdown,
        records: Some(&records),
        quality: with_quality.then(QualityRules::default),
        game_pass: opts.game_pass.as_deref(),
    };
    let mut page = front_matter();
    let _ = writeln!(page, "# Game info for {season} {name}\n");
    page.push_str(&render(week_games, &render_opts));
    Ok(page)
}

pub fn season_index(season: u16, weeks: usize) -> Result<String> {
    let mut page = front_matter();
    let _ = writeln!(page, "# Game info for the {season} season\n");

    for (heading, with_quality) in [("Records only", false), ("With quality indicators", true)] {
        if with_quality {
            page.push('\n');
        }
        let _ = writeln!(page, "## {heading}\n");
        for idx in 0..weeks {
            let name = season::week_name(season, idx as u8 + 1)?;
            let _ = writeln!(
                page,
                "* [{}]({})",
                title_case(&name),
                week_file_name(season, idx, with_quality)
            );
        }
    }
    Ok(page)
}

pub fn top_index(seasons: &[u16], opts: &SiteOptions) -> String {
    let mut page = String::new();
    if let Some(header) = &opts.header {
        page.push_str(header);
        page.push('\n');
    }
    for season in seasons {
        let _ = writeln!(page, "* [{season}]({})", season_file_name(*season));
    }
    if let Some(trailer) = &opts.trailer {
        page.push('\n');
        page.push_str(trailer);
        page.push('\n');
    }
    page
}

/// Warnings for a season that does not look complete.
pub fn season_warnings(season: u16, weeks: &[Vec<Game>]) -> Vec<String> {
    let mut warnings = Vec::new();
    let teams: BTreeSet<&str> = weeks
        .iter()
        .flatten()
        .flat_map(|g| [g.away.as_str(), g.home.as_str()])
        .collect();
    if teams.len() != TEAMS_PER_SEASON {
        warnings.push(format!("{season}: found {} teams", teams.len()));
    }
    match season::total_weeks(season) {
        Ok(expected) if usize::from(expected) != weeks.len() => {
            warnings.push(format!(
                "{season}: {} weeks stored, expected {expected}",
                weeks.len()
            ));
        }
        Ok(_) => {}
        Err(err) => warnings.push(format!("{season}: {err}")),
    }
    let all: Vec<Game> = weeks.iter().flatten().cloned().collect();
    let final_table = standings_entering(&all, u8::MAX);
    if !record_totals_balance(&final_table) {
        warnings.push(format!("{season}: wins and losses do not balance"));
    }
    warnings
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("md.tmp");
    fs::write(&tmp, contents).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
    Ok(())
}

/// Write every week page plus the season index for one season.
pub fn build_season(
    out_dir: &Path,
    season: u16,
    weeks: &[Vec<Game>],
    opts: &SiteOptions,
    report: &mut SiteReport,
) -> Result<()> {
    for warning in season_warnings(season, weeks) {
        warn!("{warning}");
        report.warnings.push(warning);
    }

    let season_games: Vec<Game> = weeks.iter().flatten().cloned().collect();
    for (idx, week_games) in weeks.iter().enumerate() {
        let week = idx as u8 + 1;
        for with_quality in [false, true] {
            let page = week_page(season, week, week_games, &season_games, with_quality, opts)?;
            let path = out_dir.join(week_file_name(season, idx, with_quality));
            write_atomic(&path, &page)?;
            report.files_written.push(path);
        }
    }

    let path = out_dir.join(season_file_name(season));
    write_atomic(&path, &season_index(season, weeks.len())?)?;
    report.files_written.push(path);
    info!(season, weeks = weeks.len(), "season pages written");
    Ok(())
}

pub fn build_site(
    out_dir: &Path,
    seasons: &[(u16, Vec<Vec<Game>>)],
    opts: &SiteOptions,
) -> Result<SiteReport> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir.display()))?;
    let mut report = SiteReport::default();
    for (season, weeks) in seasons {
        build_season(out_dir, *season, weeks, opts, &mut report)?;
    }
    let years: Vec<u16> = seasons.iter().map(|(s, _)| *s).collect();
    let path = out_dir.join("README.md");
    write_atomic(&path, &top_index(&years, opts))?;
    report.files_written.push(path);
    Ok(report)
}
