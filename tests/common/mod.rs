#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use nfl_game_dates::error::{FetchError, Result};
use nfl_game_dates::http_client::PageSource;

/// Serves `tests/fixtures/<path with / as _>.html`.
pub struct FixtureSource;

impl PageSource for FixtureSource {
    fn get_page(&self, path: &str) -> Result<String> {
        let name = path.trim_start_matches('/').replace('/', "_").replace(".htm", ".html");
        fs::read_to_string(fixture_path(&name)).map_err(|_| FetchError::not_found(path))
    }

    fn url_for(&self, path: &str) -> String {
        format!("fixture://{path}")
    }
}

/// Serves pages from memory; anything else is a 404.
pub struct MapSource(pub HashMap<String, String>);

impl PageSource for MapSource {
    fn get_page(&self, path: &str) -> Result<String> {
        self.0
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::not_found(path))
    }

    fn url_for(&self, path: &str) -> String {
        path.to_string()
    }
}

pub fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

pub fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).expect("fixture file should be readable")
}

pub fn week_table(away: &str, home: &str, box_id: &str) -> String {
    format!(
        r#"<table class="teams"><tbody>
        <tr class="date"><td colspan=3>Feb 3, 2013</td></tr>
        <tr><td><a href="/teams/a.htm">{away}</a></td><td class="right">20</td>
            <td class="right gamelink"><a href="/boxscores/{box_id}.htm">Final</a></td></tr>
        <tr><td><a href="/teams/h.htm">{home}</a></td><td class="right">10</td><td></td></tr>
        </tbody></table>"#
    )
}

/// Box score where the away side wins 20-10.
pub fn boxscore(away: &str, home: &str, date: &str, time: &str) -> String {
    format!(
        r#"<html><head><title>{away} vs. {home} - February 3rd, 2013 | Pro-Football-Reference.com</title></head>
        <body><div class="scorebox">
            <div><div class="score">20</div></div><div><div class="score">10</div></div>
            <div class="scorebox_meta"><div>{date}</div><div><strong>Start Time</strong>: {time}</div></div>
        </div>
        <table class="linescore"><tbody>
            <tr><td></td><td>{away}</td><td>7</td><td>3</td><td>7</td><td>3</td><td>20</td></tr>
            <tr><td></td><td>{home}</td><td>0</td><td>3</td><td>0</td><td>7</td><td>10</td></tr>
        </tbody></table></body></html>"#
    )
}

/// The 2012 divisional round from the fixture files, keyed by site path.
pub fn divisional_round_pages() -> HashMap<String, String> {
    let mut pages = HashMap::new();
    pages.insert(
        "/years/2012/week_19.htm".to_string(),
        read_fixture("years_2012_week_19.html"),
    );
    for id in ["201301120den", "201301120sfo", "201301130atl", "201301130nwe"] {
        pages.insert(
            format!("/boxscores/{id}.htm"),
            read_fixture(&format!("boxscores_{id}.html")),
        );
    }
    pages
}

/// 2012 weeks 20 and 21 as the site sometimes has them: an empty super bowl
/// page, with the super bowl listed on the championship page.
pub fn super_bowl_on_championship_pages() -> HashMap<String, String> {
    let mut pages = HashMap::new();
    pages.insert(
        "/years/2012/week_21.htm".to_string(),
        "<html><body><p>No games</p></body></html>".to_string(),
    );
    pages.insert(
        "/years/2012/week_20.htm".to_string(),
        format!(
            "<html><body>{}{}</body></html>",
            week_table("Baltimore Ravens", "San Francisco 49ers", "201302030sfo"),
            week_table("San Francisco 49ers", "Atlanta Falcons", "201301200atl"),
        ),
    );
    pages.insert(
        "/boxscores/201302030sfo.htm".to_string(),
        boxscore("Baltimore Ravens", "San Francisco 49ers", "Sunday Feb 3, 2013", "6:31pm"),
    );
    pages.insert(
        "/boxscores/201301200atl.htm".to_string(),
        boxscore("San Francisco 49ers", "Atlanta Falcons", "Sunday Jan 20, 2013", "3:00pm"),
    );
    pages
}
