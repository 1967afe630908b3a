use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::game::{Game, LineScore, Score};
use crate::http_client::{HttpSource, PageSource};
use crate::season::{self, WeekId};

/// A game as listed on a week page, before its box score is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStub {
    pub away: String,
    pub home: String,
    pub final_score: Option<Score>,
    pub date: Option<String>,
    pub boxscore_path: String,
}

/// What a single box score page tells us about a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxScore {
    pub away: String,
    pub home: String,
    pub kickoff: NaiveDateTime,
    pub final_score: Option<Score>,
    pub away_line: Option<LineScore>,
    pub home_line: Option<LineScore>,
}

impl BoxScore {
    pub fn halftime(&self) -> Option<Score> {
        let (away, home) = (self.away_line.as_ref()?, self.home_line.as_ref()?);
        Some(Score::new(away.halftime(), home.halftime()))
    }
}

pub fn week_path(season: u16, week: u8) -> String {
    format!("/years/{season}/week_{week}.htm")
}

pub struct WeekFetcher<S> {
    source: S,
}

impl WeekFetcher<HttpSource> {
    pub fn from_config(config: FetchConfig) -> Self {
        Self::new(HttpSource::new(config))
    }
}

impl<S: PageSource> WeekFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// All games of one week, ordered by kickoff.
    pub fn fetch(&self, season: u16, week: WeekId) -> Result<Vec<Game>> {
        let week = season::resolve_week(season, week)?;
        self.fetch_week(season, week)
    }

    pub fn fetch_week(&self, season: u16, week: u8) -> Result<Vec<Game>> {
        season::week_kind(season, week)?;
        let path = week_path(season, week);
        let html = self.source.get_page(&path)?;
        let url = self.source.url_for(&path);
        let stubs = parse_week_page(&html, &url)?;

        if stubs.is_empty() {
            // Some seasons file the super bowl as a third game of championship week.
            if season::is_super_bowl(season, week) {
                warn!(
                    season,
                    week,
                    "no games on super bowl page, falling back to week {}",
                    week - 1
                );
                let mut games = self.fetch_week(season, week - 1)?;
                let Some(mut last) = games.pop() else {
                    return Err(FetchError::parse(&url, "no games in fallback week"));
                };
                last.week = week;
                return Ok(vec![last]);
            }
            return Err(FetchError::parse(&url, "no game tables found"));
        }

        let mut games = Vec::with_capacity(stubs.len());
        for stub in stubs {
            games.push(self.load_game(season, week, stub)?);
        }
        sort_by_kickoff(&mut games);
        info!(season, week, games = games.len(), "week loaded");
        Ok(games)
    }

    /// Every game of weeks `1..=last_week`, in week then kickoff order.
    pub fn fetch_weeks_through(&self, season: u16, last_week: u8) -> Result<Vec<Game>> {
        let mut out = Vec::new();
        for week in 1..=last_week {
            out.extend(self.fetch_week(season, week)?);
        }
        Ok(out)
    }

    fn load_game(&self, season: u16, week: u8, stub: GameStub) -> Result<Game> {
        let html = self.source.get_page(&stub.boxscore_path)?;
        let url = self.source.url_for(&stub.boxscore_path);
        let boxscore = parse_boxscore(&html, &url)?;

        if boxscore.away != stub.away || boxscore.home != stub.home {
            debug!(
                week_page = %format!("{} at {}", stub.away, stub.home),
                box_score = %format!("{} at {}", boxscore.away, boxscore.home),
                "team order differs between week page and box score"
            );
        }

        let listed_in_same_order = boxscore.away == stub.away && boxscore.home == stub.home;
        let final_score = boxscore
            .final_score
            .or(stub.final_score.filter(|_| listed_in_same_order));
        let game = Game {
            season,
            week,
            halftime: boxscore.halftime(),
            away: boxscore.away,
            home: boxscore.home,
            kickoff: boxscore.kickoff,
            final_score,
            boxscore_url: Some(url),
        };
        debug!(game = %game, "parsed game");
        Ok(game)
    }
}

/// Stable sort, so games sharing a kickoff keep their listing order.
pub fn sort_by_kickoff(games: &mut [Game]) {
    games.sort_by_key(|g| g.kickoff);
}

fn selector(css: &str) -> Selector {
    // Only called with the literal selectors below.
    Selector::parse(css).unwrap_or_else(|err| panic!("bad selector {css:?}: {err}"))
}

fn element_text(el: &ElementRef) -> String {
    el.text()
        .collect::<String>()
        .replace('\u{a0}', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_points(raw: &str, url: &str, what: &str) -> Result<u16> {
    raw.trim()
        .parse::<u16>()
        .map_err(|_| FetchError::parse(url, format!("{what}: not a score {raw:?}")))
}

/// Read every `table.teams` block of a week page.
pub fn parse_week_page(html: &str, url: &str) -> Result<Vec<GameStub>> {
    let doc = Html::parse_document(html);
    let table_sel = selector("table.teams");
    let row_sel = selector("tr");
    let cell_sel = selector("td");
    let link_sel = selector("a[href*=\"/boxscores/\"]");

    let mut out = Vec::new();
    for (idx, table) in doc.select(&table_sel).enumerate() {
        let mut date = None;
        let mut teams: Vec<(String, Option<u16>)> = Vec::new();

        for row in table.select(&row_sel) {
            if row.value().classes().any(|c| c == "date") {
                date = Some(element_text(&row)).filter(|d| !d.is_empty());
                continue;
            }
            let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
            let Some(name_cell) = cells.first() else {
                continue;
            };
            let name = element_text(name_cell);
            if name.is_empty() {
                continue;
            }
            let score = match cells.get(1).map(element_text) {
                Some(raw) if !raw.is_empty() => {
                    Some(parse_points(&raw, url, &format!("game table {idx}"))?)
                }
                _ => None,
            };
            teams.push((name, score));
        }

        if teams.len() != 2 {
            return Err(FetchError::parse(
                url,
                format!("game table {idx} has {} team rows", teams.len()),
            ));
        }

        let links: Vec<&str> = table
            .select(&link_sel)
            .filter_map(|a| a.value().attr("href"))
            .collect();
        let [boxscore_path] = links.as_slice() else {
            return Err(FetchError::parse(
                url,
                format!("game table {idx} has {} box score links", links.len()),
            ));
        };

        let (home, home_score) = teams.pop().unwrap_or_default();
        let (away, away_score) = teams.pop().unwrap_or_default();
        let final_score = match (away_score, home_score) {
            (Some(a), Some(h)) => Some(Score::new(a, h)),
            _ => None,
        };
        out.push(GameStub {
            away,
            home,
            final_score,
            date,
            boxscore_path: boxscore_path.to_string(),
        });
    }
    Ok(out)
}

/// Pull team names out of a box score title. Known shapes:
///
/// ```text
/// New Orleans Saints at Green Bay Packers - September 8th, 2011 | Pro-Football-Reference.com
/// Wild Card - Atlanta Falcons at Arizona Cardinals - January 3rd, 2009 | Pro-Football-Reference.com
/// Dallas Cowboys  at  Tampa Bay Buccaneers - September 9th, 2021 - Raymond James Stadium | ...
/// ```
///
/// Super bowls use "vs." instead of "at".
pub fn parse_title_teams(title: &str) -> Option<(String, String)> {
    let at = title.find(" at ").map(|i| (i, " at ".len()));
    let vs = title.find(" vs. ").map(|i| (i, " vs. ".len()));
    let (split, sep_len) = match (at, vs) {
        (Some(a), Some(v)) => {
            if a.0 <= v.0 {
                a
            } else {
                v
            }
        }
        (Some(a), None) => a,
        (None, Some(v)) => v,
        (None, None) => return None,
    };

    let left = title[..split].trim();
    let right = title[split + sep_len..].trim();
    let away = left.rsplit(" - ").next().unwrap_or(left).trim();
    let home = right
        .split(" - ")
        .next()
        .unwrap_or(right)
        .split(" | ")
        .next()
        .unwrap_or(right)
        .trim();
    if away.is_empty() || home.is_empty() {
        return None;
    }
    Some((away.to_string(), home.to_string()))
}

fn parse_line_row(row: &ElementRef, url: &str, team: &str) -> Result<LineScore> {
    let cell_sel = selector("td");
    let cells: Vec<String> = row.select(&cell_sel).map(|c| element_text(&c)).collect();
    // logo, name, q1..q4, [ot, [ot2,]] final
    if !(7..=9).contains(&cells.len()) {
        return Err(FetchError::parse(
            url,
            format!("line score row for {team} has {} cells", cells.len()),
        ));
    }
    if !cells[1].contains(team) {
        return Err(FetchError::parse(
            url,
            format!("line score row {:?} does not match {team}", cells[1]),
        ));
    }

    let what = format!("line score for {team}");
    let mut quarters = [0u16; 4];
    for (q, raw) in quarters.iter_mut().zip(&cells[2..6]) {
        *q = parse_points(raw, url, &what)?;
    }
    let last = cells.len() - 1;
    let overtime = cells[6..last]
        .iter()
        .map(|raw| parse_points(raw, url, &what))
        .collect::<Result<Vec<_>>>()?;
    let final_score = parse_points(&cells[last], url, &what)?;

    Ok(LineScore {
        quarters,
        overtime,
        final_score,
    })
}

fn parse_kickoff(date_text: &str, time_text: &str, url: &str) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date_text.trim(), "%A %b %d, %Y")
        .map_err(|err| FetchError::parse(url, format!("kickoff date {date_text:?}: {err}")))?;
    let time_raw = time_text.trim().to_ascii_uppercase();
    let time = NaiveTime::parse_from_str(&time_raw, "%I:%M%p")
        .map_err(|err| FetchError::parse(url, format!("kickoff time {time_text:?}: {err}")))?;
    Ok(date.and_time(time))
}

pub fn parse_boxscore(html: &str, url: &str) -> Result<BoxScore> {
    let doc = Html::parse_document(html);

    let title = doc
        .select(&selector("title"))
        .next()
        .map(|t| element_text(&t))
        .ok_or_else(|| FetchError::parse(url, "missing title"))?;
    let (away, home) = parse_title_teams(&title)
        .ok_or_else(|| FetchError::parse(url, format!("could not parse title {title:?}")))?;

    let scoreboxes: Vec<ElementRef> = doc.select(&selector("div.scorebox")).collect();
    let [scorebox] = scoreboxes.as_slice() else {
        return Err(FetchError::parse(
            url,
            format!("expected one scorebox, found {}", scoreboxes.len()),
        ));
    };
    let score_texts: Vec<String> = scorebox
        .select(&selector("div.score"))
        .map(|d| element_text(&d))
        .collect();
    let scorebox_final = match score_texts.as_slice() {
        [] => None,
        [a, h] => Some(Score::new(
            parse_points(a, url, "scorebox")?,
            parse_points(h, url, "scorebox")?,
        )),
        other => {
            return Err(FetchError::parse(
                url,
                format!("expected two scorebox scores, found {}", other.len()),
            ));
        }
    };

    let linescores: Vec<ElementRef> = doc.select(&selector("table.linescore")).collect();
    let (away_line, home_line) = match linescores.as_slice() {
        [] => (None, None),
        [table] => {
            let rows: Vec<ElementRef> = table.select(&selector("tbody tr")).collect();
            let [away_row, home_row] = rows.as_slice() else {
                return Err(FetchError::parse(
                    url,
                    format!("line score has {} rows", rows.len()),
                ));
            };
            (
                Some(parse_line_row(away_row, url, &away)?),
                Some(parse_line_row(home_row, url, &home)?),
            )
        }
        other => {
            return Err(FetchError::parse(
                url,
                format!("expected one line score, found {}", other.len()),
            ));
        }
    };

    let line_final = match (&away_line, &home_line) {
        (Some(a), Some(h)) => Some(Score::new(a.final_score, h.final_score)),
        _ => None,
    };
    let final_score = match (scorebox_final, line_final) {
        (Some(sb), Some(line)) if sb == line => Some(line),
        (Some(sb), Some(line)) if sb.away == line.home && sb.home == line.away => {
            warn!(%url, "scorebox lists the final scores reversed");
            Some(line)
        }
        (Some(sb), Some(line)) => {
            return Err(FetchError::parse(
                url,
                format!(
                    "scorebox final {}-{} disagrees with line score {}-{}",
                    sb.away, sb.home, line.away, line.home
                ),
            ));
        }
        (sb, line) => line.or(sb),
    };

    let metas: Vec<ElementRef> = doc.select(&selector("div.scorebox_meta")).collect();
    let [meta] = metas.as_slice() else {
        return Err(FetchError::parse(
            url,
            format!("expected one scorebox_meta, found {}", metas.len()),
        ));
    };
    let meta_divs: Vec<String> = meta
        .select(&selector("div"))
        .map(|d| element_text(&d))
        .collect();
    let (Some(date_text), Some(time_text)) = (meta_divs.first(), meta_divs.get(1)) else {
        return Err(FetchError::parse(url, "scorebox_meta lacks date and start time"));
    };
    let Some(time_value) = time_text
        .strip_prefix("Start Time")
        .and_then(|rest| rest.split_once(':'))
        .map(|(_, t)| t)
    else {
        return Err(FetchError::parse(
            url,
            format!("expected start time, found {time_text:?}"),
        ));
    };
    let kickoff = parse_kickoff(date_text, time_value, url)?;

    Ok(BoxScore {
        away,
        home,
        kickoff,
        final_score,
        away_line,
        home_line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_shapes() {
        assert_eq!(
            parse_title_teams(
                "New Orleans Saints at Green Bay Packers - September 8th, 2011 | Pro-Football-Reference.com"
            ),
            Some(("New Orleans Saints".into(), "Green Bay Packers".into()))
        );
        assert_eq!(
            parse_title_teams(
                "Wild Card - Atlanta Falcons at Arizona Cardinals - January 3rd, 2009 | Pro-Football-Reference.com"
            ),
            Some(("Atlanta Falcons".into(), "Arizona Cardinals".into()))
        );
        assert_eq!(
            parse_title_teams(
                "Cleveland Browns  at  Kansas City Chiefs - September 12th, 2021 - GEHA Field at Arrowhead Stadium | Pro-Football-Reference.com"
            ),
            Some(("Cleveland Browns".into(), "Kansas City Chiefs".into()))
        );
        assert_eq!(
            parse_title_teams(
                "Super Bowl XLVII - Baltimore Ravens vs. San Francisco 49ers - February 3rd, 2013 | Pro-Football-Reference.com"
            ),
            Some(("Baltimore Ravens".into(), "San Francisco 49ers".into()))
        );
        assert_eq!(parse_title_teams("Pro-Football-Reference.com"), None);
    }

    #[test]
    fn kickoff_parses_meta_text() {
        let ko = parse_kickoff("Thursday Sep 8, 2011", " 8:40pm", "u").unwrap();
        assert_eq!(ko.to_string(), "2011-09-08 20:40:00");
        assert!(parse_kickoff("Sep 8", "8:40pm", "u").is_err());
    }

    #[test]
    fn week_page_without_box_link_fails_loudly() {
        let html = r#"<html><body><table class="teams"><tbody>
            <tr class="date"><td colspan=3>Sep 8, 2011</td></tr>
            <tr class="loser"><td><a href="/teams/nor/2011.htm">New Orleans Saints</a></td><td class="right">34</td><td></td></tr>
            <tr class="winner"><td><a href="/teams/gnb/2011.htm">Green Bay Packers</a></td><td class="right">42</td><td></td></tr>
            </tbody></table></body></html>"#;
        let err = parse_week_page(html, "week").unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
    }

    #[test]
    fn unplayed_week_row_has_no_score() {
        let html = r#"<html><body><table class="teams"><tbody>
            <tr class="date"><td colspan=3>Sep 5, 2030</td></tr>
            <tr><td><a href="/teams/bal/2030.htm">Baltimore Ravens</a></td><td class="right"></td>
                <td class="right gamelink"><a href="/boxscores/203009050kan.htm">Preview</a></td></tr>
            <tr><td><a href="/teams/kan/2030.htm">Kansas City Chiefs</a></td><td class="right"></td><td class="right">&nbsp;</td></tr>
            </tbody></table></body></html>"#;
        let stubs = parse_week_page(html, "week").unwrap();
        assert_eq!(stubs.len(), 1);
        assert_eq!(stubs[0].away, "Baltimore Ravens");
        assert_eq!(stubs[0].home, "Kansas City Chiefs");
        assert_eq!(stubs[0].final_score, None);
        assert_eq!(stubs[0].date.as_deref(), Some("Sep 5, 2030"));
        assert_eq!(stubs[0].boxscore_path, "/boxscores/203009050kan.htm");
    }
}
