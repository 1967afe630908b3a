use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDateTime, Utc};
use rusqlite::{Connection, Transaction, params};
use tracing::{info, warn};

use crate::game::{Game, GameKey, Score};
use crate::http_client::PageSource;
use crate::season;
use crate::week_fetch::WeekFetcher;

const CACHE_DIR: &str = "nfl_game_dates";
const ARCHIVE_FILE: &str = "seasons.sqlite";
const KICKOFF_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct SeasonIngestSummary {
    pub season: u16,
    pub weeks_total: usize,
    pub weeks_succeeded: usize,
    pub games_upserted: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct IngestSummary {
    pub db_path: PathBuf,
    pub seasons: Vec<SeasonIngestSummary>,
}

impl IngestSummary {
    pub fn games_upserted(&self) -> usize {
        self.seasons.iter().map(|s| s.games_upserted).sum()
    }

    pub fn failed_weeks(&self) -> usize {
        self.seasons.iter().map(|s| s.errors.len()).sum()
    }
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(ARCHIVE_FILE))
}

pub fn open_archive(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS games (
            season INTEGER NOT NULL,
            week INTEGER NOT NULL,
            away_team TEXT NOT NULL,
            home_team TEXT NOT NULL,
            kickoff TEXT NOT NULL,
            away_final INTEGER NULL,
            home_final INTEGER NULL,
            away_half INTEGER NULL,
            home_half INTEGER NULL,
            boxscore_url TEXT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (season, week, away_team, home_team)
        );
        CREATE INDEX IF NOT EXISTS idx_games_season ON games(season);

        CREATE TABLE IF NOT EXISTS ingest_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NULL,
            season INTEGER NOT NULL,
            weeks_total INTEGER NOT NULL,
            weeks_succeeded INTEGER NOT NULL,
            games_upserted INTEGER NOT NULL,
            errors_json TEXT NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

fn upsert_game(tx: &Transaction<'_>, game: &Game) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO games(
            season, week, away_team, home_team, kickoff,
            away_final, home_final, away_half, home_half, boxscore_url, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT(season, week, away_team, home_team) DO UPDATE SET
            kickoff = excluded.kickoff,
            away_final = excluded.away_final,
            home_final = excluded.home_final,
            away_half = excluded.away_half,
            home_half = excluded.home_half,
            boxscore_url = excluded.boxscore_url,
            updated_at = excluded.updated_at
        "#,
        params![
            game.season,
            game.week,
            game.away,
            game.home,
            game.kickoff.format(KICKOFF_FORMAT).to_string(),
            game.final_score.map(|s| s.away),
            game.final_score.map(|s| s.home),
            game.halftime.map(|s| s.away),
            game.halftime.map(|s| s.home),
            game.boxscore_url,
            Utc::now().to_rfc3339(),
        ],
    )
    .with_context(|| format!("upsert game {game}"))?;
    Ok(())
}

/// Store one fetched week atomically. Re-storing a week overwrites it.
pub fn store_week(conn: &mut Connection, games: &[Game]) -> Result<usize> {
    let tx = conn.transaction().context("begin week transaction")?;
    for game in games {
        upsert_game(&tx, game)?;
    }
    tx.commit().context("commit week transaction")?;
    Ok(games.len())
}

/// Delete the championship-week copy of a super bowl the week page borrowed.
fn drop_relisted_game(conn: &Connection, super_bowl: &Game) -> Result<usize> {
    let previous = GameKey {
        week: super_bowl.week - 1,
        ..super_bowl.key()
    };
    conn.execute(
        "DELETE FROM games
         WHERE season = ?1 AND week = ?2 AND away_team = ?3 AND home_team = ?4 AND kickoff = ?5",
        params![
            previous.season,
            previous.week,
            previous.away,
            previous.home,
            super_bowl.kickoff.format(KICKOFF_FORMAT).to_string(),
        ],
    )
    .with_context(|| format!("drop relisted {super_bowl}"))
}

fn score_pair(away: Option<u16>, home: Option<u16>) -> Option<Score> {
    Some(Score::new(away?, home?))
}

/// A season's games grouped by week (index 0 is week 1), each week in kickoff order.
pub fn load_season(conn: &Connection, season: u16) -> Result<Vec<Vec<Game>>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT season, week, away_team, home_team, kickoff,
                   away_final, home_final, away_half, home_half, boxscore_url
            FROM games
            WHERE season = ?1
            ORDER BY week ASC, kickoff ASC, rowid ASC
            "#,
        )
        .context("prepare load season query")?;

    let rows = stmt
        .query_map(params![season], |row| {
            Ok((
                row.get::<_, u16>(0)?,
                row.get::<_, u8>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                score_pair(row.get(5)?, row.get(6)?),
                score_pair(row.get(7)?, row.get(8)?),
                row.get::<_, Option<String>>(9)?,
            ))
        })
        .context("query load season")?;

    let mut by_week: BTreeMap<u8, Vec<Game>> = BTreeMap::new();
    for row in rows {
        let (season, week, away, home, kickoff, final_score, halftime, boxscore_url) =
            row.context("decode game row")?;
        let kickoff = NaiveDateTime::parse_from_str(&kickoff, KICKOFF_FORMAT)
            .with_context(|| format!("bad stored kickoff {kickoff:?}"))?;
        by_week.entry(week).or_default().push(Game {
            season,
            week,
            away,
            home,
            kickoff,
            final_score,
            halftime,
            boxscore_url,
        });
    }

    let last = by_week.keys().next_back().copied().unwrap_or(0);
    Ok((1..=last)
        .map(|w| by_week.remove(&w).unwrap_or_default())
        .collect())
}

pub fn stored_seasons(conn: &Connection) -> Result<Vec<u16>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT season FROM games ORDER BY season ASC")
        .context("prepare seasons query")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, u16>(0))
        .context("query seasons")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode season row")?);
    }
    Ok(out)
}

/// Fetch every week of each season and store what succeeds.
///
/// A failing week is recorded in the summary and the run moves on; callers
/// decide whether any failure fails the run (see `IngestSummary::failed_weeks`).
pub fn ingest_seasons<S: PageSource>(
    conn: &mut Connection,
    db_path: PathBuf,
    fetcher: &WeekFetcher<S>,
    seasons: &[u16],
) -> Result<IngestSummary> {
    if seasons.is_empty() {
        return Err(anyhow!("no seasons passed to ingest"));
    }
    let mut out = Vec::with_capacity(seasons.len());
    for &season in seasons {
        out.push(ingest_season(conn, fetcher, season)?);
    }
    Ok(IngestSummary {
        db_path,
        seasons: out,
    })
}

fn ingest_season<S: PageSource>(
    conn: &mut Connection,
    fetcher: &WeekFetcher<S>,
    season: u16,
) -> Result<SeasonIngestSummary> {
    let weeks_total = usize::from(season::total_weeks(season)?);

    let started_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO ingest_runs(started_at, finished_at, season, weeks_total, weeks_succeeded, games_upserted, errors_json)
         VALUES (?1, NULL, ?2, ?3, 0, 0, '[]')",
        params![started_at, season, weeks_total as i64],
    )
    .context("insert ingest run")?;
    let run_id = conn.last_insert_rowid();

    let mut weeks_succeeded = 0usize;
    let mut games_upserted = 0usize;
    let mut errors = Vec::new();

    for week in 1..=weeks_total as u8 {
        match fetcher.fetch_week(season, week) {
            Ok(games) => {
                if season::is_super_bowl(season, week) {
                    for game in &games {
                        if drop_relisted_game(conn, game)? > 0 {
                            warn!(season, week, %game, "super bowl was filed under championship week");
                        }
                    }
                }
                games_upserted += store_week(conn, &games)?;
                weeks_succeeded += 1;
                info!(season, week, games = games.len(), "stored week");
            }
            Err(err) => {
                warn!(season, week, %err, "week fetch failed");
                errors.push(format!("week {week}: {err}"));
            }
        }
    }

    let finished_at = Utc::now().to_rfc3339();
    let errors_json = serde_json::to_string(&errors).unwrap_or_else(|_| "[]".to_string());
    conn.execute(
        "UPDATE ingest_runs
         SET finished_at = ?1, weeks_succeeded = ?2, games_upserted = ?3, errors_json = ?4
         WHERE run_id = ?5",
        params![
            finished_at,
            weeks_succeeded as i64,
            games_upserted as i64,
            errors_json,
            run_id
        ],
    )
    .context("update ingest run")?;

    Ok(SeasonIngestSummary {
        season,
        weeks_total,
        weeks_succeeded,
        games_upserted,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn game(week: u8, away: &str, home: &str, hour: u32, fin: Option<(u16, u16)>) -> Game {
        Game {
            season: 2012,
            week,
            away: away.to_string(),
            home: home.to_string(),
            kickoff: NaiveDate::from_ymd_opt(2012, 9, 9)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            final_score: fin.map(|(a, h)| Score::new(a, h)),
            halftime: fin.map(|(a, h)| Score::new(a / 2, h / 2)),
            boxscore_url: Some(format!("/boxscores/{week}{away}.htm")),
        }
    }

    fn memory_archive() -> Connection {
        let conn = Connection::open_in_memory().expect("in-memory db");
        init_schema(&conn).expect("schema");
        conn
    }

    #[test]
    fn store_and_load_round_trip_by_week() {
        let mut conn = memory_archive();
        let week1 = vec![
            game(1, "Bears", "Packers", 20, Some((10, 24))),
            game(1, "Lions", "Vikings", 13, Some((20, 20))),
        ];
        let week3 = vec![game(3, "Bears", "Lions", 16, None)];
        store_week(&mut conn, &week1).unwrap();
        store_week(&mut conn, &week3).unwrap();

        let season = load_season(&conn, 2012).unwrap();
        assert_eq!(season.len(), 3);
        assert_eq!(season[0].len(), 2);
        assert_eq!(season[0][0].away, "Lions");
        assert!(season[1].is_empty());
        assert_eq!(season[2][0].final_score, None);
        assert_eq!(season[0][1], week1[0]);
        assert_eq!(stored_seasons(&conn).unwrap(), vec![2012]);
    }

    #[test]
    fn restoring_a_week_is_idempotent() {
        let mut conn = memory_archive();
        let week = vec![game(1, "Bears", "Packers", 20, Some((10, 24)))];
        store_week(&mut conn, &week).unwrap();
        store_week(&mut conn, &week).unwrap();
        let season = load_season(&conn, 2012).unwrap();
        assert_eq!(season[0], week);
    }
}
