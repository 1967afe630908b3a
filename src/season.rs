use std::fmt;
use std::str::FromStr;

use crate::error::{FetchError, Result};

pub const FIRST_SUPPORTED_SEASON: u16 = 1961;
pub const FIRST_WILD_CARD_SEASON: u16 = 1978;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayoffRound {
    WildCard,
    Divisional,
    Championship,
    SuperBowl,
}

impl PlayoffRound {
    pub const ALL: [PlayoffRound; 4] = [
        PlayoffRound::WildCard,
        PlayoffRound::Divisional,
        PlayoffRound::Championship,
        PlayoffRound::SuperBowl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlayoffRound::WildCard => "wild card",
            PlayoffRound::Divisional => "divisional",
            PlayoffRound::Championship => "championship",
            PlayoffRound::SuperBowl => "super bowl",
        }
    }

    fn from_normalized(s: &str) -> Option<Self> {
        match s {
            "wildcard" => Some(PlayoffRound::WildCard),
            "divisional" => Some(PlayoffRound::Divisional),
            "championship" => Some(PlayoffRound::Championship),
            "superbowl" => Some(PlayoffRound::SuperBowl),
            _ => None,
        }
    }
}

impl fmt::Display for PlayoffRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A week as typed by a user: either a 1-based number or a playoff round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekId {
    Number(u8),
    Round(PlayoffRound),
}

impl FromStr for WeekId {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = normalize(s);
        if let Ok(n) = normalized.parse::<u8>() {
            return Ok(WeekId::Number(n));
        }
        PlayoffRound::from_normalized(&normalized)
            .map(WeekId::Round)
            .ok_or_else(|| FetchError::UnknownWeek(s.to_string()))
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekId::Number(n) => write!(f, "{n}"),
            WeekId::Round(round) => write!(f, "{round}"),
        }
    }
}

/// Where a numeric week falls in its season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekKind {
    Regular(u8),
    Playoff(PlayoffRound),
}

/// Lowercase and drop all whitespace, so "sUpeR   boWL" matches "superbowl".
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Number of regular-season weeks (including the bye) for a season.
///
/// Kept as an explicit table: the schedule grew in steps, with one-off
/// seasons (strikes, extra byes) that no formula reproduces.
pub fn regular_season_weeks(season: u16) -> Result<u8> {
    let weeks = match season {
        s if s < FIRST_SUPPORTED_SEASON => return Err(FetchError::UnsupportedSeason(s)),
        1966 => 15,
        1961..=1977 => 14,
        1982 => 17,
        1978..=1989 => 16,
        1993 | 2001 => 18,
        1990..=2020 => 17,
        _ => 18,
    };
    Ok(weeks)
}

const ROUNDS_WITHOUT_WILD_CARD: &[PlayoffRound] = &[
    PlayoffRound::Divisional,
    PlayoffRound::Championship,
    PlayoffRound::SuperBowl,
];

pub fn playoff_rounds(season: u16) -> &'static [PlayoffRound] {
    if season < FIRST_WILD_CARD_SEASON {
        ROUNDS_WITHOUT_WILD_CARD
    } else {
        &PlayoffRound::ALL
    }
}

/// Total number of week pages in a season, regular season plus playoffs.
pub fn total_weeks(season: u16) -> Result<u8> {
    Ok(regular_season_weeks(season)? + playoff_rounds(season).len() as u8)
}

/// Resolve a user-facing week into the 1-based numeric week the source uses.
pub fn resolve_week(season: u16, week: WeekId) -> Result<u8> {
    let regular = regular_season_weeks(season)?;
    match week {
        WeekId::Number(n) => {
            let max = total_weeks(season)?;
            if n == 0 || n > max {
                return Err(FetchError::not_found(format!(
                    "week {n} of {season} (season has {max} weeks)"
                )));
            }
            Ok(n)
        }
        WeekId::Round(round) => {
            let offset = playoff_rounds(season)
                .iter()
                .position(|r| *r == round)
                .ok_or_else(|| {
                    FetchError::not_found(format!("{round} round in {season}"))
                })?;
            Ok(regular + offset as u8 + 1)
        }
    }
}

pub fn week_kind(season: u16, week: u8) -> Result<WeekKind> {
    let regular = regular_season_weeks(season)?;
    if week == 0 {
        return Err(FetchError::not_found(format!("week 0 of {season}")));
    }
    if week <= regular {
        return Ok(WeekKind::Regular(week));
    }
    let idx = usize::from(week - regular - 1);
    playoff_rounds(season)
        .get(idx)
        .copied()
        .map(WeekKind::Playoff)
        .ok_or_else(|| FetchError::not_found(format!("week {week} of {season}")))
}

/// "week 12", "divisional", "super bowl", ...
pub fn week_name(season: u16, week: u8) -> Result<String> {
    Ok(match week_kind(season, week)? {
        WeekKind::Regular(n) => format!("week {n}"),
        WeekKind::Playoff(round) => round.name().to_string(),
    })
}

pub fn is_super_bowl(season: u16, week: u8) -> bool {
    matches!(
        week_kind(season, week),
        Ok(WeekKind::Playoff(PlayoffRound::SuperBowl))
    )
}

/// Season segment and in-segment week number, as nfl.com game URLs use them
/// (`reg-12`, `post-1`).
pub fn game_pass_segment(season: u16, week: u8) -> Result<(&'static str, u8)> {
    let regular = regular_season_weeks(season)?;
    if week > regular {
        Ok(("post", week - regular))
    } else {
        Ok(("reg", week))
    }
}
