use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Points for both sides of a game, away first as the source lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub away: u16,
    pub home: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HomeWin,
    AwayWin,
    Tie,
}

impl Score {
    pub fn new(away: u16, home: u16) -> Self {
        Self { away, home }
    }

    /// Home minus away.
    pub fn margin(&self) -> i32 {
        i32::from(self.home) - i32::from(self.away)
    }

    pub fn total(&self) -> u32 {
        u32::from(self.home) + u32::from(self.away)
    }

    pub fn outcome(&self) -> Outcome {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Less => Outcome::AwayWin,
            std::cmp::Ordering::Equal => Outcome::Tie,
        }
    }
}

/// One team's row of a box score line score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineScore {
    pub quarters: [u16; 4],
    pub overtime: Vec<u16>,
    pub final_score: u16,
}

impl LineScore {
    pub fn halftime(&self) -> u16 {
        self.quarters[0] + self.quarters[1]
    }

    pub fn summed(&self) -> u16 {
        self.quarters.iter().sum::<u16>() + self.overtime.iter().sum::<u16>()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GameKey {
    pub season: u16,
    pub week: u8,
    pub home: String,
    pub away: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub season: u16,
    pub week: u8,
    pub away: String,
    pub home: String,
    /// Kickoff as published, in the source's local time.
    pub kickoff: NaiveDateTime,
    #[serde(default)]
    pub final_score: Option<Score>,
    #[serde(default)]
    pub halftime: Option<Score>,
    #[serde(default)]
    pub boxscore_url: Option<String>,
}

impl Game {
    pub fn key(&self) -> GameKey {
        GameKey {
            season: self.season,
            week: self.week,
            home: self.home.clone(),
            away: self.away.clone(),
        }
    }

    /// Teams and kickoff, identical for every copy of a game whatever week it
    /// is filed under.
    pub fn matchup(&self) -> (&str, &str, NaiveDateTime) {
        (&self.away, &self.home, self.kickoff)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}, {}",
            self.away,
            self.home,
            self.kickoff.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

/// Wins, losses and ties a team carries into a week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub wins: u16,
    pub losses: u16,
    pub ties: u16,
}

impl TeamRecord {
    pub fn games(&self) -> u16 {
        self.wins + self.losses + self.ties
    }
}

impl fmt::Display for TeamRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ties > 0 {
            write!(f, "{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            write!(f, "{}-{}", self.wins, self.losses)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameLabel {
    Good,
    Bad,
    Neutral,
}

/// "Dallas Cowboys" -> "Cowboys"; the Washington stopgap name keeps both words.
pub fn team_nickname(team: &str) -> &str {
    let trimmed = team.trim();
    if trimmed.to_ascii_lowercase().ends_with("football team") {
        return "Football Team";
    }
    trimmed.rsplit(' ').next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn display_matches_listing_format() {
        let game = Game {
            season: 2012,
            week: 19,
            away: "Baltimore Ravens".to_string(),
            home: "Denver Broncos".to_string(),
            kickoff: NaiveDate::from_ymd_opt(2013, 1, 12)
                .unwrap()
                .and_hms_opt(16, 36, 0)
                .unwrap(),
            final_score: Some(Score::new(38, 35)),
            halftime: Some(Score::new(21, 21)),
            boxscore_url: None,
        };
        assert_eq!(
            game.to_string(),
            "Baltimore Ravens at Denver Broncos, 2013-01-12 16:36:00"
        );
    }

    #[test]
    fn record_hides_zero_ties() {
        let rec = TeamRecord { wins: 3, losses: 2, ties: 0 };
        assert_eq!(rec.to_string(), "3-2");
        let rec = TeamRecord { wins: 3, losses: 2, ties: 1 };
        assert_eq!(rec.to_string(), "3-2-1");
        assert_eq!(TeamRecord::default().to_string(), "0-0");
    }

    #[test]
    fn nicknames() {
        assert_eq!(team_nickname("Dallas Cowboys"), "Cowboys");
        assert_eq!(team_nickname("San Francisco 49ers"), "49ers");
        assert_eq!(team_nickname("Washington Football Team"), "Football Team");
    }

    #[test]
    fn matchup_ignores_week() {
        let kickoff = NaiveDate::from_ymd_opt(2013, 2, 3)
            .unwrap()
            .and_hms_opt(18, 31, 0)
            .unwrap();
        let championship = Game {
            season: 2012,
            week: 20,
            away: "Baltimore Ravens".to_string(),
            home: "San Francisco 49ers".to_string(),
            kickoff,
            final_score: Some(Score::new(34, 31)),
            halftime: None,
            boxscore_url: None,
        };
        let super_bowl = Game { week: 21, ..championship.clone() };
        assert_eq!(super_bowl.matchup(), championship.matchup());
        assert_ne!(super_bowl.key(), championship.key());

        let rematch = Game {
            kickoff: kickoff - chrono::Duration::days(7),
            ..championship.clone()
        };
        assert_ne!(rematch.matchup(), championship.matchup());
    }

    #[test]
    fn score_outcome_and_margin() {
        let s = Score::new(33, 51);
        assert_eq!(s.margin(), 18);
        assert_eq!(s.total(), 84);
        assert_eq!(s.outcome(), Outcome::HomeWin);
        assert_eq!(Score::new(17, 17).outcome(), Outcome::Tie);
    }
}
