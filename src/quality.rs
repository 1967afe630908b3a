use crate::error::{FetchError, Result};
use crate::game::{Game, GameLabel, Outcome, Score};

/// Thresholds for the spoiler-light good/bad label.
///
/// A possession is worth at most 8 points, so `one_score_margin` is one
/// possession and `blowout_margin` two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityRules {
    pub one_score_margin: u32,
    pub blowout_margin: u32,
    pub shootout_total: u32,
    pub shootout_margin: u32,
}

impl Default for QualityRules {
    fn default() -> Self {
        Self {
            one_score_margin: 8,
            blowout_margin: 16,
            shootout_total: 84,
            shootout_margin: 24,
        }
    }
}

impl QualityRules {
    /// Label a final/halftime pair. A tied halftime never counts as leading.
    pub fn label_scores(&self, final_score: Score, halftime: Option<Score>) -> GameLabel {
        let Some(halftime) = halftime else {
            return GameLabel::Neutral;
        };
        let margin = final_score.margin().unsigned_abs();
        let result = final_score.outcome();
        let at_half = halftime.outcome();

        if margin <= self.one_score_margin {
            return GameLabel::Good;
        }
        if at_half != Outcome::Tie && at_half != result {
            // comeback
            return GameLabel::Good;
        }
        if final_score.total() >= self.shootout_total && margin <= self.shootout_margin {
            return GameLabel::Good;
        }
        if margin > self.blowout_margin && at_half == result {
            return GameLabel::Bad;
        }
        GameLabel::Neutral
    }

    pub fn label_game(&self, game: &Game) -> Result<GameLabel> {
        let final_score = game.final_score.ok_or_else(|| FetchError::InvalidGame {
            game: game.to_string(),
            missing: "a final score",
        })?;
        Ok(self.label_scores(final_score, game.halftime))
    }

    /// Labels for a whole week; unplayed games come back neutral.
    pub fn label_week(&self, games: &[Game]) -> Vec<GameLabel> {
        games
            .iter()
            .map(|g| self.label_game(g).unwrap_or(GameLabel::Neutral))
            .collect()
    }
}

pub fn label_game(game: &Game) -> Result<GameLabel> {
    QualityRules::default().label_game(game)
}
