use std::collections::{BTreeMap, HashMap};

use crate::game::{Game, Outcome, TeamRecord};

pub type Standings = BTreeMap<String, TeamRecord>;

/// Records every team carries into `week`.
///
/// Only games strictly before `week` with a final score count. Every team
/// seen anywhere in `games` gets an entry, so idle teams show 0-0.
///
/// A game listed under more than one week (the super bowl borrowed from
/// championship week) counts once, under the latest week it appears in.
pub fn standings_entering(games: &[Game], week: u8) -> Standings {
    let mut table: Standings = BTreeMap::new();
    for g in games {
        table.entry(g.away.clone()).or_default();
        table.entry(g.home.clone()).or_default();
    }

    let mut filed_under = HashMap::new();
    for g in games {
        let latest = filed_under.entry(g.matchup()).or_insert(g.week);
        *latest = (*latest).max(g.week);
    }

    for g in games.iter().filter(|g| g.week < week) {
        let Some(score) = g.final_score else {
            continue;
        };
        if filed_under.get(&g.matchup()) != Some(&g.week) {
            continue;
        }
        match score.outcome() {
            Outcome::HomeWin => {
                bump(&mut table, &g.home, |r| r.wins += 1);
                bump(&mut table, &g.away, |r| r.losses += 1);
            }
            Outcome::AwayWin => {
                bump(&mut table, &g.away, |r| r.wins += 1);
                bump(&mut table, &g.home, |r| r.losses += 1);
            }
            Outcome::Tie => {
                bump(&mut table, &g.away, |r| r.ties += 1);
                bump(&mut table, &g.home, |r| r.ties += 1);
            }
        }
    }
    table
}

fn bump(table: &mut Standings, team: &str, f: impl FnOnce(&mut TeamRecord)) {
    if let Some(rec) = table.get_mut(team) {
        f(rec);
    }
}

/// Entering standings for weeks `1..=weeks`; index 0 is week 1.
pub fn standings_by_week(games: &[Game], weeks: u8) -> Vec<Standings> {
    (1..=weeks).map(|w| standings_entering(games, w)).collect()
}

/// Summed wins must equal summed losses across a table.
pub fn record_totals_balance(standings: &Standings) -> bool {
    let wins: u32 = standings.values().map(|r| u32::from(r.wins)).sum();
    let losses: u32 = standings.values().map(|r| u32::from(r.losses)).sum();
    wins == losses
}
