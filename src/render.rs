use std::fmt::Write as _;

use chrono::{Duration, NaiveDateTime};

use crate::config::DEFAULT_GAMEPASS_URL;
use crate::game::{Game, GameLabel, team_nickname};
use crate::quality::QualityRules;
use crate::season;
use crate::standings::Standings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
    Markdown,
}

#[derive(Debug, Clone)]
pub struct RenderOptions<'a> {
    pub format: OutputFormat,
    pub records: Option<&'a Standings>,
    pub quality: Option<QualityRules>,
    /// Base URL for per-game video links; `None` renders plain lines.
    pub game_pass: Option<&'a str>,
}

impl Default for RenderOptions<'_> {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            records: None,
            quality: None,
            game_pass: None,
        }
    }
}

impl<'a> RenderOptions<'a> {
    pub fn html() -> Self {
        Self {
            format: OutputFormat::Html,
            game_pass: Some(DEFAULT_GAMEPASS_URL),
            ..Self::default()
        }
    }
}

/// nfl.com game page, e.g. `.../titans-at-seahawks-2021-reg-2`.
pub fn game_pass_url(base: &str, game: &Game) -> String {
    let slug = |team: &str| team_nickname(team).to_ascii_lowercase().replace(' ', "-");
    let (segment, n) = season::game_pass_segment(game.season, game.week)
        .unwrap_or(("reg", game.week));
    let sep = if base.ends_with('/') { "" } else { "/" };
    format!(
        "{base}{sep}{}-at-{}-{}-{segment}-{n}",
        slug(&game.away),
        slug(&game.home),
        game.season
    )
}

fn record_suffix(records: Option<&Standings>, team: &str) -> String {
    match records {
        Some(table) => format!(" ({})", table.get(team).copied().unwrap_or_default()),
        None => String::new(),
    }
}

fn quality_suffix(format: OutputFormat, label: GameLabel) -> &'static str {
    match (format, label) {
        (_, GameLabel::Neutral) => "",
        (OutputFormat::Text, GameLabel::Good) => " (good game)",
        (OutputFormat::Text, GameLabel::Bad) => " (bad game)",
        (OutputFormat::Markdown, GameLabel::Good) => " (:green_circle: good game)",
        (OutputFormat::Markdown, GameLabel::Bad) => " (:red_circle: bad game)",
        (OutputFormat::Html, GameLabel::Good) => " (\u{1F7E2} good game)",
        (OutputFormat::Html, GameLabel::Bad) => " (\u{1F534} bad game)",
    }
}

fn game_line(game: &Game, opts: &RenderOptions<'_>) -> String {
    let kickoff = match opts.format {
        OutputFormat::Text => game.kickoff.format("%Y-%m-%d %H:%M:%S").to_string(),
        OutputFormat::Html | OutputFormat::Markdown => {
            game.kickoff.format("%A, %b %-d, %-I:%M %p").to_string()
        }
    };
    let quality = opts
        .quality
        .map(|rules| rules.label_game(game).unwrap_or(GameLabel::Neutral))
        .map(|label| quality_suffix(opts.format, label))
        .unwrap_or("");
    format!(
        "{}{} at {}{}, {kickoff}{quality}",
        game.away,
        record_suffix(opts.records, &game.away),
        game.home,
        record_suffix(opts.records, &game.home),
    )
}

/// Games in kickoff order; equal kickoffs keep their input order.
pub fn in_kickoff_order(games: &[Game]) -> Vec<&Game> {
    let mut ordered: Vec<&Game> = games.iter().collect();
    ordered.sort_by_key(|g| g.kickoff);
    ordered
}

pub fn render(games: &[Game], opts: &RenderOptions<'_>) -> String {
    let ordered = in_kickoff_order(games);
    match opts.format {
        OutputFormat::Text => ordered
            .iter()
            .map(|g| game_line(g, opts))
            .collect::<Vec<_>>()
            .join("\n"),
        OutputFormat::Html | OutputFormat::Markdown => render_page(&ordered, opts),
    }
}

fn html_encode(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_page(ordered: &[&Game], opts: &RenderOptions<'_>) -> String {
    let html = opts.format == OutputFormat::Html;
    let mut out = String::new();
    if html {
        out.push_str("<html><body>\n");
    }

    let mut previous: Option<NaiveDateTime> = None;
    for game in ordered {
        // Visual break between kickoff windows.
        if previous.is_some_and(|prev| game.kickoff - prev > Duration::hours(1)) {
            out.push_str("<br/>");
        }
        previous = Some(game.kickoff);

        let line = game_line(game, opts);
        let body = match (opts.game_pass, html) {
            (Some(base), true) => format!(
                "<a href=\"{}\">{}</a>",
                html_encode(&game_pass_url(base, game)),
                html_encode(&line)
            ),
            (Some(base), false) => format!("[{line}]({})", game_pass_url(base, game)),
            (None, true) => html_encode(&line),
            (None, false) => line,
        };
        if html {
            let _ = writeln!(out, "<p>{body}</p>");
        } else {
            let _ = writeln!(out, "{body}\n");
        }
    }

    if html {
        out.push_str("</body></html>");
    }
    out
}
