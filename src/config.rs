use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.pro-football-reference.com";
pub const DEFAULT_GAMEPASS_URL: &str = "https://nfl.com/plus/games/";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/39.0.2171.95 Safari/537.36";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub gamepass_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Slept after every page request, whole week or single box score.
    pub request_delay: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            gamepass_url: DEFAULT_GAMEPASS_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            request_delay: Duration::ZERO,
        }
    }
}

impl FetchConfig {
    /// Reads `.env.local` / `.env` if present, then the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base) = non_empty("NFL_DATES_BASE_URL") {
            cfg.base_url = base.trim().trim_end_matches('/').to_string();
        }
        if let Some(url) = non_empty("NFL_DATES_GAMEPASS_URL") {
            let mut url = url.trim().to_string();
            if !url.ends_with('/') {
                url.push('/');
            }
            cfg.gamepass_url = url;
        }
        if let Some(agent) = non_empty("NFL_DATES_USER_AGENT") {
            cfg.user_agent = agent;
        }
        if let Some(secs) = non_empty("NFL_DATES_TIMEOUT_SECS").and_then(|v| v.trim().parse::<u64>().ok())
        {
            cfg.timeout = Duration::from_secs(u64::max(secs, 1));
        }
        if let Some(ms) =
            non_empty("NFL_DATES_REQUEST_DELAY_MS").and_then(|v| v.trim().parse::<u64>().ok())
        {
            cfg.request_delay = Duration::from_millis(ms);
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn lookup_overrides_defaults() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("NFL_DATES_BASE_URL", "http://localhost:8080/"),
            ("NFL_DATES_GAMEPASS_URL", "https://example.com/games"),
            ("NFL_DATES_TIMEOUT_SECS", "0"),
            ("NFL_DATES_REQUEST_DELAY_MS", "250"),
            ("NFL_DATES_USER_AGENT", "  "),
        ]);
        let cfg = FetchConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.gamepass_url, "https://example.com/games/");
        assert_eq!(cfg.timeout, Duration::from_secs(1));
        assert_eq!(cfg.request_delay, Duration::from_millis(250));
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn empty_lookup_is_default() {
        let cfg = FetchConfig::from_lookup(|_| None);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.request_delay, Duration::ZERO);
    }
}
