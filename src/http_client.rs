use std::thread;

use once_cell::sync::OnceCell;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::info;

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared blocking client; the first caller's config decides timeout and agent.
pub fn http_client(config: &FetchConfig) -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|source| FetchError::Http {
                url: config.base_url.clone(),
                source,
            })
    })
}

/// Where page bodies come from. The fetcher only ever asks for site-relative paths.
pub trait PageSource {
    fn get_page(&self, path: &str) -> Result<String>;

    fn url_for(&self, path: &str) -> String;
}

pub struct HttpSource {
    config: FetchConfig,
}

impl HttpSource {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }
}

impl PageSource for HttpSource {
    fn get_page(&self, path: &str) -> Result<String> {
        let client = http_client(&self.config)?;
        let url = self.url_for(path);
        info!(%url, "fetching page");

        let resp = client.get(&url).send().map_err(|source| FetchError::Http {
            url: url.clone(),
            source,
        });
        if !self.config.request_delay.is_zero() {
            thread::sleep(self.config.request_delay);
        }
        let resp = resp?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::not_found(url));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let body = resp.text().map_err(|source| FetchError::Http {
            url: url.clone(),
            source,
        })?;
        if body.to_ascii_lowercase().contains("access denied") {
            return Err(FetchError::AccessDenied(url));
        }
        Ok(body)
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.config.base_url, path)
        }
    }
}
