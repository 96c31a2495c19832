use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use carousel_core::CarouselSettings;
use carousel_engine::{FetchSettings, NormalizerSettings};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("no site URL configured")]
    MissingSiteUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub site_url: String,
    pub bearer_token: Option<String>,
    pub carousel: CarouselSettings,
    /// Title or filename fragments that are never shown.
    pub denylist: Vec<String>,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            site_url: String::new(),
            bearer_token: None,
            carousel: CarouselSettings::default(),
            denylist: Vec::new(),
            connect_timeout_secs: fetch.connect_timeout.as_secs(),
            request_timeout_secs: fetch.request_timeout.as_secs(),
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Reads `path`. `None` means the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn with_site_url(mut self, site_url: Option<String>) -> Self {
        if let Some(site_url) = site_url {
            self.site_url = site_url;
        }
        self
    }

    pub fn site_url(&self) -> Result<&str, ConfigError> {
        let trimmed = self.site_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::MissingSiteUrl);
        }
        Ok(trimmed)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            bearer_token: self.bearer_token.clone(),
            ..FetchSettings::default()
        }
    }

    pub fn normalizer_settings(&self) -> Result<NormalizerSettings, ConfigError> {
        Ok(NormalizerSettings::for_site(self.site_url()?).with_denylist(self.denylist.clone()))
    }

    /// The site's news overview page.
    pub fn view_all_url(&self) -> Result<String, ConfigError> {
        Ok(format!("{}/_layouts/15/news.aspx", self.site_url()?))
    }
}
