use std::{collections::HashMap, fs, path::Path};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "reporter.toml";

/// Marker left in templates for endpoints that still need filling in.
const PLACEHOLDER_MARKER: &str = "PASTE_";

/// Raw endpoint addresses before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub upload_endpoint: String,
    pub process_endpoint: String,
    pub feed_endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            upload_endpoint: "http://127.0.0.1:8080/getUploadURLs".into(),
            process_endpoint: "http://127.0.0.1:8080/processGrievance".into(),
            feed_endpoint: "http://127.0.0.1:8080/getGrievances".into(),
        }
    }
}

impl Settings {
    pub fn into_config(self) -> anyhow::Result<ClientConfig> {
        let upload_endpoint = Url::parse(self.upload_endpoint.trim()).with_context(|| {
            format!("invalid upload_endpoint '{}'", self.upload_endpoint)
        })?;
        let process_endpoint = Url::parse(self.process_endpoint.trim()).with_context(|| {
            format!("invalid process_endpoint '{}'", self.process_endpoint)
        })?;
        let feed_endpoint = FeedEndpoint::parse(&self.feed_endpoint)
            .with_context(|| format!("invalid feed_endpoint '{}'", self.feed_endpoint))?;

        Ok(ClientConfig {
            upload_endpoint,
            process_endpoint,
            feed_endpoint,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEndpoint {
    Configured(Url),
    Unconfigured,
}

impl FeedEndpoint {
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.contains(PLACEHOLDER_MARKER) {
            return Ok(Self::Unconfigured);
        }
        Url::parse(raw).map(Self::Configured)
    }
}

/// Endpoint configuration built once at startup and handed to each component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub upload_endpoint: Url,
    pub process_endpoint: Url,
    pub feed_endpoint: FeedEndpoint,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the TOML file at `path` if readable, then environment overrides.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("upload_endpoint") {
                    settings.upload_endpoint = v.clone();
                }
                if let Some(v) = file_cfg.get("process_endpoint") {
                    settings.process_endpoint = v.clone();
                }
                if let Some(v) = file_cfg.get("feed_endpoint") {
                    settings.feed_endpoint = v.clone();
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable settings file: {err}");
            }
        }
    }

    if let Some(v) = env("APP__UPLOAD_ENDPOINT") {
        settings.upload_endpoint = v;
    }
    if let Some(v) = env("APP__PROCESS_ENDPOINT") {
        settings.process_endpoint = v;
    }
    if let Some(v) = env("APP__FEED_ENDPOINT") {
        settings.feed_endpoint = v;
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
