use std::{fs, io::ErrorKind, path::Path, time::Duration};

use anyhow::{bail, Context};
use client_core::{
    remote_store::{DEFAULT_BASE_URL, DEFAULT_ITEMS_PATH, DEFAULT_OWNERS_PATH},
    RemoteEndpoints,
};
use serde::Deserialize;
use tracing::warn;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub items_path: String,
    pub owners_path: String,
    pub page_size: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            items_path: DEFAULT_ITEMS_PATH.into(),
            owners_path: DEFAULT_OWNERS_PATH.into(),
            page_size: None,
            request_timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn endpoints(&self) -> RemoteEndpoints {
        RemoteEndpoints {
            base_url: self.base_url.clone(),
            items_path: self.items_path.clone(),
            owners_path: self.owners_path.clone(),
        }
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    items_path: Option<String>,
    owners_path: Option<String>,
    page_size: Option<u32>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the TOML file at `path` if it exists, then environment overrides.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.base_url {
        settings.base_url = normalize_base_url(&v)?;
    }
    if let Some(v) = file_cfg.items_path {
        settings.items_path = normalize_path(&v);
    }
    if let Some(v) = file_cfg.owners_path {
        settings.owners_path = normalize_path(&v);
    }
    if file_cfg.page_size.is_some() {
        settings.page_size = file_cfg.page_size.filter(|size| *size > 0);
    }
    if file_cfg.request_timeout_secs.is_some() {
        settings.request_timeout_secs = file_cfg.request_timeout_secs.filter(|secs| *secs > 0);
    }
    Ok(())
}

fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("TODO_BASE_URL") {
        settings.base_url = normalize_base_url(&v)?;
    }
    if let Some(v) = lookup("APP__BASE_URL") {
        settings.base_url = normalize_base_url(&v)?;
    }

    if let Some(v) = lookup("APP__ITEMS_PATH") {
        settings.items_path = normalize_path(&v);
    }
    if let Some(v) = lookup("APP__OWNERS_PATH") {
        settings.owners_path = normalize_path(&v);
    }

    if let Some(v) = lookup("APP__PAGE_SIZE") {
        match v.trim().parse::<u32>() {
            Ok(parsed) => settings.page_size = Some(parsed).filter(|size| *size > 0),
            Err(_) => warn!(value = %v, "ignoring APP__PAGE_SIZE that is not a number"),
        }
    }
    if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = Some(parsed).filter(|secs| *secs > 0),
            Err(_) => warn!(value = %v, "ignoring APP__REQUEST_TIMEOUT_SECS that is not a number"),
        }
    }

    Ok(())
}

pub fn normalize_base_url(raw: &str) -> anyhow::Result<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Settings::default().base_url);
    }

    let url = Url::parse(raw).with_context(|| format!("invalid base url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("base url '{raw}' must use http or https");
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    format!("/{trimmed}")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
