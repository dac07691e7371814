use std::{collections::HashMap, fs, io, path::Path, time::Duration};

use anyhow::{bail, Context};
use store_core::{ComposerOptions, VerticalNavigation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub fetch_timeout_secs: u64,
    pub columns: usize,
    pub preview_limit: usize,
    pub carousel_visible: usize,
    pub vertical_navigation: VerticalNavigation,
}

impl Default for Settings {
    fn default() -> Self {
        let options = ComposerOptions::default();
        Self {
            base_url: "http://127.0.0.1:8080/api/games".into(),
            fetch_timeout_secs: 15,
            columns: options.columns,
            preview_limit: options.preview_limit,
            carousel_visible: options.carousel_visible,
            vertical_navigation: options.vertical,
        }
    }
}

impl Settings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn composer_options(&self) -> ComposerOptions {
        ComposerOptions {
            columns: self.columns,
            preview_limit: self.preview_limit,
            carousel_visible: self.carousel_visible,
            vertical: self.vertical_navigation,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.base_url.trim().is_empty() {
            bail!("base_url must not be empty");
        }
        if self.columns == 0 {
            bail!("columns must be at least 1");
        }
        if self.carousel_visible == 0 {
            bail!("carousel_visible must be at least 1");
        }
        if self.fetch_timeout_secs == 0 {
            bail!("fetch_timeout_secs must be at least 1");
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(columns) = overrides.columns {
            self.columns = columns;
        }
        if let Some(mode) = overrides.vertical_navigation {
            self.vertical_navigation = mode;
        }
    }
}

/// Values given on the command line; they win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub columns: Option<usize>,
    pub vertical_navigation: Option<VerticalNavigation>,
}

/// Defaults, then the optional settings file, then environment overrides.
/// Validation is left to the caller once command-line values are applied.
pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

pub fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: HashMap<String, toml::Value> = toml::from_str(raw)?;
    for (key, value) in &file_cfg {
        let value = match value {
            toml::Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        apply_key(settings, key, &value)?;
    }
    Ok(())
}

pub fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("STORE_BASE_URL") {
        settings.base_url = v;
    }
    for key in [
        "base_url",
        "fetch_timeout_secs",
        "columns",
        "preview_limit",
        "carousel_visible",
        "vertical_navigation",
    ] {
        let env_key = format!("APP__{}", key.to_ascii_uppercase());
        if let Some(v) = lookup(&env_key) {
            apply_key(settings, key, &v).with_context(|| format!("invalid {env_key}"))?;
        }
    }
    Ok(())
}

fn apply_key(settings: &mut Settings, key: &str, value: &str) -> anyhow::Result<()> {
    match key {
        "base_url" => settings.base_url = value.trim().to_string(),
        "fetch_timeout_secs" => settings.fetch_timeout_secs = parse_number(key, value)?,
        "columns" => settings.columns = parse_number(key, value)?,
        "preview_limit" => settings.preview_limit = parse_number(key, value)?,
        "carousel_visible" => settings.carousel_visible = parse_number(key, value)?,
        "vertical_navigation" => {
            settings.vertical_navigation = parse_vertical_navigation(value)?
        }
        other => bail!("unknown settings key '{other}'"),
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse::<T>()
        .with_context(|| format!("'{value}' is not a valid value for {key}"))
}

pub fn parse_vertical_navigation(raw: &str) -> anyhow::Result<VerticalNavigation> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "as_shipped" => Ok(VerticalNavigation::AsShipped),
        "row_aligned" => Ok(VerticalNavigation::RowAligned),
        other => bail!("unknown vertical navigation mode '{other}' (expected as_shipped or row_aligned)"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
