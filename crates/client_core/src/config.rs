use std::{fs, io, path::Path};

use anyhow::{anyhow, Context};

pub const SETTINGS_FILE: &str = "planner.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_url: String,
    /// Fill a blank map link with a search URL when adding an itinerary item.
    pub auto_map_links: bool,
    pub log_filter: String,
    /// Extra font registered with the GUI, for glyphs the bundled fonts lack.
    pub font_path: Option<String>,
    /// Google Maps key for transit times between activities; unset disables them.
    pub maps_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            auto_map_links: false,
            log_filter: "info".into(),
            font_path: None,
            maps_api_key: None,
        }
    }
}

/// Defaults, then `planner.toml` (or `explicit_path`), then environment.
///
/// A missing default file is fine; a missing explicit file is an error.
pub fn load_settings(explicit_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    let path = explicit_path.unwrap_or(Path::new(SETTINGS_FILE));

    match fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(err) if explicit_path.is_none() && err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok())?;
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let table = toml::from_str::<toml::Table>(raw)?;

    if let Some(v) = table_text(&table, "server_url")? {
        settings.server_url = v;
    }
    if let Some(v) = table_text(&table, "auto_map_links")? {
        settings.auto_map_links = parse_flag("auto_map_links", &v)?;
    }
    if let Some(v) = table_text(&table, "log_filter")? {
        settings.log_filter = v;
    }
    if let Some(v) = table_text(&table, "font_path")? {
        settings.font_path = Some(v);
    }
    if let Some(v) = table_text(&table, "maps_api_key")? {
        settings.maps_api_key = non_empty(v);
    }

    Ok(())
}

fn table_text(table: &toml::Table, key: &str) -> anyhow::Result<Option<String>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::String(v)) => Ok(Some(v.clone())),
        Some(toml::Value::Boolean(v)) => Ok(Some(v.to_string())),
        Some(other) => Err(anyhow!(
            "'{key}' must be a string or boolean, found {}",
            other.type_str()
        )),
    }
}

fn apply_env(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<()> {
    if let Some(v) = lookup("PLANNER_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = lookup("APP__AUTO_MAP_LINKS") {
        settings.auto_map_links =
            parse_flag("APP__AUTO_MAP_LINKS", &v).context("invalid environment override")?;
    }

    if let Some(v) = lookup("APP__LOG_FILTER") {
        settings.log_filter = v;
    }

    if let Some(v) = lookup("APP__FONT_PATH") {
        settings.font_path = Some(v);
    }

    if let Some(v) = lookup("GOOGLE_MAPS_API_KEY") {
        settings.maps_api_key = non_empty(v);
    }
    if let Some(v) = lookup("APP__MAPS_API_KEY") {
        settings.maps_api_key = non_empty(v);
    }

    Ok(())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_flag(key: &str, raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(anyhow!("'{key}' expects a boolean, got '{other}'")),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
