use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use revolve_core::{ConfigError, ControllerSettings, SliderConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::util::{parse_bool, parse_direction};

pub const CONFIG_PATH_VAR: &str = "REVOLVE_CONFIG_PATH";
pub const CONFIG_JSON_VAR: &str = "REVOLVE_CONFIG_JSON";

const IS_CYCLING_VAR: &str = "REVOLVE_IS_CYCLING";
const DIRECTION_VAR: &str = "REVOLVE_DIRECTION";
const INTERVAL_MS_VAR: &str = "REVOLVE_INTERVAL_MS";
const ITEMS_ON_DISPLAY_VAR: &str = "REVOLVE_ITEMS_ON_DISPLAY";
const DEBOUNCE_WINDOW_MS_VAR: &str = "REVOLVE_DEBOUNCE_WINDOW_MS";

const DEFAULT_CANDIDATES: &[&str] = &[
    "revolve.toml",
    "revolve.json",
    "config/revolve.toml",
    "config/revolve.json",
];

/// Source that produced the slider settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SettingsSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid slider config: {0}")]
    Slider(#[from] ConfigError),

    #[error("controller.{field} must be greater than zero")]
    ZeroCapacity { field: &'static str },

    #[error("{key}={value:?} is not a valid override")]
    InvalidOverride { key: &'static str, value: String },
}

/// Slider behaviour plus the controller runtime knobs, as read from a
/// settings file or the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SliderSettings {
    /// Behaviour shared by every slider built from these settings.
    pub slider: SliderConfig,
    /// Debounce window and channel sizing for each controller task.
    pub controller: ControllerSettings,
}

impl SliderSettings {
    /// Load settings using environment variables.
    /// Evaluation order:
    /// 1) `$REVOLVE_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$REVOLVE_CONFIG_JSON` (inline JSON),
    /// 3) the first of `revolve.toml`, `revolve.json`, `config/revolve.toml`,
    ///    `config/revolve.json` found in the working directory,
    /// 4) defaults.
    ///
    /// Per-field `REVOLVE_*` overrides are applied on top and the result is
    /// validated.
    pub fn load_from_env() -> anyhow::Result<(Self, SettingsSource)> {
        let (mut settings, source) = Self::load_base()?;
        settings
            .apply_overrides(|key| env::var(key).ok())
            .context("invalid REVOLVE_* override")?;
        settings.validate().with_context(|| {
            format!("slider settings from {source:?} failed validation")
        })?;

        match &source {
            SettingsSource::Default => debug!("using default slider settings"),
            SettingsSource::EnvPath(path) | SettingsSource::File(path) => {
                info!(
                    path = %path.display(),
                    "slider settings loaded from file"
                )
            }
            SettingsSource::EnvInline => {
                info!("slider settings loaded from inline environment json")
            }
        }
        Ok((settings, source))
    }

    fn load_base() -> anyhow::Result<(Self, SettingsSource)> {
        if let Ok(path_str) = env::var(CONFIG_PATH_VAR)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let settings = Self::load_from_file(&path)?;
            return Ok((settings, SettingsSource::EnvPath(path)));
        }

        if let Ok(raw) = env::var(CONFIG_JSON_VAR)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_VAR}"))?;
            return Ok((parsed, SettingsSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file_in(Path::new(".")) {
            let settings = Self::load_from_file(&path)?;
            return Ok((settings, SettingsSource::File(path)));
        }

        Ok((Self::default(), SettingsSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read slider settings from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents).with_context(|| {
                format!("invalid slider settings {}", path.display())
            }),
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| {
                    anyhow!(
                        "invalid slider settings {}: {}",
                        path.display(),
                        err
                    )
                })
            }
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse slider settings {}: toml error: {}; \
                     json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid slider settings json: {err}"))
    }

    /// First default candidate that exists under `dir`.
    pub fn find_default_file_in(dir: &Path) -> Option<PathBuf> {
        DEFAULT_CANDIDATES
            .iter()
            .map(|candidate| dir.join(candidate))
            .find(|path| path.exists())
    }

    /// Apply `REVOLVE_*` per-field overrides resolved through `lookup`.
    /// Blank values are ignored.
    pub fn apply_overrides<F>(
        &mut self,
        lookup: F,
    ) -> Result<(), SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
                .map(|raw| (key, raw))
        };
        let invalid = |key: &'static str, value: String| {
            SettingsError::InvalidOverride { key, value }
        };

        if let Some((key, raw)) = get(IS_CYCLING_VAR) {
            self.slider.is_cycling =
                parse_bool(&raw).ok_or_else(|| invalid(key, raw))?;
        }
        if let Some((key, raw)) = get(DIRECTION_VAR) {
            self.slider.direction =
                parse_direction(&raw).ok_or_else(|| invalid(key, raw))?;
        }
        if let Some((key, raw)) = get(INTERVAL_MS_VAR) {
            self.slider.interval_ms =
                raw.parse().map_err(|_| invalid(key, raw))?;
        }
        if let Some((key, raw)) = get(ITEMS_ON_DISPLAY_VAR) {
            self.slider.items_on_display =
                raw.parse().map_err(|_| invalid(key, raw))?;
        }
        if let Some((key, raw)) = get(DEBOUNCE_WINDOW_MS_VAR) {
            self.controller.debounce_window_ms =
                raw.parse().map_err(|_| invalid(key, raw))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        self.slider.validate()?;
        if self.controller.event_capacity == 0 {
            return Err(SettingsError::ZeroCapacity {
                field: "event_capacity",
            });
        }
        if self.controller.command_capacity == 0 {
            return Err(SettingsError::ZeroCapacity {
                field: "command_capacity",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use revolve_core::Direction;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn parse_from_str_accepts_toml_and_json() {
        let toml = r#"
            [slider]
            direction = "left"
            items_on_display = 4

            [controller]
            debounce_window_ms = 250
        "#;
        let settings = SliderSettings::parse_from_str(toml, "inline").unwrap();
        assert_eq!(settings.slider.direction, Direction::Left);
        assert_eq!(settings.slider.items_on_display, 4);
        assert_eq!(settings.slider.interval_ms, 5_000);
        assert_eq!(settings.controller.debounce_window_ms, 250);
        assert_eq!(settings.controller.event_capacity, 64);

        let json = r#"{"slider": {"is_singly_cycle": false}}"#;
        let settings = SliderSettings::parse_from_str(json, "inline").unwrap();
        assert!(!settings.slider.is_singly_cycle);
    }

    #[test]
    fn parse_from_str_reports_both_errors() {
        let err = SliderSettings::parse_from_str("[[[", "broken").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("toml error"));
        assert!(message.contains("json error"));
    }

    #[test]
    fn overrides_replace_individual_fields() {
        let mut settings = SliderSettings::default();
        settings
            .apply_overrides(lookup(&[
                ("REVOLVE_IS_CYCLING", "off"),
                ("REVOLVE_DIRECTION", "Left"),
                ("REVOLVE_INTERVAL_MS", "750"),
                ("REVOLVE_ITEMS_ON_DISPLAY", " 2 "),
                ("REVOLVE_DEBOUNCE_WINDOW_MS", "40"),
            ]))
            .unwrap();

        assert!(!settings.slider.is_cycling);
        assert_eq!(settings.slider.direction, Direction::Left);
        assert_eq!(settings.slider.interval_ms, 750);
        assert_eq!(settings.slider.items_on_display, 2);
        assert_eq!(settings.controller.debounce_window_ms, 40);
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut settings = SliderSettings::default();
        settings
            .apply_overrides(lookup(&[("REVOLVE_INTERVAL_MS", "  ")]))
            .unwrap();
        assert_eq!(settings, SliderSettings::default());
    }

    #[test]
    fn malformed_override_names_the_variable() {
        let mut settings = SliderSettings::default();
        let err = settings
            .apply_overrides(lookup(&[("REVOLVE_ITEMS_ON_DISPLAY", "three")]))
            .unwrap_err();
        assert_eq!(
            err,
            SettingsError::InvalidOverride {
                key: "REVOLVE_ITEMS_ON_DISPLAY",
                value: "three".to_string(),
            }
        );
    }

    #[test]
    fn validate_rejects_zero_values() {
        let mut settings = SliderSettings::default();
        settings.slider.items_on_display = 0;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::Slider(ConfigError::ZeroItemsOnDisplay))
        );

        let mut settings = SliderSettings::default();
        settings.controller.command_capacity = 0;
        assert_eq!(
            settings.validate(),
            Err(SettingsError::ZeroCapacity {
                field: "command_capacity"
            })
        );

        let mut settings = SliderSettings::default();
        settings.slider.is_cycling = false;
        settings.slider.interval_ms = 0;
        assert!(settings.validate().is_ok());
    }
}
