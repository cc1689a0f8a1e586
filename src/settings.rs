//! Runtime settings
//!
//! Loaded from a JSON file on native (`--config` or `PORTFOLIO_CONFIG`)
//! and from `window.__portfolio_settings` on the web. Missing fields take
//! their defaults; invalid values are rejected as a whole.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::audio::{default_songs, Song};
use crate::core::{FieldConfig, Span, MAX_PARTICLES};

/// Env var naming a settings file (native)
pub const CONFIG_ENV: &str = "PORTFOLIO_CONFIG";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("span `{field}` is invalid: [{min}, {max})")]
    InvalidSpan { field: &'static str, min: f32, max: f32 },
    #[error("particle count {0} exceeds the limit of {MAX_PARTICLES}")]
    TooManyParticles(usize),
    #[error("particle speed must be non-negative, got {0}")]
    NegativeSpeed(f32),
    #[error("playlist is empty")]
    EmptyPlaylist,
    #[error("song `{0}` has an empty or inverted segment")]
    InvalidSegment(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub field: FieldConfig,
    pub playlist: Vec<Song>,
    /// Skip the capability probe and always show the static background
    pub force_static: bool,
}

/// Command-line overrides applied on top of loaded settings
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    pub force_static: bool,
    pub seed: Option<u64>,
    pub particles: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            playlist: default_songs(),
            force_static: false,
        }
    }
}

impl Settings {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load `path`, or the file named by [`CONFIG_ENV`], falling back to
    /// defaults (with a warning) when anything goes wrong.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let Some(path) = path else {
            return Self::default();
        };
        match Self::load(&path) {
            Ok(settings) => {
                info!(path = %path.display(), "Settings loaded");
                settings
            }
            Err(e) => {
                warn!(error = %e, "Falling back to default settings");
                Self::default()
            }
        }
    }

    /// Read `window.__portfolio_settings` (a JSON string or a plain object)
    #[cfg(target_arch = "wasm32")]
    pub fn from_window() -> Self {
        let value = match js_sys::eval("window.__portfolio_settings") {
            Ok(v) if !v.is_undefined() && !v.is_null() => v,
            _ => return Self::default(),
        };
        let json = match value.as_string() {
            Some(s) => s,
            None => match js_sys::JSON::stringify(&value) {
                Ok(s) => String::from(s),
                Err(_) => {
                    warn!("window.__portfolio_settings is not serializable");
                    return Self::default();
                }
            },
        };
        match Self::from_json(&json) {
            Ok(settings) => {
                info!("Settings loaded from window");
                settings
            }
            Err(e) => {
                warn!(error = %e, "Falling back to default settings");
                Self::default()
            }
        }
    }

    /// Apply `overrides` and re-validate. On error `self` is left unchanged.
    pub fn apply(&mut self, overrides: &Overrides) -> Result<(), SettingsError> {
        let mut next = self.clone();
        next.force_static |= overrides.force_static;
        if let Some(seed) = overrides.seed {
            next.field.seed = Some(seed);
        }
        if let Some(count) = overrides.particles {
            next.field.count = count;
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.field.count > MAX_PARTICLES {
            return Err(SettingsError::TooManyParticles(self.field.count));
        }

        let bounds = &self.field.bounds;
        let spans: [(&'static str, Span); 4] = [
            ("phase", bounds.phase),
            ("amplitude", bounds.amplitude),
            ("speed", bounds.speed),
            ("origin", bounds.origin()),
        ];
        for (field, span) in spans {
            if !span.is_valid() {
                return Err(SettingsError::InvalidSpan { field, min: span.min, max: span.max });
            }
        }
        if bounds.speed.min < 0.0 {
            return Err(SettingsError::NegativeSpeed(bounds.speed.min));
        }

        if self.playlist.is_empty() {
            return Err(SettingsError::EmptyPlaylist);
        }
        for song in &self.playlist {
            if !(song.start.is_finite() && song.end.is_finite() && song.start >= 0.0 && song.start < song.end) {
                return Err(SettingsError::InvalidSegment(song.name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.field.count, 1000);
        assert_eq!(settings.playlist.len(), 1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"field": {"count": 250, "seed": 9}}"#).unwrap();
        assert_eq!(settings.field.count, 250);
        assert_eq!(settings.field.seed, Some(9));
        assert_eq!(settings.field.bounds, Default::default());
        assert!(!settings.force_static);
        assert_eq!(settings.playlist, default_songs());
    }

    #[test]
    fn test_inverted_span_rejected() {
        let json = r#"{"field": {"bounds": {"amplitude": {"min": 50.0, "max": 10.0}}}}"#;
        assert!(matches!(
            Settings::from_json(json),
            Err(SettingsError::InvalidSpan { field: "amplitude", .. })
        ));
    }

    #[test]
    fn test_negative_speed_rejected() {
        let json = r#"{"field": {"bounds": {"speed": {"min": -0.1, "max": 0.1}}}}"#;
        assert!(matches!(Settings::from_json(json), Err(SettingsError::NegativeSpeed(_))));
    }

    #[test]
    fn test_empty_playlist_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{"playlist": []}"#),
            Err(SettingsError::EmptyPlaylist)
        ));
    }

    #[test]
    fn test_bad_segment_rejected() {
        let json = r#"{"playlist": [{"name": "x", "src": "x.mp3", "start": 10.0, "end": 5.0}]}"#;
        assert!(matches!(Settings::from_json(json), Err(SettingsError::InvalidSegment(name)) if name == "x"));
    }

    #[test]
    fn test_particle_count_is_capped() {
        let json = format!(r#"{{"field": {{"count": {}}}}}"#, MAX_PARTICLES + 1);
        assert!(matches!(
            Settings::from_json(&json),
            Err(SettingsError::TooManyParticles(n)) if n == MAX_PARTICLES + 1
        ));

        let json = format!(r#"{{"field": {{"count": {MAX_PARTICLES}}}}}"#);
        assert!(Settings::from_json(&json).is_ok());
    }

    #[test]
    fn test_overrides_are_validated() {
        let mut settings = Settings::default();
        let err = settings.apply(&Overrides {
            force_static: true,
            particles: Some(5_000_000),
            ..Default::default()
        });
        assert!(matches!(err, Err(SettingsError::TooManyParticles(5_000_000))));
        assert_eq!(settings, Settings::default());

        settings
            .apply(&Overrides {
                force_static: true,
                seed: Some(7),
                particles: Some(250),
            })
            .unwrap();
        assert!(settings.force_static);
        assert_eq!(settings.field.seed, Some(7));
        assert_eq!(settings.field.count, 250);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(Settings::from_json("{"), Err(SettingsError::Parse(_))));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load_or_default(Some(Path::new("/nonexistent/portfolio.json")));
        assert_eq!(settings, Settings::default());
    }
}
