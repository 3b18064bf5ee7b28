//! Show script: what to say and when.
//!
//! Loaded once from JSON (every field optional) and then overridden from the
//! command line. The simulation reads it but never mutates it.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    /// Taps needed before the greeting is formed
    pub target_clicks: u32,
    /// Greeting text, one line per `\n`
    pub greeting: String,
    /// Messages shown one after another during the wish cycle
    pub wishes: Vec<String>,
    pub credits_text: String,
    pub credits_link: Option<String>,
    /// Shown from the start until the greeting launches
    pub intro_hint: String,
    /// Shown briefly while the greeting hangs in the sky
    pub continue_hint: String,
    /// Number of finale rockets that carry one text
    pub rockets_per_text: usize,
    pub timing: Timing,
}

/// Scripted delays, in seconds of simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Timing {
    /// From the last warmup tap to the greeting launch
    pub greeting_delay: f64,
    /// From the greeting launch to the "keep tapping" hint
    pub hint_delay: f64,
    /// From the greeting launch to the start of the wish cycle
    pub wishes_delay: f64,
    /// Between two wishes, and before the first one
    pub wish_period: f64,
    /// From the last wish to the credits
    pub credits_delay: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            greeting_delay: 1.0,
            hint_delay: 1.0,
            wishes_delay: 4.0,
            wish_period: 5.0,
            credits_delay: 3.0,
        }
    }
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            target_clicks: 12,
            greeting: "HAPPY\nNEW YEAR!\n2026".to_string(),
            wishes: vec![
                "HEALTH".to_string(),
                "LOVE".to_string(),
                "GOOD\nLUCK".to_string(),
                "NEW\nHORIZONS".to_string(),
                "JOY!".to_string(),
            ],
            credits_text: "THANKS FOR WATCHING".to_string(),
            credits_link: None,
            intro_hint: "CLICK THE SKY".to_string(),
            continue_hint: "KEEP CLICKING".to_string(),
            rockets_per_text: 7,
            timing: Timing::default(),
        }
    }
}

impl ShowConfig {
    /// Reads a JSON script from disk. Missing fields keep their defaults.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!(
            "Loaded show script from {} ({} wishes)",
            path.display(),
            config.wishes.len()
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_clicks == 0 {
            return Err(Error::InvalidConfig("target_clicks must be at least 1".into()));
        }
        if self.rockets_per_text == 0 {
            return Err(Error::InvalidConfig(
                "rockets_per_text must be at least 1".into(),
            ));
        }

        let t = &self.timing;
        let delays = [
            ("greeting_delay", t.greeting_delay),
            ("hint_delay", t.hint_delay),
            ("wishes_delay", t.wishes_delay),
            ("credits_delay", t.credits_delay),
        ];
        for (name, value) in delays {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be a non-negative number of seconds, got {value}"
                )));
            }
        }
        if !t.wish_period.is_finite() || t.wish_period <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "wish_period must be positive, got {}",
                t.wish_period
            )));
        }
        if t.hint_delay > t.wishes_delay {
            return Err(Error::InvalidConfig(
                "hint_delay must not exceed wishes_delay".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ShowConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.target_clicks, 12);
        assert_eq!(config.rockets_per_text, 7);
        assert_eq!(config.timing.wish_period, 5.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ShowConfig = serde_json::from_str(
            r#"{ "target_clicks": 3, "wishes": ["ONE", "TWO"], "timing": { "wish_period": 2.5 } }"#,
        )
        .unwrap();
        assert_eq!(config.target_clicks, 3);
        assert_eq!(config.wishes, vec!["ONE", "TWO"]);
        assert_eq!(config.timing.wish_period, 2.5);
        assert_eq!(config.timing.credits_delay, 3.0);
        assert_eq!(config.greeting, ShowConfig::default().greeting);
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let config = ShowConfig {
            target_clicks: 0,
            ..ShowConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn non_positive_period_is_rejected() {
        let mut config = ShowConfig::default();
        config.timing.wish_period = 0.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        config.timing.wish_period = f64::NAN;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn negative_delay_is_rejected() {
        let mut config = ShowConfig::default();
        config.timing.credits_delay = -1.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("credits_delay"));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "greeting": "HI", "credits_link": "https://example.org" }}"#).unwrap();

        let config = ShowConfig::from_path(file.path()).unwrap();
        assert_eq!(config.greeting, "HI");
        assert_eq!(config.credits_link.as_deref(), Some("https://example.org"));
    }

    #[test]
    fn malformed_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = ShowConfig::from_path(file.path()).unwrap_err();
        match err {
            Error::ConfigParse { path, .. } => assert_eq!(path, file.path()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShowConfig::from_path(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
