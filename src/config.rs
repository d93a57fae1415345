use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::SiteError;

/// Stylesheets warmed with `<link rel="preload" as="style">` on every page load.
pub const FONT_STYLESHEETS: [&str; 2] = [
    "https://fonts.googleapis.com/css2?family=Playfair+Display:wght@400;500;600;700&display=swap",
    "https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap",
];

/// Behavioral constants for the page controllers.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    // Language
    /// Storage key holding the preferred locale code
    pub language_storage_key: String,

    // Navigation
    /// Scroll offset past which the header switches to its opaque style
    pub header_scroll_threshold: f64,
    /// Fixed header height subtracted from smooth-scroll targets
    pub header_offset: f64,

    // Animations
    /// Initial downward offset of reveal elements, in pixels
    pub reveal_offset: f64,
    /// Per-index transition delay for reveal elements, in seconds
    pub reveal_stagger_secs: f64,
    pub reveal_threshold: f64,
    /// Bottom root margin for the reveal observer (negative shrinks the viewport)
    pub reveal_bottom_margin: f64,
    pub counter_threshold: f64,
    pub counter_duration: Duration,
    /// Multiplier applied to the scroll offset for background parallax
    pub parallax_rate: f64,

    // Contact form
    pub submit_delay: Duration,
    /// Probability in [0, 1] that the simulated backend succeeds
    pub submit_success_rate: f64,
    pub notification_fade_in: Duration,
    pub notification_lifetime: Duration,
    pub notification_fade_out: Duration,

    // Resources
    pub font_stylesheets: Vec<String>,
    pub service_worker_script: String,
}

impl SiteConfig {
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.language_storage_key = key.into();
        self
    }

    pub fn with_counter_duration(mut self, duration: Duration) -> Self {
        self.counter_duration = duration;
        self
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    pub fn with_submit_success_rate(mut self, rate: f64) -> Self {
        self.submit_success_rate = rate;
        self
    }

    pub fn with_notification_lifetime(mut self, lifetime: Duration) -> Self {
        self.notification_lifetime = lifetime;
        self
    }

    /// Reject values the controllers cannot work with.
    pub fn validate(&self) -> Result<(), SiteError> {
        if self.language_storage_key.is_empty() {
            return Err(SiteError::Config("language storage key is empty".into()));
        }
        if !(0.0..=1.0).contains(&self.submit_success_rate) {
            return Err(SiteError::Config(format!(
                "submit success rate must be within [0, 1], got {}",
                self.submit_success_rate
            )));
        }
        if self.counter_duration.is_zero() {
            return Err(SiteError::Config("counter duration must be non-zero".into()));
        }
        for threshold in [self.reveal_threshold, self.counter_threshold] {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(SiteError::Config(format!(
                    "visibility threshold must be within [0, 1], got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            language_storage_key: "preferred-language".to_string(),
            header_scroll_threshold: 100.0,
            header_offset: 80.0,
            reveal_offset: 30.0,
            reveal_stagger_secs: 0.1,
            reveal_threshold: 0.1,
            reveal_bottom_margin: -50.0,
            counter_threshold: 0.5,
            counter_duration: Duration::from_millis(2000),
            parallax_rate: -0.5,
            submit_delay: Duration::from_secs(2),
            submit_success_rate: 0.9,
            notification_fade_in: Duration::from_millis(100),
            notification_lifetime: Duration::from_secs(5),
            notification_fade_out: Duration::from_millis(300),
            font_stylesheets: FONT_STYLESHEETS.iter().map(|s| s.to_string()).collect(),
            service_worker_script: "/sw.js".to_string(),
        }
    }
}

/// Settings for the headless host binary.
#[derive(Debug, Clone)]
pub struct HostConfig {
    /// JSON file backing the preference store
    pub storage_path: PathBuf,
    /// Value reported as the navigator locale
    pub navigator_language: String,
    pub viewport_height: f64,
}

impl HostConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            storage_path: std::env::var("SALON_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".salon-site/storage.json")),
            navigator_language: std::env::var("SALON_NAVIGATOR_LANGUAGE")
                .unwrap_or_else(|_| "en-US".to_string()),
            viewport_height: match std::env::var("SALON_VIEWPORT_HEIGHT") {
                Ok(raw) => raw
                    .parse()
                    .with_context(|| format!("SALON_VIEWPORT_HEIGHT is not a number: {raw}"))?,
                Err(_) => 800.0,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SiteConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.language_storage_key, "preferred-language");
        assert_eq!(config.counter_duration, Duration::from_millis(2000));
        assert_eq!(config.font_stylesheets.len(), 2);
    }

    #[test]
    fn test_builder_pattern() {
        let config = SiteConfig::default()
            .with_storage_key("lang")
            .with_submit_delay(Duration::from_millis(10))
            .with_submit_success_rate(1.0);

        assert_eq!(config.language_storage_key, "lang");
        assert_eq!(config.submit_delay, Duration::from_millis(10));
        assert!((config.submit_success_rate - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_rejects_bad_success_rate() {
        let config = SiteConfig::default().with_submit_success_rate(1.5);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("success rate"));
    }

    #[test]
    fn test_validate_rejects_zero_counter_duration() {
        let config = SiteConfig::default().with_counter_duration(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_storage_key() {
        let config = SiteConfig::default().with_storage_key("");
        assert!(config.validate().is_err());
    }
}
