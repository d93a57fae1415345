//! The locales the site is published in, built once and shared.
//!
//! Every `data-<code>` text variant on the page and every `.lang-btn`
//! switcher corresponds to one entry here. English is the canonical locale:
//! the page is authored in it and it is shown when nothing else matches.

use std::sync::OnceLock;

use crate::i18n::strings::{LanguageStrings, ENGLISH_STRINGS, JAPANESE_STRINGS};

/// One published locale.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 code; also the suffix of the `data-<code>` text attributes
    /// and the `data-lang` value of its switcher button
    pub code: &'static str,

    /// English name of the locale ("Japanese")
    pub name: &'static str,

    /// Name shown on the switcher ("日本語")
    pub native_name: &'static str,

    /// Whether the page is authored in this locale (exactly one is)
    pub is_canonical: bool,

    /// Whether visitors can switch to this locale
    pub enabled: bool,

    /// Title and meta description shown while this locale is active
    pub strings: &'static LanguageStrings,
}

/// Shared, immutable set of published locales.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// The site-wide registry, built on first use.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry::with_languages(published_languages()))
    }

    fn with_languages(languages: Vec<LanguageConfig>) -> Self {
        Self { languages }
    }

    /// Look up a locale by its code, enabled or not.
    ///
    /// # Arguments
    /// * `code` - ISO 639-1 code as stored or found in `data-lang`
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the code is registered
    /// * `None` otherwise
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Locales visitors can switch to, in switcher order.
    pub fn list_enabled(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().filter(|lang| lang.enabled).collect()
    }

    /// Whether `code` is registered and enabled.
    pub fn is_enabled(&self, code: &str) -> bool {
        self.get_by_code(code).is_some_and(|lang| lang.enabled)
    }

    /// The locale the page is authored in.
    ///
    /// # Returns
    /// The entry flagged `is_canonical`, or the first entry when none is
    /// flagged.
    pub fn canonical(&self) -> &LanguageConfig {
        self.languages
            .iter()
            .find(|lang| lang.is_canonical)
            .unwrap_or(&self.languages[0])
    }

    /// Pick the locale for a navigator language tag.
    ///
    /// # Arguments
    /// * `locale` - A tag such as `ja-JP` or `en-US`
    ///
    /// # Returns
    /// The first enabled locale whose code prefixes `locale`, otherwise the
    /// canonical one.
    pub fn match_locale(&self, locale: &str) -> &LanguageConfig {
        self.languages
            .iter()
            .filter(|lang| lang.enabled)
            .find(|lang| locale.starts_with(lang.code))
            .unwrap_or_else(|| self.canonical())
    }
}

fn published_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            is_canonical: true,
            enabled: true,
            strings: &ENGLISH_STRINGS,
        },
        LanguageConfig {
            code: "ja",
            name: "Japanese",
            native_name: "日本語",
            is_canonical: false,
            enabled: true,
            strings: &JAPANESE_STRINGS,
        },
    ]
}
