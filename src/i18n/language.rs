//! Language type: a locale code validated against the registry.
//!
//! Values only come from the registry, so every `Language` names an enabled
//! locale with page strings and `data-<code>` variants.

use crate::i18n::{LanguageConfig, LanguageRegistry, LanguageStrings};
use anyhow::{bail, Result};

/// One of the published locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// ISO 639-1 language code ("en" or "ja")
    code: &'static str,
}

impl Language {
    /// The canonical locale the page is authored in.
    pub const ENGLISH: Language = Language { code: "en" };

    pub const JAPANESE: Language = Language { code: "ja" };

    /// Parse a stored or `data-lang` code.
    ///
    /// # Arguments
    /// * `code` - ISO 639-1 code ("en", "ja")
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is registered and enabled
    /// * `Err` if the code is unknown or its locale is disabled
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(_) => bail!("Language '{}' is not enabled", code),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Map a navigator locale such as `ja-JP` or `en-US` to a site language.
    ///
    /// Anything not starting with `ja` falls back to English.
    pub fn from_locale(locale: &str) -> Language {
        Language {
            code: LanguageRegistry::get().match_locale(locale).code,
        }
    }

    /// The locale shown when neither storage nor the navigator decides.
    pub fn canonical() -> Language {
        Language {
            code: LanguageRegistry::get().canonical().code,
        }
    }

    /// Whether the page is authored in this locale.
    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }

    /// ISO 639-1 code, as stored under `preferred-language` and set on the
    /// root element's `lang`.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Name of the attribute holding this language's text variant.
    pub fn data_attribute(&self) -> String {
        format!("data-{}", self.code)
    }

    /// Registry entry for this locale.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for values built through `from_code`, `from_locale` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("language codes always come from the registry")
    }

    /// English name of the locale, used in log lines.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Name the locale's switcher button shows.
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Page-level strings (title, meta description) for this language.
    pub fn strings(&self) -> &'static LanguageStrings {
        self.config().strings
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code)
    }
}
