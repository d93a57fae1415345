//! Visitor language preference: detection, persistence and the text swap.

use tracing::{debug, info, warn};

use crate::capability::Storage;
use crate::dom::{Document, NodeId, Selector};
use crate::i18n::Language;

/// Persists the chosen locale and keeps the page showing it.
///
/// After [`set_language`](Self::set_language) returns, the stored code, the
/// root `lang` attribute and the active `.lang-btn` always agree.
pub struct LanguagePreference {
    storage: Box<dyn Storage>,
    storage_key: String,
    navigator_language: Option<String>,
    current: Language,
}

impl LanguagePreference {
    /// Detect the preferred language and apply it to the page.
    pub fn new(
        doc: &mut Document,
        storage: Box<dyn Storage>,
        storage_key: impl Into<String>,
        navigator_language: Option<String>,
    ) -> Self {
        let storage_key = storage_key.into();
        let current = detect(storage.as_ref(), &storage_key, navigator_language.as_deref());
        let mut preference = Self {
            storage,
            storage_key,
            navigator_language,
            current,
        };
        preference.set_language(doc, current);
        preference
    }

    pub fn current(&self) -> Language {
        self.current
    }

    /// Stored preference if present and supported, else the navigator locale.
    pub fn detect(&self) -> Language {
        detect(
            self.storage.as_ref(),
            &self.storage_key,
            self.navigator_language.as_deref(),
        )
    }

    pub fn set_language(&mut self, doc: &mut Document, lang: Language) {
        self.current = lang;
        if let Err(e) = self.storage.set(&self.storage_key, lang.code()) {
            warn!("Failed to persist language preference '{}': {}", lang, e);
        }

        for button in doc.query_all(&Selector::class("lang-btn")) {
            let matches = doc.attr(button, "data-lang") == Some(lang.code());
            doc.set_class_present(button, "active", matches);
        }

        apply(doc, lang);
        let root = doc.root();
        doc.set_attr(root, "lang", lang.code());
        info!("Language set to {} ({})", lang.name(), lang);
    }

    /// Handle a click; returns whether it landed on a language button.
    pub fn handle_click(&mut self, doc: &mut Document, target: NodeId) -> bool {
        let Some(button) = doc.closest(target, &Selector::class("lang-btn")) else {
            return false;
        };
        let code = doc.attr(button, "data-lang").unwrap_or_default().to_string();
        match Language::from_code(&code) {
            Ok(lang) => self.set_language(doc, lang),
            Err(e) => warn!("Ignoring language button: {}", e),
        }
        true
    }
}

/// Resolve the language to show on startup.
pub fn detect(storage: &dyn Storage, key: &str, navigator_language: Option<&str>) -> Language {
    if let Some(saved) = storage.get(key) {
        match Language::from_code(&saved) {
            Ok(lang) => return lang,
            Err(e) => warn!("Ignoring stored language preference: {}", e),
        }
    }
    navigator_language
        .map(Language::from_locale)
        .unwrap_or_else(Language::canonical)
}

/// Swap every dual-localized element, the placeholder options, the title
/// and the meta description to `lang`.
///
/// Elements whose variant for `lang` is missing or empty are left as they are.
pub fn apply(doc: &mut Document, lang: Language) {
    let attribute = lang.data_attribute();
    let localized = doc.query_all(&Selector::attr("data-en").with_attr("data-ja"));
    debug!("Applying {} to {} localized elements", lang, localized.len());

    for element in localized {
        let text = match doc.attr(element, &attribute) {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => continue,
        };
        if doc.tag(element) == "input" && doc.input_type(element) == "submit" {
            doc.set_value(element, text);
        } else if doc.tag(element) == "option" {
            doc.set_text_content(element, text);
        } else {
            doc.set_inner_html(element, text);
        }
    }

    let placeholder = Selector::tag("option").with_attr_eq("value", "");
    for select in doc.query_all(&Selector::tag("select")) {
        let Some(option) = doc.query_in(select, &placeholder) else {
            continue;
        };
        let text = doc
            .attr(option, &attribute)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        if let Some(text) = text {
            doc.set_text_content(option, text);
        }
    }

    let strings = lang.strings();
    doc.set_title(strings.page_title);
    if let Some(meta) = doc.query(&Selector::tag("meta").with_attr_eq("name", "description")) {
        doc.set_attr(meta, "content", strings.meta_description);
    }
}
