//! Internationalization (i18n) for the two published locales.
//!
//! # Architecture
//!
//! - `registry`: The published locales, their names and page strings
//! - `language`: `Language` value, only constructible for a registered code
//! - `strings`: Page-level strings (title, meta description) per language
//! - `preference`: The controller that persists and applies the visitor's choice
//!
//! # Example
//!
//! ```rust,ignore
//! use salon_site::i18n::Language;
//!
//! let japanese = Language::from_code("ja")?;
//! assert_eq!(japanese.data_attribute(), "data-ja");
//! ```

mod language;
mod preference;
mod registry;
mod strings;

pub use language::Language;
pub use preference::{apply, detect, LanguagePreference};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::LanguageStrings;
