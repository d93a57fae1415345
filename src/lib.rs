//! Headless interactivity for the i's Japanese hair salon website.
//!
//! Every controller works against an in-memory [`dom::Document`] and takes
//! browser facilities (storage, clock, visibility observers, animation
//! frames, the submission backend) as injected capabilities, so the whole
//! page can be driven deterministically from tests or a host process.

pub mod animation;
pub mod capability;
pub mod config;
pub mod dom;
pub mod error;
pub mod form;
pub mod i18n;
pub mod markup;
pub mod navigation;
pub mod observer;
pub mod resources;
pub mod service_worker;
pub mod site;

pub use error::{Result, SiteError};
pub use site::{Capabilities, Site};
