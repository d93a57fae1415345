//! Header navigation: mobile menu, scroll-dependent header style and smooth
//! in-page scrolling.

use tracing::debug;

use crate::config::SiteConfig;
use crate::dom::{Document, NodeId, Selector};

const HEADER_BACKGROUND_OPAQUE: &str = "rgba(255, 255, 255, 0.98)";
const HEADER_BACKGROUND_TRANSLUCENT: &str = "rgba(255, 255, 255, 0.95)";
const HEADER_SHADOW: &str = "0 2px 20px rgba(0, 0, 0, 0.1)";

/// Inline header style for a scroll position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderStyle {
    pub background: &'static str,
    pub box_shadow: &'static str,
}

/// Opaque with a shadow strictly past `threshold`, translucent otherwise.
pub fn header_style(scroll_y: f64, threshold: f64) -> HeaderStyle {
    if scroll_y > threshold {
        HeaderStyle {
            background: HEADER_BACKGROUND_OPAQUE,
            box_shadow: HEADER_SHADOW,
        }
    } else {
        HeaderStyle {
            background: HEADER_BACKGROUND_TRANSLUCENT,
            box_shadow: "none",
        }
    }
}

/// A smooth `window.scrollTo` request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
}

/// What a click did beyond DOM changes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClickOutcome {
    pub default_prevented: bool,
    pub scroll: Option<ScrollRequest>,
}

pub struct Navigation {
    navbar: Option<NodeId>,
    // Only wired when both exist
    mobile_menu: Option<(NodeId, NodeId)>,
    scroll_threshold: f64,
    header_offset: f64,
}

impl Navigation {
    pub fn new(doc: &Document, config: &SiteConfig) -> Self {
        let navbar = doc.query(&Selector::class("navbar"));
        let hamburger = doc.query(&Selector::class("hamburger"));
        let nav_menu = doc.query(&Selector::class("nav-menu"));
        if navbar.is_none() {
            debug!("No .navbar on the page, header scroll effect disabled");
        }
        Self {
            navbar,
            mobile_menu: hamburger.zip(nav_menu),
            scroll_threshold: config.header_scroll_threshold,
            header_offset: config.header_offset,
        }
    }

    pub fn is_menu_open(&self, doc: &Document) -> bool {
        self.mobile_menu
            .map(|(_, menu)| doc.has_class(menu, "active"))
            .unwrap_or(false)
    }

    fn close_menu(&self, doc: &mut Document) {
        if let Some((hamburger, menu)) = self.mobile_menu {
            doc.remove_class(hamburger, "active");
            doc.remove_class(menu, "active");
        }
    }

    /// Run the click handlers in bubbling order: the hamburger and nav links,
    /// then in-page anchors, then the document-level outside-click check.
    pub fn handle_click(&self, doc: &mut Document, target: NodeId) -> ClickOutcome {
        let mut outcome = ClickOutcome::default();

        if let Some((hamburger, menu)) = self.mobile_menu {
            if doc.closest(target, &Selector::class("hamburger")).is_some() {
                doc.toggle_class(hamburger, "active");
                doc.toggle_class(menu, "active");
            }
            if doc.closest(target, &Selector::class("nav-link")).is_some() {
                self.close_menu(doc);
            }
        }

        let in_page = Selector::tag("a").with_attr_prefix("href", "#");
        if let Some(anchor) = doc.closest(target, &in_page) {
            outcome.default_prevented = true;
            outcome.scroll = self.smooth_scroll_target(doc, anchor);
        }

        if doc.closest(target, &Selector::class("navbar")).is_none() {
            self.close_menu(doc);
        }

        outcome
    }

    /// Scroll request for an in-page anchor, or `None` when its target id
    /// does not exist.
    pub fn smooth_scroll_target(&self, doc: &Document, anchor: NodeId) -> Option<ScrollRequest> {
        let href = doc.attr(anchor, "href")?;
        let id = href.strip_prefix('#').filter(|id| !id.is_empty())?;
        let Some(target) = doc.element_by_id(id) else {
            debug!("Anchor {} has no target on the page", href);
            return None;
        };
        Some(ScrollRequest {
            top: (doc.rect(target).top - self.header_offset).max(0.0),
        })
    }

    pub fn handle_scroll(&self, doc: &mut Document) {
        let Some(navbar) = self.navbar else {
            return;
        };
        let style = header_style(doc.scroll_y(), self.scroll_threshold);
        doc.set_style(navbar, "background", style.background);
        doc.set_style(navbar, "box-shadow", style.box_shadow);
    }
}
