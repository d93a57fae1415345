//! Transient notification banner with virtual fade timers.

use tracing::debug;

use crate::config::SiteConfig;
use crate::dom::{Document, NodeId, Selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            NotificationKind::Success => "#10b981",
            NotificationKind::Error => "#ef4444",
            NotificationKind::Info => "#3b82f6",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    FadeIn,
    FadeOut,
    Remove,
}

#[derive(Debug, Clone, Copy)]
struct Timer {
    due_ms: f64,
    banner: NodeId,
    step: Step,
}

/// Shows one banner at a time and runs its fade-in, fade-out and removal
/// when [`run_due`](Self::run_due) is called with the current time.
#[derive(Debug)]
pub struct Notifier {
    timers: Vec<Timer>,
    fade_in_ms: f64,
    lifetime_ms: f64,
    fade_out_ms: f64,
}

impl Notifier {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            timers: Vec::new(),
            fade_in_ms: config.notification_fade_in.as_secs_f64() * 1000.0,
            lifetime_ms: config.notification_lifetime.as_secs_f64() * 1000.0,
            fade_out_ms: config.notification_fade_out.as_secs_f64() * 1000.0,
        }
    }

    /// Replace any visible banner with a new one and schedule its lifecycle.
    pub fn show(
        &mut self,
        doc: &mut Document,
        message: &str,
        kind: NotificationKind,
        now_ms: f64,
    ) -> NodeId {
        if let Some(existing) = current(doc) {
            doc.remove(existing);
        }

        let body = doc.body();
        let banner = doc
            .element("div")
            .class(&format!("notification notification-{}", kind.as_str()))
            .text(message)
            .append_to(body);
        doc.set_css_text(banner, &banner_css(kind));
        debug!("Showing {} notification: {}", kind.as_str(), message);

        self.timers.push(Timer {
            due_ms: now_ms + self.fade_in_ms,
            banner,
            step: Step::FadeIn,
        });
        self.timers.push(Timer {
            due_ms: now_ms + self.lifetime_ms,
            banner,
            step: Step::FadeOut,
        });
        banner
    }

    /// Run every timer due at or before `now_ms`, earliest first.
    pub fn run_due(&mut self, doc: &mut Document, now_ms: f64) {
        while let Some(index) = self.next_due(now_ms) {
            let timer = self.timers.remove(index);
            // Banners replaced or removed since scheduling are left alone
            if !doc.is_connected(timer.banner) {
                continue;
            }
            match timer.step {
                Step::FadeIn => {
                    doc.set_style(timer.banner, "opacity", "1");
                    doc.set_style(timer.banner, "transform", "translateX(0)");
                }
                Step::FadeOut => {
                    doc.set_style(timer.banner, "opacity", "0");
                    doc.set_style(timer.banner, "transform", "translateX(100%)");
                    self.timers.push(Timer {
                        due_ms: timer.due_ms + self.fade_out_ms,
                        banner: timer.banner,
                        step: Step::Remove,
                    });
                }
                Step::Remove => doc.remove(timer.banner),
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.timers.is_empty()
    }

    fn next_due(&self, now_ms: f64) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= now_ms)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms))
            .map(|(i, _)| i)
    }
}

/// The banner currently on the page, if any.
pub fn current(doc: &Document) -> Option<NodeId> {
    doc.query(&Selector::class("notification"))
}

fn banner_css(kind: NotificationKind) -> String {
    format!(
        "position: fixed; top: 100px; right: 20px; background: {}; color: white; \
         padding: 1rem 1.5rem; border-radius: 10px; box-shadow: 0 10px 25px rgba(0, 0, 0, 0.2); \
         z-index: 10000; max-width: 400px; opacity: 0; transform: translateX(100%); \
         transition: all 0.3s ease; font-size: 0.9rem; line-height: 1.4;",
        kind.color()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier() -> Notifier {
        Notifier::new(&SiteConfig::default())
    }

    // ==================== show Tests ====================

    #[test]
    fn test_show_appends_hidden_banner() {
        let mut doc = Document::new();
        let mut n = notifier();
        let banner = n.show(&mut doc, "Saved", NotificationKind::Success, 0.0);

        assert_eq!(doc.parent(banner), Some(doc.body()));
        assert!(doc.has_class(banner, "notification"));
        assert!(doc.has_class(banner, "notification-success"));
        assert_eq!(doc.text_content(banner), "Saved");
        assert_eq!(doc.style(banner, "opacity"), Some("0"));
        assert_eq!(doc.style(banner, "background"), Some("#10b981"));
        assert_eq!(doc.style(banner, "transform"), Some("translateX(100%)"));
    }

    #[test]
    fn test_new_banner_replaces_existing() {
        let mut doc = Document::new();
        let mut n = notifier();
        let first = n.show(&mut doc, "One", NotificationKind::Info, 0.0);
        let second = n.show(&mut doc, "Two", NotificationKind::Error, 10.0);

        assert!(!doc.is_connected(first));
        assert_eq!(current(&doc), Some(second));
        assert_eq!(doc.query_all(&Selector::class("notification")).len(), 1);
    }

    // ==================== Timer Tests ====================

    #[test]
    fn test_full_lifecycle() {
        let mut doc = Document::new();
        let mut n = notifier();
        let banner = n.show(&mut doc, "Hi", NotificationKind::Info, 0.0);

        n.run_due(&mut doc, 99.0);
        assert_eq!(doc.style(banner, "opacity"), Some("0"));

        n.run_due(&mut doc, 100.0);
        assert_eq!(doc.style(banner, "opacity"), Some("1"));
        assert_eq!(doc.style(banner, "transform"), Some("translateX(0)"));

        n.run_due(&mut doc, 5000.0);
        assert_eq!(doc.style(banner, "opacity"), Some("0"));
        assert!(doc.is_connected(banner));

        n.run_due(&mut doc, 5299.0);
        assert!(doc.is_connected(banner));

        n.run_due(&mut doc, 5300.0);
        assert!(!doc.is_connected(banner));
        assert!(!n.has_pending());
    }

    #[test]
    fn test_late_tick_runs_every_step() {
        let mut doc = Document::new();
        let mut n = notifier();
        let banner = n.show(&mut doc, "Hi", NotificationKind::Info, 0.0);

        n.run_due(&mut doc, 60_000.0);
        assert!(!doc.is_connected(banner));
        assert!(!n.has_pending());
    }

    #[test]
    fn test_replaced_banner_timers_are_noops() {
        let mut doc = Document::new();
        let mut n = notifier();
        n.show(&mut doc, "Old", NotificationKind::Info, 0.0);
        let fresh = n.show(&mut doc, "New", NotificationKind::Success, 4000.0);

        // The old banner's fade-out and removal come due; the new one stays
        n.run_due(&mut doc, 5400.0);
        assert!(doc.is_connected(fresh));
        assert_eq!(doc.style(fresh, "opacity"), Some("1"));

        n.run_due(&mut doc, 9300.0);
        assert!(!doc.is_connected(fresh));
    }

    #[test]
    fn test_custom_lifetime() {
        let mut doc = Document::new();
        let config = SiteConfig::default()
            .with_notification_lifetime(std::time::Duration::from_millis(1000));
        let mut n = Notifier::new(&config);
        let banner = n.show(&mut doc, "Quick", NotificationKind::Info, 0.0);

        n.run_due(&mut doc, 1300.0);
        assert!(!doc.is_connected(banner));
    }

    #[test]
    fn test_kind_colors() {
        assert_eq!(NotificationKind::Success.color(), "#10b981");
        assert_eq!(NotificationKind::Error.color(), "#ef4444");
        assert_eq!(NotificationKind::Info.color(), "#3b82f6");
    }
}
