//! Scroll-driven animations: staggered card reveal, stat counters and
//! background parallax.

use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::capability::{Clock, FrameRequest, FrameScheduler};
use crate::config::SiteConfig;
use crate::dom::{Document, NodeId, Selector};
use crate::observer::{ObserverFactory, ObserverOptions, VisibilityObserver};

/// Cubic ease-out over `progress` in [0, 1].
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

/// Value shown `elapsed_ms` into a counter animation, and whether it is the
/// final frame. The final frame is always exactly `target`.
pub fn counter_value(target: i64, elapsed_ms: f64, duration_ms: f64) -> (i64, bool) {
    let progress = (elapsed_ms.max(0.0) / duration_ms).min(1.0);
    if progress >= 1.0 {
        return (target, true);
    }
    let shown = (target as f64 * ease_out_cubic(progress)).floor() as i64;
    (shown, false)
}

/// Render an integer with comma thousands separators (`1234567` → `1,234,567`).
pub fn format_grouped(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Parse the leading integer of `raw` the way `parseInt(raw, 10)` does:
/// `"500+"` → 500, `" 12"` → 12, `"abc"` → None.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: &str = &rest[..rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len())];
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

fn format_px(value: f64) -> String {
    // Avoid rendering negative zero as "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{}px", value)
}

#[derive(Debug, Clone, Copy)]
struct CounterAnimation {
    target: i64,
    start_ms: f64,
}

pub struct ScrollAnimations {
    reveal_observer: Box<dyn VisibilityObserver>,
    counter_observer: Box<dyn VisibilityObserver>,
    frames: Box<dyn FrameScheduler>,
    clock: Rc<dyn Clock>,
    running: HashMap<NodeId, CounterAnimation>,
    parallax: Vec<NodeId>,
    parallax_rate: f64,
    counter_duration_ms: f64,
}

impl ScrollAnimations {
    pub fn new(
        doc: &mut Document,
        observers: &dyn ObserverFactory,
        frames: Box<dyn FrameScheduler>,
        clock: Rc<dyn Clock>,
        config: &SiteConfig,
    ) -> Self {
        let mut reveal_observer = observers.create(ObserverOptions::new(
            config.reveal_threshold,
            config.reveal_bottom_margin,
        ));
        let reveal_targets = doc.query_any(&[
            Selector::class("service-card"),
            Selector::class("location-card"),
            Selector::class("gallery-item"),
        ]);
        for (index, element) in reveal_targets.iter().enumerate() {
            // Rounded so that index 3 renders as 0.3s rather than 0.30000000000000004s
            let delay = (index as f64 * config.reveal_stagger_secs * 1000.0).round() / 1000.0;
            doc.set_style(*element, "opacity", "0");
            doc.set_style(
                *element,
                "transform",
                format!("translateY({})", format_px(config.reveal_offset)),
            );
            doc.set_style(
                *element,
                "transition",
                format!("opacity 0.6s ease {delay}s, transform 0.6s ease {delay}s"),
            );
            reveal_observer.observe(*element);
        }

        let mut counter_observer =
            observers.create(ObserverOptions::new(config.counter_threshold, 0.0));
        let counters = doc.query_all(&Selector::class("stat-number").with_attr("data-target"));
        for counter in &counters {
            counter_observer.observe(*counter);
        }

        let parallax: Vec<NodeId> = [
            Selector::tag("img").within(Selector::class("hero-background")),
            Selector::tag("img").within(Selector::class("contact-background")),
        ]
        .iter()
        .filter_map(|selector| doc.query(selector))
        .collect();

        debug!(
            "Animations wired: {} reveal elements, {} counters, {} parallax layers",
            reveal_targets.len(),
            counters.len(),
            parallax.len()
        );

        Self {
            reveal_observer,
            counter_observer,
            frames,
            clock,
            running: HashMap::new(),
            parallax,
            parallax_rate: config.parallax_rate,
            counter_duration_ms: config.counter_duration.as_secs_f64() * 1000.0,
        }
    }

    /// Process visibility changes for reveal elements and counters.
    pub fn handle_visibility(&mut self, doc: &mut Document) {
        for entry in self.reveal_observer.poll(doc) {
            if entry.is_intersecting {
                doc.set_style(entry.target, "opacity", "1");
                doc.set_style(entry.target, "transform", "translateY(0)");
            }
        }

        for entry in self.counter_observer.poll(doc) {
            if !entry.is_intersecting {
                continue;
            }
            self.counter_observer.unobserve(entry.target);
            self.start_counter(doc, entry.target);
        }
    }

    fn start_counter(&mut self, doc: &Document, element: NodeId) {
        let raw = doc.attr(element, "data-target").unwrap_or_default();
        let Some(target) = parse_leading_int(raw) else {
            warn!("Skipping counter with non-numeric data-target '{}'", raw);
            return;
        };
        self.running.insert(
            element,
            CounterAnimation {
                target,
                start_ms: self.clock.now_ms(),
            },
        );
        self.frames.request_frame(FrameRequest { target: element });
    }

    /// Run the frame callbacks requested since the last frame.
    pub fn run_frame(&mut self, doc: &mut Document, timestamp_ms: f64) {
        for request in self.frames.take_frame() {
            let Some(animation) = self.running.get(&request.target).copied() else {
                continue;
            };
            let (shown, done) = counter_value(
                animation.target,
                timestamp_ms - animation.start_ms,
                self.counter_duration_ms,
            );
            doc.set_text_content(request.target, format_grouped(shown));
            if done {
                self.running.remove(&request.target);
            } else {
                self.frames.request_frame(request);
            }
        }
    }

    pub fn is_animating(&self) -> bool {
        self.frames.has_pending()
    }

    pub fn handle_scroll(&self, doc: &mut Document) {
        if self.parallax.is_empty() {
            return;
        }
        let offset = format_px(doc.scroll_y() * self.parallax_rate);
        for element in &self.parallax {
            doc.set_style(*element, "transform", format!("translateY({offset})"));
        }
    }
}
