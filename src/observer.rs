//! Visibility observation, the equivalent of `IntersectionObserver`.
//!
//! Observers report a target whenever its visible/hidden state changes,
//! including the first poll after it starts being observed.

use crate::dom::{Document, NodeId, Rect, Viewport};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Fraction of the target that must be visible, in [0, 1]
    pub threshold: f64,
    /// Added to the bottom edge of the viewport; negative values shrink it
    pub bottom_margin: f64,
}

impl ObserverOptions {
    pub fn new(threshold: f64, bottom_margin: f64) -> Self {
        Self {
            threshold,
            bottom_margin,
        }
    }
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: NodeId,
    pub is_intersecting: bool,
}

pub trait VisibilityObserver {
    fn observe(&mut self, target: NodeId);
    fn unobserve(&mut self, target: NodeId);
    fn is_observing(&self, target: NodeId) -> bool;

    /// Entries for observed targets whose state changed since the last poll.
    fn poll(&mut self, doc: &Document) -> Vec<IntersectionEntry>;
}

pub trait ObserverFactory {
    fn create(&self, options: ObserverOptions) -> Box<dyn VisibilityObserver>;
}

/// Fraction of `rect` inside the viewport after applying the bottom margin.
pub fn intersection_ratio(rect: Rect, viewport: Viewport, bottom_margin: f64) -> f64 {
    let root_top = viewport.scroll_y;
    let root_bottom = viewport.scroll_y + viewport.height + bottom_margin;
    if root_bottom <= root_top {
        return 0.0;
    }
    if rect.height <= 0.0 {
        return if rect.top >= root_top && rect.top <= root_bottom {
            1.0
        } else {
            0.0
        };
    }
    let overlap = rect.bottom().min(root_bottom) - rect.top.max(root_top);
    (overlap / rect.height).clamp(0.0, 1.0)
}

/// Observer computing visibility from element rectangles and the viewport.
#[derive(Debug)]
pub struct GeometryObserver {
    options: ObserverOptions,
    // Last reported state; None until the first poll after observe.
    targets: Vec<(NodeId, Option<bool>)>,
}

impl GeometryObserver {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    fn is_visible(&self, ratio: f64) -> bool {
        ratio > 0.0 && ratio >= self.options.threshold
    }
}

impl VisibilityObserver for GeometryObserver {
    fn observe(&mut self, target: NodeId) {
        if !self.is_observing(target) {
            self.targets.push((target, None));
        }
    }

    fn unobserve(&mut self, target: NodeId) {
        self.targets.retain(|(id, _)| *id != target);
    }

    fn is_observing(&self, target: NodeId) -> bool {
        self.targets.iter().any(|(id, _)| *id == target)
    }

    fn poll(&mut self, doc: &Document) -> Vec<IntersectionEntry> {
        let viewport = doc.viewport();
        let mut entries = Vec::new();
        for index in 0..self.targets.len() {
            let (target, last) = self.targets[index];
            if !doc.is_connected(target) {
                continue;
            }
            let ratio = intersection_ratio(doc.rect(target), viewport, self.options.bottom_margin);
            let visible = self.is_visible(ratio);
            if last != Some(visible) {
                self.targets[index].1 = Some(visible);
                entries.push(IntersectionEntry {
                    target,
                    is_intersecting: visible,
                });
            }
        }
        entries
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GeometryObserverFactory;

impl ObserverFactory for GeometryObserverFactory {
    fn create(&self, options: ObserverOptions) -> Box<dyn VisibilityObserver> {
        Box::new(GeometryObserver::new(options))
    }
}
