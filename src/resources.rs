//! Deferred image loading and resource warm-up hints.

use tracing::debug;

use crate::config::SiteConfig;
use crate::dom::{Document, NodeId, Selector};
use crate::observer::{ObserverFactory, ObserverOptions, VisibilityObserver};

pub struct ResourceHints {
    lazy_observer: Box<dyn VisibilityObserver>,
    lazy_images: Vec<NodeId>,
    warmed: Vec<NodeId>,
}

impl ResourceHints {
    /// Observe every `img[data-src]`, warm the hero image and append the
    /// font stylesheet preloads to `<head>`.
    pub fn new(doc: &mut Document, observers: &dyn ObserverFactory, config: &SiteConfig) -> Self {
        let mut lazy_observer = observers.create(ObserverOptions::default());
        let lazy_images = doc.query_all(&Selector::tag("img").with_attr("data-src"));
        for image in &lazy_images {
            lazy_observer.observe(*image);
        }

        let mut warmed = Vec::new();
        let hero = Selector::tag("img").within(Selector::class("hero-background"));
        let hero_src = doc
            .query(&hero)
            .and_then(|img| doc.attr(img, "src"))
            .filter(|src| !src.is_empty())
            .map(str::to_string);
        if let Some(src) = hero_src {
            // Never attached; assigning the source is what starts the fetch
            let image = doc.element("img").attr("src", &src).build();
            warmed.push(image);
        }

        let head = doc.head();
        for href in &config.font_stylesheets {
            doc.element("link")
                .attr("rel", "preload")
                .attr("as", "style")
                .attr("href", href)
                .append_to(head);
        }

        debug!(
            "Resource hints: {} deferred images, {} warmed, {} font preloads",
            lazy_images.len(),
            warmed.len(),
            config.font_stylesheets.len()
        );

        Self {
            lazy_observer,
            lazy_images,
            warmed,
        }
    }

    /// Swap in the real source of deferred images that became visible.
    pub fn handle_visibility(&mut self, doc: &mut Document) {
        for entry in self.lazy_observer.poll(doc) {
            if !entry.is_intersecting {
                continue;
            }
            let src = doc.attr(entry.target, "data-src").map(str::to_string);
            if let Some(src) = src {
                doc.set_attr(entry.target, "src", src);
                doc.add_class(entry.target, "loaded");
            }
            self.lazy_observer.unobserve(entry.target);
        }
    }

    /// Deferred images whose source has not been loaded yet.
    pub fn pending_images(&self) -> usize {
        self.lazy_images
            .iter()
            .filter(|image| self.lazy_observer.is_observing(**image))
            .count()
    }

    /// Sources of the off-screen images created to warm the cache.
    pub fn warmed_sources<'a>(&self, doc: &'a Document) -> Vec<&'a str> {
        self.warmed
            .iter()
            .filter_map(|image| doc.attr(*image, "src"))
            .collect()
    }
}
