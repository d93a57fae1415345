//! The page host: constructs every controller against one document and
//! routes browser events to them.

use std::rc::Rc;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, error, info};

use crate::animation::ScrollAnimations;
use crate::capability::{Clock, FrameQueue, FrameScheduler, MemoryStorage, Storage};
use crate::config::SiteConfig;
use crate::dom::{Document, NodeId};
use crate::error::{SiteError, SubmitError};
use crate::form::{ContactForm, SimulatedBackend, SubmissionBackend, SubmitOutcome};
use crate::i18n::{Language, LanguagePreference};
use crate::navigation::{ClickOutcome, Navigation};
use crate::observer::{GeometryObserverFactory, ObserverFactory};
use crate::resources::ResourceHints;
use crate::service_worker::{self, Registration, ServiceWorkerRegistrar};

/// Browser facilities the controllers depend on.
pub struct Capabilities {
    pub storage: Box<dyn Storage>,
    /// The navigator locale, e.g. `ja-JP`
    pub navigator_language: Option<String>,
    pub clock: Rc<dyn Clock>,
    pub observers: Box<dyn ObserverFactory>,
    pub frames: Box<dyn FrameScheduler>,
    pub backend: Arc<dyn SubmissionBackend>,
    pub service_worker: Option<Arc<dyn ServiceWorkerRegistrar>>,
}

impl Capabilities {
    /// In-memory storage, geometry observers and the simulated backend.
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            storage: Box::new(MemoryStorage::new()),
            navigator_language: None,
            clock,
            observers: Box::new(GeometryObserverFactory),
            frames: Box::new(FrameQueue::new()),
            backend: Arc::new(SimulatedBackend::default()),
            service_worker: None,
        }
    }

    pub fn with_storage(mut self, storage: impl Storage + 'static) -> Self {
        self.storage = Box::new(storage);
        self
    }

    pub fn with_navigator_language(mut self, locale: impl Into<String>) -> Self {
        self.navigator_language = Some(locale.into());
        self
    }

    pub fn with_backend(mut self, backend: impl SubmissionBackend + 'static) -> Self {
        self.backend = Arc::new(backend);
        self
    }

    pub fn with_service_worker(mut self, registrar: impl ServiceWorkerRegistrar + 'static) -> Self {
        self.service_worker = Some(Arc::new(registrar));
        self
    }
}

/// Build one controller, logging and skipping it on failure.
fn init_controller<T>(name: &str, build: impl FnOnce() -> Result<T, SiteError>) -> Option<T> {
    match build() {
        Ok(controller) => Some(controller),
        Err(e) => {
            error!("Failed to initialize {}: {}", name, e);
            None
        }
    }
}

pub struct Site {
    doc: Document,
    config: SiteConfig,
    clock: Rc<dyn Clock>,
    language: Option<LanguagePreference>,
    navigation: Option<Navigation>,
    animations: Option<ScrollAnimations>,
    contact: Option<ContactForm>,
    resources: Option<ResourceHints>,
    service_worker: Option<Arc<dyn ServiceWorkerRegistrar>>,
}

impl Site {
    /// Wire every controller against `doc`.
    ///
    /// Only an invalid `config` is an error; a controller that cannot be
    /// constructed is logged and left out while the rest still run.
    pub fn new(
        mut doc: Document,
        capabilities: Capabilities,
        config: SiteConfig,
    ) -> Result<Self, SiteError> {
        config.validate()?;
        let Capabilities {
            storage,
            navigator_language,
            clock,
            observers,
            frames,
            backend,
            service_worker,
        } = capabilities;

        let language = init_controller("language preference", || {
            Ok(LanguagePreference::new(
                &mut doc,
                storage,
                config.language_storage_key.clone(),
                navigator_language,
            ))
        });
        let navigation = init_controller("navigation", || Ok(Navigation::new(&doc, &config)));
        let animations = init_controller("scroll animations", || {
            Ok(ScrollAnimations::new(
                &mut doc,
                observers.as_ref(),
                frames,
                Rc::clone(&clock),
                &config,
            ))
        });
        let contact = init_controller("contact form", || ContactForm::new(&doc, backend, &config));
        let resources = init_controller("resource hints", || {
            Ok(ResourceHints::new(&mut doc, observers.as_ref(), &config))
        });

        let body = doc.body();
        doc.add_class(body, "loaded");

        let mut site = Self {
            doc,
            config,
            clock,
            language,
            navigation,
            animations,
            contact,
            resources,
            service_worker,
        };
        site.poll_visibility();
        info!("Salon site loaded ({} controllers active)", site.active_controllers());
        Ok(site)
    }

    fn active_controllers(&self) -> usize {
        [
            self.language.is_some(),
            self.navigation.is_some(),
            self.animations.is_some(),
            self.contact.is_some(),
            self.resources.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn language(&self) -> Option<Language> {
        self.language.as_ref().map(LanguagePreference::current)
    }

    pub fn set_language(&mut self, lang: Language) {
        if let Some(language) = self.language.as_mut() {
            language.set_language(&mut self.doc, lang);
        }
    }

    pub fn is_menu_open(&self) -> bool {
        self.navigation
            .as_ref()
            .map(|nav| nav.is_menu_open(&self.doc))
            .unwrap_or(false)
    }

    pub fn contact_form(&self) -> Option<&ContactForm> {
        self.contact.as_ref()
    }

    pub fn is_contact_form_active(&self) -> bool {
        self.contact.is_some()
    }

    // ==================== Events ====================

    /// Dispatch a click on `target`. An in-page anchor scroll is applied
    /// immediately.
    pub fn click(&mut self, target: NodeId) -> ClickOutcome {
        if let Some(language) = self.language.as_mut() {
            language.handle_click(&mut self.doc, target);
        }
        let outcome = match self.navigation.as_ref() {
            Some(nav) => nav.handle_click(&mut self.doc, target),
            None => ClickOutcome::default(),
        };
        if let Some(request) = outcome.scroll {
            debug!("Scrolling to {}", request.top);
            self.scroll(request.top);
        }
        outcome
    }

    pub fn scroll(&mut self, scroll_y: f64) {
        self.doc.set_scroll_y(scroll_y);
        if let Some(nav) = self.navigation.as_ref() {
            nav.handle_scroll(&mut self.doc);
        }
        if let Some(animations) = self.animations.as_ref() {
            animations.handle_scroll(&mut self.doc);
        }
        self.poll_visibility();
    }

    pub fn resize(&mut self, viewport_height: f64) {
        self.doc.set_viewport_height(viewport_height);
        self.poll_visibility();
    }

    pub fn blur(&mut self, target: NodeId) {
        if let Some(contact) = self.contact.as_ref() {
            contact.handle_blur(&mut self.doc, target);
        }
    }

    /// The visitor typed into `target`, leaving `value` in it.
    pub fn input(&mut self, target: NodeId, value: &str) {
        self.doc.set_value(target, value);
        if let Some(contact) = self.contact.as_ref() {
            contact.handle_input(&mut self.doc, target);
        }
    }

    /// Submit the contact form and wait for the backend.
    pub async fn submit_contact_form(&mut self) -> SubmitOutcome {
        match self.contact.as_mut() {
            Some(contact) => contact.submit(&mut self.doc, self.clock.as_ref()).await,
            None => SubmitOutcome::Ignored,
        }
    }

    /// Start a submission without waiting: returns the pending backend
    /// call, or `None` when validation failed or one is already in flight.
    pub fn begin_contact_submission(
        &mut self,
    ) -> Option<BoxFuture<'static, Result<(), SubmitError>>> {
        let contact = self.contact.as_mut()?;
        let data = contact.begin_submission(&mut self.doc, self.clock.now_ms())?;
        Some(contact.backend().submit(data))
    }

    pub fn complete_contact_submission(&mut self, result: Result<(), SubmitError>) -> SubmitOutcome {
        match self.contact.as_mut() {
            Some(contact) => contact.complete_submission(&mut self.doc, result, self.clock.now_ms()),
            None => SubmitOutcome::Ignored,
        }
    }

    /// Run due notification timers and the next animation frame at the
    /// clock's current time.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        if let Some(contact) = self.contact.as_mut() {
            contact.run_timers(&mut self.doc, now);
        }
        if let Some(animations) = self.animations.as_mut() {
            animations.run_frame(&mut self.doc, now);
        }
    }

    /// Whether a timer or animation frame is still queued.
    pub fn has_pending_work(&self) -> bool {
        let timers = self
            .contact
            .as_ref()
            .map(ContactForm::has_pending_timers)
            .unwrap_or(false);
        let frames = self
            .animations
            .as_ref()
            .map(ScrollAnimations::is_animating)
            .unwrap_or(false);
        timers || frames
    }

    pub fn set_page_hidden(&mut self, hidden: bool) {
        let body = self.doc.body();
        self.doc.set_class_present(body, "page-hidden", hidden);
    }

    /// Window `load`: register the service worker when one is available.
    pub async fn on_load(&self) -> Option<Registration> {
        let registrar = self.service_worker.as_ref()?;
        service_worker::register(registrar.as_ref(), &self.config.service_worker_script).await
    }

    fn poll_visibility(&mut self) {
        if let Some(animations) = self.animations.as_mut() {
            animations.handle_visibility(&mut self.doc);
        }
        if let Some(resources) = self.resources.as_mut() {
            resources.handle_visibility(&mut self.doc);
        }
    }
}
