use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use salon_site::capability::{FileStorage, SystemClock};
use salon_site::config::{HostConfig, SiteConfig};
use salon_site::dom::Selector;
use salon_site::markup::salon_page;
use salon_site::{Capabilities, Site};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("salon_site=info".parse()?),
        )
        .init();

    info!("Starting headless salon site");

    let host = HostConfig::from_env()?;
    let storage = FileStorage::open_or_reset(&host.storage_path);

    let mut page = salon_page();
    page.set_viewport_height(host.viewport_height);

    let capabilities = Capabilities::new(Rc::new(SystemClock::new()))
        .with_storage(storage)
        .with_navigator_language(host.navigator_language.clone());
    let mut site = Site::new(page, capabilities, SiteConfig::default())
        .context("Failed to start the site")?;
    site.on_load().await;

    if let Some(lang) = site.language() {
        info!("Visitor sees the page in {}", lang.name());
    }

    // Step 1: Scroll through the page one viewport at a time
    let page_bottom = site
        .document()
        .element_by_id("contact")
        .map(|contact| site.document().rect(contact).bottom())
        .unwrap_or(0.0);
    let mut scroll_y = 0.0;
    while scroll_y < page_bottom {
        site.scroll(scroll_y);
        run_until_idle(&mut site).await;
        scroll_y += host.viewport_height;
    }

    // Step 2: Fill in and submit the contact form
    for (id, value) in [
        ("name", "Yuki Tanaka"),
        ("email", "yuki@example.com"),
        ("phone", "604-555-1234"),
        ("service", "straightening"),
        ("message", "First visit, looking for a consultation."),
    ] {
        if let Some(field) = site.document().element_by_id(id) {
            site.input(field, value);
            site.blur(field);
        }
    }
    let outcome = site.submit_contact_form().await;
    info!("Contact form outcome: {:?}", outcome);

    // Step 3: Let the notification run its course
    run_until_idle(&mut site).await;
    let banners = site
        .document()
        .query_all(&Selector::class("notification"))
        .len();
    info!("Done ({} notifications left on the page)", banners);
    Ok(())
}

/// Drive frames and timers in real time until nothing is queued.
async fn run_until_idle(site: &mut Site) {
    let mut interval = tokio::time::interval(FRAME_INTERVAL);
    while site.has_pending_work() {
        interval.tick().await;
        site.tick();
    }
}
