//! Optional background service-worker registration on page load.

use futures::future::BoxFuture;
use tracing::{info, warn};

use crate::error::RegistrationError;

/// A successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub scope: String,
}

pub trait ServiceWorkerRegistrar: Send + Sync {
    fn register(&self, script: &str) -> BoxFuture<'static, Result<Registration, RegistrationError>>;
}

/// Register `script` and log the result. Failure never affects the page.
pub async fn register(registrar: &dyn ServiceWorkerRegistrar, script: &str) -> Option<Registration> {
    match registrar.register(script).await {
        Ok(registration) => {
            info!("Service worker registered with scope {}", registration.scope);
            Some(registration)
        }
        Err(e) => {
            warn!("Service worker registration failed: {}", e);
            None
        }
    }
}
