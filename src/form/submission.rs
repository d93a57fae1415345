//! Submission seam for the contact form.

use std::collections::BTreeMap;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::SiteConfig;
use crate::error::SubmitError;

/// Named field values collected from the form, later fields overriding
/// earlier ones with the same name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormData {
    fields: BTreeMap<String, String>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Accepts a validated field set and resolves to success or a typed failure.
pub trait SubmissionBackend: Send + Sync {
    fn submit(&self, data: FormData) -> BoxFuture<'static, Result<(), SubmitError>>;
}

/// Stand-in backend: waits, then succeeds with a fixed probability.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
    success_rate: f64,
}

impl SimulatedBackend {
    pub fn new(delay: Duration, success_rate: f64) -> Self {
        Self {
            delay,
            success_rate: success_rate.clamp(0.0, 1.0),
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        Self::new(config.submit_delay, config.submit_success_rate)
    }

    pub fn always_succeed(delay: Duration) -> Self {
        Self::new(delay, 1.0)
    }

    pub fn always_fail(delay: Duration) -> Self {
        Self::new(delay, 0.0)
    }

    pub fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

impl SubmissionBackend for SimulatedBackend {
    fn submit(&self, data: FormData) -> BoxFuture<'static, Result<(), SubmitError>> {
        let delay = self.delay;
        let success_rate = self.success_rate;
        async move {
            tokio::time::sleep(delay).await;
            if unit_draw() < success_rate {
                match serde_json::to_string(&data) {
                    Ok(json) => info!("Form submitted: {}", json),
                    Err(e) => warn!("Form submitted, payload not serializable: {}", e),
                }
                Ok(())
            } else {
                Err(SubmitError::Network("simulated network failure".to_string()))
            }
        }
        .boxed()
    }
}

/// Uniform draw in [0, 1).
fn unit_draw() -> f64 {
    let mut buf = [0u8; 4];
    if let Err(e) = getrandom::getrandom(&mut buf) {
        warn!("Entropy source unavailable, assuming success: {}", e);
        return 0.0;
    }
    f64::from(u32::from_le_bytes(buf)) / (f64::from(u32::MAX) + 1.0)
}
