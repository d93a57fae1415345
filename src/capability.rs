//! Host capabilities the controllers are given instead of reaching for
//! browser globals: preference storage, a clock and a frame scheduler.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::dom::NodeId;
use crate::error::StorageError;

// ==================== Storage ====================

/// Persistent key-value store, the equivalent of `localStorage`.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store. Clones share the same entries, so a test can keep a
/// handle after giving one to a controller.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a JSON object on disk; every write is flushed.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the store at `path`, starting empty when the file does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries: BTreeMap<String, String> = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!("Opened preference store at {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    /// Open the store at `path`, starting empty when the existing file
    /// cannot be read. The next write replaces the unreadable file.
    pub fn open_or_reset(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::open(path) {
            Ok(storage) => storage,
            Err(e) => {
                warn!(
                    "Ignoring unreadable preference store at {}: {}",
                    path.display(),
                    e
                );
                Self {
                    path: path.to_path_buf(),
                    entries: BTreeMap::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut updated = self.entries.clone();
        updated.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(&updated)?)?;
        self.entries = updated;
        Ok(())
    }
}

// ==================== Clock ====================

/// Monotonic milliseconds, the equivalent of `performance.now()`.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by.as_secs_f64() * 1000.0);
    }

    pub fn set_ms(&self, now: f64) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

// ==================== Frames ====================

/// A callback request for the next repaint, keyed by the animated element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest {
    pub target: NodeId,
}

/// The equivalent of `requestAnimationFrame`: requests are collected until
/// the host runs the next frame.
pub trait FrameScheduler {
    fn request_frame(&mut self, request: FrameRequest);

    /// Drain the requests due on the next frame.
    fn take_frame(&mut self) -> Vec<FrameRequest>;

    fn has_pending(&self) -> bool;
}

#[derive(Debug, Default)]
pub struct FrameQueue {
    pending: Vec<FrameRequest>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self, request: FrameRequest) {
        self.pending.push(request);
    }

    fn take_frame(&mut self) -> Vec<FrameRequest> {
        std::mem::take(&mut self.pending)
    }

    fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
