use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::context::RecoveryContext;
use crate::error::{ErrorKind, Failure};

/// A recovery handler: runs with the dispatch context and produces the
/// response body. Returning `Err` means the handler itself failed; that
/// failure propagates outward and is not re-dispatched.
pub type RecoveryFn = dyn Fn(&mut RecoveryContext<'_>) -> Result<Value, Failure> + Send + Sync;

/// Shared handle to a registered recovery handler.
pub type RecoveryHandler = Arc<RecoveryFn>;

#[derive(Clone)]
struct Entry {
    kind: &'static ErrorKind,
    handler: RecoveryHandler,
}

/// Ordered mapping from [`ErrorKind`] to recovery handler.
///
/// One registry lives in each [`App`](crate::App) for the life of the
/// process. Registration normally happens during setup, before serving
/// begins, but runtime registration is supported: `register` takes `&self`
/// and publishes atomically, so the registry can be shared across request
/// coroutines behind a plain `Arc`.
pub struct RecoveryRegistry {
    entries: ArcSwap<Vec<Entry>>,
    writer: Mutex<()>,
}

impl Default for RecoveryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RecoveryRegistry {
    #[must_use]
    pub fn new() -> Self {
        RecoveryRegistry {
            entries: ArcSwap::from_pointee(Vec::new()),
            writer: Mutex::new(()),
        }
    }

    /// Store `handler` under `kind`, overwriting any prior handler for that
    /// exact kind. Always succeeds. Replacement keeps the entry's position
    /// in registration order; only the content changes.
    pub fn register<F>(&self, kind: &'static ErrorKind, handler: F)
    where
        F: Fn(&mut RecoveryContext<'_>) -> Result<Value, Failure> + Send + Sync + 'static,
    {
        let handler: RecoveryHandler = Arc::new(handler);
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let current = self.entries.load();
        let mut next: Vec<Entry> = current.iter().cloned().collect();
        match next.iter_mut().find(|entry| entry.kind == kind) {
            Some(entry) => {
                entry.handler = handler;
                warn!(kind = %kind, "Replaced existing recovery handler");
            }
            None => {
                next.push(Entry { kind, handler });
                info!(
                    kind = %kind,
                    total_handlers = next.len(),
                    "Recovery handler registered"
                );
            }
        }
        self.entries.store(Arc::new(next));
    }

    /// Handler registered for exactly `kind`, ignoring ancestry.
    #[must_use]
    pub fn lookup(&self, kind: &'static ErrorKind) -> Option<RecoveryHandler> {
        self.entries
            .load()
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| Arc::clone(&entry.handler))
    }

    /// Most specific handler for `kind`: the walk starts at `kind` itself,
    /// then widens to its parent, grandparent, and so on to the root,
    /// returning the first registered kind found along the way. The whole
    /// walk runs against one snapshot of the registry, so a concurrent
    /// re-registration cannot produce a mixed view.
    #[must_use]
    pub fn resolve(&self, kind: &'static ErrorKind) -> Option<RecoveryHandler> {
        let snapshot = self.entries.load();
        for candidate in kind.ancestry() {
            if let Some(entry) = snapshot.iter().find(|entry| entry.kind == candidate) {
                debug!(
                    kind = %kind,
                    matched_kind = %candidate,
                    "Recovery handler resolved"
                );
                return Some(Arc::clone(&entry.handler));
            }
        }
        debug!(kind = %kind, "No recovery handler in ancestry chain");
        None
    }

    /// Current entries in registration order. Re-registration does not move
    /// an entry, only its handler changes.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static ErrorKind, RecoveryHandler)> {
        self.entries
            .load()
            .iter()
            .map(|entry| (entry.kind, Arc::clone(&entry.handler)))
            .collect()
    }

    /// Names of all registered kinds, in registration order.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.entries
            .load()
            .iter()
            .map(|entry| entry.kind.name())
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}
