//! Time-based caching of generated documents

use crate::{error::OpenApiResult, specification::OpenApiSpec};
use parking_lot::RwLock;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// A generated document and the moment it stops being fresh
#[derive(Debug)]
struct CacheEntry {
    spec: Arc<OpenApiSpec>,
    /// `None` when the TTL reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(spec: OpenApiSpec, ttl: Duration) -> Self {
        Self {
            spec: Arc::new(spec),
            expires_at: Instant::now().checked_add(ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.map_or(false, |exp| Instant::now() >= exp)
    }
}

/// Wraps a document producer and reuses its output for `ttl`.
///
/// A zero TTL regenerates on every call. Producer errors are returned to the
/// caller and leave the slot empty.
///
/// The producer runs synchronously under the write lock; async callers
/// should reach it through a blocking task (the documentation router does).
pub struct CachedDocument<F> {
    producer: F,
    ttl: Duration,
    slot: RwLock<Option<CacheEntry>>,
}

impl<F> CachedDocument<F>
where
    F: Fn() -> OpenApiResult<OpenApiSpec>,
{
    pub fn new(ttl: Duration, producer: F) -> Self {
        Self {
            producer,
            ttl,
            slot: RwLock::new(None),
        }
    }

    /// A decorator that never keeps a document
    pub fn uncached(producer: F) -> Self {
        Self::new(Duration::ZERO, producer)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached document while fresh, otherwise regenerate it
    pub fn document(&self) -> OpenApiResult<Arc<OpenApiSpec>> {
        if self.ttl.is_zero() {
            return Ok(Arc::new((self.producer)()?));
        }

        if let Some(entry) = self.slot.read().as_ref() {
            if !entry.is_expired() {
                return Ok(Arc::clone(&entry.spec));
            }
        }

        let mut slot = self.slot.write();
        // another caller may have refreshed the slot while we waited
        if let Some(entry) = slot.as_ref() {
            if !entry.is_expired() {
                return Ok(Arc::clone(&entry.spec));
            }
        }

        tracing::debug!("Regenerating cached OpenAPI document");
        *slot = None;
        let entry = CacheEntry::new((self.producer)()?, self.ttl);
        let spec = Arc::clone(&entry.spec);
        *slot = Some(entry);
        Ok(spec)
    }

    /// Drop the cached document so the next call regenerates
    pub fn invalidate(&self) {
        *self.slot.write() = None;
    }
}
