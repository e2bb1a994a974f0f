//! Short-lived cache for deterministic Gemini responses.
//!
//! Only requests at or below a temperature cutoff are eligible. Entries expire
//! a fixed time after insertion and are dropped lazily when a lookup finds
//! them stale. A capacity cap evicts the least-recently-inserted entry.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

/// Default time-to-live for cached responses.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default maximum number of cached responses.
pub const DEFAULT_CAPACITY: usize = 100;

/// Requests with a temperature above this never touch the cache.
pub const DEFAULT_TEMPERATURE_CUTOFF: f32 = 0.3;

/// Fingerprint of one exact generation request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derive a key from every parameter that influences the response.
    ///
    /// The temperature is hashed by its bit pattern so formatting can never
    /// make two different values collide.
    pub fn new(prompt: &str, model: &str, temperature: f32, max_output_tokens: u32) -> Self {
        let mut h = Sha256::new();
        h.update(model.as_bytes());
        h.update(b"\n");
        h.update(temperature.to_bits().to_be_bytes());
        h.update(b"\n");
        h.update(max_output_tokens.to_be_bytes());
        h.update(b"\n");
        h.update(prompt.as_bytes());
        Self(format!("{:x}", h.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cached response and the instant it stops being valid.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub response: String,
    pub expires_at: Instant,
    /// Insertion order, used to pick the eviction victim.
    seq: u64,
}

impl CacheEntry {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<CacheKey, CacheEntry>,
    next_seq: u64,
}

/// Thread-safe response cache. Cloning shares the underlying store.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    capacity: usize,
    temperature_cutoff: f32,
    entries: Arc<Mutex<Entries>>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TEMPERATURE_CUTOFF)
    }
}

impl ResponseCache {
    pub fn new(capacity: usize, temperature_cutoff: f32) -> Self {
        Self {
            capacity: capacity.max(1),
            temperature_cutoff,
            entries: Arc::new(Mutex::new(Entries::default())),
        }
    }

    /// Whether a request at this temperature may read or write the cache.
    pub fn is_eligible(&self, temperature: f32) -> bool {
        temperature <= self.temperature_cutoff
    }

    pub fn temperature_cutoff(&self) -> f32 {
        self.temperature_cutoff
    }

    /// Look up a response. A stale entry counts as a miss and is removed.
    pub fn get(&self, key: &CacheKey) -> Option<String> {
        let mut entries = self.lock()?;
        let now = Instant::now();
        let entry = entries.map.get(key)?;
        if !entry.is_expired(now) {
            return Some(entry.response.clone());
        }
        entries.map.remove(key);
        tracing::debug!(key = %key, "cache entry expired");
        None
    }

    /// Store a response valid for `ttl` from now.
    ///
    /// Re-inserting an existing key replaces it and refreshes its position in
    /// the eviction order.
    pub fn insert(&self, key: CacheKey, response: String, ttl: Duration) {
        let Some(mut entries) = self.lock() else {
            return;
        };
        let now = Instant::now();
        let seq = entries.next_seq;
        entries.next_seq += 1;

        let expires_at = now.checked_add(ttl).unwrap_or(now);
        entries.map.insert(
            key,
            CacheEntry {
                response,
                expires_at,
                seq,
            },
        );

        while entries.map.len() > self.capacity {
            let oldest = entries
                .map
                .iter()
                .min_by_key(|(_, e)| e.seq)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(k) => {
                    entries.map.remove(&k);
                    tracing::debug!(key = %k, "cache evicted oldest entry");
                }
                None => break,
            }
        }
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let Some(mut entries) = self.lock() else {
            return 0;
        };
        let now = Instant::now();
        let before = entries.map.len();
        entries.map.retain(|_, e| !e.is_expired(now));
        before - entries.map.len()
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.lock().map(|e| e.map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Some(mut entries) = self.lock() {
            entries.map.clear();
        }
    }

    /// Cache failures never reach the caller: a poisoned lock reads as a miss.
    fn lock(&self) -> Option<MutexGuard<'_, Entries>> {
        match self.entries.lock() {
            Ok(guard) => Some(guard),
            Err(e) => {
                tracing::warn!("response cache lock poisoned, bypassing cache: {}", e);
                None
            }
        }
    }
}
