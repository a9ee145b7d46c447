//! Decode memoization keyed by payload identity.
//!
//! Decoding is a pure function of the payload bytes, so a decoded document
//! can be shared by every item that attaches the same drawing. Concurrent
//! requests for one payload block on a single `OnceCell` and share its
//! result; a failed decode leaves the cell empty so a later call retries.
//!
//! The cache never evicts on its own. Its owner calls
//! [`DecodeCache::prune`] (drop documents nobody else holds) or
//! [`DecodeCache::clear`] when plans are detached.

use crate::document::DrawingDocument;
use crate::error::Result;
use crate::io::dxf::{DxfReader, DxfReaderConfiguration};
use ahash::{AHashMap, RandomState};
use once_cell::sync::OnceCell;
use std::hash::{BuildHasher, Hash, Hasher};
use std::sync::{Arc, Mutex};

/// Identity of a payload: byte length plus a seeded 64-bit hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PayloadKey {
    len: usize,
    hash: u64,
}

impl PayloadKey {
    /// Compute the key of a payload
    pub fn of(bytes: &[u8]) -> Self {
        // Fixed seeds so keys are stable for the life of the process
        let state = RandomState::with_seeds(0x243f_6a88, 0x85a3_08d3, 0x1319_8a2e, 0x0370_7344);
        let mut hasher = state.build_hasher();
        bytes.hash(&mut hasher);
        PayloadKey {
            len: bytes.len(),
            hash: hasher.finish(),
        }
    }
}

type Slot = Arc<OnceCell<Arc<DrawingDocument>>>;

/// Shared cache of decoded drawings
#[derive(Debug, Default)]
pub struct DecodeCache {
    slots: Mutex<AHashMap<PayloadKey, Slot>>,
    config: DxfReaderConfiguration,
}

impl DecodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache whose decodes use the given reader configuration
    pub fn with_configuration(config: DxfReaderConfiguration) -> Self {
        DecodeCache {
            slots: Mutex::new(AHashMap::new()),
            config,
        }
    }

    /// Return the decoded document for `bytes`, decoding at most once
    pub fn get_or_decode(&self, bytes: &[u8]) -> Result<Arc<DrawingDocument>> {
        let key = PayloadKey::of(bytes);
        let slot = self.slot(key);

        let result = slot.get_or_try_init(|| {
            tracing::debug!(len = bytes.len(), "decode cache miss");
            DxfReader::from_bytes(bytes)?
                .with_configuration(self.config.clone())
                .read()
                .map(Arc::new)
        });

        match result {
            Ok(doc) => Ok(Arc::clone(doc)),
            Err(e) => {
                self.evict_empty(key);
                Err(e)
            }
        }
    }

    /// Number of successfully decoded payloads held
    pub fn len(&self) -> usize {
        self.lock().values().filter(|slot| slot.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached document; outstanding `Arc`s stay valid
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Drop documents that only the cache still holds; returns how many
    ///
    /// Slots with a decode in flight are kept.
    pub fn prune(&self) -> usize {
        let mut slots = self.lock();
        let before = slots.len();
        slots.retain(|_, slot| {
            Arc::strong_count(slot) > 1 || slot.get().is_some_and(|doc| Arc::strong_count(doc) > 1)
        });
        let pruned = before - slots.len();
        if pruned > 0 {
            tracing::debug!(pruned, kept = slots.len(), "decode cache pruned");
        }
        pruned
    }

    fn slot(&self, key: PayloadKey) -> Slot {
        let mut slots = self.lock();
        Arc::clone(slots.entry(key).or_default())
    }

    fn evict_empty(&self, key: PayloadKey) {
        let mut slots = self.lock();
        if slots.get(&key).is_some_and(|slot| slot.get().is_none()) {
            slots.remove(&key);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, AHashMap<PayloadKey, Slot>> {
        // A panic while holding the lock cannot leave the map inconsistent
        self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &[u8] = b"0\nSECTION\n2\nENTITIES\n0\nLINE\n10\n0\n20\n0\n11\n1\n21\n1\n0\nENDSEC\n0\nEOF\n";

    #[test]
    fn test_same_payload_shares_document() {
        let cache = DecodeCache::new();
        let a = cache.get_or_decode(LINE).unwrap();
        let b = cache.get_or_decode(LINE).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let cache = DecodeCache::new();
        assert!(cache.get_or_decode(b"0\nSECTION\n").is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_prune_keeps_documents_in_use() {
        const OTHER: &[u8] = b"0\nSECTION\n2\nENTITIES\n0\nCIRCLE\n10\n0\n20\n0\n40\n1\n0\nENDSEC\n0\nEOF\n";
        let cache = DecodeCache::new();
        let held = cache.get_or_decode(LINE).unwrap();
        drop(cache.get_or_decode(OTHER).unwrap());
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.prune(), 1);
        assert_eq!(cache.len(), 1);
        assert!(Arc::ptr_eq(&held, &cache.get_or_decode(LINE).unwrap()));

        drop(held);
        assert_eq!(cache.prune(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_key_distinguishes_payloads() {
        assert_eq!(PayloadKey::of(LINE), PayloadKey::of(LINE));
        assert_ne!(PayloadKey::of(b"abc"), PayloadKey::of(b"abd"));
    }

    #[test]
    fn test_concurrent_requests() {
        let cache = Arc::new(DecodeCache::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || cache.get_or_decode(LINE).unwrap())
            })
            .collect();
        let docs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(docs.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
