//! Render memoization.
//!
//! The overlay renderer is a pure function, so finished overlays are safe to
//! reuse for identical inputs. This cache keys on everything that feeds the
//! renderer on the layer path: the frame timestamp and layer identify the
//! grid and mask, and palette and alpha complete the key. Bounded with FIFO
//! eviction; the renderer itself knows nothing about it.

use std::collections::{HashMap, VecDeque};

use parking_lot::RwLock;

use crate::render::RenderedOverlay;

/// Cache key for one rendered overlay.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverlayKey {
    /// Frame timestamp stamp (`YYYYMMDDHHMM`)
    pub stamp: String,
    /// Layer name (`tir`, `cores`)
    pub layer: String,
    /// Palette name actually used
    pub palette: String,
    /// Opacity, bit-exact so the key stays `Eq + Hash`
    alpha_bits: u32,
}

impl OverlayKey {
    pub fn new(stamp: &str, layer: &str, palette: &str, alpha: f32) -> Self {
        Self {
            stamp: stamp.to_string(),
            layer: layer.to_string(),
            palette: palette.to_string(),
            alpha_bits: alpha.to_bits(),
        }
    }
}

struct CacheInner {
    map: HashMap<OverlayKey, RenderedOverlay>,
    order: VecDeque<OverlayKey>,
}

/// Bounded FIFO cache of finished overlays.
pub struct RenderCache {
    capacity: usize,
    inner: RwLock<CacheInner>,
}

impl RenderCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(CacheInner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Fetch a cached overlay. The payload is `Bytes`-backed, so the clone is
    /// a reference-count bump, not a pixel copy.
    pub fn get(&self, key: &OverlayKey) -> Option<RenderedOverlay> {
        self.inner.read().map.get(key).cloned()
    }

    /// Insert an overlay, evicting the oldest entry when full.
    pub fn insert(&self, key: OverlayKey, overlay: RenderedOverlay) {
        let mut inner = self.inner.write();
        if inner.map.contains_key(&key) {
            inner.map.insert(key, overlay);
            return;
        }
        while inner.map.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.map.remove(&oldest);
            } else {
                break;
            }
        }
        inner.order.push_back(key.clone());
        inner.map.insert(key, overlay);
    }

    /// Number of cached overlays.
    pub fn len(&self) -> usize {
        self.inner.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn overlay(tag: u8) -> RenderedOverlay {
        RenderedOverlay {
            png: Bytes::from(vec![tag]),
            min: 0.0,
            max: 1.0,
        }
    }

    #[test]
    fn test_get_and_insert() {
        let cache = RenderCache::new(4);
        let key = OverlayKey::new("200401011200", "tir", "plasma", 1.0);

        assert!(cache.get(&key).is_none());
        cache.insert(key.clone(), overlay(1));
        assert_eq!(cache.get(&key).unwrap().png, Bytes::from(vec![1]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_alpha_participates_in_key() {
        let cache = RenderCache::new(4);
        let opaque = OverlayKey::new("200401011200", "tir", "plasma", 1.0);
        let faint = OverlayKey::new("200401011200", "tir", "plasma", 0.5);

        cache.insert(opaque.clone(), overlay(1));
        assert!(cache.get(&faint).is_none());
        assert!(cache.get(&opaque).is_some());
    }

    #[test]
    fn test_fifo_eviction() {
        let cache = RenderCache::new(2);
        let k1 = OverlayKey::new("200401011200", "tir", "plasma", 1.0);
        let k2 = OverlayKey::new("200401011215", "tir", "plasma", 1.0);
        let k3 = OverlayKey::new("200401011230", "tir", "plasma", 1.0);

        cache.insert(k1.clone(), overlay(1));
        cache.insert(k2.clone(), overlay(2));
        cache.insert(k3.clone(), overlay(3));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&k1).is_none(), "oldest entry evicted first");
        assert!(cache.get(&k2).is_some());
        assert!(cache.get(&k3).is_some());
    }

    #[test]
    fn test_reinsert_same_key_does_not_grow() {
        let cache = RenderCache::new(2);
        let key = OverlayKey::new("200401011200", "cores", "viridis", 1.0);

        cache.insert(key.clone(), overlay(1));
        cache.insert(key.clone(), overlay(2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key).unwrap().png, Bytes::from(vec![2]));
    }
}
