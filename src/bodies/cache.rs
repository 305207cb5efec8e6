//! Per-body memo of heliocentric states, keyed by the exact JDE.
//!
//! The cache lives with an [`Observer`](crate::observers::Observer), never with the bodies, so a
//! [`SolarSystem`](crate::bodies::SolarSystem) stays immutable and shareable across threads.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::bodies::BodyId;
use crate::constants::JDE;
use crate::orbit::StateVector;

/// Entries kept per body before its map is cleared wholesale.
pub const MAX_ENTRIES_PER_BODY: usize = 100;

#[derive(Debug, Default)]
pub struct PositionCache {
    entries: RefCell<HashMap<BodyId, HashMap<u64, StateVector>>>,
}

impl PositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached state of `id` at `jde`, computing and storing it on a miss.
    ///
    /// `compute` may itself query the cache (for ancestors); no borrow is held while it runs.
    pub fn get_or_insert_with<F>(&self, id: BodyId, jde: JDE, compute: F) -> StateVector
    where
        F: FnOnce() -> StateVector,
    {
        let key = jde.to_bits();
        if let Some(hit) = self.entries.borrow().get(&id).and_then(|m| m.get(&key)) {
            return *hit;
        }

        let state = compute();

        let mut entries = self.entries.borrow_mut();
        let per_body = entries.entry(id).or_default();
        if per_body.len() >= MAX_ENTRIES_PER_BODY {
            log::trace!("position cache for body {} full, clearing", id.index());
            per_body.clear();
        }
        per_body.insert(key, state);
        state
    }

    /// Number of states currently held for `id`.
    pub fn len(&self, id: BodyId) -> usize {
        self.entries.borrow().get(&id).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().values().all(HashMap::is_empty)
    }
}

#[cfg(test)]
mod cache_test {
    use super::*;
    use nalgebra::Vector3;
    use std::cell::Cell;

    fn state(x: f64) -> StateVector {
        StateVector::new(Vector3::new(x, 0.0, 0.0), Vector3::zeros())
    }

    #[test]
    fn test_hit_skips_computation() {
        let cache = PositionCache::new();
        let calls = Cell::new(0);
        let id = BodyId(0);
        for _ in 0..3 {
            let s = cache.get_or_insert_with(id, 2_451_545.0, || {
                calls.set(calls.get() + 1);
                state(1.0)
            });
            assert_eq!(s, state(1.0));
        }
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.len(id), 1);
    }

    #[test]
    fn test_bounded_storage() {
        let cache = PositionCache::new();
        let id = BodyId(3);
        for i in 0..=MAX_ENTRIES_PER_BODY {
            cache.get_or_insert_with(id, i as f64, || state(i as f64));
        }
        // the insertion past the bound cleared the map first
        assert_eq!(cache.len(id), 1);
        assert_eq!(cache.len(BodyId(4)), 0);
    }

    #[test]
    fn test_reentrant_compute() {
        let cache = PositionCache::new();
        let parent = BodyId(0);
        let child = BodyId(1);
        let s = cache.get_or_insert_with(child, 1.0, || {
            let p = cache.get_or_insert_with(parent, 1.0, || state(2.0));
            StateVector::new(p.position * 2.0, p.velocity)
        });
        assert_eq!(s, state(4.0));
        assert!(!cache.is_empty());
    }
}
