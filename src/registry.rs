//! Target security service (TSS) configurations keyed by ORB id.
//!
//! The registry belongs to the component that owns the ORBs; it is not a
//! process-wide static. Registration and removal follow ORB startup and
//! shutdown, and lookups happen on connection threads.

use std::collections::HashMap;
use std::string::String;
use std::sync::{Arc, PoisonError, RwLock};

/// Concurrent `orb_id -> config` map.
///
/// The last registration for an ORB id wins; there is no ordering between
/// threads beyond that.
#[derive(Debug)]
pub struct TssConfigRegistry<C> {
    configs: RwLock<HashMap<String, Arc<C>>>,
}

impl<C> Default for TssConfigRegistry<C> {
    fn default() -> Self {
        Self {
            configs: RwLock::new(HashMap::new()),
        }
    }
}

impl<C> TssConfigRegistry<C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `config` with `orb_id`, returning the configuration it replaces.
    pub fn register(&self, orb_id: impl Into<String>, config: C) -> Option<Arc<C>> {
        let orb_id = orb_id.into();
        log::trace!("registering TSS configuration for ORB {}", orb_id);
        self.configs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(orb_id, Arc::new(config))
    }

    /// Configuration registered for `orb_id`.
    pub fn get(&self, orb_id: &str) -> Option<Arc<C>> {
        self.configs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(orb_id)
            .cloned()
    }

    /// Removes and returns the configuration registered for `orb_id`.
    pub fn unregister(&self, orb_id: &str) -> Option<Arc<C>> {
        log::trace!("unregistering TSS configuration for ORB {}", orb_id);
        self.configs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(orb_id)
    }

    /// Number of registered ORBs.
    pub fn len(&self) -> usize {
        self.configs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no ORB has a configuration registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn register_lookup_remove() {
        let registry = TssConfigRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register("orb-1", "first").is_none());
        assert_eq!(registry.get("orb-1").as_deref(), Some(&"first"));

        let previous = registry.register("orb-1", "second").unwrap();
        assert_eq!(*previous, "first");
        assert_eq!(registry.get("orb-1").as_deref(), Some(&"second"));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.unregister("orb-1").as_deref(), Some(&"second"));
        assert!(registry.get("orb-1").is_none());
        assert!(registry.unregister("orb-1").is_none());
    }

    #[test]
    fn concurrent_access() {
        let registry = Arc::new(TssConfigRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let orb_id = format!("orb-{}", i);
                    registry.register(orb_id.clone(), i);
                    assert_eq!(registry.get(&orb_id).as_deref(), Some(&i));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(registry.len(), 8);
    }
}
