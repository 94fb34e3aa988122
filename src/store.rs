//! Order id to symbol directory.
//!
//! Clients identify resting orders only by id, but the router routes by
//! symbol. The transport records the owning symbol when a limit order comes
//! to rest and clears the entry after a successful cancel.

use std::collections::HashMap;
use std::sync::RwLock;

/// Concurrency-safe id -> symbol map (multi-reader, single-writer per key).
#[derive(Debug, Default)]
pub struct SymbolDirectory {
    inner: RwLock<HashMap<String, String>>,
}

impl SymbolDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, order_id: impl Into<String>, symbol: impl Into<String>) {
        self.inner
            .write()
            .expect("lock")
            .insert(order_id.into(), symbol.into());
    }

    /// Resolves an order id to its owning symbol.
    pub fn get(&self, order_id: &str) -> Option<String> {
        self.inner.read().expect("lock").get(order_id).cloned()
    }

    /// Removes an entry. Returns true if it was present.
    pub fn remove(&self, order_id: &str) -> bool {
        self.inner.write().expect("lock").remove(order_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_remove() {
        let dir = SymbolDirectory::new();
        dir.insert("o-1", "ABC");
        assert_eq!(dir.get("o-1").as_deref(), Some("ABC"));
        assert!(dir.remove("o-1"));
        assert!(dir.get("o-1").is_none());
        assert!(!dir.remove("o-1"));
        assert!(dir.is_empty());
    }

    #[test]
    fn insert_overwrites() {
        let dir = SymbolDirectory::new();
        dir.insert("o-1", "ABC");
        dir.insert("o-1", "XYZ");
        assert_eq!(dir.get("o-1").as_deref(), Some("XYZ"));
        assert_eq!(dir.len(), 1);
    }
}
