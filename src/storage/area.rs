use super::SessionId;
use anyhow::Result;
use std::sync::Arc;

/// Object-safe key/value storage area scoped to one session.
pub trait StorageArea: Send + Sync {
    /// Retrieves the value associated with the given key, or `None` if not found.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Sets the value for the given key, overwriting any existing value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the item with the given key.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Clears all items in the storage area.
    fn clear(&self) -> Result<()>;

    /// Returns the number of items in the storage area.
    fn len(&self) -> usize;

    /// Returns true when the storage area holds no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a vector of all keys in the storage area.
    fn keys(&self) -> Vec<String>;
}

/// Store for session-scoped areas (isolated per session).
pub trait SessionStore: Send + Sync {
    /// Retrieves the storage area for the given session, creating it if needed.
    fn area(&self, session: SessionId) -> Arc<dyn StorageArea>;

    /// Drops all storage for the given session.
    fn drop_session(&self, session: SessionId);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemorySessionStore;

    fn set(area: &Arc<dyn StorageArea>, k: &str, v: &str) {
        area.set_item(k, v).unwrap();
    }

    #[test]
    fn storagearea_basic_contract() {
        let store = InMemorySessionStore::new();
        let area = store.area(SessionId::new());

        // starts empty
        assert!(area.is_empty());
        assert!(area.get_item("missing").is_none());

        // set + get
        set(&area, "a", "1");
        set(&area, "b", "2");
        assert_eq!(area.len(), 2);
        assert_eq!(area.get_item("a").as_deref(), Some("1"));

        // overwrite keeps len()
        set(&area, "a", "ONE");
        assert_eq!(area.len(), 2);
        assert_eq!(area.get_item("a").as_deref(), Some("ONE"));

        // remove, also of a missing key
        area.remove_item("b").unwrap();
        area.remove_item("b").unwrap();
        assert_eq!(area.len(), 1);
        assert!(area.get_item("b").is_none());

        // clear
        area.clear().unwrap();
        assert!(area.is_empty());
        assert!(area.keys().is_empty());
    }
}
