use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard};
use anyhow::{anyhow, Result};

use crate::storage::area::{SessionStore, StorageArea};
use crate::storage::SessionId;

type SessionMap = Arc<RwLock<HashMap<SessionId, HashMap<String, String>>>>;

/// In-memory session storage. Data lives as long as the store and is lost on restart.
#[derive(Default)]
pub struct InMemorySessionStore {
    data: SessionMap,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently holding an area.
    pub fn session_count(&self) -> usize {
        read(&self.data).map(|g| g.len()).unwrap_or(0)
    }
}

impl SessionStore for InMemorySessionStore {
    fn area(&self, session: SessionId) -> Arc<dyn StorageArea> {
        if let Ok(mut guard) = self.data.write() {
            guard.entry(session).or_default();
        }

        Arc::new(SessionArea {
            data: Arc::clone(&self.data),
            key: session,
        })
    }

    fn drop_session(&self, session: SessionId) {
        if let Ok(mut guard) = self.data.write() {
            guard.remove(&session);
        }
    }
}

struct SessionArea {
    data: SessionMap,
    key: SessionId,
}

fn poisoned() -> anyhow::Error {
    anyhow!("session storage lock poisoned")
}

/// Read access for the infallible getters. A poisoned lock reads as empty but
/// is logged, so a broken backend does not pass for an empty session.
fn read(data: &SessionMap) -> Option<RwLockReadGuard<'_, HashMap<SessionId, HashMap<String, String>>>> {
    match data.read() {
        Ok(guard) => Some(guard),
        Err(_) => {
            log::warn!("gaq: session storage lock poisoned, reading as empty");
            None
        }
    }
}

impl StorageArea for SessionArea {
    fn get_item(&self, k: &str) -> Option<String> {
        read(&self.data)?
            .get(&self.key)
            .and_then(|m| m.get(k).cloned())
    }

    fn set_item(&self, k: &str, v: &str) -> Result<()> {
        // The session may have been dropped since this area was handed out.
        self.data.write().map_err(|_| poisoned())?
            .entry(self.key)
            .or_default()
            .insert(k.to_string(), v.to_string());
        Ok(())
    }

    fn remove_item(&self, k: &str) -> Result<()> {
        if let Some(m) = self.data.write().map_err(|_| poisoned())?.get_mut(&self.key) {
            m.remove(k);
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.data.write().map_err(|_| poisoned())?
            .insert(self.key, HashMap::new());
        Ok(())
    }

    fn len(&self) -> usize {
        read(&self.data)
            .and_then(|g| g.get(&self.key).map(|m| m.len()))
            .unwrap_or(0)
    }

    fn keys(&self) -> Vec<String> {
        let mut v: Vec<String> = read(&self.data)
            .and_then(|g| g.get(&self.key).map(|m| m.keys().cloned().collect()))
            .unwrap_or_default();
        v.sort_unstable();
        v
    }
}
