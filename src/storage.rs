//! Session storage for carrying commands across a redirect.
//!
//! The preserver only needs a tiny key/value surface from the host's session
//! mechanism, so this module defines it as the object-safe [`StorageArea`]
//! trait. A [`SessionStore`] hands out one area per [`SessionId`]; areas of
//! different sessions never see each other's keys.
//!
//! # Available types
//!
//! - [`SessionId`] — Identifies one user session.
//! - [`StorageArea`] — Trait for any key/value backend scoped to one session.
//! - [`SessionStore`] — Trait for a backend that provisions areas per session.
//! - [`InMemorySessionStore`] — In-memory session storage backend.
//!
//! # Example: binding a session to a request
//!
//! ```rust
//! use std::sync::Arc;
//! use gaq::config::{Environment, RenderConfig};
//! use gaq::context::RequestContext;
//! use gaq::storage::{InMemorySessionStore, SessionId, SessionStore};
//!
//! let store = InMemorySessionStore::new();
//! let session = SessionId::new();
//!
//! let mut ctx = RequestContext::new(Arc::new(RenderConfig::default()), Environment::Test);
//! ctx.bind_session(store.area(session));
//! ```
//!
//! Hosts with their own session mechanism (cookies, a database, a framework
//! session) implement [`StorageArea`] directly on top of it.

use std::fmt::Display;
use uuid::Uuid;

/// Storage area module, defining the key/value storage interface.
pub mod area;

/// Session storage module, providing in-memory session storage.
pub mod session {
    /// In-memory session storage implementation.
    pub mod in_memory;
}

pub use area::{SessionStore, StorageArea};
pub use session::in_memory::InMemorySessionStore;

/// A unique identifier for a session, represented as a UUID.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SessionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
