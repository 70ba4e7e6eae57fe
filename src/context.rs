use crate::catalog;
use crate::command::{Argument, Command};
use crate::config::{Environment, RenderConfig};
use crate::errors::{CommandError, PreserveError};
use crate::preserve;
use crate::queue::CommandQueue;
use crate::snippet::{self, Snippet};
use crate::storage::StorageArea;
use http::header::LOCATION;
use http::{Response, StatusCode};
use std::sync::Arc;
use url::Url;

/// Tracking state dedicated to a single request.
///
/// Each request gets its own context holding a fresh queue. The configuration
/// is shared between requests; the session storage area is bound per request
/// by the host once it knows the session.
///
/// Typical request lifecycle:
/// 1. [`restore`](Self::restore) right after binding the session, before
///    anything is recorded, so commands carried over a redirect come first.
/// 2. [`record`](Self::record) / [`push`](Self::push) while handling.
/// 3. Either [`render_snippet`](Self::render_snippet) once while producing the
///    page, or [`redirect`](Self::redirect) (which preserves) instead.
pub struct RequestContext {
    /// Commands recorded during this request
    queue: CommandQueue,
    /// Shared render configuration
    config: Arc<RenderConfig>,
    /// Host environment, used to pick the loader
    environment: Environment,
    /// Session storage used to carry commands across a redirect
    session: Option<Arc<dyn StorageArea>>,
    /// Set once the snippet has been rendered for this response
    rendered: bool,
}

impl RequestContext {
    pub fn new(config: Arc<RenderConfig>, environment: Environment) -> Self {
        Self {
            queue: CommandQueue::new(),
            config,
            environment,
            session: None, // No session unless bound by the host
            rendered: false,
        }
    }

    /// Binds the session storage area of the current session.
    pub fn bind_session(&mut self, area: Arc<dyn StorageArea>) {
        self.session = Some(area);
    }

    pub fn session(&self) -> Option<Arc<dyn StorageArea>> {
        self.session.clone()
    }

    #[inline]
    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[inline]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Pulls commands preserved by the previous request into the queue.
    ///
    /// Must run before the first [`record`](Self::record) of the request for
    /// the restored commands to precede new ones; this is not enforced. Without
    /// a bound session this is a no-op.
    pub fn restore(&mut self) -> Result<usize, PreserveError> {
        match &self.session {
            Some(area) => preserve::restore(&mut self.queue, area.as_ref()),
            None => Ok(0),
        }
    }

    /// Records a catalog command by name.
    pub fn record<I>(&mut self, name: &str, args: I) -> Result<(), CommandError>
    where
        I: IntoIterator,
        I::Item: Into<Argument>,
    {
        let command = catalog::record(name, args)?;
        self.queue.append(command);
        Ok(())
    }

    /// Appends an already built command without consulting the catalog.
    pub fn push(&mut self, command: Command) {
        self.queue.append(command);
    }

    /// Renders the snippet for this response and drains the queue.
    pub fn render_snippet(&mut self) -> Option<Snippet> {
        if self.rendered {
            log::warn!("gaq: snippet rendered more than once for the same response");
        }
        self.rendered = true;
        snippet::render(&mut self.queue, &self.config, self.environment)
    }

    /// Stores pending commands in the bound session for the next request.
    pub fn preserve(&self) -> Result<(), PreserveError> {
        match &self.session {
            Some(area) => preserve::preserve(&self.queue, area.as_ref()),
            None => {
                if !self.queue.is_empty() {
                    log::debug!(
                        "gaq: no session bound, {} command(s) will not survive the redirect",
                        self.queue.len()
                    );
                }
                Ok(())
            }
        }
    }

    /// Preserves pending commands and builds a `302 Found` response to `location`.
    pub fn redirect(&self, location: &Url) -> Result<Response<()>, PreserveError> {
        self.preserve()?;
        let response = Response::builder()
            .status(StatusCode::FOUND)
            .header(LOCATION, location.as_str())
            .body(())?;
        Ok(response)
    }
}
