//! Snippet rendering.
//!
//! [`render`] turns the pending queue into the tracking `<script>` element: the
//! queue array literal assigned to the global `_gaq`, followed by a bootstrap
//! that asynchronously injects the loader script. The queue is drained first,
//! whether or not anything ends up being rendered, so an unconfigured
//! integration never accumulates commands across requests.

use crate::command::literal;
use crate::command::Command;
use crate::config::{Environment, RenderConfig};
use crate::queue::CommandQueue;
use std::fmt;

/// Global variable the queue literal is assigned to.
pub const QUEUE_VAR: &str = "_gaq";
/// Loader used in production.
pub const PRODUCTION_LOADER: &str = "ga.js";
/// Loader used in development or when debugging is enabled.
pub const DEBUG_LOADER: &str = "u/ga_debug.js";

/// Rendered `<script>` markup.
///
/// The content is already valid markup and must be embedded as-is: write it
/// through [`Snippet::write_to`] or [`Snippet::as_raw_html`], never through an
/// HTML-escaping sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    html: String,
    loader: &'static str,
}

impl Snippet {
    /// The pre-escaped markup.
    pub fn as_raw_html(&self) -> &str {
        &self.html
    }

    pub fn into_raw_html(self) -> String {
        self.html
    }

    /// Loader file the snippet references.
    pub fn loader(&self) -> &'static str {
        self.loader
    }

    /// Hands the markup to a raw output sink.
    pub fn write_to<S: MarkupSink + ?Sized>(&self, sink: &mut S) {
        sink.push_raw(&self.html);
    }
}

impl fmt::Display for Snippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

/// Output sink accepting markup that must not be escaped again.
pub trait MarkupSink {
    fn push_raw(&mut self, markup: &str);
}

impl MarkupSink for String {
    fn push_raw(&mut self, markup: &str) {
        self.push_str(markup);
    }
}

/// Renders the pending queue into a snippet.
///
/// Returns `None` when neither a tracking ID nor default commands are
/// configured. The queue is empty afterwards in every case; calling this twice
/// for one response would render an empty queue the second time.
pub fn render(queue: &mut CommandQueue, config: &RenderConfig, env: Environment) -> Option<Snippet> {
    let pending = queue.snapshot_and_clear();

    if !config.is_configured() {
        log::debug!(
            "gaq: tracking not configured, dropping {} queued command(s)",
            pending.len()
        );
        return None;
    }

    let defaults = default_commands(config);
    let array = literal::encode_queue(defaults.iter().chain(pending.iter()));
    let loader = loader_for(config, env);

    log::debug!(
        "gaq: rendering {} default and {} queued command(s) with loader {}",
        defaults.len(),
        pending.len(),
        loader
    );

    Some(Snippet {
        html: script(&array, loader),
        loader,
    })
}

/// Configured default commands, or `_setAccount` + `_trackPageview`.
pub fn default_commands(config: &RenderConfig) -> Vec<Command> {
    match (&config.default_commands, &config.tracking_id) {
        (Some(defaults), _) => defaults.clone(),
        (None, Some(id)) => vec![
            Command::new("_setAccount", [id.as_str()]),
            Command::bare("_trackPageview"),
        ],
        (None, None) => Vec::new(),
    }
}

/// Picks the loader file for the environment and debug flag.
pub fn loader_for(config: &RenderConfig, env: Environment) -> &'static str {
    if env.is_development() || config.debug_enabled {
        DEBUG_LOADER
    } else {
        PRODUCTION_LOADER
    }
}

fn script(array: &str, loader: &str) -> String {
    format!(
        "<script>var {QUEUE_VAR}={array};\
         (function(d,t){{var g=d.createElement(t),s=d.getElementsByTagName(t)[0];\
         g.async=true;\
         g.src=('https:'==location.protocol?'//ssl':'//www')+'.google-analytics.com/{loader}';\
         s.parentNode.insertBefore(g,s)}}(document,'script'));</script>"
    )
}
