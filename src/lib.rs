//! Analytics command queue with snippet rendering and redirect preservation.
//!
//! A [`RequestContext`](context::RequestContext) collects tracking commands
//! while a request is handled, renders them into the asynchronous tracking
//! `<script>` snippet once per response, and carries them through session
//! storage when the response is a redirect instead.

pub mod catalog;
pub mod command;
pub mod config;
pub mod context;
pub mod errors;
pub mod preserve;
pub mod queue;
pub mod snippet;
pub mod storage;

pub use command::{Argument, Command};
pub use config::{Environment, RenderConfig};
pub use context::RequestContext;
pub use errors::{CommandError, ConfigError, PreserveError};
pub use queue::CommandQueue;
pub use snippet::{MarkupSink, Snippet};
