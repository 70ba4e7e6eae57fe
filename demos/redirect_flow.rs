//! Walks two requests of one session: the first records an event and
//! redirects, the second restores it and renders the snippet.
//!
//! Run with `RUST_LOG=debug` to see the queue being preserved and restored.

use gaq::catalog;
use gaq::config::{Environment, RenderConfig};
use gaq::context::RequestContext;
use gaq::storage::{InMemorySessionStore, SessionId, SessionStore};
use std::error::Error;
use std::sync::Arc;
use url::Url;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let config = Arc::new(
        RenderConfig::builder()
            .tracking_id("UA-12345-1")
            .build()?,
    );
    let environment = Environment::detect();

    let sessions = InMemorySessionStore::new();
    let session = SessionId::new();

    // POST /signup: record the conversion, then redirect.
    let mut signup = RequestContext::new(config.clone(), environment);
    signup.bind_session(sessions.area(session));
    signup.restore()?;
    signup.record("_trackEvent", ["Signup", "Submit"])?;
    let response = signup.redirect(&Url::parse("https://example.com/welcome")?)?;
    println!("{} -> {:?}", response.status(), response.headers().get(http::header::LOCATION));

    // GET /welcome: the event recorded before the redirect is rendered here.
    let mut welcome = RequestContext::new(config, environment);
    welcome.bind_session(sessions.area(session));
    welcome.restore()?;
    welcome.push(catalog::set_custom_var(1, "plan", "free", Some(1)));

    let mut page = String::from("<html><head>");
    if let Some(snippet) = welcome.render_snippet() {
        snippet.write_to(&mut page);
    }
    page.push_str("</head><body>Welcome!</body></html>");
    println!("{page}");

    Ok(())
}
