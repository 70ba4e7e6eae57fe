//! Catalog of tracking commands.
//!
//! Every command of the asynchronous tracking API is listed once in
//! [`COMMANDS`] with the number of required and optional trailing parameters.
//! [`record`] is the single entry point that turns a name and arguments into a
//! well-formed [`Command`]: it rejects unknown names and wrong argument counts,
//! and pads missing optional parameters with [`Argument::Omitted`] so the
//! positional width of a command never depends on how many optional values the
//! caller supplied.
//!
//! The typed constructors at the bottom cover the commands most pages use and
//! cannot fail.

use crate::command::{Argument, Command};
use crate::errors::CommandError;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// API section a command belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    BasicConfiguration,
    CampaignTracking,
    DomainsAndDirectories,
    Ecommerce,
    EventTracking,
    SearchEngines,
    SocialInteractions,
    WebClient,
    UrchinServer,
}

/// Shape of one command: its name and how many positional parameters it takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub category: Category,
    /// Parameters the caller must always supply
    pub required: usize,
    /// Trailing parameters that become `undefined` when left out
    pub optional: usize,
}

impl CommandSpec {
    const fn new(name: &'static str, category: Category, required: usize, optional: usize) -> Self {
        Self { name, category, required, optional }
    }

    /// Positional width of every command built from this spec.
    #[inline]
    pub fn arity(&self) -> usize {
        self.required + self.optional
    }

    /// Builds a command, padding missing optional parameters with `Omitted`.
    pub fn build<I>(&self, args: I) -> Result<Command, CommandError>
    where
        I: IntoIterator,
        I::Item: Into<Argument>,
    {
        let mut args: Vec<Argument> = args.into_iter().map(Into::into).collect();
        if args.len() < self.required || args.len() > self.arity() {
            return Err(CommandError::ArityMismatch {
                name: self.name,
                min: self.required,
                max: self.arity(),
                got: args.len(),
            });
        }
        args.resize(self.arity(), Argument::Omitted);
        Ok(Command::new(self.name, args))
    }
}

use Category::*;

/// All known commands.
pub static COMMANDS: &[CommandSpec] = &[
    // Basic configuration
    CommandSpec::new("_deleteCustomVar", BasicConfiguration, 1, 0),
    CommandSpec::new("_getName", BasicConfiguration, 0, 0),
    CommandSpec::new("_getAccount", BasicConfiguration, 0, 0),
    CommandSpec::new("_getVersion", BasicConfiguration, 0, 0),
    CommandSpec::new("_getVisitorCustomVar", BasicConfiguration, 1, 0),
    CommandSpec::new("_setAccount", BasicConfiguration, 1, 0),
    CommandSpec::new("_setCustomVar", BasicConfiguration, 3, 1),
    CommandSpec::new("_setSampleRate", BasicConfiguration, 1, 0),
    CommandSpec::new("_setSessionCookieTimeout", BasicConfiguration, 1, 0),
    CommandSpec::new("_setSiteSpeedSampleRate", BasicConfiguration, 1, 0),
    CommandSpec::new("_setVisitorCookieTimeout", BasicConfiguration, 1, 0),
    CommandSpec::new("_trackPageview", BasicConfiguration, 0, 1),
    // Campaign tracking
    CommandSpec::new("_setAllowAnchor", CampaignTracking, 1, 0),
    CommandSpec::new("_setCampContentKey", CampaignTracking, 1, 0),
    CommandSpec::new("_setCampMediumKey", CampaignTracking, 1, 0),
    CommandSpec::new("_setCampNameKey", CampaignTracking, 1, 0),
    CommandSpec::new("_setCampNOKey", CampaignTracking, 1, 0),
    CommandSpec::new("_setCampSourceKey", CampaignTracking, 1, 0),
    CommandSpec::new("_setCampTermKey", CampaignTracking, 1, 0),
    CommandSpec::new("_setCampaignTrack", CampaignTracking, 1, 0),
    CommandSpec::new("_setCampaignCookieTimeout", CampaignTracking, 1, 0),
    CommandSpec::new("_setReferrerOverride", CampaignTracking, 1, 0),
    // Domains & directories
    CommandSpec::new("_cookiePathCopy", DomainsAndDirectories, 1, 0),
    CommandSpec::new("_getLinkerUrl", DomainsAndDirectories, 2, 0),
    CommandSpec::new("_link", DomainsAndDirectories, 2, 0),
    CommandSpec::new("_linkByPost", DomainsAndDirectories, 2, 0),
    CommandSpec::new("_setAllowLinker", DomainsAndDirectories, 1, 0),
    CommandSpec::new("_setCookiePath", DomainsAndDirectories, 1, 0),
    CommandSpec::new("_setDomainName", DomainsAndDirectories, 1, 0),
    // E-commerce
    CommandSpec::new("_addItem", Ecommerce, 6, 0),
    CommandSpec::new("_addTrans", Ecommerce, 8, 0),
    CommandSpec::new("_trackTrans", Ecommerce, 0, 0),
    // Event tracking
    CommandSpec::new("_trackEvent", EventTracking, 2, 2),
    // Search engines and referrers
    CommandSpec::new("_addIgnoredOrganic", SearchEngines, 1, 0),
    CommandSpec::new("_addIgnoredRef", SearchEngines, 1, 0),
    CommandSpec::new("_addOrganic", SearchEngines, 2, 1),
    CommandSpec::new("_clearIgnoredOrganic", SearchEngines, 0, 0),
    CommandSpec::new("_clearIgnoredRef", SearchEngines, 0, 0),
    CommandSpec::new("_clearOrganic", SearchEngines, 0, 0),
    // Social interactions
    CommandSpec::new("_trackSocial", SocialInteractions, 2, 2),
    // Web client
    CommandSpec::new("_getClientInfo", WebClient, 0, 0),
    CommandSpec::new("_getDetectFlash", WebClient, 0, 0),
    CommandSpec::new("_getDetectTitle", WebClient, 0, 0),
    CommandSpec::new("_setClientInfo", WebClient, 1, 0),
    CommandSpec::new("_setDetectFlash", WebClient, 1, 0),
    CommandSpec::new("_setDetectTitle", WebClient, 1, 0),
    // Urchin server
    CommandSpec::new("_getLocalGifPath", UrchinServer, 0, 0),
    CommandSpec::new("_getServiceMode", UrchinServer, 0, 0),
    CommandSpec::new("_setLocalGifPath", UrchinServer, 1, 0),
    CommandSpec::new("_setLocalRemoteServerMode", UrchinServer, 0, 0),
    CommandSpec::new("_setLocalServerMode", UrchinServer, 0, 0),
    CommandSpec::new("_setRemoteServerMode", UrchinServer, 0, 0),
];

lazy_static! {
    static ref INDEX: HashMap<&'static str, &'static CommandSpec> =
        COMMANDS.iter().map(|spec| (spec.name, spec)).collect();
}

/// Looks up a command by name.
pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    INDEX.get(name).copied()
}

/// Builds a command by name, checking the argument count against the catalog.
pub fn record<I>(name: &str, args: I) -> Result<Command, CommandError>
where
    I: IntoIterator,
    I::Item: Into<Argument>,
{
    lookup(name)
        .ok_or_else(|| CommandError::UnknownCommand(name.to_string()))?
        .build(args)
}

/// Commands of one API section, in catalog order.
pub fn in_category(category: Category) -> impl Iterator<Item = &'static CommandSpec> {
    COMMANDS.iter().filter(move |spec| spec.category == category)
}

// ---------- Typed constructors ----------

fn fixed(name: &'static str, args: Vec<Argument>) -> Command {
    Command::new(name, args)
}

pub fn set_account(account_id: &str) -> Command {
    fixed("_setAccount", vec![account_id.into()])
}

pub fn track_pageview(page_url: Option<&str>) -> Command {
    fixed("_trackPageview", vec![page_url.into()])
}

pub fn track_event(category: &str, action: &str, label: Option<&str>, value: Option<i64>) -> Command {
    fixed(
        "_trackEvent",
        vec![category.into(), action.into(), label.into(), value.into()],
    )
}

pub fn set_custom_var(index: u32, name: &str, value: &str, scope: Option<u32>) -> Command {
    fixed(
        "_setCustomVar",
        vec![index.into(), name.into(), value.into(), scope.into()],
    )
}

pub fn track_social(network: &str, action: &str, target: Option<&str>, page_path: Option<&str>) -> Command {
    fixed(
        "_trackSocial",
        vec![network.into(), action.into(), target.into(), page_path.into()],
    )
}

/// A transaction for e-commerce tracking, the argument of `_addTrans`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction<'a> {
    pub order_id: &'a str,
    pub affiliation: &'a str,
    pub total: f64,
    pub tax: f64,
    pub shipping: f64,
    pub city: &'a str,
    pub state: &'a str,
    pub country: &'a str,
}

pub fn add_trans(t: &Transaction<'_>) -> Command {
    fixed(
        "_addTrans",
        vec![
            t.order_id.into(),
            t.affiliation.into(),
            t.total.into(),
            t.tax.into(),
            t.shipping.into(),
            t.city.into(),
            t.state.into(),
            t.country.into(),
        ],
    )
}

/// A line item of a transaction, the argument of `_addItem`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item<'a> {
    pub order_id: &'a str,
    pub sku: &'a str,
    pub name: &'a str,
    pub category: &'a str,
    pub price: f64,
    pub quantity: u32,
}

pub fn add_item(i: &Item<'_>) -> Command {
    fixed(
        "_addItem",
        vec![
            i.order_id.into(),
            i.sku.into(),
            i.name.into(),
            i.category.into(),
            i.price.into(),
            i.quantity.into(),
        ],
    )
}

pub fn track_trans() -> Command {
    fixed("_trackTrans", Vec::new())
}
