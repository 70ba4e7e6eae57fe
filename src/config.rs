//! Render configuration.
//!
//! [`RenderConfig`] holds what the host application knows about its tracking
//! setup: the tracking ID, an optional list of default commands that replaces
//! the built-in `_setAccount` + `_trackPageview` pair, and a debug flag that
//! selects the debug loader. Every field is optional; an all-empty config means
//! the integration is not configured and no snippet is rendered.
//!
//! # Examples
//!
//! ## Customize with the builder
//! ```rust
//! use gaq::config::RenderConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = RenderConfig::builder()
//!     .tracking_id("UA-12345-1")
//!     .debug_enabled(true)
//!     .build()?; // returns Result<RenderConfig, ConfigError>
//! assert!(cfg.is_configured());
//! # Ok(()) }
//! ```
//!
//! ## Load from JSON
//! ```rust
//! use gaq::config::RenderConfig;
//! let cfg = RenderConfig::from_json_str(
//!     r#"{"default_commands": [["_setAccount", "UA-1"], ["_setDomainName", "example.com"], ["_trackPageview"]]}"#,
//! ).unwrap();
//! assert_eq!(cfg.default_commands.as_ref().map(|d| d.len()), Some(3));
//! ```

use crate::command::Command;
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Environment variable consulted by [`Environment::detect`].
pub const ENVIRONMENT_VAR: &str = "GAQ_ENV";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Tracking ID used for the synthesized `_setAccount` command
    pub tracking_id: Option<String>,
    /// Commands rendered ahead of the request's queue. Replaces the synthesized defaults.
    pub default_commands: Option<Vec<Command>>,
    /// Reference the debug loader even outside development
    pub debug_enabled: bool,
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: RenderConfig = serde_json::from_str(s)?;
        validate(&cfg)?;
        Ok(cfg)
    }

    /// True when either a tracking ID or default commands are set.
    pub fn is_configured(&self) -> bool {
        self.tracking_id.is_some() || self.default_commands.is_some()
    }
}

/// Builder for [`RenderConfig`], mirroring the other config builders.
#[derive(Debug, Clone, Default)]
pub struct RenderConfigBuilder {
    inner: RenderConfig,
}

impl RenderConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut RenderConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn tracking_id<S: Into<String>>(self, id: S) -> Self { self.map(|c| c.tracking_id = Some(id.into())) }
    pub fn default_commands(self, cmds: Vec<Command>) -> Self { self.map(|c| c.default_commands = Some(cmds)) }
    pub fn default_command(self, cmd: Command) -> Self {
        self.map(|c| c.default_commands.get_or_insert_with(Vec::new).push(cmd))
    }
    pub fn debug_enabled(self, on: bool) -> Self { self.map(|c| c.debug_enabled = on) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut RenderConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<RenderConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

fn validate(c: &RenderConfig) -> Result<(), ConfigError> {
    if let Some(id) = &c.tracking_id {
        if id.trim().is_empty() {
            return Err(ConfigError::BlankTrackingId);
        }
    }
    if let Some(defaults) = &c.default_commands {
        if defaults.is_empty() {
            return Err(ConfigError::EmptyDefaults);
        }
    }
    Ok(())
}

/// Runtime environment of the host application. Only consulted to pick the
/// debug loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    #[default]
    Production,
}

impl Environment {
    /// Reads [`ENVIRONMENT_VAR`]. Unset or unknown values fall back to production.
    pub fn detect() -> Self {
        match std::env::var(ENVIRONMENT_VAR) {
            Ok(v) => v.parse().unwrap_or_else(|e| {
                log::warn!("gaq: {e}, assuming production");
                Environment::Production
            }),
            Err(_) => Environment::Production,
        }
    }

    #[inline]
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Test => "test",
            Environment::Production => "production",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Argument;

    #[test]
    fn default_config_is_unconfigured() {
        let cfg = RenderConfig::default();
        assert!(!cfg.is_configured());
        assert!(!cfg.debug_enabled);
    }

    #[test]
    fn builder_sets_fields() {
        let cfg = RenderConfig::builder()
            .tracking_id("UA-1")
            .default_command(Command::new("_setAccount", ["UA-1"]))
            .default_command(Command::bare("_trackPageview"))
            .debug_enabled(true)
            .build()
            .unwrap();

        assert_eq!(cfg.tracking_id.as_deref(), Some("UA-1"));
        assert_eq!(cfg.default_commands.as_ref().map(Vec::len), Some(2));
        assert!(cfg.debug_enabled);
    }

    #[test]
    fn builder_rejects_blank_id_and_empty_defaults() {
        assert!(matches!(
            RenderConfig::builder().tracking_id("  ").build(),
            Err(ConfigError::BlankTrackingId)
        ));
        assert!(matches!(
            RenderConfig::builder().default_commands(vec![]).build(),
            Err(ConfigError::EmptyDefaults)
        ));
    }

    #[test]
    fn json_fields_are_all_optional() {
        let cfg = RenderConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, RenderConfig::default());

        let cfg = RenderConfig::from_json_str(r#"{"tracking_id": "UA-9", "debug_enabled": true}"#).unwrap();
        assert_eq!(cfg.tracking_id.as_deref(), Some("UA-9"));
        assert!(cfg.debug_enabled);
        assert!(cfg.default_commands.is_none());
    }

    #[test]
    fn json_default_commands_use_array_form() {
        let cfg = RenderConfig::from_json_str(
            r#"{"default_commands": [["_setAccount", "UA-2"], ["_trackPageview", null]]}"#,
        )
        .unwrap();
        let defaults = cfg.default_commands.unwrap();
        assert_eq!(defaults[0].name(), "_setAccount");
        assert_eq!(defaults[1].args(), &[Argument::Omitted]);
    }

    #[test]
    fn json_errors_are_reported() {
        assert!(matches!(RenderConfig::from_json_str("not json"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            RenderConfig::from_json_str(r#"{"default_commands": []}"#),
            Err(ConfigError::EmptyDefaults)
        ));
    }

    // Only test touching GAQ_ENV, so the sequence below cannot race.
    #[test]
    fn environment_detection_from_variable() {
        std::env::set_var(ENVIRONMENT_VAR, "development");
        assert_eq!(Environment::detect(), Environment::Development);

        std::env::set_var(ENVIRONMENT_VAR, "test");
        assert_eq!(Environment::detect(), Environment::Test);

        std::env::set_var(ENVIRONMENT_VAR, "staging");
        assert_eq!(Environment::detect(), Environment::Production);

        std::env::remove_var(ENVIRONMENT_VAR);
        assert_eq!(Environment::detect(), Environment::Production);
    }

    #[test]
    fn environment_parsing() {
        assert_eq!("development".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!(" Dev ".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("test".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!("PRODUCTION".parse::<Environment>().unwrap(), Environment::Production);
        assert!(matches!(
            "staging".parse::<Environment>(),
            Err(ConfigError::UnknownEnvironment(s)) if s == "staging"
        ));
        assert!(Environment::Development.is_development());
        assert!(!Environment::Test.is_development());
        assert_eq!(Environment::default(), Environment::Production);
    }
}
