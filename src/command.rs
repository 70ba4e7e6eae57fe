//! Command model: [`Argument`] and [`Command`].
//!
//! A command is one entry of the tracking queue: a name such as `_trackEvent`
//! followed by positional arguments. Optional parameters the caller left out
//! are kept as [`Argument::Omitted`] so every command of the same name has the
//! same positional width, and the literal encoder can emit the bare
//! `undefined` identifier for them.
//!
//! Both types have a JSON form used by configuration files and preserved
//! snapshots: `["_trackEvent", "Videos", "Play", null]`, with `null` standing
//! for an omitted argument. Numbers JSON cannot represent (`NaN`, the
//! infinities, negative zero) are written as `{"n": "Infinity"}` and friends.

use serde::de::{self, MapAccess, SeqAccess, Unexpected, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Literal encoder for arguments and commands.
pub mod literal;

/// A single positional argument of a command.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    String(String),
    Number(f64),
    Boolean(bool),
    /// Parameter deliberately left out. Encodes as the bare `undefined` token,
    /// never as the string `"undefined"`.
    Omitted,
}

impl Argument {
    #[inline]
    pub fn is_omitted(&self) -> bool {
        matches!(self, Argument::Omitted)
    }

    /// Returns the script-literal form of this argument.
    pub fn to_literal(&self) -> String {
        literal::encode(self)
    }
}

impl From<&str> for Argument {
    fn from(s: &str) -> Self {
        Argument::String(s.to_string())
    }
}

impl From<String> for Argument {
    fn from(s: String) -> Self {
        Argument::String(s)
    }
}

impl From<&String> for Argument {
    fn from(s: &String) -> Self {
        Argument::String(s.clone())
    }
}

impl From<bool> for Argument {
    fn from(b: bool) -> Self {
        Argument::Boolean(b)
    }
}

impl From<f64> for Argument {
    fn from(n: f64) -> Self {
        Argument::Number(n)
    }
}

impl From<f32> for Argument {
    fn from(n: f32) -> Self {
        Argument::Number(f64::from(n))
    }
}

impl From<i32> for Argument {
    fn from(n: i32) -> Self {
        Argument::Number(f64::from(n))
    }
}

impl From<u32> for Argument {
    fn from(n: u32) -> Self {
        Argument::Number(f64::from(n))
    }
}

impl From<i64> for Argument {
    fn from(n: i64) -> Self {
        Argument::Number(n as f64)
    }
}

impl From<u64> for Argument {
    fn from(n: u64) -> Self {
        Argument::Number(n as f64)
    }
}

impl From<usize> for Argument {
    fn from(n: usize) -> Self {
        Argument::Number(n as f64)
    }
}

/// `None` becomes [`Argument::Omitted`].
impl<T: Into<Argument>> From<Option<T>> for Argument {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Argument::Omitted)
    }
}

impl Serialize for Argument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Argument::String(s) => serializer.serialize_str(s),
            Argument::Number(n) if !n.is_finite() || (*n == 0.0 && n.is_sign_negative()) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(SPECIAL_NUMBER_KEY, &literal::encode_number(*n))?;
                map.end()
            }
            // Keep integral numbers integral in the stored JSON.
            Argument::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
                serializer.serialize_i64(*n as i64)
            }
            Argument::Number(n) => serializer.serialize_f64(*n),
            Argument::Boolean(b) => serializer.serialize_bool(*b),
            Argument::Omitted => serializer.serialize_none(),
        }
    }
}

/// Key of the object form used for numbers without a JSON representation.
const SPECIAL_NUMBER_KEY: &str = "n";

struct ArgumentVisitor;

impl<'de> Visitor<'de> for ArgumentVisitor {
    type Value = Argument;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean, null or {\"n\": <special number>}")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Argument, E> {
        Ok(Argument::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Argument, E> {
        Ok(Argument::String(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Argument, E> {
        Ok(Argument::Boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Argument, E> {
        Ok(Argument::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Argument, E> {
        Ok(Argument::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Argument, E> {
        Ok(Argument::Number(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Argument, E> {
        Ok(Argument::Omitted)
    }

    fn visit_none<E: de::Error>(self) -> Result<Argument, E> {
        Ok(Argument::Omitted)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Argument, A::Error> {
        let (key, value): (String, String) = map
            .next_entry()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        if key != SPECIAL_NUMBER_KEY {
            return Err(de::Error::unknown_field(&key, &[SPECIAL_NUMBER_KEY]));
        }
        if map.next_entry::<de::IgnoredAny, de::IgnoredAny>()?.is_some() {
            return Err(de::Error::invalid_length(2, &self));
        }
        let n = match value.as_str() {
            "NaN" => f64::NAN,
            "Infinity" => f64::INFINITY,
            "-Infinity" => f64::NEG_INFINITY,
            "-0" => -0.0,
            other => return Err(de::Error::invalid_value(Unexpected::Str(other), &self)),
        };
        Ok(Argument::Number(n))
    }
}

impl<'de> Deserialize<'de> for Argument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ArgumentVisitor)
    }
}

/// A named tracking command with its positional arguments.
///
/// Commands are immutable once constructed. The queue and the renderer treat
/// them as opaque name + arguments tuples; arity is only checked when a
/// command is built through the [catalog](crate::catalog).
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    name: String,
    args: Vec<Argument>,
}

impl Command {
    pub fn new<N, I>(name: N, args: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator,
        I::Item: Into<Argument>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A command without arguments, e.g. `["_trackTrans"]`.
    pub fn bare<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    /// Returns the script array literal, e.g. `["_trackEvent","A","B"]`.
    pub fn to_literal(&self) -> String {
        literal::encode_command(self)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.args.len() + 1))?;
        seq.serialize_element(&self.name)?;
        for arg in &self.args {
            seq.serialize_element(arg)?;
        }
        seq.end()
    }
}

struct CommandVisitor;

impl<'de> Visitor<'de> for CommandVisitor {
    type Value = Command;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array starting with a command name")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Command, A::Error> {
        let name: String = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let mut args = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(arg) = seq.next_element::<Argument>()? {
            args.push(arg);
        }
        Ok(Command { name, args })
    }
}

impl<'de> Deserialize<'de> for Command {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(CommandVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_none_maps_to_omitted() {
        let none: Option<&str> = None;
        assert_eq!(Argument::from(none), Argument::Omitted);
        assert_eq!(Argument::from(Some("x")), Argument::String("x".into()));
        assert_eq!(Argument::from(Some(3)), Argument::Number(3.0));
    }

    #[test]
    fn command_keeps_argument_order() {
        let cmd = Command::new("_trackEvent", ["Videos", "Play"]);
        assert_eq!(cmd.name(), "_trackEvent");
        assert_eq!(
            cmd.args(),
            &[Argument::from("Videos"), Argument::from("Play")]
        );
    }

    #[test]
    fn command_json_form_uses_null_for_omitted() {
        let cmd = Command::new(
            "_trackEvent",
            vec![
                Argument::from("A"),
                Argument::from("B"),
                Argument::Omitted,
                Argument::from(42),
            ],
        );
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(json, r#"["_trackEvent","A","B",null,42]"#);

        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cmd);
    }

    #[test]
    fn omitted_and_undefined_string_stay_distinct_in_json() {
        let cmd = Command::new(
            "_trackPageview",
            vec![Argument::Omitted, Argument::from("undefined")],
        );
        let back: Command = serde_json::from_str(&serde_json::to_string(&cmd).unwrap()).unwrap();
        assert_eq!(back.args()[0], Argument::Omitted);
        assert_eq!(back.args()[1], Argument::String("undefined".into()));
    }

    #[test]
    fn fractional_numbers_and_booleans_from_json() {
        let cmd: Command = serde_json::from_str(r#"["_setSampleRate", 12.5, true]"#).unwrap();
        assert_eq!(cmd.args(), &[Argument::Number(12.5), Argument::Boolean(true)]);
    }

    #[test]
    fn special_numbers_use_the_object_form() {
        let cmd = Command::new(
            "_setSampleRate",
            vec![
                Argument::Number(f64::INFINITY),
                Argument::Number(f64::NEG_INFINITY),
                Argument::Number(f64::NAN),
                Argument::Number(-0.0),
                Argument::Number(0.0),
            ],
        );
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(
            json,
            r#"["_setSampleRate",{"n":"Infinity"},{"n":"-Infinity"},{"n":"NaN"},{"n":"-0"},0]"#
        );

        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_literal(), cmd.to_literal());
        assert!(matches!(back.args()[3], Argument::Number(z) if z == 0.0 && z.is_sign_negative()));
    }

    #[test]
    fn malformed_number_objects_are_rejected() {
        assert!(serde_json::from_str::<Argument>(r#"{"n": "Huge"}"#).is_err());
        assert!(serde_json::from_str::<Argument>(r#"{"n": "NaN", "m": 1}"#).is_err());
        assert!(serde_json::from_str::<Argument>("{}").is_err());
    }

    #[test]
    fn empty_or_unnamed_arrays_are_rejected() {
        assert!(serde_json::from_str::<Command>("[]").is_err());
        assert!(serde_json::from_str::<Command>("[1, 2]").is_err());
        assert!(serde_json::from_str::<Command>(r#"["_link", {"a": 1}]"#).is_err());
    }
}
