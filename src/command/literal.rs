use super::{Argument, Command};

/// Token emitted for [`Argument::Omitted`].
pub const UNDEFINED: &str = "undefined";

/// Encodes an argument as a script literal.
///
/// Strings are double-quoted and escaped for a single JS string literal,
/// numbers and booleans are written bare and an omitted argument becomes the
/// bare `undefined` identifier.
pub fn encode(arg: &Argument) -> String {
    match arg {
        Argument::String(s) => encode_str(s),
        Argument::Number(n) => encode_number(*n),
        Argument::Boolean(b) => b.to_string(),
        Argument::Omitted => UNDEFINED.to_string(),
    }
}

/// Encodes a whole command as an array literal: `["_trackEvent","A","B"]`.
pub fn encode_command(cmd: &Command) -> String {
    let mut out = String::with_capacity(cmd.name().len() + 2 + cmd.args().len() * 8);
    out.push('[');
    out.push_str(&encode_str(cmd.name()));
    for arg in cmd.args() {
        out.push(',');
        out.push_str(&encode(arg));
    }
    out.push(']');
    out
}

/// Encodes a list of commands as the queue array literal: `[[...],[...]]`.
pub fn encode_queue<'a, I>(commands: I) -> String
where
    I: IntoIterator<Item = &'a Command>,
{
    let mut out = String::from("[");
    for (i, cmd) in commands.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&encode_command(cmd));
    }
    out.push(']');
    out
}

/// Double-quoted JS string literal.
///
/// `<` is written as `\u003c` so a value can never close the surrounding
/// `<script>` element or open an HTML comment inside it.
pub fn encode_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '<' => out.push_str("\\u003c"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Canonical JS number text. `f64`'s `Display` already drops the fraction of
/// integral values (`1`, not `1.0`); non-finite values need JS spellings.
pub fn encode_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else if n == 0.0 && n.is_sign_negative() {
        "-0".to_string()
    } else {
        n.to_string()
    }
}
