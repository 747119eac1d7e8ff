//! Unit script parsing.
//!
//! One directive per line; `#` starts a comment.
//!
//! ```text
//! # app/mod.unit
//! load app.config
//! try load ujson          # optional, failure is handled
//! sleep 15ms
//! fail ValueError missing configuration
//! ```

use loadtime_host::LoadError;
use std::time::Duration;

const DURATION_HINT: &str = "expected e.g. 5ms, 200us, 1s";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Load a unit; its failure fails this unit too
    Load(String),
    /// Load a unit; its failure is handled and execution continues
    TryLoad(String),
    /// Spend wall time
    Sleep(Duration),
    /// Raise a failure
    Fail { kind: String, message: String },
}

/// A directive with its 1-based line number.
pub type Line = (usize, Directive);

/// Parse a whole script up front, so syntax errors surface before any effect.
///
/// # Errors
/// [`LoadError::Syntax`] for the first malformed line.
pub fn parse_script(unit: &str, text: &str) -> Result<Vec<Line>, LoadError> {
    let mut directives = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let content = raw.split_once('#').map_or(raw, |(code, _)| code).trim();
        if content.is_empty() {
            continue;
        }
        let directive = parse_directive(content).map_err(|message| LoadError::Syntax {
            unit: unit.to_owned(),
            line,
            message,
        })?;
        directives.push((line, directive));
    }
    Ok(directives)
}

fn parse_directive(content: &str) -> Result<Directive, String> {
    let mut words = content.split_whitespace();
    let keyword = words.next().unwrap_or_default();
    let rest: Vec<&str> = words.collect();

    match (keyword, rest.as_slice()) {
        ("load", [name]) => unit_name(name).map(Directive::Load),
        ("try", ["load", name]) => unit_name(name).map(Directive::TryLoad),
        ("sleep", [amount]) => parse_duration(amount)
            .map(Directive::Sleep)
            .ok_or_else(|| format!("invalid duration '{amount}' ({DURATION_HINT})")),
        ("fail", [kind, message @ ..]) => Ok(Directive::Fail {
            kind: (*kind).to_owned(),
            message: message.join(" "),
        }),
        ("load" | "sleep", _) => Err(format!("'{keyword}' takes exactly one argument")),
        ("try", _) => Err("expected 'try load <unit>'".to_owned()),
        ("fail", []) => Err("'fail' needs an error kind".to_owned()),
        _ => Err(format!("unknown directive '{keyword}'")),
    }
}

fn unit_name(name: &str) -> Result<String, String> {
    if is_unit_name(name) {
        Ok(name.to_owned())
    } else {
        Err(format!("invalid unit name '{name}'"))
    }
}

/// Whether `name` is a dotted path of identifier segments.
#[must_use]
pub fn is_unit_name(name: &str) -> bool {
    name.split('.').all(is_segment)
}

fn is_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.chars().all(is_name_char)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn parse_duration(amount: &str) -> Option<Duration> {
    let (number, unit) = amount
        .strip_suffix("ms")
        .map(|n| (n, "ms"))
        .or_else(|| amount.strip_suffix("us").map(|n| (n, "us")))
        .or_else(|| amount.strip_suffix('s').map(|n| (n, "s")))?;
    let value: u64 = number.parse().ok()?;
    Some(match unit {
        "ms" => Duration::from_millis(value),
        "us" => Duration::from_micros(value),
        _ => Duration::from_secs(value),
    })
}
