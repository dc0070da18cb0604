#![forbid(unsafe_code)]

//! Structured inline styles.
//!
//! A [`StyleMap`] is an ordered mapping from CSS property name to value.
//! Inserting an existing property replaces its value in place, so layering a
//! caller's overrides on top of defaults keeps the defaults' order (the same
//! result as spreading one object literal over another).
//!
//! [`StyleMap::to_declaration_block`] serializes property by property and
//! rejects anything that could escape its declaration: `;`, `{` and `}`
//! outside quotes, unbalanced quotes, control characters, and non-finite
//! numbers. [`StyleMap::parse`] reads a `style` attribute back.
//!
//! # Invariants
//!
//! 1. `parse(to_declaration_block(m))` yields the same properties in the same
//!    order, with numbers turned into their string form.
//! 2. Serialization never emits a trailing separator.

use std::fmt;
use std::time::Duration;

use indexmap::IndexMap;

/// Errors produced while serializing a [`StyleMap`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CssError {
    /// The property name is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid CSS property name {0:?}")]
    InvalidProperty(String),
    /// The value would break out of its declaration.
    #[error("invalid value for CSS property {property:?}: {reason}")]
    InvalidValue {
        property: String,
        reason: &'static str,
    },
}

/// A single CSS value: text or a number.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum StyleValue {
    Str(String),
    Num(f64),
}

impl StyleValue {
    /// Text of the value as it appears in a declaration.
    pub fn to_css(&self) -> String {
        match self {
            Self::Str(s) => s.trim().to_owned(),
            Self::Num(n) => format_number(*n),
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Num(value)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        Self::Num(f64::from(value))
    }
}

impl From<u32> for StyleValue {
    fn from(value: u32) -> Self {
        Self::Num(f64::from(value))
    }
}

/// Format a number the way CSS expects it: no trailing `.0`, no `-0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_owned();
    }
    format!("{n}")
}

/// Format a pixel length (`12px`).
pub fn px(n: f64) -> String {
    format!("{}px", format_number(n))
}

/// Ordered CSS property map.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StyleMap {
    entries: IndexMap<String, StyleValue>,
}

impl StyleMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StyleMap::insert`].
    #[must_use]
    pub fn with(mut self, property: impl Into<String>, value: impl Into<StyleValue>) -> Self {
        self.insert(property, value);
        self
    }

    /// Set a property, replacing an existing value in place.
    pub fn insert(&mut self, property: impl Into<String>, value: impl Into<StyleValue>) {
        self.entries.insert(property.into(), value.into());
    }

    /// Layer `other` on top of `self`.
    pub fn extend(&mut self, other: &StyleMap) {
        for (property, value) in &other.entries {
            self.entries.insert(property.clone(), value.clone());
        }
    }

    /// Builder form of [`StyleMap::extend`].
    #[must_use]
    pub fn merged(mut self, other: &StyleMap) -> Self {
        self.extend(other);
        self
    }

    pub fn get(&self, property: &str) -> Option<&StyleValue> {
        self.entries.get(property)
    }

    /// Remove a property, keeping the order of the rest.
    pub fn remove(&mut self, property: &str) -> Option<StyleValue> {
        self.entries.shift_remove(property)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Validate every declaration and return `(property, value)` pairs as text.
    pub fn declarations(&self) -> Result<Vec<(String, String)>, CssError> {
        self.entries
            .iter()
            .map(|(property, value)| {
                validate_property(property)?;
                let text = validate_value(property, value)?;
                Ok((property.trim().to_owned(), text))
            })
            .collect()
    }

    /// Serialize to a declaration block: `a: 1; b: red`.
    pub fn to_declaration_block(&self) -> Result<String, CssError> {
        let parts = self
            .declarations()?
            .into_iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>();
        Ok(parts.join("; "))
    }

    /// Parse a declaration block (such as a `style` attribute).
    ///
    /// Parsing is lenient: declarations without a `:` or with an empty name are
    /// skipped. Values are kept as text.
    pub fn parse(block: &str) -> Self {
        let mut map = Self::new();
        for declaration in split_outside_quotes(block, ';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim();
            if property.is_empty() {
                continue;
            }
            map.insert(property, value.trim());
        }
        map
    }
}

impl<K: Into<String>, V: Into<StyleValue>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

fn validate_property(property: &str) -> Result<(), CssError> {
    let name = property.trim();
    let body = name.strip_prefix("--").unwrap_or(name);
    let valid = !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        && (name.starts_with("--") || !body.starts_with(|c: char| c.is_ascii_digit()));
    if valid {
        Ok(())
    } else {
        Err(CssError::InvalidProperty(property.to_owned()))
    }
}

fn validate_value(property: &str, value: &StyleValue) -> Result<String, CssError> {
    let invalid = |reason| CssError::InvalidValue {
        property: property.to_owned(),
        reason,
    };
    if let StyleValue::Num(n) = value {
        if !n.is_finite() {
            return Err(invalid("number is not finite"));
        }
        return Ok(format_number(*n));
    }
    let text = value.to_css();
    let mut quote: Option<char> = None;
    for c in text.chars() {
        if c.is_control() {
            return Err(invalid("control character"));
        }
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, ';' | '{' | '}') => return Err(invalid("declaration delimiter outside quotes")),
            (None, _) => {}
        }
    }
    if quote.is_some() {
        return Err(invalid("unbalanced quote"));
    }
    Ok(text)
}

fn split_outside_quotes(input: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, c) if c == separator && depth == 0 => {
                parts.push(&input[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Parse a single CSS time (`0.3s`, `250ms`).
pub fn parse_time(token: &str) -> Option<Duration> {
    let token = token.trim();
    let (number, scale) = if let Some(ms) = token.strip_suffix("ms") {
        (ms, 0.001)
    } else if let Some(s) = token.strip_suffix('s') {
        (s, 1.0)
    } else {
        return None;
    };
    let secs = number.parse::<f64>().ok()? * scale;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    // Round to whole nanoseconds so `0.3s` is exactly 300ms.
    Some(Duration::from_nanos((secs * 1e9).round() as u64))
}

/// Duration of a `transition` shorthand or `transition-duration` value.
///
/// Returns the first time found in the first transition, which is the
/// duration (the delay always follows it).
pub fn transition_duration(transition: &str) -> Option<Duration> {
    let first = split_outside_quotes(transition, ',').into_iter().next()?;
    first.split_whitespace().find_map(parse_time)
}
