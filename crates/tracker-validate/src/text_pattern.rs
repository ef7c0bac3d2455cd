//! Text-pattern grammar for generated attribute values.
//!
//! A pattern is a `+`-separated list of segments:
//!
//! ```text
//! "CASE-" + ORG_UNIT_CODE(...) + "-" + CURRENT_DATE(yyyy) + "-" + SEQUENTIAL(####)
//! ```
//!
//! Generated values are checked by compiling the pattern to an anchored
//! regular expression. Compiled patterns are cached per pattern string.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::error::ServiceError;
use crate::services::TextPatternService;

#[derive(Debug, Error)]
pub enum TextPatternError {
    #[error("text pattern is empty")]
    Empty,

    #[error("unterminated literal in text pattern")]
    UnterminatedLiteral,

    #[error("unknown text pattern segment `{0}`")]
    UnknownSegment(String),

    #[error("invalid format `{format}` for segment {segment}")]
    InvalidFormat {
        segment: &'static str,
        format: String,
    },

    #[error("failed to compile text pattern: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    /// Zero-padded counter, one `#` per digit.
    Sequential(usize),
    /// `X` upper-case letter, `x` lower-case letter, `#` digit, `*` any of them.
    Random(String),
    /// Leading characters of the owner's organisation unit code.
    OrgUnitCode(usize),
    /// Date rendered with a `yyyy`/`MM`/`dd`/`HH`/`mm`/`ss` format.
    CurrentDate(String),
}

impl Segment {
    fn parse(source: &str) -> Result<Self, TextPatternError> {
        if let Some(quoted) = source.strip_prefix('"') {
            let literal = quoted
                .strip_suffix('"')
                .ok_or(TextPatternError::UnterminatedLiteral)?;
            return Ok(Segment::Literal(literal.replace("\\\"", "\"")));
        }

        let (name, format) = source
            .strip_suffix(')')
            .and_then(|body| body.split_once('('))
            .ok_or_else(|| TextPatternError::UnknownSegment(source.to_string()))?;
        let invalid = |segment: &'static str| TextPatternError::InvalidFormat {
            segment,
            format: format.to_string(),
        };

        match name.trim() {
            "SEQUENTIAL" => {
                if format.is_empty() || !format.chars().all(|c| c == '#') {
                    return Err(invalid("SEQUENTIAL"));
                }
                Ok(Segment::Sequential(format.len()))
            }
            "RANDOM" => {
                if format.is_empty() || !format.chars().all(|c| matches!(c, 'X' | 'x' | '#' | '*'))
                {
                    return Err(invalid("RANDOM"));
                }
                Ok(Segment::Random(format.to_string()))
            }
            "ORG_UNIT_CODE" => {
                if format.is_empty() || !format.chars().all(|c| c == '.') {
                    return Err(invalid("ORG_UNIT_CODE"));
                }
                Ok(Segment::OrgUnitCode(format.len()))
            }
            "CURRENT_DATE" => {
                let known = |c: char| matches!(c, 'y' | 'M' | 'd' | 'H' | 'm' | 's');
                if format.is_empty()
                    || format
                        .chars()
                        .any(|c| c.is_ascii_alphabetic() && !known(c))
                {
                    return Err(invalid("CURRENT_DATE"));
                }
                Ok(Segment::CurrentDate(format.to_string()))
            }
            _ => Err(TextPatternError::UnknownSegment(source.to_string())),
        }
    }

    fn write_regex(&self, out: &mut String) {
        match self {
            Segment::Literal(text) => out.push_str(&regex::escape(text)),
            Segment::Sequential(width) => out.push_str(&format!(r"\d{{{width}}}")),
            Segment::Random(format) => {
                for c in format.chars() {
                    out.push_str(match c {
                        'X' => "[A-Z]",
                        'x' => "[a-z]",
                        '#' => r"\d",
                        _ => "[A-Za-z0-9]",
                    });
                }
            }
            Segment::OrgUnitCode(width) => out.push_str(&format!(r"[^\s]{{{width}}}")),
            Segment::CurrentDate(format) => {
                let mut chars = format.chars().peekable();
                while let Some(c) = chars.next() {
                    if c.is_ascii_alphabetic() {
                        let mut run = 1;
                        while chars.next_if_eq(&c).is_some() {
                            run += 1;
                        }
                        out.push_str(&format!(r"\d{{{run}}}"));
                    } else {
                        out.push_str(&regex::escape(&c.to_string()));
                    }
                }
            }
        }
    }
}

/// A parsed text pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPattern {
    segments: Vec<Segment>,
}

impl TextPattern {
    pub fn parse(pattern: &str) -> Result<Self, TextPatternError> {
        let segments = split_segments(pattern)?
            .into_iter()
            .map(Segment::parse)
            .collect::<Result<Vec<_>, _>>()?;
        if segments.is_empty() {
            return Err(TextPatternError::Empty);
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether values can only come from a generator.
    pub fn is_generated(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Sequential(_) | Segment::Random(_)))
    }

    /// Anchored regular expression matching every value the pattern can produce.
    pub fn to_regex(&self) -> Result<Regex, TextPatternError> {
        let mut source = String::from("^");
        for segment in &self.segments {
            segment.write_regex(&mut source);
        }
        source.push('$');
        Ok(Regex::new(&source)?)
    }
}

/// Split on `+` outside of quoted literals and parentheses.
fn split_segments(pattern: &str) -> Result<Vec<&str>, TextPatternError> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut depth = 0usize;

    for (index, c) in pattern.char_indices() {
        if in_quotes {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quotes = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '+' if depth == 0 => {
                segments.push(pattern[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    if in_quotes {
        return Err(TextPatternError::UnterminatedLiteral);
    }

    let last = pattern[start..].trim();
    if !last.is_empty() || !segments.is_empty() {
        segments.push(last);
    }
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(TextPatternError::UnknownSegment(String::new()));
    }
    Ok(segments)
}

/// [`TextPatternService`] backed by compiled regular expressions and an
/// in-memory reservation registry.
#[derive(Debug, Default)]
pub struct RegexTextPatternService {
    compiled: RwLock<HashMap<String, Option<Arc<Regex>>>>,
    reservations: HashSet<(String, String)>,
}

impl RegexTextPatternService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `value` for `pattern` so it is accepted even if it no longer
    /// matches the grammar.
    pub fn reserve(&mut self, pattern: impl Into<String>, value: impl Into<String>) {
        self.reservations.insert((pattern.into(), value.into()));
    }

    #[must_use]
    pub fn with_reservations<I, P, V>(mut self, reservations: I) -> Self
    where
        I: IntoIterator<Item = (P, V)>,
        P: Into<String>,
        V: Into<String>,
    {
        for (pattern, value) in reservations {
            self.reserve(pattern, value);
        }
        self
    }

    fn regex_for(&self, pattern: &str) -> Option<Arc<Regex>> {
        if let Some(cached) = self
            .compiled
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pattern)
        {
            return cached.clone();
        }

        let compiled = match TextPattern::parse(pattern).and_then(|parsed| parsed.to_regex()) {
            Ok(regex) => Some(Arc::new(regex)),
            Err(error) => {
                warn!(pattern, %error, "unusable text pattern");
                None
            }
        };
        self.compiled
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pattern.to_string(), compiled.clone());
        compiled
    }
}

impl TextPatternService for RegexTextPatternService {
    fn validate_pattern(&self, pattern: &str, value: &str) -> bool {
        self.regex_for(pattern)
            .is_some_and(|regex| regex.is_match(value))
    }

    fn is_reserved(&self, pattern: &str, value: &str) -> Result<bool, ServiceError> {
        Ok(self
            .reservations
            .contains(&(pattern.to_string(), value.to_string())))
    }
}
