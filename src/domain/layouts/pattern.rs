//! Pattern layout driven by a conversion pattern.
//!
//! A conversion specifier has the form `%[-][min][.max]<char>[{arg}]`:
//!
//! | char | output |
//! |------|--------|
//! | `c`  | category name; `{n}` keeps the last `n` dotted components |
//! | `d`  | local date/time; `{...}` is a `time` format description |
//! | `m`  | message |
//! | `n`  | newline |
//! | `p`  | priority name |
//! | `r`  | milliseconds since the layout was created |
//! | `R`  | seconds since the Unix epoch |
//! | `t`  | thread name |
//! | `%`  | a literal `%` |
//!
//! `-` left-aligns within `min` columns; `.max` truncates to `max` characters.

use std::sync::OnceLock;
use std::time::Instant;

use regex::Regex;
use thiserror::Error;
use time::format_description::OwnedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use super::Layout;
use crate::domain::LoggingEvent;

/// Reason a conversion pattern was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("dangling '%' at end of pattern")]
    Dangling,

    #[error("unknown conversion character '{0}'")]
    UnknownConversion(char),

    #[error("invalid category precision '{0}'")]
    CategoryPrecision(String),

    #[error("invalid date format '{format}': {message}")]
    DateFormat { format: String, message: String },

    #[error("field width {0} exceeds 65536")]
    FieldWidth(String),
}

/// Largest `min` or `max` accepted in a specifier.
pub const MAX_FIELD_WIDTH: usize = 64 * 1024;

/// Conversion specifier regex: flags, width, then either a `c`/`d` with an
/// optional brace argument or any other single character.
fn specifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)%(-)?(\d+)?(?:\.(\d+))?(?:([cd])(?:\{([^}]*)\})?|(.))?")
            .expect("conversion specifier regex is valid")
    })
}

#[derive(Debug)]
enum Conversion {
    Category(Option<usize>),
    Date(Option<OwnedFormatItem>),
    Message,
    Newline,
    Priority,
    RelativeMillis,
    UnixSeconds,
    Thread,
}

#[derive(Debug)]
enum Piece {
    Literal(String),
    Field {
        conversion: Conversion,
        left_align: bool,
        min: usize,
        max: Option<usize>,
    },
}

/// Layout that renders events through a conversion pattern.
#[derive(Debug)]
pub struct PatternLayout {
    pattern: String,
    pieces: Vec<Piece>,
    created: Instant,
}

impl PatternLayout {
    /// Parse `pattern` into a layout.
    ///
    /// # Errors
    ///
    /// Returns error if the pattern contains an unknown or malformed specifier.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Ok(Self {
            pattern: pattern.to_string(),
            pieces: parse_pattern(pattern)?,
            created: Instant::now(),
        })
    }

    fn render(&self, conversion: &Conversion, event: &LoggingEvent) -> String {
        match conversion {
            Conversion::Category(None) => event.category.clone(),
            Conversion::Category(Some(n)) => {
                let parts: Vec<&str> = event.category.split('.').collect();
                parts[parts.len().saturating_sub(*n)..].join(".")
            }
            Conversion::Date(format) => {
                let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
                let at = OffsetDateTime::from(event.timestamp).to_offset(offset);
                match format {
                    Some(item) => at.format(item).unwrap_or_default(),
                    None => at
                        .format(format_description!(
                            "[year]-[month]-[day] [hour]:[minute]:[second],[subsecond digits:3]"
                        ))
                        .unwrap_or_default(),
                }
            }
            Conversion::Message => event.message.clone(),
            Conversion::Newline => "\n".to_string(),
            Conversion::Priority => event.priority.name().to_string(),
            Conversion::RelativeMillis => self.created.elapsed().as_millis().to_string(),
            Conversion::UnixSeconds => event.unix_seconds().to_string(),
            Conversion::Thread => event.thread_name.clone(),
        }
    }
}

impl Layout for PatternLayout {
    fn format(&self, event: &LoggingEvent) -> String {
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Field {
                    conversion,
                    left_align,
                    min,
                    max,
                } => {
                    let mut value = self.render(conversion, event);
                    if let Some(max) = max {
                        if let Some((idx, _)) = value.char_indices().nth(*max) {
                            value.truncate(idx);
                        }
                    }
                    let width = *min;
                    if *left_align {
                        out.push_str(&format!("{value:<width$}"));
                    } else {
                        out.push_str(&format!("{value:>width$}"));
                    }
                }
            }
        }
        out
    }

    fn kind(&self) -> &'static str {
        "pattern"
    }

    fn conversion_pattern(&self) -> Option<&str> {
        Some(&self.pattern)
    }
}

fn parse_pattern(pattern: &str) -> Result<Vec<Piece>, PatternError> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut last = 0;

    for caps in specifier_regex().captures_iter(pattern) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        literal.push_str(&pattern[last..whole.start]);
        last = whole.end;

        let left_align = caps.get(1).is_some();
        let min = field_width(caps.get(2))?.unwrap_or(0);
        let max = field_width(caps.get(3))?;

        let conversion = if let Some(c) = caps.get(4) {
            let arg = caps.get(5).map(|m| m.as_str());
            match c.as_str() {
                "c" => Conversion::Category(match arg {
                    None => None,
                    Some(a) => Some(
                        a.parse::<usize>()
                            .ok()
                            .filter(|n| *n > 0)
                            .ok_or_else(|| PatternError::CategoryPrecision(a.to_string()))?,
                    ),
                }),
                _ => Conversion::Date(match arg {
                    None => None,
                    Some(f) => Some(time::format_description::parse_owned::<1>(f).map_err(
                        |e| PatternError::DateFormat {
                            format: f.to_string(),
                            message: e.to_string(),
                        },
                    )?),
                }),
            }
        } else {
            let Some(other) = caps.get(6) else {
                return Err(PatternError::Dangling);
            };
            match other.as_str().chars().next() {
                Some('%') => {
                    literal.push('%');
                    continue;
                }
                Some('m') => Conversion::Message,
                Some('n') => Conversion::Newline,
                Some('p') => Conversion::Priority,
                Some('r') => Conversion::RelativeMillis,
                Some('R') => Conversion::UnixSeconds,
                Some('t') => Conversion::Thread,
                Some(ch) => return Err(PatternError::UnknownConversion(ch)),
                None => return Err(PatternError::Dangling),
            }
        };

        if !literal.is_empty() {
            pieces.push(Piece::Literal(std::mem::take(&mut literal)));
        }
        pieces.push(Piece::Field {
            conversion,
            left_align,
            min,
            max,
        });
    }

    literal.push_str(&pattern[last..]);
    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Ok(pieces)
}

fn field_width(digits: Option<regex::Match<'_>>) -> Result<Option<usize>, PatternError> {
    let Some(digits) = digits else {
        return Ok(None);
    };
    digits
        .as_str()
        .parse::<usize>()
        .ok()
        .filter(|width| *width <= MAX_FIELD_WIDTH)
        .map(Some)
        .ok_or_else(|| PatternError::FieldWidth(digits.as_str().to_string()))
}
