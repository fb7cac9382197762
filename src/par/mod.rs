//! TEMPO-style parameter files
//!
//! A `.par` file holds one parameter per line:
//!
//! ```text
//! PSRJ           J0534+2200
//! F0             29.946923   1   1.2e-10
//! F1             -3.77535D-10
//! EPHVER         5
//! ```
//!
//! Columns are `NAME VALUE [FIT] [ERROR]`. With four columns the third is the
//! fit flag (ignored) and the fourth the uncertainty. With three columns a
//! third token of `0` or `1` is a fit flag and anything else is the
//! uncertainty. Text values (such as sexagesimal `RAJ`) keep their value and
//! drop any uncertainty column. Fortran `D` exponents are accepted.
//!
//! Parsing is behind the [`ParFileParser`] trait so a store can be loaded
//! from any source; [`TempoParser`] is the default implementation.

pub mod writer;

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::{Error, ParameterEntry, ParameterStore, ParameterValue, Result};

/// Largest element index accepted for a vector parameter.
pub const MAX_VECTOR_INDEX: usize = 1024;

/// Default comment markers (checked at the start of a trimmed line).
pub const DEFAULT_COMMENT_PREFIXES: [&str; 2] = ["#", "C "];

/// Source of parsed parameter stores.
pub trait ParFileParser {
    /// Parse parameter file text.
    ///
    /// # Errors
    ///
    /// Returns `Parse` if the text is malformed.
    fn parse_str(&self, text: &str) -> Result<ParameterStore>;

    /// Parse a parameter file from disk.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read, or any error of
    /// [`ParFileParser::parse_str`].
    fn parse_file(&self, path: &Path) -> Result<ParameterStore> {
        let text = std::fs::read_to_string(path)?;
        self.parse_str(&text)
    }
}

/// TEMPO fit flags: `1` to fit the parameter, `0` to hold it fixed.
fn is_fit_flag(token: &str) -> bool {
    matches!(token, "0" | "1")
}

/// Parse a float, accepting Fortran `D` exponents (`1.0D-10`).
#[must_use]
pub fn parse_float(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().or_else(|| {
        if token.contains(['D', 'd']) {
            token.replace(['D', 'd'], "e").parse().ok()
        } else {
            None
        }
    })
}

fn is_integer_literal(token: &str) -> bool {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Type a value column that has no uncertainty.
fn classify_value(token: &str) -> ParameterValue {
    if is_integer_literal(token) {
        if let Some(value) = token
            .parse::<i64>()
            .ok()
            .and_then(|i| ParameterValue::from_integer(i).ok())
        {
            return value;
        }
    }
    parse_float(token).map_or_else(|| ParameterValue::Text(token.to_string()), ParameterValue::Float64)
}

/// One element of a vector parameter being assembled.
#[derive(Debug, Default)]
struct VectorAccumulator {
    values: Vec<f64>,
    errors: Vec<f64>,
    has_error: bool,
}

impl VectorAccumulator {
    fn set(&mut self, index: usize, value: f64, error: Option<f64>) {
        if self.values.len() <= index {
            self.values.resize(index + 1, 0.0);
            self.errors.resize(index + 1, 0.0);
        }
        self.values[index] = value;
        self.errors[index] = error.unwrap_or(0.0);
        self.has_error |= error.is_some();
    }

    fn into_entry(self, name: String) -> Result<ParameterEntry> {
        if self.has_error {
            ParameterEntry::with_error(name, self.values, self.errors)
        } else {
            Ok(ParameterEntry::new(name, self.values))
        }
    }
}

/// Parsed line awaiting insertion, kept in file order.
enum Pending {
    Entry(ParameterEntry),
    Vector(String),
}

/// Default TEMPO parameter file parser.
///
/// ## Configuration
///
/// - `strict`: fail on a malformed line instead of skipping it
/// - `vector_prefix`: gather `PREFIX0`, `PREFIX1`, ... into one vector
///   parameter named `PREFIX`
/// - `comment_prefix`: lines starting with these markers are ignored
#[derive(Debug, Clone)]
pub struct TempoParser {
    strict: bool,
    vector_prefixes: Vec<String>,
    comment_prefixes: Vec<String>,
}

impl Default for TempoParser {
    fn default() -> Self {
        TempoParserBuilder::default().build()
    }
}

impl TempoParser {
    /// Create a new parser builder
    #[must_use]
    pub fn builder() -> TempoParserBuilder {
        TempoParserBuilder::default()
    }

    /// Whether malformed lines are errors.
    #[must_use]
    pub const fn is_strict(&self) -> bool {
        self.strict
    }

    /// Configured vector prefixes.
    #[must_use]
    pub fn vector_prefixes(&self) -> &[String] {
        &self.vector_prefixes
    }

    fn is_comment(&self, line: &str) -> bool {
        self.comment_prefixes
            .iter()
            .any(|prefix| line.starts_with(prefix.as_str()))
    }

    /// Split `F12` into (`F`, 12) when `F` is a configured vector prefix.
    fn vector_slot<'a>(&'a self, name: &str) -> Option<(&'a str, usize)> {
        self.vector_prefixes.iter().find_map(|prefix| {
            let index = name.strip_prefix(prefix.as_str())?;
            if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            index.parse().ok().map(|i| (prefix.as_str(), i))
        })
    }

    /// Report a malformed line: an error when strict, a warning otherwise.
    fn malformed(&self, line: usize, message: String) -> Result<()> {
        if self.strict {
            return Err(Error::Parse { line, message });
        }
        warn!(line, %message, "skipping malformed parameter line");
        Ok(())
    }
}

impl ParFileParser for TempoParser {
    fn parse_str(&self, text: &str) -> Result<ParameterStore> {
        let mut pending: Vec<Pending> = Vec::new();
        let mut vectors: HashMap<String, VectorAccumulator> = HashMap::new();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || self.is_comment(line) {
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            let name = tokens[0].to_ascii_uppercase();
            let Some(&value_token) = tokens.get(1) else {
                self.malformed(line_no, format!("parameter '{name}' has no value"))?;
                continue;
            };
            let error_token = match tokens.len() {
                2 => None,
                3 if is_fit_flag(tokens[2]) => None,
                3 => Some(tokens[2]),
                _ => Some(tokens[3]),
            };

            let error = match error_token.map(|t| (t, parse_float(t))) {
                None => None,
                Some((_, Some(e))) => Some(e),
                Some((t, None)) => {
                    self.malformed(
                        line_no,
                        format!("error value '{t}' of '{name}' is not a number"),
                    )?;
                    continue;
                }
            };

            if let Some((prefix, index)) = self.vector_slot(&name) {
                let Some(value) = parse_float(value_token) else {
                    self.malformed(
                        line_no,
                        format!("vector element '{name}' has non-numeric value '{value_token}'"),
                    )?;
                    continue;
                };
                if index > MAX_VECTOR_INDEX {
                    self.malformed(
                        line_no,
                        format!("vector index {index} of '{name}' exceeds {MAX_VECTOR_INDEX}"),
                    )?;
                    continue;
                }
                let acc = vectors.entry(prefix.to_string()).or_insert_with(|| {
                    pending.push(Pending::Vector(prefix.to_string()));
                    VectorAccumulator::default()
                });
                acc.set(index, value, error);
                continue;
            }

            let entry = match (error, parse_float(value_token)) {
                (Some(error), Some(value)) => ParameterEntry::with_error(name, value, error)?,
                (Some(_), None) => {
                    warn!(
                        line = line_no,
                        parameter = %name,
                        "text parameter cannot carry an uncertainty, discarding it"
                    );
                    ParameterEntry::new(name, ParameterValue::Text(value_token.to_string()))
                }
                (None, _) => ParameterEntry::new(name, classify_value(value_token)),
            };
            pending.push(Pending::Entry(entry));
        }

        let store = pending
            .into_iter()
            .map(|item| match item {
                Pending::Entry(entry) => Ok(entry),
                Pending::Vector(name) => vectors
                    .remove(&name)
                    .unwrap_or_default()
                    .into_entry(name),
            })
            .collect::<Result<ParameterStore>>()?;

        debug!(parameters = store.len(), "parsed parameter file");
        Ok(store)
    }
}

/// Builder for [`TempoParser`].
#[derive(Debug, Default)]
pub struct TempoParserBuilder {
    strict: bool,
    vector_prefixes: Vec<String>,
    comment_prefixes: Option<Vec<String>>,
}

impl TempoParserBuilder {
    /// Fail on malformed lines instead of skipping them.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Gather `PREFIX<n>` lines into a vector parameter named `PREFIX`.
    #[must_use]
    pub fn vector_prefix(mut self, prefix: &str) -> Self {
        self.vector_prefixes.push(prefix.to_ascii_uppercase());
        self
    }

    /// Add a comment marker; the first call replaces the defaults.
    #[must_use]
    pub fn comment_prefix(mut self, prefix: &str) -> Self {
        self.comment_prefixes
            .get_or_insert_with(Vec::new)
            .push(prefix.to_string());
        self
    }

    /// Build the parser
    #[must_use]
    pub fn build(self) -> TempoParser {
        TempoParser {
            strict: self.strict,
            vector_prefixes: self.vector_prefixes,
            comment_prefixes: self.comment_prefixes.unwrap_or_else(|| {
                DEFAULT_COMMENT_PREFIXES
                    .iter()
                    .map(ToString::to_string)
                    .collect()
            }),
        }
    }
}
