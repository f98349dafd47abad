//! Attribute-relation (ARFF) dataset loading.
//!
//! Supports the dense subset used for connection-record datasets: `%`
//! comments, `@relation`, `@attribute <name> <type>` where the type is a
//! continuous marker (`REAL`, `NUMERIC`, `INTEGER`) or a `{v1,v2,...}`
//! enumeration, `@data`, and comma-separated rows with `?` for missing
//! values. Single or double quotes may wrap names and values.

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::schema::{AttributeSchema, DomainDescriptor, GeneratorTable, DEFAULT_TOLERANCE};
use std::path::Path;
use tracing::debug;

/// Produces a dataset from a file.
pub trait DatasetLoader {
    fn load(&self, path: &Path) -> Result<Dataset>;
}

/// Parsed but unvalidated ARFF contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDataset {
    pub relation: String,
    pub attributes: Vec<(String, DomainDescriptor)>,
    pub rows: Vec<Vec<String>>,
}

/// Loads ARFF files into a [`Dataset`].
#[derive(Debug, Clone)]
pub struct ArffLoader {
    /// Resolves continuous generation ranges by attribute name.
    pub generators: GeneratorTable,
    /// Continuous equality tolerance of the resulting schema.
    pub tolerance: f64,
}

impl Default for ArffLoader {
    fn default() -> Self {
        Self {
            generators: GeneratorTable::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl ArffLoader {
    pub fn new(generators: GeneratorTable, tolerance: f64) -> Self {
        Self {
            generators,
            tolerance,
        }
    }

    /// Parses ARFF text and validates it against the derived schema.
    pub fn parse_str(&self, text: &str) -> Result<Dataset> {
        let raw = parse_arff(text)?;
        debug!(
            relation = %raw.relation,
            attributes = raw.attributes.len(),
            rows = raw.rows.len(),
            "parsed arff"
        );
        let schema = AttributeSchema::from_descriptors(raw.attributes, &self.generators)?
            .with_tolerance(self.tolerance)?;
        Dataset::from_rows(schema, raw.rows)
    }
}

impl DatasetLoader for ArffLoader {
    fn load(&self, path: &Path) -> Result<Dataset> {
        let text = std::fs::read_to_string(path)?;
        self.parse_str(&text)
    }
}

/// Parses ARFF text without interpreting domains.
pub fn parse_arff(text: &str) -> Result<RawDataset> {
    let mut raw = RawDataset::default();
    let mut in_data = false;

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('%') {
            continue;
        }

        if in_data {
            if line.starts_with('{') {
                return Err(Error::Parse {
                    line: line_no,
                    reason: "sparse rows are not supported".into(),
                });
            }
            raw.rows.push(split_fields(line, line_no)?);
            continue;
        }

        let (directive, rest) = split_token(line, line_no)?;
        match directive.to_ascii_lowercase().as_str() {
            "@relation" => raw.relation = split_token(rest, line_no)?.0,
            "@attribute" => {
                let (name, kind) = split_token(rest, line_no)?;
                if kind.is_empty() {
                    return Err(Error::Parse {
                        line: line_no,
                        reason: format!("attribute `{name}` has no type"),
                    });
                }
                raw.attributes.push((name, parse_domain(kind, line_no)?));
            }
            "@data" => in_data = true,
            other => {
                return Err(Error::Parse {
                    line: line_no,
                    reason: format!("unexpected `{other}` in header"),
                });
            }
        }
    }

    if !in_data {
        return Err(Error::Parse {
            line: text.lines().count(),
            reason: "missing @data section".into(),
        });
    }
    Ok(raw)
}

fn parse_domain(kind: &str, line: usize) -> Result<DomainDescriptor> {
    let kind = kind.trim();
    if let Some(body) = kind.strip_prefix('{') {
        let body = body.strip_suffix('}').ok_or_else(|| Error::Parse {
            line,
            reason: "unterminated enumeration".into(),
        })?;
        let values = split_fields(body, line)?;
        return Ok(DomainDescriptor::Enumeration(values));
    }
    let marker = kind.split_whitespace().next().unwrap_or_default();
    Ok(DomainDescriptor::Marker(marker.to_string()))
}

/// Splits the first (optionally quoted) token off `s`.
fn split_token(s: &str, line: usize) -> Result<(String, &str)> {
    let s = s.trim_start();
    if let Some(quote) = s.chars().next().filter(|c| *c == '\'' || *c == '"') {
        let body = &s[1..];
        let end = body.find(quote).ok_or_else(|| Error::Parse {
            line,
            reason: "unterminated quote".into(),
        })?;
        return Ok((body[..end].to_string(), body[end + 1..].trim_start()));
    }
    match s.find(char::is_whitespace) {
        Some(end) => Ok((s[..end].to_string(), s[end..].trim_start())),
        None => Ok((s.to_string(), "")),
    }
}

/// One delimited field and whether it was written inside quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Field {
    pub text: String,
    pub quoted: bool,
}

/// Splits a comma-separated list, honoring quotes and trimming fields.
fn split_fields(s: &str, line: usize) -> Result<Vec<String>> {
    Ok(split_quoted(s, ',', line)?
        .into_iter()
        .map(|f| f.text)
        .collect())
}

/// Splits `s` on `delimiter`. Single or double quotes protect delimiters;
/// quoted text is kept verbatim, unquoted text is trimmed.
pub(crate) fn split_quoted(s: &str, delimiter: char, line: usize) -> Result<Vec<Field>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut quote: Option<char> = None;

    for c in s.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == delimiter => {
                fields.push(finish_field(&mut current, quoted));
                quoted = false;
            }
            None if c == '\'' || c == '"' => {
                if current.trim().is_empty() {
                    current.clear();
                }
                quote = Some(c);
                quoted = true;
            }
            None if quoted && c.is_whitespace() => {}
            None => current.push(c),
        }
    }
    if quote.is_some() {
        return Err(Error::Parse {
            line,
            reason: "unterminated quote".into(),
        });
    }
    fields.push(finish_field(&mut current, quoted));
    Ok(fields)
}

fn finish_field(current: &mut String, quoted: bool) -> Field {
    let text = std::mem::take(current);
    let text = if quoted { text } else { text.trim().to_string() };
    Field { text, quoted }
}
