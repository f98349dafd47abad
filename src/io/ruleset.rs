//! Flat-text ruleset persistence: one rule per line, values joined by a
//! delimiter in their natural text form.
//!
//! A categorical value is quoted when it holds the delimiter or a quote
//! character, has surrounding whitespace, is empty, or is literally `?`.
//! Quoting uses `"` unless the value contains one, then `'`.

use super::arff::split_quoted;
use crate::error::{Error, Result};
use crate::rule::Rule;
use crate::schema::{AttributeSchema, Value};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Serializes a rule collection.
pub trait RulesetWriter {
    fn write_rules<W: Write>(&self, rules: &[Rule], out: W) -> Result<()>;
}

/// Deserializes a rule collection against a schema.
pub trait RulesetReader {
    fn read_rules<R: BufRead>(&self, schema: &AttributeSchema, input: R) -> Result<Vec<Rule>>;
}

/// Delimiter-separated ruleset format (comma by default).
///
/// Cached fitness is not stored; rules read back have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimitedRuleset {
    pub delimiter: char,
}

impl Default for DelimitedRuleset {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl DelimitedRuleset {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter }
    }

    /// Writes `rules` to `path`, replacing any existing file.
    pub fn save(&self, rules: &[Rule], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_rules(rules, BufWriter::new(file))
    }

    /// Reads rules from `path`.
    pub fn load(&self, schema: &AttributeSchema, path: &Path) -> Result<Vec<Rule>> {
        let file = File::open(path)?;
        self.read_rules(schema, BufReader::new(file))
    }
}

impl DelimitedRuleset {
    fn render(&self, value: &Value) -> Result<String> {
        let text = value.to_string();
        let Value::Nominal(raw) = value else {
            return Ok(text);
        };
        let needs_quotes = raw.is_empty()
            || raw == "?"
            || raw.trim() != raw
            || raw.contains(self.delimiter)
            || raw.contains(['\'', '"']);
        if !needs_quotes {
            return Ok(text);
        }
        match ['"', '\''].into_iter().find(|q| !raw.contains(*q)) {
            Some(q) => Ok(format!("{q}{raw}{q}")),
            None => Err(Error::InvalidSchema(format!(
                "value `{raw}` holds both quote characters and cannot be written"
            ))),
        }
    }
}

impl RulesetWriter for DelimitedRuleset {
    fn write_rules<W: Write>(&self, rules: &[Rule], mut out: W) -> Result<()> {
        let delimiter = self.delimiter.to_string();
        for rule in rules {
            let line = rule
                .genes()
                .iter()
                .map(|v| self.render(v))
                .collect::<Result<Vec<_>>>()?
                .join(&delimiter);
            writeln!(out, "{line}")?;
        }
        out.flush()?;
        Ok(())
    }
}

impl RulesetReader for DelimitedRuleset {
    fn read_rules<R: BufRead>(&self, schema: &AttributeSchema, input: R) -> Result<Vec<Rule>> {
        let mut rules = Vec::new();
        for (idx, line) in input.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_quoted(&line, self.delimiter, line_no)?;
            if fields.len() != schema.arity() {
                return Err(Error::Parse {
                    line: line_no,
                    reason: format!(
                        "expected {} values, found {}",
                        schema.arity(),
                        fields.len()
                    ),
                });
            }
            let genes = fields
                .iter()
                .enumerate()
                .map(|(i, field)| {
                    if field.quoted {
                        schema.parse_literal(i, &field.text)
                    } else {
                        schema.parse_value(i, &field.text)
                    }
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|reason| Error::Parse {
                    line: line_no,
                    reason,
                })?;
            rules.push(Rule::from_genes(genes));
        }
        Ok(rules)
    }
}
