//! Records and arity-checked datasets.

use crate::error::{Error, Phase, Result};
use crate::schema::{AttributeSchema, Value};
use std::ops::Deref;

/// One connection record: a value per schema attribute, label last.
///
/// Records are immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Vec<Value>);

impl Record {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// The class-label field. `Missing` for an empty record.
    pub fn label(&self) -> &Value {
        self.0.last().unwrap_or(&Value::Missing)
    }

    /// True if the record's true label is `anomaly`.
    pub fn is_attack(&self) -> bool {
        self.label().is_anomaly()
    }
}

impl Deref for Record {
    type Target = [Value];

    fn deref(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for Record {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

/// Fails with [`Error::MalformedRecord`] on the first record whose arity
/// differs from the schema's.
pub fn check_arity(schema: &AttributeSchema, records: &[Record], phase: Phase) -> Result<()> {
    let expected = schema.arity();
    match records.iter().position(|r| r.len() != expected) {
        Some(index) => Err(Error::MalformedRecord {
            phase,
            index,
            reason: format!(
                "expected {expected} values, found {}",
                records[index].len()
            ),
        }),
        None => Ok(()),
    }
}

/// A schema together with records that all match its arity.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: AttributeSchema,
    records: Vec<Record>,
}

impl Dataset {
    /// Pairs a schema with records, rejecting arity mismatches.
    pub fn new(schema: AttributeSchema, records: Vec<Record>) -> Result<Self> {
        check_arity(&schema, &records, Phase::Loading)?;
        Ok(Self { schema, records })
    }

    /// Parses text rows against the schema.
    ///
    /// Each failure names the zero-based row index and the offending field.
    pub fn from_rows<I, S>(schema: AttributeSchema, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<S>>,
        S: AsRef<str>,
    {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                if row.len() != schema.arity() {
                    return Err(Error::MalformedRecord {
                        phase: Phase::Loading,
                        index,
                        reason: format!(
                            "expected {} values, found {}",
                            schema.arity(),
                            row.len()
                        ),
                    });
                }
                row.iter()
                    .enumerate()
                    .map(|(i, field)| schema.parse_value(i, field.as_ref()))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map(Record::new)
                    .map_err(|reason| Error::MalformedRecord {
                        phase: Phase::Loading,
                        index,
                        reason,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { schema, records })
    }

    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records labelled `anomaly`.
    pub fn attack_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_attack()).count()
    }

    pub fn into_parts(self) -> (AttributeSchema, Vec<Record>) {
        (self.schema, self.records)
    }
}
