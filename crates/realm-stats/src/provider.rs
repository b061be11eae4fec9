//! Record providers: where settlement records come from.
//!
//! The engine never locates or reads files itself. Whoever owns game-state
//! loading registers one or more [`SettlementProvider`]s with the stats cache,
//! and the cache asks each of them for records on every rebuild.
//!
//! Providers are infallible at this seam. A provider backed by disk or a
//! scene is expected to log and skip whatever it cannot read, so one broken
//! file never blanks out the whole realm.

use realm_types::SettlementRecord;
use serde::Deserialize;

/// A source of settlement records.
pub trait SettlementProvider {
    /// Short label used in log output.
    fn label(&self) -> &str {
        "provider"
    }

    /// Return every record this provider currently knows about.
    fn settlements(&self) -> Vec<SettlementRecord>;
}

impl<F> SettlementProvider for F
where
    F: Fn() -> Vec<SettlementRecord>,
{
    fn settlements(&self) -> Vec<SettlementRecord> {
        self()
    }
}

/// A provider holding a fixed list of records in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    label: String,
    records: Vec<SettlementRecord>,
}

impl InMemoryProvider {
    /// Create a provider from a list of records.
    pub fn new(records: Vec<SettlementRecord>) -> Self {
        Self {
            label: "in-memory".to_owned(),
            records,
        }
    }

    /// Set the label shown in log output.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Append a record.
    pub fn push(&mut self, record: SettlementRecord) {
        self.records.push(record);
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the provider holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SettlementProvider for InMemoryProvider {
    fn label(&self) -> &str {
        &self.label
    }

    fn settlements(&self) -> Vec<SettlementRecord> {
        self.records.clone()
    }
}

/// A settlement JSON document: either one record or an array of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordDocument {
    Many(Vec<SettlementRecord>),
    One(Box<SettlementRecord>),
}

/// Parse a settlement JSON document.
///
/// Accepts a single record object or an array of records.
///
/// # Errors
///
/// Returns the [`serde_json::Error`] if the text is neither shape.
pub fn parse_records(json: &str) -> Result<Vec<SettlementRecord>, serde_json::Error> {
    let document: RecordDocument = serde_json::from_str(json)?;
    Ok(match document {
        RecordDocument::Many(records) => records,
        RecordDocument::One(record) => vec![*record],
    })
}
