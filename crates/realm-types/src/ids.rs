//! Case-insensitive settlement identifiers.
//!
//! Settlement data is authored by hand across many JSON files, so the same
//! settlement is routinely referenced as `Ironhold`, `ironhold` and
//! `IRONHOLD `. A [`SettlementId`] keeps the spelling it was created with
//! for display, but compares, orders and hashes on a normalized key
//! (trimmed, lowercased).

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Identifier of a settlement record.
///
/// Equality, ordering and hashing use the normalized key only, so
/// `SettlementId::new("Ironhold") == SettlementId::new(" IRONHOLD")`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct SettlementId {
    /// The identifier as written by the author (trimmed).
    raw: String,
    /// Lowercased lookup key.
    key: String,
}

impl SettlementId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        let raw = id.into().trim().to_owned();
        let key = raw.to_lowercase();
        Self { raw, key }
    }

    /// The identifier as originally written, minus surrounding whitespace.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the identifier is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.key.is_empty()
    }
}

impl PartialEq for SettlementId {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for SettlementId {}

impl PartialOrd for SettlementId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SettlementId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl Hash for SettlementId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl core::fmt::Display for SettlementId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<String> for SettlementId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&str> for SettlementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<SettlementId> for String {
    fn from(id: SettlementId) -> Self {
        id.raw
    }
}
