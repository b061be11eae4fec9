//! Display-name resolution for vassal summary rows.
//!
//! Names are looked up in three steps: an optional injected
//! [`DisplayNameResolver`] (localisation tables, scene objects), then the
//! record's own `display_name`, then a name derived from the id itself.
//! Resolution cannot fail.

use std::collections::BTreeMap;

use realm_types::{SettlementId, SettlementRecord};

/// Maps a settlement id to a human-readable name.
pub trait DisplayNameResolver {
    /// Return a name for `id`, or `None` to fall through to the next source.
    fn display_name(&self, id: &SettlementId) -> Option<String>;
}

impl<F> DisplayNameResolver for F
where
    F: Fn(&SettlementId) -> Option<String>,
{
    fn display_name(&self, id: &SettlementId) -> Option<String> {
        self(id)
    }
}

/// A fixed id-to-name table.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    names: BTreeMap<SettlementId, String>,
}

impl NameTable {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            names: BTreeMap::new(),
        }
    }

    /// Add or replace a name.
    pub fn insert(&mut self, id: impl Into<SettlementId>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }
}

impl DisplayNameResolver for NameTable {
    fn display_name(&self, id: &SettlementId) -> Option<String> {
        self.names.get(id).cloned()
    }
}

/// Resolve the name to show for `id`.
pub fn resolve_display_name(
    resolver: Option<&dyn DisplayNameResolver>,
    id: &SettlementId,
    record: Option<&SettlementRecord>,
) -> String {
    resolver
        .and_then(|r| r.display_name(id))
        .filter(|name| !name.trim().is_empty())
        .or_else(|| {
            record
                .and_then(|r| r.display_name.clone())
                .filter(|name| !name.trim().is_empty())
        })
        .unwrap_or_else(|| fallback_display_name(id))
}

/// Derive a readable name from an id: `iron_hold-keep` becomes `Iron Hold Keep`.
pub fn fallback_display_name(id: &SettlementId) -> String {
    let words: Vec<String> = id
        .as_str()
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect();
    if words.is_empty() {
        return "Unnamed Settlement".to_owned();
    }
    words.join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
