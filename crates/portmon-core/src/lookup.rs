//! Lookup ("dex") capability
//!
//! Maps canonical names (species, moves, items, games, locations) to
//! per-format indices and back. The tables are loaded once by an external
//! bootstrap and injected; the engine never constructs or mutates them.

use std::collections::HashMap;

/// A single looked-up cell: per-format tables store either numbers or names
#[derive(Clone, Debug, PartialEq)]
pub enum DexValue {
    Int(i64),
    Str(String),
}

impl DexValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            DexValue::Int(v) => Some(*v),
            DexValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DexValue::Int(_) => None,
            DexValue::Str(s) => Some(s),
        }
    }
}

/// Read-only lookup capability, keyed by target format and canonical name
pub trait Dex {
    /// Whether `name` exists at all in `format`'s table
    fn exists(&self, format: &str, name: &str) -> bool;

    /// The value of `column` for `name` in `format`'s table
    fn value_of(&self, format: &str, name: &str, column: &str) -> Option<DexValue>;

    /// Reverse lookup: the canonical name under `prefix` whose `column`
    /// equals `value`, with the prefix stripped. An empty prefix matches
    /// only unprefixed names (species), never `"move:..."`-style keys.
    fn name_for(&self, format: &str, prefix: &str, value: &DexValue, column: &str)
        -> Option<String>;

    /// Convenience: `column` as an unsigned index
    fn index_of(&self, format: &str, name: &str, column: &str) -> Option<u32> {
        self.value_of(format, name, column)
            .and_then(|v| v.as_int())
            .and_then(|v| u32::try_from(v).ok())
    }
}

/// In-memory dex used by the bootstrap loader and tests
#[derive(Debug, Default)]
pub struct MemoryDex {
    rows: HashMap<(String, String), HashMap<String, DexValue>>,
}

impl MemoryDex {
    pub fn new() -> Self {
        MemoryDex::default()
    }

    /// Insert one cell for (format, name)
    pub fn insert(
        &mut self,
        format: impl Into<String>,
        name: impl Into<String>,
        column: impl Into<String>,
        value: DexValue,
    ) {
        self.rows
            .entry((format.into(), name.into()))
            .or_default()
            .insert(column.into(), value);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Dex for MemoryDex {
    fn exists(&self, format: &str, name: &str) -> bool {
        self.rows
            .contains_key(&(format.to_string(), name.to_string()))
    }

    fn value_of(&self, format: &str, name: &str, column: &str) -> Option<DexValue> {
        self.rows
            .get(&(format.to_string(), name.to_string()))
            .and_then(|cols| cols.get(column))
            .cloned()
    }

    fn name_for(
        &self,
        format: &str,
        prefix: &str,
        value: &DexValue,
        column: &str,
    ) -> Option<String> {
        self.rows
            .iter()
            .filter(|((f, name), _)| {
                f == format
                    && if prefix.is_empty() {
                        !name.contains(':')
                    } else {
                        name.starts_with(prefix)
                    }
            })
            .find(|(_, cols)| cols.get(column) == Some(value))
            .map(|((_, name), _)| name[prefix.len()..].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_dex_lookup() {
        let mut dex = MemoryDex::new();
        dex.insert("advance", "Bulbasaur", "index", DexValue::Int(1));
        dex.insert("advance", "Unown", "index", DexValue::Int(201));

        assert!(dex.exists("advance", "Unown"));
        assert!(!dex.exists("classic", "Unown"));
        assert_eq!(dex.index_of("advance", "Bulbasaur", "index"), Some(1));
        assert_eq!(dex.index_of("advance", "Missing", "index"), None);
    }

    #[test]
    fn test_memory_dex_reverse_lookup() {
        let mut dex = MemoryDex::new();
        dex.insert("advance", "Unown", "index", DexValue::Int(201));
        // same index under a prefix must not shadow the species row
        dex.insert("advance", "move:Spite", "index", DexValue::Int(201));

        assert_eq!(
            dex.name_for("advance", "", &DexValue::Int(201), "index"),
            Some("Unown".to_string())
        );
        assert_eq!(
            dex.name_for("advance", "move:", &DexValue::Int(201), "index"),
            Some("Spite".to_string())
        );
        assert_eq!(
            dex.name_for("advance", "", &DexValue::Int(202), "index"),
            None
        );
    }
}
