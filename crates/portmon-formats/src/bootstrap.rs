//! Dex bootstrap - JSON tables into a [`MemoryDex`]
//!
//! The engine only sees the `Dex` trait; this loader exists so examples and
//! tests can stand up a real lookup capability from declarative tables:
//!
//! ```json
//! {
//!   "advance": {
//!     "Mudkip":      { "index": 258, "gender_ratio": 1, "ability0": "Torrent" },
//!     "move:Tackle": { "index": 33, "pp": 35 },
//!     "ball:Great Ball": { "index": 3 }
//!   }
//! }
//! ```

use std::collections::HashMap;

use serde::de::Error as _;
use serde_json::Value;

use portmon_core::{DexValue, MemoryDex};

type Tables = HashMap<String, HashMap<String, HashMap<String, Value>>>;

/// Load dex tables from a JSON document keyed format -> name -> column
pub fn dex_from_json(json: &str) -> Result<MemoryDex, serde_json::Error> {
    let tables: Tables = serde_json::from_str(json)?;
    let mut dex = MemoryDex::new();

    for (format, rows) in tables {
        for (name, columns) in rows {
            for (column, value) in columns {
                let cell = match value {
                    Value::Number(n) => {
                        let int = n.as_i64().ok_or_else(|| {
                            serde_json::Error::custom(format!(
                                "{format}/{name}/{column}: non-integer number"
                            ))
                        })?;
                        DexValue::Int(int)
                    }
                    Value::String(s) => DexValue::Str(s),
                    other => {
                        return Err(serde_json::Error::custom(format!(
                            "{format}/{name}/{column}: expected number or string, got {other}"
                        )))
                    }
                };
                dex.insert(&format, &name, column, cell);
            }
        }
    }

    tracing::debug!(rows = dex.len(), "dex loaded");
    Ok(dex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use portmon_core::Dex;

    #[test]
    fn test_loads_tables() {
        let dex = dex_from_json(
            r#"{
                "advance": {
                    "Mudkip": { "index": 258, "ability0": "Torrent" },
                    "move:Tackle": { "index": 33, "pp": 35 }
                }
            }"#,
        )
        .unwrap();

        assert!(dex.exists("advance", "Mudkip"));
        assert_eq!(dex.index_of("advance", "Mudkip", "index"), Some(258));
        assert_eq!(
            dex.value_of("advance", "Mudkip", "ability0"),
            Some(DexValue::Str("Torrent".into()))
        );
        assert_eq!(dex.index_of("advance", "move:Tackle", "pp"), Some(35));
    }

    #[test]
    fn test_rejects_non_scalar_cells() {
        assert!(dex_from_json(r#"{ "advance": { "Mudkip": { "index": [1] } } }"#).is_err());
        assert!(dex_from_json(r#"{ "advance": { "Mudkip": { "index": 1.5 } } }"#).is_err());
    }
}
