//! EM enrichment merge.
//!
//! Bypass and button recap rows carry no description text; the per-module
//! EM tables do. The merge runs in two passes because a recap row and the
//! EM table it points at may live on different sheets: first collect every
//! sheet's EM lookup, then patch the recap records.
//!
//! ```text
//! EM sheets ──▶ build_em_lookup ──▶ { module ─▶ { alias ─▶ EM record } }
//!                                             │
//! recap records ─────────────── apply_em ◀────┘  (fill blanks only)
//! ```

use std::collections::HashMap;

use crate::extract::columns::{COL_ALIAS, COL_CHECK, COL_DESCRIPTION_ARP, COL_DESCRIPTION_CLIENT, COL_NUM_MODULE};
use crate::extract::workbook::EmSheets;
use crate::extract::{field_text, is_blank, is_checked, Record};

/// Per-module EM lookup: module id -> alias -> EM record.
pub type EmLookup = HashMap<String, HashMap<String, Record>>;

/// Build the lookup from raw per-sheet EM rows.
///
/// Only validity-confirmed rows with a non-empty alias participate; a
/// duplicate alias within a sheet overwrites the earlier row.
pub fn build_em_lookup(sheets: &EmSheets) -> EmLookup {
    let mut lookup = EmLookup::new();

    for (module_id, rows) in sheets {
        let table = lookup.entry(module_id.clone()).or_default();
        for row in rows {
            if !is_checked(row, COL_CHECK) {
                continue;
            }
            let Some(alias) = field_text(row, COL_ALIAS) else {
                continue;
            };
            table.insert(alias, row.clone());
        }
    }

    lookup
}

/// Patch records with EM description text.
///
/// For every record carrying both a module and an EM alias (in
/// `em_alias_col`), copy the EM record's ARP and client descriptions, but
/// only where the EM value is non-empty and the record's own value is
/// still blank. An EM miss leaves the record unchanged, so running the
/// merge twice is the same as running it once.
pub fn apply_em(records: &mut [Record], lookup: &EmLookup, em_alias_col: &str) {
    for record in records.iter_mut() {
        let Some(module) = field_text(record, COL_NUM_MODULE) else {
            continue;
        };
        let Some(alias) = field_text(record, em_alias_col) else {
            continue;
        };
        let Some(em_record) = lookup.get(&module).and_then(|t| t.get(&alias)) else {
            continue;
        };

        for key in [COL_DESCRIPTION_ARP, COL_DESCRIPTION_CLIENT] {
            let Some(em_value) = em_record.get(key) else {
                continue;
            };
            if is_blank(em_value) {
                continue;
            }
            let already_set = record.get(key).map(|v| !is_blank(v)).unwrap_or(false);
            if !already_set {
                record.insert(key.to_string(), em_value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().unwrap().clone()
    }

    fn em_sheets() -> EmSheets {
        vec![(
            "U1".to_string(),
            vec![
                record(json!({
                    "Repère": "S01",
                    "Check1": 1,
                    "Description ARP": "court-circuit",
                    "Description Client": "short circuit"
                })),
                // Not validity-confirmed: excluded from the lookup.
                record(json!({
                    "Repère": "S02",
                    "Check1": "",
                    "Description ARP": "ignored"
                })),
                // No alias: excluded.
                record(json!({
                    "Check1": 1,
                    "Description ARP": "ignored"
                })),
            ],
        )]
    }

    #[test]
    fn test_lookup_filters_unchecked_and_aliasless_rows() {
        let lookup = build_em_lookup(&em_sheets());
        let table = &lookup["U1"];
        assert_eq!(table.len(), 1);
        assert!(table.contains_key("S01"));
    }

    #[test]
    fn test_duplicate_alias_last_write_wins() {
        let sheets = vec![(
            "U1".to_string(),
            vec![
                record(json!({ "Repère": "S01", "Check1": 1, "Description ARP": "first" })),
                record(json!({ "Repère": "S01", "Check1": 1, "Description ARP": "second" })),
            ],
        )];
        let lookup = build_em_lookup(&sheets);
        assert_eq!(lookup["U1"]["S01"]["Description ARP"], "second");
    }

    #[test]
    fn test_apply_fills_blank_descriptions() {
        let lookup = build_em_lookup(&em_sheets());
        let mut records = vec![record(json!({
            "N°": 1,
            "N° Module": "U1",
            "Shunt": "S01"
        }))];

        apply_em(&mut records, &lookup, "Shunt");

        assert_eq!(records[0]["Description ARP"], "court-circuit");
        assert_eq!(records[0]["Description Client"], "short circuit");
    }

    #[test]
    fn test_apply_never_overwrites_present_values() {
        let lookup = build_em_lookup(&em_sheets());
        let mut records = vec![record(json!({
            "N° Module": "U1",
            "Shunt": "S01",
            "Description ARP": "déjà renseigné"
        }))];

        apply_em(&mut records, &lookup, "Shunt");

        assert_eq!(records[0]["Description ARP"], "déjà renseigné");
        assert_eq!(records[0]["Description Client"], "short circuit");
    }

    #[test]
    fn test_apply_is_idempotent() {
        let lookup = build_em_lookup(&em_sheets());
        let mut records = vec![record(json!({
            "N° Module": "U1",
            "Shunt": "S01"
        }))];

        apply_em(&mut records, &lookup, "Shunt");
        let once = records.clone();
        apply_em(&mut records, &lookup, "Shunt");
        assert_eq!(records, once);
    }

    #[test]
    fn test_em_miss_leaves_record_unchanged() {
        let lookup = build_em_lookup(&em_sheets());
        let mut records = vec![record(json!({
            "N° Module": "U9",
            "Shunt": "S01"
        }))];
        let before = records.clone();

        apply_em(&mut records, &lookup, "Shunt");
        assert_eq!(records, before);
    }
}
