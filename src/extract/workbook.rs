//! Workbook reading: table discovery and raw record extraction.
//!
//! Tables are discovered by name against fixed prefixes, iterating sheets
//! in workbook order and table names in sorted order so a run is
//! reproducible regardless of how the file stores them. A missing table is
//! an empty list; an unreadable workbook is fatal.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook, Reader, Xlsx};

use crate::error::WorkbookResult;
use crate::extract::columns::*;
use crate::extract::{cell_to_value, field_text, table_records, value_text, Record};
use crate::models::{ModuleConfig, ModuleRegistry};

/// What a discovered table contains, classified from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Summary,
    Fault,
    Bypass,
    Button,
    BypassEm,
    ButtonEm,
    Motor,
    Other,
}

impl TableKind {
    /// Classify a table by its name. Exact names first, then prefixes.
    pub fn classify(name: &str) -> TableKind {
        if name == TABLE_SUMMARY {
            TableKind::Summary
        } else if name == TABLE_BYPASS {
            TableKind::Bypass
        } else if name == TABLE_BUTTON {
            TableKind::Button
        } else if name.starts_with(TABLE_FAULT_PREFIX) {
            TableKind::Fault
        } else if name.starts_with(TABLE_BYPASS_EM_PREFIX) {
            TableKind::BypassEm
        } else if name.starts_with(TABLE_BUTTON_EM_PREFIX) {
            TableKind::ButtonEm
        } else if name.starts_with(TABLE_MOTOR_PREFIX) {
            TableKind::Motor
        } else {
            TableKind::Other
        }
    }
}

/// A table located in the workbook.
#[derive(Debug, Clone)]
pub struct TableRef {
    pub sheet: String,
    pub name: String,
    pub kind: TableKind,
}

/// Raw EM rows grouped per sheet: (sheet module id, rows in table order).
pub type EmSheets = Vec<(String, Vec<Record>)>;

/// Everything the production export needs from the workbook.
#[derive(Debug, Default)]
pub struct ProdData {
    pub faults: Vec<Record>,
    pub bypasses: Vec<Record>,
    pub buttons: Vec<Record>,
    pub bypass_em: EmSheets,
    pub button_em: EmSheets,
    pub modules: ModuleRegistry,
    /// Per-row notices from the summary pass (bad machine/module numbers).
    pub notices: Vec<String>,
}

type Workbook = Xlsx<BufReader<File>>;

/// Open a workbook and load its table definitions.
pub fn open_tables(path: &Path) -> WorkbookResult<Workbook> {
    let mut workbook: Workbook = open_workbook(path)?;
    workbook.load_tables()?;
    Ok(workbook)
}

/// Enumerate every table in the workbook: sheets in workbook order, table
/// names sorted within each sheet.
pub fn discover_tables(workbook: &Workbook) -> Vec<TableRef> {
    let mut out = Vec::new();
    for sheet in workbook.sheet_names() {
        let mut names: Vec<String> = workbook
            .table_names_in_sheet(&sheet)
            .into_iter()
            .cloned()
            .collect();
        names.sort();
        for name in names {
            let kind = TableKind::classify(&name);
            out.push(TableRef { sheet: sheet.clone(), name, kind });
        }
    }
    out
}

/// Module identifier of a sheet, read from the fixed cell B3.
fn sheet_module_id(workbook: &mut Workbook, sheet: &str) -> WorkbookResult<Option<String>> {
    let range = workbook.worksheet_range(sheet)?;
    let id = range
        .get_value(CELL_MODULE_ID)
        .map(cell_to_value)
        .map(|v| value_text(&v).trim().to_string())
        .filter(|s| !s.is_empty());
    Ok(id)
}

/// Read the production data: faults, bypass/button recaps, per-sheet EM
/// rows and the module registry seeded from the summary table.
pub fn read_prod(path: &Path) -> WorkbookResult<ProdData> {
    let mut workbook = open_tables(path)?;
    let tables = discover_tables(&workbook);
    let mut data = ProdData::default();

    // Module ids per sheet, needed to scope EM tables.
    let mut module_ids: HashMap<String, Option<String>> = HashMap::new();
    for sheet in workbook.sheet_names() {
        let id = sheet_module_id(&mut workbook, &sheet)?;
        module_ids.insert(sheet, id);
    }

    // EM rows accumulate per sheet module id, in table encounter order.
    let mut bypass_em: HashMap<String, Vec<Record>> = HashMap::new();
    let mut button_em: HashMap<String, Vec<Record>> = HashMap::new();
    let mut em_order: Vec<String> = Vec::new();

    for table_ref in &tables {
        let records = match table_ref.kind {
            TableKind::Other | TableKind::Motor => continue,
            _ => table_records(&workbook.table_by_name(&table_ref.name)?, None),
        };

        match table_ref.kind {
            TableKind::Summary => seed_modules(&mut data, records),
            TableKind::Fault => data.faults.extend(records),
            TableKind::Bypass => data.bypasses.extend(records),
            TableKind::Button => data.buttons.extend(records),
            TableKind::BypassEm | TableKind::ButtonEm => {
                let Some(Some(module_id)) = module_ids.get(&table_ref.sheet) else {
                    continue;
                };
                if !em_order.contains(module_id) {
                    em_order.push(module_id.clone());
                }
                let bucket = match table_ref.kind {
                    TableKind::BypassEm => bypass_em.entry(module_id.clone()).or_default(),
                    _ => button_em.entry(module_id.clone()).or_default(),
                };
                bucket.extend(records);
            }
            TableKind::Other | TableKind::Motor => unreachable!(),
        }
    }

    for module_id in em_order {
        if let Some(rows) = bypass_em.remove(&module_id) {
            data.bypass_em.push((module_id.clone(), rows));
        }
        if let Some(rows) = button_em.remove(&module_id) {
            data.button_em.push((module_id, rows));
        }
    }

    Ok(data)
}

/// Read the motor tables (diagnostic export).
pub fn read_motors(path: &Path) -> WorkbookResult<Vec<Record>> {
    let mut workbook = open_tables(path)?;
    let tables = discover_tables(&workbook);

    let mut motors = Vec::new();
    for table_ref in &tables {
        if table_ref.kind == TableKind::Motor {
            motors.extend(table_records(&workbook.table_by_name(&table_ref.name)?, None));
        }
    }
    Ok(motors)
}

/// Seed the module registry from summary rows. The first configuration for
/// a module wins; rows with unparsable numbers are skipped with a notice.
fn seed_modules(data: &mut ProdData, records: Vec<Record>) {
    for record in records {
        let Some(module) = field_text(&record, COL_SUMMARY_MODULE) else {
            continue;
        };

        let num_machine = field_text(&record, COL_SUMMARY_NUM_MACHINE)
            .and_then(|t| t.parse::<i64>().ok());
        let num_module = field_text(&record, COL_SUMMARY_NUM_MODULE)
            .and_then(|t| t.parse::<i64>().ok());
        let (Some(num_machine), Some(num_module)) = (num_machine, num_module) else {
            data.notices.push(format!(
                "Invalid machine/module number for module {}",
                module
            ));
            continue;
        };

        data.modules.insert_if_absent(
            &module,
            ModuleConfig {
                num_machine,
                num_module,
                name_lang_1: field_text(&record, COL_SUMMARY_NAME_LANG_1).unwrap_or_default(),
                name_lang_2: field_text(&record, COL_SUMMARY_NAME_LANG_2).unwrap_or_default(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_classify_table_names() {
        assert_eq!(TableKind::classify("T_Sommaire"), TableKind::Summary);
        assert_eq!(TableKind::classify("T_Defaut_U1"), TableKind::Fault);
        assert_eq!(TableKind::classify("T_RecapShunt"), TableKind::Bypass);
        assert_eq!(TableKind::classify("T_RecapBtn"), TableKind::Button);
        assert_eq!(TableKind::classify("T_Shunt_U12"), TableKind::BypassEm);
        assert_eq!(TableKind::classify("T_Action_U3"), TableKind::ButtonEm);
        assert_eq!(TableKind::classify("T_Mot2"), TableKind::Motor);
        assert_eq!(TableKind::classify("T_Autre"), TableKind::Other);
    }

    #[test]
    fn test_seed_modules_first_wins_and_bad_numbers_noticed() {
        let mut data = ProdData::default();
        seed_modules(
            &mut data,
            vec![
                record(json!({
                    "N° Module": "U1",
                    "N° Machine": 1,
                    "N° Unit": 2,
                    "Nom Langue 1": "convoyeur",
                    "Nom Langue 2": "conveyor"
                })),
                // Duplicate: kept configuration is the first one.
                record(json!({
                    "N° Module": "U1",
                    "N° Machine": 9,
                    "N° Unit": 9
                })),
                // Unparsable machine number: skipped with a notice.
                record(json!({
                    "N° Module": "U2",
                    "N° Machine": "abc",
                    "N° Unit": 2
                })),
            ],
        );

        assert_eq!(data.modules.len(), 1);
        let cfg = data.modules.get("U1").unwrap();
        assert_eq!(cfg.num_machine, 1);
        assert_eq!(cfg.num_module, 2);
        assert_eq!(cfg.name_lang_1, "convoyeur");
        assert_eq!(data.notices.len(), 1);
        assert!(data.notices[0].contains("U2"));
    }

    #[test]
    fn test_seed_modules_missing_module_name_silently_skipped() {
        let mut data = ProdData::default();
        seed_modules(
            &mut data,
            vec![record(json!({ "N° Machine": 1, "N° Unit": 2 }))],
        );
        assert!(data.modules.is_empty());
        assert!(data.notices.is_empty());
    }
}
