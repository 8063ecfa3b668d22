//! Supervision JSON assembly.
//!
//! Two structures are produced for one communication channel:
//!
//! - the flat button/bypass config: every validity-confirmed record with a
//!   resolved module becomes an entry carrying its number, machine number,
//!   module number and alias;
//! - the machine hierarchy: modules grouped by machine number in
//!   first-seen order, with operator-supplied machine names and optional
//!   recipes fetched from the external store.
//!
//! Module resolution goes through [`ModuleRegistry::resolve`]: the
//! operator is asked once per unknown module and the answer is reused for
//! every later record naming it.

use serde::Serialize;
use serde_json::Value;

use crate::error::{PipelineResult, PromptResult};
use crate::extract::columns::{COL_ALIAS, COL_CHECK, COL_NUM, COL_NUM_MODULE};
use crate::extract::{field_text, is_checked, value_text, Record};
use crate::models::{capitalize, Language, Machine, ModuleEntry, ModuleRegistry};
use crate::prompt::{ask_store, Operator};
use crate::store;

// =============================================================================
// Button / bypass channel config
// =============================================================================

/// `config_button_bypass.json` root.
#[derive(Debug, Serialize)]
pub struct ChannelConfig {
    pub coms: Vec<ChannelCom>,
}

#[derive(Debug, Serialize)]
pub struct ChannelCom {
    pub num: i64,
    pub buttons: Vec<ChannelEntry>,
    pub bypasses: Vec<ChannelEntry>,
}

/// One bypass or button on the channel.
#[derive(Debug, Serialize)]
pub struct ChannelEntry {
    pub num: Value,
    pub num_machine: i64,
    pub num_em: i64,
    pub alias: String,
}

/// Build the button/bypass channel config.
///
/// Records missing their number or module are silently dropped; records
/// failing the validity check are dropped with a notice. Returns the
/// config plus the notices.
pub fn build_channel_config(
    bypasses: &[Record],
    buttons: &[Record],
    num_com: i64,
    modules: &mut ModuleRegistry,
    op: &mut dyn Operator,
) -> PromptResult<(ChannelConfig, Vec<String>)> {
    let mut notices = Vec::new();
    let bypasses = channel_entries(bypasses, "bypass", modules, op, &mut notices)?;
    let buttons = channel_entries(buttons, "button", modules, op, &mut notices)?;

    let config = ChannelConfig {
        coms: vec![ChannelCom {
            num: num_com,
            buttons,
            bypasses,
        }],
    };
    Ok((config, notices))
}

fn channel_entries(
    records: &[Record],
    label: &str,
    modules: &mut ModuleRegistry,
    op: &mut dyn Operator,
    notices: &mut Vec<String>,
) -> PromptResult<Vec<ChannelEntry>> {
    let mut entries = Vec::new();

    for record in records {
        let Some(num) = record.get(COL_NUM).filter(|v| !v.is_null()) else {
            continue;
        };
        let Some(module) = field_text(record, COL_NUM_MODULE) else {
            continue;
        };
        if !is_checked(record, COL_CHECK) {
            notices.push(format!(
                "The {} n°{} is marked as not valid => ignored.",
                label,
                value_text(num)
            ));
            continue;
        }

        let cfg = modules.resolve(&module, op)?;
        entries.push(ChannelEntry {
            num: num.clone(),
            num_machine: cfg.num_machine,
            num_em: cfg.num_module,
            alias: record.get(COL_ALIAS).map(value_text).unwrap_or_default(),
        });
    }

    Ok(entries)
}

// =============================================================================
// Machine hierarchy
// =============================================================================

/// `config_machines.json` root.
#[derive(Debug, Serialize)]
pub struct MachinesConfig {
    pub coms: Vec<MachinesCom>,
}

#[derive(Debug, Serialize)]
pub struct MachinesCom {
    pub num: i64,
    pub machines: Vec<Machine>,
}

/// Group configured modules into machines, in first-seen order.
///
/// A machine is created once, prompting for its two display names; every
/// module referencing the same machine number is appended to it.
pub fn build_machines(modules: &ModuleRegistry, op: &mut dyn Operator) -> PromptResult<Vec<Machine>> {
    let mut machines: Vec<Machine> = Vec::new();

    for (module, cfg) in modules.iter() {
        let index = match machines.iter().position(|m| m.num == cfg.num_machine) {
            Some(index) => index,
            None => {
                let name_1 = op.ask_str(&format!("Name of machine n°{} (language 1): ", cfg.num_machine))?;
                let name_2 = op.ask_str(&format!("Name of machine n°{} (language 2): ", cfg.num_machine))?;
                machines.push(Machine {
                    num: cfg.num_machine,
                    name_1: capitalize(&name_1),
                    name_2: capitalize(&name_2),
                    name_3: String::new(),
                    ems: Vec::new(),
                    recipes: None,
                });
                machines.len() - 1
            }
        };

        machines[index].ems.push(ModuleEntry {
            num: cfg.num_module,
            name_1: format!("{} - {}", module, capitalize(&cfg.name_lang_1)),
            name_2: format!("{} - {}", module, capitalize(&cfg.name_lang_2)),
            name_3: format!("{} - ", module),
            nb_in_machine: cfg.num_module,
            utility: 0,
            checked: true,
            axs: serde_json::Map::new(),
        });
    }

    Ok(machines)
}

/// Offer to attach recipe names to each machine.
///
/// On acceptance the operator supplies a store path (blank cancels for
/// that machine only); the fetched rows are folded per the chosen
/// language's store offset. A store failure is fatal for the run.
pub fn attach_recipes(
    machines: &mut [Machine],
    lang: Language,
    op: &mut dyn Operator,
) -> PipelineResult<()> {
    let store_lang = lang.store_offset();

    for machine in machines.iter_mut() {
        let wanted = op.ask_yes_no(&format!(
            "Machine {} - Attach the recipe names? (requires access to the recipe store)",
            machine.num
        ))?;
        if !wanted {
            continue;
        }

        let Some(path) = ask_store(op)? else {
            continue;
        };

        let rows = store::fetch_recipe_rows(&path)?;
        machine.recipes = Some(store::fold_recipes(&rows, store_lang));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModuleConfig;
    use crate::prompt::ScriptedOperator;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        value.as_object().unwrap().clone()
    }

    fn seeded_registry() -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry.insert_if_absent(
            "U1",
            ModuleConfig {
                num_machine: 1,
                num_module: 1,
                name_lang_1: "convoyeur".into(),
                name_lang_2: "conveyor".into(),
            },
        );
        registry
    }

    #[test]
    fn test_channel_config_shape() {
        let bypasses = vec![record(json!({
            "N°": 7,
            "N° Module": "U1",
            "Repère": "S01",
            "Check1": 1
        }))];
        let buttons = vec![record(json!({
            "N°": 2,
            "N° Module": "U1",
            "Repère": "B02",
            "Check1": "1"
        }))];

        let mut registry = seeded_registry();
        let mut op = ScriptedOperator::new(Vec::<String>::new());
        let (config, notices) =
            build_channel_config(&bypasses, &buttons, 4, &mut registry, &mut op).unwrap();

        assert!(notices.is_empty());
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["coms"][0]["num"], 4);
        assert_eq!(json["coms"][0]["bypasses"][0]["num"], 7);
        assert_eq!(json["coms"][0]["bypasses"][0]["num_machine"], 1);
        assert_eq!(json["coms"][0]["bypasses"][0]["num_em"], 1);
        assert_eq!(json["coms"][0]["bypasses"][0]["alias"], "S01");
        assert_eq!(json["coms"][0]["buttons"][0]["alias"], "B02");
    }

    #[test]
    fn test_unchecked_record_excluded_with_notice() {
        // Blank Check1 excludes the record even if otherwise complete.
        let bypasses = vec![record(json!({
            "N°": 7,
            "N° Module": "U1",
            "Repère": "S01",
            "Check1": ""
        }))];

        let mut registry = seeded_registry();
        let mut op = ScriptedOperator::new(Vec::<String>::new());
        let (config, notices) =
            build_channel_config(&bypasses, &[], 1, &mut registry, &mut op).unwrap();

        assert!(config.coms[0].bypasses.is_empty());
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("n°7"));
    }

    #[test]
    fn test_missing_number_or_module_silently_dropped() {
        let bypasses = vec![
            record(json!({ "N° Module": "U1", "Check1": 1 })),
            record(json!({ "N°": 3, "Check1": 1 })),
        ];

        let mut registry = seeded_registry();
        let mut op = ScriptedOperator::new(Vec::<String>::new());
        let (config, notices) =
            build_channel_config(&bypasses, &[], 1, &mut registry, &mut op).unwrap();

        assert!(config.coms[0].bypasses.is_empty());
        assert!(notices.is_empty());
    }

    #[test]
    fn test_unknown_module_prompted_once_and_reused() {
        let bypasses = vec![
            record(json!({ "N°": 1, "N° Module": "U9", "Check1": 1 })),
            record(json!({ "N°": 2, "N° Module": "U9", "Check1": 1 })),
        ];

        let mut registry = ModuleRegistry::new();
        // One machine number and one module number, asked exactly once.
        let mut op = ScriptedOperator::new(["5", "3"]);
        let (config, _) = build_channel_config(&bypasses, &[], 1, &mut registry, &mut op).unwrap();

        assert!(op.exhausted());
        let entries = &config.coms[0].bypasses;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].num_machine, 5);
        assert_eq!(entries[1].num_machine, 5);
        assert_eq!(entries[0].num_em, 3);
    }

    #[test]
    fn test_machines_grouped_first_seen_named_once() {
        let mut registry = ModuleRegistry::new();
        for (name, machine, module) in [("U1", 2, 1), ("U2", 1, 1), ("U3", 2, 2)] {
            registry.insert_if_absent(
                name,
                ModuleConfig {
                    num_machine: machine,
                    num_module: module,
                    name_lang_1: "poste".into(),
                    name_lang_2: "station".into(),
                },
            );
        }

        let mut op = ScriptedOperator::new(["presse", "press", "four", "oven"]);
        let machines = build_machines(&registry, &mut op).unwrap();
        assert!(op.exhausted());

        // First-seen order: machine 2 before machine 1.
        assert_eq!(machines.len(), 2);
        assert_eq!(machines[0].num, 2);
        assert_eq!(machines[0].name_1, "Presse");
        assert_eq!(machines[0].name_2, "Press");
        assert_eq!(machines[0].name_3, "");
        assert_eq!(machines[1].num, 1);
        assert_eq!(machines[1].name_1, "Four");

        // Machine 2 accumulated both of its modules, in order.
        assert_eq!(machines[0].ems.len(), 2);
        assert_eq!(machines[0].ems[0].name_1, "U1 - Poste");
        assert_eq!(machines[0].ems[0].name_3, "U1 - ");
        assert_eq!(machines[0].ems[1].num, 2);
        assert!(machines[0].ems[0].checked);
        assert_eq!(machines[0].ems[0].utility, 0);
        assert!(machines[0].ems[0].axs.is_empty());
    }

    #[test]
    fn test_machine_json_omits_absent_recipes() {
        let mut registry = ModuleRegistry::new();
        registry.insert_if_absent(
            "U1",
            ModuleConfig {
                num_machine: 1,
                num_module: 1,
                name_lang_1: String::new(),
                name_lang_2: String::new(),
            },
        );
        let mut op = ScriptedOperator::new(["a", "b"]);
        let machines = build_machines(&registry, &mut op).unwrap();

        let json = serde_json::to_value(&machines).unwrap();
        assert!(json[0].get("recipes").is_none());
        assert_eq!(json[0]["ems"][0]["axs"], serde_json::json!({}));
    }

    #[test]
    fn test_attach_recipes_declined_leaves_machine_untouched() {
        let mut machines = vec![Machine {
            num: 1,
            name_1: "A".into(),
            name_2: "B".into(),
            name_3: String::new(),
            ems: Vec::new(),
            recipes: None,
        }];

        let mut op = ScriptedOperator::new(["n"]);
        attach_recipes(&mut machines, Language::Fr, &mut op).unwrap();
        assert!(machines[0].recipes.is_none());
    }

    #[test]
    fn test_attach_recipes_blank_store_path_skips_machine() {
        let mut machines = vec![Machine {
            num: 1,
            name_1: "A".into(),
            name_2: "B".into(),
            name_3: String::new(),
            ems: Vec::new(),
            recipes: None,
        }];

        let mut op = ScriptedOperator::new(["y", ""]);
        attach_recipes(&mut machines, Language::Fr, &mut op).unwrap();
        assert!(machines[0].recipes.is_none());
        assert!(op.exhausted());
    }
}
