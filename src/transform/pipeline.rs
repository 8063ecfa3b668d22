//! End-to-end runs: workbook in, export files out.
//!
//! Both runs are single-threaded and run-to-completion; the only
//! suspension points are operator prompts. Output files are written as
//! each stage completes, so an aborted run may leave the earlier files in
//! place (no atomicity is promised).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineResult;
use crate::export::{csv, json};
use crate::extract::columns::{COL_BUTTON_EM_ALIAS, COL_BYPASS_EM_ALIAS};
use crate::extract::workbook;
use crate::models::Language;
use crate::prompt::Operator;
use crate::transform::enrich;

/// Output file names, fixed by the downstream consumers.
pub const FILE_FAULTS: &str = "defaut.csv";
pub const FILE_BYPASS: &str = "bypass.csv";
pub const FILE_BUTTON: &str = "button.csv";
pub const FILE_MOTOR: &str = "motor.csv";
pub const FILE_CHANNEL: &str = "config_button_bypass.json";
pub const FILE_MACHINES: &str = "config_machines.json";

/// Summary of a production run.
#[derive(Debug)]
pub struct ProdReport {
    pub out_dir: PathBuf,
    pub faults: usize,
    pub bypasses: usize,
    pub buttons: usize,
    pub machines: usize,
    /// Per-record notices (skips, invalid records) collected across stages.
    pub notices: Vec<String>,
}

/// Summary of a diagnostic run.
#[derive(Debug)]
pub struct DiagReport {
    pub out_dir: PathBuf,
    pub motors: usize,
    pub exported: usize,
    pub notices: Vec<String>,
}

/// Production run: fault/bypass/button CSV exports plus the two
/// supervision JSON files.
pub fn run_prod(
    workbook_path: &Path,
    out_dir: &Path,
    lang: Language,
    num_com: i64,
    op: &mut dyn Operator,
) -> PipelineResult<ProdReport> {
    fs::create_dir_all(out_dir)?;

    let mut data = workbook::read_prod(workbook_path)?;
    let mut notices = std::mem::take(&mut data.notices);

    // EM merge: collect every sheet's lookup, then patch.
    let bypass_lookup = enrich::build_em_lookup(&data.bypass_em);
    let button_lookup = enrich::build_em_lookup(&data.button_em);
    enrich::apply_em(&mut data.bypasses, &bypass_lookup, COL_BYPASS_EM_ALIAS);
    enrich::apply_em(&mut data.buttons, &button_lookup, COL_BUTTON_EM_ALIAS);

    // Text-ID exports.
    let offset = lang.fault_offset();
    let faults = csv::export_faults(&data.faults, offset);
    let bypasses = csv::export_bypasses(&data.bypasses, offset);
    let buttons = csv::export_buttons(&data.buttons, offset);
    fs::write(out_dir.join(FILE_FAULTS), faults.content())?;
    fs::write(out_dir.join(FILE_BYPASS), bypasses.content())?;
    fs::write(out_dir.join(FILE_BUTTON), buttons.content())?;
    notices.extend(faults.skipped);
    notices.extend(bypasses.skipped);
    notices.extend(buttons.skipped);

    // Button/bypass channel config. Module resolution may prompt and
    // extend the registry; machines are built afterwards so they see
    // every module configured during this pass.
    let (channel, channel_notices) =
        json::build_channel_config(&data.bypasses, &data.buttons, num_com, &mut data.modules, op)?;
    notices.extend(channel_notices);
    fs::write(
        out_dir.join(FILE_CHANNEL),
        serde_json::to_string_pretty(&channel)?,
    )?;

    // Machine hierarchy with optional recipes.
    let mut machines = json::build_machines(&data.modules, op)?;
    json::attach_recipes(&mut machines, lang, op)?;
    let machine_count = machines.len();
    let config = json::MachinesConfig {
        coms: vec![json::MachinesCom { num: num_com, machines }],
    };
    fs::write(
        out_dir.join(FILE_MACHINES),
        serde_json::to_string_pretty(&config)?,
    )?;

    Ok(ProdReport {
        out_dir: out_dir.to_path_buf(),
        faults: data.faults.len(),
        bypasses: data.bypasses.len(),
        buttons: data.buttons.len(),
        machines: machine_count,
        notices,
    })
}

/// Diagnostic run: motor axes CSV.
pub fn run_diag(workbook_path: &Path, out_dir: &Path) -> PipelineResult<DiagReport> {
    fs::create_dir_all(out_dir)?;

    let motors = workbook::read_motors(workbook_path)?;
    let export = csv::export_motors(&motors);
    fs::write(out_dir.join(FILE_MOTOR), export.content())?;

    Ok(DiagReport {
        out_dir: out_dir.to_path_buf(),
        motors: motors.len(),
        // Minus the header row.
        exported: export.lines.len().saturating_sub(1),
        notices: export.skipped,
    })
}
