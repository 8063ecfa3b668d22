//! Workbook layout: table-name prefixes and column headers.
//!
//! The names are the external contract with the configuration workbook and
//! are kept verbatim, French headers included.

/// Cell holding the sheet's owning module identifier (B3).
pub const CELL_MODULE_ID: (u32, u32) = (2, 1);

// =============================================================================
// Summary table (module configuration)
// =============================================================================

pub const TABLE_SUMMARY: &str = "T_Sommaire";
pub const COL_SUMMARY_MODULE: &str = "N° Module";
pub const COL_SUMMARY_NUM_MACHINE: &str = "N° Machine";
pub const COL_SUMMARY_NUM_MODULE: &str = "N° Unit";
pub const COL_SUMMARY_NAME_LANG_1: &str = "Nom Langue 1";
pub const COL_SUMMARY_NAME_LANG_2: &str = "Nom Langue 2";

// =============================================================================
// Fault tables
// =============================================================================

pub const TABLE_FAULT_PREFIX: &str = "T_Defaut";
pub const COL_FAULT_CODE: &str = "Code défaut";
pub const COL_FAULT_RESOLUTION_ARP: &str = "Résolution ARP";
pub const COL_FAULT_RESOLUTION_CLIENT: &str = "Résolution Client";

// =============================================================================
// Bypass / button recap tables (shared columns)
// =============================================================================

pub const TABLE_BYPASS: &str = "T_RecapShunt";
pub const TABLE_BUTTON: &str = "T_RecapBtn";
pub const TABLE_BYPASS_EM_PREFIX: &str = "T_Shunt_U";
pub const TABLE_BUTTON_EM_PREFIX: &str = "T_Action_U";

pub const COL_NUM: &str = "N°";
pub const COL_NUM_MODULE: &str = "N° Module";
pub const COL_DESIGNATION_ARP: &str = "Désignation ARP";
pub const COL_DESIGNATION_CLIENT: &str = "Désignation Client";
pub const COL_DESCRIPTION_ARP: &str = "Description ARP";
pub const COL_DESCRIPTION_CLIENT: &str = "Description Client";
pub const COL_CHECK: &str = "Check1";

/// Alias column inside an EM table (keys the per-sheet lookup).
pub const COL_ALIAS: &str = "Repère";
/// Column on a bypass recap row pointing at its EM table alias.
pub const COL_BYPASS_EM_ALIAS: &str = "Shunt";
/// Column on a button recap row pointing at its EM table alias.
pub const COL_BUTTON_EM_ALIAS: &str = "Btn";

// =============================================================================
// Motor tables
// =============================================================================

pub const TABLE_MOTOR_PREFIX: &str = "T_Mot";
pub const COL_MOTOR_AXNAME: &str = "Repère";
pub const COL_MOTOR_GEAR: &str = "Réducteur";
pub const COL_MOTOR_FEED: &str = "Feed constant";
pub const COL_MOTOR_TYPE: &str = "Type";

/// Only motors of this type are exported.
pub const MOTOR_TYPE_KEEP: &str = "MB";
/// Prefix added to exported axis names.
pub const MOTOR_AXNAME_PREFIX: &str = "V";
