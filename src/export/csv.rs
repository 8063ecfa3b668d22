//! Text-ID encoding and delimited exports.
//!
//! Every exportable text lands in one flat ID namespace. Each record class
//! owns a disjoint band so two classes can never collide:
//!
//! ```text
//! fault resolutions      [1_00_00_000; 2_00_00_000)   (code % 1_000_000 + base) * 100 + offset
//! button designations    [2_00_01_000; 2_00_02_000)   (number + base) * 100 + offset
//! button descriptions    [2_00_02_000; 2_00_03_000)
//! bypass designations    [2_00_03_000; 2_00_04_000)
//! bypass descriptions    [2_00_04_000; 2_00_05_000)
//! ```
//!
//! Each record emits an ARP line (locale offset 0) and a client line at the
//! chosen language's offset, in input order. A record whose natural key
//! does not parse is skipped with a notice; the run continues.

use crate::extract::columns::*;
use crate::extract::{field_text, value_text, Record};

/// Base of the fault-resolution band.
pub const BASE_ID_FAULT_DESCRIPTION: i64 = 1_00_00_000;
/// Base of the button designation band.
pub const BASE_ID_BUTTON_TEXT: i64 = 2_00_01_000;
/// Base of the button description band.
pub const BASE_ID_BUTTON_DESCRIPTION: i64 = 2_00_02_000;
/// Base of the bypass designation band.
pub const BASE_ID_BYPASS_TEXT: i64 = 2_00_03_000;
/// Base of the bypass description band.
pub const BASE_ID_BYPASS_DESCRIPTION: i64 = 2_00_04_000;

/// Fault codes are folded into their band modulo this.
const FAULT_CODE_MODULUS: i64 = 1_000_000;

// =============================================================================
// Export result
// =============================================================================

/// Lines produced by an export plus per-record skip notices.
#[derive(Debug, Default)]
pub struct CsvExport {
    pub lines: Vec<String>,
    pub skipped: Vec<String>,
}

impl CsvExport {
    fn new() -> Self {
        Self::default()
    }

    /// Newline-joined content with a trailing newline.
    pub fn content(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

// =============================================================================
// Line forms
// =============================================================================

/// One `id:"text";` line. Embedded quotes are doubled; absent text
/// serializes as the empty string.
fn text_line(id: i64, text: Option<&str>) -> String {
    let safe = text.unwrap_or("").replace('"', "\"\"");
    format!("{}:\"{}\";", id, safe)
}

/// Semicolon-terminated field join for the motor file.
fn delimited_line(values: &[&str]) -> String {
    let mut out = values.join(";");
    out.push(';');
    out
}

/// Raw (untrimmed) text of a field, if the record carries it at all.
fn raw_text(record: &Record, key: &str) -> Option<String> {
    record.get(key).map(value_text)
}

// =============================================================================
// Fault export
// =============================================================================

/// Encode fault resolutions: two lines per fault, ARP then client.
pub fn export_faults(faults: &[Record], lang_offset: i64) -> CsvExport {
    let mut export = CsvExport::new();

    for fault in faults {
        let Some(code) = fault.get(COL_FAULT_CODE) else {
            continue;
        };
        let code_text = value_text(code).replace(' ', "");
        let Ok(code) = code_text.parse::<i64>() else {
            export
                .skipped
                .push(format!("Invalid fault code: {}", value_text(&fault[COL_FAULT_CODE])));
            continue;
        };

        let base = (code % FAULT_CODE_MODULUS + BASE_ID_FAULT_DESCRIPTION) * 100;
        let arp = raw_text(fault, COL_FAULT_RESOLUTION_ARP);
        let client = raw_text(fault, COL_FAULT_RESOLUTION_CLIENT);
        export.lines.push(text_line(base, arp.as_deref()));
        export.lines.push(text_line(base + lang_offset, client.as_deref()));
    }

    export
}

// =============================================================================
// Bypass / button exports
// =============================================================================

/// Shared encoder for the numbered record classes: four lines per record
/// (designation ARP/client, description ARP/client).
fn export_numbered(
    records: &[Record],
    designation_base: i64,
    description_base: i64,
    lang_offset: i64,
    label: &str,
) -> CsvExport {
    let mut export = CsvExport::new();

    for record in records {
        let Some(num) = record.get(COL_NUM) else {
            continue;
        };
        let Ok(num) = value_text(num).trim().parse::<i64>() else {
            export
                .skipped
                .push(format!("Invalid {} number: {}", label, value_text(&record[COL_NUM])));
            continue;
        };

        let designation = (num + designation_base) * 100;
        let description = (num + description_base) * 100;

        let designation_arp = raw_text(record, COL_DESIGNATION_ARP);
        let designation_client = raw_text(record, COL_DESIGNATION_CLIENT);
        let description_arp = raw_text(record, COL_DESCRIPTION_ARP);
        let description_client = raw_text(record, COL_DESCRIPTION_CLIENT);

        export.lines.push(text_line(designation, designation_arp.as_deref()));
        export
            .lines
            .push(text_line(designation + lang_offset, designation_client.as_deref()));
        export.lines.push(text_line(description, description_arp.as_deref()));
        export
            .lines
            .push(text_line(description + lang_offset, description_client.as_deref()));
    }

    export
}

/// Encode bypass designations and descriptions.
pub fn export_bypasses(bypasses: &[Record], lang_offset: i64) -> CsvExport {
    export_numbered(
        bypasses,
        BASE_ID_BYPASS_TEXT,
        BASE_ID_BYPASS_DESCRIPTION,
        lang_offset,
        "bypass",
    )
}

/// Encode button designations and descriptions.
pub fn export_buttons(buttons: &[Record], lang_offset: i64) -> CsvExport {
    export_numbered(
        buttons,
        BASE_ID_BUTTON_TEXT,
        BASE_ID_BUTTON_DESCRIPTION,
        lang_offset,
        "button",
    )
}

// =============================================================================
// Motor export
// =============================================================================

/// Encode the motor axes file: a header row then one row per kept motor.
///
/// Only motors whose type contains `MB` are kept; the axis name is
/// prefixed. A motor without a gearbox reference or with an unparsable
/// feed constant is skipped with a notice.
pub fn export_motors(motors: &[Record]) -> CsvExport {
    let mut export = CsvExport::new();
    export
        .lines
        .push(delimited_line(&["axname", "refGearBox", "feedconstant"]));

    for motor in motors {
        let Some(motor_type) = field_text(motor, COL_MOTOR_TYPE) else {
            continue;
        };
        if !motor_type.to_lowercase().contains(&MOTOR_TYPE_KEEP.to_lowercase()) {
            continue;
        }
        let Some(name) = raw_text(motor, COL_MOTOR_AXNAME).filter(|s| !s.is_empty()) else {
            continue;
        };
        let axname = format!("{}{}", MOTOR_AXNAME_PREFIX, name);

        let Some(gear) = field_text(motor, COL_MOTOR_GEAR) else {
            export
                .skipped
                .push(format!("Missing gearbox reference for {} => not generated.", axname));
            continue;
        };

        let feed_text = raw_text(motor, COL_MOTOR_FEED).unwrap_or_default();
        let Ok(feed) = feed_text.trim().parse::<f64>() else {
            export.skipped.push(format!(
                "Invalid feed constant for {}: {} => not generated.",
                axname, feed_text
            ));
            continue;
        };

        // Whole values keep a decimal point ("360.0"), matching what the
        // downstream tooling has always received.
        let feed = if feed.fract() == 0.0 {
            format!("{:.1}", feed)
        } else {
            feed.to_string()
        };
        export.lines.push(delimited_line(&[&axname, &gear, &feed]));
    }

    export
}
