//! Output encoders.
//!
//! - `csv`: flat text-ID exports (`defaut.csv`, `bypass.csv`,
//!   `button.csv`) and the motor axes file (`motor.csv`)
//! - `json`: supervision hierarchy (`config_button_bypass.json`,
//!   `config_machines.json`)

pub mod csv;
pub mod json;

pub use csv::{export_buttons, export_bypasses, export_faults, export_motors, CsvExport};
pub use json::{
    attach_recipes, build_channel_config, build_machines, ChannelConfig, ChannelEntry,
    MachinesConfig,
};
