//! machconf CLI - Convert machine configuration workbooks
//!
//! # Main Commands
//!
//! ```bash
//! machconf prod config.xlsx        # Full production export (CSV + JSON)
//! machconf diag config.xlsx        # Motor axes CSV export
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! machconf tables config.xlsx      # List every discovered table
//! ```
//!
//! When the workbook argument is omitted, the operator is prompted for a
//! path; a blank answer cancels the run.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use machconf::{
    ask_language, ask_workbook, discover_tables, open_tables, run_diag, run_prod,
    ConsoleOperator, Language, Operator,
};

#[derive(Parser)]
#[command(name = "machconf")]
#[command(about = "Convert machine configuration workbooks into AWM CSV and supervision JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full production export: defaut/bypass/button CSV + supervision JSON
    Prod {
        /// Input workbook (prompted for when omitted)
        workbook: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "out")]
        out_dir: PathBuf,

        /// Client language as a menu index (0=arp, 1=fr, 2=en, 3=es, 4=de)
        #[arg(short, long)]
        lang: Option<usize>,

        /// Communication channel number
        #[arg(short, long)]
        num_com: Option<i64>,
    },

    /// Motor axes export (diagnostic workbook)
    Diag {
        /// Input workbook (prompted for when omitted)
        workbook: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "out")]
        out_dir: PathBuf,
    },

    /// List every table discovered in the workbook
    Tables {
        /// Input workbook
        workbook: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Prod {
            workbook,
            out_dir,
            lang,
            num_com,
        } => cmd_prod(workbook, &out_dir, lang, num_com),

        Commands::Diag { workbook, out_dir } => cmd_diag(workbook, &out_dir),

        Commands::Tables { workbook } => cmd_tables(&workbook),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_prod(
    workbook: Option<PathBuf>,
    out_dir: &std::path::Path,
    lang: Option<usize>,
    num_com: Option<i64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut op = ConsoleOperator::new();

    let Some(workbook) = resolve_workbook(workbook, &mut op)? else {
        return Ok(());
    };

    let lang = match lang {
        Some(index) => Language::from_menu_index(index)
            .ok_or_else(|| format!("Invalid language index: {}", index))?,
        None => ask_language(&mut op)?,
    };
    let num_com = match num_com {
        Some(n) => n,
        None => op.ask_int("COM number: ")?,
    };

    eprintln!("Reading workbook: {}", workbook.display());
    let report = run_prod(&workbook, out_dir, lang, num_com, &mut op)?;

    for notice in &report.notices {
        eprintln!("  {}", notice);
    }
    eprintln!(
        "Exported {} faults, {} bypasses, {} buttons, {} machines",
        report.faults, report.bypasses, report.buttons, report.machines
    );
    eprintln!("Output written to: {}", report.out_dir.display());
    Ok(())
}

fn cmd_diag(
    workbook: Option<PathBuf>,
    out_dir: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut op = ConsoleOperator::new();

    let Some(workbook) = resolve_workbook(workbook, &mut op)? else {
        return Ok(());
    };

    eprintln!("Reading workbook: {}", workbook.display());
    let report = run_diag(&workbook, out_dir)?;

    for notice in &report.notices {
        eprintln!("  {}", notice);
    }
    eprintln!("Exported {} of {} motors", report.exported, report.motors);
    eprintln!("Output written to: {}", report.out_dir.display());
    Ok(())
}

fn cmd_tables(workbook: &std::path::Path) -> Result<(), Box<dyn std::error::Error>> {
    let wb = open_tables(workbook)?;
    let tables = discover_tables(&wb);

    if tables.is_empty() {
        eprintln!("No tables found.");
        return Ok(());
    }

    for table in tables {
        println!("{} / {} [{:?}]", table.sheet, table.name, table.kind);
    }
    Ok(())
}

/// Use the given workbook path or prompt for one. `None` means the
/// operator cancelled.
fn resolve_workbook(
    workbook: Option<PathBuf>,
    op: &mut ConsoleOperator,
) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    match workbook {
        Some(path) => Ok(Some(path)),
        None => Ok(ask_workbook(op)?),
    }
}
