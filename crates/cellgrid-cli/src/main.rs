//! Cellgrid CLI - extract normalized cell grids from workbook files

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cellgrid_engine::{extract_sheet, ExtractOptions, DEFAULT_MAX_DRAWING_PROBES};
use cellgrid_xlsx::{load_path, sheet_model, sheet_model_by_name, sheet_names};

#[derive(Parser)]
#[command(name = "cellgrid")]
#[command(author, version, about = "Extract per-cell records from spreadsheet files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one sheet as a JSON grid of cell records
    Grid {
        /// Input workbook file (xlsx)
        input: PathBuf,

        /// Output JSON file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Sheet name (default: first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Ceiling on drawing objects processed per sheet
        #[arg(long, default_value_t = DEFAULT_MAX_DRAWING_PROBES)]
        max_drawing_probes: u32,
    },

    /// Show summary information about a workbook
    Info {
        /// Input workbook file
        input: PathBuf,
    },

    /// List all sheets in a workbook
    Sheets {
        /// Input workbook file
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Grid {
            input,
            output,
            sheet,
            pretty,
            max_drawing_probes,
        } => grid(
            &input,
            output.as_deref(),
            sheet.as_deref(),
            pretty,
            max_drawing_probes,
        ),
        Commands::Info { input } => info(&input),
        Commands::Sheets { input } => sheets(&input),
    }
}

fn grid(
    input: &Path,
    output: Option<&Path>,
    sheet: Option<&str>,
    pretty: bool,
    max_drawing_probes: u32,
) -> Result<()> {
    let book =
        load_path(input).with_context(|| format!("Failed to open '{}'", input.display()))?;

    let model = match sheet {
        Some(name) => sheet_model_by_name(&book, name)
            .with_context(|| format!("Sheet '{}' not found", name))?,
        None => sheet_model(&book, 0).context("Workbook has no sheets")?,
    };

    let opts = ExtractOptions { max_drawing_probes };
    let grid = extract_sheet(&model, &opts)
        .with_context(|| format!("Failed to extract '{}'", model.name))?;

    let json = if pretty {
        serde_json::to_string_pretty(&grid)?
    } else {
        serde_json::to_string(&grid)?
    };

    match output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write '{}'", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json)?;
        }
    }

    Ok(())
}

fn info(input: &Path) -> Result<()> {
    let book =
        load_path(input).with_context(|| format!("Failed to open '{}'", input.display()))?;

    println!("File: {}", input.display());
    let names = sheet_names(&book);
    println!("Sheets: {}", names.len());

    for name in &names {
        match sheet_model_by_name(&book, name) {
            Ok(model) => {
                println!(
                    "  {}: {} rows x {} cols, {} cells, {} merges, {} drawings",
                    name,
                    model.rows,
                    model.cols,
                    model.cells.len(),
                    model.merges.len(),
                    model.drawings.len()
                );
            }
            Err(err) => println!("  {}: unreadable ({})", name, err),
        }
    }

    Ok(())
}

fn sheets(input: &Path) -> Result<()> {
    let book =
        load_path(input).with_context(|| format!("Failed to open '{}'", input.display()))?;

    for (i, name) in sheet_names(&book).iter().enumerate() {
        println!("{}: {}", i, name);
    }

    Ok(())
}
