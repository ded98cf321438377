//! ods - OpenDocument spreadsheet inspection tool

mod lessons;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ods_sheets::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ods")]
#[command(author, version, about = "OpenDocument spreadsheet inspection tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show information about a spreadsheet
    Info {
        /// Input .ods file
        input: PathBuf,
    },

    /// Print the cells of a sheet, tab separated
    Cells {
        /// Input .ods file
        input: PathBuf,

        /// Sheet index (0-based, default: 0)
        #[arg(short, long, default_value = "0")]
        sheet: usize,
    },

    /// Write the demonstration books into a directory
    Lessons {
        /// Output directory
        dir: PathBuf,

        /// Image for the image lesson (default: a built-in 1x1 PNG)
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input } => show_info(&input),
        Commands::Cells { input, sheet } => dump_cells(&input, sheet),
        Commands::Lessons { dir, image } => {
            let written = lessons::write_all(&dir, image.as_deref())?;
            eprintln!("Wrote {} books to '{}'", written.len(), dir.display());
            Ok(())
        }
    }
}

fn open(input: &Path) -> Result<Book> {
    Book::open(input).with_context(|| format!("Failed to open '{}'", input.display()))
}

fn show_info(input: &Path) -> Result<()> {
    let book = open(input)?;

    println!("File: {}", input.display());
    println!("Sheets: {}", book.sheet_count());
    println!("Cell styles: {}", book.styles().len());
    println!("Images: {}", book.media().len());

    for (i, sheet) in book.sheets().enumerate() {
        let cells = sheet.cells().count();
        let formulas = sheet.cells().filter(|c| c.has_formula()).count();

        println!();
        println!("  Sheet {}: \"{}\"", i, sheet.name());
        println!("    Rows: {}", sheet.row_count());
        println!("    Cells: {}", cells);
        println!("    Formulas: {}", formulas);
    }

    Ok(())
}

fn dump_cells(input: &Path, index: usize) -> Result<()> {
    let book = open(input)?;
    let sheet = book
        .sheet(index)
        .with_context(|| format!("Sheet index {} not found", index))?;

    let mut out = String::new();
    for cell in sheet.cells() {
        let formula = match cell.formula() {
            Some(formula) => match formula.error() {
                Some(error) => format!("error: {}", error),
                None => formula.to_odf(sheet.id(), &book)?,
            },
            None => String::new(),
        };
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            cell.cell_ref(),
            escape(&cell.display_text()),
            formula
        ));
    }

    io::stdout()
        .write_all(out.as_bytes())
        .context("Failed to write to stdout")?;
    Ok(())
}

/// Keep one cell per line
fn escape(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
}
