//! Gridport CLI - tabular import and block partition/merge tool

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gridport::prelude::*;
use gridport::{CsvWriteOptions, CsvWriter, LineTerminator};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gridport")]
#[command(
    author,
    version,
    about = "Import tabular files into typed grids; partition and merge blocks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a file and write the typed grid as CSV to stdout or a file
    #[command(alias = "csv")]
    ToCsv {
        /// Input file (csv, tsv)
        input: PathBuf,

        /// Output CSV file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        import: ImportArgs,

        /// Field delimiter for the output (default: comma)
        #[arg(short, long, default_value = ",")]
        delimiter: char,
    },

    /// Show information about an importable file
    Info {
        /// Input file
        input: PathBuf,
    },

    /// Partition an imported grid into blocks, one CSV file per block
    Blocks {
        /// Input file
        input: PathBuf,

        /// Directory receiving block_<n>.csv files
        #[arg(short, long)]
        output_dir: PathBuf,

        #[command(flatten)]
        import: ImportArgs,

        #[command(flatten)]
        blocks: BlockArgs,
    },

    /// Partition an imported grid and merge the blocks back into one grid
    Merge {
        /// Input file
        input: PathBuf,

        /// Output CSV file for the merged grid (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        import: ImportArgs,

        #[command(flatten)]
        blocks: BlockArgs,

        /// Duplicate-row conflict strategy
        #[arg(long, value_enum, default_value = "append")]
        strategy: StrategyArg,

        /// Key column names for duplicate detection (default: all columns)
        #[arg(long, value_delimiter = ',')]
        keys: Vec<String>,

        /// Print merge statistics as JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct ImportArgs {
    /// Treat the first row as data, not a header
    #[arg(long)]
    no_header: bool,

    /// Treat (...)-wrapped cells as negative numbers
    #[arg(long)]
    brackets: bool,

    /// Accept 8-digit YYYYMMDD text into date columns
    #[arg(long)]
    numeric_dates: bool,
}

#[derive(clap::Args)]
struct BlockArgs {
    /// Rows per block
    #[arg(long)]
    block_rows: usize,

    /// Columns per block (default: all columns in one block)
    #[arg(long)]
    block_columns: Option<usize>,

    /// What to do when the grid does not divide evenly
    #[arg(long, value_enum, default_value = "error")]
    remainder: RemainderArg,

    /// Block emission order
    #[arg(long, value_enum, default_value = "top-down-left-right")]
    traversal: TraversalArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum RemainderArg {
    Error,
    Fill,
    Truncate,
}

#[derive(Clone, Copy, ValueEnum)]
enum TraversalArg {
    TopDownLeftRight,
    LeftRightTopDown,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    Append,
    Overwrite,
    Ignore,
}

impl ImportArgs {
    fn settings(&self) -> ImportSettings {
        let base = if self.no_header {
            ImportSettings::without_header()
        } else {
            ImportSettings::default()
        };
        ImportSettings {
            bracket_negative: self.brackets,
            accept_numeric_as_date: self.numeric_dates,
            ..base
        }
    }
}

impl BlockArgs {
    fn options(&self) -> MatrixExportOptions {
        MatrixExportOptions {
            block_rows: Some(self.block_rows),
            block_columns: self.block_columns,
            remainder: Some(match self.remainder {
                RemainderArg::Error => RemainderMode::Error,
                RemainderArg::Fill => RemainderMode::Fill,
                RemainderArg::Truncate => RemainderMode::Truncate,
            }),
            traversal: match self.traversal {
                TraversalArg::TopDownLeftRight => Traversal::TopDownLeftRight,
                TraversalArg::LeftRightTopDown => Traversal::LeftRightTopDown,
            },
            ..MatrixExportOptions::default()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::ToCsv {
            input,
            output,
            import,
            delimiter,
        } => to_csv(&input, output.as_deref(), &import, delimiter),
        Commands::Info { input } => show_info(&input),
        Commands::Blocks {
            input,
            output_dir,
            import,
            blocks,
        } => write_blocks(&input, &output_dir, &import, &blocks),
        Commands::Merge {
            input,
            output,
            import,
            blocks,
            strategy,
            keys,
            json,
        } => merge(&input, output.as_deref(), &import, &blocks, strategy, keys, json),
    }
}

fn write_options(delimiter: char) -> Result<CsvWriteOptions> {
    if !delimiter.is_ascii() {
        bail!("delimiter must be an ASCII character");
    }
    Ok(CsvWriteOptions {
        delimiter: delimiter as u8,
        line_terminator: LineTerminator::LF,
        ..CsvWriteOptions::default()
    })
}

fn write_grid(grid: &Grid, output: Option<&Path>, options: &CsvWriteOptions) -> Result<()> {
    match output {
        Some(path) => CsvWriter::write_file(grid, path, options)
            .with_context(|| format!("Failed to write '{}'", path.display()))?,
        None => {
            CsvWriter::write(grid, io::stdout().lock(), options)
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

fn report_log(log: &ImportLog) {
    for entry in log.iter() {
        eprintln!("warning: {}", entry);
    }
}

fn to_csv(
    input: &Path,
    output: Option<&Path>,
    import: &ImportArgs,
    delimiter: char,
) -> Result<()> {
    let result = read_grid(input, &import.settings())
        .with_context(|| format!("Failed to import '{}'", input.display()))?;
    report_log(&result.log);

    write_grid(&result.grid, output, &write_options(delimiter)?)?;
    if let Some(path) = output {
        eprintln!(
            "Wrote {} rows to '{}'",
            result.grid.row_count(),
            path.display()
        );
    }
    Ok(())
}

fn show_info(input: &Path) -> Result<()> {
    let book = open_workbook(input)
        .with_context(|| format!("Failed to open '{}'", input.display()))?;

    println!("File: {}", input.display());
    println!("Sheets: {}", book.sheet_count());

    for (i, name) in book.sheet_names().iter().enumerate() {
        if let Some(sheet) = book.sheet_by_index(i) {
            println!();
            println!("  Sheet {}: \"{}\"", i, name);
            println!(
                "    Extent: {} rows x {} columns",
                sheet.row_count(),
                sheet.column_count()
            );
        }
    }

    Ok(())
}

fn write_blocks(
    input: &Path,
    output_dir: &Path,
    import: &ImportArgs,
    blocks: &BlockArgs,
) -> Result<()> {
    let (blocks, log) = read_blocks(input, &import.settings(), &blocks.options())
        .with_context(|| format!("Failed to partition '{}'", input.display()))?;
    report_log(&log);

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create '{}'", output_dir.display()))?;

    let options = write_options(',')?;
    for (i, block) in blocks.iter().enumerate() {
        let path = output_dir.join(format!("block_{}.csv", i));
        CsvWriter::write_file(block, &path, &options)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
    }
    eprintln!(
        "Wrote {} block(s) to '{}'",
        blocks.len(),
        output_dir.display()
    );
    Ok(())
}

fn merge(
    input: &Path,
    output: Option<&Path>,
    import: &ImportArgs,
    blocks: &BlockArgs,
    strategy: StrategyArg,
    keys: Vec<String>,
    json: bool,
) -> Result<()> {
    let merge_options = MergeOptions {
        strategy: match strategy {
            StrategyArg::Append => MergeStrategy::Append,
            StrategyArg::Overwrite => MergeStrategy::Overwrite,
            StrategyArg::Ignore => MergeStrategy::Ignore,
        },
        key_columns: keys,
    };

    let result = read_merged(input, &import.settings(), &blocks.options(), &merge_options)
        .with_context(|| format!("Failed to merge '{}'", input.display()))?;
    report_log(&result.log);

    if json {
        // Stats go to stdout; the grid is only written when -o names a file.
        println!("{}", serde_json::to_string_pretty(&result.statistics)?);
        if let Some(path) = output {
            write_grid(&result.grid, Some(path), &write_options(',')?)?;
        }
    } else {
        write_grid(&result.grid, output, &write_options(',')?)?;
        let stats = &result.statistics;
        eprintln!(
            "Merged {} block(s): {} successful, {} duplicate row(s), {} conversion failure(s), {} ms",
            stats.total_blocks,
            stats.successful_blocks,
            stats.duplicate_rows,
            stats.conversion_failures,
            stats.elapsed_ms
        );
    }
    Ok(())
}
