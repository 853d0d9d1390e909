//! unresume CLI - resume text extraction tool

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use unresume::{
    to_json, DocumentFormat, ExtractOptions, ExtractionResult, Extractor, InputDocument,
    JsonFormat,
};

#[derive(Parser)]
#[command(name = "unresume")]
#[command(version)]
#[command(about = "Extract plain text from PDF, DOCX, ODT, RTF and TXT resumes", long_about = None)]
struct Cli {
    /// Input file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(flatten)]
    extract: ExtractArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone)]
struct ExtractArgs {
    /// Warn when fewer characters than this are extracted
    #[arg(
        long,
        global = true,
        env = "UNRESUME_MIN_CHARS",
        default_value_t = unresume::options::DEFAULT_SHORT_TEXT_THRESHOLD
    )]
    min_chars: usize,

    /// Maximum decompressed size of a single archive entry or PDF stream, in MB
    #[arg(
        long,
        global = true,
        env = "UNRESUME_MAX_DECOMPRESSED_MB",
        default_value_t = 64
    )]
    max_decompressed_mb: usize,

    /// Do not inflate FlateDecode PDF streams
    #[arg(long, global = true)]
    no_inflate: bool,
}

impl ExtractArgs {
    fn options(&self) -> ExtractOptions {
        ExtractOptions::new()
            .with_short_text_threshold(self.min_chars)
            .with_max_decompressed_bytes(self.max_decompressed_mb.saturating_mul(1024 * 1024))
            .with_pdf_stream_inflation(!self.no_inflate)
    }

    fn extractor(&self) -> Extractor {
        Extractor::new().with_options(self.options())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a single file
    Extract {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output the full result as JSON
        #[arg(long)]
        json: bool,

        /// Output compact JSON (implies --json)
        #[arg(long)]
        compact: bool,
    },

    /// Show detected type, metadata and warnings
    Info {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Extract text from many files in parallel
    Batch {
        /// Input files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "unresume_output")]
        output: PathBuf,

        /// Write one JSON result per input instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let extract_args = cli.extract;

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            json,
            compact,
        }) => cmd_extract(&extract_args, &input, output.as_deref(), json, compact),
        Some(Commands::Info { input }) => cmd_info(&extract_args, &input),
        Some(Commands::Batch {
            inputs,
            output,
            json,
        }) => cmd_batch(&extract_args, &inputs, &output, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: extract to stdout if input is provided
            if let Some(input) = cli.input {
                cmd_extract(&extract_args, &input, None, false, false)
            } else {
                println!("{}", "Usage: unresume <FILE>".yellow());
                println!("       unresume --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Render a result as plain text or JSON.
fn render(result: &ExtractionResult, json: bool, compact: bool) -> unresume::Result<String> {
    if compact {
        to_json(result, JsonFormat::Compact)
    } else if json {
        to_json(result, JsonFormat::Pretty)
    } else {
        Ok(result.text.clone())
    }
}

/// Output paths for batch inputs: `<dir>/<file name>.txt` or `.json`.
///
/// The full input file name is kept so `cv.pdf` and `cv.docx` do not
/// collide. Inputs from different directories that share a file name get
/// `-2`, `-3`, ... appended so no result overwrites another.
fn batch_output_paths(dir: &Path, inputs: &[PathBuf], json: bool) -> Vec<PathBuf> {
    let ext = if json { "json" } else { "txt" };
    let mut taken = HashSet::new();

    inputs
        .iter()
        .map(|input| {
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "input".to_string());
            let mut candidate = format!("{}.{}", name, ext);
            let mut index = 2;
            while !taken.insert(candidate.clone()) {
                candidate = format!("{}-{}.{}", name, index, ext);
                index += 1;
            }
            dir.join(candidate)
        })
        .collect()
}

fn print_warnings(label: &str, result: &ExtractionResult) {
    for warning in &result.warnings {
        eprintln!("{} {}: {}", "Warning".yellow().bold(), label, warning.yellow());
    }
}

fn cmd_extract(
    args: &ExtractArgs,
    input: &Path,
    output: Option<&Path>,
    json: bool,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let document = InputDocument::from_path(input)?;
    let result = args.extractor().extract_input(&document);
    log::debug!("{} -> {:?}", input.display(), result.meta);

    let rendered = render(&result, json, compact)?;
    print_warnings(&document.filename, &result);

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn meta_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cmd_info(args: &ExtractArgs, input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let document = InputDocument::from_path(input)?;
    let result = args.extractor().extract_input(&document);

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {} bytes", "Size".bold(), document.bytes.len());
    let format = DocumentFormat::from_filename(&document.filename);
    let support = if format.is_supported() {
        "supported".green()
    } else {
        "unsupported".red()
    };
    println!("{}: {} ({})", "Format".bold(), format, support);

    for (key, value) in result.meta.iter().filter(|(k, _)| *k != "detected_type") {
        println!("{}: {}", key.bold(), meta_value(value));
    }

    println!();
    println!("{}", "Warnings".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    if result.warnings.is_empty() {
        println!("{}", "None".green());
    } else {
        for warning in &result.warnings {
            println!("  {} {}", "!".yellow().bold(), warning.yellow());
        }
    }

    Ok(())
}

fn cmd_batch(
    args: &ExtractArgs,
    inputs: &[PathBuf],
    output_dir: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(output_dir)?;

    let pb = ProgressBar::new(inputs.len() as u64 * 2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading files...");
    let mut documents = Vec::with_capacity(inputs.len());
    for input in inputs {
        documents.push(InputDocument::from_path(input)?);
        pb.inc(1);
    }

    pb.set_message("Extracting...");
    pb.enable_steady_tick(Duration::from_millis(100));
    let results = args.extractor().extract_batch(&documents);

    pb.set_message("Writing results...");
    let mut warned = 0;
    let paths = batch_output_paths(output_dir, inputs, json);
    for (path, result) in paths.iter().zip(&results) {
        let rendered = render(result, json, false)?;
        fs::write(path, rendered)?;
        if !result.warnings.is_empty() {
            warned += 1;
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    for (document, result) in documents.iter().zip(&results) {
        print_warnings(&document.filename, result);
    }

    println!(
        "\n{} {} files written to {}",
        "Done!".green().bold(),
        results.len(),
        output_dir.display()
    );
    if warned > 0 {
        println!("{} {} files had warnings", "Note:".yellow(), warned);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "unresume".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Resume text extraction tool");
    println!();
    println!("Formats: PDF, DOCX, ODT, RTF, TXT");
    println!("License: MIT");
}
