mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bidlens",
    version,
    about = "Locate extracted bid fields on OCR'd quote documents"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// OCR a PDF into per-page word boxes
    Ocr {
        /// Path to PDF file
        input_file: PathBuf,

        /// Write the OCR transcript to a JSON file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Engine config (JSON)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Raster scale (overrides config)
        #[arg(long)]
        scale: Option<f32>,

        /// Stop after this many pages
        #[arg(long, value_name = "N")]
        max_pages: Option<usize>,
    },
    /// Locate extracted line items and contact fields on an OCR transcript
    Locate {
        /// OCR transcript written by `bidlens ocr`
        #[arg(long, value_name = "FILE")]
        ocr: PathBuf,

        /// Stored extraction response(s), tried in order until one parses
        #[arg(short, long = "extracted", value_name = "FILE", required = true)]
        extracted: Vec<PathBuf>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Report boxes in scale-1 page units instead of raster pixels
        #[arg(long)]
        page_units: bool,

        /// Engine config (JSON), for the OCR scale
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Find a tag or text anywhere in an OCR transcript
    Find {
        /// Tag or text to look for (e.g. "TK-5031, -5032")
        text: String,

        /// OCR transcript written by `bidlens ocr`
        #[arg(long, value_name = "FILE")]
        ocr: PathBuf,

        /// Unit price expected on the same row
        #[arg(long)]
        unit_price: Option<String>,

        /// Line total expected on the same row
        #[arg(long)]
        line_total: Option<String>,
    },
    /// Repair and validate a stored extraction response
    Validate {
        /// Path to raw extraction response
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Ocr {
            input_file,
            out,
            config,
            scale,
            max_pages,
        } => commands::ocr::run(input_file, out, config, scale, max_pages),
        Commands::Locate {
            ocr,
            extracted,
            output,
            page_units,
            config,
        } => commands::locate::run(ocr, extracted, &output, page_units, config),
        Commands::Find {
            text,
            ocr,
            unit_price,
            line_total,
        } => commands::find::run(&text, ocr, unit_price.as_deref(), line_total.as_deref()),
        Commands::Validate { file } => commands::validate::validate(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
