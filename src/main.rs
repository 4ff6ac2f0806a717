//! quantity-surveyor CLI
//!
//! Sends a construction drawing to Gemini and prints the Bill of Quantities
//! and Bar Bending Schedule it finds.

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use quantity_surveyor::auth::resolve_api_key;
use quantity_surveyor::extraction::{Extraction, NormalizeOptions, Summary, DEFAULT_LENGTH_TOLERANCE};
use quantity_surveyor::report::{
    format_bbs_table, format_boq_table, format_bullets, format_statistics, save_results, RULE_WIDTH,
};
use quantity_surveyor::{LogLevel, QuantitySurveyor, SurveyorConfig};
use secrecy::SecretString;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_OUTPUT_DIR: &str = "output";
const API_KEY_URL: &str = "https://makersuite.google.com/app/apikey";

#[derive(Parser)]
#[command(
    name = "quantity-surveyor",
    version,
    about = "Extract a Bill of Quantities and Bar Bending Schedule from a drawing PDF",
    after_help = "EXAMPLES:\n  \
                  quantity-surveyor plan.pdf\n  \
                  quantity-surveyor plan.pdf --save --json\n  \
                  quantity-surveyor plan.pdf --output-dir results --check-lengths\n  \
                  quantity-surveyor --response-file output/raw_response.txt --json"
)]
struct Cli {
    /// Drawing to analyze (prompted for when omitted)
    pdf: Option<PathBuf>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model to use
    #[arg(long)]
    model: Option<String>,

    /// Save results into this directory
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Save results into ./output
    #[arg(long)]
    save: bool,

    /// Print the result as pretty JSON
    #[arg(long)]
    json: bool,

    /// Parse a saved model response instead of calling the API
    #[arg(long, value_name = "FILE", conflicts_with = "pdf")]
    response_file: Option<PathBuf>,

    /// Flag BBS items whose total length differs from count x length
    #[arg(long)]
    check_lengths: bool,

    /// Allowed relative difference for --check-lengths
    #[arg(long, value_name = "FRACTION", default_value_t = DEFAULT_LENGTH_TOLERANCE)]
    length_tolerance: f64,

    /// Leave the uploaded drawing on the Gemini file service
    #[arg(long)]
    keep_upload: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    print_banner();

    let options = NormalizeOptions {
        check_lengths: cli.check_lengths,
        length_tolerance: cli.length_tolerance,
    };
    let interactive = std::io::stdin().is_terminal();

    let extraction = match &cli.response_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read response file {}", path.display()))?;
            quantity_surveyor::analyze_response(&text, &options)
        }
        None => analyze_drawing(&cli, options).await?,
    };

    print_extraction(&extraction);

    let output_dir = match (&cli.output_dir, cli.save) {
        (Some(dir), _) => Some(dir.clone()),
        (None, true) => Some(PathBuf::from(DEFAULT_OUTPUT_DIR)),
        (None, false) if interactive && !cli.json => ask_output_dir()?,
        (None, false) => None,
    };
    if let Some(dir) = output_dir {
        save(&extraction, &dir)?;
    }

    let show_json = cli.json
        || (interactive && !cli.save && cli.output_dir.is_none() && confirm("\nShow JSON? (y/n): ")?);
    if show_json {
        print_heading("JSON OUTPUT");
        let json = serde_json::to_string_pretty(&extraction.result)
            .context("Failed to serialize result")?;
        println!("{}", json);
    }

    println!("\n{}", "Analysis complete!".green().bold());
    Ok(())
}

async fn analyze_drawing(cli: &Cli, options: NormalizeOptions) -> Result<Extraction> {
    let pdf = match &cli.pdf {
        Some(path) => path.clone(),
        None => PathBuf::from(prompt("Enter PDF path: ")?),
    };
    if !pdf.is_file() {
        bail!("File not found: {}", pdf.display());
    }

    let api_key = match resolve_api_key(cli.api_key.as_deref()) {
        Some(key) => key,
        None => {
            println!("{}", "Gemini API key setup".bold());
            println!("Get your key: {}", API_KEY_URL);
            let key = prompt("Enter API key: ")?;
            if key.is_empty() {
                bail!("API key required");
            }
            SecretString::new(key)
        }
    };

    let mut builder = SurveyorConfig::builder()
        .api_key(api_key)
        .apply_env()
        .context("Invalid GEMINI_* environment settings")?
        .log_level(if cli.verbose { LogLevel::Debug } else { LogLevel::Info });
    if let Some(model) = &cli.model {
        builder = builder.model(model);
    }
    let config = builder.build().context("Invalid configuration")?;

    let surveyor = QuantitySurveyor::builder(config)
        .normalize_options(options)
        .keep_upload(cli.keep_upload)
        .build()
        .context("Failed to create surveyor")?;

    println!("Analyzing {} with {}...\n", pdf.display(), surveyor.config().model);
    surveyor
        .analyze_pdf(&pdf)
        .await
        .with_context(|| format!("Failed to analyze {}", pdf.display()))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_banner() {
    let rule = "=".repeat(RULE_WIDTH);
    println!("\n{}", rule);
    println!("{}", "CONSTRUCTION QUANTITY SURVEYOR".bold());
    println!("Powered by Google Gemini AI");
    println!("{}\n", rule);
}

fn print_heading(title: &str) {
    let rule = "=".repeat(RULE_WIDTH);
    println!("{}", rule);
    println!("{}", title.cyan().bold());
    println!("{}", rule);
}

fn print_extraction(extraction: &Extraction) {
    let result = &extraction.result;

    if let Some(error) = &extraction.parse_error {
        println!("{} {}\n", "Could not parse the model response:".red().bold(), error);
        if let Some(raw) = &extraction.raw_text {
            print_heading("RAW RESPONSE");
            println!("{}\n", raw);
        }
    }

    println!("Scale: {}\n", result.scale.bold());

    print_heading("BILL OF QUANTITIES");
    println!("{}\n", format_boq_table(&result.boq));

    print_heading("BAR BENDING SCHEDULE");
    println!("{}\n", format_bbs_table(&result.bbs));

    if !result.notes.is_empty() {
        print_heading("NOTES");
        println!("{}", format_bullets(&result.notes));
    }

    if !result.assumptions.is_empty() {
        print_heading("ASSUMPTIONS");
        println!("{}", format_bullets(&result.assumptions));
    }

    if !extraction.report.is_clean() {
        for diagnostic in &extraction.report.diagnostics {
            println!("{} {}", "warning:".yellow().bold(), diagnostic);
        }
        println!();
    }

    print_heading("SUMMARY");
    print!("{}", format_statistics(&Summary::from_result(result)));
}

fn save(extraction: &Extraction, dir: &Path) -> Result<()> {
    let written = save_results(&extraction.result, extraction.raw_text.as_deref(), dir)
        .with_context(|| format!("Failed to save results to {}", dir.display()))?;

    println!("\n{} {}", "Saved results to".green(), dir.display());
    for path in written {
        println!("  {}", path.display());
    }
    Ok(())
}

fn ask_output_dir() -> Result<Option<PathBuf>> {
    if !confirm("\nSave results? (y/n): ")? {
        return Ok(None);
    }
    let dir = prompt(&format!("Output directory (default='{}'): ", DEFAULT_OUTPUT_DIR))?;
    Ok(Some(PathBuf::from(if dir.is_empty() { DEFAULT_OUTPUT_DIR } else { dir.as_str() })))
}

fn confirm(question: &str) -> Result<bool> {
    Ok(prompt(question)?.eq_ignore_ascii_case("y"))
}

fn prompt(question: &str) -> Result<String> {
    print!("{}", question);
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}
