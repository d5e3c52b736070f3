//! hist2root CLI

mod convert;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, anyhow, bail};
use clap::{CommandFactory, Parser, ValueEnum};

use convert::{ConvertArgs, cmd_convert};

#[derive(Parser)]
#[command(name = "hist2root")]
#[command(about = "Convert AIDA histogram text into a hierarchical histogram store")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,

    /// Input AIDA text file. Defaults to stdin (also `-`).
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output store (JSON file, or directory with `--format dir`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Normalize to per-event densities and record the event count as `N`
    #[arg(short = 'w', long = "weights")]
    weights: bool,

    /// Fail if the input ends inside an unterminated record
    #[arg(long)]
    strict: bool,

    /// Output store layout
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write the JSON store on a single line instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// Legacy positional form: INPUT OUTPUT [toweights]
    #[arg(value_name = "ARGS")]
    args: Vec<String>,
}

/// Layout of the persisted store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON document holding the whole tree
    Json,
    /// One directory per store directory, one `<name>.json` per histogram
    Dir,
}

const LEGACY_NORMALIZE: &str = "toweights";

/// Merge flags and legacy positionals; flags win, positionals fill the
/// slots the flags left open, in order.
fn resolve_args(cli: Cli) -> Result<ConvertArgs> {
    let mut positional = cli.args.into_iter();
    let input = cli.input.or_else(|| positional.next().map(PathBuf::from));
    let output = cli.output.or_else(|| positional.next().map(PathBuf::from));
    let legacy_normalize = match positional.next() {
        None => false,
        Some(word) if word == LEGACY_NORMALIZE => true,
        Some(word) => bail!("unexpected argument '{word}' (expected '{LEGACY_NORMALIZE}')"),
    };
    if let Some(extra) = positional.next() {
        bail!("unexpected argument '{extra}'");
    }
    let output = output.ok_or_else(|| anyhow!("missing output path (-o OUTPUT)"))?;
    let input = input.filter(|p| p.as_os_str() != "-");
    if cli.compact && cli.format != OutputFormat::Json {
        bail!("--compact only applies to --format json");
    }

    Ok(ConvertArgs {
        input,
        output,
        format: cli.format,
        compact: cli.compact,
        normalize: cli.weights || legacy_normalize,
        strict: cli.strict,
    })
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help / --version are not failures.
            return if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = match resolve_args(cli) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("{}", Cli::command().render_usage());
            return ExitCode::FAILURE;
        }
    };

    match cmd_convert(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
