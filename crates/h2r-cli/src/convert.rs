//! `hist2root` — AIDA text → histogram store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use h2r_aida::{ConvertOptions, convert_path};
use h2r_store::{DirectoryTreeSink, JsonStoreFile, StoreSink};

use crate::OutputFormat;

/// Fully resolved command-line arguments.
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    pub input: Option<PathBuf>,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub compact: bool,
    pub normalize: bool,
    pub strict: bool,
}

fn open_sink(args: &ConvertArgs) -> Result<Box<dyn StoreSink>> {
    let output = args.output.as_path();
    let sink: Box<dyn StoreSink> = match args.format {
        OutputFormat::Json => {
            let file = JsonStoreFile::create(output)
                .with_context(|| format!("failed to create {}", output.display()))?;
            Box::new(if args.compact { file.compact() } else { file })
        }
        OutputFormat::Dir => Box::new(
            DirectoryTreeSink::create(output)
                .with_context(|| format!("failed to create directory {}", output.display()))?,
        ),
    };
    Ok(sink)
}

pub fn cmd_convert(args: &ConvertArgs) -> Result<()> {
    // Output first: an unwritable destination fails before any input is read.
    let mut sink = open_sink(args)?;

    let input_label = match &args.input {
        Some(p) => p.display().to_string(),
        None => "<stdin>".to_string(),
    };
    let options = ConvertOptions { normalize: args.normalize, strict: args.strict };
    let (store, summary) = convert_path(args.input.as_deref(), options)
        .with_context(|| format!("failed to convert {input_label}"))?;

    info!("read {} lines, {} histograms", summary.lines, summary.histograms);
    if summary.discarded > 0 {
        info!("dropped {} unterminated record(s)", summary.discarded);
    }

    store
        .persist(sink.as_mut())
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    sink.finish().with_context(|| format!("failed to write {}", args.output.display()))?;

    eprintln!(
        "Converted {} histograms{} → {}",
        summary.histograms,
        match summary.event_count {
            Some(ec) => format!(" (normalized to {} events)", ec.value()),
            None => String::new(),
        },
        args.output.display(),
    );

    Ok(())
}
