//! One-shot conversion driver: lines → parser → (normalizer) → store.

use std::io::BufRead;
use std::path::Path;

use tracing::info;

use h2r_store::Store;

use crate::error::Result;
use crate::events::EventCount;
use crate::lines::LineSource;
use crate::normalize::normalize;
use crate::parser::AidaParser;

/// Conversion settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Rescale to per-event densities and record the event count (`-w`).
    pub normalize: bool,
    /// Reject an unterminated trailing record instead of dropping it.
    pub strict: bool,
}

/// What a conversion did.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSummary {
    /// Records inserted into the store (the `N` record not included).
    pub histograms: usize,
    /// Unterminated records dropped at end of input.
    pub discarded: usize,
    /// Event count applied, in normalization mode.
    pub event_count: Option<EventCount>,
    /// Physical lines read.
    pub lines: usize,
}

/// Convert everything readable from `reader`.
pub fn convert_reader<R: BufRead>(
    reader: R,
    options: ConvertOptions,
) -> Result<(Store, ConvertSummary)> {
    convert_lines(LineSource::new(reader), options)
}

/// Convert the file at `input`, or standard input when `None` or `-`.
pub fn convert_path(
    input: Option<&Path>,
    options: ConvertOptions,
) -> Result<(Store, ConvertSummary)> {
    match input {
        Some(p) => info!("reading {}", p.display()),
        None => info!("reading standard input"),
    }
    convert_lines(LineSource::open(input)?, options)
}

fn convert_lines<R: BufRead>(
    mut lines: LineSource<R>,
    options: ConvertOptions,
) -> Result<(Store, ConvertSummary)> {
    let mut parser = AidaParser::new(options);
    for item in lines.by_ref() {
        let (line, text) = item?;
        parser.feed(line, &text)?;
    }
    let n_lines = lines.line_number();
    let out = parser.finish(n_lines)?;

    let mut store = out.store;
    let event_count = if options.normalize {
        normalize(&mut store, out.event_count.value())?;
        Some(out.event_count)
    } else {
        None
    };

    Ok((
        store,
        ConvertSummary {
            histograms: out.records,
            discarded: out.discarded,
            event_count,
            lines: n_lines,
        },
    ))
}
