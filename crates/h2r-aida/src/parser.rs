//! The AIDA text state machine.
//!
//! ```text
//!            "# BEGIN HISTOGRAM"          non-property line
//!   Begin ───────────────────────▶ Prop ──────────────────▶ Bin ◀─┐
//!     ▲                                   (re-dispatched)    │    │ other '#'
//!     │                                                '#'   ▼    │
//!     └────────────────── "# END HISTOGRAM" ─────────────── End ──┘
//! ```
//!
//! A handler that decides a line belongs to the next state returns
//! `Step::Redispatch`, and the same line is run through that state's
//! handler before the next line is read.

use tracing::{debug, warn};

use h2r_store::Store;

use crate::ConvertOptions;
use crate::builder::{HistogramRecord, insert_record};
use crate::error::{Expected, FormatError, Result};
use crate::events::{EventCount, FINALIZE_MARKER};

const BEGIN_MARKER: &str = "# BEGIN HISTOGRAM";
const END_MARKER: &str = "# END HISTOGRAM";
const PATH_KEY: &str = "AidaPath=";
const TITLE_KEY: &str = "Title=";

/// Parser states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Between records.
    Begin,
    /// Reading `Key=value` properties.
    Prop,
    /// Reading bin lines.
    Bin,
    /// Saw a `#` line after bins; expecting the terminator.
    End,
}

/// Outcome of handling one line in one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Line consumed; continue in the given state.
    Consumed(State),
    /// Line not consumed; hand it to the given state's handler.
    Redispatch(State),
}

/// Accumulation state for the record being read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserContext {
    path: String,
    title: String,
    edges: Vec<f64>,
    values: Vec<f64>,
    errors: Vec<f64>,
    first_bin_consumed: bool,
}

impl ParserContext {
    fn push_bin(&mut self, fields: [f64; 5], track_errors: bool) {
        let [xlow, xhigh, value, err_minus, err_plus] = fields;
        if !self.first_bin_consumed {
            self.edges.push(xlow);
            self.first_bin_consumed = true;
        }
        self.edges.push(xhigh);
        self.values.push(value);
        if track_errors {
            self.errors.push((err_minus + err_plus) / 2.0);
        }
    }

    fn into_record(self, track_errors: bool) -> HistogramRecord {
        HistogramRecord {
            path: self.path,
            title: self.title,
            edges: self.edges,
            values: self.values,
            errors: track_errors.then_some(self.errors),
        }
    }
}

/// Split a bin line into `xlow xhigh value errMinus errPlus`.
///
/// Missing trailing fields are 0.0. Parsing stops at the first token that is
/// not a number; it and everything after it count as missing.
pub fn parse_bin_fields(text: &str) -> [f64; 5] {
    let mut fields = [0.0; 5];
    for (slot, token) in fields.iter_mut().zip(text.split_whitespace()) {
        match token.parse::<f64>() {
            Ok(v) => *slot = v,
            Err(_) => break,
        }
    }
    fields
}

/// What the parser produced once the input is exhausted.
#[derive(Debug)]
pub struct ParseOutput {
    /// All finalized records.
    pub store: Store,
    /// Event count (meaningful in normalization mode).
    pub event_count: EventCount,
    /// Records inserted into the store.
    pub records: usize,
    /// Unterminated records dropped at end of input.
    pub discarded: usize,
}

/// Single-pass AIDA parser feeding a [`Store`].
pub struct AidaParser {
    options: ConvertOptions,
    state: State,
    ctx: ParserContext,
    store: Store,
    event_count: EventCount,
    records: usize,
}

impl AidaParser {
    /// Create a parser in the `Begin` state with an empty store.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            state: State::Begin,
            ctx: ParserContext::default(),
            store: Store::new(),
            event_count: EventCount::default(),
            records: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Store built so far.
    pub fn store(&self) -> &Store {
        &self.store
    }

    fn track_errors(&self) -> bool {
        !self.options.normalize
    }

    /// Process one non-blank line.
    pub fn feed(&mut self, line: usize, text: &str) -> Result<()> {
        let mut state = self.state;
        loop {
            let step = match state {
                State::Begin => self.on_begin(line, text)?,
                State::Prop => self.on_prop(text),
                State::Bin => self.on_bin(text),
                State::End => self.on_end(line, text)?,
            };
            match step {
                Step::Consumed(next) => {
                    self.state = next;
                    return Ok(());
                }
                Step::Redispatch(next) => state = next,
            }
        }
    }

    fn on_begin(&mut self, line: usize, text: &str) -> Result<Step> {
        if text.starts_with(BEGIN_MARKER) {
            Ok(Step::Consumed(State::Prop))
        } else if self.options.normalize && text.starts_with(FINALIZE_MARKER) {
            self.event_count.observe(line, text);
            Ok(Step::Consumed(State::Begin))
        } else if text.starts_with('#') {
            Ok(Step::Consumed(State::Begin))
        } else {
            Err(FormatError { line, text: text.to_string(), expected: Expected::BeginOrComment }
                .into())
        }
    }

    fn on_prop(&mut self, text: &str) -> Step {
        if text.starts_with('#') {
            Step::Consumed(State::Prop)
        } else if let Some(path) = text.strip_prefix(PATH_KEY) {
            self.ctx.path = path.to_string();
            Step::Consumed(State::Prop)
        } else if let Some(title) = text.strip_prefix(TITLE_KEY) {
            self.ctx.title = title.to_string();
            Step::Consumed(State::Prop)
        } else {
            Step::Redispatch(State::Bin)
        }
    }

    fn on_bin(&mut self, text: &str) -> Step {
        if text.starts_with('#') {
            return Step::Redispatch(State::End);
        }
        let track = self.track_errors();
        self.ctx.push_bin(parse_bin_fields(text), track);
        Step::Consumed(State::Bin)
    }

    fn on_end(&mut self, line: usize, text: &str) -> Result<Step> {
        if text.starts_with(END_MARKER) {
            self.finalize()?;
            Ok(Step::Consumed(State::Begin))
        } else if text.starts_with('#') {
            // Comment between bin blocks. Handing it to Bin would only send
            // it straight back here.
            Ok(Step::Consumed(State::Bin))
        } else {
            Err(FormatError { line, text: text.to_string(), expected: Expected::EndHistogram }
                .into())
        }
    }

    fn finalize(&mut self) -> Result<()> {
        let track = self.track_errors();
        let record = std::mem::take(&mut self.ctx).into_record(track);
        debug!("{}", record.path);
        insert_record(&mut self.store, &record)?;
        self.records += 1;
        Ok(())
    }

    /// Close the parse after the input is exhausted.
    ///
    /// `last_line` is the number of physical lines read, used for the strict
    /// mode diagnostic.
    pub fn finish(self, last_line: usize) -> Result<ParseOutput> {
        let mut discarded = 0;
        if self.state != State::Begin {
            if self.options.strict {
                return Err(FormatError {
                    line: last_line,
                    text: self.ctx.path,
                    expected: Expected::EndBeforeEof,
                }
                .into());
            }
            warn!("input ended inside record '{}', dropping it", self.ctx.path);
            discarded = 1;
        }
        Ok(ParseOutput {
            store: self.store,
            event_count: self.event_count,
            records: self.records,
            discarded,
        })
    }
}
