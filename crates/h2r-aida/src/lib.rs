//! # h2r-aida
//!
//! Reader for the line-based AIDA histogram text format.
//!
//! ```text
//! # BEGIN HISTOGRAM /jets/pt
//! AidaPath=/jets/pt
//! Title=Jet pT
//! 0 10 5.0 0.5 0.5
//! 10 30 2.0 0.3 0.3
//! # END HISTOGRAM /jets/pt
//! ```
//!
//! Each record becomes a variable-bin-width histogram at its path in an
//! [`h2r_store::Store`]. In normalization mode contents are turned into
//! per-event densities using the count from a `### Finalize` line.
//!
//! ## Example
//!
//! ```
//! use h2r_aida::{ConvertOptions, convert_reader};
//!
//! let text = "# BEGIN HISTOGRAM\nAidaPath=/a/h\n0 1 3\n# END HISTOGRAM\n";
//! let (store, summary) = convert_reader(text.as_bytes(), ConvertOptions::default()).unwrap();
//! assert_eq!(summary.histograms, 1);
//! assert_eq!(store.histogram("a/h").unwrap().contents(), &[3.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod convert;
pub mod error;
pub mod events;
pub mod lines;
pub mod normalize;
pub mod parser;
pub mod path;

pub use builder::{HistogramRecord, insert_record};
pub use convert::{ConvertOptions, ConvertSummary, convert_path, convert_reader};
pub use error::{Error, Expected, FormatError, Result};
pub use events::{EventCount, extract_event_count};
pub use lines::LineSource;
pub use normalize::{EVENT_COUNT_NAME, normalize};
pub use parser::{AidaParser, ParseOutput, ParserContext, State, parse_bin_fields};
pub use path::ResolvedPath;
