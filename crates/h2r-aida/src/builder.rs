//! Histogram builder: finished record → histogram attached to the store.

use tracing::debug;

use h2r_store::{Histogram, Store};

use crate::error::Result;
use crate::path::ResolvedPath;

/// One completed record, as accumulated by the parser.
///
/// `edges.len() == values.len() + 1`; `errors`, when present, has one entry
/// per value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramRecord {
    /// AIDA path of the record.
    pub path: String,
    /// Record title.
    pub title: String,
    /// Bin edges in input order.
    pub edges: Vec<f64>,
    /// Bin values.
    pub values: Vec<f64>,
    /// Symmetric bin errors, if tracked.
    pub errors: Option<Vec<f64>>,
}

impl HistogramRecord {
    /// Build the binned object named `leaf`.
    ///
    /// Edges are used verbatim; contents and errors go to cells `1..=N`,
    /// leaving both flow cells at zero.
    pub fn build(&self, leaf: &str) -> Result<Histogram> {
        let mut hist = Histogram::with_edges(leaf, self.title.as_str(), self.edges.clone())?;
        for (i, &v) in self.values.iter().enumerate() {
            hist.set_bin_content(i + 1, v)?;
        }
        if let Some(errors) = &self.errors {
            for (i, &e) in errors.iter().enumerate() {
                hist.set_bin_error(i + 1, e)?;
            }
        }
        Ok(hist)
    }
}

/// Resolve the record's path in `store` (creating missing directories) and
/// attach the built histogram there, replacing a same-named histogram.
pub fn insert_record(store: &mut Store, record: &HistogramRecord) -> Result<()> {
    let resolved = ResolvedPath::parse(&record.path);
    let hist = record.build(resolved.leaf)?;
    let dir = store.mkdir_all(resolved.dirs.iter().copied())?;
    if dir.insert_histogram(hist)?.is_some() {
        debug!("replaced histogram {} in directory '{}'", resolved.leaf, resolved.dir_path());
    }
    Ok(())
}
