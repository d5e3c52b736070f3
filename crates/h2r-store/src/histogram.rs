//! Variable-bin-width 1D histogram with TH1-style under/overflow slots.
//!
//! Bin indexing follows the ROOT convention:
//! ```text
//! index:   0          1 .. n_bins        n_bins + 1
//!          underflow  ordinary bins      overflow
//! ```
//! `bin_edges` holds `n_bins + 1` values; bin `i` (1-based) spans
//! `[bin_edges[i - 1], bin_edges[i])`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// A 1D histogram held in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Histogram name (leaf name inside its directory).
    pub name: String,
    /// Histogram title.
    pub title: String,
    /// Bin edges (length = n_bins + 1), stored verbatim.
    bin_edges: Vec<f64>,
    /// Bin contents including underflow (index 0) and overflow (index n_bins + 1).
    bin_content: Vec<f64>,
    /// Sum of weights squared per cell, same layout as `bin_content`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sumw2: Option<Vec<f64>>,
    /// Number of entries.
    pub entries: f64,
}

impl Histogram {
    /// Create an empty histogram over the given edges.
    ///
    /// Edges are taken as given: neither sorted nor checked for monotonicity.
    pub fn with_edges(
        name: impl Into<String>,
        title: impl Into<String>,
        bin_edges: Vec<f64>,
    ) -> Result<Self> {
        if bin_edges.len() < 2 {
            return Err(StoreError::InvalidBinning(format!(
                "need at least 2 bin edges, got {}",
                bin_edges.len()
            )));
        }
        let n_cells = bin_edges.len() + 1;
        Ok(Self {
            name: name.into(),
            title: title.into(),
            bin_edges,
            bin_content: vec![0.0; n_cells],
            sumw2: None,
            entries: 0.0,
        })
    }

    /// Number of ordinary bins (excluding under/overflow).
    pub fn n_bins(&self) -> usize {
        self.bin_edges.len() - 1
    }

    /// Bin edges (length = n_bins + 1).
    pub fn bin_edges(&self) -> &[f64] {
        &self.bin_edges
    }

    /// All cells, `[underflow, bin1, .., binN, overflow]`.
    pub fn cells(&self) -> &[f64] {
        &self.bin_content
    }

    /// Ordinary bin contents (length = n_bins).
    pub fn contents(&self) -> &[f64] {
        &self.bin_content[1..=self.n_bins()]
    }

    /// Per-cell sum of weights squared, if errors are tracked.
    pub fn sumw2(&self) -> Option<&[f64]> {
        self.sumw2.as_deref()
    }

    /// Underflow content.
    pub fn underflow(&self) -> f64 {
        self.bin_content[0]
    }

    /// Overflow content.
    pub fn overflow(&self) -> f64 {
        self.bin_content[self.n_bins() + 1]
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index > self.n_bins() + 1 {
            return Err(StoreError::BinOutOfRange { index, n_bins: self.n_bins() });
        }
        Ok(())
    }

    /// Set content of cell `index`. Counts as one entry.
    pub fn set_bin_content(&mut self, index: usize, value: f64) -> Result<()> {
        self.check_index(index)?;
        self.bin_content[index] = value;
        self.entries += 1.0;
        Ok(())
    }

    /// Error of cell `index`: `sqrt(sumw2)`, or `sqrt(|content|)` when errors
    /// are not tracked.
    pub fn bin_error(&self, index: usize) -> Result<f64> {
        self.check_index(index)?;
        Ok(match &self.sumw2 {
            Some(sw2) => sw2[index].sqrt(),
            None => self.bin_content[index].abs().sqrt(),
        })
    }

    /// Set error of cell `index`, enabling error tracking on first use.
    pub fn set_bin_error(&mut self, index: usize, error: f64) -> Result<()> {
        self.check_index(index)?;
        let n_cells = self.bin_content.len();
        let sw2 = self.sumw2.get_or_insert_with(|| vec![0.0; n_cells]);
        sw2[index] = error * error;
        Ok(())
    }

    /// Drop per-bin errors; `bin_error` falls back to `sqrt(|content|)`.
    pub fn reset_errors(&mut self) {
        self.sumw2 = None;
    }

    /// Width of ordinary bin `index` (1-based, `1..=n_bins`).
    fn width(&self, index: usize) -> f64 {
        self.bin_edges[index] - self.bin_edges[index - 1]
    }

    /// Cell index that `x` falls into.
    pub fn find_bin(&self, x: f64) -> usize {
        let n = self.n_bins();
        if x < self.bin_edges[0] {
            0
        } else if x >= self.bin_edges[n] {
            n + 1
        } else {
            // Last edge <= x.
            self.bin_edges.partition_point(|&e| e <= x)
        }
    }

    /// Fill `x` with weight `w`; returns the cell index filled.
    ///
    /// Error tracking is switched on the first time a non-unit weight is used.
    pub fn fill(&mut self, x: f64, w: f64) -> usize {
        let bin = self.find_bin(x);
        if self.sumw2.is_none() && w != 1.0 {
            // Past unit-weight fills contribute w^2 == content.
            self.sumw2 = Some(self.bin_content.clone());
        }
        self.bin_content[bin] += w;
        if let Some(sw2) = self.sumw2.as_mut() {
            sw2[bin] += w * w;
        }
        self.entries += 1.0;
        bin
    }

    /// Apply `f(content, width)` to every ordinary bin and zero both flow
    /// cells.
    pub fn rescale_with_widths(&mut self, mut f: impl FnMut(f64, f64) -> f64) {
        let n = self.n_bins();
        for i in 1..=n {
            self.bin_content[i] = f(self.bin_content[i], self.width(i));
        }
        self.bin_content[0] = 0.0;
        self.bin_content[n + 1] = 0.0;
    }
}
