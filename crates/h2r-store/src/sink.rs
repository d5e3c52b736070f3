//! Persistence sinks: where a finished [`Store`](crate::Store) ends up.
//!
//! A sink only needs two operations, directory creation and object write,
//! plus a final flush. `Store::persist` drives them in tree order.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::histogram::Histogram;
use crate::store::Store;

/// Destination for a persisted store.
pub trait StoreSink {
    /// Create the directory reached by the name chain `dir`, relative to the
    /// store root. Parents are always created before children. Names are
    /// passed as-is; an empty name is a real directory, not the root.
    fn make_directory(&mut self, dir: &[&str]) -> Result<()>;

    /// Write `hist` into directory `dir` (an empty chain is the root).
    fn write_histogram(&mut self, dir: &[&str], hist: &Histogram) -> Result<()>;

    /// Flush and close the destination.
    fn finish(&mut self) -> Result<()>;
}

/// Single JSON document holding the whole tree.
///
/// The file is created (truncated) on construction so an unwritable output
/// fails before any input is read.
pub struct JsonStoreFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    tree: Store,
    pretty: bool,
}

impl JsonStoreFile {
    /// Create or truncate `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)?;
        Ok(Self { path, writer: Some(BufWriter::new(file)), tree: Store::new(), pretty: true })
    }

    /// Emit compact single-line JSON instead of pretty-printed.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }
}

impl StoreSink for JsonStoreFile {
    fn make_directory(&mut self, dir: &[&str]) -> Result<()> {
        self.tree.mkdir_all(dir.iter().copied())?;
        Ok(())
    }

    fn write_histogram(&mut self, dir: &[&str], hist: &Histogram) -> Result<()> {
        self.tree.mkdir_all(dir.iter().copied())?.insert_histogram(hist.clone())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let Some(mut w) = self.writer.take() else {
            return Ok(());
        };
        if self.pretty {
            serde_json::to_writer_pretty(&mut w, self.tree.root())?;
        } else {
            serde_json::to_writer(&mut w, self.tree.root())?;
        }
        w.write_all(b"\n")?;
        w.flush()?;
        info!("wrote {} histograms to {}", self.tree.histogram_count(), self.path.display());
        Ok(())
    }
}

/// Filesystem directory tree: one real directory per store directory, one
/// `<name>.json` file per histogram.
pub struct DirectoryTreeSink {
    root: PathBuf,
    written: usize,
}

impl DirectoryTreeSink {
    /// Create `root` (and parents) if needed.
    pub fn create(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root, written: 0 })
    }

    fn resolve(&self, dir: &[&str]) -> Result<PathBuf> {
        let mut out = self.root.clone();
        for segment in dir {
            check_name(segment, &dir.join("/"))?;
            out.push(segment);
        }
        Ok(out)
    }
}

fn check_name(segment: &str, path: &str) -> Result<()> {
    if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\') {
        return Err(StoreError::InvalidName { path: path.to_string() });
    }
    Ok(())
}

impl StoreSink for DirectoryTreeSink {
    fn make_directory(&mut self, dir: &[&str]) -> Result<()> {
        let path = self.resolve(dir)?;
        std::fs::create_dir_all(&path)?;
        Ok(())
    }

    fn write_histogram(&mut self, dir: &[&str], hist: &Histogram) -> Result<()> {
        check_name(&hist.name, &hist.name)?;
        let target = self.resolve(dir)?.join(format!("{}.json", hist.name));
        debug!("writing {}", target.display());
        let mut w = BufWriter::new(File::create(&target)?);
        serde_json::to_writer_pretty(&mut w, hist)?;
        w.write_all(b"\n")?;
        w.flush()?;
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        info!("wrote {} histograms under {}", self.written, self.root.display());
        Ok(())
    }
}
