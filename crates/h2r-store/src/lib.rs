//! # h2r-store
//!
//! In-memory hierarchical histogram store for hist2root.
//!
//! A [`Store`] is a tree of named [`Directory`] nodes whose leaves are
//! variable-bin-width [`Histogram`]s with ROOT-style under/overflow cells.
//! A finished store is handed to a [`StoreSink`] exactly once.
//!
//! ## Example
//!
//! ```no_run
//! use h2r_store::{Histogram, JsonStoreFile, Store, StoreSink};
//!
//! let mut store = Store::new();
//! let h = Histogram::with_edges("pt", "Jet pT", vec![0.0, 10.0, 30.0]).unwrap();
//! store.mkdir_all(["jets"]).unwrap().insert_histogram(h).unwrap();
//!
//! let mut sink = JsonStoreFile::create("out.json").unwrap();
//! store.persist(&mut sink).unwrap();
//! sink.finish().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod directory;
pub mod error;
pub mod histogram;
pub mod sink;
pub mod store;

pub use directory::{Directory, Node};
pub use error::{Result, StoreError};
pub use histogram::Histogram;
pub use sink::{DirectoryTreeSink, JsonStoreFile, StoreSink};
pub use store::{Store, path_segments};
