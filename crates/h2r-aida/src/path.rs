//! Path resolver: AIDA path → directory chain + leaf name.

use h2r_store::path_segments;

/// A `/`-separated path split into its directory chain and leaf name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath<'a> {
    /// Directory names from the root down (empty for a root-level leaf).
    pub dirs: Vec<&'a str>,
    /// Leaf name.
    pub leaf: &'a str,
}

impl<'a> ResolvedPath<'a> {
    /// Split `path`. A leading `/` is dropped; segments are taken literally.
    pub fn parse(path: &'a str) -> Self {
        let mut dirs: Vec<&str> = path_segments(path).collect();
        // split() always yields at least one segment.
        let leaf = dirs.pop().unwrap_or_default();
        Self { dirs, leaf }
    }

    /// The directory chain rejoined with `/`.
    pub fn dir_path(&self) -> String {
        self.dirs.join("/")
    }
}
