//! The in-memory histogram store: a directory tree rooted at an unnamed
//! top directory.

use tracing::debug;

use crate::directory::{Directory, Node};
use crate::error::{Result, StoreError};
use crate::histogram::Histogram;
use crate::sink::StoreSink;

/// Hierarchical histogram store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    root: Directory,
}

/// Split a `/`-separated path into its segments, dropping one leading `/`.
///
/// Segments are taken literally: no `.`/`..` handling, empty segments kept.
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The unnamed top directory.
    pub fn root(&self) -> &Directory {
        &self.root
    }

    /// Mutable access to the top directory.
    pub fn root_mut(&mut self) -> &mut Directory {
        &mut self.root
    }

    /// Resolve a chain of directory names, creating every missing ancestor,
    /// and return the deepest directory. An empty chain is the root.
    pub fn mkdir_all<'a>(
        &mut self,
        chain: impl IntoIterator<Item = &'a str>,
    ) -> Result<&mut Directory> {
        let mut dir = &mut self.root;
        let mut walked = String::new();
        for segment in chain {
            if !walked.is_empty() {
                walked.push('/');
            }
            walked.push_str(segment);
            dir = dir.subdir_or_create(segment).map_err(|e| match e {
                StoreError::NotADirectory { .. } => {
                    StoreError::NotADirectory { path: walked.clone() }
                }
                other => other,
            })?;
        }
        Ok(dir)
    }

    /// Look up a node by `/`-separated path.
    pub fn get(&self, path: &str) -> Option<&Node> {
        let mut segments = path_segments(path).peekable();
        let mut dir = &self.root;
        while let Some(segment) = segments.next() {
            let node = dir.child(segment)?;
            if segments.peek().is_none() {
                return Some(node);
            }
            match node {
                Node::Directory(d) => dir = d,
                Node::Histogram(_) => return None,
            }
        }
        None
    }

    /// Look up a directory by path. The empty path is the root.
    pub fn directory(&self, path: &str) -> Option<&Directory> {
        if path.is_empty() || path == "/" {
            return Some(&self.root);
        }
        match self.get(path)? {
            Node::Directory(d) => Some(d),
            Node::Histogram(_) => None,
        }
    }

    /// Look up a histogram by path.
    pub fn histogram(&self, path: &str) -> Option<&Histogram> {
        match self.get(path)? {
            Node::Histogram(h) => Some(h),
            Node::Directory(_) => None,
        }
    }

    /// Total number of histograms in the store.
    pub fn histogram_count(&self) -> usize {
        self.root.histogram_count()
    }

    /// Hand the whole tree to a persistence sink, depth-first in insertion
    /// order: each directory is created before any of its children are
    /// written.
    pub fn persist(&self, sink: &mut dyn StoreSink) -> Result<()> {
        let mut chain = Vec::new();
        persist_dir(&self.root, &mut chain, sink)
    }
}

fn persist_dir<'a>(
    dir: &'a Directory,
    chain: &mut Vec<&'a str>,
    sink: &mut dyn StoreSink,
) -> Result<()> {
    for child in dir.children() {
        match child {
            Node::Directory(d) => {
                chain.push(&d.name);
                debug!("mkdir {:?}", chain);
                sink.make_directory(chain)?;
                persist_dir(d, chain, sink)?;
                chain.pop();
            }
            Node::Histogram(h) => sink.write_histogram(chain, h)?,
        }
    }
    Ok(())
}
