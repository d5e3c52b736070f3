//! Directory nodes and the tagged node type of the store tree.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};
use crate::histogram::Histogram;

/// A child of a directory: either a nested directory or a histogram leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Named subdirectory.
    Directory(Directory),
    /// Histogram leaf.
    Histogram(Histogram),
}

impl Node {
    /// Name of the node inside its parent.
    pub fn name(&self) -> &str {
        match self {
            Node::Directory(d) => &d.name,
            Node::Histogram(h) => &h.name,
        }
    }
}

/// A named directory: an ordered list of children.
///
/// Children keep insertion order; names are unique within one directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Directory {
    /// Directory name (empty for the store root).
    pub name: String,
    children: Vec<Node>,
}

impl Directory {
    /// Create an empty directory.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), children: Vec::new() }
    }

    /// Access the children in insertion order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Find a child by name.
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|n| n.name() == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|n| n.name() == name)
    }

    /// Return the subdirectory `name`, creating it if absent.
    ///
    /// Fails with [`StoreError::NotADirectory`] when `name` is a histogram.
    pub fn subdir_or_create(&mut self, name: &str) -> Result<&mut Directory> {
        let idx = match self.position(name) {
            Some(i) => i,
            None => {
                self.children.push(Node::Directory(Directory::new(name)));
                self.children.len() - 1
            }
        };
        match &mut self.children[idx] {
            Node::Directory(d) => Ok(d),
            Node::Histogram(_) => Err(StoreError::NotADirectory { path: name.to_string() }),
        }
    }

    /// Attach a histogram, replacing an existing histogram of the same name.
    ///
    /// Returns the replaced histogram, if any.
    pub fn insert_histogram(&mut self, hist: Histogram) -> Result<Option<Histogram>> {
        match self.position(&hist.name) {
            None => {
                self.children.push(Node::Histogram(hist));
                Ok(None)
            }
            Some(i) => match &mut self.children[i] {
                Node::Histogram(old) => Ok(Some(std::mem::replace(old, hist))),
                Node::Directory(_) => Err(StoreError::NameConflict { path: hist.name }),
            },
        }
    }

    /// Histograms directly in this directory.
    pub fn histograms(&self) -> impl Iterator<Item = &Histogram> {
        self.children.iter().filter_map(|n| match n {
            Node::Histogram(h) => Some(h),
            Node::Directory(_) => None,
        })
    }

    /// Subdirectories directly in this directory.
    pub fn subdirs(&self) -> impl Iterator<Item = &Directory> {
        self.children.iter().filter_map(|n| match n {
            Node::Directory(d) => Some(d),
            Node::Histogram(_) => None,
        })
    }

    /// Visit every histogram in this directory and all subdirectories.
    pub fn walk_histograms_mut(&mut self, f: &mut impl FnMut(&mut Histogram)) {
        for child in &mut self.children {
            match child {
                Node::Directory(d) => d.walk_histograms_mut(f),
                Node::Histogram(h) => f(h),
            }
        }
    }

    /// Number of histograms in this subtree.
    pub fn histogram_count(&self) -> usize {
        self.children
            .iter()
            .map(|n| match n {
                Node::Directory(d) => d.histogram_count(),
                Node::Histogram(_) => 1,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hist(name: &str) -> Histogram {
        Histogram::with_edges(name, "", vec![0.0, 1.0]).unwrap()
    }

    #[test]
    fn subdir_is_idempotent() {
        let mut root = Directory::default();
        root.subdir_or_create("a").unwrap();
        root.subdir_or_create("a").unwrap();
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut d = Directory::new("d");
        assert!(d.insert_histogram(hist("h")).unwrap().is_none());
        let mut h2 = hist("h");
        h2.title = "second".into();
        let old = d.insert_histogram(h2).unwrap();
        assert!(old.is_some());
        assert_eq!(d.children().len(), 1);
        assert_eq!(d.histograms().next().unwrap().title, "second");
    }

    #[test]
    fn histogram_and_directory_names_conflict() {
        let mut d = Directory::default();
        d.insert_histogram(hist("x")).unwrap();
        assert!(matches!(d.subdir_or_create("x"), Err(StoreError::NotADirectory { .. })));

        d.subdir_or_create("y").unwrap();
        assert!(matches!(d.insert_histogram(hist("y")), Err(StoreError::NameConflict { .. })));
    }

    #[test]
    fn walk_reaches_nested_histograms() {
        let mut root = Directory::default();
        root.insert_histogram(hist("top")).unwrap();
        let b = root.subdir_or_create("a").unwrap().subdir_or_create("b").unwrap();
        b.insert_histogram(hist("deep")).unwrap();

        let mut seen = Vec::new();
        root.walk_histograms_mut(&mut |h| seen.push(h.name.clone()));
        assert_eq!(seen, vec!["top", "deep"]);
        assert_eq!(root.histogram_count(), 2);
    }
}
