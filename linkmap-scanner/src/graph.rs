use crate::extractor::{Reference, ReferenceKind};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// One row of the exported edge table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRow {
    #[serde(rename = "Source URL")]
    pub source: String,
    #[serde(rename = "Target URL")]
    pub target: String,
    #[serde(rename = "Tag")]
    pub kind: ReferenceKind,
}

/// Borrowed view of a single edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub kind: ReferenceKind,
}

impl Edge<'_> {
    pub fn to_row(&self) -> EdgeRow {
        EdgeRow {
            source: self.source.to_string(),
            target: self.target.to_string(),
            kind: self.kind,
        }
    }
}

/// Source page to its outbound references.
///
/// Sources keep their first-insertion order and edges keep discovery
/// order, so iteration (and every export built on it) is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteGraph {
    sources: IndexMap<String, IndexSet<Reference>>,
}

impl SiteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully fetched page and its references.
    ///
    /// A page with no references still gets an (empty) entry. Inserting a
    /// source twice merges the edge sets, keeping earlier edges first.
    pub fn insert<I>(&mut self, source: impl Into<String>, references: I)
    where
        I: IntoIterator<Item = Reference>,
    {
        self.sources
            .entry(source.into())
            .or_default()
            .extend(references);
    }

    pub fn contains_source(&self, url: &str) -> bool {
        self.sources.contains_key(url)
    }

    pub fn references(&self, source: &str) -> Option<indexmap::set::Iter<'_, Reference>> {
        self.sources.get(source).map(IndexSet::iter)
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Every edge, grouped by source in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.sources.iter().flat_map(|(source, references)| {
            references.iter().map(move |reference| Edge {
                source: source.as_str(),
                target: reference.url.as_str(),
                kind: reference.kind,
            })
        })
    }

    /// Owned, ordered edge list for serialisation.
    pub fn export(&self) -> Vec<EdgeRow> {
        self.edges().map(|edge| edge.to_row()).collect()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn edge_count(&self) -> usize {
        self.sources.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn count_by_kind(&self, kind: ReferenceKind) -> usize {
        self.edges().filter(|edge| edge.kind == kind).count()
    }
}
