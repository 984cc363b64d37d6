use crate::storage::models::StepEdge;
use std::collections::{BTreeMap, BTreeSet};

/// Parent → children adjacency for the directory steps of a single file.
///
/// Each graph is built fresh from one file's segments; graphs are never
/// merged, since the same directory name can sit at unrelated positions in
/// different files' paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepGraph {
    adjacency: BTreeMap<String, BTreeSet<String>>,
}

impl StepGraph {
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let mut graph = StepGraph::default();
        for pair in segments.windows(2) {
            graph.add_edge(pair[0].as_ref(), pair[1].as_ref());
        }
        graph
    }

    fn add_edge(&mut self, parent: &str, child: &str) {
        self.adjacency
            .entry(parent.to_string())
            .or_default()
            .insert(child.to_string());
    }

    /// Number of distinct edges.
    pub fn len(&self) -> usize {
        self.adjacency.values().map(BTreeSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Edges in (parent, child) order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.adjacency.iter().flat_map(|(parent, children)| {
            children
                .iter()
                .map(move |child| (parent.as_str(), child.as_str()))
        })
    }

    /// Attach the owning file id to every edge.
    pub fn tag(&self, file_id: i64) -> Vec<StepEdge> {
        self.edges()
            .map(|(parent, child)| StepEdge {
                file_id,
                parent: parent.to_string(),
                child: child.to_string(),
            })
            .collect()
    }
}
