use crate::error::{XmlTreeError, XmlTreeResult};
use crate::parser::XmlTree;
use log::debug;
use petgraph::{
    algo::dijkstra,
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};
use std::collections::HashMap;

/// Directed tree of element identifiers, optionally pruned to a neighborhood of the root.
pub struct ElementGraph {
    graph: DiGraph<String, ()>,
    root: NodeIndex,
}

impl ElementGraph {
    /// Build the graph of an extracted XML tree.
    ///
    /// A `depth` of `0` keeps every element. A positive `depth` keeps the elements at most
    /// `depth` edges away from the root.
    pub fn construct(tree: &XmlTree, depth: i64) -> XmlTreeResult<Self> {
        Self::from_parts(tree.node_names(), tree.edge_names(), depth)
    }

    pub fn from_parts(node_names: &[String], edge_names: &[(String, String)], depth: i64) -> XmlTreeResult<Self> {
        if depth < 0 {
            return Err(XmlTreeError::InvalidDepth(depth));
        }

        let mut graph = DiGraph::with_capacity(node_names.len(), edge_names.len());
        let indices: HashMap<&str, NodeIndex> = node_names
            .iter()
            .map(|name| (name.as_str(), graph.add_node(name.clone())))
            .collect();

        for (parent, child) in edge_names {
            let parent = lookup(&indices, parent)?;
            let child = lookup(&indices, child)?;
            graph.add_edge(parent, child, ());
        }

        let root = node_names
            .first()
            .and_then(|name| indices.get(name.as_str()))
            .copied()
            .ok_or(XmlTreeError::EmptyTree)?;

        let full = ElementGraph { graph, root };
        if depth == 0 {
            Ok(full)
        } else {
            Ok(full.neighborhood(usize::try_from(depth).unwrap_or(usize::MAX)))
        }
    }

    /// Induced subgraph of the nodes within `radius` edges of the root.
    fn neighborhood(self, radius: usize) -> Self {
        let distances = dijkstra(&self.graph, self.root, None, |_| 1usize);
        let root_name = &self.graph[self.root];

        let pruned = self.graph.filter_map(
            |idx, name| match distances.get(&idx) {
                Some(&distance) if distance <= radius => Some(name.clone()),
                _ => None,
            },
            |_, _| Some(()),
        );

        debug!(
            "pruned element graph to radius {}: kept {} of {} nodes",
            radius,
            pruned.node_count(),
            self.graph.node_count()
        );

        // filter_map keeps the relative order of surviving nodes, and the root always survives
        let root = pruned
            .node_indices()
            .find(|&idx| &pruned[idx] == root_name)
            .unwrap_or_default();

        ElementGraph { graph: pruned, root }
    }

    pub fn root_name(&self) -> &str {
        &self.graph[self.root]
    }

    /// Identifiers of all nodes, in the order they were added.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(move |idx| self.graph[idx].as_str())
    }

    pub fn edge_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.edge_references().map(move |edge| {
            (
                self.graph[edge.source()].as_str(),
                self.graph[edge.target()].as_str(),
            )
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

fn lookup(indices: &HashMap<&str, NodeIndex>, name: &str) -> XmlTreeResult<NodeIndex> {
    indices
        .get(name)
        .copied()
        .ok_or_else(|| XmlTreeError::UnknownNode(name.to_string()))
}
