//! Canvas node/link graph
//!
//! Nodes live in a petgraph `StableUnGraph` so indices stay valid across
//! removals. Two side tables map a source path and a composition name to
//! their node, and are updated in the same call that changes the graph.

use std::collections::{BTreeSet, HashMap};

use petgraph::stable_graph::{NodeIndex, StableUnGraph};

use crate::model::{path, Composition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanvasNodeKind {
    Source,
    Composition,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CanvasPayload {
    Source(String),
    Composition(Composition),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasNode {
    /// Derived from the id of the command that created the node
    pub id: String,
    pub label: String,
    pub payload: CanvasPayload,
}

impl CanvasNode {
    pub fn kind(&self) -> CanvasNodeKind {
        match self.payload {
            CanvasPayload::Source(_) => CanvasNodeKind::Source,
            CanvasPayload::Composition(_) => CanvasNodeKind::Composition,
        }
    }
}

/// Undirected link; endpoints are stored in sorted order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanvasLink {
    pub source: String,
    pub target: String,
}

impl CanvasLink {
    fn between(a: &str, b: &str) -> Self {
        let (source, target) = if a <= b { (a, b) } else { (b, a) };
        Self {
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

/// Id-independent description of the canvas contents
///
/// Links are `(source path, composition name)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanvasShape {
    pub sources: BTreeSet<String>,
    pub compositions: BTreeSet<String>,
    pub links: BTreeSet<(String, String)>,
}

#[derive(Debug, Default)]
pub struct CanvasGraph {
    graph: StableUnGraph<CanvasNode, ()>,
    source_nodes: HashMap<String, NodeIndex>,
    composition_nodes: HashMap<String, NodeIndex>,
}

impl CanvasGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn clear(&mut self) {
        self.graph.clear();
        self.source_nodes.clear();
        self.composition_nodes.clear();
    }

    pub fn source_node(&self, source_path: &str) -> Option<NodeIndex> {
        self.source_nodes.get(source_path).copied()
    }

    pub fn composition_node(&self, name: &str) -> Option<NodeIndex> {
        self.composition_nodes.get(name).copied()
    }

    pub fn node(&self, index: NodeIndex) -> Option<&CanvasNode> {
        self.graph.node_weight(index)
    }

    pub fn node_by_id(&self, id: &str) -> Option<&CanvasNode> {
        self.graph.node_weights().find(|n| n.id == id)
    }

    /// Add a node for `source_path`; None if the path already has one
    pub fn add_source_node(&mut self, command_id: &str, source_path: &str) -> Option<NodeIndex> {
        if self.source_nodes.contains_key(source_path) {
            return None;
        }
        let index = self.graph.add_node(CanvasNode {
            id: format!("{command_id}:{source_path}"),
            label: path::source_label(source_path),
            payload: CanvasPayload::Source(source_path.to_string()),
        });
        self.source_nodes.insert(source_path.to_string(), index);
        Some(index)
    }

    /// Add a node for a named composition; None if the name already has one
    pub fn add_composition_node(
        &mut self,
        command_id: &str,
        name: &str,
        composition: &Composition,
    ) -> Option<NodeIndex> {
        if self.composition_nodes.contains_key(name) {
            return None;
        }
        let index = self.graph.add_node(CanvasNode {
            id: command_id.to_string(),
            label: name.to_string(),
            payload: CanvasPayload::Composition(composition.clone()),
        });
        self.composition_nodes.insert(name.to_string(), index);
        Some(index)
    }

    /// Composition nodes whose composition has `source_path` on either side
    pub fn compositions_referencing(&self, source_path: &str) -> Vec<NodeIndex> {
        let mut found: Vec<NodeIndex> = self
            .composition_nodes
            .values()
            .copied()
            .filter(|&index| {
                matches!(
                    self.graph.node_weight(index).map(|n| &n.payload),
                    Some(CanvasPayload::Composition(c)) if c.references(source_path)
                )
            })
            .collect();
        found.sort();
        found
    }

    /// Link two nodes; false if either is missing or they are already linked
    pub fn link(&mut self, a: NodeIndex, b: NodeIndex) -> bool {
        if !self.graph.contains_node(a) || !self.graph.contains_node(b) {
            return false;
        }
        if self.graph.find_edge(a, b).is_some() {
            return false;
        }
        self.graph.add_edge(a, b, ());
        true
    }

    /// Remove the node for `source_path` and its links
    pub fn remove_source(&mut self, source_path: &str) -> bool {
        match self.source_nodes.remove(source_path) {
            Some(index) => self.graph.remove_node(index).is_some(),
            None => false,
        }
    }

    /// Remove the node for the named composition and its links
    pub fn remove_composition(&mut self, name: &str) -> bool {
        match self.composition_nodes.remove(name) {
            Some(index) => self.graph.remove_node(index).is_some(),
            None => false,
        }
    }

    /// All nodes, ordered by id
    pub fn nodes(&self) -> Vec<&CanvasNode> {
        let mut nodes: Vec<&CanvasNode> = self.graph.node_weights().collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes
    }

    /// All links, ordered
    pub fn links(&self) -> Vec<CanvasLink> {
        let mut links: Vec<CanvasLink> = self
            .graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .filter_map(|(a, b)| {
                let a = self.graph.node_weight(a)?;
                let b = self.graph.node_weight(b)?;
                Some(CanvasLink::between(&a.id, &b.id))
            })
            .collect();
        links.sort();
        links
    }

    pub fn shape(&self) -> CanvasShape {
        let mut shape = CanvasShape {
            sources: self.source_nodes.keys().cloned().collect(),
            compositions: self.composition_nodes.keys().cloned().collect(),
            links: BTreeSet::new(),
        };
        for (name, &comp) in &self.composition_nodes {
            for (path, &source) in &self.source_nodes {
                if self.graph.find_edge(comp, source).is_some() {
                    shape.links.insert((path.clone(), name.clone()));
                }
            }
        }
        shape
    }
}
