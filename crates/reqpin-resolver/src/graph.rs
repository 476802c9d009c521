//! Dependency provenance graph: which accepted requirement introduced which.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexSet;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use reqpin_core::requirement::PackageName;

/// Edge label: the order in which the edge was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EdgeOrder(usize);

/// Parent → dependency edges between registry keys.
///
/// Nodes are package names as stored in the registry, never display
/// strings. Dependencies of a parent come back in recording order, parents
/// in the order they first gained a dependency.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<PackageName, EdgeOrder>,
    index: HashMap<PackageName, NodeIndex>,
    parents: IndexSet<NodeIndex>,
    roots: IndexSet<NodeIndex>,
    next_order: usize,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or retrieve a node.
    pub fn add_node(&mut self, name: &PackageName) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.clone());
        self.index.insert(name.clone(), idx);
        idx
    }

    /// Mark `name` as a top-level (user supplied) requirement.
    pub fn add_root(&mut self, name: &PackageName) {
        let idx = self.add_node(name);
        self.roots.insert(idx);
    }

    /// Record that `parent` introduced `child`. Repeating an edge is a no-op.
    pub fn add_edge(&mut self, parent: &PackageName, child: &PackageName) {
        let from = self.add_node(parent);
        let to = self.add_node(child);
        if self.graph.edges(from).any(|e| e.target() == to) {
            return;
        }
        self.graph.add_edge(from, to, EdgeOrder(self.next_order));
        self.next_order += 1;
        self.parents.insert(from);
    }

    pub fn contains(&self, name: &PackageName) -> bool {
        self.index.contains_key(name)
    }

    /// Direct dependencies of `name`, in recording order.
    pub fn dependencies_of(&self, name: &PackageName) -> Vec<&PackageName> {
        match self.index.get(name) {
            Some(&idx) => self.neighbors(idx, Direction::Outgoing),
            None => Vec::new(),
        }
    }

    /// Requirements that introduced `name`, in recording order.
    pub fn dependents_of(&self, name: &PackageName) -> Vec<&PackageName> {
        match self.index.get(name) {
            Some(&idx) => self.neighbors(idx, Direction::Incoming),
            None => Vec::new(),
        }
    }

    fn neighbors(&self, idx: NodeIndex, direction: Direction) -> Vec<&PackageName> {
        let mut edges: Vec<(EdgeOrder, NodeIndex)> = self
            .graph
            .edges_directed(idx, direction)
            .map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (*e.weight(), other)
            })
            .collect();
        edges.sort();
        edges.into_iter().map(|(_, n)| &self.graph[n]).collect()
    }

    /// Every parent with its dependencies, parents in first-edge order.
    pub fn edges(&self) -> impl Iterator<Item = (&PackageName, Vec<&PackageName>)> {
        self.parents
            .iter()
            .map(|&idx| (&self.graph[idx], self.neighbors(idx, Direction::Outgoing)))
    }

    /// Top-level requirements in the order they were accepted.
    pub fn roots(&self) -> impl Iterator<Item = &PackageName> {
        self.roots.iter().map(|&idx| &self.graph[idx])
    }

    /// Number of recorded edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.edge_count() == 0
    }

    /// Shortest chain from a top-level requirement down to `target`
    /// (case-insensitive), root first.
    pub fn find_path(&self, target: &PackageName) -> Option<Vec<&PackageName>> {
        let target = self
            .index
            .iter()
            .find(|(name, _)| name.matches(target))
            .map(|(_, &idx)| idx)?;

        let mut previous: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        for &root in &self.roots {
            if visited.insert(root) {
                queue.push_back(root);
            }
        }

        while let Some(current) = queue.pop_front() {
            if current == target {
                let mut path = vec![current];
                let mut cursor = current;
                while let Some(&prev) = previous.get(&cursor) {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                return Some(path.into_iter().map(|idx| &self.graph[idx]).collect());
            }
            let mut children: Vec<(EdgeOrder, NodeIndex)> = self
                .graph
                .edges(current)
                .map(|e| (*e.weight(), e.target()))
                .collect();
            children.sort();
            for (_, child) in children {
                if visited.insert(child) {
                    previous.insert(child, current);
                    queue.push_back(child);
                }
            }
        }
        None
    }

    /// Render the graph as a tree below the top-level requirements.
    ///
    /// `label` turns a registry key into the text shown for its node. A node
    /// already on the current branch is printed but not expanded again.
    pub fn print_tree(
        &self,
        max_depth: Option<usize>,
        label: &dyn Fn(&PackageName) -> String,
    ) -> String {
        let mut output = String::new();
        let mut on_branch = HashSet::new();
        for &root in &self.roots {
            output.push_str(&label(&self.graph[root]));
            output.push('\n');
            on_branch.insert(root);
            let children = self.neighbor_indices(root);
            let count = children.len();
            for (i, child) in children.into_iter().enumerate() {
                self.print_subtree(
                    &mut output,
                    child,
                    "",
                    i == count - 1,
                    1,
                    max_depth,
                    label,
                    &mut on_branch,
                );
            }
            on_branch.remove(&root);
        }
        output
    }

    fn neighbor_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<(EdgeOrder, NodeIndex)> = self
            .graph
            .edges(idx)
            .map(|e| (*e.weight(), e.target()))
            .collect();
        edges.sort();
        edges.into_iter().map(|(_, n)| n).collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        label: &dyn Fn(&PackageName) -> String,
        on_branch: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", label(&self.graph[idx])));

        if let Some(max) = max_depth {
            if depth >= max {
                return;
            }
        }

        if !on_branch.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let children = self.neighbor_indices(idx);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.print_subtree(
                output,
                child,
                &child_prefix,
                i == count - 1,
                depth + 1,
                max_depth,
                label,
                on_branch,
            );
        }

        on_branch.remove(&idx);
    }
}
