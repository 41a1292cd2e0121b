//! Colored undirected graphs and their reduction.

use std::mem;
use std::ops::Index;

use itertools::Itertools;
use log::debug;

use crate::solver::SolverFailure;
use crate::unionfind::UnionFind;

/// A color index. Puzzle colors are consecutive small integers starting
/// at zero.
pub type Color = u8;

/// One node of a [`Graph`].
#[derive(Clone, Debug, Default)]
pub struct Node {
    color: Color,
    neighbors: Vec<u32>,
}

impl Node {
    /// Color of the node.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Sorted, duplicate-free list of adjacent node indices.
    pub fn neighbors(&self) -> &[u32] {
        &self.neighbors
    }
}

/// Colored undirected graph with a distinguished root node.
///
/// Producers build the graph incrementally with [`set_color`](Graph::set_color),
/// [`set_root_index`](Graph::set_root_index) and [`add_edge`](Graph::add_edge),
/// then call [`reduce`](Graph::reduce) before handing it to
/// [`compute_best_sequence`](crate::solver::compute_best_sequence).
pub struct Graph {
    nodes: Vec<Node>,
    root: u32,
    color_counts: Vec<u32>,
}

impl Graph {
    /// A graph of `num_nodes` unconnected nodes, all of color 0, rooted at
    /// node 0.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            nodes: vec![Node::default(); num_nodes],
            root: 0,
            color_counts: vec![num_nodes as u32],
        }
    }

    /// Number of nodes in the graph.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Index of the root node, i.e. the flood origin.
    pub fn root_index(&self) -> u32 {
        self.root
    }

    /// Declares `index` the root node.
    pub fn set_root_index(&mut self, index: u32) {
        debug_assert!((index as usize) < self.nodes.len());
        self.root = index;
    }

    /// Node count per color. The length is one past the largest color
    /// present in the graph.
    pub fn color_counts(&self) -> &[u32] {
        &self.color_counts
    }

    /// Number of distinct colors. Only meaningful once every color below
    /// the maximum is actually populated, which [`reduce`](Graph::reduce)
    /// verifies.
    pub fn num_colors(&self) -> usize {
        self.color_counts.len()
    }

    /// Recolors node `index`.
    pub fn set_color(&mut self, index: u32, color: Color) {
        let node = &mut self.nodes[index as usize];
        self.color_counts[node.color as usize] -= 1;
        node.color = color;

        if self.color_counts.len() <= color as usize {
            self.color_counts.resize(color as usize + 1, 0);
        }
        self.color_counts[color as usize] += 1;
        while self.color_counts.len() > 1 && *self.color_counts.last().unwrap() == 0 {
            self.color_counts.pop();
        }
    }

    /// Inserts the undirected edge `(a, b)`, keeping both adjacency lists
    /// sorted. Duplicate edges are ignored.
    pub fn add_edge(&mut self, a: u32, b: u32) {
        debug_assert_ne!(a, b, "self-loops are not allowed");
        for (from, to) in [(a, b), (b, a)] {
            let neighbors = &mut self.nodes[from as usize].neighbors;
            if let Err(position) = neighbors.binary_search(&to) {
                neighbors.insert(position, to);
            }
        }
    }

    /// True when no edge connects two nodes of the same color.
    pub fn is_reduced(&self) -> bool {
        self.nodes.iter().all(|node| {
            node.neighbors
                .iter()
                .all(|&neighbor| self.nodes[neighbor as usize].color != node.color)
        })
    }

    /// Merges adjacent nodes of equal color.
    ///
    /// The nodes of one monochromatic region always flood together, so
    /// collapsing each region into a single node first keeps search states
    /// small. The old root ends up inside the new root node, and
    /// [`color_counts`](Graph::color_counts) reflects the reduced node set.
    ///
    /// Fails with [`SolverFailure::ColorEliminated`] if some color ends up
    /// with no nodes at all, which no well-formed input can cause.
    pub fn reduce(&mut self) -> Result<(), SolverFailure> {
        let num_nodes = self.nodes.len();

        let mut partitions = UnionFind::new(num_nodes);
        for (index, node) in self.nodes.iter().enumerate() {
            for &neighbor in &node.neighbors {
                if node.color == self.nodes[neighbor as usize].color {
                    partitions.merge(index as u32, neighbor);
                }
            }
        }

        // Number the representatives in ascending order of their old
        // indices; merging parents the lower index, so every representative
        // is numbered by the time its members resolve to it.
        let mut renumbered = vec![0u32; num_nodes];
        let mut num_representatives = 0u32;
        for index in 0..num_nodes {
            if partitions.find(index as u32) == index as u32 {
                renumbered[index] = num_representatives;
                num_representatives += 1;
            } else {
                self.color_counts[self.nodes[index].color as usize] -= 1;
            }
        }

        self.root = renumbered[partitions.find(self.root) as usize];

        // Collect the adjacency of each class on its representative.
        for index in 0..num_nodes {
            let parent = partitions.find(index as u32) as usize;
            if parent != index {
                let absorbed = mem::take(&mut self.nodes[index].neighbors);
                self.nodes[parent].neighbors.extend(absorbed);
            }
        }

        let nodes = mem::take(&mut self.nodes);
        self.nodes = nodes
            .into_iter()
            .enumerate()
            .filter(|&(index, _)| partitions.find(index as u32) == index as u32)
            .map(|(_, node)| node)
            .collect();

        for (index, node) in self.nodes.iter_mut().enumerate() {
            let merged = mem::take(&mut node.neighbors);
            node.neighbors = merged
                .into_iter()
                .map(|neighbor| renumbered[partitions.find(neighbor) as usize])
                .filter(|&neighbor| neighbor != index as u32)
                .sorted_unstable()
                .dedup()
                .collect();
        }

        debug!(
            "reduced graph from {} to {} nodes",
            num_nodes,
            self.nodes.len()
        );

        match self.color_counts.iter().position(|&count| count == 0) {
            Some(color) => Err(SolverFailure::ColorEliminated {
                color: color as Color,
            }),
            None => Ok(()),
        }
    }
}

impl Index<usize> for Graph {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        &self.nodes[index]
    }
}
