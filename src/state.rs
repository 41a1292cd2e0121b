//! Search states for the best-first driver.

use std::cmp::Ordering;

use fixedbitset::FixedBitSet;

use crate::graph::{Color, Graph};
use crate::trie::{Sequence, Trie};

/// One node of the search: the flooded region, a handle to the move
/// history that produced it, and the cached valuation used as the A*
/// priority.
#[derive(Clone)]
pub struct State {
    filled: FixedBitSet,
    moves: Sequence,
    valuation: u32,
}

impl State {
    /// Initial state on a reduced graph: only the root is flooded, and the
    /// history starts with the root's color as its first pseudo-move.
    pub fn new(graph: &Graph, trie: &mut Trie) -> Self {
        debug_assert!(graph.is_reduced(), "the solver requires a reduced graph");

        let root = graph.root_index() as usize;
        let mut filled = FixedBitSet::with_capacity(graph.num_nodes());
        filled.insert(root);
        let moves = trie.append(Trie::initial(), graph[root].color());

        let mut state = Self {
            filled,
            moves,
            valuation: 0,
        };
        state.valuation = state.compute_valuation(graph);
        state
    }

    /// Floods with `next`, absorbing every node of that color adjacent to
    /// the region.
    ///
    /// Returns false when the move is useless or when the same pair of
    /// moves in ascending color order reaches at least as far, in which
    /// case the caller must discard the state. `next` must differ from the
    /// last color played.
    pub fn apply(&mut self, graph: &Graph, trie: &mut Trie, next: Color) -> bool {
        let last = trie.last(&self.moves);
        debug_assert_ne!(next, last, "repeating the current color is illegal");
        self.moves = trie.append(self.moves, next);

        let accepted = if next > last {
            self.absorb(graph, next)
        } else {
            self.absorb_reordered(graph, next, last)
        };
        if accepted {
            self.valuation = self.compute_valuation(graph);
        }
        accepted
    }

    /// `next > last`: the move is worth keeping iff it absorbs anything.
    fn absorb(&mut self, graph: &Graph, next: Color) -> bool {
        // Nodes of the new color are never adjacent to each other in a
        // reduced graph, so marking during the scan cannot affect later
        // neighbor checks.
        let mut expansion = false;
        for node in 0..graph.num_nodes() {
            if graph[node].color() == next
                && !self.filled.contains(node)
                && graph[node]
                    .neighbors()
                    .iter()
                    .any(|&neighbor| self.filled.contains(neighbor as usize))
            {
                self.filled.insert(node);
                expansion = true;
            }
        }
        expansion
    }

    /// `next < last`: keep the move only if some absorbed node was out of
    /// reach before the previous move. Otherwise playing `next` first and
    /// `last` second expands at least as far, and that ascending ordering
    /// is the canonical representative of the pair.
    fn absorb_reordered(&mut self, graph: &Graph, next: Color, last: Color) -> bool {
        let mut fresh_expansion = false;
        for node in 0..graph.num_nodes() {
            if graph[node].color() != next || self.filled.contains(node) {
                continue;
            }

            let mut absorbed = false;
            let mut reachable_before = false;
            for &neighbor in graph[node].neighbors() {
                if self.filled.contains(neighbor as usize) {
                    absorbed = true;
                    if graph[neighbor as usize].color() != last {
                        reachable_before = true;
                    }
                }
            }
            if absorbed {
                self.filled.insert(node);
                if !reachable_before {
                    fresh_expansion = true;
                }
            }
        }
        fresh_expansion
    }

    /// True when every node is flooded.
    pub fn done(&self) -> bool {
        self.filled.count_ones(..) == self.filled.len()
    }

    /// Cached lower bound on the total number of moves, including those
    /// already played.
    pub fn valuation(&self) -> u32 {
        self.valuation
    }

    /// Handle to the move history, including the initial pseudo-move.
    pub fn moves(&self) -> &Sequence {
        &self.moves
    }

    /// Color of the last move.
    pub fn last_color(&self, trie: &Trie) -> Color {
        trie.last(&self.moves)
    }

    /// Moves played so far plus a lower bound on the moves still needed.
    ///
    /// The bound comes from a layered sweep outward from the flooded
    /// region, tracking how many unvisited nodes each color has left. When
    /// the previous layer zeroed out one or more colors, those colors can
    /// be played directly: the sweep accounts one move per such color and
    /// advances only through their nodes. Otherwise no single color can
    /// absorb the whole frontier and the sweep accounts one color-blind
    /// pseudo-move that expands every frontier node at once.
    fn compute_valuation(&self, graph: &Graph) -> u32 {
        let mut visited = self.filled.clone();
        let mut remaining = graph.color_counts().to_vec();

        let mut current: Vec<u32> = self.filled.ones().map(|node| node as u32).collect();
        let mut next = Vec::with_capacity(graph.num_nodes());
        for &node in &current {
            remaining[graph[node as usize].color() as usize] -= 1;
        }

        let mut distance = 0u32;
        let mut exposed = 0u32;
        let mut eliminated = vec![false; remaining.len()];
        while !current.is_empty() {
            if exposed > 0 {
                distance += exposed;
                exposed = 0;
                // Decide which colors to play from the counts as they were
                // when the previous layer finished; colors zeroed while
                // expanding this layer have to wait one more round.
                for (color, &count) in remaining.iter().enumerate() {
                    eliminated[color] = count == 0;
                }
                for &node in &current {
                    if eliminated[graph[node as usize].color() as usize] {
                        expand_node(
                            graph,
                            node,
                            &mut visited,
                            &mut next,
                            &mut remaining,
                            &mut exposed,
                        );
                    } else {
                        next.push(node);
                    }
                }
            } else {
                distance += 1;
                for &node in &current {
                    expand_node(
                        graph,
                        node,
                        &mut visited,
                        &mut next,
                        &mut remaining,
                        &mut exposed,
                    );
                }
            }

            std::mem::swap(&mut current, &mut next);
            next.clear();
        }

        self.moves.len() as u32 + distance
    }
}

/// Visits all unvisited neighbors of `node`, queueing them for the next
/// layer and tracking colors whose last unvisited node was just reached.
fn expand_node(
    graph: &Graph,
    node: u32,
    visited: &mut FixedBitSet,
    next: &mut Vec<u32>,
    remaining: &mut [u32],
    exposed: &mut u32,
) {
    for &neighbor in graph[node as usize].neighbors() {
        if !visited.contains(neighbor as usize) {
            visited.insert(neighbor as usize);
            next.push(neighbor);
            let count = &mut remaining[graph[neighbor as usize].color() as usize];
            *count -= 1;
            if *count == 0 {
                *exposed += 1;
            }
        }
    }
}

// The frontier is a max-heap, so "greater" must mean "expand first": the
// smallest valuation wins, and on equal valuations the deeper state does.
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .valuation
            .cmp(&self.valuation)
            .then_with(|| self.moves.len().cmp(&other.moves.len()))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}
