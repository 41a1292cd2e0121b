//! Best-first search for a shortest flooding sequence.

use std::collections::BinaryHeap;

use log::debug;
use thiserror::Error;

use crate::graph::{Color, Graph};
use crate::state::State;
use crate::trie::Trie;

/// Reasons the solver may fail. Both are fatal to the current search.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum SolverFailure {
    /// Reduction left a color with no nodes at all. A well-formed graph,
    /// whose color counts match its actual node colors, never triggers
    /// this.
    #[error("reduction eliminated color {color} entirely")]
    ColorEliminated {
        /// The color that ended up with no nodes.
        color: Color,
    },
    /// The search frontier ran dry before every node was flooded, so some
    /// node is unreachable from the root.
    #[error("graph is not connected")]
    Disconnected,
}

/// Computes a shortest sequence of flood moves covering the whole graph.
///
/// The first element is the root's color before any move; the remaining
/// elements are the moves in order, so the optimal move count is the
/// length minus one. The graph must be [`reduce`](Graph::reduce)d.
///
/// This runs an A* search over flood states. The valuation is a consistent
/// lower bound and ties prefer deeper states, so the first fully flooded
/// state popped from the frontier carries an optimal sequence.
pub fn compute_best_sequence(graph: &Graph) -> Result<Vec<Color>, SolverFailure> {
    let num_colors = graph.num_colors();
    let mut trie = Trie::new();

    let mut frontier = BinaryHeap::new();
    frontier.push(State::new(graph, &mut trie));

    let mut expanded = 0usize;
    while let Some(state) = frontier.pop() {
        if state.done() {
            debug!(
                "expanded {} states, {} abandoned in the frontier",
                expanded,
                frontier.len()
            );
            return Ok(trie.materialize(state.moves()));
        }

        expanded += 1;
        let last = state.last_color(&trie);
        for next in 0..num_colors {
            let next = next as Color;
            if next == last {
                continue;
            }

            let mut successor = state.clone();
            if successor.apply(graph, &mut trie, next) {
                frontier.push(successor);
            }
        }
    }

    Err(SolverFailure::Disconnected)
}
