#![warn(missing_docs)]

//! # `dichromate`
//!
//! A solver for [Flood-It](https://en.wikipedia.org/wiki/Flood_fill) style puzzles that finds provably shortest
//! move sequences. Begin by parsing or generating a [`ColorBoard`], pick the flood origin with
//! [`with_origin()`](ColorBoard::with_origin), then call [`solve()`](crate::ColorBoard::solve) to obtain the optimal
//! sequence of colors.
//! Producers that are not grids at all can build a [`Graph`] directly, [`reduce()`](Graph::reduce) it and call
//! [`compute_best_sequence`] themselves; the board facade is just the rectangular special case.
//!
//! # Internals
//! The board is expressed as a colored undirected graph with one node per cell and the flood origin as root.
//! Adjacent nodes of the same color always flood together, so the graph is first reduced by merging them, which
//! leaves a graph where no edge connects two nodes of equal color.
//!
//! On the reduced graph the crate runs an A* search. A search state is the set of flooded nodes plus the moves that
//! produced it; its priority is the number of moves played plus a consistent lower bound on the moves still needed,
//! obtained from a layered sweep that eliminates a color outright whenever the region has reached all of its nodes
//! and otherwise advances one color-blind layer at a time. Two prunes keep the frontier small: moves that absorb
//! nothing are discarded, and of two commuting consecutive moves only the ascending-color order survives.
//!
//! Since sibling states share almost their entire history, move sequences live in an append-only trie of small
//! chained blocks and states carry only a two-word [`Sequence`] handle, keeping state copies cheap.

pub use board::{BoardInvalidReason, ColorBoard};
pub use graph::{Color, Graph, Node};
pub use location::{Coord, Dimension, Location};
pub use solver::{compute_best_sequence, SolverFailure};
pub use state::State;
pub use trie::{Sequence, Trie};

pub(crate) mod board;
mod tests;
pub(crate) mod graph;
pub(crate) mod location;
pub(crate) mod solver;
pub(crate) mod state;
pub(crate) mod trie;
pub(crate) mod unionfind;
