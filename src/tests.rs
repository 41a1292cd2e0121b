#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use ndarray::Array2;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::board::{BoardInvalidReason, ColorBoard};
    use crate::graph::{Color, Graph};
    use crate::location::Location;
    use crate::solver::{compute_best_sequence, SolverFailure};
    use crate::state::State;
    use crate::trie::Trie;

    /// Builds a graph from per-node colors and an undirected edge list,
    /// rooted at node 0.
    fn graph_from(colors: &[Color], edges: &[(u32, u32)]) -> Graph {
        let mut graph = Graph::new(colors.len());
        for (index, &color) in colors.iter().enumerate() {
            graph.set_color(index as u32, color);
        }
        for &(a, b) in edges {
            graph.add_edge(a, b);
        }
        graph
    }

    /// One flood move under replay semantics: fills every node of `color`
    /// adjacent to the region. A single pass suffices on a reduced graph,
    /// where equal-colored nodes are never adjacent.
    fn flood(graph: &Graph, filled: &[bool], color: Color) -> Vec<bool> {
        let mut next = filled.to_vec();
        for node in 0..graph.num_nodes() {
            if filled[node] {
                for &neighbor in graph[node].neighbors() {
                    if graph[neighbor as usize].color() == color {
                        next[neighbor as usize] = true;
                    }
                }
            }
        }
        next
    }

    /// Replays a move sequence on a reduced graph and reports whether it
    /// floods every node.
    fn replay_fills(graph: &Graph, solution: &[Color]) -> bool {
        let mut filled = vec![false; graph.num_nodes()];
        filled[graph.root_index() as usize] = true;
        for &color in solution {
            filled = flood(graph, &filled, color);
        }
        filled.iter().all(|&f| f)
    }

    /// Exhaustively checks whether some sequence of at most `limit` moves
    /// floods the graph. Confirms optimality of the solver on small inputs.
    fn solvable_within(graph: &Graph, filled: &[bool], last: Color, limit: usize) -> bool {
        if filled.iter().all(|&f| f) {
            return true;
        }
        if limit == 0 {
            return false;
        }
        for color in 0..graph.num_colors() {
            let color = color as Color;
            if color == last {
                continue;
            }
            let next = flood(graph, filled, color);
            if next.as_slice() == filled {
                continue;
            }
            if solvable_within(graph, &next, color, limit - 1) {
                return true;
            }
        }
        false
    }

    fn initial_filled(graph: &Graph) -> Vec<bool> {
        let mut filled = vec![false; graph.num_nodes()];
        filled[graph.root_index() as usize] = true;
        filled
    }

    /// Solves a fixture stated on an already-reduced graph and checks the
    /// full solver contract against the known optimal move count.
    fn check_scenario(colors: &[Color], edges: &[(u32, u32)], optimal_moves: usize) {
        let graph = graph_from(colors, edges);
        assert!(graph.is_reduced(), "fixtures must be stated reduced");

        let solution = compute_best_sequence(&graph).unwrap();
        assert_eq!(solution[0], colors[0]);
        assert!(replay_fills(&graph, &solution));
        assert_eq!(solution.len() - 1, optimal_moves);

        if optimal_moves > 0 {
            assert!(!solvable_within(
                &graph,
                &initial_filled(&graph),
                colors[0],
                optimal_moves - 1
            ));
        }
    }

    #[test]
    fn single_node() {
        check_scenario(&[0], &[], 0);
    }

    #[test]
    fn two_nodes() {
        check_scenario(&[0, 1], &[(0, 1)], 1);
    }

    #[test]
    fn path_of_three() {
        check_scenario(&[0, 1, 0], &[(0, 1), (1, 2)], 2);
    }

    #[test]
    fn triangle() {
        check_scenario(&[0, 1, 2], &[(0, 1), (0, 2), (1, 2)], 2);
    }

    #[test]
    fn four_cycle_two_colors() {
        check_scenario(&[0, 1, 1, 0], &[(0, 1), (0, 2), (1, 3), (2, 3)], 2);
    }

    #[test]
    fn four_cycle_three_colors() {
        check_scenario(&[0, 1, 2, 0], &[(0, 1), (0, 2), (1, 3), (2, 3)], 3);
    }

    #[test]
    fn triangle_with_pendant() {
        check_scenario(&[0, 1, 2, 0], &[(0, 1), (0, 2), (1, 2), (2, 3)], 3);
    }

    #[test]
    fn triangle_with_matching_pendant() {
        check_scenario(&[0, 1, 2, 1], &[(0, 1), (0, 2), (1, 2), (2, 3)], 2);
    }

    #[test]
    fn near_complete_four() {
        check_scenario(&[0, 1, 2, 0], &[(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)], 3);
    }

    #[test]
    fn complete_four() {
        check_scenario(
            &[0, 1, 2, 3],
            &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
            3,
        );
    }

    #[test]
    fn disconnected_graph_fails() {
        let graph = graph_from(&[0, 1], &[]);
        assert_eq!(
            compute_best_sequence(&graph),
            Err(SolverFailure::Disconnected)
        );
    }

    fn graph_snapshot(graph: &Graph) -> (usize, u32, Vec<u32>, Vec<(Color, Vec<u32>)>) {
        (
            graph.num_nodes(),
            graph.root_index(),
            graph.color_counts().to_vec(),
            (0..graph.num_nodes())
                .map(|node| (graph[node].color(), graph[node].neighbors().to_vec()))
                .collect_vec(),
        )
    }

    #[test]
    fn add_edge_keeps_lists_sorted_and_deduplicated() {
        let mut graph = graph_from(&[0, 1, 0], &[(2, 0), (0, 1)]);
        graph.add_edge(0, 1);

        assert_eq!(graph[0].neighbors(), &[1, 2]);
        assert_eq!(graph[1].neighbors(), &[0]);
        assert_eq!(graph[2].neighbors(), &[0]);
    }

    #[test]
    fn reduce_merges_monochromatic_regions() {
        // A path 0-0-1-1-0 collapses to 0-1-0.
        let mut graph = graph_from(&[0, 0, 1, 1, 0], &[(0, 1), (1, 2), (2, 3), (3, 4)]);
        graph.reduce().unwrap();

        assert_eq!(
            graph_snapshot(&graph),
            (
                3,
                0,
                vec![2, 1],
                vec![(0, vec![1]), (1, vec![0, 2]), (0, vec![1])],
            )
        );
        assert!(graph.is_reduced());
    }

    #[test]
    fn reduce_remaps_the_root_into_its_region() {
        let mut graph = graph_from(&[0, 0, 1, 1, 0], &[(0, 1), (1, 2), (2, 3), (3, 4)]);
        graph.set_root_index(3);
        graph.reduce().unwrap();

        assert_eq!(graph.root_index(), 1);
        assert_eq!(graph[1].color(), 1);
    }

    #[test]
    fn reduce_is_idempotent() {
        let mut graph = graph_from(
            &[0, 0, 1, 2, 1, 0],
            &[(0, 1), (0, 2), (1, 3), (2, 4), (3, 5), (4, 5), (2, 3)],
        );
        graph.reduce().unwrap();
        let once = graph_snapshot(&graph);
        graph.reduce().unwrap();

        assert_eq!(graph_snapshot(&graph), once);
    }

    #[test]
    fn reduce_preserves_the_set_of_colors() {
        let mut graph = graph_from(&[2, 2, 0, 1, 1, 0], &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);
        let colors_before = graph.color_counts().len();
        graph.reduce().unwrap();

        assert_eq!(graph.color_counts().len(), colors_before);
        assert!(graph.color_counts().iter().all(|&count| count > 0));
    }

    #[test]
    fn reduce_rejects_color_gaps() {
        let mut graph = graph_from(&[0, 2], &[(0, 1)]);
        assert_eq!(
            graph.reduce(),
            Err(SolverFailure::ColorEliminated { color: 1 })
        );
    }

    #[test]
    fn moves_that_absorb_nothing_are_rejected() {
        // Color 2 is behind color 1 and not yet adjacent to the region.
        let graph = graph_from(&[0, 1, 2], &[(0, 1), (1, 2)]);
        let mut trie = Trie::new();
        let state = State::new(&graph, &mut trie);

        assert!(!state.clone().apply(&graph, &mut trie, 2));
        assert!(state.clone().apply(&graph, &mut trie, 1));
    }

    #[test]
    fn only_the_ascending_order_of_commuting_moves_survives() {
        // Two independent branches; playing 1 then 2 commutes with 2 then 1.
        let graph = graph_from(&[0, 1, 2], &[(0, 1), (0, 2)]);
        let mut trie = Trie::new();
        let state = State::new(&graph, &mut trie);

        let mut ascending = state.clone();
        assert!(ascending.apply(&graph, &mut trie, 1));
        assert!(ascending.apply(&graph, &mut trie, 2));
        assert!(ascending.done());

        let mut descending = state.clone();
        assert!(descending.apply(&graph, &mut trie, 2));
        assert!(!descending.apply(&graph, &mut trie, 1));
    }

    #[test]
    fn valuation_counts_layers_from_the_region() {
        let graph = graph_from(&[0, 1, 0], &[(0, 1), (1, 2)]);
        let mut trie = Trie::new();
        let state = State::new(&graph, &mut trie);

        // One move played, plus one layer per remaining node and the final
        // sweep that finds nothing new.
        assert_eq!(state.valuation(), 4);
    }

    /// The valuation may drop by at most one per applied move, so the
    /// priority of a successor never undercuts its parent.
    fn assert_consistent_valuations(graph: &Graph) {
        let mut trie = Trie::new();
        let mut pending = vec![State::new(graph, &mut trie)];
        let mut visited = 0;
        while let Some(state) = pending.pop() {
            visited += 1;
            if state.done() || visited > 200 {
                continue;
            }
            let remaining = state.valuation() - state.moves().len() as u32;
            for color in 0..graph.num_colors() {
                let color = color as Color;
                if color == state.last_color(&trie) {
                    continue;
                }
                let mut successor = state.clone();
                if successor.apply(graph, &mut trie, color) {
                    let successor_remaining =
                        successor.valuation() - successor.moves().len() as u32;
                    assert!(successor_remaining + 1 >= remaining);
                    pending.push(successor);
                }
            }
        }
    }

    #[test]
    fn valuations_are_consistent_on_fixtures() {
        assert_consistent_valuations(&graph_from(&[0, 1, 0], &[(0, 1), (1, 2)]));
        assert_consistent_valuations(&graph_from(
            &[0, 1, 2, 0],
            &[(0, 1), (0, 2), (1, 3), (2, 3)],
        ));
        assert_consistent_valuations(&graph_from(
            &[0, 1, 2, 3],
            &[(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)],
        ));
    }

    #[test]
    fn parse_and_solve_a_path_board() {
        let board = ColorBoard::parse("1 3\n0 1 0").unwrap();
        let solution = board.solve().unwrap();

        assert_eq!(solution[0], 0);
        assert_eq!(solution.len() - 1, 2);
    }

    #[test]
    fn parse_and_solve_a_checkerboard() {
        let board = ColorBoard::parse("2 2\n0 1\n1 0").unwrap();
        let solution = board.solve().unwrap();

        assert_eq!(solution, vec![0, 1, 0]);
    }

    #[test]
    fn origin_changes_the_root_color() {
        let board = ColorBoard::parse("1 3\n0 1 0")
            .unwrap()
            .with_origin(Location(1, 0))
            .unwrap();
        let solution = board.solve().unwrap();

        // Flooding from the middle absorbs both ends in a single move.
        assert_eq!(solution, vec![1, 0]);
    }

    #[test]
    fn boards_display_one_character_per_cell() {
        let board = ColorBoard::parse("2 3\n0 1 2\n2 1 0").unwrap();
        assert_eq!(format!("{}", board), "012\n210\n");
    }

    #[test]
    fn parse_rejects_malformed_boards() {
        assert_eq!(
            ColorBoard::parse("").unwrap_err(),
            BoardInvalidReason::BadDimensions
        );
        assert_eq!(
            ColorBoard::parse("0 3\n").unwrap_err(),
            BoardInvalidReason::BadDimensions
        );
        assert_eq!(
            ColorBoard::parse("2 2\n0 1 0").unwrap_err(),
            BoardInvalidReason::CellCountMismatch {
                expected: 4,
                found: 3
            }
        );
        assert_eq!(
            ColorBoard::parse("1 2\n0 256").unwrap_err(),
            BoardInvalidReason::BadColorLabel
        );
        assert_eq!(
            ColorBoard::parse("1 2\n0 2").unwrap_err(),
            BoardInvalidReason::MissingColor { color: 1 }
        );
        assert_eq!(
            ColorBoard::parse("1 1\n0")
                .unwrap()
                .with_origin(Location(1, 0))
                .unwrap_err(),
            BoardInvalidReason::OriginOutOfBounds
        );
    }

    #[test]
    fn generated_boards_have_the_requested_shape() {
        let dims = (
            std::num::NonZero::new(6).unwrap(),
            std::num::NonZero::new(4).unwrap(),
        );
        let mut rng = StdRng::seed_from_u64(7);
        let board = ColorBoard::generate(dims, 3, &mut rng);

        assert_eq!(board.dims(), dims);
        assert_eq!(board.cells().dim(), (4, 6));
        assert!(board.cells().iter().all(|&cell| cell < 3));
        assert_eq!(board.neighbors(Location(0, 0)).count(), 2);
        assert_eq!(board.neighbors(Location(1, 1)).count(), 4);
    }

    prop_compose! {
        /// Random small board with its colors compacted to a consecutive
        /// range starting at zero, as the input contract requires.
        fn arb_board()(
            (width, height, labels) in (1usize..=4, 1usize..=4, 1u8..=4).prop_flat_map(
                |(width, height, colors)| {
                    (
                        Just(width),
                        Just(height),
                        proptest::collection::vec(0..colors, width * height),
                    )
                }
            )
        ) -> ColorBoard {
            let distinct = labels.iter().copied().sorted_unstable().dedup().collect_vec();
            let compacted = labels
                .iter()
                .map(|label| distinct.binary_search(label).unwrap() as Color)
                .collect_vec();
            ColorBoard::from_cells(Array2::from_shape_vec((height, width), compacted).unwrap())
                .unwrap()
        }
    }

    proptest! {
        #[test]
        fn prop_solutions_flood_the_whole_board(board in arb_board()) {
            let mut graph = board.to_graph();
            graph.reduce().unwrap();

            let solution = compute_best_sequence(&graph).unwrap();
            prop_assert_eq!(solution[0], board.color(board.origin()));
            prop_assert!(replay_fills(&graph, &solution));
        }

        #[test]
        fn prop_reduction_is_idempotent(board in arb_board()) {
            let mut graph = board.to_graph();
            graph.reduce().unwrap();
            let once = graph_snapshot(&graph);
            graph.reduce().unwrap();

            prop_assert_eq!(graph_snapshot(&graph), once);
        }

        #[test]
        fn prop_reduction_preserves_colors(board in arb_board()) {
            let mut graph = board.to_graph();
            let colors_before = graph.color_counts().len();
            graph.reduce().unwrap();

            prop_assert_eq!(graph.color_counts().len(), colors_before);
            prop_assert!(graph.color_counts().iter().all(|&count| count > 0));
        }

        #[test]
        fn prop_valuations_stay_consistent(board in arb_board()) {
            let mut graph = board.to_graph();
            graph.reduce().unwrap();
            assert_consistent_valuations(&graph);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_solutions_are_optimal(board in arb_board()) {
            let mut graph = board.to_graph();
            graph.reduce().unwrap();

            let solution = compute_best_sequence(&graph).unwrap();
            let moves = solution.len() - 1;
            let root_color = solution[0];

            prop_assert!(solvable_within(
                &graph,
                &initial_filled(&graph),
                root_color,
                moves
            ));
            if moves > 0 {
                prop_assert!(!solvable_within(
                    &graph,
                    &initial_filled(&graph),
                    root_color,
                    moves - 1
                ));
            }
        }
    }
}
