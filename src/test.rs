#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Instant;

    use crate::{
        BitBoard, BoardGeometry, GameState, Outcome, Player, Solver, Square, BOARD_LENGTH,
        QUEUE_CAPACITY,
    };

    #[test]
    pub fn toggle_is_self_inverse() {
        let geometry = BoardGeometry::new();
        let mut board =
            BitBoard::from_squares(vec![Square::new(0, 0), Square::new(1, 2)].into_iter());
        for &square in geometry.squares() {
            let before = board;
            board.toggle(square);
            board.toggle(square);
            assert_eq!(board, before);
        }
    }

    #[test]
    pub fn full_lines_win() {
        let geometry = BoardGeometry::new();

        let row = BitBoard::from_squares((0..BOARD_LENGTH).map(|col| Square::new(0, col)));
        assert!(row.won(&geometry));

        let partial =
            BitBoard::from_squares(vec![Square::new(0, 0), Square::new(0, 1)].into_iter());
        assert!(!partial.won(&geometry));
    }

    #[test]
    pub fn occupancy_and_win_detection() {
        let geometry = BoardGeometry::new();
        let mut board = BitBoard::from_squares(
            vec![(0, 1), (2, 2), (2, 0), (2, 1)]
                .into_iter()
                .map(|(row, col)| Square::new(row, col)),
        );
        board.toggle(Square::new(0, 1));

        let expected = [(2, 2), (2, 0), (2, 1)];
        for &square in geometry.squares() {
            let should_be_occupied = expected
                .iter()
                .any(|&(row, col)| Square::new(row, col) == square);
            assert_eq!(board.is_occupied(square), should_be_occupied);
        }
        // bottom row complete
        assert!(board.won(&geometry));
        board.toggle(Square::new(2, 1));
        assert!(!board.won(&geometry));
        board.toggle(Square::new(1, 1));
        assert!(!board.won(&geometry));
        // completes the main diagonal
        board.toggle(Square::new(0, 0));
        assert!(board.won(&geometry));
    }

    #[test]
    pub fn queue_length_tracks_move_count() {
        let geometry = BoardGeometry::new();
        let mut state = GameState::initial();
        for moves in 1..=(3 * QUEUE_CAPACITY) {
            state = state
                .successors(&geometry)
                .into_iter()
                .find(|child| !child.is_over(&geometry))
                .expect("a quiet continuation exists");
            assert_eq!(state.queue().len(), moves.min(QUEUE_CAPACITY));
        }
    }

    #[test]
    pub fn successors_respect_the_recycle_rule() -> Result<()> {
        let geometry = BoardGeometry::new();

        // before any recycling every empty square is playable
        let initial = GameState::initial();
        let openings = initial.successors(&geometry);
        assert_eq!(openings.len(), BOARD_LENGTH * BOARD_LENGTH);
        for child in &openings {
            assert_ne!(child.key(), initial.key());
            assert_eq!(child.queue().len(), 1);
        }

        // six plies fill the queue without completing a line; X's first
        // piece at (0, 0) is now due for recycling
        let state = GameState::from_moves(
            &[(0, 0), (1, 1), (0, 1), (0, 2), (2, 1), (1, 0)],
            &geometry,
        )?;
        assert!(state.queue().is_full());

        let recycled = Square::new(0, 0);
        let children = state.successors(&geometry);
        for child in &children {
            assert_ne!(child.key(), state.key());
            // the vacated square is never the new placement
            assert_ne!(child.last_move(), Some(recycled));
            // and the mover's oldest piece really came off
            assert!(!child.player_board(Player::X).is_occupied(recycled));
            assert_eq!(child.queue().len(), QUEUE_CAPACITY);
        }
        // five squares stay occupied after the vacate, and the vacated
        // square itself is off limits, leaving three placements
        assert_eq!(children.len(), 3);
        Ok(())
    }

    #[test]
    pub fn outcome_preference_policy() {
        let fast_win = Outcome::Decided {
            winner: Player::X,
            depth_to_mate: 0,
        };
        let slow_win = Outcome::Decided {
            winner: Player::X,
            depth_to_mate: 1,
        };
        // a faster mate already held rejects the slower alternative
        assert!(!fast_win.prefer_other(&slow_win, Player::X));
        assert!(slow_win.prefer_other(&fast_win, Player::X));

        // any decided win beats undetermined
        let win = Outcome::Decided {
            winner: Player::X,
            depth_to_mate: 3,
        };
        assert!(Outcome::Undetermined.prefer_other(&win, Player::X));

        // undetermined is kept over a confirmed loss
        let loss = Outcome::Decided {
            winner: Player::O,
            depth_to_mate: 4,
        };
        assert!(!Outcome::Undetermined.prefer_other(&loss, Player::X));
        assert!(loss.prefer_other(&Outcome::Undetermined, Player::X));

        // between two losses the longer defence is preferred
        let quick_loss = Outcome::Decided {
            winner: Player::O,
            depth_to_mate: 2,
        };
        let long_loss = Outcome::Decided {
            winner: Player::O,
            depth_to_mate: 5,
        };
        assert!(quick_loss.prefer_other(&long_loss, Player::X));
        assert!(!long_loss.prefer_other(&quick_loss, Player::X));
    }

    #[test]
    pub fn terminal_and_one_ply_evaluation() -> Result<()> {
        let geometry = BoardGeometry::new();

        // X completes the top row on the fifth ply
        let terminal =
            GameState::from_moves(&[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)], &geometry)?;
        assert!(terminal.is_over(&geometry));
        assert_eq!(terminal.winner(&geometry), Some(Player::X));
        let mut solver = Solver::new(terminal);
        assert_eq!(solver.solve(), (Player::X, 0));

        // one ply earlier X mates in one
        let one_ply = GameState::from_moves(&[(0, 0), (1, 0), (0, 1), (1, 1)], &geometry)?;
        let mut solver = Solver::new(one_ply);
        assert_eq!(solver.solve(), (Player::X, 1));
        Ok(())
    }

    #[test]
    pub fn structural_key_distinguishes_states() -> Result<()> {
        let geometry = BoardGeometry::new();

        // identical bitboards and turn, different queue order
        let a = GameState::from_moves(&[(0, 0), (1, 1), (2, 2), (0, 1)], &geometry)?;
        let b = GameState::from_moves(&[(2, 2), (1, 1), (0, 0), (0, 1)], &geometry)?;
        assert_eq!(
            a.player_board(Player::X).value(),
            b.player_board(Player::X).value()
        );
        assert_ne!(a.key(), b.key());

        // the same move sequence reproduces the same key
        let again = GameState::from_moves(&[(0, 0), (1, 1), (2, 2), (0, 1)], &geometry)?;
        assert_eq!(a.key(), again.key());
        Ok(())
    }

    #[test]
    pub fn play_rejects_illegal_placements() -> Result<()> {
        let geometry = BoardGeometry::new();

        let state = GameState::from_moves(&[(0, 0), (1, 1)], &geometry)?;
        assert!(state.play(Square::new(0, 0), &geometry).is_err());
        assert!(state.play(Square::new(1, 1), &geometry).is_err());
        assert!(state.play(Square::new(2, 2), &geometry).is_ok());

        // after six plies the vacated square is off limits for one move
        let full = GameState::from_moves(
            &[(0, 0), (1, 1), (0, 1), (0, 2), (2, 1), (1, 0)],
            &geometry,
        )?;
        assert!(full.play(Square::new(0, 0), &geometry).is_err());
        assert!(full.play(Square::new(2, 0), &geometry).is_ok());

        // coordinates off the board are rejected before construction
        assert!(GameState::from_moves(&[(0, BOARD_LENGTH)], &geometry).is_err());
        Ok(())
    }

    #[test]
    pub fn full_solve_is_deterministic() {
        let mut solver = Solver::new(GameState::initial());
        let first = solver.solve();
        assert!(first.1 > 0);

        let mut second = Solver::new(GameState::initial());
        assert_eq!(first, second.solve());
    }

    #[test]
    pub fn principal_line_realises_the_forced_result() {
        let geometry = BoardGeometry::new();
        let mut solver = Solver::new(GameState::initial());
        let (winner, depth_to_mate) = solver.solve();

        let line = solver.principal_line();
        assert_eq!(line.len(), depth_to_mate as usize + 1);

        let last = line.last().expect("the line contains the root");
        assert!(last.is_over(&geometry));
        assert_eq!(last.winner(&geometry), Some(winner));

        // consecutive states are parent and child
        for pair in line.windows(2) {
            assert!(pair[0]
                .successors(&geometry)
                .iter()
                .any(|child| child.key() == pair[1].key()));
        }
    }

    #[test]
    pub fn progress_hook_reports_monotonic_counts() {
        let counts = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&counts);
        let mut solver = Solver::new(GameState::initial()).with_progress_hook(Box::new(
            move |decided, _budget| {
                sink.borrow_mut().push(decided);
            },
        ));
        solver.solve();

        let counts = counts.borrow();
        assert!(!counts.is_empty());
        assert!(counts.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    pub fn full_search() {
        let start_time = Instant::now();
        let mut solver = Solver::new(GameState::initial());
        let (winner, depth_to_mate) = solver.solve();
        let time = Instant::now() - start_time;

        println!(
            "Full game search\n Time: {:.6}s, No. of nodes: {}, knodes/s: {}",
            time.as_secs_f64(),
            solver.node_count,
            solver.node_count as f64 / (1000.0 * time.as_secs_f64())
        );
        println!(
            "Calculated winner: {}, depth to mate: {}",
            winner.mark(),
            depth_to_mate
        );
    }
}
