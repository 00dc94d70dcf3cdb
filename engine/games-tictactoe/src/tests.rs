use super::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

fn play(moves: &[usize]) -> State {
    moves
        .iter()
        .fold(State::new(), |state, &pos| state.apply_move(pos))
}

#[test]
fn test_initial_state() {
    let state = TicTacToe::create_initial();
    assert_eq!(state.board, [None; 9]);
    assert_eq!(state.current_player, Player::X);
    assert_eq!(state.status, GameStatus::Playing);
    assert_eq!(state.winner, None);
    assert!(state.move_history.is_empty());
    assert!(!state.is_done());
}

#[test]
fn test_legal_moves() {
    let state = State::new();
    assert_eq!(state.legal_moves(), (0..9).collect::<Vec<_>>());

    // After one move
    let state = state.apply_move(4); // Center
    let legal = state.legal_moves();
    assert_eq!(legal.len(), 8);
    assert!(!legal.contains(&4));
}

#[test]
fn test_make_move() {
    let state = State::new();
    let new_state = state.apply_move(4); // X places in center

    assert_eq!(new_state.board[4], Some(Player::X));
    assert_eq!(new_state.current_player, Player::O); // Now O's turn
    assert_eq!(new_state.move_history, vec![4]);
    assert!(!new_state.is_done());

    // The input value is untouched
    assert_eq!(state, State::new());
}

#[test]
fn test_invalid_move_occupied_cell() {
    let state = State::new().apply_move(4);

    // Try to place in same position
    assert!(state.try_move(4).is_none());
    let invalid_state = state.apply_move(4);
    assert_eq!(invalid_state, state); // Should be unchanged
    assert_eq!(invalid_state.current_player, Player::O);
}

#[test]
fn test_invalid_move_out_of_range() {
    let state = State::new();
    for pos in [9, 10, 100, usize::MAX] {
        assert!(state.try_move(pos).is_none(), "position {} accepted", pos);
        assert_eq!(state.apply_move(pos), state);
    }
}

#[test]
fn test_winning_game_top_row() {
    // X@0, O@4, X@1, O@5, X@2
    let state = play(&[0, 4, 1, 5, 2]);

    assert_eq!(state.status, GameStatus::Won);
    assert_eq!(state.winner, Some(Player::X));
    assert!(state.is_done());
    assert!(state.legal_moves().is_empty());
    assert_eq!(state.move_history, vec![0, 4, 1, 5, 2]);
}

#[test]
fn test_turn_flips_on_winning_move() {
    let state = play(&[0, 4, 1, 5, 2]);
    // The accepted winning move still hands the turn over
    assert_eq!(state.current_player, Player::O);
}

#[test]
fn test_no_moves_after_game_over() {
    let state = play(&[0, 4, 1, 5, 2]);
    for pos in 0..9 {
        assert_eq!(state.apply_move(pos), state);
    }
}

#[test]
fn test_draw_game() {
    // X O X / X O O / O X X
    let state = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);

    assert_eq!(state.status, GameStatus::Draw);
    assert_eq!(state.winner, None);
    assert!(state.board.iter().all(Option::is_some));
    assert!(state.legal_moves().is_empty());
}

#[test]
fn test_win_on_last_cell_is_not_a_draw() {
    // X fills the final cell and completes the left column
    // X O X / X O O / _ X O  -> X@6
    let state = play(&[0, 1, 2, 4, 3, 5, 7, 8, 6]);
    assert_eq!(state.status, GameStatus::Won);
    assert_eq!(state.winner, Some(Player::X));
}

#[test]
fn test_all_winning_lines() {
    for (line_idx, line) in LINES.iter().enumerate() {
        // Pick filler cells for O that are not on this line and never form a line
        let fillers: Vec<usize> = (0..9).filter(|p| !line.contains(p)).collect();
        let mut moves = Vec::new();
        for (i, &pos) in line.iter().enumerate() {
            moves.push(pos);
            if i < 2 {
                moves.push(fillers[i * 3]);
            }
        }

        let state = play(&moves);
        assert_eq!(
            state.status,
            GameStatus::Won,
            "X should win on line {}: {:?} (moves {:?})",
            line_idx,
            line,
            moves
        );
        assert_eq!(state.winner, Some(Player::X));
    }
}

#[test]
fn test_win_detection_is_local_to_last_move() {
    // A line that the engine never produced: X holds the top row but the
    // game is still marked as playing. X's next move elsewhere must not be
    // credited with the unrelated line.
    let state = State {
        board: [
            Some(Player::X),
            Some(Player::X),
            Some(Player::X),
            Some(Player::O),
            Some(Player::O),
            None,
            Some(Player::O),
            None,
            None,
        ],
        current_player: Player::X,
        status: GameStatus::Playing,
        winner: None,
        move_history: vec![0, 3, 1, 4, 2, 6],
    };

    let next = state.apply_move(8);
    assert_eq!(next.status, GameStatus::Playing);
    assert_eq!(next.winner, None);
}

#[test]
fn test_validate_accepts_reachable_states() {
    let mut state = State::new();
    assert_eq!(state.validate(), Ok(()));
    for pos in [4, 0, 8, 2, 6] {
        state = state.apply_move(pos);
        assert_eq!(state.validate(), Ok(()));
    }
}

#[test]
fn test_validate_rejects_duplicate_history() {
    let mut state = play(&[0, 4]);
    state.move_history = vec![0, 0];
    assert_eq!(
        state.validate(),
        Err(StateError::HistoryOccupancy { index: 0 })
    );
}

#[test]
fn test_validate_rejects_out_of_range_history() {
    let mut state = play(&[0]);
    state.move_history = vec![12];
    assert_eq!(
        state.validate(),
        Err(StateError::MoveOutOfRange {
            index: 12,
            limit: BOARD_SIZE
        })
    );
}

#[test]
fn test_validate_rejects_two_consecutive_x_moves() {
    let mut state = State::new();
    state.board[0] = Some(Player::X);
    state.board[1] = Some(Player::X);
    state.move_history = vec![0, 1];
    assert!(matches!(
        state.validate(),
        Err(StateError::TurnMismatch { .. })
    ));
}

#[test]
fn test_metadata() {
    let meta = TicTacToe::metadata();
    assert_eq!(meta.game_type, GameType::TicTacToe);
    assert_eq!(meta.board_size(), 9);
    assert_eq!(meta.num_actions, 9);
    assert_eq!(meta.player_symbols, vec!['X', 'O']);
}

#[test]
fn test_render() {
    let state = play(&[0, 4]);
    assert_eq!(state.render(), "X . .\n. O .\n. . .");
}

#[test]
fn test_wire_field_names() {
    let json = serde_json::to_value(play(&[4])).unwrap();
    assert_eq!(json["currentPlayer"], "O");
    assert_eq!(json["status"], "playing");
    assert!(json["winner"].is_null());
    assert_eq!(json["moveHistory"], serde_json::json!([4]));
    assert_eq!(json["board"][4], "X");
    assert!(json["board"][0].is_null());
}

// =========================================================================
// Fuzz-style tests with random seeds/actions
// =========================================================================

/// Play many random games and verify invariants hold
#[test]
fn test_random_games_invariants() {
    for seed in 0..50 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut state = TicTacToe::create_initial();
        let mut move_count = 0;

        while !state.is_done() {
            let legal = state.legal_moves();
            assert!(
                !legal.is_empty(),
                "Non-done game must have legal moves (seed={}, moves={})",
                seed,
                move_count
            );

            let pos = legal[rng.gen_range(0..legal.len())];
            let prev_player = state.current_player;
            state = TicTacToe::apply_move(&state, pos);
            move_count += 1;

            assert_ne!(state.current_player, prev_player, "seed={}", seed);
            assert_eq!(state.move_history.len(), move_count, "seed={}", seed);
            assert_eq!(
                state.winner.is_some(),
                state.status == GameStatus::Won,
                "seed={}",
                seed
            );
            assert_eq!(state.validate(), Ok(()), "seed={}", seed);
        }

        assert!(move_count <= 9, "seed={}", seed);
    }
}

/// An invalid move never changes any field, from any reachable state
#[test]
fn test_invalid_moves_are_idempotent() {
    for seed in 0..20 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut state = State::new();

        while !state.is_done() {
            for pos in 0..12 {
                if state.try_move(pos).is_none() {
                    assert_eq!(state.apply_move(pos), state);
                }
            }
            let legal = state.legal_moves();
            state = state.apply_move(legal[rng.gen_range(0..legal.len())]);
        }
    }
}
