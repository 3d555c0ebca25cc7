//! Integration tests for board identity, FEN handling and configuration
//!
//! Covers the square codec, FEN placement round trips, snapshot diffs,
//! settings persistence and the shared application state handles.

use chessview::core::settings_persistence::{load_settings_from, save_settings_to};
use chessview::core::{AppState, BoardSettings, Layout};
use chessview::game::types::{coord_to_square, square_to_coord};
use chessview::game::{
    diff_positions, parse_fen, serialize_fen, Color, FenError, Orientation, Piece, Position,
    PositionDiff, Role, Square,
};
use std::path::PathBuf;

fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("chessview-test-{}", uuid::Uuid::new_v4()))
}

// ============================================================================
// Square Codec Tests
// ============================================================================

#[test]
fn test_codec_round_trips_every_coordinate() {
    //! square_to_coord(coord_to_square(c, r)) == (c, r) over the whole board

    for col in 0..8 {
        for row in 0..8 {
            let square = coord_to_square(col, row).expect("in range");
            assert_eq!(square_to_coord(&square.to_string()), Ok((col, row)));
        }
    }
}

#[test]
fn test_codec_matches_engine_convention() {
    //! Column is the file, row is the rank

    assert_eq!(coord_to_square(2, 1).unwrap().to_string(), "c2");
    assert_eq!(coord_to_square(0, 7).unwrap().to_string(), "a8");
    assert_eq!(square_to_coord("h1"), Ok((7, 0)));
}

#[test]
fn test_codec_rejects_out_of_range() {
    assert!(coord_to_square(8, 8).is_err());
    assert!(coord_to_square(-1, 0).is_err());
    assert!(square_to_coord("a0").is_err());
    assert!(square_to_coord("a10").is_err());
}

// ============================================================================
// FEN Tests
// ============================================================================

#[test]
fn test_fen_round_trip_for_sparse_positions() {
    //! parse_fen(serialize_fen(P)) == P for hand-built positions

    let positions: Vec<Position> = vec![
        Position::new(),
        [("e1", Piece::new(Color::White, Role::King))]
            .into_iter()
            .map(|(label, piece)| (label.parse::<Square>().unwrap(), piece))
            .collect(),
        Square::all()
            .filter(|square| square.rank.index() == 3)
            .map(|square| (square, Piece::new(Color::Black, Role::Queen)))
            .collect(),
        Square::all()
            .map(|square| (square, Piece::new(Color::White, Role::Pawn)))
            .collect(),
    ];
    for position in positions {
        let fen = serialize_fen(&position);
        assert_eq!(parse_fen(&fen).expect("serialized FEN parses"), position);
    }
}

#[test]
fn test_malformed_fen_is_rejected_whole() {
    assert_eq!(
        parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP"),
        Err(FenError::RankCount { found: 7 })
    );
    assert!(parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBN").is_err());
    assert!(parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNRR").is_err());
    assert!(parse_fen("").is_err());
}

// ============================================================================
// Diff Tests
// ============================================================================

#[test]
fn test_diff_of_identical_positions_is_empty() {
    for fen in [
        "8/8/8/8/8/8/8/8",
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR",
        "r3k2r/8/8/8/8/8/8/R3K2R",
    ] {
        let position = parse_fen(fen).unwrap();
        let diff = diff_positions(&position, &position);
        assert_eq!(diff, PositionDiff::default());
        assert_eq!(diff.squares_affected, 0);
    }
}

#[test]
fn test_diff_queenside_castle_has_no_single_move() {
    //! Two squares vacated, two filled: no source/target is inferred

    let before = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R").unwrap();
    let after = parse_fen("r3k2r/8/8/8/8/8/8/2KR3R").unwrap();
    let diff = diff_positions(&before, &after);
    assert_eq!(diff.squares_affected, 4);
    assert_eq!(diff.source_square, None);
    assert_eq!(diff.target_square, None);
    assert_eq!(diff.moved_piece, None);
}

// ============================================================================
// Settings Tests
// ============================================================================

#[test]
fn test_settings_save_then_load() {
    let dir = scratch_dir();
    let path = dir.join("nested").join("settings.json");
    let settings = BoardSettings {
        orientation: Orientation::Black,
        rotation: true,
        show_notation: false,
        notification_timeout_ms: 1500,
    };

    save_settings_to(&path, &settings).expect("save should succeed");
    assert_eq!(load_settings_from(&path), settings);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_settings_file_uses_defaults() {
    let path = scratch_dir().join("settings.json");
    assert_eq!(load_settings_from(&path), BoardSettings::default());
}

#[test]
fn test_corrupt_settings_file_uses_defaults() {
    let dir = scratch_dir();
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert_eq!(load_settings_from(&path), BoardSettings::default());

    std::fs::remove_dir_all(&dir).ok();
}

// ============================================================================
// App State Tests
// ============================================================================

#[test]
fn test_capabilities_observe_one_state() {
    //! Drawer and layout handles handed to separate components agree

    let state = AppState::new();
    let navbar = state.drawer();
    let sidenav = state.drawer();
    let writer = state.layout_writer();
    let reader = state.layout_reader();

    navbar.toggle();
    assert!(sidenav.is_open());

    writer.fit_viewport(1920);
    assert_eq!(reader.get(), Layout::Wide);
}
