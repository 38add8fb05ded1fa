/// Move Interpreter Validation Suite
///
/// Scenario coverage for free-text move interpretation and notation
/// round-trips. Runs entirely on the rules library, no engine subprocess.
use chess::{Board, Square};
use chess_hint::{normalize_move_text, parse_user_move, to_san};
use std::str::FromStr;

/// Interpreting a move text, its coordinate rendering, and its SAN
/// rendering must all produce the same successor position.
fn assert_round_trip(board: &Board, move_text: &str) -> Board {
    let chosen = parse_user_move(board, move_text)
        .unwrap_or_else(|e| panic!("'{}' should parse: {}", move_text, e));
    let direct = board.make_move_new(chosen);

    let via_coordinate = parse_user_move(board, &chosen.to_string()).unwrap();
    assert_eq!(direct, board.make_move_new(via_coordinate), "coordinate round trip for {}", move_text);

    let san = to_san(board, chosen);
    if !san.ends_with('+') && !san.ends_with('#') {
        let via_san = parse_user_move(board, &san).unwrap();
        assert_eq!(direct, board.make_move_new(via_san), "SAN round trip for {}", move_text);
    }

    direct
}

#[test]
fn opening_pawn_double_step() {
    let board = Board::default();
    let m = parse_user_move(&board, "e2e4").unwrap();
    assert_eq!(m.get_source(), Square::E2);
    assert_eq!(m.get_dest(), Square::E4);
    assert_eq!(m.get_promotion(), None);
}

#[test]
fn legality_follows_the_side_to_move() {
    let board = Board::default();
    let after_e4 = board.make_move_new(parse_user_move(&board, "e4").unwrap());

    // "e4" is white's pawn notation; with black to move it must be
    // rejected against this position
    assert!(parse_user_move(&after_e4, "e4").is_err());

    // black's own replies are fine in either notation
    assert!(parse_user_move(&after_e4, "e5").is_ok());
    assert!(parse_user_move(&after_e4, "b8c6").is_ok());
}

#[test]
fn round_trips_through_a_ruy_lopez() {
    let mut board = Board::default();
    for move_text in ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "O-O", "g8f6"] {
        board = assert_round_trip(&board, move_text);
    }
}

#[test]
fn digit_zero_castling_is_accepted() {
    let mut board = Board::default();
    for move_text in ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"] {
        board = board.make_move_new(parse_user_move(&board, move_text).unwrap());
    }

    let castled = parse_user_move(&board, "0-0").unwrap();
    assert_eq!(castled.get_source(), Square::E1);
    assert_eq!(castled.get_dest(), Square::G1);
    assert_eq!(normalize_move_text("0-0"), "O-O");
}

#[test]
fn promotion_in_both_notations() {
    let board = Board::from_str("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();

    let coord = parse_user_move(&board, "e7e8q").unwrap();
    assert!(coord.get_promotion().is_some());
    assert_eq!(to_san(&board, coord), "e8=Q");

    let san = parse_user_move(&board, "e8=Q").unwrap();
    assert_eq!(coord, san);
}

#[test]
fn case_folded_input_round_trips() {
    let board = Board::default();
    let folded = parse_user_move(&board, "nf3").unwrap();
    let canonical = parse_user_move(&board, "Nf3").unwrap();
    assert_eq!(folded, canonical);
    assert_eq!(normalize_move_text("NF3"), "Nf3");
}

#[test]
fn rejections_carry_guidance_and_leave_no_trace() {
    let board = Board::default();
    for junk in ["", "zzz", "e9e9", "Kc4", "123", "0-0"] {
        // none of these are legal from the start; "0-0" is well-formed
        // but castling is not yet available
        let err = parse_user_move(&board, junk).unwrap_err();
        assert!(err.is_validation(), "'{}' should be a validation failure", junk);
    }
}
