/// Live Engine Validation Suite
///
/// Exercises the real UCI subprocess when an engine is installed. When no
/// engine is on PATH each test prints a skip notice and passes, so the
/// suite is runnable on any machine.
use chess::Board;
use chess_hint::{engine_reply, ensure_session, locate_engine, suggest_moves};
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

fn installed_engine() -> Option<PathBuf> {
    match locate_engine(None) {
        Ok(path) => Some(path),
        Err(_) => {
            println!("skipping: no UCI engine on PATH");
            None
        }
    }
}

#[test]
fn strength_configuration_reports_exactly_one_mode() {
    let Some(path) = installed_engine() else { return };

    let mut slot = None;
    let session = ensure_session(&mut slot, &path, 1000).unwrap();
    let mode = session.strength_mode();
    assert!(
        mode.starts_with("UCI_Elo=")
            || mode.starts_with("Skill Level=")
            || mode == "default (no strength options)",
        "unexpected mode string: {}",
        mode
    );

    // an Elo mode must report a value inside some sane rating range
    if let Some(value) = mode.strip_prefix("UCI_Elo=") {
        let applied: i32 = value.parse().unwrap();
        assert!((500..=4000).contains(&applied));
    }

    slot.take().unwrap().stop().unwrap();
}

#[test]
fn top_three_suggestions_are_ranked_legal_and_distinct() {
    let Some(path) = installed_engine() else { return };

    let board = Board::default();
    let mut slot = None;
    let session = ensure_session(&mut slot, &path, 2000).unwrap();
    let pack = suggest_moves(session, &board, 300, 3).unwrap();

    assert!(pack.lines.len() <= 3);
    assert!(!pack.lines.is_empty());

    let mut previous_rank = 0;
    let mut seen = HashSet::new();
    for line in &pack.lines {
        // ordered by the engine's own rank, ascending
        assert!(line.rank > previous_rank, "ranks must ascend");
        previous_rank = line.rank;

        // every suggested move is legal in the analyzed position
        let m = chess::ChessMove::from_str(&line.move_uci).unwrap();
        assert!(board.legal(m), "{} is not legal here", line.move_uci);

        assert!(seen.insert(line.move_uci.clone()), "duplicate suggestion");
    }
    // rank order is the engine's preference order; evaluation-sorted
    // order is NOT asserted here by design

    slot.take().unwrap().stop().unwrap();
}

#[test]
fn engine_reply_is_legal_with_san_rendered_before_apply() {
    let Some(path) = installed_engine() else { return };

    let board = Board::default();
    let mut slot = None;
    let session = ensure_session(&mut slot, &path, 1500).unwrap();
    let reply = engine_reply(session, &board, 200).unwrap();

    assert!(board.legal(reply.chess_move));
    assert_eq!(reply.move_uci, reply.chess_move.to_string());
    assert!(!reply.move_san.is_empty());
    // applying the move afterwards is the caller's job and must succeed
    let _after = board.make_move_new(reply.chess_move);

    slot.take().unwrap().stop().unwrap();
}

#[test]
fn rating_change_restarts_the_session_and_matching_config_reuses_it() {
    let Some(path) = installed_engine() else { return };

    let mut slot = None;
    ensure_session(&mut slot, &path, 1000).unwrap();
    assert_eq!(slot.as_ref().unwrap().rating(), 1000);

    // changed rating: old subprocess is stopped, new one configured
    ensure_session(&mut slot, &path, 2200).unwrap();
    assert_eq!(slot.as_ref().unwrap().rating(), 2200);

    // matching configuration is a no-op reuse
    let mode_before = slot.as_ref().unwrap().strength_mode().to_string();
    ensure_session(&mut slot, &path, 2200).unwrap();
    assert_eq!(slot.as_ref().unwrap().strength_mode(), mode_before);

    // the reused session still answers requests
    let pack = suggest_moves(
        slot.as_mut().unwrap(),
        &Board::default(),
        100,
        1,
    )
    .unwrap();
    assert!(pack.lines.len() <= 1);

    slot.take().unwrap().stop().unwrap();
}

#[test]
fn finished_positions_never_reach_the_engine() {
    let Some(path) = installed_engine() else { return };

    // fool's mate: nothing to analyze
    let mated =
        Board::from_str("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();

    let mut slot = None;
    let session = ensure_session(&mut slot, &path, 1000).unwrap();
    let err = suggest_moves(session, &mated, 100, 3).unwrap_err();
    assert!(err.is_validation());
    let err = engine_reply(session, &mated, 100).unwrap_err();
    assert!(err.is_validation());

    slot.take().unwrap().stop().unwrap();
}
