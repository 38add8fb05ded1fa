use chess::{Board, BoardStatus, ChessMove, MoveGen, Piece, Square};

/// Render a move in Standard Algebraic Notation against the position it
/// is played from. SAN is only meaningful relative to that position, so
/// callers must format before applying the move.
pub fn to_san(board: &Board, chess_move: ChessMove) -> String {
    let from_square = chess_move.get_source();
    let to_square = chess_move.get_dest();

    let piece = match board.piece_on(from_square) {
        Some(piece) => piece,
        None => return chess_move.to_string(), // fall back to coordinate notation
    };

    if piece == Piece::King {
        if let Some(castle) = castling_san(board, chess_move) {
            return castle;
        }
    }

    let mut san = String::new();

    if piece != Piece::Pawn {
        san.push(piece_letter(piece));
        san.push_str(&disambiguation(board, piece, from_square, to_square));
    }

    // En passant shows up as a pawn changing file onto an empty square
    let is_capture = board.piece_on(to_square).is_some()
        || (piece == Piece::Pawn && from_square.get_file() != to_square.get_file());

    if is_capture {
        if piece == Piece::Pawn {
            san.push(file_char(from_square));
        }
        san.push('x');
    }

    san.push(file_char(to_square));
    san.push(rank_char(to_square));

    if let Some(promotion) = chess_move.get_promotion() {
        san.push('=');
        san.push(piece_letter(promotion));
    }

    san.push_str(check_suffix(board, chess_move));
    san
}

fn castling_san(board: &Board, chess_move: ChessMove) -> Option<String> {
    let from = chess_move.get_source();
    let to = chess_move.get_dest();
    let castle = if (from == Square::E1 && to == Square::G1)
        || (from == Square::E8 && to == Square::G8)
    {
        "O-O"
    } else if (from == Square::E1 && to == Square::C1) || (from == Square::E8 && to == Square::C8) {
        "O-O-O"
    } else {
        return None;
    };
    let mut san = castle.to_string();
    san.push_str(check_suffix(board, chess_move));
    Some(san)
}

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::King => 'K',
        Piece::Queen => 'Q',
        Piece::Rook => 'R',
        Piece::Bishop => 'B',
        Piece::Knight => 'N',
        Piece::Pawn => 'P',
    }
}

/// File, or rank when the files coincide, when another piece of the same
/// kind can reach the destination too.
fn disambiguation(board: &Board, piece: Piece, from: Square, to: Square) -> String {
    let rivals: Vec<ChessMove> = MoveGen::new_legal(board)
        .filter(|mv| {
            board.piece_on(mv.get_source()) == Some(piece)
                && mv.get_dest() == to
                && mv.get_source() != from
        })
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let file_differs = rivals
        .iter()
        .any(|mv| mv.get_source().get_file() != from.get_file());
    if file_differs {
        file_char(from).to_string()
    } else {
        rank_char(from).to_string()
    }
}

fn check_suffix(board: &Board, chess_move: ChessMove) -> &'static str {
    let next = board.make_move_new(chess_move);
    if next.checkers().popcnt() == 0 {
        ""
    } else if next.status() == BoardStatus::Checkmate {
        "#"
    } else {
        "+"
    }
}

fn file_char(square: Square) -> char {
    (b'a' + square.get_file().to_index() as u8) as char
}

fn rank_char(square: Square) -> char {
    (b'1' + square.get_rank().to_index() as u8) as char
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn board(fen: &str) -> Board {
        Board::from_str(fen).expect("valid FEN")
    }

    fn mv(text: &str) -> ChessMove {
        ChessMove::from_str(text).expect("valid move text")
    }

    #[test]
    fn pawn_and_knight_moves_from_the_start() {
        let start = Board::default();
        assert_eq!(to_san(&start, mv("e2e4")), "e4");
        assert_eq!(to_san(&start, mv("g1f3")), "Nf3");
    }

    #[test]
    fn pawn_captures_name_the_departure_file() {
        let b = board("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2");
        assert_eq!(to_san(&b, mv("e4d5")), "exd5");
    }

    #[test]
    fn castling_both_ways() {
        let b = board("r3k2r/pppq1ppp/2npbn2/2b1p3/2B1P3/2NPBN2/PPPQ1PPP/R3K2R w KQkq - 0 1");
        assert_eq!(to_san(&b, mv("e1g1")), "O-O");
        assert_eq!(to_san(&b, mv("e1c1")), "O-O-O");
    }

    #[test]
    fn promotion_with_capture() {
        let b = board("rn1q1bnr/ppPkpppp/8/8/8/8/PP1PPPPP/RNBQKBNR w KQ - 1 5");
        assert_eq!(to_san(&b, mv("c7b8q")), "cxb8=Q");
    }

    #[test]
    fn knights_on_the_same_file_disambiguate_by_rank() {
        // Knights on g1 and g5 both reach f3
        let b = board("rnbqkbnr/pppppppp/8/6N1/8/8/PPPPPPPP/RNBQKBN1 w Qkq - 0 1");
        assert_eq!(to_san(&b, mv("g1f3")), "N1f3");
        assert_eq!(to_san(&b, mv("g5f3")), "N5f3");
    }

    #[test]
    fn check_and_mate_suffixes() {
        // Qh5xf7 is mate in the Scholar's position
        let b = board("r1bqkbnr/pppp1ppp/2n5/2b1p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4");
        let scholars = board("r1bqkbnr/pppp1ppp/2n5/2b1p3/2B1P3/7Q/PPPP1PPP/RNB1K1NR w KQkq - 4 4");
        assert_eq!(to_san(&scholars, mv("h3f5")), "Qf5");
        assert_eq!(to_san(&b, mv("h5f7")), "Qxf7#");

        // Plain check, not mate
        let check = board("rnbqkbnr/ppp2ppp/8/3pp3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 0 3");
        assert_eq!(to_san(&check, mv("f1b5")), "Bb5+");
    }
}
