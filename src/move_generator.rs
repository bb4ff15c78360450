use crate::{
    movelist::MoveList,
    piece::{Color, Piece, PieceType},
    position::Position,
    r#move::Move,
    square::Square,
};

const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];
const KING_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (1, -1),
    (-1, 0),
    (-1, 1),
    (-1, -1),
    (0, 1),
    (0, -1),
];
const ROOK_DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (0, -1), (1, 0), (0, 1)];
const BISHOP_DIRECTIONS: [(isize, isize); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

/// Every move obeying piece movement rules for the side to move, castling
/// excluded. Moves may leave the mover's own king in check.
pub fn pseudo_legal_moves(position: &Position) -> MoveList {
    let mut move_list = MoveList::default();
    let side = position.side_to_move();
    for (origin, piece) in position.board().pieces() {
        if piece.color == side {
            piece_moves(position, origin, piece, &mut move_list);
        }
    }
    move_list
}

fn piece_moves(position: &Position, origin: Square, piece: Piece, move_list: &mut MoveList) {
    match piece.piece_type {
        PieceType::Pawn => pawn_moves(position, origin, piece, move_list),
        PieceType::Knight => step_moves(position, origin, piece, &KNIGHT_OFFSETS, move_list),
        PieceType::King => step_moves(position, origin, piece, &KING_OFFSETS, move_list),
        PieceType::Bishop => slider_moves(position, origin, piece, &BISHOP_DIRECTIONS, move_list),
        PieceType::Rook => slider_moves(position, origin, piece, &ROOK_DIRECTIONS, move_list),
        PieceType::Queen => {
            slider_moves(position, origin, piece, &ROOK_DIRECTIONS, move_list);
            slider_moves(position, origin, piece, &BISHOP_DIRECTIONS, move_list);
        }
    }
}

fn pawn_moves(position: &Position, origin: Square, pawn: Piece, move_list: &mut MoveList) {
    let board = position.board();
    let forward = pawn.color.forward();

    if let Some(one_step) = origin.offset(forward, 0) {
        if board[one_step].is_none() {
            move_list.push(Move::new(origin, one_step, pawn, None));
            if origin.row() == pawn.color.pawn_row() {
                if let Some(two_steps) = one_step.offset(forward, 0) {
                    if board[two_steps].is_none() {
                        move_list.push(Move::new(origin, two_steps, pawn, None));
                    }
                }
            }
        }
    }

    for side_step in [-1, 1] {
        let target = if let Some(sq) = origin.offset(forward, side_step) { sq } else { continue };
        match board[target] {
            Some(victim) if victim.color != pawn.color => {
                move_list.push(Move::new(origin, target, pawn, Some(victim)))
            }
            None if position.en_passant_target() == Some(target) => {
                move_list.push(Move::new_en_passant(origin, target, pawn))
            }
            _ => (),
        }
    }
}

/// Knights and kings: a fixed set of single jumps
fn step_moves(
    position: &Position,
    origin: Square,
    piece: Piece,
    offsets: &[(isize, isize)],
    move_list: &mut MoveList,
) {
    let board = position.board();
    for &(dr, dc) in offsets {
        let target = if let Some(sq) = origin.offset(dr, dc) { sq } else { continue };
        match board[target] {
            Some(p) if p.color == piece.color => (),
            captured => move_list.push(Move::new(origin, target, piece, captured)),
        }
    }
}

/// Rays stop before an allied piece and on an enemy one
fn slider_moves(
    position: &Position,
    origin: Square,
    piece: Piece,
    directions: &[(isize, isize)],
    move_list: &mut MoveList,
) {
    let board = position.board();
    for &(dr, dc) in directions {
        let mut current = origin;
        while let Some(target) = current.offset(dr, dc) {
            match board[target] {
                None => move_list.push(Move::new(origin, target, piece, None)),
                Some(p) if p.color != piece.color => {
                    move_list.push(Move::new(origin, target, piece, Some(p)));
                    break;
                }
                Some(_) => break,
            }
            current = target;
        }
    }
}

/// Castling moves available to the side to move.
/// The king may not castle out of, through, or into an attacked square; on the
/// queenside the rook's neighbour only has to be empty.
pub fn castle_moves(position: &Position) -> MoveList {
    let mut move_list = MoveList::default();
    let side = position.side_to_move();
    let (kingside_right, queenside_right) = position.castling_rights().get(side);
    if !kingside_right && !queenside_right {
        return move_list;
    }

    let king_square = position.king_square(side);
    if is_square_attacked(position, king_square) {
        return move_list;
    }
    let king = Piece::new(side, PieceType::King);

    if kingside_right && castling_path_clear(position, king_square, &[1, 2], &[1, 2]) {
        if let Some(target) = king_square.offset(0, 2) {
            move_list.push(Move::new_castle(king_square, target, king));
        }
    }
    if queenside_right && castling_path_clear(position, king_square, &[-1, -2, -3], &[-1, -2]) {
        if let Some(target) = king_square.offset(0, -2) {
            move_list.push(Move::new_castle(king_square, target, king));
        }
    }
    move_list
}

fn castling_path_clear(
    position: &Position,
    king_square: Square,
    must_be_empty: &[isize],
    must_be_safe: &[isize],
) -> bool {
    let board = position.board();
    let empty = must_be_empty
        .iter()
        .all(|&dc| king_square.offset(0, dc).map_or(false, |sq| board[sq].is_none()));
    empty
        && must_be_safe
            .iter()
            .all(|&dc| king_square.offset(0, dc).map_or(false, |sq| !is_square_attacked(position, sq)))
}

/// Whether the opponent of the side to move attacks the given square
pub fn is_square_attacked(position: &Position, target: Square) -> bool {
    attacked_by(position, target, position.side_to_move().opposite())
}

/// Whether any piece of `attacker` attacks `target`, looking outward from the
/// target square. Pawns attack diagonally forward whether or not the square
/// is occupied.
pub fn attacked_by(position: &Position, target: Square, attacker: Color) -> bool {
    let board = position.board();
    let is = |sq: Option<Square>, piece_type: PieceType| {
        sq.map_or(false, |sq| board[sq] == Some(Piece::new(attacker, piece_type)))
    };

    // An attacking pawn stands one row behind the target, from its own point of view
    let behind = -attacker.forward();
    if is(target.offset(behind, -1), PieceType::Pawn) || is(target.offset(behind, 1), PieceType::Pawn) {
        return true;
    }
    if KNIGHT_OFFSETS
        .iter()
        .any(|&(dr, dc)| is(target.offset(dr, dc), PieceType::Knight))
    {
        return true;
    }
    if KING_OFFSETS
        .iter()
        .any(|&(dr, dc)| is(target.offset(dr, dc), PieceType::King))
    {
        return true;
    }

    let slider_hit = |directions: &[(isize, isize)], fits: fn(&PieceType) -> bool| {
        directions.iter().any(|&(dr, dc)| {
            let mut current = target;
            while let Some(sq) = current.offset(dr, dc) {
                if let Some(p) = board[sq] {
                    return p.color == attacker && fits(&p.piece_type);
                }
                current = sq;
            }
            false
        })
    };
    slider_hit(&ROOK_DIRECTIONS, PieceType::is_rook_like)
        || slider_hit(&BISHOP_DIRECTIONS, PieceType::is_bishop_like)
}

pub fn in_check(position: &Position, side: Color) -> bool {
    attacked_by(position, position.king_square(side), side.opposite())
}

/// Generates every legal move for the side to move, and records whether the
/// position is checkmate or stalemate
pub fn legal_moves(position: &mut Position) -> MoveList {
    let side = position.side_to_move();
    let mut moves = pseudo_legal_moves(position);
    moves.extend(castle_moves(position));

    moves.retain(|mv| {
        position.apply_move(*mv);
        let leaves_king_attacked = in_check(position, side);
        position.undo_move();
        !leaves_king_attacked
    });

    if moves.is_empty() {
        let checked = in_check(position, side);
        position.set_terminal_flags(checked, !checked);
    } else {
        position.set_terminal_flags(false, false);
    }
    moves
}
