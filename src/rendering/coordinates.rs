//! Display-grid ↔ board-square mapping and notation labels
//!
//! Display row 0 is the top of the drawn board, display column 0 its left
//! edge. Playing as Black reflects both axes; labels move with the squares
//! but are never mirrored.

use crate::game::types::{File, Orientation, Rank, Square};

/// Board square drawn at display `(row, col)`, both in `0..8`
pub fn display_to_square(row: usize, col: usize, orientation: Orientation) -> Option<Square> {
    if row >= 8 || col >= 8 {
        return None;
    }
    let (file, rank) = match orientation {
        Orientation::White => (col, 7 - row),
        Orientation::Black => (7 - col, row),
    };
    Some(Square::new(File::ALL[file], Rank::ALL[rank]))
}

/// Display `(row, col)` where `square` is drawn
pub fn square_to_display(square: Square, orientation: Orientation) -> (usize, usize) {
    let file = square.file.index() as usize;
    let rank = square.rank.index() as usize;
    match orientation {
        Orientation::White => (7 - rank, file),
        Orientation::Black => (rank, 7 - file),
    }
}

/// Rank digit shown along display column 0
pub fn rank_label(row: usize, orientation: Orientation) -> Option<char> {
    display_to_square(row, 0, orientation).map(|square| square.rank.to_char())
}

/// File letter shown along display row 7
pub fn file_label(col: usize, orientation: Orientation) -> Option<char> {
    display_to_square(7, col, orientation).map(|square| square.file.to_char())
}
