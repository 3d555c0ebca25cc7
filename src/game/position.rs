//! Position model
//!
//! A sparse square → piece map with FEN placement parsing / serialization
//! and the snapshot diff used to infer a single piece relocation.

use super::error::{FenError, FenResult};
use super::types::{File, Piece, Rank, Square};
use std::collections::BTreeMap;

/// Occupied squares only. Replaced wholesale on every authoritative update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Position {
    pieces: BTreeMap<Square, Piece>,
}

impl Position {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        self.pieces.get(&square).copied()
    }

    pub fn insert(&mut self, square: Square, piece: Piece) -> Option<Piece> {
        self.pieces.insert(square, piece)
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        self.pieces.remove(&square)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces.iter().map(|(square, piece)| (*square, *piece))
    }

    /// Build from a code-keyed map such as `{"e1": "wK", "e8": "bK"}`,
    /// rejecting any key that is not a square or value that is not a piece code.
    pub fn from_codes<'a, I>(entries: I) -> FenResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut position = Position::new();
        for (key, code) in entries {
            let square = Square::from_algebraic(key)
                .ok_or_else(|| FenError::InvalidSquare(key.to_owned()))?;
            let piece =
                Piece::from_code(code).ok_or_else(|| FenError::InvalidPieceCode(code.to_owned()))?;
            position.insert(square, piece);
        }
        Ok(position)
    }
}

impl FromIterator<(Square, Piece)> for Position {
    fn from_iter<T: IntoIterator<Item = (Square, Piece)>>(iter: T) -> Self {
        Position {
            pieces: iter.into_iter().collect(),
        }
    }
}

/// Parse the placement field of a FEN string.
///
/// Anything after the first space (side to move, castling, ..) is ignored.
pub fn parse_fen(text: &str) -> FenResult<Position> {
    let placement = text.split(' ').next().unwrap_or_default();
    let groups: Vec<&str> = placement.split('/').collect();
    if groups.len() != 8 {
        return Err(FenError::RankCount {
            found: groups.len(),
        });
    }

    let mut position = Position::new();
    // first group is rank 8
    for (group, (text, rank)) in groups.iter().zip(Rank::ALL.into_iter().rev()).enumerate() {
        let mut col: usize = 0;
        for character in text.chars() {
            match character {
                '1'..='8' => col += character as usize - '0' as usize,
                _ => {
                    let piece = Piece::from_fen_char(character)
                        .ok_or(FenError::InvalidCharacter { group, character })?;
                    if let Some(file) = File::ALL.get(col) {
                        position.insert(Square::new(*file, rank), piece);
                    }
                    col += 1;
                }
            }
            if col > 8 {
                break;
            }
        }
        if col != 8 {
            return Err(FenError::RankWidth {
                group,
                text: (*text).to_owned(),
            });
        }
    }
    Ok(position)
}

/// Serialize a position to FEN placement text (rank 8 first).
pub fn serialize_fen(position: &Position) -> String {
    let mut fen = String::with_capacity(72);
    for (i, rank) in Rank::ALL.into_iter().rev().enumerate() {
        if i > 0 {
            fen.push('/');
        }
        let mut empty = 0;
        for file in File::ALL {
            match position.get(Square::new(file, rank)) {
                Some(piece) => {
                    if empty > 0 {
                        fen.push_str(&empty.to_string());
                        empty = 0;
                    }
                    fen.push(piece.fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            fen.push_str(&empty.to_string());
        }
    }
    fen
}

/// Serialize a code-keyed position, validating it first.
pub fn serialize_fen_codes<'a, I>(entries: I) -> FenResult<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    Ok(serialize_fen(&Position::from_codes(entries)?))
}

/// What changed between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionDiff {
    pub source_square: Option<Square>,
    pub target_square: Option<Square>,
    pub moved_piece: Option<Piece>,
    pub squares_affected: usize,
}

/// Compare two snapshots.
///
/// A relocation is inferred only when exactly two squares changed: one that
/// lost its piece and one that now holds a (new or different) piece. Any
/// other shape, castling and en passant included, reports only the count.
pub fn diff_positions(before: &Position, after: &Position) -> PositionDiff {
    let mut vacated = Vec::new();
    let mut filled = Vec::new();
    for square in Square::all() {
        match (before.get(square), after.get(square)) {
            (Some(_), None) => vacated.push(square),
            (old, Some(new)) if old != Some(new) => filled.push(square),
            _ => {}
        }
    }

    let squares_affected = vacated.len() + filled.len();
    match (vacated.as_slice(), filled.as_slice()) {
        ([source], [target]) => PositionDiff {
            source_square: Some(*source),
            target_square: Some(*target),
            moved_piece: before.get(*source),
            squares_affected,
        },
        _ => PositionDiff {
            squares_affected,
            ..PositionDiff::default()
        },
    }
}
