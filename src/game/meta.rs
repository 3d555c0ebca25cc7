//! Engine-reported game status and move options

use super::types::{is_white_turn, Color, Piece, Role, Square};

/// Classification of a candidate destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Move,
    Capture,
    Castle,
    EnPassant,
    DoublePawnPush,
}

/// A destination the engine offers for the hovered / clicked square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveOption {
    pub target: Square,
    pub kind: MoveKind,
}

/// Per-color king record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KingStatus {
    /// `None` if the engine sent something other than a king
    pub piece: Option<Piece>,
    pub square: Option<Square>,
    pub first_move: bool,
    pub check: bool,
    pub checkmate: bool,
}

impl KingStatus {
    pub fn new(color: Color, square: Option<Square>) -> Self {
        Self {
            piece: Some(Piece::new(color, Role::King)),
            square,
            first_move: true,
            check: false,
            checkmate: false,
        }
    }
}

/// Game meta snapshot. Replaced wholesale, never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameMeta {
    pub score: i32,
    pub turn: u32,
    pub game_over: bool,
    pub en_passant: Option<Square>,
    pub promotable_pawn: Option<Square>,
    pub half_move_count: u32,
    pub white_king: KingStatus,
    pub black_king: KingStatus,
}

impl GameMeta {
    pub fn is_white_turn(&self) -> bool {
        is_white_turn(self.turn)
    }

    pub fn side_to_move(&self) -> Color {
        Color::to_move(self.turn)
    }

    pub fn king(&self, color: Color) -> &KingStatus {
        match color {
            Color::White => &self.white_king,
            Color::Black => &self.black_king,
        }
    }

    /// Color whose king is in check, if any
    pub fn checked_side(&self) -> Option<Color> {
        [Color::White, Color::Black]
            .into_iter()
            .find(|color| self.king(*color).check)
    }
}

impl Default for GameMeta {
    fn default() -> Self {
        Self {
            score: 0,
            turn: 0,
            game_over: false,
            en_passant: None,
            promotable_pawn: None,
            half_move_count: 0,
            white_king: KingStatus::new(Color::White, Square::from_algebraic("e1")),
            black_king: KingStatus::new(Color::Black, Square::from_algebraic("e8")),
        }
    }
}
