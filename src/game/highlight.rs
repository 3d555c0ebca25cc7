//! Per-square highlight styling derived from engine move options

use super::meta::{MoveKind, MoveOption};
use super::types::Square;
use std::collections::BTreeMap;

/// Style override for a single square
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Highlight {
    /// The origin square of the current hover / click
    Selected,
    Move,
    Capture,
    Castle,
    EnPassant,
    DoublePawnPush,
}

impl From<MoveKind> for Highlight {
    fn from(kind: MoveKind) -> Self {
        match kind {
            MoveKind::Move => Highlight::Move,
            MoveKind::Capture => Highlight::Capture,
            MoveKind::Castle => Highlight::Castle,
            MoveKind::EnPassant => Highlight::EnPassant,
            MoveKind::DoublePawnPush => Highlight::DoublePawnPush,
        }
    }
}

impl Highlight {
    /// Captures (en passant included) render in the attack color.
    pub fn is_attack(self) -> bool {
        matches!(self, Highlight::Capture | Highlight::EnPassant)
    }
}

pub type SquareStyles = BTreeMap<Square, Highlight>;

/// Style every option target, then mark `origin` as selected.
///
/// The origin is written last so it wins when the engine also lists it as
/// a target.
pub fn highlight_squares(origin: Option<Square>, options: &[MoveOption]) -> SquareStyles {
    let mut styles: SquareStyles = options
        .iter()
        .map(|option| (option.target, Highlight::from(option.kind)))
        .collect();
    if let Some(square) = origin {
        styles.insert(square, Highlight::Selected);
    }
    styles
}
