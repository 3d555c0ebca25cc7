//! Board renderer
//!
//! Pure mapping from a position plus view options to an 8×8 grid of square
//! descriptors. Whatever draws the board (terminal, webview, canvas) only
//! reads the grid.

use super::coordinates::{display_to_square, file_label, rank_label};
use crate::game::highlight::{Highlight, SquareStyles};
use crate::game::position::Position;
use crate::game::types::{Orientation, Piece, Square};
use std::fmt;

/// `(file + rank) % 2` of dark squares, with both indices 0-based from a1.
/// a1 is dark.
pub const DARK_PARITY: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shade {
    Light,
    Dark,
}

impl Shade {
    pub fn of(square: Square) -> Self {
        if (square.file.index() + square.rank.index()) % 2 == DARK_PARITY {
            Shade::Dark
        } else {
            Shade::Light
        }
    }
}

/// Everything needed to draw one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareView {
    pub square: Square,
    pub shade: Shade,
    pub piece: Option<Piece>,
    pub highlight: Option<Highlight>,
    /// Rank digit, only on the left column when notation is shown
    pub rank_label: Option<char>,
    /// File letter, only on the bottom row when notation is shown
    pub file_label: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardGrid {
    orientation: Orientation,
    rows: Vec<Vec<SquareView>>,
}

impl BoardGrid {
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Display rows, top first
    pub fn rows(&self) -> &[Vec<SquareView>] {
        &self.rows
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&SquareView> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    pub fn find(&self, square: Square) -> Option<&SquareView> {
        self.rows
            .iter()
            .flat_map(|cells| cells.iter())
            .find(|view| view.square == square)
    }
}

pub fn render_board(
    position: &Position,
    orientation: Orientation,
    show_notation: bool,
    styles: &SquareStyles,
) -> BoardGrid {
    let rows = (0..8)
        .map(|row| {
            (0..8)
                .filter_map(|col| {
                    let square = display_to_square(row, col, orientation)?;
                    Some(SquareView {
                        square,
                        shade: Shade::of(square),
                        piece: position.get(square),
                        highlight: styles.get(&square).copied(),
                        rank_label: (show_notation && col == 0)
                            .then(|| rank_label(row, orientation))
                            .flatten(),
                        file_label: (show_notation && row == 7)
                            .then(|| file_label(col, orientation))
                            .flatten(),
                    })
                })
                .collect()
        })
        .collect();
    BoardGrid { orientation, rows }
}

fn marks(highlight: Option<Highlight>) -> (char, char) {
    match highlight {
        None => (' ', ' '),
        Some(Highlight::Selected) => ('[', ']'),
        Some(h) if h.is_attack() => ('<', '>'),
        Some(_) => ('(', ')'),
    }
}

impl fmt::Display for BoardGrid {
    /// Text diagram: `.`/`:` for empty light/dark squares, FEN letters for
    /// pieces, `[ ]` selected, `( )` move target, `< >` capture target.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notation = self
            .rows
            .iter()
            .any(|cells| cells.first().is_some_and(|v| v.rank_label.is_some()));
        for cells in &self.rows {
            if notation {
                let label = cells.first().and_then(|v| v.rank_label).unwrap_or(' ');
                write!(f, "{} ", label)?;
            }
            for view in cells {
                let body = match (view.piece, view.shade) {
                    (Some(piece), _) => piece.fen_char(),
                    (None, Shade::Light) => '.',
                    (None, Shade::Dark) => ':',
                };
                let (open, close) = marks(view.highlight);
                write!(f, "{}{}{}", open, body, close)?;
            }
            writeln!(f)?;
        }
        if notation {
            write!(f, "  ")?;
            if let Some(bottom) = self.rows.last() {
                for view in bottom {
                    write!(f, " {} ", view.file_label.unwrap_or(' '))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
