//! Type definitions for board identity
//!
//! Square identity codec plus the color / role / piece vocabulary shared by
//! every other module. Coordinates follow the engine convention: column 0 is
//! file `a`, row 0 is rank `1`.

use super::error::{SquareError, SquareResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board coordinate representing a file (column) on the chessboard
///
/// Values range from 0 (file 'a') to 7 (file 'h').
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct File(u8);

impl File {
    pub const ALL: [File; 8] = [
        File(0),
        File(1),
        File(2),
        File(3),
        File(4),
        File(5),
        File(6),
        File(7),
    ];

    pub fn new(index: u8) -> Option<Self> {
        (index < 8).then_some(File(index))
    }

    /// Create a file from a character ('a'..='h')
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'a'..='h' => Some(File(c as u8 - b'a')),
            _ => None,
        }
    }

    /// Convert file to character ('a'..='h')
    pub fn to_char(self) -> char {
        (b'a' + self.0) as char
    }

    /// Get the file index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Board coordinate representing a rank (row) on the chessboard
///
/// Values range from 0 (rank 1) to 7 (rank 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(u8);

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank(0),
        Rank(1),
        Rank(2),
        Rank(3),
        Rank(4),
        Rank(5),
        Rank(6),
        Rank(7),
    ];

    pub fn new(index: u8) -> Option<Self> {
        (index < 8).then_some(Rank(index))
    }

    /// Create a rank from a number (1-8)
    pub fn from_number(n: u8) -> Option<Self> {
        if (1..=8).contains(&n) {
            Some(Rank(n - 1))
        } else {
            None
        }
    }

    /// Convert rank to number (1-8)
    pub fn to_number(self) -> u8 {
        self.0 + 1
    }

    pub fn to_char(self) -> char {
        (b'1' + self.0) as char
    }

    /// Get the rank index (0-7)
    pub fn index(self) -> u8 {
        self.0
    }
}

/// One of the 64 board cells
///
/// Ordered file-major so that maps keyed by square iterate a1, a2, .., h8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub file: File,
    pub rank: Rank,
}

impl Square {
    pub fn new(file: File, rank: Rank) -> Self {
        Square { file, rank }
    }

    /// Iterate all 64 squares, a1 first
    pub fn all() -> impl Iterator<Item = Square> {
        File::ALL
            .into_iter()
            .flat_map(|file| Rank::ALL.into_iter().map(move |rank| Square { file, rank }))
    }

    /// Create a square from algebraic notation (e.g., "e4")
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_number(chars.next()?.to_digit(10)? as u8)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square { file, rank })
    }

    /// Convert square to algebraic notation (e.g., "e4")
    pub fn to_algebraic(self) -> String {
        self.to_string()
    }

    /// `(col, row)` pair, the engine's `[file, rank]`
    pub fn coords(self) -> (u8, u8) {
        (self.file.index(), self.rank.index())
    }

    pub fn from_coords((col, row): (u8, u8)) -> Option<Self> {
        Some(Square {
            file: File::new(col)?,
            rank: Rank::new(row)?,
        })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file.to_char(), self.rank.to_char())
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Square::from_algebraic(s).ok_or_else(|| SquareError::InvalidLabel {
            label: s.to_owned(),
        })
    }
}

/// Map a `(col, row)` pair in `[0, 7]²` to its square.
pub fn coord_to_square(col: i32, row: i32) -> SquareResult<Square> {
    let in_range = |v: i32| u8::try_from(v).ok().filter(|v| *v < 8);
    match (in_range(col), in_range(row)) {
        (Some(c), Some(r)) => Ok(Square {
            file: File(c),
            rank: Rank(r),
        }),
        _ => Err(SquareError::OutOfRange { col, row }),
    }
}

/// Inverse of [`coord_to_square`] for a square label such as `"e4"`.
pub fn square_to_coord(label: &str) -> SquareResult<(i32, i32)> {
    let square: Square = label.parse()?;
    let (col, row) = square.coords();
    Ok((col as i32, row as i32))
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Side to move for an engine turn counter: even turns are White's
    pub fn to_move(turn: u32) -> Self {
        if is_white_turn(turn) {
            Color::White
        } else {
            Color::Black
        }
    }
}

/// `true` when `turn` is even.
pub fn is_white_turn(turn: u32) -> bool {
    turn % 2 == 0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Role {
    /// Upper-case FEN / piece-code letter
    pub fn letter(self) -> char {
        match self {
            Role::Pawn => 'P',
            Role::Knight => 'N',
            Role::Bishop => 'B',
            Role::Rook => 'R',
            Role::Queen => 'Q',
            Role::King => 'K',
        }
    }

    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'P' => Some(Role::Pawn),
            'N' => Some(Role::Knight),
            'B' => Some(Role::Bishop),
            'R' => Some(Role::Rook),
            'Q' => Some(Role::Queen),
            'K' => Some(Role::King),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub role: Role,
}

impl Piece {
    pub const fn new(color: Color, role: Role) -> Self {
        Piece { color, role }
    }

    /// FEN letter: upper case for White, lower case for Black
    pub fn fen_char(self) -> char {
        match self.color {
            Color::White => self.role.letter(),
            Color::Black => self.role.letter().to_ascii_lowercase(),
        }
    }

    pub fn from_fen_char(c: char) -> Option<Self> {
        let role = Role::from_letter(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { color, role })
    }

    /// Two-letter board code such as `wK` or `bP`
    pub fn code(self) -> String {
        let prefix = match self.color {
            Color::White => 'w',
            Color::Black => 'b',
        };
        format!("{}{}", prefix, self.role.letter())
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let mut chars = code.chars();
        let color = match chars.next()? {
            'w' => Color::White,
            'b' => Color::Black,
            _ => return None,
        };
        let letter = chars.next()?;
        if !letter.is_ascii_uppercase() || chars.next().is_some() {
            return None;
        }
        Some(Piece {
            color,
            role: Role::from_letter(letter)?,
        })
    }
}

/// Piece a pawn may promote to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionChoice {
    Queen,
    Knight,
    Rook,
    Bishop,
}

impl PromotionChoice {
    /// Order the prompt offers them in
    pub const ALL: [PromotionChoice; 4] = [
        PromotionChoice::Queen,
        PromotionChoice::Knight,
        PromotionChoice::Rook,
        PromotionChoice::Bishop,
    ];

    pub fn role(self) -> Role {
        match self {
            PromotionChoice::Queen => Role::Queen,
            PromotionChoice::Knight => Role::Knight,
            PromotionChoice::Rook => Role::Rook,
            PromotionChoice::Bishop => Role::Bishop,
        }
    }

    /// Letter the engine expects. Note knight is `K`, not the FEN `N`.
    pub fn wire_letter(self) -> char {
        match self {
            PromotionChoice::Queen => 'Q',
            PromotionChoice::Knight => 'K',
            PromotionChoice::Rook => 'R',
            PromotionChoice::Bishop => 'B',
        }
    }

    pub fn from_role(role: Role) -> Option<Self> {
        match role {
            Role::Queen => Some(PromotionChoice::Queen),
            Role::Knight => Some(PromotionChoice::Knight),
            Role::Rook => Some(PromotionChoice::Rook),
            Role::Bishop => Some(PromotionChoice::Bishop),
            Role::Pawn | Role::King => None,
        }
    }
}

/// Which side is drawn at the bottom of the board
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    White,
    Black,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::White => Orientation::Black,
            Orientation::Black => Orientation::White,
        }
    }
}

impl From<Color> for Orientation {
    fn from(color: Color) -> Self {
        match color {
            Color::White => Orientation::White,
            Color::Black => Orientation::Black,
        }
    }
}
