//! Error types for game module
//!
//! Covers the two parse boundaries of the board model: square labels /
//! coordinates and FEN piece placement text.

/// Errors raised by the square identity codec
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SquareError {
    /// Coordinate pair outside the 8×8 board
    #[error("Coordinate ({col}, {row}) is off the board")]
    OutOfRange { col: i32, row: i32 },

    /// Text that is not a file letter followed by a rank digit
    #[error("Invalid square label: {label:?}")]
    InvalidLabel { label: String },
}

/// Errors raised while parsing or producing FEN placement text
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// Placement did not split into exactly eight rank groups
    #[error("Expected 8 rank groups, found {found}")]
    RankCount { found: usize },

    /// A rank group expanded to something other than eight squares
    #[error("Rank group {group} ({text:?}) does not cover 8 squares")]
    RankWidth { group: usize, text: String },

    /// Character outside the piece letters and 1-8 placeholders
    #[error("Unexpected character {character:?} in rank group {group}")]
    InvalidCharacter { group: usize, character: char },

    /// Position key that is not a square label
    #[error("Invalid square key: {0:?}")]
    InvalidSquare(String),

    /// Position value that is not a piece code such as `wK` or `bP`
    #[error("Invalid piece code: {0:?}")]
    InvalidPieceCode(String),
}

/// Result type alias for square operations
pub type SquareResult<T> = Result<T, SquareError>;

/// Result type alias for FEN operations
pub type FenResult<T> = Result<T, FenError>;
