//! Wire protocol shared between the board client and the chess engine process.

pub mod protocol;
