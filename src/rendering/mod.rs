//! Rendering module - board view descriptors
//!
//! - `board` - position + view options → grid of [`SquareView`]s
//! - `coordinates` - display/board square mapping and notation labels

pub mod board;
pub mod coordinates;

pub use board::{render_board, BoardGrid, Shade, SquareView, DARK_PARITY};
