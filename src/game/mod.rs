//! Board model and interaction logic
//!
//! # Module Organization
//!
//! - `types` - square identity codec, colors, roles, pieces, orientation
//! - `position` - sparse position, FEN placement parse/serialize, snapshot diff
//! - `meta` - engine-reported game status and move options
//! - `highlight` - per-square styles from move options
//! - `controller` - the interaction state machine
//! - `session` - drives a controller against an engine bridge
//!
//! The engine owns the game. Everything here is a cache of what it last
//! reported, replaced wholesale and safe to refetch.

pub mod controller;
pub mod error;
pub mod highlight;
pub mod meta;
pub mod position;
pub mod session;
pub mod types;

pub use controller::{BoardPhase, Gesture, InteractionController, Outbound};
pub use error::{FenError, FenResult, SquareError, SquareResult};
pub use position::{diff_positions, parse_fen, serialize_fen, Position, PositionDiff};
pub use session::BoardView;
pub use types::{Color, Orientation, Piece, PromotionChoice, Role, Square};
