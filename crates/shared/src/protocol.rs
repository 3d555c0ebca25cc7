//! Engine wire protocol
//!
//! Mirrors the JSON the engine process speaks across the invoke bridge:
//! tagged piece variants, the raw 8×8 board array (indexed `[file][rank]`),
//! move options, the game meta snapshot, request payloads and the push
//! envelope.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Command names understood by the engine
pub mod commands {
    pub const NEW_GAME: &str = "new_game";
    pub const GET_STATE: &str = "get_state";
    pub const GET_SCORE: &str = "get_score";
    pub const HOVER_SQUARE: &str = "hover_square";
    pub const CLICK_SQUARE: &str = "click_square";
    pub const DROP_SQUARE: &str = "drop_square";
    pub const PROMOTE: &str = "promote";
}

/// Push event names emitted by the engine without a request
pub mod events {
    pub const PROMOTION: &str = "promotion";
    pub const BOARD: &str = "board";
}

/// `[file, rank]`, both 0-based
pub type WireSquare = (u8, u8);

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RawColor {
    Black,
    White,
}

impl RawColor {
    fn from_value(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "White" => Some(RawColor::White),
            "Black" => Some(RawColor::Black),
            _ => None,
        }
    }
}

/// A board cell as the engine encodes it.
///
/// Anything that does not match a known tag (or carries malformed content)
/// decodes to [`RawPiece::Unrecognized`] instead of failing the whole board.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum RawPiece {
    #[default]
    None,
    Pawn(RawColor, bool),
    /// color, first move, check, checkmate
    King(RawColor, bool, bool, bool),
    Queen(RawColor, bool),
    Bishop(RawColor, bool),
    Knight(RawColor, bool),
    Rook(RawColor, bool),
    Unrecognized(String),
}

impl RawPiece {
    /// Decode one cell. Never fails.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(tag) if tag == "None" => RawPiece::None,
            Value::Object(map) if map.len() == 1 => match map.iter().next() {
                Some((tag, body)) => Self::from_tagged(tag, body)
                    .unwrap_or_else(|| RawPiece::Unrecognized(tag.clone())),
                None => RawPiece::Unrecognized(String::new()),
            },
            Value::String(tag) => RawPiece::Unrecognized(tag.clone()),
            other => RawPiece::Unrecognized(other.to_string()),
        }
    }

    fn from_tagged(tag: &str, body: &Value) -> Option<Self> {
        let fields = body.as_array()?;
        let color = RawColor::from_value(fields.first()?)?;
        // flags are informational for the client, tolerate them going missing
        let flag = |i: usize| fields.get(i).and_then(Value::as_bool).unwrap_or(false);
        let piece = match tag {
            "Pawn" => RawPiece::Pawn(color, flag(1)),
            "Knight" => RawPiece::Knight(color, flag(1)),
            "Bishop" => RawPiece::Bishop(color, flag(1)),
            "Rook" => RawPiece::Rook(color, flag(1)),
            "Queen" => RawPiece::Queen(color, flag(1)),
            "King" => RawPiece::King(color, flag(1), flag(2), flag(3)),
            _ => return None,
        };
        Some(piece)
    }

    pub fn to_value(&self) -> Value {
        let (tag, body) = match self {
            RawPiece::None => return json!("None"),
            RawPiece::Pawn(c, f) => ("Pawn", json!([c, f])),
            RawPiece::Knight(c, f) => ("Knight", json!([c, f])),
            RawPiece::Bishop(c, f) => ("Bishop", json!([c, f])),
            RawPiece::Rook(c, f) => ("Rook", json!([c, f])),
            RawPiece::Queen(c, f) => ("Queen", json!([c, f])),
            RawPiece::King(c, f, check, mate) => ("King", json!([c, f, check, mate])),
            RawPiece::Unrecognized(tag) => (tag.as_str(), json!([])),
        };
        let mut map = Map::new();
        map.insert(tag.to_owned(), body);
        Value::Object(map)
    }
}

impl Serialize for RawPiece {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawPiece {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(RawPiece::from_value(&value))
    }
}

/// The engine board, `cells[file][rank]`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct RawBoard(pub Vec<Vec<RawPiece>>);

impl RawBoard {
    /// An 8×8 board with every cell `"None"`
    pub fn empty() -> Self {
        RawBoard(vec![vec![RawPiece::None; 8]; 8])
    }

    /// The standard opening array as the engine sends it after `new_game`
    pub fn standard() -> Self {
        use RawColor::{Black, White};
        let mut board = Self::empty();
        let back_rank = |color: RawColor| {
            [
                RawPiece::Rook(color, true),
                RawPiece::Knight(color, true),
                RawPiece::Bishop(color, true),
                RawPiece::Queen(color, true),
                RawPiece::King(color, true, false, false),
                RawPiece::Bishop(color, true),
                RawPiece::Knight(color, true),
                RawPiece::Rook(color, true),
            ]
        };
        for (file, (white, black)) in back_rank(White)
            .into_iter()
            .zip(back_rank(Black))
            .enumerate()
        {
            board.0[file][0] = white;
            board.0[file][1] = RawPiece::Pawn(White, true);
            board.0[file][6] = RawPiece::Pawn(Black, true);
            board.0[file][7] = black;
        }
        board
    }

    pub fn set(&mut self, square: WireSquare, piece: RawPiece) {
        if let Some(cell) = self
            .0
            .get_mut(square.0 as usize)
            .and_then(|column| column.get_mut(square.1 as usize))
        {
            *cell = piece;
        }
    }

    pub fn get(&self, square: WireSquare) -> Option<&RawPiece> {
        self.0
            .get(square.0 as usize)
            .and_then(|column| column.get(square.1 as usize))
    }
}

impl Default for RawBoard {
    fn default() -> Self {
        Self::empty()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WireMoveKind {
    Move,
    Capture,
    Castle,
    EnPassant,
    /// Double pawn push
    Double,
}

pub type WireMoveOption = (WireSquare, WireMoveKind);
pub type WireMoveList = Vec<WireMoveOption>;

/// King record inside the meta snapshot
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WireKing {
    pub piece: RawPiece,
    pub square: WireSquare,
}

/// Game meta snapshot (`get_score`, third element of `click_square`)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct WireGameMeta {
    pub score: i32,
    pub turn: u32,
    pub game_over: bool,
    pub en_passant: Option<WireSquare>,
    pub promotable_pawn: Option<WireSquare>,
    pub half_move_count: u32,
    pub white_king: WireKing,
    pub black_king: WireKing,
}

impl Default for WireGameMeta {
    fn default() -> Self {
        Self {
            score: 0,
            turn: 0,
            game_over: false,
            en_passant: None,
            promotable_pawn: None,
            half_move_count: 0,
            white_king: WireKing {
                piece: RawPiece::King(RawColor::White, true, false, false),
                square: (4, 0),
            },
            black_king: WireKing {
                piece: RawPiece::King(RawColor::Black, true, false, false),
                square: (4, 7),
            },
        }
    }
}

/// `click_square` reply: move options, new board, new meta
pub type ClickReply = (WireMoveList, RawBoard, WireGameMeta);

/// An outbound request with its payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineRequest {
    NewGame,
    GetState,
    GetScore,
    HoverSquare {
        square: String,
    },
    ClickSquare {
        square: String,
    },
    DropSquare {
        source_square: String,
        target_square: String,
        piece: String,
    },
    /// Role letter in the engine's alphabet (Q, K for knight, R, B)
    Promote {
        choice: char,
    },
}

impl EngineRequest {
    pub fn command(&self) -> &'static str {
        match self {
            EngineRequest::NewGame => commands::NEW_GAME,
            EngineRequest::GetState => commands::GET_STATE,
            EngineRequest::GetScore => commands::GET_SCORE,
            EngineRequest::HoverSquare { .. } => commands::HOVER_SQUARE,
            EngineRequest::ClickSquare { .. } => commands::CLICK_SQUARE,
            EngineRequest::DropSquare { .. } => commands::DROP_SQUARE,
            EngineRequest::Promote { .. } => commands::PROMOTE,
        }
    }

    /// Invoke arguments, camelCased the way the bridge forwards them
    pub fn args(&self) -> Value {
        match self {
            EngineRequest::NewGame | EngineRequest::GetState | EngineRequest::GetScore => {
                json!({})
            }
            EngineRequest::HoverSquare { square } | EngineRequest::ClickSquare { square } => {
                json!({ "square": square })
            }
            EngineRequest::DropSquare {
                source_square,
                target_square,
                piece,
            } => json!({
                "sourceSquare": source_square,
                "targetSquare": target_square,
                "piece": piece,
            }),
            EngineRequest::Promote { choice } => json!({ "choice": choice.to_string() }),
        }
    }
}

/// Unprompted engine → client message; `payload` is JSON text
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PushMessage {
    pub event: String,
    pub payload: String,
}

impl PushMessage {
    pub fn promotion(square: WireSquare) -> Self {
        Self {
            event: events::PROMOTION.to_owned(),
            payload: json!(square).to_string(),
        }
    }

    pub fn board(board: &RawBoard) -> Self {
        Self {
            event: events::BOARD.to_owned(),
            payload: json!(board).to_string(),
        }
    }
}
