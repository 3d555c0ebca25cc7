//! Remote state adapter
//!
//! Translates between the engine's wire vocabulary ([`shared::protocol`])
//! and the board model. Decoding is lenient: a cell the adapter does not
//! understand becomes an empty square with a warning, never an error.

use super::bridge::{BridgeError, BridgeResult, EngineBridge};
use crate::game::meta::{GameMeta, KingStatus, MoveKind, MoveOption};
use crate::game::position::Position;
use crate::game::types::{Color, Piece, PromotionChoice, Role, Square};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::protocol::{
    events, ClickReply, EngineRequest, PushMessage, RawBoard, RawColor, RawPiece, WireGameMeta,
    WireKing, WireMoveKind, WireMoveList, WireSquare,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// A request the board can send, in model terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    NewGame,
    GameState,
    Score,
    HoverOptions(Square),
    ClickSquare(Square),
    Drop {
        source: Square,
        target: Square,
        piece: Piece,
    },
    PromotionChoice(PromotionChoice),
}

impl Request {
    pub fn to_wire(self) -> EngineRequest {
        match self {
            Request::NewGame => EngineRequest::NewGame,
            Request::GameState => EngineRequest::GetState,
            Request::Score => EngineRequest::GetScore,
            Request::HoverOptions(square) => EngineRequest::HoverSquare {
                square: square.to_string(),
            },
            Request::ClickSquare(square) => EngineRequest::ClickSquare {
                square: square.to_string(),
            },
            Request::Drop {
                source,
                target,
                piece,
            } => EngineRequest::DropSquare {
                source_square: source.to_string(),
                target_square: target.to_string(),
                piece: piece.code(),
            },
            Request::PromotionChoice(choice) => EngineRequest::Promote {
                choice: choice.wire_letter(),
            },
        }
    }
}

/// Everything a `click_square` reply carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutcome {
    pub options: Vec<MoveOption>,
    pub position: Position,
    pub meta: GameMeta,
}

/// A decoded reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    NewGame(Position),
    GameState(Position),
    Score(GameMeta),
    HoverOptions {
        square: Square,
        options: Vec<MoveOption>,
    },
    Click {
        square: Square,
        outcome: ClickOutcome,
    },
    /// `None` when the engine acknowledged without sending a board
    Drop(Option<Position>),
    Promoted,
}

/// A decoded push event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnginePush {
    /// A pawn is waiting on a promotion choice
    Promotion(Option<Square>),
    /// Authoritative replacement board
    Board(Position),
    Unknown(String),
}

// ============================================================================
// Decoding
// ============================================================================

fn decode_color(color: RawColor) -> Color {
    match color {
        RawColor::White => Color::White,
        RawColor::Black => Color::Black,
    }
}

/// Map one raw cell to a piece. `None` for empty and unrecognized cells.
pub fn decode_piece(raw: &RawPiece) -> Option<Piece> {
    let (color, role) = match raw {
        RawPiece::None => return None,
        RawPiece::Unrecognized(tag) => {
            warn!("[ADAPTER] Unrecognized piece tag {:?}, treating square as empty", tag);
            return None;
        }
        RawPiece::Pawn(c, _) => (c, Role::Pawn),
        RawPiece::Knight(c, _) => (c, Role::Knight),
        RawPiece::Bishop(c, _) => (c, Role::Bishop),
        RawPiece::Rook(c, _) => (c, Role::Rook),
        RawPiece::Queen(c, _) => (c, Role::Queen),
        RawPiece::King(c, ..) => (c, Role::King),
    };
    Some(Piece::new(decode_color(*color), role))
}

pub fn decode_square(square: WireSquare) -> Option<Square> {
    Square::from_coords(square)
}

/// Build a position from the raw `[file][rank]` array.
///
/// Cells outside the 8×8 area are ignored.
pub fn decode_board(board: &RawBoard) -> Position {
    let mut position = Position::new();
    for (col, column) in board.0.iter().enumerate() {
        for (row, cell) in column.iter().enumerate() {
            let Some(piece) = decode_piece(cell) else {
                continue;
            };
            match (u8::try_from(col), u8::try_from(row)) {
                (Ok(c), Ok(r)) => match Square::from_coords((c, r)) {
                    Some(square) => {
                        position.insert(square, piece);
                    }
                    None => {
                        warn!("[ADAPTER] Ignoring piece outside the board at ({}, {})", col, row)
                    }
                },
                _ => warn!("[ADAPTER] Ignoring piece outside the board at ({}, {})", col, row),
            }
        }
    }
    position
}

pub fn decode_moves(moves: &WireMoveList) -> Vec<MoveOption> {
    moves
        .iter()
        .filter_map(|(square, kind)| {
            let target = decode_square(*square).or_else(|| {
                warn!("[ADAPTER] Dropping move option off the board: {:?}", square);
                None
            })?;
            let kind = match kind {
                WireMoveKind::Move => MoveKind::Move,
                WireMoveKind::Capture => MoveKind::Capture,
                WireMoveKind::Castle => MoveKind::Castle,
                WireMoveKind::EnPassant => MoveKind::EnPassant,
                WireMoveKind::Double => MoveKind::DoublePawnPush,
            };
            Some(MoveOption { target, kind })
        })
        .collect()
}

fn decode_king(king: &WireKing) -> KingStatus {
    let (first_move, check, checkmate) = match king.piece {
        RawPiece::King(_, first, check, mate) => (first, check, mate),
        _ => (false, false, false),
    };
    KingStatus {
        piece: decode_piece(&king.piece),
        square: decode_square(king.square),
        first_move,
        check,
        checkmate,
    }
}

pub fn decode_meta(meta: &WireGameMeta) -> GameMeta {
    GameMeta {
        score: meta.score,
        turn: meta.turn,
        game_over: meta.game_over,
        en_passant: meta.en_passant.and_then(decode_square),
        promotable_pawn: meta.promotable_pawn.and_then(decode_square),
        half_move_count: meta.half_move_count,
        white_king: decode_king(&meta.white_king),
        black_king: decode_king(&meta.black_king),
    }
}

/// Decode a push envelope. Payloads that fail to parse degrade to
/// [`EnginePush::Unknown`] so a bad event never takes the board down.
pub fn decode_push(message: &PushMessage) -> EnginePush {
    match message.event.as_str() {
        events::PROMOTION => {
            let square = serde_json::from_str::<WireSquare>(&message.payload)
                .ok()
                .and_then(decode_square);
            EnginePush::Promotion(square)
        }
        events::BOARD => match serde_json::from_str::<RawBoard>(&message.payload) {
            Ok(board) => EnginePush::Board(decode_board(&board)),
            Err(e) => {
                warn!("[ADAPTER] Board push with malformed payload: {}", e);
                EnginePush::Unknown(message.event.clone())
            }
        },
        other => {
            debug!("[ADAPTER] Ignoring unknown push event {:?}", other);
            EnginePush::Unknown(other.to_owned())
        }
    }
}

fn parse<T: DeserializeOwned>(command: &str, value: Value) -> BridgeResult<T> {
    serde_json::from_value(value).map_err(|source| BridgeError::Decode {
        command: command.to_owned(),
        source,
    })
}

// ============================================================================
// Requests
// ============================================================================

/// Typed front for an [`EngineBridge`]
pub struct RemoteStateAdapter<B> {
    bridge: Arc<B>,
}

impl<B> Clone for RemoteStateAdapter<B> {
    fn clone(&self) -> Self {
        Self {
            bridge: Arc::clone(&self.bridge),
        }
    }
}

impl<B: EngineBridge> RemoteStateAdapter<B> {
    pub fn new(bridge: Arc<B>) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &Arc<B> {
        &self.bridge
    }

    async fn call(&self, request: &EngineRequest) -> BridgeResult<Value> {
        debug!("[ADAPTER] -> {} {}", request.command(), request.args());
        self.bridge.invoke(request.command(), request.args()).await
    }

    async fn call_board(&self, request: EngineRequest) -> BridgeResult<Position> {
        let value = self.call(&request).await?;
        let board: RawBoard = parse(request.command(), value)?;
        Ok(decode_board(&board))
    }

    pub async fn request_new_game(&self) -> BridgeResult<Position> {
        self.call_board(EngineRequest::NewGame).await
    }

    pub async fn request_game_state(&self) -> BridgeResult<Position> {
        self.call_board(EngineRequest::GetState).await
    }

    pub async fn request_score(&self) -> BridgeResult<GameMeta> {
        let request = EngineRequest::GetScore;
        let value = self.call(&request).await?;
        let meta: WireGameMeta = parse(request.command(), value)?;
        Ok(decode_meta(&meta))
    }

    pub async fn request_hover_options(&self, square: Square) -> BridgeResult<Vec<MoveOption>> {
        let request = Request::HoverOptions(square).to_wire();
        let value = self.call(&request).await?;
        // the engine sends null for an empty square
        if value.is_null() {
            return Ok(Vec::new());
        }
        let moves: WireMoveList = parse(request.command(), value)?;
        Ok(decode_moves(&moves))
    }

    pub async fn request_click_square(&self, square: Square) -> BridgeResult<ClickOutcome> {
        let request = Request::ClickSquare(square).to_wire();
        let value = self.call(&request).await?;
        let (moves, board, meta): ClickReply = parse(request.command(), value)?;
        Ok(ClickOutcome {
            options: decode_moves(&moves),
            position: decode_board(&board),
            meta: decode_meta(&meta),
        })
    }

    pub async fn request_drop(
        &self,
        source: Square,
        target: Square,
        piece: Piece,
    ) -> BridgeResult<Option<Position>> {
        let request = Request::Drop {
            source,
            target,
            piece,
        }
        .to_wire();
        let value = self.call(&request).await?;
        if value.is_null() {
            return Ok(None);
        }
        let board: RawBoard = parse(request.command(), value)?;
        Ok(Some(decode_board(&board)))
    }

    pub async fn request_promotion_choice(&self, choice: PromotionChoice) -> BridgeResult<()> {
        let request = Request::PromotionChoice(choice).to_wire();
        self.call(&request).await?;
        Ok(())
    }

    /// Run any [`Request`] and wrap the result as a [`Reply`].
    pub async fn execute(&self, request: Request) -> BridgeResult<Reply> {
        let reply = match request {
            Request::NewGame => Reply::NewGame(self.request_new_game().await?),
            Request::GameState => Reply::GameState(self.request_game_state().await?),
            Request::Score => Reply::Score(self.request_score().await?),
            Request::HoverOptions(square) => Reply::HoverOptions {
                square,
                options: self.request_hover_options(square).await?,
            },
            Request::ClickSquare(square) => Reply::Click {
                square,
                outcome: self.request_click_square(square).await?,
            },
            Request::Drop {
                source,
                target,
                piece,
            } => Reply::Drop(self.request_drop(source, target, piece).await?),
            Request::PromotionChoice(choice) => {
                self.request_promotion_choice(choice).await?;
                Reply::Promoted
            }
        };
        Ok(reply)
    }
}
