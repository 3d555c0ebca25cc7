//! Board interaction controller
//!
//! Owns the cached position / meta, the highlight map and the board phase.
//! Gestures and engine traffic go in; the requests to send come out as
//! [`Outbound`] values tagged with a sequence number. Nothing here touches
//! the bridge directly, which keeps every transition synchronous and
//! testable.
//!
//! # Phases
//!
//! ```text
//! mount ──► AwaitingNewGameConfirmation ──confirm/decline──► Idle
//!                                                           │  ▲
//!                                          click (options)  ▼  │ click (none)
//!                                                    SquareSelected
//! promotion push (any phase) ──► AwaitingPromotionChoice ──choice──► Idle
//! meta.game_over ──► GameOver ──confirm──► Idle
//! decline on a finished cached game ──► GameOver
//! ```
//!
//! # Sequencing
//!
//! Replies can resolve in any order. A reply that would replace the position
//! or meta is dropped when a newer request has already replaced it, and a
//! hover reply is only used if it answers the latest hover. Pushes are
//! authoritative and always apply; a board push also outdates the position
//! of every reply still in flight.

use super::highlight::{highlight_squares, SquareStyles};
use super::meta::GameMeta;
use super::position::{diff_positions, Position, PositionDiff};
use super::types::{Orientation, Piece, PromotionChoice, Square};
use crate::core::notifications::Notifier;
use crate::core::resources::BoardSettings;
use crate::networking::adapter::{ClickOutcome, EnginePush, Reply, Request};
use crate::networking::bridge::BridgeError;
use crate::rendering::board::{render_board, BoardGrid};
use tracing::{debug, info, warn};

/// Id used for the new-game toast so repeated confirmations replace it
pub const NEW_GAME_NOTIFICATION_ID: &str = "new_game";

/// Phase of the board interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoardPhase {
    /// New-game prompt is up, board input is blocked
    #[default]
    AwaitingNewGameConfirmation,

    /// Nothing selected, hover previews are live
    Idle,

    /// The engine returned move options for this square
    SquareSelected(Square),

    /// A pawn reached the last rank, waiting on the user's pick
    AwaitingPromotionChoice,

    /// Terminal until a new game is confirmed
    GameOver,
}

impl BoardPhase {
    pub fn accepts_clicks(&self) -> bool {
        matches!(self, BoardPhase::Idle | BoardPhase::SquareSelected(_))
    }

    pub fn accepts_hover(&self) -> bool {
        matches!(self, BoardPhase::Idle)
    }

    pub fn selected_square(&self) -> Option<Square> {
        match self {
            BoardPhase::SquareSelected(square) => Some(*square),
            _ => None,
        }
    }
}

/// User input the controller understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Hover(Square),
    HoverOut(Square),
    Click(Square),
    Drop {
        source: Square,
        target: Square,
        piece: Piece,
    },
    ConfirmNewGame,
    DeclineNewGame,
    ChoosePromotion(PromotionChoice),
    ToggleOrientation,
}

/// A request to hand to the adapter, tagged for reply ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outbound {
    pub seq: u64,
    pub request: Request,
}

pub struct InteractionController {
    phase: BoardPhase,
    position: Position,
    meta: GameMeta,
    styles: SquareStyles,
    orientation: Orientation,
    rotation: bool,
    show_notation: bool,
    last_hovered: Option<Square>,
    ask_new_game: bool,
    promotion_square: Option<Square>,
    last_diff: Option<PositionDiff>,
    notifier: Notifier,

    next_seq: u64,
    position_seq: u64,
    meta_seq: u64,
    hover_seq: u64,
}

impl InteractionController {
    pub fn new(settings: &BoardSettings) -> Self {
        Self {
            phase: BoardPhase::default(),
            position: Position::new(),
            meta: GameMeta::default(),
            styles: SquareStyles::new(),
            orientation: settings.orientation,
            rotation: settings.rotation,
            show_notation: settings.show_notation,
            last_hovered: None,
            ask_new_game: false,
            promotion_square: None,
            last_diff: None,
            notifier: Notifier::new(settings.notification_timeout()),
            next_seq: 1,
            position_seq: 0,
            meta_seq: 0,
            hover_seq: 0,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn meta(&self) -> &GameMeta {
        &self.meta
    }

    pub fn styles(&self) -> &SquareStyles {
        &self.styles
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn rotation(&self) -> bool {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: bool) {
        self.rotation = rotation;
        self.follow_turn();
    }

    pub fn is_white_turn(&self) -> bool {
        self.meta.is_white_turn()
    }

    pub fn new_game_prompt_open(&self) -> bool {
        self.ask_new_game
    }

    pub fn promotion_pending(&self) -> bool {
        self.phase == BoardPhase::AwaitingPromotionChoice
    }

    /// Square of the pawn waiting on a promotion choice, if the engine said
    pub fn promotion_square(&self) -> Option<Square> {
        self.promotion_square
    }

    /// What the last position replacement changed, for move animation
    pub fn last_diff(&self) -> Option<&PositionDiff> {
        self.last_diff.as_ref()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    /// Render the current board
    pub fn view(&self) -> BoardGrid {
        render_board(
            &self.position,
            self.orientation,
            self.show_notation,
            &self.styles,
        )
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    fn issue(&mut self, request: Request) -> Outbound {
        let seq = self.next_seq;
        self.next_seq += 1;
        if let Request::HoverOptions(_) = request {
            self.hover_seq = seq;
        }
        debug!("[CONTROLLER] #{} {:?}", seq, request);
        Outbound { seq, request }
    }

    /// Board mounted: fetch meta and position, then ask about a new game.
    pub fn mount(&mut self) -> Vec<Outbound> {
        info!("[CONTROLLER] Mounting board");
        self.phase = BoardPhase::AwaitingNewGameConfirmation;
        self.ask_new_game = true;
        vec![self.issue(Request::Score), self.issue(Request::GameState)]
    }

    pub fn handle_gesture(&mut self, gesture: Gesture) -> Vec<Outbound> {
        match gesture {
            Gesture::Hover(square) => {
                if !self.phase.accepts_hover() || self.last_hovered == Some(square) {
                    return Vec::new();
                }
                self.last_hovered = Some(square);
                vec![self.issue(Request::HoverOptions(square))]
            }
            Gesture::HoverOut(square) => {
                if self.phase.accepts_hover() && self.last_hovered == Some(square) {
                    self.last_hovered = None;
                    self.styles.clear();
                    // an answer still in flight is now for a square we left
                    self.hover_seq = 0;
                }
                Vec::new()
            }
            Gesture::Click(square) => {
                if !self.phase.accepts_clicks() {
                    debug!("[CONTROLLER] Click on {} ignored in {:?}", square, self.phase);
                    return Vec::new();
                }
                vec![self.issue(Request::ClickSquare(square))]
            }
            Gesture::Drop {
                source,
                target,
                piece,
            } => {
                if !self.phase.accepts_clicks() {
                    debug!("[CONTROLLER] Drop {}->{} ignored in {:?}", source, target, self.phase);
                    return Vec::new();
                }
                vec![self.issue(Request::Drop {
                    source,
                    target,
                    piece,
                })]
            }
            Gesture::ConfirmNewGame => {
                // a finished game can always be restarted, prompt or not
                if !self.ask_new_game && self.phase != BoardPhase::GameOver {
                    return Vec::new();
                }
                self.ask_new_game = false;
                self.notifier.notify("starting new game", Some(NEW_GAME_NOTIFICATION_ID), None);
                vec![self.issue(Request::NewGame)]
            }
            Gesture::DeclineNewGame => {
                if !self.ask_new_game {
                    return Vec::new();
                }
                self.ask_new_game = false;
                if self.phase == BoardPhase::AwaitingNewGameConfirmation {
                    if self.meta.game_over {
                        info!("[CONTROLLER] Cached game is already over");
                        self.phase = BoardPhase::GameOver;
                    } else {
                        info!("[CONTROLLER] Resuming cached game");
                        self.phase = BoardPhase::Idle;
                    }
                }
                Vec::new()
            }
            Gesture::ChoosePromotion(choice) => {
                if self.phase != BoardPhase::AwaitingPromotionChoice {
                    return Vec::new();
                }
                self.phase = BoardPhase::Idle;
                vec![self.issue(Request::PromotionChoice(choice))]
            }
            Gesture::ToggleOrientation => {
                self.orientation = self.orientation.flipped();
                Vec::new()
            }
        }
    }

    // ========================================================================
    // Engine traffic
    // ========================================================================

    fn position_is_stale(&self, seq: u64) -> bool {
        seq < self.position_seq
    }

    fn meta_is_stale(&self, seq: u64) -> bool {
        seq < self.meta_seq
    }

    fn replace_position(&mut self, position: Position) {
        self.last_diff = Some(diff_positions(&self.position, &position));
        self.position = position;
    }

    fn replace_meta(&mut self, meta: GameMeta) {
        self.meta = meta;
        self.follow_turn();
        if self.meta.game_over && self.phase != BoardPhase::GameOver {
            // the confirmation prompt outranks a game-over banner
            if self.phase != BoardPhase::AwaitingNewGameConfirmation {
                info!("[CONTROLLER] Game over");
                self.phase = BoardPhase::GameOver;
                self.styles.clear();
            }
            self.ask_new_game = true;
        }
    }

    fn follow_turn(&mut self) {
        if self.rotation {
            self.orientation = self.meta.side_to_move().into();
        }
    }

    fn reset_hover(&mut self) {
        self.last_hovered = None;
        self.hover_seq = 0;
    }

    /// Apply the reply to request `seq`, returning any follow-up requests.
    pub fn apply_reply(&mut self, seq: u64, reply: Reply) -> Vec<Outbound> {
        match reply {
            Reply::NewGame(position) => {
                if self.position_is_stale(seq) {
                    debug!("[CONTROLLER] Discarding stale new_game reply #{}", seq);
                    return Vec::new();
                }
                self.position_seq = seq;
                self.replace_position(position);
                self.phase = BoardPhase::Idle;
                self.styles.clear();
                self.promotion_square = None;
                self.reset_hover();
                vec![self.issue(Request::Score)]
            }
            Reply::GameState(position) => {
                if self.position_is_stale(seq) {
                    debug!("[CONTROLLER] Discarding stale get_state reply #{}", seq);
                    return Vec::new();
                }
                self.position_seq = seq;
                self.replace_position(position);
                Vec::new()
            }
            Reply::Score(meta) => {
                if self.meta_is_stale(seq) {
                    debug!("[CONTROLLER] Discarding stale get_score reply #{}", seq);
                    return Vec::new();
                }
                self.meta_seq = seq;
                self.replace_meta(meta);
                Vec::new()
            }
            Reply::HoverOptions { square, options } => {
                if seq != self.hover_seq || !self.phase.accepts_hover() {
                    debug!("[CONTROLLER] Discarding hover reply #{} for {}", seq, square);
                    return Vec::new();
                }
                self.styles = highlight_squares(Some(square), &options);
                Vec::new()
            }
            Reply::Click { square, outcome } => {
                if self.meta_is_stale(seq) {
                    debug!("[CONTROLLER] Discarding stale click reply #{}", seq);
                    return Vec::new();
                }
                self.apply_click(seq, square, outcome);
                Vec::new()
            }
            Reply::Drop(position) => match position {
                Some(position) => {
                    if !self.position_is_stale(seq) {
                        self.position_seq = seq;
                        self.replace_position(position);
                    }
                    vec![self.issue(Request::Score)]
                }
                None => vec![self.issue(Request::GameState), self.issue(Request::Score)],
            },
            // the promoted board arrives as a push; the meta needs a refetch
            Reply::Promoted => vec![self.issue(Request::Score)],
        }
    }

    fn apply_click(&mut self, seq: u64, square: Square, outcome: ClickOutcome) {
        self.meta_seq = seq;
        // a board push since the click was sent outranks the board it carries
        if self.position_is_stale(seq) {
            debug!("[CONTROLLER] Keeping pushed board over click reply #{}", seq);
        } else {
            self.position_seq = seq;
            self.replace_position(outcome.position);
        }
        self.styles = highlight_squares(Some(square), &outcome.options);
        self.reset_hover();

        let promotion = outcome.meta.promotable_pawn;
        if self.phase != BoardPhase::AwaitingPromotionChoice {
            self.phase = if outcome.options.is_empty() {
                BoardPhase::Idle
            } else {
                BoardPhase::SquareSelected(square)
            };
        }
        self.replace_meta(outcome.meta);

        // the push may trail the reply; the meta already says a pawn waits
        if promotion.is_some() && self.phase != BoardPhase::GameOver {
            self.enter_promotion(promotion);
        }
    }

    fn enter_promotion(&mut self, square: Option<Square>) {
        if self.phase != BoardPhase::AwaitingPromotionChoice {
            info!("[CONTROLLER] Awaiting promotion choice");
        }
        self.phase = BoardPhase::AwaitingPromotionChoice;
        self.promotion_square = square.or(self.promotion_square);
        self.styles.clear();
        self.reset_hover();
    }

    /// Request `seq` failed. Cached state stays as it was.
    pub fn apply_failure(&mut self, seq: u64, request: Request, error: &BridgeError) {
        let command = request.to_wire().command();
        warn!("[CONTROLLER] {} (#{}) failed: {}", command, seq, error);
        self.notifier
            .error(format!("{} failed: {}", command, error), None);

        match request {
            Request::NewGame => {
                self.ask_new_game = true;
            }
            Request::HoverOptions(square) => {
                if seq == self.hover_seq && self.last_hovered == Some(square) {
                    self.reset_hover();
                }
            }
            Request::PromotionChoice(_) => {
                self.phase = BoardPhase::AwaitingPromotionChoice;
            }
            _ => {}
        }
    }

    pub fn apply_push(&mut self, push: EnginePush) {
        match push {
            EnginePush::Promotion(square) => self.enter_promotion(square),
            EnginePush::Board(position) => {
                debug!("[CONTROLLER] Board override ({} pieces)", position.len());
                // replies to anything sent before the push are now older than it
                self.position_seq = self.next_seq;
                self.replace_position(position);
            }
            EnginePush::Unknown(event) => {
                debug!("[CONTROLLER] Ignoring push {:?}", event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::highlight::Highlight;
    use crate::game::meta::{MoveKind, MoveOption};
    use crate::game::position::parse_fen;
    use crate::game::types::{Color, Role};

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    fn sq(label: &str) -> Square {
        label.parse().unwrap()
    }

    fn idle() -> InteractionController {
        let mut controller = InteractionController::new(&BoardSettings::default());
        controller.mount();
        controller.handle_gesture(Gesture::DeclineNewGame);
        assert_eq!(controller.phase(), BoardPhase::Idle);
        controller
    }

    fn click_outcome(options: Vec<MoveOption>, turn: u32) -> ClickOutcome {
        ClickOutcome {
            options,
            position: parse_fen(START).unwrap(),
            meta: GameMeta {
                turn,
                ..GameMeta::default()
            },
        }
    }

    #[test]
    fn test_mount_asks_first() {
        let mut controller = InteractionController::new(&BoardSettings::default());
        let outbound = controller.mount();
        let requests: Vec<Request> = outbound.iter().map(|o| o.request).collect();
        assert_eq!(requests, vec![Request::Score, Request::GameState]);
        assert_eq!(controller.phase(), BoardPhase::AwaitingNewGameConfirmation);
        assert!(controller.new_game_prompt_open());
        assert!(controller.handle_gesture(Gesture::Click(sq("e2"))).is_empty());
    }

    #[test]
    fn test_hover_is_debounced() {
        let mut controller = idle();
        assert_eq!(controller.handle_gesture(Gesture::Hover(sq("e2"))).len(), 1);
        assert!(controller.handle_gesture(Gesture::Hover(sq("e2"))).is_empty());
        assert_eq!(controller.handle_gesture(Gesture::Hover(sq("d2"))).len(), 1);
    }

    #[test]
    fn test_hover_out_clears_and_rearms() {
        let mut controller = idle();
        let outbound = controller.handle_gesture(Gesture::Hover(sq("e2")));
        controller.apply_reply(
            outbound[0].seq,
            Reply::HoverOptions {
                square: sq("e2"),
                options: vec![MoveOption {
                    target: sq("e3"),
                    kind: MoveKind::Move,
                }],
            },
        );
        assert_eq!(controller.styles().len(), 2);

        controller.handle_gesture(Gesture::HoverOut(sq("e2")));
        assert!(controller.styles().is_empty());
        assert_eq!(controller.handle_gesture(Gesture::Hover(sq("e2"))).len(), 1);
    }

    #[test]
    fn test_superseded_hover_reply_is_ignored() {
        let mut controller = idle();
        let first = controller.handle_gesture(Gesture::Hover(sq("e2")))[0].seq;
        controller.handle_gesture(Gesture::Hover(sq("d2")));
        controller.apply_reply(
            first,
            Reply::HoverOptions {
                square: sq("e2"),
                options: Vec::new(),
            },
        );
        assert!(controller.styles().is_empty());
    }

    #[test]
    fn test_click_with_options_selects() {
        let mut controller = idle();
        let seq = controller.handle_gesture(Gesture::Click(sq("e2")))[0].seq;
        let options = vec![
            MoveOption {
                target: sq("e3"),
                kind: MoveKind::Move,
            },
            MoveOption {
                target: sq("e4"),
                kind: MoveKind::DoublePawnPush,
            },
        ];
        controller.apply_reply(
            seq,
            Reply::Click {
                square: sq("e2"),
                outcome: click_outcome(options, 0),
            },
        );
        assert_eq!(controller.phase(), BoardPhase::SquareSelected(sq("e2")));
        assert_eq!(controller.styles().get(&sq("e2")), Some(&Highlight::Selected));
        assert_eq!(controller.styles().get(&sq("e4")), Some(&Highlight::DoublePawnPush));
        assert_eq!(controller.position().len(), 32);
    }

    #[test]
    fn test_click_without_options_only_selected_style() {
        let mut controller = idle();
        let seq = controller.handle_gesture(Gesture::Click(sq("a1")))[0].seq;
        controller.apply_reply(
            seq,
            Reply::Click {
                square: sq("a1"),
                outcome: click_outcome(Vec::new(), 0),
            },
        );
        assert_eq!(controller.phase(), BoardPhase::Idle);
        assert_eq!(controller.styles().len(), 1);
        assert_eq!(controller.styles().get(&sq("a1")), Some(&Highlight::Selected));
    }

    #[test]
    fn test_rotation_follows_turn_parity() {
        let settings = BoardSettings {
            rotation: true,
            ..BoardSettings::default()
        };
        let mut controller = InteractionController::new(&settings);
        controller.mount();
        controller.handle_gesture(Gesture::DeclineNewGame);

        let seq = controller.handle_gesture(Gesture::Click(sq("e4")))[0].seq;
        controller.apply_reply(
            seq,
            Reply::Click {
                square: sq("e4"),
                outcome: click_outcome(Vec::new(), 5),
            },
        );
        assert!(!controller.is_white_turn());
        assert_eq!(controller.orientation(), Orientation::Black);

        let seq = controller.handle_gesture(Gesture::Click(sq("e5")))[0].seq;
        controller.apply_reply(
            seq,
            Reply::Click {
                square: sq("e5"),
                outcome: click_outcome(Vec::new(), 4),
            },
        );
        assert!(controller.is_white_turn());
        assert_eq!(controller.orientation(), Orientation::White);
    }

    #[test]
    fn test_without_rotation_orientation_is_fixed() {
        let mut controller = idle();
        let seq = controller.handle_gesture(Gesture::Click(sq("e4")))[0].seq;
        controller.apply_reply(
            seq,
            Reply::Click {
                square: sq("e4"),
                outcome: click_outcome(Vec::new(), 5),
            },
        );
        assert_eq!(controller.orientation(), Orientation::White);
        controller.handle_gesture(Gesture::ToggleOrientation);
        assert_eq!(controller.orientation(), Orientation::Black);
    }

    #[test]
    fn test_game_over_rearms_prompt() {
        let mut controller = idle();
        let seq = controller.handle_gesture(Gesture::Click(sq("h5")))[0].seq;
        let mut outcome = click_outcome(Vec::new(), 7);
        outcome.meta.game_over = true;
        controller.apply_reply(
            seq,
            Reply::Click {
                square: sq("h5"),
                outcome,
            },
        );
        assert_eq!(controller.phase(), BoardPhase::GameOver);
        assert!(controller.new_game_prompt_open());
        assert!(controller.handle_gesture(Gesture::Click(sq("e2"))).is_empty());

        let outbound = controller.handle_gesture(Gesture::ConfirmNewGame);
        assert_eq!(outbound[0].request, Request::NewGame);
        let follow_up =
            controller.apply_reply(outbound[0].seq, Reply::NewGame(parse_fen(START).unwrap()));
        assert_eq!(controller.phase(), BoardPhase::Idle);
        assert_eq!(follow_up[0].request, Request::Score);
        assert_eq!(controller.notifier().active().len(), 1);
    }

    #[test]
    fn test_promotion_push_suspends_clicks() {
        let mut controller = idle();
        controller.apply_push(EnginePush::Promotion(Some(sq("a8"))));
        assert!(controller.promotion_pending());
        assert_eq!(controller.promotion_square(), Some(sq("a8")));
        assert!(controller.handle_gesture(Gesture::Click(sq("e2"))).is_empty());

        let outbound = controller.handle_gesture(Gesture::ChoosePromotion(PromotionChoice::Queen));
        assert_eq!(
            outbound[0].request,
            Request::PromotionChoice(PromotionChoice::Queen)
        );
        assert_eq!(controller.phase(), BoardPhase::Idle);
        let follow_up = controller.apply_reply(outbound[0].seq, Reply::Promoted);
        assert_eq!(follow_up[0].request, Request::Score);
    }

    #[test]
    fn test_click_reply_after_promotion_push_keeps_prompt() {
        let mut controller = idle();
        let seq = controller.handle_gesture(Gesture::Click(sq("a8")))[0].seq;
        controller.apply_push(EnginePush::Promotion(Some(sq("a8"))));
        let mut outcome = click_outcome(Vec::new(), 1);
        outcome.meta.promotable_pawn = Some(sq("a8"));
        controller.apply_reply(
            seq,
            Reply::Click {
                square: sq("a8"),
                outcome,
            },
        );
        assert_eq!(controller.phase(), BoardPhase::AwaitingPromotionChoice);
    }

    #[test]
    fn test_board_push_replaces_position_in_any_phase() {
        let mut controller = InteractionController::new(&BoardSettings::default());
        controller.mount();
        controller.apply_push(EnginePush::Board(parse_fen(START).unwrap()));
        assert_eq!(controller.position().len(), 32);
        assert_eq!(controller.phase(), BoardPhase::AwaitingNewGameConfirmation);

        controller.apply_push(EnginePush::Board(Position::new()));
        assert!(controller.position().is_empty());
        assert_eq!(controller.phase(), BoardPhase::AwaitingNewGameConfirmation);
    }

    #[test]
    fn test_stale_state_reply_is_discarded() {
        let mut controller = idle();
        let old = controller.handle_gesture(Gesture::Drop {
            source: sq("e2"),
            target: sq("e4"),
            piece: Piece::new(Color::White, Role::Pawn),
        })[0]
            .seq;
        let follow_up = controller.apply_reply(old, Reply::Drop(None));
        let state_seq = follow_up[0].seq;

        let click = controller.handle_gesture(Gesture::Click(sq("e4")))[0].seq;
        controller.apply_reply(
            click,
            Reply::Click {
                square: sq("e4"),
                outcome: click_outcome(Vec::new(), 1),
            },
        );
        controller.apply_reply(state_seq, Reply::GameState(Position::new()));
        assert_eq!(controller.position().len(), 32);
    }

    #[test]
    fn test_failure_keeps_state_and_notifies() {
        let mut controller = idle();
        let seq = controller.handle_gesture(Gesture::Click(sq("e2")))[0].seq;
        controller.apply_reply(
            seq,
            Reply::Click {
                square: sq("e2"),
                outcome: click_outcome(Vec::new(), 2),
            },
        );
        let before = controller.position().clone();

        let seq = controller.handle_gesture(Gesture::Click(sq("e4")))[0].seq;
        controller.apply_failure(
            seq,
            Request::ClickSquare(sq("e4")),
            &BridgeError::Transport {
                message: "engine gone".to_string(),
            },
        );
        assert_eq!(controller.position(), &before);
        assert_eq!(controller.meta().turn, 2);
        assert_eq!(controller.phase(), BoardPhase::Idle);
        assert_eq!(controller.notifier().active().len(), 1);
    }

    #[test]
    fn test_failed_new_game_reopens_prompt() {
        let mut controller = InteractionController::new(&BoardSettings::default());
        controller.mount();
        let outbound = controller.handle_gesture(Gesture::ConfirmNewGame);
        assert!(!controller.new_game_prompt_open());
        controller.apply_failure(outbound[0].seq, Request::NewGame, &BridgeError::Closed);
        assert!(controller.new_game_prompt_open());
        assert_eq!(controller.phase(), BoardPhase::AwaitingNewGameConfirmation);
    }

    #[test]
    fn test_declined_game_over_can_still_restart() {
        let mut controller = idle();
        let seq = controller.handle_gesture(Gesture::Click(sq("h5")))[0].seq;
        let mut outcome = click_outcome(Vec::new(), 7);
        outcome.meta.game_over = true;
        controller.apply_reply(
            seq,
            Reply::Click {
                square: sq("h5"),
                outcome,
            },
        );
        controller.handle_gesture(Gesture::DeclineNewGame);
        assert!(!controller.new_game_prompt_open());
        assert_eq!(controller.phase(), BoardPhase::GameOver);

        let outbound = controller.handle_gesture(Gesture::ConfirmNewGame);
        assert_eq!(outbound.len(), 1);
        assert_eq!(outbound[0].request, Request::NewGame);
        controller.apply_reply(outbound[0].seq, Reply::NewGame(parse_fen(START).unwrap()));
        assert_eq!(controller.phase(), BoardPhase::Idle);
    }

    #[test]
    fn test_confirm_without_prompt_in_play_is_ignored() {
        let mut controller = idle();
        assert!(controller.handle_gesture(Gesture::ConfirmNewGame).is_empty());
    }

    #[test]
    fn test_declining_finished_cached_game_stays_over() {
        let mut controller = InteractionController::new(&BoardSettings::default());
        let outbound = controller.mount();
        let finished = GameMeta {
            game_over: true,
            ..GameMeta::default()
        };
        controller.apply_reply(outbound[0].seq, Reply::Score(finished));
        assert_eq!(controller.phase(), BoardPhase::AwaitingNewGameConfirmation);

        controller.handle_gesture(Gesture::DeclineNewGame);
        assert_eq!(controller.phase(), BoardPhase::GameOver);
        assert!(controller.handle_gesture(Gesture::Click(sq("e2"))).is_empty());
        assert!(controller.handle_gesture(Gesture::Hover(sq("e2"))).is_empty());
    }

    #[test]
    fn test_board_push_outranks_older_state_reply() {
        let mut controller = idle();
        let drop = controller.handle_gesture(Gesture::Drop {
            source: sq("e2"),
            target: sq("e4"),
            piece: Piece::new(Color::White, Role::Pawn),
        })[0]
            .seq;
        let state_seq = controller.apply_reply(drop, Reply::Drop(None))[0].seq;

        controller.apply_push(EnginePush::Board(parse_fen(START).unwrap()));
        controller.apply_reply(state_seq, Reply::GameState(Position::new()));
        assert_eq!(controller.position().len(), 32);
    }

    #[test]
    fn test_click_reply_after_board_push_keeps_pushed_board() {
        let mut controller = idle();
        let seq = controller.handle_gesture(Gesture::Click(sq("e2")))[0].seq;
        controller.apply_push(EnginePush::Board(Position::new()));

        let options = vec![MoveOption {
            target: sq("e4"),
            kind: MoveKind::DoublePawnPush,
        }];
        controller.apply_reply(
            seq,
            Reply::Click {
                square: sq("e2"),
                outcome: click_outcome(options, 4),
            },
        );
        assert!(controller.position().is_empty());
        assert_eq!(controller.meta().turn, 4);
        assert_eq!(controller.phase(), BoardPhase::SquareSelected(sq("e2")));
    }
}
