//! UI module - dialog primitives and the board's prompts
//!
//! - `dialog` - headless [`Modal`] / [`Drawer`] with focus trapping
//! - `new_game` - "Start New Game?" confirmation
//! - `promotion_ui` - promotion piece picker

pub mod dialog;
pub mod new_game;
pub mod promotion_ui;

pub use dialog::{DialogEvent, DialogInput, Drawer, DrawerPosition, Modal, ModalSize};
pub use new_game::{NewGameAnswer, NewGamePrompt};
pub use promotion_ui::PromotionPrompt;
