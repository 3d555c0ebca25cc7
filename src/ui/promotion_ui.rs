//! Pawn promotion prompt
//!
//! Offers the four promotion pieces in a modal and turns the user's pick
//! into a [`PromotionChoice`].

use super::dialog::{DialogEvent, DialogInput, Modal, ModalSize};
use crate::game::types::PromotionChoice;

fn label(choice: PromotionChoice) -> &'static str {
    match choice {
        PromotionChoice::Queen => "Queen",
        PromotionChoice::Knight => "Knight",
        PromotionChoice::Rook => "Rook",
        PromotionChoice::Bishop => "Bishop",
    }
}

#[derive(Debug)]
pub struct PromotionPrompt {
    modal: Modal,
}

impl PromotionPrompt {
    pub fn new() -> Self {
        Self {
            modal: Modal::new(PromotionChoice::ALL.map(label)).size(ModalSize::ExtraLarge),
        }
    }

    pub fn title(&self) -> &'static str {
        "Pick Promotion"
    }

    pub fn options(&self) -> &[String] {
        self.modal.items()
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    /// Match the modal to whether the board is waiting on a choice
    pub fn sync(&mut self, pending: bool) {
        if pending {
            self.modal.open();
        } else {
            self.modal.close();
        }
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Returns the picked piece; the modal closes once a pick is made
    pub fn handle(&mut self, input: DialogInput) -> Option<PromotionChoice> {
        match self.modal.handle(input) {
            DialogEvent::Activated(index) => {
                let choice = PromotionChoice::ALL.get(index).copied();
                if choice.is_some() {
                    self.modal.close();
                }
                choice
            }
            DialogEvent::Ignored | DialogEvent::FocusMoved(_) | DialogEvent::CloseRequested => None,
        }
    }
}

impl Default for PromotionPrompt {
    fn default() -> Self {
        Self::new()
    }
}
