//! "Start new game?" prompt

use super::dialog::{DialogEvent, DialogInput, Modal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewGameAnswer {
    Confirm,
    Decline,
}

const DECLINE: usize = 0;
const CONFIRM: usize = 1;

/// Outside clicks do not dismiss it; Escape counts as declining.
#[derive(Debug)]
pub struct NewGamePrompt {
    modal: Modal,
}

impl NewGamePrompt {
    pub fn new() -> Self {
        Self {
            modal: Modal::new(["Close", "Confirm"]).close_on_click_outside(false),
        }
    }

    pub fn title(&self) -> &'static str {
        "Start New Game?"
    }

    pub fn is_open(&self) -> bool {
        self.modal.is_open()
    }

    pub fn sync(&mut self, open: bool) {
        if open {
            self.modal.open();
        } else {
            self.modal.close();
        }
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn handle(&mut self, input: DialogInput) -> Option<NewGameAnswer> {
        let answer = match self.modal.handle(input) {
            DialogEvent::Activated(CONFIRM) => NewGameAnswer::Confirm,
            DialogEvent::Activated(DECLINE) | DialogEvent::CloseRequested => NewGameAnswer::Decline,
            DialogEvent::Activated(_) | DialogEvent::Ignored | DialogEvent::FocusMoved(_) => {
                return None
            }
        };
        self.modal.close();
        Some(answer)
    }
}

impl Default for NewGamePrompt {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_and_decline() {
        let mut prompt = NewGamePrompt::new();
        prompt.sync(true);
        assert_eq!(prompt.handle(DialogInput::Select(1)), Some(NewGameAnswer::Confirm));
        assert!(!prompt.is_open());

        prompt.sync(true);
        assert_eq!(prompt.handle(DialogInput::Activate), Some(NewGameAnswer::Decline));
    }

    #[test]
    fn test_outside_click_keeps_prompt() {
        let mut prompt = NewGamePrompt::new();
        prompt.sync(true);
        assert_eq!(prompt.handle(DialogInput::ClickOutside), None);
        assert!(prompt.is_open());
        assert_eq!(prompt.handle(DialogInput::Escape), Some(NewGameAnswer::Decline));
    }
}
