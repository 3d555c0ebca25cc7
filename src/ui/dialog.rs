//! Headless modal and drawer primitives
//!
//! Both are small state machines over [`DialogInput`]. While open they trap
//! focus among their items and report close requests; the host decides
//! what a close means. A close request invokes `on_request_close` exactly
//! once and leaves the dialog closed, so stray input afterwards is ignored.

use std::fmt;

/// Raw input routed to an open dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogInput {
    Escape,
    ClickOutside,
    ClickInside,
    Tab,
    ShiftTab,
    /// Enter / space on the focused item
    Activate,
    /// Pointer click on the item at this index
    Select(usize),
}

/// What the dialog did with an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    Ignored,
    FocusMoved(usize),
    Activated(usize),
    CloseRequested,
}

type CloseHandler = Box<dyn FnMut() + Send>;

/// Shared open/focus bookkeeping
struct DialogCore {
    open: bool,
    items: Vec<String>,
    focus: usize,
    close_on_click_outside: bool,
    on_request_close: Option<CloseHandler>,
}

impl DialogCore {
    fn new(items: Vec<String>, close_on_click_outside: bool) -> Self {
        Self {
            open: false,
            items,
            focus: 0,
            close_on_click_outside,
            on_request_close: None,
        }
    }

    fn open(&mut self) {
        if !self.open {
            self.open = true;
            self.focus = 0;
        }
    }

    fn request_close(&mut self) -> DialogEvent {
        self.open = false;
        if let Some(handler) = self.on_request_close.as_mut() {
            handler();
        }
        DialogEvent::CloseRequested
    }

    fn handle(&mut self, input: DialogInput) -> DialogEvent {
        if !self.open {
            return DialogEvent::Ignored;
        }
        let count = self.items.len();
        match input {
            DialogInput::Escape => self.request_close(),
            DialogInput::ClickOutside if self.close_on_click_outside => self.request_close(),
            DialogInput::ClickOutside | DialogInput::ClickInside => DialogEvent::Ignored,
            DialogInput::Tab if count > 0 => {
                self.focus = (self.focus + 1) % count;
                DialogEvent::FocusMoved(self.focus)
            }
            DialogInput::ShiftTab if count > 0 => {
                self.focus = (self.focus + count - 1) % count;
                DialogEvent::FocusMoved(self.focus)
            }
            DialogInput::Activate if count > 0 => DialogEvent::Activated(self.focus),
            DialogInput::Select(index) if index < count => {
                self.focus = index;
                DialogEvent::Activated(index)
            }
            DialogInput::Tab
            | DialogInput::ShiftTab
            | DialogInput::Activate
            | DialogInput::Select(_) => DialogEvent::Ignored,
        }
    }
}

impl fmt::Debug for DialogCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogCore")
            .field("open", &self.open)
            .field("items", &self.items)
            .field("focus", &self.focus)
            .field("close_on_click_outside", &self.close_on_click_outside)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalSize {
    #[default]
    Default,
    Large,
    ExtraLarge,
}

/// Centered dialog over a dimmed page
#[derive(Debug)]
pub struct Modal {
    core: DialogCore,
    size: ModalSize,
}

impl Modal {
    /// Outside clicks are ignored unless enabled with
    /// [`Modal::close_on_click_outside`].
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            core: DialogCore::new(items.into_iter().map(Into::into).collect(), false),
            size: ModalSize::Default,
        }
    }

    pub fn close_on_click_outside(mut self, enabled: bool) -> Self {
        self.core.close_on_click_outside = enabled;
        self
    }

    pub fn size(mut self, size: ModalSize) -> Self {
        self.size = size;
        self
    }

    pub fn on_request_close(mut self, handler: impl FnMut() + Send + 'static) -> Self {
        self.core.on_request_close = Some(Box::new(handler));
        self
    }

    pub fn is_open(&self) -> bool {
        self.core.open
    }

    pub fn open(&mut self) {
        self.core.open();
    }

    /// Close without a close request, e.g. when the host state moved on
    pub fn close(&mut self) {
        self.core.open = false;
    }

    pub fn items(&self) -> &[String] {
        &self.core.items
    }

    pub fn focused(&self) -> Option<usize> {
        (self.core.open && !self.core.items.is_empty()).then_some(self.core.focus)
    }

    pub fn modal_size(&self) -> ModalSize {
        self.size
    }

    pub fn handle(&mut self, input: DialogInput) -> DialogEvent {
        self.core.handle(input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawerPosition {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

/// Panel sliding in from an edge. Always closes on an outside click.
#[derive(Debug)]
pub struct Drawer {
    core: DialogCore,
    position: DrawerPosition,
}

impl Drawer {
    pub fn new<I, S>(position: DrawerPosition, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            core: DialogCore::new(items.into_iter().map(Into::into).collect(), true),
            position,
        }
    }

    pub fn on_request_close(mut self, handler: impl FnMut() + Send + 'static) -> Self {
        self.core.on_request_close = Some(Box::new(handler));
        self
    }

    pub fn position(&self) -> DrawerPosition {
        self.position
    }

    pub fn is_open(&self) -> bool {
        self.core.open
    }

    /// Open or close to match a shared flag, e.g. [`crate::core::DrawerToggle`]
    pub fn set_open(&mut self, open: bool) {
        if open {
            self.core.open();
        } else {
            self.core.open = false;
        }
    }

    pub fn focused(&self) -> Option<usize> {
        (self.core.open && !self.core.items.is_empty()).then_some(self.core.focus)
    }

    pub fn handle(&mut self, input: DialogInput) -> DialogEvent {
        self.core.handle(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counted_modal(close_on_click_outside: bool) -> (Modal, Arc<AtomicUsize>) {
        let closes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&closes);
        let modal = Modal::new(["Close", "Confirm"])
            .close_on_click_outside(close_on_click_outside)
            .on_request_close(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        (modal, closes)
    }

    #[test]
    fn test_escape_requests_close_once() {
        let (mut modal, closes) = counted_modal(false);
        modal.open();
        assert_eq!(modal.handle(DialogInput::Escape), DialogEvent::CloseRequested);
        assert_eq!(modal.handle(DialogInput::Escape), DialogEvent::Ignored);
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(!modal.is_open());
    }

    #[test]
    fn test_click_outside_respects_flag() {
        let (mut modal, closes) = counted_modal(false);
        modal.open();
        assert_eq!(modal.handle(DialogInput::ClickOutside), DialogEvent::Ignored);
        assert!(modal.is_open());

        let (mut modal, closes_outside) = counted_modal(true);
        modal.open();
        assert_eq!(modal.handle(DialogInput::ClickInside), DialogEvent::Ignored);
        assert_eq!(modal.handle(DialogInput::ClickOutside), DialogEvent::CloseRequested);
        assert_eq!(closes.load(Ordering::SeqCst), 0);
        assert_eq!(closes_outside.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_focus_is_trapped() {
        let (mut modal, _) = counted_modal(false);
        modal.open();
        assert_eq!(modal.focused(), Some(0));
        assert_eq!(modal.handle(DialogInput::Tab), DialogEvent::FocusMoved(1));
        assert_eq!(modal.handle(DialogInput::Tab), DialogEvent::FocusMoved(0));
        assert_eq!(modal.handle(DialogInput::ShiftTab), DialogEvent::FocusMoved(1));
        assert_eq!(modal.handle(DialogInput::Activate), DialogEvent::Activated(1));
    }

    #[test]
    fn test_closed_dialog_ignores_input() {
        let (mut modal, closes) = counted_modal(true);
        for input in [
            DialogInput::Escape,
            DialogInput::ClickOutside,
            DialogInput::Tab,
            DialogInput::Select(0),
        ] {
            assert_eq!(modal.handle(input), DialogEvent::Ignored);
        }
        assert_eq!(closes.load(Ordering::SeqCst), 0);
        assert_eq!(modal.focused(), None);
    }

    #[test]
    fn test_programmatic_close_is_silent() {
        let (mut modal, closes) = counted_modal(false);
        modal.open();
        modal.close();
        assert_eq!(closes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drawer_closes_on_outside_click() {
        let mut drawer = Drawer::new(DrawerPosition::Right, ["Home", "Summary", "About"]);
        drawer.set_open(true);
        assert_eq!(drawer.position(), DrawerPosition::Right);
        assert_eq!(drawer.handle(DialogInput::Select(2)), DialogEvent::Activated(2));
        assert_eq!(drawer.focused(), Some(2));
        assert_eq!(drawer.handle(DialogInput::ClickOutside), DialogEvent::CloseRequested);
        assert!(!drawer.is_open());
    }
}
