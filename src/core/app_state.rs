//! Shared application state with narrow capabilities
//!
//! Components never look shared state up by themselves. The owner of an
//! [`AppState`] hands each one only the handle it needs: a
//! [`DrawerToggle`] for the navigation drawer, a [`LayoutReader`] or a
//! [`LayoutWriter`] for the page layout.

use parking_lot::RwLock;
use std::sync::Arc;

/// Below this viewport width the side drawer overlays the page and closes
/// after navigation or an outside click.
pub const NARROW_VIEWPORT_WIDTH: u32 = 1024;

/// Above this width the wide layout is used.
pub const WIDE_VIEWPORT_WIDTH: u32 = 1536;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    #[default]
    Default,
    Wide,
    Compact,
}

impl Layout {
    pub fn for_viewport(width: u32) -> Self {
        if width < NARROW_VIEWPORT_WIDTH {
            Layout::Compact
        } else if width >= WIDE_VIEWPORT_WIDTH {
            Layout::Wide
        } else {
            Layout::Default
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    drawer_open: bool,
    layout: Layout,
}

/// Owner of the shared UI state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    inner: Arc<RwLock<Inner>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drawer(&self) -> DrawerToggle {
        DrawerToggle {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn layout_reader(&self) -> LayoutReader {
        LayoutReader {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn layout_writer(&self) -> LayoutWriter {
        LayoutWriter {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Read and flip the drawer's open flag
#[derive(Debug, Clone)]
pub struct DrawerToggle {
    inner: Arc<RwLock<Inner>>,
}

impl DrawerToggle {
    pub fn is_open(&self) -> bool {
        self.inner.read().drawer_open
    }

    /// Returns the new state
    pub fn toggle(&self) -> bool {
        let mut inner = self.inner.write();
        inner.drawer_open = !inner.drawer_open;
        inner.drawer_open
    }

    pub fn set_open(&self, open: bool) {
        self.inner.write().drawer_open = open;
    }

    /// Close after a navigation or outside click, but only on narrow
    /// viewports where the drawer overlays the content.
    pub fn close_if_narrow(&self, viewport_width: u32) -> bool {
        if viewport_width < NARROW_VIEWPORT_WIDTH {
            let mut inner = self.inner.write();
            let was_open = inner.drawer_open;
            inner.drawer_open = false;
            return was_open;
        }
        false
    }
}

#[derive(Debug, Clone)]
pub struct LayoutReader {
    inner: Arc<RwLock<Inner>>,
}

impl LayoutReader {
    pub fn get(&self) -> Layout {
        self.inner.read().layout
    }
}

#[derive(Debug, Clone)]
pub struct LayoutWriter {
    inner: Arc<RwLock<Inner>>,
}

impl LayoutWriter {
    pub fn set(&self, layout: Layout) {
        self.inner.write().layout = layout;
    }

    pub fn fit_viewport(&self, width: u32) -> Layout {
        let layout = Layout::for_viewport(width);
        self.set(layout);
        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_share_state() {
        let state = AppState::new();
        let nav = state.drawer();
        let header = state.drawer();
        assert!(!header.is_open());
        assert!(nav.toggle());
        assert!(header.is_open());
        assert!(!header.toggle());
        assert!(!nav.is_open());
    }

    #[test]
    fn test_close_if_narrow() {
        let state = AppState::new();
        let drawer = state.drawer();
        drawer.set_open(true);
        assert!(!drawer.close_if_narrow(1280));
        assert!(drawer.is_open());
        assert!(drawer.close_if_narrow(800));
        assert!(!drawer.is_open());
    }

    #[test]
    fn test_layout_reader_sees_writer() {
        let state = AppState::new();
        let reader = state.layout_reader();
        let writer = state.layout_writer();
        assert_eq!(reader.get(), Layout::Default);
        assert_eq!(writer.fit_viewport(600), Layout::Compact);
        assert_eq!(reader.get(), Layout::Compact);
        writer.set(Layout::Wide);
        assert_eq!(reader.get(), Layout::Wide);
    }
}
