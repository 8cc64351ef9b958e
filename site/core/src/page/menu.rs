//! Mobile Menu
//!
//! On narrow layouts the navigation collapses behind a menu button. The menu
//! opens and closes with the button, closes when a nav link is used, when the
//! user clicks anywhere outside it, on Escape, and when the layout grows back
//! past the breakpoint.

/// Layout width (columns) at or below which the menu collapses
pub const DEFAULT_MOBILE_BREAKPOINT: u16 = 100;

/// Where a click landed, relative to the menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    /// The menu (hamburger) button
    MenuButton,
    /// Inside the navigation panel
    Navigation,
    /// Anywhere else on the page
    Elsewhere,
}

/// Open/closed state of the collapsible navigation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    /// A closed menu
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the menu panel is open
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Flip between open and closed
    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open = true;
            tracing::debug!("Mobile menu opened");
        }
    }

    /// Close the menu (no-op when already closed)
    pub fn close(&mut self) {
        if self.open {
            self.open = false;
            tracing::debug!("Mobile menu closed");
        }
    }

    /// React to a click anywhere on the page
    pub fn handle_click(&mut self, target: ClickTarget) {
        match target {
            ClickTarget::MenuButton => self.toggle(),
            ClickTarget::Navigation => {}
            ClickTarget::Elsewhere => self.close(),
        }
    }

    /// React to a (debounced) layout width change
    pub fn handle_resize(&mut self, width: u16, breakpoint: u16) {
        if !is_mobile(width, breakpoint) {
            self.close();
        }
    }

    /// Whether the navigation links should be drawn at all
    ///
    /// Desktop layouts always show them; mobile layouts only while open.
    #[must_use]
    pub fn nav_visible(&self, width: u16, breakpoint: u16) -> bool {
        self.open || !is_mobile(width, breakpoint)
    }
}

/// Whether `width` is at or below the mobile breakpoint
#[must_use]
pub fn is_mobile(width: u16, breakpoint: u16) -> bool {
    width <= breakpoint
}
