//! Navigation
//!
//! Nav links jump to page sections, leaving room for the fixed header. While
//! the page scrolls, the link of the section under the header is kept active
//! (scroll-spy).

use super::{Bounds, Page};

/// Rows before the header at which a section already counts as current
pub const DEFAULT_SPY_LEAD: u32 = 3;

/// A section's anchor id together with its laid-out bounds
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionBounds {
    /// Anchor id
    pub id: String,
    /// Rows occupied by the section
    pub bounds: Bounds,
}

impl SectionBounds {
    /// Create section bounds
    pub fn new(id: impl Into<String>, top: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            bounds: Bounds::new(top, height),
        }
    }
}

/// Scroll offset that places `section` just below the fixed header
#[must_use]
pub fn scroll_target(section: &Bounds, header_height: u32) -> u32 {
    section.top.saturating_sub(header_height)
}

/// Section the reader is currently looking at, if any
///
/// A section counts from `spy_lead` rows before it reaches the header until
/// its bottom. When several match, the last one in document order wins.
#[must_use]
pub fn active_section(
    sections: &[SectionBounds],
    scroll: u32,
    header_height: u32,
    spy_lead: u32,
) -> Option<&str> {
    let scroll = i64::from(scroll);
    sections
        .iter()
        .rev()
        .find(|s| {
            let start =
                i64::from(s.bounds.top) - i64::from(header_height) - i64::from(spy_lead);
            scroll >= start && scroll < start + i64::from(s.bounds.height)
        })
        .map(|s| s.id.as_str())
}

/// A link in the header navigation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLink {
    /// Visible label
    pub label: String,
    /// Anchor id of the target section
    pub target: String,
}

/// Active and focused state of the header navigation
#[derive(Clone, Debug, Default)]
pub struct Navigation {
    links: Vec<NavLink>,
    active: Option<usize>,
    focused: Option<usize>,
}

impl Navigation {
    /// One link per page section, in document order
    #[must_use]
    pub fn for_page(page: &Page) -> Self {
        Self::new(
            page.sections
                .iter()
                .map(|s| NavLink {
                    label: s.nav_label.clone(),
                    target: s.id.clone(),
                })
                .collect(),
        )
    }

    /// Create navigation over explicit links
    #[must_use]
    pub fn new(links: Vec<NavLink>) -> Self {
        Self {
            links,
            active: None,
            focused: None,
        }
    }

    /// All links
    #[must_use]
    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    /// Index of the active link
    #[must_use]
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Index of the keyboard-focused link
    #[must_use]
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// Activate link `index` and return the section it targets
    ///
    /// Out-of-range indices are ignored.
    pub fn activate(&mut self, index: usize) -> Option<&str> {
        let link = self.links.get(index)?;
        self.active = Some(index);
        tracing::debug!(target_section = %link.target, "Nav link activated");
        Some(link.target.as_str())
    }

    /// Activate whichever link currently has keyboard focus
    pub fn activate_focused(&mut self) -> Option<&str> {
        let index = self.focused?;
        self.activate(index)
    }

    /// Move keyboard focus to the next link, wrapping around
    pub fn focus_next(&mut self) {
        if self.links.is_empty() {
            return;
        }
        self.focused = Some(self.focused.map_or(0, |i| (i + 1) % self.links.len()));
    }

    /// Move keyboard focus to the previous link, wrapping around
    pub fn focus_prev(&mut self) {
        if self.links.is_empty() {
            return;
        }
        let len = self.links.len();
        self.focused = Some(self.focused.map_or(len - 1, |i| (i + len - 1) % len));
    }

    /// Drop keyboard focus
    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Mark the link targeting `section_id` active
    ///
    /// Unknown ids leave the current link active.
    pub fn set_active_section(&mut self, section_id: &str) {
        if let Some(index) = self.links.iter().position(|l| l.target == section_id) {
            self.active = Some(index);
        }
    }

    /// Scroll-spy: update the active link from the scroll position
    pub fn sync_with_scroll(
        &mut self,
        sections: &[SectionBounds],
        scroll: u32,
        header_height: u32,
        spy_lead: u32,
    ) {
        if let Some(id) = active_section(sections, scroll, header_height, spy_lead) {
            let id = id.to_string();
            self.set_active_section(&id);
        }
    }
}
