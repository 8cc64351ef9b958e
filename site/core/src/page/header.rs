//! Header Style
//!
//! The fixed header is solid at the top of the page and turns translucent
//! (blurred backdrop) once the reader scrolls past a threshold.

/// Default scroll threshold, in rows
pub const DEFAULT_HEADER_THRESHOLD: u32 = 5;

/// Visual treatment of the fixed header
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HeaderStyle {
    /// Opaque background (top of the page)
    #[default]
    Solid,
    /// Semi-transparent, blurred background (scrolled)
    Translucent,
}

impl HeaderStyle {
    /// Style for a given scroll offset
    #[must_use]
    pub fn for_scroll(scroll: u32, threshold: u32) -> Self {
        if scroll > threshold {
            Self::Translucent
        } else {
            Self::Solid
        }
    }
}
