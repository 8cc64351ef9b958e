//! Page Lifecycle Events
//!
//! A page goes through two one-shot notifications:
//!
//! - [`PageEvent::Ready`]: content is laid out; interactive behaviours
//!   (navigation, menu, contact form, entrance animations, typing demo) start.
//! - [`PageEvent::Loaded`]: everything has been drawn at least once; late
//!   behaviours (sticky scroll reveal) start.
//!
//! [`PageLifecycle`] enforces that each fires at most once and that `Loaded`
//! never precedes `Ready`.

use serde::{Deserialize, Serialize};

/// One-shot page notifications
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageEvent {
    /// The page structure is available
    Ready,
    /// The page has been fully rendered
    Loaded,
}

/// Tracks which lifecycle notifications have already fired
#[derive(Clone, Copy, Debug, Default)]
pub struct PageLifecycle {
    ready: bool,
    loaded: bool,
}

impl PageLifecycle {
    /// Nothing fired yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `event` and return the notifications that are new
    ///
    /// Repeated events yield nothing. A `Loaded` arriving first implies
    /// `Ready`, which is delivered before it.
    pub fn fire(&mut self, event: PageEvent) -> Vec<PageEvent> {
        let mut fired = Vec::new();
        if !self.ready {
            self.ready = true;
            fired.push(PageEvent::Ready);
        }
        if event == PageEvent::Loaded && !self.loaded {
            self.loaded = true;
            fired.push(PageEvent::Loaded);
        }
        if !fired.is_empty() {
            tracing::debug!(?fired, "Page lifecycle advanced");
        }
        fired
    }

    /// Whether `Ready` has fired
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether `Loaded` has fired
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}
