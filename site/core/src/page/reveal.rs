//! Entrance Animations
//!
//! Cards animate in the first time enough of them scrolls into view. An
//! observer watches a set of element ids; each [`RevealObserver::update`]
//! reports the ids that became visible for the first time.
//!
//! Two observers exist on the page:
//!
//! - [`RevealObserver::fade_in_up`]: started on `Ready`, watches service,
//!   project, team and contact cards, stops watching an element once it has
//!   animated.
//! - [`RevealObserver::sticky`]: started on `Loaded`, watches cards flagged
//!   `reveal`. Elements stay observed but the revealed state never reverts.

use std::collections::HashSet;

use super::{Bounds, Page, Viewport};

/// Visible share needed by the fade-in-up observer
pub const FADE_IN_THRESHOLD: f32 = 0.1;

/// Rows trimmed from the bottom of the viewport for the fade-in-up observer
pub const FADE_IN_BOTTOM_MARGIN: u32 = 1;

/// Visible share needed by the sticky observer
pub const STICKY_THRESHOLD: f32 = 0.15;

/// Animation applied when an element is revealed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealEffect {
    /// Slide up while fading in
    FadeInUp,
    /// Generic revealed state
    Revealed,
}

/// Watches elements and reports when they first intersect the viewport
#[derive(Clone, Debug)]
pub struct RevealObserver {
    effect: RevealEffect,
    threshold: f32,
    bottom_margin: u32,
    unobserve_on_reveal: bool,
    observed: Vec<String>,
    revealed: HashSet<String>,
}

impl RevealObserver {
    /// Observer with explicit parameters and nothing observed yet
    #[must_use]
    pub fn new(
        effect: RevealEffect,
        threshold: f32,
        bottom_margin: u32,
        unobserve_on_reveal: bool,
    ) -> Self {
        Self {
            effect,
            threshold: threshold.clamp(0.0, 1.0),
            bottom_margin,
            unobserve_on_reveal,
            observed: Vec::new(),
            revealed: HashSet::new(),
        }
    }

    /// The fade-in-up observer over every card of `page`
    #[must_use]
    pub fn fade_in_up(page: &Page) -> Self {
        let mut observer = Self::new(
            RevealEffect::FadeInUp,
            FADE_IN_THRESHOLD,
            FADE_IN_BOTTOM_MARGIN,
            true,
        );
        for card in page.cards() {
            observer.observe(&card.id);
        }
        observer
    }

    /// The sticky observer over cards flagged `reveal`
    #[must_use]
    pub fn sticky(page: &Page) -> Self {
        let mut observer = Self::new(RevealEffect::Revealed, STICKY_THRESHOLD, 0, false);
        for card in page.cards().filter(|c| c.reveal) {
            observer.observe(&card.id);
        }
        observer
    }

    /// Effect this observer applies
    #[must_use]
    pub fn effect(&self) -> RevealEffect {
        self.effect
    }

    /// Start watching `id`
    pub fn observe(&mut self, id: &str) {
        if !self.observed.iter().any(|o| o == id) {
            self.observed.push(id.to_string());
        }
    }

    /// Ids still being watched
    #[must_use]
    pub fn observed(&self) -> &[String] {
        &self.observed
    }

    /// Whether `id` has been revealed
    #[must_use]
    pub fn is_revealed(&self, id: &str) -> bool {
        self.revealed.contains(id)
    }

    /// Check observed elements against the viewport
    ///
    /// `bounds_of` maps an id to its laid-out bounds; ids it cannot place are
    /// skipped. Returns the ids revealed by this call, in observation order.
    pub fn update<F>(&mut self, viewport: Viewport, mut bounds_of: F) -> Vec<String>
    where
        F: FnMut(&str) -> Option<Bounds>,
    {
        let mut newly = Vec::new();
        for id in &self.observed {
            if self.revealed.contains(id) {
                continue;
            }
            let Some(bounds) = bounds_of(id) else {
                continue;
            };
            if self.intersects(viewport, bounds) {
                self.revealed.insert(id.clone());
                newly.push(id.clone());
            }
        }

        if self.unobserve_on_reveal && !newly.is_empty() {
            self.observed.retain(|id| !newly.contains(id));
        }
        if !newly.is_empty() {
            tracing::debug!(effect = ?self.effect, revealed = ?newly, "Elements revealed");
        }
        newly
    }

    fn intersects(&self, viewport: Viewport, bounds: Bounds) -> bool {
        let root_top = viewport.top;
        let root_bottom = viewport.top + viewport.height.saturating_sub(self.bottom_margin);

        if bounds.height == 0 {
            return bounds.top >= root_top && bounds.top < root_bottom;
        }

        let visible_top = bounds.top.max(root_top);
        let visible_bottom = bounds.bottom().min(root_bottom);
        if visible_bottom <= visible_top {
            return false;
        }

        #[allow(clippy::cast_precision_loss)]
        let ratio = (visible_bottom - visible_top) as f32 / bounds.height as f32;
        ratio >= self.threshold
    }
}
