//! Display Surface
//!
//! The rendering boundary of the typing demo. The sequencer only ever talks to
//! a [`DisplaySurface`]; each UI (terminal, headless recorder, tests) provides
//! its own implementation.
//!
//! Surfaces owned by another thread or event loop must marshal these calls to
//! their owner (see the TUI's channel-backed surface). The trait is therefore
//! synchronous and infallible: a call either lands or is dropped with the UI.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// Handle to a line slot created by [`DisplaySurface::append_line_slot`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotHandle(u32);

impl SlotHandle {
    /// Wrap a surface-specific slot number
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Surface-specific slot number
    #[must_use]
    pub const fn id(self) -> u32 {
        self.0
    }
}

/// Operations the typing demo performs on its code window
pub trait DisplaySurface {
    /// Replace the visible tab title
    fn set_tab_label(&mut self, label: &str);

    /// Remove all rendered line slots
    fn clear_lines(&mut self);

    /// Create an empty line slot after all existing ones
    fn append_line_slot(&mut self) -> SlotHandle;

    /// Replace the rendered markup of a slot
    fn set_line_content(&mut self, slot: SlotHandle, markup: &str);

    /// Render line numbers `1..=line_count`
    fn set_gutter(&mut self, line_count: usize);
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for Box<S> {
    fn set_tab_label(&mut self, label: &str) {
        (**self).set_tab_label(label);
    }

    fn clear_lines(&mut self) {
        (**self).clear_lines();
    }

    fn append_line_slot(&mut self) -> SlotHandle {
        (**self).append_line_slot()
    }

    fn set_line_content(&mut self, slot: SlotHandle, markup: &str) {
        (**self).set_line_content(slot, markup);
    }

    fn set_gutter(&mut self, line_count: usize) {
        (**self).set_gutter(line_count);
    }
}

// =============================================================================
// Recording Surface
// =============================================================================

/// A single call made on a surface
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceCall {
    /// `set_tab_label`
    SetTabLabel(String),
    /// `clear_lines`
    ClearLines,
    /// `append_line_slot`, with the handle that was returned
    AppendLineSlot(SlotHandle),
    /// `set_line_content`
    SetLineContent(SlotHandle, String),
    /// `set_gutter`
    SetGutter(usize),
}

type CallHook = Box<dyn FnMut(&SurfaceCall) + Send>;

/// Headless surface that records every call
///
/// Clones share the same log and slot counter, so a test can keep one clone
/// while the sequencer owns another. An optional hook observes each call as it happens.
#[derive(Clone, Default)]
pub struct RecordingSurface {
    calls: Arc<Mutex<Vec<SurfaceCall>>>,
    hook: Arc<Mutex<Option<CallHook>>>,
    next_slot: Arc<AtomicU32>,
}

impl RecordingSurface {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe every call right after it is recorded
    #[must_use]
    pub fn with_hook(self, hook: impl FnMut(&SurfaceCall) + Send + 'static) -> Self {
        *self.hook.lock() = Some(Box::new(hook));
        self
    }

    /// Snapshot of all calls so far
    #[must_use]
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().clone()
    }

    /// Number of calls so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Whether nothing has been recorded yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    fn record(&self, call: SurfaceCall) {
        self.calls.lock().push(call.clone());
        if let Some(hook) = self.hook.lock().as_mut() {
            hook(&call);
        }
    }
}

impl std::fmt::Debug for RecordingSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSurface")
            .field("calls", &self.len())
            .field("next_slot", &self.next_slot.load(Ordering::Relaxed))
            .finish()
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_tab_label(&mut self, label: &str) {
        self.record(SurfaceCall::SetTabLabel(label.to_string()));
    }

    fn clear_lines(&mut self) {
        self.record(SurfaceCall::ClearLines);
    }

    fn append_line_slot(&mut self) -> SlotHandle {
        // fetch_add wraps on overflow.
        let slot = SlotHandle::new(self.next_slot.fetch_add(1, Ordering::Relaxed));
        self.record(SurfaceCall::AppendLineSlot(slot));
        slot
    }

    fn set_line_content(&mut self, slot: SlotHandle, markup: &str) {
        self.record(SurfaceCall::SetLineContent(slot, markup.to_string()));
    }

    fn set_gutter(&mut self, line_count: usize) {
        self.record(SurfaceCall::SetGutter(line_count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_surface_shares_log_between_clones() {
        let observer = RecordingSurface::new();
        let mut surface = observer.clone();

        surface.set_tab_label("main.py");
        let slot = surface.append_line_slot();
        surface.set_line_content(slot, "x");

        assert_eq!(
            observer.calls(),
            vec![
                SurfaceCall::SetTabLabel("main.py".into()),
                SurfaceCall::AppendLineSlot(SlotHandle::new(0)),
                SurfaceCall::SetLineContent(SlotHandle::new(0), "x".into()),
            ]
        );
    }

    #[test]
    fn test_slot_handles_are_sequential() {
        let mut surface = RecordingSurface::new();
        assert_eq!(surface.append_line_slot().id(), 0);
        assert_eq!(surface.append_line_slot().id(), 1);
    }

    #[test]
    fn test_clones_never_reuse_slots() {
        let mut first = RecordingSurface::new();
        let mut second = first.clone();

        let a = first.append_line_slot();
        let b = second.append_line_slot();
        let c = first.append_line_slot();
        assert_ne!(a, b);
        assert_eq!(c.id(), 2);
    }

    #[test]
    fn test_slot_counter_wraps() {
        let mut surface = RecordingSurface::new();
        surface.next_slot.store(u32::MAX, Ordering::Relaxed);
        assert_eq!(surface.append_line_slot().id(), u32::MAX);
        assert_eq!(surface.append_line_slot().id(), 0);
    }

    #[test]
    fn test_hook_sees_each_call() {
        let seen = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&seen);
        let mut surface = RecordingSurface::new().with_hook(move |_| *counter.lock() += 1);

        surface.clear_lines();
        surface.set_gutter(3);
        assert_eq!(*seen.lock(), 2);
    }
}
