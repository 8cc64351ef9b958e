//! Typing Sequencer
//!
//! Drives the "code typing" demo: an unending rotation through the catalog,
//! typing each document line by line into a [`DisplaySurface`].
//!
//! # Playback
//!
//! ```text
//! ┌─ document ──────────────────────────────────────────────────────┐
//! │ set_tab_label → clear_lines → set_gutter(N)                     │
//! │   ┌─ line ───────────────────────────────────────────────────┐  │
//! │   │ append_line_slot → set_line_content… (char pauses)       │  │
//! │   └──────────────────────────────────── line pause ──────────┘  │
//! └────────────────────────────────────────── document pause ───────┘
//!                     index = (index + 1) % len
//! ```
//!
//! Every pause is a cancellation point. A [`CancelToken`] is checked before
//! each pause and again on waking, so a cancelled sequencer never starts
//! another character or line. The character already being revealed is always
//! completed first, so the surface never holds a half-written tag.
//!
//! # Ownership
//!
//! [`Sequencer::start`] consumes the sequencer and returns the only
//! [`SequencerHandle`] for the spawned task, which rules out two interleaved
//! loops over the same cursor. Dropping the handle cancels playback.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::catalog::{Catalog, Document};
use crate::markup::{self, RevealSteps};
use crate::surface::DisplaySurface;

// =============================================================================
// Timing
// =============================================================================

/// Default delay after each visible character
pub const DEFAULT_CHAR_DELAY: Duration = Duration::from_millis(30);

/// Default pause after a fully revealed line
pub const DEFAULT_LINE_PAUSE: Duration = Duration::from_millis(100);

/// Default pause after a fully revealed document
pub const DEFAULT_DOCUMENT_PAUSE: Duration = Duration::from_millis(8000);

/// The three suspension lengths of the typing loop
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Delay after each visible character
    pub char_delay: Duration,

    /// Pause after each line
    pub line_pause: Duration,

    /// Pause after each document
    pub document_pause: Duration,
}

impl Timing {
    /// No delays at all (headless runs and tests)
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            char_delay: Duration::ZERO,
            line_pause: Duration::ZERO,
            document_pause: Duration::ZERO,
        }
    }

    /// Override the per-character delay
    #[must_use]
    pub const fn with_char_delay(mut self, delay: Duration) -> Self {
        self.char_delay = delay;
        self
    }

    /// Override the per-line pause
    #[must_use]
    pub const fn with_line_pause(mut self, pause: Duration) -> Self {
        self.line_pause = pause;
        self
    }

    /// Override the per-document pause
    #[must_use]
    pub const fn with_document_pause(mut self, pause: Duration) -> Self {
        self.document_pause = pause;
        self
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            char_delay: DEFAULT_CHAR_DELAY,
            line_pause: DEFAULT_LINE_PAUSE,
            document_pause: DEFAULT_DOCUMENT_PAUSE,
        }
    }
}

// =============================================================================
// Cancellation
// =============================================================================

/// Cooperative cancellation flag shared between a sequencer and its owner
///
/// Clones observe the same flag. Cancelling is permanent.
#[derive(Clone, Debug)]
pub struct CancelToken {
    state: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    /// Create a token that is not cancelled
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            state: Arc::new(tx),
        }
    }

    /// Request cancellation; wakes every pending [`CancelToken::cancelled`]
    pub fn cancel(&self) {
        self.state.send_replace(true);
    }

    /// Whether cancellation has been requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.state.borrow()
    }

    /// Resolve once cancellation has been requested
    pub async fn cancelled(&self) {
        let mut rx = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Marker returned when playback stopped at a cancellation point
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cancelled;

/// Suspend for `duration`, bailing out early if `cancel` fires
///
/// Zero-length pauses still yield to the scheduler so an instant-timing loop
/// cannot starve its owner.
async fn pause(duration: Duration, cancel: &CancelToken) -> Result<(), Cancelled> {
    if cancel.is_cancelled() {
        return Err(Cancelled);
    }

    if duration.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(Cancelled),
            () = tokio::time::sleep(duration) => {}
        }
    }

    if cancel.is_cancelled() {
        Err(Cancelled)
    } else {
        Ok(())
    }
}

// =============================================================================
// Sequencer
// =============================================================================

/// Position of the sequencer within the catalog
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlaybackCursor {
    /// Index of the document being played (`< catalog.len()`)
    pub document: usize,

    /// Index of the line in progress within the document
    pub line: usize,

    /// Byte offset into the raw markup of the line in progress
    pub offset: usize,
}

/// What a finished playback loop reports back to its owner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// Documents typed out completely, including their trailing pause
    pub documents_completed: u64,

    /// Where the cursor stood when playback stopped
    pub cursor: PlaybackCursor,
}

/// Types the catalog into a surface, one character at a time
#[derive(Debug)]
pub struct Sequencer {
    catalog: Catalog,
    timing: Timing,
    cursor: PlaybackCursor,
    documents_completed: u64,
}

impl Sequencer {
    /// Create a sequencer positioned on the first document
    #[must_use]
    pub fn new(catalog: Catalog, timing: Timing) -> Self {
        Self {
            catalog,
            timing,
            cursor: PlaybackCursor::default(),
            documents_completed: 0,
        }
    }

    /// Current playback position
    #[must_use]
    pub fn cursor(&self) -> PlaybackCursor {
        self.cursor
    }

    /// Timing in use
    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// The document under the cursor
    #[must_use]
    pub fn current_document(&self) -> &Document {
        self.catalog.get(self.cursor.document)
    }

    /// Type out the current document, including the trailing document pause
    ///
    /// The cursor is left on the current document; call
    /// [`Sequencer::advance`] to move on.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if `cancel` fired at one of the pauses.
    pub async fn play_document<S>(
        &mut self,
        surface: &mut S,
        cancel: &CancelToken,
    ) -> Result<(), Cancelled>
    where
        S: DisplaySurface + ?Sized,
    {
        let catalog = self.catalog.clone();
        let document = catalog.get(self.cursor.document);
        let lines = markup::split_lines(&document.markup);

        self.cursor.line = 0;
        self.cursor.offset = 0;

        tracing::debug!(
            document = %document.tab_label,
            lines = lines.len(),
            "Typing document"
        );

        surface.set_tab_label(&document.tab_label);
        surface.clear_lines();
        surface.set_gutter(lines.len());

        for (line_index, line) in lines.iter().enumerate() {
            self.cursor.line = line_index;
            self.cursor.offset = 0;

            let slot = surface.append_line_slot();
            for step in RevealSteps::new(line) {
                surface.set_line_content(slot, step.content);
                self.cursor.offset = step.offset;
                if step.pause {
                    pause(self.timing.char_delay, cancel).await?;
                }
            }

            pause(self.timing.line_pause, cancel).await?;
        }

        pause(self.timing.document_pause, cancel).await?;
        self.documents_completed += 1;
        Ok(())
    }

    /// Move the cursor to the next document, wrapping at the end
    pub fn advance(&mut self) {
        self.cursor = PlaybackCursor {
            document: self.catalog.next_index(self.cursor.document),
            line: 0,
            offset: 0,
        };
    }

    /// Play documents forever, returning only once `cancel` fires
    pub async fn run<S>(&mut self, surface: &mut S, cancel: &CancelToken) -> PlaybackSummary
    where
        S: DisplaySurface + ?Sized,
    {
        tracing::info!(documents = self.catalog.len(), "Typing demo started");

        while self.play_document(surface, cancel).await.is_ok() {
            self.advance();
        }

        let summary = PlaybackSummary {
            documents_completed: self.documents_completed,
            cursor: self.cursor,
        };
        tracing::info!(
            documents_completed = summary.documents_completed,
            "Typing demo stopped"
        );
        summary
    }

    /// Spawn the playback loop on the current Tokio runtime
    ///
    /// Consumes the sequencer, so each cursor has exactly one running loop.
    #[must_use]
    pub fn start<S>(mut self, mut surface: S) -> SequencerHandle
    where
        S: DisplaySurface + Send + 'static,
    {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move { self.run(&mut surface, &token).await });

        SequencerHandle {
            cancel,
            task: Some(task),
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Owner of a running typing loop
///
/// Dropping the handle cancels the loop.
#[derive(Debug)]
pub struct SequencerHandle {
    cancel: CancelToken,
    task: Option<JoinHandle<PlaybackSummary>>,
}

impl SequencerHandle {
    /// Token that cancels this loop
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Whether the loop has exited
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancel the loop and wait for it to exit
    ///
    /// Returns `None` if the task panicked or was aborted.
    pub async fn stop(mut self) -> Option<PlaybackSummary> {
        self.cancel.cancel();
        let task = self.task.take()?;
        match task.await {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!(error = %e, "Typing task did not exit cleanly");
                None
            }
        }
    }
}

impl Drop for SequencerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Start the typing demo if its display target exists
///
/// A missing surface is not an error: the page simply has no code window, so
/// nothing is started.
#[must_use]
pub fn start_typing_demo<S>(
    surface: Option<S>,
    catalog: Catalog,
    timing: Timing,
) -> Option<SequencerHandle>
where
    S: DisplaySurface + Send + 'static,
{
    let Some(surface) = surface else {
        tracing::debug!("No code window on this page, typing demo not started");
        return None;
    };
    Some(Sequencer::new(catalog, timing).start(surface))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SlotHandle, SurfaceCall};
    use pretty_assertions::assert_eq;

    fn single(markup: &str) -> Catalog {
        Catalog::new(vec![Document::new("python", "main.py", markup)]).unwrap()
    }

    #[test]
    fn test_default_timing() {
        let timing = Timing::default();
        assert_eq!(timing.char_delay, Duration::from_millis(30));
        assert_eq!(timing.line_pause, Duration::from_millis(100));
        assert_eq!(timing.document_pause, Duration::from_millis(8000));
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_after_cancel() {
        let token = CancelToken::new();
        let waiter = token.clone();
        let task = tokio::spawn(async move { waiter.cancelled().await });
        token.cancel();
        task.await.unwrap();
    }

    #[test]
    fn test_cancelled_pending_until_cancel() {
        let token = CancelToken::new();
        let mut waiter = tokio_test::task::spawn(token.cancelled());
        tokio_test::assert_pending!(waiter.poll());

        token.cancel();
        assert!(waiter.is_woken());
        tokio_test::assert_ready!(waiter.poll());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_returns_early_on_cancel() {
        let token = CancelToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        let started = tokio::time::Instant::now();
        assert_eq!(pause(Duration::from_secs(60), &token).await, Err(Cancelled));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_empty_line_gets_slot_and_pause() {
        let recorder = RecordingSurface::new();
        let mut surface = recorder.clone();
        let mut sequencer = Sequencer::new(single("x\n\ny"), Timing::instant());

        sequencer
            .play_document(&mut surface, &CancelToken::new())
            .await
            .unwrap();

        let slots = recorder
            .calls()
            .into_iter()
            .filter(|c| matches!(c, SurfaceCall::AppendLineSlot(_)))
            .count();
        assert_eq!(slots, 3);
        assert!(!recorder
            .calls()
            .contains(&SurfaceCall::SetLineContent(SlotHandle::new(1), String::new())));
    }

    #[tokio::test]
    async fn test_cursor_resets_on_advance() {
        let mut sequencer = Sequencer::new(Catalog::builtin(), Timing::instant());
        let mut surface = RecordingSurface::new();
        sequencer
            .play_document(&mut surface, &CancelToken::new())
            .await
            .unwrap();
        assert!(sequencer.cursor().line > 0);

        sequencer.advance();
        assert_eq!(
            sequencer.cursor(),
            PlaybackCursor {
                document: 1,
                line: 0,
                offset: 0
            }
        );
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_stops_after_first_character() {
        let recorder = RecordingSurface::new();
        let mut surface = recorder.clone();
        let token = CancelToken::new();
        token.cancel();

        let mut sequencer = Sequencer::new(single("ab"), Timing::instant());
        assert_eq!(sequencer.play_document(&mut surface, &token).await, Err(Cancelled));

        assert_eq!(
            recorder.calls(),
            vec![
                SurfaceCall::SetTabLabel("main.py".into()),
                SurfaceCall::ClearLines,
                SurfaceCall::SetGutter(1),
                SurfaceCall::AppendLineSlot(SlotHandle::new(0)),
                SurfaceCall::SetLineContent(SlotHandle::new(0), "a".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_surface_starts_nothing() {
        let handle =
            start_typing_demo::<RecordingSurface>(None, Catalog::builtin(), Timing::instant());
        assert!(handle.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_reports_summary() {
        let surface = RecordingSurface::new();
        let handle = start_typing_demo(Some(surface), single("ab"), Timing::default()).unwrap();

        // Two characters (60ms) + line pause (100ms) + document pause (8s).
        tokio::time::sleep(Duration::from_millis(8200)).await;
        let summary = handle.stop().await.unwrap();

        assert_eq!(summary.documents_completed, 1);
        assert_eq!(summary.cursor.document, 0);
    }
}
