//! Channel Surface
//!
//! The typing sequencer runs on its own task. It must not touch terminal
//! state directly, so every display call is turned into an [`EditorCommand`]
//! and sent to the UI loop, which applies it to its
//! [`EditorState`](crate::editor::EditorState) between frames.

use site_core::{DisplaySurface, SlotHandle};
use tokio::sync::mpsc;

/// A display mutation queued for the UI loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorCommand {
    /// Replace the tab title
    SetTabLabel(String),
    /// Drop every line slot
    ClearLines,
    /// A new empty slot was appended
    AppendLine(SlotHandle),
    /// Replace the markup shown in a slot
    SetLineContent(SlotHandle, String),
    /// Show line numbers `1..=n`
    SetGutter(usize),
}

/// [`DisplaySurface`] that forwards calls over an unbounded channel
#[derive(Debug)]
pub struct ChannelSurface {
    tx: mpsc::UnboundedSender<EditorCommand>,
    next_slot: u32,
}

impl ChannelSurface {
    /// Create a surface and the receiver the UI loop drains
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EditorCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, next_slot: 0 }, rx)
    }

    fn send(&self, command: EditorCommand) {
        // The receiver only goes away while the UI is shutting down.
        if self.tx.send(command).is_err() {
            tracing::trace!("Editor channel closed, dropping command");
        }
    }
}

impl DisplaySurface for ChannelSurface {
    fn set_tab_label(&mut self, label: &str) {
        self.send(EditorCommand::SetTabLabel(label.to_string()));
    }

    fn clear_lines(&mut self) {
        self.send(EditorCommand::ClearLines);
    }

    fn append_line_slot(&mut self) -> SlotHandle {
        let slot = SlotHandle::new(self.next_slot);
        self.next_slot = self.next_slot.wrapping_add(1);
        self.send(EditorCommand::AppendLine(slot));
        slot
    }

    fn set_line_content(&mut self, slot: SlotHandle, markup: &str) {
        self.send(EditorCommand::SetLineContent(slot, markup.to_string()));
    }

    fn set_gutter(&mut self, line_count: usize) {
        self.send(EditorCommand::SetGutter(line_count));
    }
}
