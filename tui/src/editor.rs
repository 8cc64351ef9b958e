//! Code Window State
//!
//! The UI-side model of the pseudo-editor in the hero section, rebuilt from
//! [`EditorCommand`]s sent by the typing sequencer.

use site_core::markup::{parse_segments, Segment};
use site_core::SlotHandle;

use crate::surface::EditorCommand;

/// Tab, gutter and line slots of the code window
#[derive(Clone, Debug, Default)]
pub struct EditorState {
    tab_label: String,
    gutter: usize,
    lines: Vec<(SlotHandle, String)>,
}

impl EditorState {
    /// An empty code window
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one queued display mutation
    pub fn apply(&mut self, command: EditorCommand) {
        match command {
            EditorCommand::SetTabLabel(label) => self.tab_label = label,
            EditorCommand::ClearLines => self.lines.clear(),
            EditorCommand::AppendLine(slot) => self.lines.push((slot, String::new())),
            EditorCommand::SetLineContent(slot, markup) => {
                // Slots from before a clear are gone; drop late updates to them.
                if let Some((_, content)) = self.lines.iter_mut().find(|(s, _)| *s == slot) {
                    *content = markup;
                }
            }
            EditorCommand::SetGutter(count) => self.gutter = count,
        }
    }

    /// Current tab title
    #[must_use]
    pub fn tab_label(&self) -> &str {
        &self.tab_label
    }

    /// Number of line numbers shown
    #[must_use]
    pub fn gutter(&self) -> usize {
        self.gutter
    }

    /// Raw markup of each slot, in order
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|(_, markup)| markup.as_str())
    }

    /// Each slot split into highlighted runs
    #[must_use]
    pub fn highlighted(&self) -> Vec<Vec<Segment>> {
        self.lines().map(parse_segments).collect()
    }
}
