//! Site Core - Headless interactivity for the EusaSpark showcase
//!
//! This crate holds everything the showcase page does, with no knowledge of
//! how it is drawn. A surface (the terminal UI, or a recording surface in
//! tests) owns the pixels; the core owns the behaviour.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  Surface (TUI, tests)        │
//! │  - draws the page            │
//! │  - forwards input            │
//! └──────────────┬───────────────┘
//!                │ DisplaySurface calls / page state queries
//! ┌──────────────▼───────────────┐
//! │  site-core                   │
//! │  - typing sequencer (async)  │
//! │  - page behaviours (sync)    │
//! │  - configuration             │
//! └──────────────────────────────┘
//! ```
//!
//! # Typing Demo
//!
//! The [`sequencer::Sequencer`] cycles through a [`catalog::Catalog`] of
//! syntax-highlighted code samples, revealing each character by character
//! into a [`surface::DisplaySurface`]. Markup tags are never shown half-open:
//! see [`markup::reveal_steps`].
//!
//! # Page Behaviours
//!
//! Navigation, the mobile menu, the header style, the contact form and the
//! entrance animations live in [`page`] as plain state machines advanced by
//! input and frame deltas. [`events::PageLifecycle`] orders their startup.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod config;
pub mod events;
pub mod markup;
pub mod page;
pub mod sequencer;
pub mod surface;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError, Document};
pub use config::{load_config, load_config_from_path, ConfigError, ConfigOverrides, SiteConfig};
pub use events::{PageEvent, PageLifecycle};
pub use page::{Bounds, Page, Viewport};
pub use sequencer::{
    start_typing_demo, CancelToken, PlaybackCursor, PlaybackSummary, Sequencer, SequencerHandle,
    Timing,
};
pub use surface::{DisplaySurface, RecordingSurface, SlotHandle, SurfaceCall};
