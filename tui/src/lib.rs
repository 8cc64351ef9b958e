//! EusaSpark TUI - the EusaSpark marketing page in a terminal
//!
//! This crate renders the EusaSpark single page (hero, services, projects,
//! team, contact) full-screen and wires the page behaviours from
//! `site-core` to keyboard, mouse and resize events.
//!
//! # Architecture
//!
//! - **App**: Event loop, page behaviours and frame updates
//! - **Surface**: Channel bridge from the typing sequencer to the UI
//! - **Editor**: Code window state rebuilt from sequencer commands
//! - **Render**: Page layout and drawing (header, body, menu, footer)
//! - **Form**: Keyboard editing of the contact form

pub mod app;
pub mod editor;
pub mod form;
pub mod render;
pub mod surface;
pub mod theme;

pub use app::App;
