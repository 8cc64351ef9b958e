//! Main Application
//!
//! The App is a thin surface over `site-core`:
//! - Event loop (keyboard, mouse, resize)
//! - Page behaviours advanced with frame deltas
//! - Code window fed by the typing sequencer over a channel
//!
//! # Event Flow
//!
//! ```text
//! Terminal Events ─► page state machines ─┐
//! Sequencer task ─► EditorCommand ─► EditorState ─┼─► layout ─► draw
//! Frame tick ─► update(delta) ────────────┘
//! ```

use std::collections::HashSet;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, EventStream, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Position, Rect};
use ratatui::Terminal;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use site_core::catalog::Document;
use site_core::page::contact::{ContactController, SubmitOutcome};
use site_core::page::debounce::Debouncer;
use site_core::page::header::HeaderStyle;
use site_core::page::menu::{is_mobile, ClickTarget, MobileMenu};
use site_core::page::navigation::{scroll_target, Navigation};
use site_core::page::reveal::RevealObserver;
use site_core::page::scroll::{SmoothScroll, DEFAULT_SCROLL_DURATION};
use site_core::{
    start_typing_demo, Catalog, Page, PageEvent, PageLifecycle, SequencerHandle, SiteConfig,
    Viewport,
};

use crate::editor::EditorState;
use crate::form::{self, FieldInput, FormField};
use crate::render::{self, Chrome, PageLayout, PageView, FOOTER_HEIGHT, HEADER_HEIGHT};
use crate::surface::{ChannelSurface, EditorCommand};

/// Frame period for animations (~30 FPS)
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Rows moved per arrow key / wheel notch
const SCROLL_STEP: i64 = 3;

const PAGE_HINTS: &str =
    " Tab navegar · Enter ir · 1-5 secciones · m menú · f contacto · ↑↓ PgUp PgDn desplazar · q salir";
const FORM_HINTS: &str =
    " Tab/↑↓ campo · ←→ servicio · Enter siguiente/enviar · Esc salir del formulario";

/// Where keyboard input goes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    /// Scrolling and shortcuts
    Page,
    /// A header nav link
    Nav,
    /// A contact form control
    Form(FormField),
}

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    config: SiteConfig,
    page: Page,
    catalog: Catalog,
    lifecycle: PageLifecycle,

    // === Page Behaviours ===
    navigation: Navigation,
    menu: MobileMenu,
    contact: ContactController,
    fade_in: Option<RevealObserver>,
    sticky: Option<RevealObserver>,
    resize: Debouncer<(u16, u16)>,
    smooth: Option<SmoothScroll>,
    focus: Focus,

    // === Typing Demo ===
    editor: EditorState,
    editor_rx: mpsc::UnboundedReceiver<EditorCommand>,
    /// Handed to the sequencer on `Ready`
    surface: Option<ChannelSurface>,
    typing: Option<SequencerHandle>,

    // === Layout ===
    /// First visible page row
    scroll: u32,
    layout: PageLayout,
    /// Card ids whose entrance animation has run
    shown: HashSet<String>,
    /// Rows reserved in the code window
    code_rows: usize,
    /// Terminal size
    size: (u16, u16),
}

impl App {
    /// Create a new App instance
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate (for example a catalog
    /// with no documents, or typing with a zero document pause).
    pub fn new(config: SiteConfig, size: (u16, u16)) -> anyhow::Result<Self> {
        config.validate()?;
        let catalog = config.catalog()?;
        let page = Page::eusaspark();
        let (surface, editor_rx) = ChannelSurface::new();
        let code_rows = catalog.iter().map(Document::line_count).max().unwrap_or(0);

        Ok(Self {
            running: true,
            navigation: Navigation::for_page(&page),
            menu: MobileMenu::new(),
            contact: ContactController::new(config.submit_delay, config.message_ttl),
            fade_in: None,
            sticky: None,
            resize: Debouncer::new(config.resize_debounce),
            smooth: None,
            focus: Focus::Page,
            editor: EditorState::new(),
            editor_rx,
            surface: Some(surface),
            typing: None,
            scroll: 0,
            layout: PageLayout::default(),
            shown: HashSet::new(),
            code_rows,
            size,
            lifecycle: PageLifecycle::new(),
            catalog,
            page,
            config,
        })
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_tick = tokio::time::interval(FRAME_DURATION);
        frame_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_frame = Instant::now();

        // Behaviours start before the first frame; late ones once it is drawn.
        self.fire(PageEvent::Ready);
        self.update(Duration::ZERO);
        self.render(terminal)?;
        self.fire(PageEvent::Loaded);

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                        None => {
                            tracing::info!("Terminal event stream closed");
                            self.running = false;
                        }
                    }
                }

                // Code window updates from the typing task
                Some(command) = self.editor_rx.recv() => self.editor.apply(command),

                // Frame tick for animations and timers
                _ = frame_tick.tick() => {}
            }

            self.drain_editor();

            let now = Instant::now();
            self.update(now - last_frame);
            last_frame = now;

            self.render(terminal)?;
        }

        self.shutdown().await;
        Ok(())
    }

    /// Deliver page lifecycle notifications and start what they gate
    fn fire(&mut self, event: PageEvent) {
        for fired in self.lifecycle.fire(event) {
            match fired {
                PageEvent::Ready => {
                    self.fade_in = Some(RevealObserver::fade_in_up(&self.page));
                    self.start_typing();
                }
                PageEvent::Loaded => {
                    self.sticky = Some(RevealObserver::sticky(&self.page));
                }
            }
        }
    }

    fn start_typing(&mut self) {
        if !self.config.typing_enabled {
            tracing::info!("Typing demo disabled by configuration");
            return;
        }
        let has_window = self.page.has_code_window();
        let surface = self.surface.take().filter(|_| has_window);
        self.typing = start_typing_demo(surface, self.catalog.clone(), self.config.timing);
    }

    /// Stop the typing task and wait for it to exit
    async fn shutdown(&mut self) {
        if let Some(handle) = self.typing.take() {
            if let Some(summary) = handle.stop().await {
                tracing::info!(
                    documents_completed = summary.documents_completed,
                    "Typing demo shut down"
                );
            }
        }
    }

    /// Apply every queued code window update
    fn drain_editor(&mut self) {
        while let Ok(command) = self.editor_rx.try_recv() {
            self.editor.apply(command);
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(w, h) => self.handle_resize(w, h),
            _ => {}
        }
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: event::KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        if let Focus::Form(field) = self.focus {
            if self.handle_form_key(field, key) {
                return;
            }
        }

        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Esc => {
                self.menu.close();
                self.navigation.blur();
                self.focus = Focus::Page;
            }
            KeyCode::Tab => {
                self.navigation.focus_next();
                self.focus = Focus::Nav;
            }
            KeyCode::BackTab => {
                self.navigation.focus_prev();
                self.focus = Focus::Nav;
            }
            KeyCode::Enter if self.focus == Focus::Nav => {
                if let Some(target) = self.navigation.activate_focused().map(str::to_string) {
                    self.go_to(&target);
                }
            }
            KeyCode::Char('m') => self.menu.handle_click(ClickTarget::MenuButton),
            KeyCode::Char('f') => self.focus_form(),
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = (c as usize) - ('1' as usize);
                self.activate_link(index);
            }
            KeyCode::Up => self.scroll_by(-1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll_by(-i64::from(self.body_height() / 2)),
            KeyCode::PageDown => self.scroll_by(i64::from(self.body_height() / 2)),
            KeyCode::Home => self.scroll_by(-i64::from(self.scroll)),
            KeyCode::End => self.scroll_by(i64::from(self.max_scroll())),
            _ => {}
        }
    }

    /// Keys while a form control has focus; returns whether it was consumed
    fn handle_form_key(&mut self, field: FormField, key: event::KeyEvent) -> bool {
        let input = match key.code {
            KeyCode::Esc => {
                self.focus = Focus::Page;
                return true;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = Focus::Form(field.next());
                return true;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = Focus::Form(field.prev());
                return true;
            }
            KeyCode::Enter if field == FormField::Submit => {
                self.submit_contact();
                return true;
            }
            KeyCode::Enter => {
                self.focus = Focus::Form(field.next());
                return true;
            }
            KeyCode::Char(c) => FieldInput::Char(c),
            KeyCode::Backspace => FieldInput::Backspace,
            KeyCode::Left => FieldInput::Left,
            KeyCode::Right => FieldInput::Right,
            _ => return false,
        };

        if let Some(contact_form) = self.contact.form_mut() {
            form::edit(contact_form, field, input);
        }
        true
    }

    fn submit_contact(&mut self) {
        match self.contact.submit() {
            SubmitOutcome::Accepted => tracing::debug!("Contact form accepted"),
            SubmitOutcome::Rejected(errors) => {
                tracing::debug!(errors = errors.len(), "Contact form rejected");
            }
            SubmitOutcome::Busy => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: event::MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_by(-SCROLL_STEP),
            MouseEventKind::ScrollDown => self.scroll_by(SCROLL_STEP),
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(mouse.column, mouse.row),
            _ => {}
        }
    }

    fn handle_click(&mut self, x: u16, y: u16) {
        let mobile = self.is_mobile();
        let position = Position::new(x, y);

        if mobile && self.menu.is_open() {
            let body = Rect::new(0, 0, self.size.0, self.body_height());
            let panel = render::menu_rect(body, self.navigation.links().len());
            if panel.contains(position) {
                self.menu.handle_click(ClickTarget::Navigation);
                if y > panel.y && y + 1 < panel.bottom() {
                    self.activate_link(usize::from(y - panel.y - 1));
                }
                return;
            }
        }

        if y == 0 {
            if mobile {
                let (start, end) = render::menu_button_range(self.size.0);
                if (start..end).contains(&x) {
                    self.menu.handle_click(ClickTarget::MenuButton);
                    return;
                }
            } else if let Some(index) = render::nav_link_ranges(&self.navigation, self.size.0)
                .iter()
                .position(|(start, end)| (*start..*end).contains(&x))
            {
                self.activate_link(index);
                return;
            }
        }

        self.menu.handle_click(ClickTarget::Elsewhere);
    }

    /// Handle terminal resize
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.resize.trigger((width, height));
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    fn activate_link(&mut self, index: usize) {
        if let Some(target) = self.navigation.activate(index).map(str::to_string) {
            self.go_to(&target);
        }
    }

    /// Smooth-scroll so section `id` sits just below the header
    fn go_to(&mut self, id: &str) {
        self.menu.close();
        let Some(bounds) = self.layout.section_bounds(id) else {
            tracing::debug!(section = id, "Unknown section");
            return;
        };
        let target = scroll_target(&bounds, u32::from(HEADER_HEIGHT)).min(self.max_scroll());
        self.smooth = Some(SmoothScroll::new(self.scroll, target, DEFAULT_SCROLL_DURATION));
    }

    fn focus_form(&mut self) {
        self.navigation.blur();
        self.focus = Focus::Form(FormField::Name);
        let target = self
            .layout
            .form_top
            .saturating_sub(u32::from(HEADER_HEIGHT))
            .min(self.max_scroll());
        self.smooth = Some(SmoothScroll::new(self.scroll, target, DEFAULT_SCROLL_DURATION));
    }

    fn scroll_by(&mut self, delta: i64) {
        self.smooth = None;
        let next = (i64::from(self.scroll) + delta).clamp(0, i64::from(self.max_scroll()));
        self.scroll = u32::try_from(next).unwrap_or(0);
    }

    fn body_height(&self) -> u16 {
        self.size.1.saturating_sub(FOOTER_HEIGHT)
    }

    fn max_scroll(&self) -> u32 {
        self.layout
            .height()
            .saturating_sub(u32::from(self.body_height()))
    }

    fn is_mobile(&self) -> bool {
        is_mobile(self.size.0, self.config.mobile_breakpoint)
    }

    // ========================================================================
    // Frame Update
    // ========================================================================

    /// Advance timers and animations by `delta`
    fn update(&mut self, delta: Duration) {
        if let Some((width, height)) = self.resize.update(delta) {
            tracing::debug!(width, height, "Resize settled");
            self.menu.handle_resize(width, self.config.mobile_breakpoint);
        }
        self.contact.update(delta);
        self.relayout();

        if let Some(smooth) = self.smooth.as_mut() {
            self.scroll = smooth.update(delta);
        }
        if self.smooth.is_some_and(|s| s.is_finished()) {
            self.smooth = None;
        }
        self.scroll = self.scroll.min(self.max_scroll());

        self.observe();
        self.navigation.sync_with_scroll(
            &self.layout.sections,
            self.scroll,
            u32::from(HEADER_HEIGHT),
            self.config.spy_lead,
        );
    }

    /// Run the entrance-animation observers against the viewport
    fn observe(&mut self) {
        let viewport = Viewport::new(self.scroll, u32::from(self.body_height()));
        let cards = &self.layout.cards;
        if let Some(observer) = self.fade_in.as_mut() {
            observer.update(viewport, |id| cards.get(id).copied());
        }
        if let Some(observer) = self.sticky.as_mut() {
            observer.update(viewport, |id| cards.get(id).copied());
        }

        let fade_in = self.fade_in.as_ref();
        let sticky = self.sticky.as_ref();
        self.shown = self
            .page
            .cards()
            .filter(|card| fade_in.is_some_and(|o| o.is_revealed(&card.id)))
            .filter(|card| !card.reveal || sticky.is_some_and(|o| o.is_revealed(&card.id)))
            .map(|card| card.id.clone())
            .collect();
    }

    fn relayout(&mut self) {
        let focused_field = match self.focus {
            Focus::Form(field) => Some(field),
            Focus::Page | Focus::Nav => None,
        };
        let view = PageView {
            page: &self.page,
            editor: &self.editor,
            code_rows: self.code_rows,
            shown: &self.shown,
            contact: &self.contact,
            focused_field,
        };
        self.layout = render::layout_page(&view, self.size.0);
    }

    fn render<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        self.relayout();

        let status = match self.focus {
            Focus::Form(_) => FORM_HINTS,
            Focus::Page | Focus::Nav => PAGE_HINTS,
        };
        let chrome = Chrome {
            brand: &self.page.brand,
            nav: &self.navigation,
            header: HeaderStyle::for_scroll(self.scroll, self.config.header_threshold),
            mobile: self.is_mobile(),
            menu_open: self.menu.is_open(),
            status,
        };
        let layout = &self.layout;
        let scroll = self.scroll;
        terminal.draw(|frame| render::draw(frame, layout, scroll, &chrome))?;
        Ok(())
    }
}
