//! Page Layout and Drawing
//!
//! The page is laid out once per frame into a tall list of lines, like a
//! document, together with the row bounds of every section and card. The
//! terminal then shows a window onto it at the current scroll offset, with
//! the fixed header drawn over the top rows.
//!
//! ```text
//! ┌ header (fixed, overlays content) ─────────────────────┐
//! │ EusaSpark                 Inicio  Servicios  Contacto │
//! ├───────────────────────────────────────────────────────┤
//! │ page lines [scroll .. scroll + height]                │
//! ├───────────────────────────────────────────────────────┤
//! │ status / key hints                                    │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! Layout never depends on animation state, so section and card bounds stay
//! put while cards reveal.

use std::collections::{HashMap, HashSet};

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use site_core::page::contact::{ContactController, FormStatus};
use site_core::page::header::HeaderStyle;
use site_core::page::navigation::{Navigation, SectionBounds};
use site_core::page::{Bounds, Card, Page, SectionKind};
use unicode_width::UnicodeWidthStr;

use crate::editor::EditorState;
use crate::form::{display_value, FormField};
use crate::theme;

/// Rows covered by the fixed header
pub const HEADER_HEIGHT: u16 = 2;

/// Rows used by the status line
pub const FOOTER_HEIGHT: u16 = 1;

/// Label of the collapsed-navigation button
pub const MENU_BUTTON: &str = "[≡ Menú]";

const MAX_CONTENT_WIDTH: u16 = 100;
const MENU_WIDTH: u16 = 22;
const NAV_GAP: u16 = 3;
const MESSAGE_ROWS: usize = 3;

/// Everything the page layout reads
#[derive(Debug)]
pub struct PageView<'a> {
    /// Page content
    pub page: &'a Page,
    /// Code window contents
    pub editor: &'a EditorState,
    /// Rows reserved for code lines (the longest document)
    pub code_rows: usize,
    /// Card ids that have animated in
    pub shown: &'a HashSet<String>,
    /// Contact form state
    pub contact: &'a ContactController,
    /// Focused form control, if the form has focus
    pub focused_field: Option<FormField>,
}

/// The page flattened into lines plus element geometry
#[derive(Debug, Default)]
pub struct PageLayout {
    /// Rendered page rows
    pub lines: Vec<Line<'static>>,
    /// Section bounds in document order
    pub sections: Vec<SectionBounds>,
    /// Card bounds by id
    pub cards: HashMap<String, Bounds>,
    /// First row of the contact form
    pub form_top: u32,
}

impl PageLayout {
    /// Total number of rows
    #[must_use]
    pub fn height(&self) -> u32 {
        u32::try_from(self.lines.len()).unwrap_or(u32::MAX)
    }

    /// Bounds of the section with anchor `id`
    #[must_use]
    pub fn section_bounds(&self, id: &str) -> Option<Bounds> {
        self.sections.iter().find(|s| s.id == id).map(|s| s.bounds)
    }

    fn row(&self) -> u32 {
        self.height()
    }

    fn push(&mut self, line: Line<'static>) {
        self.lines.push(line);
    }

    fn blank(&mut self) {
        self.lines.push(Line::default());
    }
}

/// Lay the page out for a terminal `width` columns wide
#[must_use]
pub fn layout_page(view: &PageView<'_>, width: u16) -> PageLayout {
    let content_width = width.saturating_sub(4).clamp(10, MAX_CONTENT_WIDTH) as usize;
    let mut layout = PageLayout::default();

    for section in &view.page.sections {
        let top = layout.row();
        match &section.kind {
            SectionKind::Hero {
                tagline,
                code_window,
            } => {
                for _ in 0..HEADER_HEIGHT {
                    layout.blank();
                }
                layout.push(Line::from(Span::styled(
                    format!("  {}", section.title),
                    Style::default()
                        .fg(theme::SPARK_ORANGE)
                        .add_modifier(Modifier::BOLD),
                )));
                for line in textwrap::wrap(tagline, content_width) {
                    layout.push(Line::from(Span::styled(
                        format!("  {line}"),
                        Style::default().fg(theme::TEXT),
                    )));
                }
                layout.blank();
                if *code_window {
                    push_code_window(&mut layout, view, content_width);
                }
            }
            SectionKind::Cards => {
                push_section_title(&mut layout, &section.title);
                for card in &section.cards {
                    push_card(&mut layout, card, view.shown, content_width);
                }
            }
            SectionKind::Contact => {
                push_section_title(&mut layout, &section.title);
                for card in &section.cards {
                    push_card(&mut layout, card, view.shown, content_width);
                }
                layout.form_top = layout.row();
                push_contact_form(&mut layout, view, content_width);
            }
        }
        layout.blank();

        let height = layout.row() - top;
        layout
            .sections
            .push(SectionBounds::new(section.id.clone(), top, height));
    }

    layout.push(Line::from(Span::styled(
        format!("  © {}. Todos los derechos reservados.", view.page.brand),
        Style::default().fg(theme::DIM_GRAY),
    )));
    layout
}

fn push_section_title(layout: &mut PageLayout, title: &str) {
    for _ in 0..HEADER_HEIGHT {
        layout.blank();
    }
    layout.push(Line::from(Span::styled(
        format!("  ── {title} ──"),
        Style::default()
            .fg(theme::SPARK_ORANGE)
            .add_modifier(Modifier::BOLD),
    )));
    layout.blank();
}

fn push_card(layout: &mut PageLayout, card: &Card, shown: &HashSet<String>, width: usize) {
    let top = layout.row();
    let visible = shown.contains(&card.id);
    let (title_style, body_style) = if visible {
        (
            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
            Style::default().fg(theme::DIM_GRAY),
        )
    } else {
        let hidden = Style::default().fg(theme::HIDDEN_GRAY);
        (hidden, hidden)
    };

    layout.push(Line::from(Span::styled(
        format!("  ▸ {}", card.title),
        title_style,
    )));
    for line in textwrap::wrap(&card.body, width.saturating_sub(4).max(10)) {
        layout.push(Line::from(Span::styled(format!("    {line}"), body_style)));
    }
    let height = layout.row() - top;
    layout.cards.insert(card.id.clone(), Bounds::new(top, height));
    layout.blank();
}

fn push_code_window(layout: &mut PageLayout, view: &PageView<'_>, width: usize) {
    let border = Style::default().fg(theme::DIM_GRAY);
    let tab = format!("╭─ {} ", view.editor.tab_label());
    let fill = width.saturating_sub(tab.width() + 1);
    layout.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(tab, border),
        Span::styled("─".repeat(fill), border),
        Span::styled("╮", border),
    ]));

    let highlighted = view.editor.highlighted();
    let gutter = view.editor.gutter();
    for row in 0..view.code_rows.max(gutter) {
        let number = if row < gutter {
            format!("{:>3}", row + 1)
        } else {
            "   ".to_string()
        };
        let mut spans = vec![
            Span::raw("  "),
            Span::styled("│", border),
            Span::styled(number, Style::default().fg(theme::DIM_GRAY).bg(theme::CODE_BG)),
            Span::styled(" ", theme::highlight_style(None)),
        ];
        if let Some(segments) = highlighted.get(row) {
            spans.extend(segments.iter().map(|segment| {
                Span::styled(
                    segment.text.clone(),
                    theme::highlight_style(segment.class.as_deref()),
                )
            }));
        }
        layout.push(Line::from(spans));
    }

    layout.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format!("╰{}╯", "─".repeat(width.saturating_sub(2))),
            border,
        ),
    ]));
}

fn push_contact_form(layout: &mut PageLayout, view: &PageView<'_>, width: usize) {
    if let Some(banner) = view.contact.banner() {
        let style = theme::banner_style(banner.kind).add_modifier(Modifier::BOLD);
        for line in banner.text.lines() {
            layout.push(Line::from(Span::styled(format!("  {line}"), style)));
        }
        layout.blank();
    }

    let form = view.contact.form();
    for field in FormField::ALL {
        let focused = view.focused_field == Some(field);
        let marker = if focused { "›" } else { " " };
        let label_style = if focused {
            Style::default()
                .fg(theme::SPARK_ORANGE)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme::TEXT)
        };

        match field {
            FormField::Submit => {
                let label = match view.contact.status() {
                    FormStatus::Editing => field.label(),
                    FormStatus::Submitting => "Enviando...",
                };
                let mut style = Style::default().fg(theme::SPARK_ORANGE);
                if focused {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                layout.push(Line::from(vec![
                    Span::styled(format!("{marker} "), label_style),
                    Span::styled(format!("[ {label} ]"), style),
                ]));
            }
            FormField::Message => {
                layout.push(Line::from(Span::styled(
                    format!("{marker} {}:", field.label()),
                    label_style,
                )));
                let value = display_value(form, field);
                let wrapped = textwrap::wrap(&value, width.saturating_sub(6).max(10));
                for row in 0..MESSAGE_ROWS {
                    let text = wrapped.get(row).map_or("", |l| &**l);
                    layout.push(Line::from(Span::styled(
                        format!("    │ {text}"),
                        Style::default().fg(theme::TEXT),
                    )));
                }
            }
            _ => {
                let value = display_value(form, field);
                let cursor = if focused && field != FormField::Service {
                    "▏"
                } else {
                    ""
                };
                layout.push(Line::from(vec![
                    Span::styled(format!("{marker} {:<9}", format!("{}:", field.label())), label_style),
                    Span::styled(format!("{value}{cursor}"), Style::default().fg(theme::TEXT)),
                ]));
            }
        }
    }
}

// ============================================================================
// Header Geometry
// ============================================================================

/// Column ranges `[start, end)` of each nav link in the header
#[must_use]
pub fn nav_link_ranges(nav: &Navigation, width: u16) -> Vec<(u16, u16)> {
    let widths: Vec<u16> = nav
        .links()
        .iter()
        .map(|l| u16::try_from(l.label.width()).unwrap_or(u16::MAX))
        .collect();
    let gaps = NAV_GAP.saturating_mul(u16::try_from(widths.len().saturating_sub(1)).unwrap_or(0));
    let total = widths.iter().fold(gaps, |acc, w| acc.saturating_add(*w));

    let mut x = width.saturating_sub(total.saturating_add(1));
    widths
        .into_iter()
        .map(|w| {
            let range = (x, x.saturating_add(w));
            x = x.saturating_add(w + NAV_GAP);
            range
        })
        .collect()
}

/// Column range `[start, end)` of the menu button
#[must_use]
pub fn menu_button_range(width: u16) -> (u16, u16) {
    let w = u16::try_from(MENU_BUTTON.width()).unwrap_or(u16::MAX);
    let start = width.saturating_sub(w + 1);
    (start, start + w)
}

/// Area of the open mobile menu panel
#[must_use]
pub fn menu_rect(area: Rect, links: usize) -> Rect {
    let width = MENU_WIDTH.min(area.width);
    let height = (u16::try_from(links).unwrap_or(0) + 2)
        .min(area.height.saturating_sub(HEADER_HEIGHT));
    Rect::new(area.x + area.width - width, area.y + HEADER_HEIGHT, width, height)
}

// ============================================================================
// Drawing
// ============================================================================

/// State drawn around the page body
#[derive(Debug)]
pub struct Chrome<'a> {
    /// Brand in the header
    pub brand: &'a str,
    /// Nav links with active/focused state
    pub nav: &'a Navigation,
    /// Header treatment for the current scroll
    pub header: HeaderStyle,
    /// Whether the layout is collapsed
    pub mobile: bool,
    /// Whether the mobile menu panel is open
    pub menu_open: bool,
    /// Status line text
    pub status: &'a str,
}

/// Draw one frame
pub fn draw(frame: &mut Frame<'_>, layout: &PageLayout, scroll: u32, chrome: &Chrome<'_>) {
    let area = frame.area();
    let body = Rect::new(
        area.x,
        area.y,
        area.width,
        area.height.saturating_sub(FOOTER_HEIGHT),
    );

    let start = (scroll as usize).min(layout.lines.len());
    let end = (start + body.height as usize).min(layout.lines.len());
    frame.render_widget(Paragraph::new(layout.lines[start..end].to_vec()), body);

    draw_header(frame, Rect::new(area.x, area.y, area.width, HEADER_HEIGHT.min(body.height)), chrome);

    if chrome.mobile && chrome.menu_open {
        draw_menu(frame, menu_rect(body, chrome.nav.links().len()), chrome.nav);
    }

    let footer = Rect::new(
        area.x,
        area.y + area.height.saturating_sub(FOOTER_HEIGHT),
        area.width,
        FOOTER_HEIGHT.min(area.height),
    );
    frame.render_widget(
        Paragraph::new(Span::styled(chrome.status, Style::default().fg(theme::DIM_GRAY))),
        footer,
    );
}

fn link_style(nav: &Navigation, index: usize) -> Style {
    let mut style = Style::default().fg(theme::TEXT);
    if nav.active() == Some(index) {
        style = style
            .fg(theme::SPARK_ORANGE)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    if nav.focused() == Some(index) {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn draw_header(frame: &mut Frame<'_>, area: Rect, chrome: &Chrome<'_>) {
    // A translucent header leaves the page visible underneath.
    if chrome.header == HeaderStyle::Solid {
        frame.render_widget(Clear, area);
    }
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(theme::DIM_GRAY))
        .style(theme::header_style(chrome.header));
    frame.render_widget(block, area);

    let row = Rect::new(area.x, area.y, area.width, 1);
    let brand = Span::styled(
        format!(" {}", chrome.brand),
        Style::default()
            .fg(theme::SPARK_ORANGE)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(Paragraph::new(brand), row);

    if chrome.mobile {
        let (start, end) = menu_button_range(area.width);
        let style = if chrome.menu_open {
            Style::default().fg(theme::SPARK_ORANGE)
        } else {
            Style::default().fg(theme::TEXT)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(MENU_BUTTON, style)),
            Rect::new(area.x + start, area.y, end - start, 1),
        );
    } else {
        for (index, (start, end)) in nav_link_ranges(chrome.nav, area.width).into_iter().enumerate() {
            let Some(link) = chrome.nav.links().get(index) else {
                continue;
            };
            if end > area.width {
                continue;
            }
            frame.render_widget(
                Paragraph::new(Span::styled(link.label.clone(), link_style(chrome.nav, index))),
                Rect::new(area.x + start, area.y, end - start, 1),
            );
        }
    }
}

fn draw_menu(frame: &mut Frame<'_>, area: Rect, nav: &Navigation) {
    frame.render_widget(Clear, area);
    let lines: Vec<Line<'static>> = nav
        .links()
        .iter()
        .enumerate()
        .map(|(index, link)| Line::from(Span::styled(format!(" {}", link.label), link_style(nav, index))))
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::SPARK_ORANGE))
                .style(Style::default().bg(theme::HEADER_SLATE)),
        ),
        area,
    );
}
