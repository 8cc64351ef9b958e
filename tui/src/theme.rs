//! Theme and Colors
//!
//! EusaSpark's palette: warm spark orange on a dark slate background, with
//! a One Dark flavoured set of syntax colors for the code window.

use ratatui::style::{Color, Modifier, Style};
use site_core::page::contact::BannerKind;
use site_core::page::header::HeaderStyle;

// ============================================================================
// Brand Palette
// ============================================================================

/// Spark orange (brand, accents, active nav link)
pub const SPARK_ORANGE: Color = Color::Rgb(255, 138, 61);

/// Slate used behind the solid header
pub const HEADER_SLATE: Color = Color::Rgb(30, 41, 59);

/// Body text
pub const TEXT: Color = Color::Rgb(226, 232, 240);

/// Secondary / dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 116, 139);

/// Cards that have not animated in yet
pub const HIDDEN_GRAY: Color = Color::Rgb(51, 65, 85);

/// Code window background
pub const CODE_BG: Color = Color::Rgb(40, 44, 52);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(220, 38, 38);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(22, 163, 74);

// ============================================================================
// Syntax Colors
// ============================================================================

/// `comment`
pub const SYNTAX_COMMENT: Color = Color::Rgb(92, 99, 112);

/// `keyword`
pub const SYNTAX_KEYWORD: Color = Color::Rgb(198, 120, 221);

/// `function`
pub const SYNTAX_FUNCTION: Color = Color::Rgb(97, 175, 239);

/// `number`
pub const SYNTAX_NUMBER: Color = Color::Rgb(209, 154, 102);

/// `string`
pub const SYNTAX_STRING: Color = Color::Rgb(152, 195, 121);

/// `type`
pub const SYNTAX_TYPE: Color = Color::Rgb(229, 192, 123);

/// Style for a highlight class from the code markup
#[must_use]
pub fn highlight_style(class: Option<&str>) -> Style {
    let base = Style::default().bg(CODE_BG);
    match class {
        Some("comment") => base.fg(SYNTAX_COMMENT).add_modifier(Modifier::ITALIC),
        Some("keyword") => base.fg(SYNTAX_KEYWORD),
        Some("function") => base.fg(SYNTAX_FUNCTION),
        Some("number") => base.fg(SYNTAX_NUMBER),
        Some("string") => base.fg(SYNTAX_STRING),
        Some("type") => base.fg(SYNTAX_TYPE),
        _ => base.fg(TEXT),
    }
}

/// Background treatment of the fixed header
#[must_use]
pub fn header_style(style: HeaderStyle) -> Style {
    match style {
        HeaderStyle::Solid => Style::default().bg(HEADER_SLATE).fg(TEXT),
        HeaderStyle::Translucent => Style::default().fg(TEXT).add_modifier(Modifier::DIM),
    }
}

/// Colors of the contact form banner
#[must_use]
pub fn banner_style(kind: BannerKind) -> Style {
    match kind {
        BannerKind::Success => Style::default().fg(SUCCESS_GREEN),
        BannerKind::Error => Style::default().fg(ERROR_RED),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_classes_have_colors() {
        assert_eq!(highlight_style(Some("keyword")).fg, Some(SYNTAX_KEYWORD));
        assert_eq!(highlight_style(Some("string")).fg, Some(SYNTAX_STRING));
        assert!(highlight_style(Some("comment"))
            .add_modifier
            .contains(Modifier::ITALIC));
    }

    #[test]
    fn test_unknown_class_falls_back_to_text() {
        assert_eq!(highlight_style(Some("decorator")).fg, Some(TEXT));
        assert_eq!(highlight_style(None).fg, Some(TEXT));
    }

    #[test]
    fn test_header_styles_differ() {
        assert_ne!(
            header_style(HeaderStyle::Solid),
            header_style(HeaderStyle::Translucent)
        );
    }
}
