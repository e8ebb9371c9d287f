//! Integration tests for the escape sequences glamour emits.
//!
//! Verifies that rendering produces well-formed SGR and OSC 8 sequences for
//! each color profile and built-in style, and that stripping them leaves the
//! same text the plain profile renders.

use glamour::ansi::{HYPERLINK_RESET, strip_ansi, visible_width};
use glamour::{ColorProfile, Renderer, Style, StyleConfig, StylePrimitive, TerminalInfo};

// ===========================================================================
// Helpers
// ===========================================================================

fn renderer(style: Style, profile: ColorProfile) -> Renderer {
    Renderer::new()
        .with_style(style)
        .with_color_profile(profile)
        .with_terminal(TerminalInfo::default())
        .with_highlighter(None)
}

fn render_with(md: &str, style: Style) -> String {
    renderer(style, ColorProfile::TrueColor).render(md).unwrap()
}

/// Check if output contains a specific SGR parameter.
fn contains_sgr(s: &str, code: &str) -> bool {
    let standalone = format!("\x1b[{code}m");
    let prefix = format!("\x1b[{code};");
    let suffix = format!(";{code}m");
    let middle = format!(";{code};");
    s.contains(&standalone) || s.contains(&prefix) || s.contains(&suffix) || s.contains(&middle)
}

/// Every SGR sequence in `s`, parameters only.
fn sgr_params(s: &str) -> Vec<&str> {
    s.split("\x1b[")
        .skip(1)
        .filter_map(|rest| rest.find('m').map(|end| &rest[..end]))
        .collect()
}

// ===========================================================================
// 1. Styles produce the expected attributes
// ===========================================================================

#[test]
fn dark_heading_has_ansi_codes() {
    let output = render_with("# Hello World", Style::Dark);
    assert!(output.contains('\x1b'), "Dark heading should produce ANSI: {output:?}");
    assert!(contains_sgr(&output, "1"), "heading is bold");
    assert!(strip_ansi(&output).contains(" Hello World "));
}

#[test]
fn emphasis_attributes() {
    let output = render_with("*it* **bo** ~~st~~", Style::Dark);
    assert!(contains_sgr(&output, "3"), "italic: {output:?}");
    assert!(contains_sgr(&output, "1"), "bold: {output:?}");
    assert!(contains_sgr(&output, "9"), "crossed out: {output:?}");
}

#[test]
fn link_url_is_underlined() {
    let output = render_with("[docs](https://example.com)", Style::Dark);
    assert!(contains_sgr(&output, "4"), "{output:?}");
    assert!(strip_ansi(&output).contains("docs https://example.com"));
}

#[test]
fn ascii_style_has_no_color() {
    let output = render_with("# Title\n\n**bold** `code` [l](https://x.io)\n\n---", Style::Ascii);
    for params in sgr_params(&output) {
        assert!(!params.contains("38;") && !params.contains("48;"), "{params}");
    }
}

#[test]
fn notty_output_is_plain() {
    let output = renderer(Style::NoTty, ColorProfile::TrueColor)
        .render("# Title\n\n- a\n- b\n\n> quote")
        .unwrap();
    assert!(!output.contains('\x1b'), "{output:?}");
    assert!(output.contains("* a"));
}

// ===========================================================================
// 2. Color profiles
// ===========================================================================

fn hex_styles() -> StyleConfig {
    StyleConfig {
        strong: StylePrimitive::new().color("#ff8800").background_color("#001122"),
        ..StyleConfig::default()
    }
}

fn render_profile(profile: ColorProfile) -> String {
    Renderer::new()
        .with_style_config(hex_styles())
        .with_color_profile(profile)
        .with_terminal(TerminalInfo::default())
        .render("**x**")
        .unwrap()
}

#[test]
fn truecolor_keeps_rgb() {
    let output = render_profile(ColorProfile::TrueColor);
    assert!(output.contains("38;2;255;136;0"), "{output:?}");
    assert!(output.contains("48;2;0;17;34"), "{output:?}");
}

#[test]
fn ansi256_degrades_rgb() {
    let output = render_profile(ColorProfile::Ansi256);
    assert!(output.contains("38;5;"), "{output:?}");
    assert!(!output.contains("38;2;"));
}

#[test]
fn ansi16_uses_basic_codes() {
    let output = render_profile(ColorProfile::Ansi);
    for params in sgr_params(&output) {
        assert!(!params.contains("38;") && !params.contains("48;"), "{params}");
    }
    assert!(output.contains('\x1b'));
}

#[test]
fn ascii_profile_drops_color() {
    let output = render_profile(ColorProfile::Ascii);
    assert!(!output.contains('\x1b'), "{output:?}");
    assert_eq!(output.trim(), "x");
}

#[test]
fn stripped_output_matches_across_profiles() {
    let md = "# Title\n\nSome **bold** and *italic* text.\n\n- one\n- two\n\n> quoted\n";
    for style in [Style::Dark, Style::Light, Style::Pink, Style::Dracula, Style::TokyoNight] {
        let plain = strip_ansi(&renderer(style, ColorProfile::Ascii).render(md).unwrap());
        for profile in [ColorProfile::Ansi, ColorProfile::Ansi256, ColorProfile::TrueColor] {
            let colored = renderer(style, profile).render(md).unwrap();
            assert_eq!(strip_ansi(&colored), plain, "{style:?} {profile:?}");
        }
    }
}

// ===========================================================================
// 3. Line structure
// ===========================================================================

#[test]
fn colored_lines_fit_width() {
    let text = "colored words ".repeat(30);
    for width in [30, 50, 80] {
        let output = renderer(Style::Dark, ColorProfile::TrueColor)
            .with_word_wrap(width)
            .render(&format!("**{text}**"))
            .unwrap();
        for line in output.lines() {
            assert!(visible_width(line) <= width, "{width}: {line:?}");
        }
    }
}

// ===========================================================================
// 4. Hyperlinks
// ===========================================================================

#[test]
fn hyperlink_formatter_emits_osc8() {
    let output = renderer(Style::Dark, ColorProfile::TrueColor)
        .with_hyperlinks()
        .render("[docs](https://example.com)")
        .unwrap();
    assert!(output.contains("\x1b]8;;https://example.com\x1b\\"), "{output:?}");
    assert!(output.contains(HYPERLINK_RESET));
    assert!(!strip_ansi(&output).contains("https://"));
}

#[test]
fn smart_hyperlinks_follow_terminal() {
    let md = "[docs](https://example.com)";
    let plain = renderer(Style::Dark, ColorProfile::TrueColor)
        .with_smart_hyperlinks()
        .render(md)
        .unwrap();
    assert!(!plain.contains("\x1b]8;"));
    assert!(strip_ansi(&plain).contains("docs https://example.com"));

    let linked = renderer(Style::Dark, ColorProfile::TrueColor)
        .with_smart_hyperlinks()
        .with_terminal(TerminalInfo::default().term_program("iTerm.app"))
        .render(md)
        .unwrap();
    assert!(linked.contains("\x1b]8;;https://example.com\x1b\\"));
}

#[test]
fn default_links_are_clickable_on_capable_terminals() {
    let output = renderer(Style::Dark, ColorProfile::TrueColor)
        .with_terminal(TerminalInfo::default().term_program("WezTerm"))
        .render("[docs](https://example.com)")
        .unwrap();
    assert!(output.contains("\x1b]8;id="), "{output:?}");
    assert_eq!(output.matches("\x1b]8;id=").count(), output.matches(HYPERLINK_RESET).count());
    assert!(strip_ansi(&output).contains("docs https://example.com"));
}

#[test]
fn no_hyperlinks_without_color() {
    let output = renderer(Style::Dark, ColorProfile::Ascii)
        .with_terminal(TerminalInfo::default().term_program("WezTerm"))
        .render("[docs](https://example.com)")
        .unwrap();
    assert!(!output.contains("\x1b]8;"));
}
