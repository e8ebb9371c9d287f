//! End-to-end rendering scenarios: whole documents through the public API.

use glamour::ansi::strip_ansi;
use glamour::wordwrap::wrap_with_indent;
use glamour::{
    ColorProfile, Error, LinkContext, LinkData, Renderer, Style, StyleBlock, StyleConfig, StylePrimitive, TerminalInfo,
};

fn ascii(width: usize) -> Renderer {
    Renderer::new()
        .with_style(Style::Ascii)
        .with_word_wrap(width)
        .with_color_profile(ColorProfile::Ascii)
        .with_terminal(TerminalInfo::default())
        .with_highlighter(None)
}

fn lines(out: &str) -> Vec<String> {
    strip_ansi(out).lines().map(|l| l.trim_end().to_string()).collect()
}

#[test]
fn table_renders_as_grid() {
    let out = ascii(80).render("| a | b |\n|:--|---|\n| a | b |\n| a | b |\n").unwrap();
    let grid: Vec<String> = lines(&out).into_iter().filter(|l| !l.is_empty()).collect();
    assert_eq!(
        grid,
        vec![
            "  +---+---+",
            "  | a | b |",
            "  +---+---+",
            "  | a | b |",
            "  | a | b |",
            "  +---+---+",
        ]
    );
}

#[test]
fn header_only_table_has_one_bottom_border() {
    let out = ascii(80).render("| a | b |\n|---|---|\n").unwrap();
    let grid: Vec<String> = lines(&out).into_iter().filter(|l| !l.is_empty()).collect();
    assert_eq!(grid, vec!["  +---+---+", "  | a | b |", "  +---+---+"]);
}

#[test]
fn backslash_before_punctuation_is_kept() {
    let out = ascii(80).render(r"a \\* b and C:\\path").unwrap();
    let text = lines(&out).join("\n");
    assert!(text.contains(r"a \* b and C:\path"), "{text}");
}

#[test]
fn wrapped_styled_paragraph_reopens_style_on_each_line() {
    let config = StyleConfig {
        paragraph: StyleBlock::new().style(StylePrimitive::new().color("252")),
        strong: StylePrimitive::new().bold(true),
        ..StyleConfig::default()
    };
    let out = Renderer::new()
        .with_style_config(config)
        .with_word_wrap(20)
        .with_color_profile(ColorProfile::Ansi256)
        .with_terminal(TerminalInfo::default())
        .with_highlighter(None)
        .render("**aaaa bbbb cccc dddd eeee ffff**")
        .unwrap();
    let rows: Vec<&str> = out.lines().filter(|l| !strip_ansi(l).trim().is_empty()).collect();
    assert!(rows.len() >= 2, "{out:?}");
    for row in rows {
        let plain = strip_ansi(row);
        let word = plain.split_whitespace().next().unwrap();
        let at = row.find(word).unwrap();
        assert!(row[..at].contains("\x1b[38;5;252;1m"), "{row:?}");
    }
}

#[test]
fn true_color_document_closes_styles_at_line_ends() {
    let md = "# Title\n\nSome **bold** text and `code` that runs long enough to wrap twice.\n\n> quoted\n";
    let out = Renderer::new()
        .with_style(Style::Dark)
        .with_word_wrap(30)
        .with_color_profile(ColorProfile::TrueColor)
        .with_terminal(TerminalInfo::default())
        .with_highlighter(None)
        .render(md)
        .unwrap();
    assert!(out.contains("\x1b["), "{out:?}");
    for line in out.lines() {
        assert!(glamour::ansi::visible_width(line) <= 30, "{line:?}");
        let line = line.trim_end_matches(' ');
        if line.contains("\x1b[") {
            assert!(line.ends_with("\x1b[m"), "{line:?}");
        }
    }
    let text = lines(&out).join("\n");
    assert!(text.contains("Title"), "{text}");
    assert!(text.contains("quoted"), "{text}");
}

#[test]
fn emoji_shortcodes_are_replaced() {
    let out = ascii(80).with_emoji().render("ship it :rocket:").unwrap();
    assert!(lines(&out).join("\n").contains("ship it 🚀"));
}

#[test]
fn table_links_go_through_formatter() {
    let out = ascii(80)
        .with_link_formatter(|data: &LinkData, _: &LinkContext<'_>| -> Result<String, glamour::BoxError> {
            Ok(format!("{}({})", data.text, data.is_in_table))
        })
        .render("| site |\n|------|\n| [home](https://a.io) |\n")
        .unwrap();
    let text = lines(&out).join("\n");
    assert!(text.contains("home(true)"), "{text}");
    assert!(!text.contains("[1]:"), "{text}");
}

#[test]
fn indented_wrap() {
    assert_eq!(
        wrap_with_indent("This is a long line that should wrap with proper indentation", 20, "  "),
        "This is a long line\n  that should wrap\n  with proper\n  indentation"
    );
}

#[test]
fn readme_like_document() {
    let md = "\
# Project

A tool that does *one* thing well.

## Install

```sh
cargo install project
```

## Usage

1. Run it
2. Read the output

> Note: output is plain text.
";
    let out = ascii(60).render(md).unwrap();
    let text = lines(&out).join("\n");
    assert!(text.contains("  # Project"), "{text}");
    assert!(text.contains("  A tool that does *one* thing well."));
    assert!(text.contains("cargo install project"));
    assert!(text.contains("1. Run it"));
    assert!(text.contains("2. Read the output"));
    assert!(text.contains("| Note: output is plain text."));
    let install = text.find("## Install").unwrap();
    let usage = text.find("## Usage").unwrap();
    assert!(install < text.find("cargo install").unwrap());
    assert!(text.find("cargo install").unwrap() < usage);
}

#[test]
fn table_links_listed_after_table() {
    let md = "\
| name | link |
|------|------|
| one  | [home](https://a.io) |
| two  | [home](https://b.io) |
| pic  | ![logo](https://a.io/l.png) |
";
    let out = ascii(80).render(md).unwrap();
    let text = lines(&out).join("\n");
    assert!(text.contains("home[1]"), "{text}");
    assert!(text.contains("home[2]"), "{text}");
    assert!(text.contains("[1]: home[1] https://a.io"), "{text}");
    assert!(text.contains("[2]: home[2] https://b.io"), "{text}");
    assert!(text.contains("https://a.io/l.png"), "{text}");
}

#[test]
fn base_url_resolves_links_and_images() {
    let out = ascii(80)
        .with_base_url("https://example.com/repo/")
        .render("[guide](docs/guide.md) ![shot](img/shot.png) [abs](https://other.io)")
        .unwrap();
    let text = lines(&out).join("\n");
    assert!(text.contains("guide https://example.com/repo/docs/guide.md"), "{text}");
    assert!(text.contains("https://example.com/repo/img/shot.png"), "{text}");
    assert!(text.contains("abs https://other.io"), "{text}");
}

#[test]
fn custom_formatter_sees_link_data() {
    let out = ascii(80)
        .with_link_formatter(|data: &LinkData, _: &LinkContext<'_>| -> Result<String, glamour::BoxError> {
            Ok(format!("<{}>", data.url))
        })
        .render("see [a](https://a.io) and ![b](b.png)")
        .unwrap();
    let text = lines(&out).join("\n");
    assert!(text.contains("see <https://a.io> and <b.png>"), "{text}");
}

#[test]
fn custom_style_config() {
    let config = StyleConfig {
        h1: StyleBlock::new().style(StylePrimitive::new().prefix(">> ")),
        strong: StylePrimitive::new().block_prefix("[").block_suffix("]"),
        ..StyleConfig::default()
    };
    let out = Renderer::new()
        .with_style_config(config)
        .with_terminal(TerminalInfo::default())
        .render("# Top\n\nsome **loud** words")
        .unwrap();
    let text = lines(&out).join("\n");
    assert!(text.contains(">> Top"), "{text}");
    assert!(text.contains("some [loud] words"), "{text}");
}

#[test]
fn render_to_writer() {
    let mut buf = Vec::new();
    ascii(80).render_to("hello *there*", &mut buf).unwrap();
    let out = String::from_utf8(buf).unwrap();
    assert!(out.contains("hello *there*"));
}

#[test]
fn wide_document_fits_every_width() {
    let md = "# Heading with several words\n\n".to_string()
        + &"Body text that keeps going and going. ".repeat(10)
        + "\n\n- item with words enough to wrap the line\n\n> quoted words that also need wrapping\n";
    for width in [24, 40, 72] {
        let out = ascii(width).render(&md).unwrap();
        for line in out.lines() {
            assert!(glamour::ansi::visible_width(line) <= width, "{width}: {line:?}");
        }
    }
}

#[test]
fn unknown_style_name_is_rejected() {
    assert_eq!(Style::from_name("dark"), Some(Style::Dark));
    assert_eq!(Style::from_name("neon"), None);
    let err = Error::UnknownStyle("neon".to_string());
    assert!(err.to_string().contains("neon"));
}

#[cfg(feature = "serde")]
mod style_sheets {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_json_style_sheet() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "document": {{ "margin": 1 }},
                "h1": {{ "prefix": "=> " }},
                "emph": {{ "block_prefix": "_", "block_suffix": "_" }}
            }}"#
        )
        .unwrap();

        let out = Renderer::new()
            .with_style_path(file.path())
            .unwrap()
            .with_terminal(TerminalInfo::default())
            .render("# Hi\n\nan *emphatic* word")
            .unwrap();
        let text = lines(&out).join("\n");
        assert!(text.contains(" => Hi"), "{text}");
        assert!(text.contains(" an _emphatic_ word"), "{text}");
    }

    #[test]
    fn malformed_style_sheet_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let result = Renderer::new().with_style_path(file.path());
        assert!(matches!(result, Err(Error::StyleSheet(_))));
    }

    #[test]
    fn missing_style_sheet_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Renderer::new().with_style_path(dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn built_in_styles_round_trip_through_json() {
        for style in [Style::Dark, Style::Light, Style::Ascii] {
            let config = style.config();
            let json = serde_json::to_string(&config).unwrap();
            assert_eq!(StyleConfig::from_json(&json).unwrap(), config);
        }
    }
}
