//! Built-in style sheets.

use std::collections::HashMap;
use std::io::IsTerminal;

use crate::style::{
    DEFAULT_LIST_LEVEL_INDENT, StyleBlock, StyleChroma, StyleCodeBlock, StyleConfig, StyleList, StylePrimitive,
    StyleTable, StyleTask,
};

const DEFAULT_MARGIN: usize = 2;
const DEFAULT_LIST_INDENT: usize = 2;

/// Available built-in styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    /// ASCII-only style (no special characters).
    Ascii,
    /// Dark terminal style (default).
    #[default]
    Dark,
    /// Dracula palette.
    Dracula,
    /// Light terminal style.
    Light,
    /// Pink accent style.
    Pink,
    /// Tokyo Night palette.
    TokyoNight,
    /// Plain style for output that is not a terminal.
    NoTty,
    /// [`Style::Dark`] on a terminal, [`Style::NoTty`] otherwise.
    Auto,
}

impl Style {
    /// Gets the style configuration for this style.
    pub fn config(self) -> StyleConfig {
        match self {
            Self::Ascii => ascii_style(),
            Self::Dark => dark_style(),
            Self::Dracula => dracula_style(),
            Self::Light => light_style(),
            Self::Pink => pink_style(),
            Self::TokyoNight => tokyo_night_style(),
            Self::NoTty => notty_style(),
            Self::Auto => {
                if std::io::stdout().is_terminal() {
                    dark_style()
                } else {
                    notty_style()
                }
            }
        }
    }

    /// Looks a style up by its configuration name (`"dark"`, `"tokyo-night"`, ...).
    ///
    /// ```rust
    /// use glamour::Style;
    ///
    /// assert_eq!(Style::from_name("dracula"), Some(Style::Dracula));
    /// assert_eq!(Style::from_name("TOKYO-NIGHT"), Some(Style::TokyoNight));
    /// assert_eq!(Style::from_name("neon"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        available_styles().get(name.trim().to_lowercase().as_str()).copied()
    }
}

/// Available style names for configuration.
pub fn available_styles() -> HashMap<&'static str, Style> {
    HashMap::from([
        ("ascii", Style::Ascii),
        ("dark", Style::Dark),
        ("dracula", Style::Dracula),
        ("light", Style::Light),
        ("pink", Style::Pink),
        ("tokyo-night", Style::TokyoNight),
        ("notty", Style::NoTty),
        ("auto", Style::Auto),
    ])
}

fn headings(prefixes: [&str; 6]) -> [StyleBlock; 6] {
    prefixes.map(|p| StyleBlock::new().style(StylePrimitive::new().prefix(p)))
}

/// Creates the ASCII style configuration.
pub fn ascii_style() -> StyleConfig {
    let [h1, h2, h3, h4, h5, h6] = headings(["# ", "## ", "### ", "#### ", "##### ", "###### "]);
    StyleConfig {
        document: StyleBlock::new()
            .style(StylePrimitive::new().block_prefix("\n").block_suffix("\n"))
            .margin(DEFAULT_MARGIN),
        block_quote: StyleBlock::new().indent(1).indent_token("| "),
        list: StyleList::new().level_indent(DEFAULT_LIST_LEVEL_INDENT),
        heading: StyleBlock::new().style(StylePrimitive::new().block_suffix("\n")),
        h1,
        h2,
        h3,
        h4,
        h5,
        h6,
        strikethrough: StylePrimitive::new().block_prefix("~~").block_suffix("~~"),
        emph: StylePrimitive::new().block_prefix("*").block_suffix("*"),
        strong: StylePrimitive::new().block_prefix("**").block_suffix("**"),
        horizontal_rule: StylePrimitive::new().format("\n--------\n"),
        item: StylePrimitive::new().block_prefix("• "),
        enumeration: StylePrimitive::new().block_prefix(". "),
        task: StyleTask::new().ticked("[x] ").unticked("[ ] "),
        image_text: StylePrimitive::new().format("Image: {{.text}} ->"),
        code: StyleBlock::new().style(StylePrimitive::new().block_prefix("`").block_suffix("`")),
        code_block: StyleCodeBlock::new().block(StyleBlock::new().margin(DEFAULT_MARGIN)),
        table: StyleTable::new().separators("+", "|", "-"),
        definition_description: StylePrimitive::new().block_prefix("\n* "),
        ..StyleConfig::default()
    }
}

/// Creates the style used when output is not a terminal.
pub fn notty_style() -> StyleConfig {
    StyleConfig {
        item: StylePrimitive::new().block_prefix("* "),
        ..ascii_style()
    }
}

/// Creates the dark style configuration.
pub fn dark_style() -> StyleConfig {
    let [_, h2, h3, h4, h5, h6] = headings(["", "## ", "### ", "#### ", "##### ", "###### "]);
    StyleConfig {
        document: StyleBlock::new()
            .style(
                StylePrimitive::new()
                    .block_prefix("\n")
                    .block_suffix("\n")
                    .color("252"),
            )
            .margin(DEFAULT_MARGIN),
        block_quote: StyleBlock::new().indent(1).indent_token("│ "),
        list: StyleList::new().level_indent(DEFAULT_LIST_INDENT),
        heading: StyleBlock::new().style(StylePrimitive::new().block_suffix("\n").color("39").bold(true)),
        h1: StyleBlock::new().style(
            StylePrimitive::new()
                .prefix(" ")
                .suffix(" ")
                .color("228")
                .background_color("63")
                .bold(true),
        ),
        h2,
        h3,
        h4,
        h5,
        h6: StyleBlock {
            style: h6.style.color("35").bold(false),
            ..h6
        },
        strikethrough: StylePrimitive::new().crossed_out(true),
        emph: StylePrimitive::new().italic(true),
        strong: StylePrimitive::new().bold(true),
        horizontal_rule: StylePrimitive::new().color("240").format("\n--------\n"),
        item: StylePrimitive::new().block_prefix("• "),
        enumeration: StylePrimitive::new().block_prefix(". "),
        task: StyleTask::new().ticked("[✓] ").unticked("[ ] "),
        link: StylePrimitive::new().color("30").underline(true),
        link_text: StylePrimitive::new().color("35").bold(true),
        image: StylePrimitive::new().color("212").underline(true),
        image_text: StylePrimitive::new().color("243").format("Image: {{.text}} →"),
        code: StyleBlock::new().style(
            StylePrimitive::new()
                .prefix(" ")
                .suffix(" ")
                .color("203")
                .background_color("236"),
        ),
        code_block: StyleCodeBlock::new()
            .block(
                StyleBlock::new()
                    .style(StylePrimitive::new().color("244"))
                    .margin(DEFAULT_MARGIN),
            )
            .theme("charm")
            .chroma(dark_palette()),
        table: StyleTable::new().separators("┼", "│", "─"),
        definition_description: StylePrimitive::new().block_prefix("\n→ "),
        ..StyleConfig::default()
    }
}

/// Creates the light style configuration.
pub fn light_style() -> StyleConfig {
    let [_, h2, h3, h4, h5, h6] = headings(["", "## ", "### ", "#### ", "##### ", "###### "]);
    StyleConfig {
        document: StyleBlock::new()
            .style(
                StylePrimitive::new()
                    .block_prefix("\n")
                    .block_suffix("\n")
                    .color("234"),
            )
            .margin(DEFAULT_MARGIN),
        block_quote: StyleBlock::new().indent(1).indent_token("│ "),
        list: StyleList::new().level_indent(DEFAULT_LIST_INDENT),
        heading: StyleBlock::new().style(StylePrimitive::new().block_suffix("\n").color("27").bold(true)),
        h1: StyleBlock::new().style(
            StylePrimitive::new()
                .prefix(" ")
                .suffix(" ")
                .color("228")
                .background_color("63")
                .bold(true),
        ),
        h2,
        h3,
        h4,
        h5,
        h6: StyleBlock {
            style: h6.style.bold(false),
            ..h6
        },
        strikethrough: StylePrimitive::new().crossed_out(true),
        emph: StylePrimitive::new().italic(true),
        strong: StylePrimitive::new().bold(true),
        horizontal_rule: StylePrimitive::new().color("249").format("\n--------\n"),
        item: StylePrimitive::new().block_prefix("• "),
        enumeration: StylePrimitive::new().block_prefix(". "),
        task: StyleTask::new().ticked("[✓] ").unticked("[ ] "),
        link: StylePrimitive::new().color("36").underline(true),
        link_text: StylePrimitive::new().color("29").bold(true),
        image: StylePrimitive::new().color("205").underline(true),
        image_text: StylePrimitive::new().color("243").format("Image: {{.text}} →"),
        code: StyleBlock::new().style(
            StylePrimitive::new()
                .prefix(" ")
                .suffix(" ")
                .color("203")
                .background_color("254"),
        ),
        code_block: StyleCodeBlock::new()
            .block(
                StyleBlock::new()
                    .style(StylePrimitive::new().color("242"))
                    .margin(DEFAULT_MARGIN),
            )
            .theme("charm-light")
            .chroma(light_palette()),
        table: StyleTable::new().separators("┼", "│", "─"),
        definition_description: StylePrimitive::new().block_prefix("\n→ "),
        ..StyleConfig::default()
    }
}

/// Creates the pink style configuration.
pub fn pink_style() -> StyleConfig {
    let [_, h2, h3, h4, h5, h6] = headings(["", "▌ ", "┃ ", "│ ", "┆ ", "┊ "]);
    StyleConfig {
        document: StyleBlock::new().margin(DEFAULT_MARGIN),
        block_quote: StyleBlock::new().indent(1).indent_token("│ "),
        list: StyleList::new().level_indent(DEFAULT_LIST_INDENT),
        heading: StyleBlock::new().style(StylePrimitive::new().block_suffix("\n").color("212").bold(true)),
        h1: StyleBlock::new().style(StylePrimitive::new().block_prefix("\n").block_suffix("\n")),
        h2,
        h3,
        h4,
        h5,
        h6: StyleBlock {
            style: h6.style.bold(false),
            ..h6
        },
        strikethrough: StylePrimitive::new().crossed_out(true),
        emph: StylePrimitive::new().italic(true),
        strong: StylePrimitive::new().bold(true),
        horizontal_rule: StylePrimitive::new().color("212").format("\n──────\n"),
        item: StylePrimitive::new().block_prefix("• "),
        enumeration: StylePrimitive::new().block_prefix(". "),
        task: StyleTask::new().ticked("[✓] ").unticked("[ ] "),
        link: StylePrimitive::new().color("99").underline(true),
        link_text: StylePrimitive::new().bold(true),
        image: StylePrimitive::new().underline(true),
        image_text: StylePrimitive::new().format("Image: {{.text}}"),
        code: StyleBlock::new().style(
            StylePrimitive::new()
                .prefix(" ")
                .suffix(" ")
                .color("212")
                .background_color("236"),
        ),
        code_block: StyleCodeBlock::new().block(StyleBlock::new().margin(DEFAULT_MARGIN)),
        definition_list: StyleBlock::new(),
        definition_description: StylePrimitive::new().block_prefix("\n→ "),
        ..StyleConfig::default()
    }
}

/// Creates the Dracula style configuration.
pub fn dracula_style() -> StyleConfig {
    let [h1, h2, h3, h4, h5, h6] = headings(["# ", "## ", "### ", "#### ", "##### ", "###### "]);
    StyleConfig {
        document: StyleBlock::new()
            .style(
                StylePrimitive::new()
                    .block_prefix("\n")
                    .block_suffix("\n")
                    .color("#f8f8f2"),
            )
            .margin(DEFAULT_MARGIN),
        block_quote: StyleBlock::new()
            .style(StylePrimitive::new().color("#f1fa8c").italic(true))
            .indent(2),
        list: StyleList::new()
            .block(StyleBlock::new().style(StylePrimitive::new().color("#f8f8f2")))
            .level_indent(DEFAULT_LIST_INDENT),
        heading: StyleBlock::new().style(StylePrimitive::new().block_suffix("\n").color("#bd93f9").bold(true)),
        h1,
        h2,
        h3,
        h4,
        h5,
        h6,
        strikethrough: StylePrimitive::new().crossed_out(true),
        emph: StylePrimitive::new().color("#f1fa8c").italic(true),
        strong: StylePrimitive::new().color("#ffb86c").bold(true),
        horizontal_rule: StylePrimitive::new().color("#6272A4").format("\n--------\n"),
        item: StylePrimitive::new().block_prefix("• "),
        enumeration: StylePrimitive::new().block_prefix(". ").color("#8be9fd"),
        task: StyleTask::new().ticked("[✓] ").unticked("[ ] "),
        link: StylePrimitive::new().color("#8be9fd").underline(true),
        link_text: StylePrimitive::new().color("#ff79c6"),
        image: StylePrimitive::new().color("#8be9fd").underline(true),
        image_text: StylePrimitive::new().color("#ff79c6").format("Image: {{.text}} →"),
        code: StyleBlock::new().style(StylePrimitive::new().color("#50fa7b")),
        code_block: StyleCodeBlock::new()
            .block(
                StyleBlock::new()
                    .style(StylePrimitive::new().color("#ffb86c"))
                    .margin(DEFAULT_MARGIN),
            )
            .theme("dracula")
            .chroma(dracula_palette()),
        table: StyleTable::new().separators("┼", "│", "─"),
        definition_description: StylePrimitive::new().block_prefix("\n🠶 "),
        ..StyleConfig::default()
    }
}

/// Creates the Tokyo Night style configuration.
pub fn tokyo_night_style() -> StyleConfig {
    let [h1, h2, h3, h4, h5, h6] = headings(["# ", "## ", "### ", "#### ", "##### ", "###### "]);
    StyleConfig {
        document: StyleBlock::new()
            .style(
                StylePrimitive::new()
                    .block_prefix("\n")
                    .block_suffix("\n")
                    .color("#a9b1d6"),
            )
            .margin(DEFAULT_MARGIN),
        block_quote: StyleBlock::new().indent(1).indent_token("│ "),
        list: StyleList::new()
            .block(StyleBlock::new().style(StylePrimitive::new().color("#a9b1d6")))
            .level_indent(DEFAULT_LIST_INDENT),
        heading: StyleBlock::new().style(StylePrimitive::new().block_suffix("\n").color("#bb9af7").bold(true)),
        h1: StyleBlock {
            style: h1.style.bold(true),
            ..h1
        },
        h2,
        h3,
        h4,
        h5,
        h6,
        strikethrough: StylePrimitive::new().crossed_out(true),
        emph: StylePrimitive::new().italic(true),
        strong: StylePrimitive::new().bold(true),
        horizontal_rule: StylePrimitive::new().color("#565f89").format("\n--------\n"),
        item: StylePrimitive::new().block_prefix("• "),
        enumeration: StylePrimitive::new().block_prefix(". ").color("#7aa2f7"),
        task: StyleTask::new().ticked("[✓] ").unticked("[ ] "),
        link: StylePrimitive::new().color("#7aa2f7").underline(true),
        link_text: StylePrimitive::new().color("#2ac3de"),
        image: StylePrimitive::new().color("#7aa2f7").underline(true),
        image_text: StylePrimitive::new().color("#2ac3de").format("Image: {{.text}} →"),
        code: StyleBlock::new().style(StylePrimitive::new().color("#9ece6a")),
        code_block: StyleCodeBlock::new()
            .block(
                StyleBlock::new()
                    .style(StylePrimitive::new().color("#ff9e64"))
                    .margin(DEFAULT_MARGIN),
            )
            .theme("tokyo-night")
            .chroma(tokyo_night_palette()),
        definition_description: StylePrimitive::new().block_prefix("\n🠶 "),
        ..StyleConfig::default()
    }
}

fn fg(color: &str) -> StylePrimitive {
    StylePrimitive::new().color(color)
}

fn dark_palette() -> StyleChroma {
    StyleChroma {
        text: fg("#C4C4C4"),
        error: fg("#F1F1F1").background_color("#F05B5B"),
        comment: fg("#676767"),
        comment_preproc: fg("#FF875F"),
        keyword: fg("#00AAFF"),
        keyword_reserved: fg("#FF5FD2"),
        keyword_namespace: fg("#FF5F87"),
        keyword_type: fg("#6E6ED8"),
        operator: fg("#EF8080"),
        punctuation: fg("#E8E8A8"),
        name: fg("#C4C4C4"),
        name_builtin: fg("#FF8EC7"),
        name_tag: fg("#B083EA"),
        name_attribute: fg("#7A7AE6"),
        name_class: fg("#F1F1F1").underline(true).bold(true),
        name_decorator: fg("#FFFF87"),
        name_function: fg("#00D787"),
        literal_number: fg("#6EEFC0"),
        literal_string: fg("#C69669"),
        literal_string_escape: fg("#AFFFD7"),
        generic_deleted: fg("#FD5B5B"),
        generic_emph: StylePrimitive::new().italic(true),
        generic_inserted: fg("#00D787"),
        generic_strong: StylePrimitive::new().bold(true),
        generic_subheading: fg("#777777"),
        background: StylePrimitive::new().background_color("#373737"),
    }
}

fn light_palette() -> StyleChroma {
    StyleChroma {
        text: fg("#2A2A2A"),
        error: fg("#F1F1F1").background_color("#FF5555"),
        comment: fg("#8D8D8D"),
        comment_preproc: fg("#FF875F"),
        keyword: fg("#279EFC"),
        keyword_reserved: fg("#FF5FD2"),
        keyword_namespace: fg("#FB406F"),
        keyword_type: fg("#7049C2"),
        operator: fg("#FF2626"),
        punctuation: fg("#FA7878"),
        name_builtin: fg("#0A1BB1"),
        name_tag: fg("#581290"),
        name_attribute: fg("#8362CB"),
        name_class: fg("#212121").underline(true).bold(true),
        name_decorator: fg("#A3A322"),
        name_function: fg("#019F57"),
        literal_number: fg("#22CCAE"),
        literal_string: fg("#7E5B38"),
        literal_string_escape: fg("#00AEAE"),
        generic_deleted: fg("#FD5B5B"),
        generic_emph: StylePrimitive::new().italic(true),
        generic_inserted: fg("#00D787"),
        generic_strong: StylePrimitive::new().bold(true),
        generic_subheading: fg("#777777"),
        background: StylePrimitive::new().background_color("#373737"),
        ..StyleChroma::default()
    }
}

fn dracula_palette() -> StyleChroma {
    StyleChroma {
        text: fg("#f8f8f2"),
        error: fg("#f8f8f2").background_color("#ff5555"),
        comment: fg("#6272a4"),
        comment_preproc: fg("#ff79c6"),
        keyword: fg("#ff79c6"),
        keyword_reserved: fg("#ff79c6"),
        keyword_namespace: fg("#ff79c6"),
        keyword_type: fg("#8be9fd").italic(true),
        operator: fg("#ff79c6"),
        punctuation: fg("#f8f8f2"),
        name_builtin: fg("#8be9fd").italic(true),
        name_tag: fg("#ff79c6"),
        name_attribute: fg("#50fa7b"),
        name_class: fg("#8be9fd"),
        name_decorator: fg("#50fa7b"),
        name_function: fg("#50fa7b"),
        literal_number: fg("#bd93f9"),
        literal_string: fg("#f1fa8c"),
        literal_string_escape: fg("#ff79c6"),
        generic_deleted: fg("#ff5555"),
        generic_emph: StylePrimitive::new().italic(true),
        generic_inserted: fg("#50fa7b"),
        generic_strong: StylePrimitive::new().bold(true),
        generic_subheading: fg("#bd93f9"),
        background: StylePrimitive::new().background_color("#282a36"),
        ..StyleChroma::default()
    }
}

fn tokyo_night_palette() -> StyleChroma {
    StyleChroma {
        text: fg("#a9b1d6"),
        error: fg("#a9b1d6").background_color("#f7768e"),
        comment: fg("#565f89"),
        comment_preproc: fg("#2ac3de"),
        keyword: fg("#2ac3de"),
        keyword_reserved: fg("#2ac3de"),
        keyword_namespace: fg("#2ac3de"),
        keyword_type: fg("#7aa2f7"),
        operator: fg("#2ac3de"),
        punctuation: fg("#a9b1d6"),
        name: fg("#7aa2f7"),
        name_builtin: fg("#7aa2f7"),
        name_tag: fg("#2ac3de"),
        name_attribute: fg("#9ece6a"),
        name_class: fg("#7aa2f7"),
        name_decorator: fg("#9ece6a"),
        name_function: fg("#9ece6a"),
        literal_string: fg("#e0af68"),
        literal_string_escape: fg("#2ac3de"),
        generic_deleted: fg("#f7768e"),
        generic_emph: StylePrimitive::new().italic(true),
        generic_inserted: fg("#9ece6a"),
        generic_strong: StylePrimitive::new().bold(true),
        generic_subheading: fg("#bb9af7"),
        background: StylePrimitive::new().background_color("#1a1b26"),
        ..StyleChroma::default()
    }
}
