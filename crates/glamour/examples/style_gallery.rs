//! Style gallery - preview every built-in style
//!
//! Run with: cargo run -p glamour --example style_gallery

use glamour::{Renderer, available_styles};

const SAMPLE: &str = r"# Style Gallery

Some *emphasis*, some **strong** text, ~~a mistake~~ and `inline code`.
See [the docs](https://github.com/charmbracelet/glamour) for more.

> Block quotes are indented
> and wrapped.

- [x] task done
- [ ] task pending
  1. nested
  2. ordered

| Style | Kind |
|:------|-----:|
| dark  | tty  |
| ascii | any  |

---
";

fn main() -> glamour::Result<()> {
    let mut names: Vec<_> = available_styles().into_iter().collect();
    names.sort_by_key(|(name, _)| *name);

    for (name, style) in names {
        println!("Style: {name}");
        println!("{}", "=".repeat(60));
        let output = Renderer::new().with_style(style).with_word_wrap(60).render(SAMPLE)?;
        println!("{output}");
    }
    Ok(())
}
