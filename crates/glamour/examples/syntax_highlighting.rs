//! Syntax highlighting example
//!
//! Run with: cargo run -p glamour --features syntax-highlighting --example syntax_highlighting

use glamour::{Renderer, Style, StyleCodeBlock};

fn main() -> glamour::Result<()> {
    println!("=== Glamour Syntax Highlighting Demo ===\n");

    let markdown = r#"
# Code Examples

## Rust Code

```rust
fn main() {
    let message = "Hello, World!";
    println!("{}", message);
}
```

## Python Code

```python
def greet(name: str) -> str:
    """Return a greeting message."""
    return f"Hello, {name}!"
```

## JSON Data

```json
{
    "name": "glamour",
    "features": ["syntax-highlighting", "serde"]
}
```
"#;

    // The built-in dark style carries its own token palette
    println!("--- Dark style palette ---\n");
    println!("{}", Renderer::new().with_style(Style::Dark).render(markdown)?);

    println!("\n--- Dracula palette ---\n");
    println!("{}", Renderer::new().with_style(Style::Dracula).render(markdown)?);

    // Any syntect theme can be named directly
    println!("\n--- Solarized (dark) ---\n");
    let mut config = Style::Dark.config();
    config.code_block = StyleCodeBlock::new()
        .block(config.code_block.block.clone())
        .theme("Solarized (dark)");
    println!("{}", Renderer::new().with_style_config(config).render(markdown)?);

    Ok(())
}
