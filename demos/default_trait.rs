//! Example demonstrating #[settings(default)] using Default trait

use filesettings::Settings;

#[derive(Debug, Settings)]
#[settings(format = "toml")]
struct Editor {
    // Uses Default::default() when the file has no valid value
    #[settings(default)]
    pub font: String, // "" (empty string)

    #[settings(default)]
    pub tab_width: u16, // 0

    #[settings(default)]
    pub soft_wrap: bool, // false

    // Explicit default values for comparison
    #[settings(default = "monospace".to_string())]
    pub fallback_font: String,

    #[settings(default = 4)]
    pub indent: u16,
}

fn main() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let editor = EditorFile::with_path(dir.path().join("editor.toml"))?;

    println!("Editor settings with defaults:");
    println!("  Font (Default trait): '{}'", editor.font()?); // ""
    println!("  Tab Width (Default trait): {}", editor.tab_width()?); // 0
    println!("  Soft Wrap (Default trait): {}", editor.soft_wrap()?); // false
    println!("  Fallback Font (explicit): '{}'", editor.fallback_font()?); // "monospace"
    println!("  Indent (explicit): {}", editor.indent()?); // 4

    Ok(())
}
