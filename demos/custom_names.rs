//! Custom document key example

use filesettings::Settings;

#[derive(Debug, Settings)]
struct Window {
    // Stored under "window-width"
    #[settings(name = "window-width", default = 800)]
    pub width: u32,

    // Stored under "window-height"
    #[settings(name = "window-height", default = 600)]
    pub height: u32,

    // Stored under "title"
    #[settings(default = "untitled".to_string())]
    pub title: String,
}

fn main() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let window = WindowFile::with_path(dir.path().join("window.json"))?;

    window.set_width(1024)?;
    println!("Title: {}", window.title()?);
    println!("Size: {}x{}", window.width()?, window.height()?);

    println!("Settings file:\n{}", std::fs::read_to_string(window.path())?);

    Ok(())
}
