//! Basic usage example

use filesettings::Settings;

#[derive(Debug, Settings)]
#[settings(format = "json")]
struct Prefs {
    // Written to the file the first time it is read
    #[settings(default = "127.0.0.1:8080".to_string())]
    pub server_addr: String,

    // Numeric type
    #[settings(default = 10)]
    pub max_connections: u32,

    // Boolean type
    #[settings(default = false)]
    pub debug_mode: bool,
}

fn main() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("settings.json");

    let prefs = PrefsFile::with_path(&path)?;

    // Nothing on disk yet: defaults are returned and persisted
    println!("Server Address: {}", prefs.server_addr()?);
    println!("Max Connections: {}", prefs.max_connections()?);

    // Assignments go straight to the file
    prefs.set_debug_mode(true)?;
    prefs.set_max_connections(64)?;

    println!("Settings file:\n{}", std::fs::read_to_string(&path)?);
    println!("Snapshot: {:?}", prefs.snapshot()?);

    Ok(())
}
