//! Example demonstrating Option<T> for fields without a default

use filesettings::Settings;

#[derive(Debug, Settings)]
#[settings(format = "yaml")]
struct Session {
    #[settings(default = "my-application".to_string())]
    pub app_name: String,

    // Optional fields - None until assigned, never written on read
    pub last_project: Option<String>,
    pub window_width: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let session = SessionFile::with_path(dir.path().join("session.yaml"))?;

    println!("App Name: {}", session.app_name()?);
    println!("Last Project: {:?}", session.last_project()?); // None

    session.set_last_project(Some("filesettings".to_string()))?;
    session.set_window_width(Some(1280))?;
    println!("Last Project: {:?}", session.last_project()?); // Some("filesettings")

    // Assigning None removes the key again
    session.set_window_width(None)?;
    println!("Window Width: {:?}", session.window_width()?); // None

    println!("Settings file:\n{}", std::fs::read_to_string(session.path())?);

    Ok(())
}
