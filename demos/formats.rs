//! The same settings in every supported format, including corruption recovery

use filesettings::Settings;

#[derive(Debug, Settings)]
#[settings(format = "json", handle = "JsonTheme")]
struct ThemeJson {
    #[settings(default = "dark".to_string())]
    pub theme: String,
}

#[derive(Debug, Settings)]
#[settings(format = "toml", handle = "TomlTheme")]
struct ThemeToml {
    #[settings(default = "dark".to_string())]
    pub theme: String,
}

#[derive(Debug, Settings)]
#[settings(format = "yaml", handle = "YamlTheme")]
struct ThemeYaml {
    #[settings(default = "dark".to_string())]
    pub theme: String,
}

fn main() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    let json = JsonTheme::with_path(dir.path().join("theme.json"))?;
    let toml = TomlTheme::with_path(dir.path().join("theme.toml"))?;
    let yaml = YamlTheme::with_path(dir.path().join("theme.yaml"))?;

    // Hand-edited garbage is removed and replaced with the defaults
    std::fs::write(json.path(), "{ \"theme\": ")?;
    std::fs::write(toml.path(), "theme = = light")?;
    std::fs::write(yaml.path(), "- not\n- a\n- mapping\n")?;

    for (path, theme) in [
        (json.path(), json.theme()?),
        (toml.path(), toml.theme()?),
        (yaml.path(), yaml.theme()?),
    ] {
        println!("{}: theme = {theme}", path.display());
        println!("{}", std::fs::read_to_string(path)?);
    }

    Ok(())
}
