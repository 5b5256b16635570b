//! Access by field name, with a hand-written schema

use filesettings::format::Json;
use filesettings::{FieldDecl, Settings, SettingsError, SettingsFile};
use serde_json::json;

struct Server;

impl Settings for Server {
    type Format = Json;

    fn fields() -> Result<Vec<FieldDecl<Self::Format>>, SettingsError> {
        Ok(vec![
            FieldDecl::new::<String>("host").default_value("127.0.0.1")?,
            FieldDecl::new::<u16>("port").default_value(8080)?,
            FieldDecl::optional::<String>("motd"),
        ])
    }
}

fn main() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let server = SettingsFile::<Server>::with_path(dir.path().join("server.json"))?;

    for field in server.fields().iter() {
        println!("{} ({}): {:?}", field.name(), field.type_name(), server.get_value(field.name())?);
    }

    // Values are checked against the declared type before anything is written
    match server.set_value("port", json!("eighty")) {
        Err(SettingsError::TypeCheck { name, type_name, .. }) => {
            println!("Rejected {name}: expected {type_name}");
        }
        other => println!("Unexpected: {other:?}"),
    }

    server.set_value("port", json!(9000))?;
    println!("Document: {:?}", server.document()?);

    Ok(())
}
