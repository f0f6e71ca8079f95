//! Extracting `serde` structs from loaded properties through `figment`.

use anyhow::{Result, anyhow, ensure};
use figment::Figment;
use propcast::PropsLoader;
use rstest::rstest;
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Server {
    host: String,
    port: u16,
    tags: Vec<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct AppConfig {
    name: String,
    debug: bool,
    server: Server,
}

#[rstest]
fn extracts_prefixed_properties() -> Result<()> {
    let props = PropsLoader::builder()
        .prefix("app")
        .bundle("app-default.properties", "app.server.port=80\napp.debug=false\n")
        .base_name("app")
        .add_props(
            "app.name=demo\napp.server.host=localhost\napp.server.port=8080\n\
             app.server.tags=edge, \"eu,west\"\nunrelated=1\n",
        )
        .build()
        .load()?;

    let config: AppConfig = Figment::from(props).extract().map_err(|err| anyhow!(err))?;
    ensure!(
        config
            == AppConfig {
                name: "demo".into(),
                debug: false,
                server: Server {
                    host: "localhost".into(),
                    port: 8080,
                    tags: vec!["edge".into(), "eu,west".into()],
                },
            },
        "unexpected config {config:?}"
    );
    Ok(())
}

#[rstest]
fn later_providers_override_properties() -> Result<()> {
    let props = PropsLoader::builder()
        .add_props("server.host=a\nserver.port=1\nserver.tags=x,y\nname=n\ndebug=true\n")
        .build()
        .load()?;
    let config: AppConfig = Figment::from(props)
        .merge(("server.port", 2))
        .extract()
        .map_err(|err| anyhow!(err))?;
    ensure!(config.server.port == 2);
    ensure!(config.debug);
    Ok(())
}

#[rstest]
fn conflicting_keys_are_reported() -> Result<()> {
    let props = PropsLoader::builder()
        .add_props("server=none\nserver.host=a\n")
        .build()
        .load()?;
    let err = Figment::from(props)
        .extract::<AppConfig>()
        .err()
        .ok_or_else(|| anyhow!("conflicting keys should fail"))?;
    ensure!(err.to_string().contains("`server.host`"), "{err}");
    Ok(())
}
