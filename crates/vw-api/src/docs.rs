use anyhow::Result;
use serde_json::to_string_pretty;
use std::path::PathBuf;
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::{ServerBuilder, ServerVariableBuilder};
use utoipauto::utoipauto;

pub struct ServerAddon;

impl Modify for ServerAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let port_variable = ServerVariableBuilder::new().default_value("8080").build();
        openapi.servers = Some(vec![
            ServerBuilder::new()
                .url("http://localhost:{port}")
                .description(Some("Local instance"))
                .parameter("port", port_variable)
                .build(),
        ]);
    }
}

#[utoipauto(paths = "./crates/vw-api/src/")]
#[derive(OpenApi)]
#[openapi(
    modifiers(&ServerAddon),
    tags(
        (name = "vaultwatch", description = "Vault yield monitoring API"),
        (name = "Vaults", description = "Tracked vault data and history"),
        (name = "Portfolio", description = "Wallet positions and earnings projections"),
        (name = "Snapshots", description = "Recorded vault snapshots"),
        (name = "Alerts", description = "APY and TVL change alerts"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn generate_openapi_json(output_path: PathBuf) -> Result<()> {
        let openapi = Self::openapi();
        let json = to_string_pretty(&openapi)?;

        let file_path = output_path.join("openapi.json");

        tracing::info!("Saving OpenAPI specs to {}...", file_path.display());

        std::fs::write(&file_path, json)?;
        tracing::info!("OpenAPI specs saved!");
        Ok(())
    }
}
