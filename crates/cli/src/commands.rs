//! Subcommand dispatch. Each subcommand maps onto one binding operation.

use extensions::ExtensionService;
use pagerduty::ApiClient;
use serde_json::{json, Value};
use tracing::info;

use crate::args::Command;

/// Runs `command` and returns the JSON document to print.
pub async fn run<C: ApiClient>(
    service: &ExtensionService<C>,
    command: Command,
) -> anyhow::Result<Value> {
    let output = match command {
        Command::List(args) => {
            let options = args.to_options();
            if args.all {
                let extensions = service.list_all_extensions(&options).await?;
                json!({ "extensions": extensions })
            } else {
                serde_json::to_value(service.list_extensions(&options).await?)?
            }
        }
        Command::Get { id } => serde_json::to_value(service.get_extension(&id).await?)?,
        Command::Create(args) => {
            let created = service.create_extension(&args.to_extension()).await?;
            info!(id = created.id(), "Extension created");
            serde_json::to_value(created)?
        }
        Command::Update { id, fields } => {
            serde_json::to_value(service.update_extension(&id, &fields.to_extension()).await?)?
        }
        Command::Delete { id } => {
            service.delete_extension(&id).await?;
            info!(%id, "Extension deleted");
            json!({ "deleted": id })
        }
        Command::Enable { id } => serde_json::to_value(service.enable_extension(&id).await?)?,
    };
    Ok(output)
}
