//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use extensions::{Extension, ListExtensionOptions};
use pagerduty::{ExtensionId, ExtensionSchemaId, PageQuery, ServiceId};
use serde_json::{Map, Value};

use crate::config::LogFormat;

fn extension_id(value: &str) -> Result<ExtensionId, String> {
    ExtensionId::new(value).ok_or_else(|| format!("'{value}' is not a valid extension id"))
}

fn schema_id(value: &str) -> Result<ExtensionSchemaId, String> {
    ExtensionSchemaId::new(value)
        .ok_or_else(|| format!("'{value}' is not a valid extension schema id"))
}

fn service_id(value: &str) -> Result<ServiceId, String> {
    ServiceId::new(value).ok_or_else(|| format!("'{value}' is not a valid service id"))
}

fn json_object(value: &str) -> Result<Map<String, Value>, String> {
    serde_json::from_str(value).map_err(|err| format!("expected a JSON object: {err}"))
}

/// Manage PagerDuty extensions.
#[derive(Debug, Parser)]
#[command(name = "pd-extensions", version)]
pub struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true, env = "PD_EXTENSIONS_CONFIG")]
    pub config: Option<PathBuf>,

    /// API base URL (overrides PAGERDUTY_BASE_URL).
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// REST API token (overrides PAGERDUTY_TOKEN).
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Email address sent as the `From` header on writes (overrides PAGERDUTY_FROM).
    #[arg(long, global = true)]
    pub from: Option<String>,

    /// Log format on stderr.
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List extensions.
    List(ListArgs),
    /// Show one extension.
    Get {
        #[arg(value_parser = extension_id)]
        id: ExtensionId,
    },
    /// Create an extension.
    Create(CreateArgs),
    /// Update an extension. Only the given fields are sent.
    Update {
        #[arg(value_parser = extension_id)]
        id: ExtensionId,
        #[command(flatten)]
        fields: ExtensionFields,
    },
    /// Delete an extension.
    Delete {
        #[arg(value_parser = extension_id)]
        id: ExtensionId,
    },
    /// Re-enable a temporarily disabled extension.
    Enable {
        #[arg(value_parser = extension_id)]
        id: ExtensionId,
    },
}

impl Command {
    /// Subcommand name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "list",
            Self::Get { .. } => "get",
            Self::Create(_) => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Enable { .. } => "enable",
        }
    }
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Page size.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Offset of the first extension.
    #[arg(long)]
    pub offset: Option<u32>,

    /// Ask the server for the total count.
    #[arg(long)]
    pub total: bool,

    /// Follow pagination and print every matching extension.
    #[arg(long)]
    pub all: bool,

    /// Free-text filter on the extension name.
    #[arg(long)]
    pub query: Option<String>,

    /// Only extensions attached to this object (repeatable).
    #[arg(long = "extension-object", value_parser = service_id)]
    pub extension_objects: Vec<ServiceId>,

    /// Only extensions of this schema (repeatable).
    #[arg(long = "extension-schema", value_parser = schema_id)]
    pub extension_schemas: Vec<ExtensionSchemaId>,

    /// Related resources to include (repeatable).
    #[arg(long)]
    pub include: Vec<String>,
}

impl ListArgs {
    pub fn to_options(&self) -> ListExtensionOptions {
        ListExtensionOptions {
            page: PageQuery {
                limit: self.limit,
                offset: self.offset,
                total: self.total,
            },
            extension_objects: self.extension_objects.clone(),
            extension_schemas: self.extension_schemas.clone(),
            query: self.query.clone(),
            include: self.include.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Display name.
    #[arg(long)]
    pub name: String,

    /// Callback URL.
    #[arg(long)]
    pub endpoint_url: String,

    /// Extension schema id.
    #[arg(long, value_parser = schema_id)]
    pub extension_schema: ExtensionSchemaId,

    /// Service to attach the extension to (repeatable).
    #[arg(long = "extension-object", value_parser = service_id)]
    pub extension_objects: Vec<ServiceId>,

    /// Schema-specific configuration as a JSON object.
    #[arg(long, value_parser = json_object)]
    pub extension_config: Option<Map<String, Value>>,
}

impl CreateArgs {
    pub fn to_extension(&self) -> Extension {
        let mut extension = Extension::new(&self.name)
            .with_endpoint_url(&self.endpoint_url)
            .with_schema(&self.extension_schema);
        for service in &self.extension_objects {
            extension = extension.with_service(service);
        }
        extension.config = self.extension_config.clone();
        extension
    }
}

#[derive(Debug, Args)]
pub struct ExtensionFields {
    /// New display name.
    #[arg(long)]
    pub name: Option<String>,

    /// New callback URL.
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// New extension schema id.
    #[arg(long, value_parser = schema_id)]
    pub extension_schema: Option<ExtensionSchemaId>,

    /// Replacement set of attached services (repeatable).
    #[arg(long = "extension-object", value_parser = service_id)]
    pub extension_objects: Vec<ServiceId>,

    /// New schema-specific configuration as a JSON object.
    #[arg(long, value_parser = json_object)]
    pub extension_config: Option<Map<String, Value>>,
}

impl ExtensionFields {
    pub fn to_extension(&self) -> Extension {
        let mut extension = Extension {
            name: self.name.clone(),
            endpoint_url: self.endpoint_url.clone(),
            config: self.extension_config.clone(),
            ..Extension::default()
        };
        if let Some(schema) = &self.extension_schema {
            extension = extension.with_schema(schema);
        }
        for service in &self.extension_objects {
            extension = extension.with_service(service);
        }
        extension
    }
}
