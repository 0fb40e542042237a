use std::collections::HashMap;

use clap::{Parser, Subcommand};

use crate::config::{Settings, load_settings};
use crate::error::GatewayError;
use crate::models::{ModelRegistry, RequestedSettings};
use crate::server::models::{NegotiateRequest, NegotiateResponse};

/// chat-gateway: model capability negotiation and API proxy for the chat client.
#[derive(Parser, Debug)]
#[command(name = "chat-gateway", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Extra arguments passed as config overrides (--section.key=value).
    /// Place after `--` separator: `chat-gateway serve -- --server.port=8080`
    #[arg(last = true, allow_hyphen_values = true, global = true)]
    pub rest: Vec<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Start the HTTP server.
    Serve,
    /// Check if the server is healthy (for container HEALTHCHECK).
    Health,
    /// List the model catalog.
    Models {
        /// Only show free-tier models.
        #[arg(long)]
        free: bool,
    },
    /// Show how a settings combination would be negotiated for a model.
    Check {
        /// Model id (defaults to chat.default_model).
        #[arg(long)]
        model: Option<String>,
        /// Request web search (`--web-search=false` overrides a config default of true).
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        web_search: Option<bool>,
        /// Request reasoning (`--reasoning=false` overrides a config default of true).
        #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
        reasoning: Option<bool>,
        #[arg(long)]
        images: bool,
        #[arg(long)]
        documents: bool,
    },
}

impl Command {
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Command::Serve => "serve",
            Command::Health => "health",
            Command::Models { .. } => "models",
            Command::Check { .. } => "check",
        }
    }
}

/// Parse the `rest` args into a HashMap of config overrides.
/// Format: `--section.key=value` or `--section__key=value` (double underscores → dots).
fn parse_config_overrides(rest: &[String]) -> HashMap<String, String> {
    rest.iter()
        .filter_map(|arg| {
            let stripped = arg.trim_start_matches('-').replace("__", ".");
            let (key, value) = stripped.split_once('=')?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

pub async fn run() -> Result<(), GatewayError> {
    let cli = Cli::parse();
    let config_overrides = parse_config_overrides(&cli.rest);
    let settings = load_settings(&config_overrides)?;

    tracing::debug!(
        command = cli.command.canonical_name(),
        overrides = config_overrides.len(),
        "starting chat-gateway"
    );

    match cli.command {
        Command::Serve => crate::server::start_server(settings).await?,
        Command::Health => health_check(&settings).await?,
        Command::Models { free } => print_models(ModelRegistry::builtin(), free),
        Command::Check {
            model,
            web_search,
            reasoning,
            images,
            documents,
        } => {
            let (model_id, requested) = NegotiateRequest {
                model_id: model,
                web_search_enabled: web_search,
                reasoning_enabled: reasoning,
                has_image_attachments: Some(images),
                has_document_attachments: Some(documents),
            }
            .resolve(&settings.chat);
            let report = check(ModelRegistry::builtin(), model_id, requested);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn check(
    registry: &ModelRegistry,
    model_id: String,
    requested: RequestedSettings,
) -> NegotiateResponse {
    NegotiateResponse {
        validation: registry.validate_model_settings(&model_id, &requested),
        effective: registry.get_effective_settings(&model_id, &requested),
        model_id,
        requested,
    }
}

fn print_models(registry: &ModelRegistry, free_only: bool) {
    for model in registry.models().iter().filter(|m| !free_only || m.is_free) {
        let caps = &model.capabilities;
        println!(
            "{:<20} {:<11} {:<5} tools={:<8} thinking={:<5} images={:<5} docs={:<5} ctx={}",
            model.id,
            model.provider_label,
            if model.is_free { "free" } else { "pro" },
            caps.tool_provider,
            caps.supports_thinking,
            caps.supports_images,
            caps.supports_documents,
            caps.max_context_length,
        );
    }
}

/// Lightweight health check: GET http://127.0.0.1:$PORT/ with a 5s timeout.
async fn health_check(settings: &Settings) -> Result<(), GatewayError> {
    let url = format!("http://127.0.0.1:{}/", settings.server.port);
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()?;
    let resp = client
        .get(&url)
        .send()
        .await
        .map_err(|e| GatewayError::Other(format!("health check failed: {e}")))?;
    if resp.status().is_success() {
        Ok(())
    } else {
        Err(GatewayError::Other(format!(
            "health check failed: status {}",
            resp.status()
        )))
    }
}
