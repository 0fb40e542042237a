use std::collections::HashMap;

use figment::Figment;
use figment::providers::{Env, Format, Toml};

use crate::config::types::Settings;
use crate::error::GatewayError;

// Embedded default TOML so the binary is self-contained.
static CONFIGURATION_TOML: &str = include_str!("../../settings/configuration.toml");

/// Well-known env var names and the settings keys they feed.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("ELEVENLABS_API_KEY", "elevenlabs.key"),
    ("EXA_API_KEY", "exa.key"),
    ("PORT", "server.port"),
];

/// Build the full configuration by merging layers:
///
/// 1. Embedded TOML defaults (`settings/configuration.toml`)
/// 2. Secrets file from filesystem (`.secrets.toml`, optional)
/// 3. CLI argument overrides (`--section.key=value`)
/// 4. Environment variables (highest precedence for secrets)
pub fn load_settings(cli_overrides: &HashMap<String, String>) -> Result<Settings, GatewayError> {
    // Layer 1: embedded defaults
    let mut figment = Figment::new().merge(Toml::string(CONFIGURATION_TOML));

    // Layer 2: secrets file (optional, from filesystem)
    figment = figment.merge(Toml::file(".secrets.toml"));
    figment = figment.merge(Toml::file("settings/.secrets.toml"));

    // Layer 3: CLI argument overrides (--server.port=8080)
    for (key, value) in cli_overrides {
        if let Some(toml_fragment) = cli_override_to_toml(key, value) {
            figment = figment.merge(Toml::string(&toml_fragment));
        }
    }

    // Layer 4a: well-known env var aliases
    figment = figment.merge(Env::raw().filter_map(|key| {
        ENV_ALIASES
            .iter()
            .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
            .map(|(_, target)| (*target).into())
    }));

    // Layer 4b: SECTION.KEY env vars (EXA.BASE_URL → exa.base_url)
    for (key, value) in std::env::vars() {
        if !key.contains('.') {
            continue;
        }
        let lower = key.to_lowercase();
        let Some((section, field)) = lower.split_once('.') else {
            continue;
        };
        let fragment = format!("[{section}]\n{field} = {}", toml_scalar(value.trim()));
        figment = figment.merge(Toml::string(&fragment));
    }

    let settings: Settings = figment.extract()?;
    Ok(settings)
}

/// Convert a CLI override like "server.port=8080" into a TOML fragment.
fn cli_override_to_toml(key: &str, value: &str) -> Option<String> {
    let (section, field) = match key.split_once('.') {
        Some(pair) => pair,
        None => {
            tracing::warn!("ignoring CLI override with no section: {key}={value}");
            return None;
        }
    };
    Some(format!("[{section}]\n{field} = {}", toml_scalar(value)))
}

/// Encode a raw string as a TOML scalar: bools and numbers stay literal, the rest is quoted.
fn toml_scalar(value: &str) -> String {
    let is_literal = value == "true"
        || value == "false"
        || value.parse::<i64>().is_ok()
        || value.parse::<f64>().is_ok();
    if is_literal {
        return value.to_string();
    }
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t");
    format!("\"{escaped}\"")
}
