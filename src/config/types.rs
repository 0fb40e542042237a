use serde::{Deserialize, Serialize};

/// Redact a secret string for Debug output. Shows "[REDACTED]" if non-empty, "[]" if empty.
fn redact(s: &str) -> &str {
    if s.is_empty() { "[]" } else { "[REDACTED]" }
}

// ── Top-level Settings ──────────────────────────────────────────────

/// Top-level configuration. Each field maps to a TOML `[section]`.
/// Uses `#[serde(default)]` so missing sections gracefully fall back.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub chat: ChatConfig,
    pub elevenlabs: ElevenLabsConfig,
    pub exa: ExaConfig,
}

// ── [server] ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
    /// Upper bound on a single upstream call; the only timeout a proxy request has.
    pub upstream_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            body_limit_bytes: 2 * 1024 * 1024,
            upstream_timeout_secs: 60,
        }
    }
}

// ── [chat] ──────────────────────────────────────────────────────────

/// Defaults for toggles a negotiation request leaves out.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatConfig {
    pub default_model: String,
    pub web_search_enabled: bool,
    pub reasoning_enabled: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_model: "gpt-4o-mini".into(),
            web_search_enabled: false,
            reasoning_enabled: false,
        }
    }
}

// ── Upstream vendors ────────────────────────────────────────────────

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ElevenLabsConfig {
    pub key: String,
    pub base_url: String,
    pub default_model_id: String,
    /// Fixed for broad browser playback support.
    pub output_format: String,
}

impl Default for ElevenLabsConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            base_url: "https://api.elevenlabs.io".into(),
            default_model_id: "eleven_multilingual_v2".into(),
            output_format: "mp3_44100_128".into(),
        }
    }
}

impl std::fmt::Debug for ElevenLabsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevenLabsConfig")
            .field("key", &redact(&self.key))
            .field("base_url", &self.base_url)
            .field("default_model_id", &self.default_model_id)
            .field("output_format", &self.output_format)
            .finish()
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ExaConfig {
    pub key: String,
    pub base_url: String,
}

impl Default for ExaConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            base_url: "https://api.exa.ai".into(),
        }
    }
}

impl std::fmt::Debug for ExaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExaConfig")
            .field("key", &redact(&self.key))
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_keys() {
        let cfg = ElevenLabsConfig {
            key: "sk-live-123".into(),
            ..Default::default()
        };
        let out = format!("{cfg:?}");
        assert!(!out.contains("sk-live-123"));
        assert!(out.contains("[REDACTED]"));

        let exa = ExaConfig::default();
        assert!(format!("{exa:?}").contains("key: \"[]\""));
    }
}
