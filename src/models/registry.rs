use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use super::types::{AiModel, Capability, ModelCapabilities, ToolProvider};
use crate::error::GatewayError;

/// The process-wide catalog. Built once on first access; never mutated.
static BUILTIN: LazyLock<ModelRegistry> = LazyLock::new(|| ModelRegistry::build(catalog()));

/// Lookup table of selectable models, keyed by id.
///
/// Lookups never fail loudly: an unknown id yields `None` (or `false` for
/// capability queries) so that an unrecognized model is never treated as capable.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: Vec<AiModel>,
    index: HashMap<String, usize>,
}

impl ModelRegistry {
    /// Build a registry, rejecting catalogs that break the capability invariants.
    pub fn new(models: Vec<AiModel>) -> Result<Self, GatewayError> {
        let mut seen = HashSet::new();
        for model in &models {
            if !seen.insert(model.id.as_str()) {
                return Err(GatewayError::InvalidRegistry(format!(
                    "duplicate model id: {}",
                    model.id
                )));
            }
            check_capabilities(&model.id, &model.capabilities)?;
        }
        Ok(Self::build(models))
    }

    fn build(models: Vec<AiModel>) -> Self {
        let index = models
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();
        Self { models, index }
    }

    /// The static catalog shipped with the binary.
    pub fn builtin() -> &'static ModelRegistry {
        &BUILTIN
    }

    /// All models, in declaration order.
    pub fn models(&self) -> &[AiModel] {
        &self.models
    }

    pub fn free_models(&self) -> impl Iterator<Item = &AiModel> {
        self.models.iter().filter(|m| m.is_free)
    }

    pub fn get_model_by_id(&self, id: &str) -> Option<&AiModel> {
        self.index.get(id).map(|&i| &self.models[i])
    }

    pub fn get_model_capabilities(&self, id: &str) -> Option<&ModelCapabilities> {
        self.get_model_by_id(id).map(|m| &m.capabilities)
    }

    /// `false` when the model is unknown or lacks the capability.
    pub fn model_supports(&self, id: &str, capability: Capability) -> bool {
        self.get_model_capabilities(id)
            .is_some_and(|caps| caps.get(capability))
    }

    /// Like [`model_supports`](Self::model_supports) but keyed by the wire name
    /// (e.g. `"supportsTools"`). Unrecognized names are `false`.
    pub fn model_supports_named(&self, id: &str, capability: &str) -> bool {
        capability
            .parse::<Capability>()
            .is_ok_and(|cap| self.model_supports(id, cap))
    }
}

fn check_capabilities(id: &str, caps: &ModelCapabilities) -> Result<(), GatewayError> {
    let violation = if caps.max_context_length == 0 {
        Some("maxContextLength must be positive")
    } else if caps.tool_provider == ToolProvider::None && caps.supports_tools {
        Some("toolProvider 'none' cannot support tools")
    } else if caps.tool_provider == ToolProvider::BuiltIn && !caps.supports_tools {
        Some("built-in tool provider must support tools")
    } else if caps.tool_provider == ToolProvider::BuiltIn && !caps.supports_tools_with_thinking {
        // Built-in search is always on, so thinking must coexist with it.
        Some("built-in tool provider must support tools with thinking")
    } else {
        None
    };

    match violation {
        Some(msg) => Err(GatewayError::InvalidRegistry(format!("{id}: {msg}"))),
        None => Ok(()),
    }
}

// ── Free functions over the builtin catalog ─────────────────────────

pub fn get_model_by_id(id: &str) -> Option<&'static AiModel> {
    ModelRegistry::builtin().get_model_by_id(id)
}

pub fn get_model_capabilities(id: &str) -> Option<&'static ModelCapabilities> {
    ModelRegistry::builtin().get_model_capabilities(id)
}

pub fn model_supports(id: &str, capability: Capability) -> bool {
    ModelRegistry::builtin().model_supports(id, capability)
}

// ── Catalog ─────────────────────────────────────────────────────────

struct Entry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    provider: &'static str,
    provider_label: &'static str,
    is_free: bool,
    capabilities: ModelCapabilities,
}

impl From<Entry> for AiModel {
    fn from(e: Entry) -> Self {
        AiModel {
            id: e.id.into(),
            name: e.name.into(),
            description: e.description.into(),
            provider: e.provider.into(),
            provider_label: e.provider_label.into(),
            is_free: e.is_free,
            capabilities: e.capabilities,
        }
    }
}

fn catalog() -> Vec<AiModel> {
    vec![
        Entry {
            id: "gpt-4o-mini",
            name: "GPT-4o mini",
            description: "Fast, affordable model for everyday tasks",
            provider: "openai",
            provider_label: "OpenAI",
            is_free: true,
            capabilities: ModelCapabilities {
                supports_tools: true,
                tool_provider: ToolProvider::Exa,
                supports_thinking: false,
                has_native_reasoning: false,
                supports_images: true,
                supports_documents: true,
                max_context_length: 128_000,
                supports_tools_with_thinking: false,
                supports_attachments_with_tools: true,
            },
        },
        Entry {
            id: "gpt-4o",
            name: "GPT-4o",
            description: "Flagship multimodal model",
            provider: "openai",
            provider_label: "OpenAI",
            is_free: false,
            capabilities: ModelCapabilities {
                supports_tools: true,
                tool_provider: ToolProvider::Exa,
                supports_thinking: false,
                has_native_reasoning: false,
                supports_images: true,
                supports_documents: true,
                max_context_length: 128_000,
                supports_tools_with_thinking: false,
                supports_attachments_with_tools: true,
            },
        },
        Entry {
            id: "o3-mini",
            name: "o3-mini",
            description: "Small reasoning model for math and code",
            provider: "openai",
            provider_label: "OpenAI",
            is_free: false,
            capabilities: ModelCapabilities {
                supports_tools: true,
                tool_provider: ToolProvider::Exa,
                supports_thinking: true,
                has_native_reasoning: true,
                supports_images: false,
                supports_documents: true,
                max_context_length: 200_000,
                supports_tools_with_thinking: false,
                supports_attachments_with_tools: false,
            },
        },
        Entry {
            id: "claude-3-7-sonnet",
            name: "Claude 3.7 Sonnet",
            description: "Hybrid reasoning model with extended thinking",
            provider: "anthropic",
            provider_label: "Anthropic",
            is_free: false,
            capabilities: ModelCapabilities {
                supports_tools: true,
                tool_provider: ToolProvider::Exa,
                supports_thinking: true,
                has_native_reasoning: false,
                supports_images: true,
                supports_documents: true,
                max_context_length: 200_000,
                supports_tools_with_thinking: true,
                supports_attachments_with_tools: true,
            },
        },
        Entry {
            id: "gemini-2.0-flash",
            name: "Gemini 2.0 Flash",
            description: "Low-latency model with Google Search grounding",
            provider: "google",
            provider_label: "Google",
            is_free: true,
            capabilities: ModelCapabilities {
                supports_tools: true,
                tool_provider: ToolProvider::BuiltIn,
                supports_thinking: false,
                has_native_reasoning: false,
                supports_images: true,
                supports_documents: true,
                max_context_length: 1_048_576,
                supports_tools_with_thinking: true,
                supports_attachments_with_tools: true,
            },
        },
        Entry {
            id: "gemini-2.5-pro",
            name: "Gemini 2.5 Pro",
            description: "Thinking model with built-in search grounding",
            provider: "google",
            provider_label: "Google",
            is_free: false,
            capabilities: ModelCapabilities {
                supports_tools: true,
                tool_provider: ToolProvider::BuiltIn,
                supports_thinking: true,
                has_native_reasoning: true,
                supports_images: true,
                supports_documents: true,
                max_context_length: 1_048_576,
                supports_tools_with_thinking: true,
                supports_attachments_with_tools: true,
            },
        },
        Entry {
            id: "sonar",
            name: "Sonar",
            description: "Search-native answers with citations",
            provider: "perplexity",
            provider_label: "Perplexity",
            is_free: true,
            capabilities: ModelCapabilities {
                supports_tools: true,
                tool_provider: ToolProvider::BuiltIn,
                supports_thinking: false,
                has_native_reasoning: false,
                supports_images: false,
                supports_documents: false,
                max_context_length: 127_072,
                supports_tools_with_thinking: true,
                supports_attachments_with_tools: false,
            },
        },
        Entry {
            id: "grok-2-vision",
            name: "Grok 2 Vision",
            description: "Image understanding model",
            provider: "xai",
            provider_label: "xAI",
            is_free: false,
            capabilities: ModelCapabilities {
                supports_tools: true,
                tool_provider: ToolProvider::Exa,
                supports_thinking: false,
                has_native_reasoning: false,
                supports_images: true,
                supports_documents: false,
                max_context_length: 32_768,
                supports_tools_with_thinking: false,
                supports_attachments_with_tools: false,
            },
        },
        Entry {
            id: "deepseek-r1",
            name: "DeepSeek R1",
            description: "Open reasoning model",
            provider: "deepseek",
            provider_label: "DeepSeek",
            is_free: true,
            capabilities: ModelCapabilities {
                supports_tools: false,
                tool_provider: ToolProvider::None,
                supports_thinking: true,
                has_native_reasoning: true,
                supports_images: false,
                supports_documents: false,
                max_context_length: 64_000,
                supports_tools_with_thinking: false,
                supports_attachments_with_tools: false,
            },
        },
        Entry {
            id: "llama-3.3-70b",
            name: "Llama 3.3 70B",
            description: "Open-weight model served on Groq",
            provider: "groq",
            provider_label: "Groq",
            is_free: true,
            capabilities: ModelCapabilities {
                supports_tools: true,
                tool_provider: ToolProvider::Exa,
                supports_thinking: false,
                has_native_reasoning: false,
                supports_images: false,
                supports_documents: false,
                max_context_length: 128_000,
                supports_tools_with_thinking: false,
                supports_attachments_with_tools: false,
            },
        },
    ]
    .into_iter()
    .map(AiModel::from)
    .collect()
}
