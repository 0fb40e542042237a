use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a model gains web-search ability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolProvider {
    /// Vendor-native search grounding; cannot be switched off per request.
    #[serde(rename = "built-in")]
    BuiltIn,
    /// External search API invoked through function calling.
    #[serde(rename = "exa")]
    Exa,
    #[default]
    #[serde(rename = "none")]
    None,
}

impl ToolProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolProvider::BuiltIn => "built-in",
            ToolProvider::Exa => "exa",
            ToolProvider::None => "none",
        }
    }
}

impl fmt::Display for ToolProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Per-model capability flags. Fixed shape: every model carries all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCapabilities {
    pub supports_tools: bool,
    pub tool_provider: ToolProvider,
    pub supports_thinking: bool,
    pub has_native_reasoning: bool,
    pub supports_images: bool,
    pub supports_documents: bool,
    pub max_context_length: u32,
    pub supports_tools_with_thinking: bool,
    pub supports_attachments_with_tools: bool,
}

impl ModelCapabilities {
    /// Read one boolean capability.
    pub fn get(&self, capability: Capability) -> bool {
        match capability {
            Capability::Tools => self.supports_tools,
            Capability::Thinking => self.supports_thinking,
            Capability::NativeReasoning => self.has_native_reasoning,
            Capability::Images => self.supports_images,
            Capability::Documents => self.supports_documents,
            Capability::ToolsWithThinking => self.supports_tools_with_thinking,
            Capability::AttachmentsWithTools => self.supports_attachments_with_tools,
        }
    }
}

/// Boolean capability keys, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Tools,
    Thinking,
    NativeReasoning,
    Images,
    Documents,
    ToolsWithThinking,
    AttachmentsWithTools,
}

impl Capability {
    pub const ALL: [Capability; 7] = [
        Capability::Tools,
        Capability::Thinking,
        Capability::NativeReasoning,
        Capability::Images,
        Capability::Documents,
        Capability::ToolsWithThinking,
        Capability::AttachmentsWithTools,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Capability::Tools => "supportsTools",
            Capability::Thinking => "supportsThinking",
            Capability::NativeReasoning => "hasNativeReasoning",
            Capability::Images => "supportsImages",
            Capability::Documents => "supportsDocuments",
            Capability::ToolsWithThinking => "supportsToolsWithThinking",
            Capability::AttachmentsWithTools => "supportsAttachmentsWithTools",
        }
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| format!("unknown capability: {s}"))
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One selectable chat model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiModel {
    /// Stable key, persisted by clients across sessions.
    pub id: String,
    pub name: String,
    pub description: String,
    pub provider: String,
    pub provider_label: String,
    pub is_free: bool,
    pub capabilities: ModelCapabilities,
}

/// What the user asked for on a single chat turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestedSettings {
    pub web_search_enabled: bool,
    pub reasoning_enabled: bool,
    pub has_image_attachments: bool,
    pub has_document_attachments: bool,
}

impl RequestedSettings {
    pub fn has_attachments(&self) -> bool {
        self.has_image_attachments || self.has_document_attachments
    }
}

/// Settings actually honored for a model after reconciliation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveSettings {
    pub web_search_enabled: bool,
    pub reasoning_enabled: bool,
    pub can_process_images: bool,
    pub can_process_documents: bool,
}

/// Features the validator reports as unavailable. Unset means "not flagged".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisabledFeatures {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents: Option<bool>,
}

impl DisabledFeatures {
    pub fn is_empty(&self) -> bool {
        self.tools.is_none()
            && self.thinking.is_none()
            && self.images.is_none()
            && self.documents.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub warnings: Vec<String>,
    pub disabled_features: DisabledFeatures,
}
