use super::registry::ModelRegistry;
use super::types::{AiModel, DisabledFeatures, RequestedSettings, ValidationResult};

pub const UNKNOWN_MODEL_WARNING: &str = "Unknown model";

impl ModelRegistry {
    /// Explain which requested features conflict with the model's capabilities.
    ///
    /// Advisory only: nothing is mutated and the send is not blocked.
    pub fn validate_model_settings(
        &self,
        model_id: &str,
        requested: &RequestedSettings,
    ) -> ValidationResult {
        validate_settings(self.get_model_by_id(model_id), requested)
    }
}

/// Validate against the builtin catalog.
pub fn validate_model_settings(model_id: &str, requested: &RequestedSettings) -> ValidationResult {
    ModelRegistry::builtin().validate_model_settings(model_id, requested)
}

/// Run every check in order; checks are independent and may overlap.
pub fn validate_settings(model: Option<&AiModel>, requested: &RequestedSettings) -> ValidationResult {
    let Some(model) = model else {
        return ValidationResult {
            is_valid: false,
            warnings: vec![UNKNOWN_MODEL_WARNING.to_string()],
            disabled_features: DisabledFeatures::default(),
        };
    };

    let caps = &model.capabilities;
    let name = &model.name;
    let mut warnings = Vec::new();
    let mut disabled = DisabledFeatures::default();

    if requested.web_search_enabled && !caps.supports_tools {
        warnings.push(format!("{name} doesn't support web search"));
        disabled.tools = Some(true);
    }

    if requested.reasoning_enabled && !caps.supports_thinking {
        warnings.push(format!("{name} doesn't support thinking mode"));
        disabled.thinking = Some(true);
    }

    if requested.web_search_enabled
        && requested.reasoning_enabled
        && !caps.supports_tools_with_thinking
    {
        warnings.push(format!(
            "{name} doesn't support web search and thinking mode together. Thinking mode will be disabled."
        ));
        disabled.thinking = Some(true);
    }

    if requested.has_image_attachments && !caps.supports_images {
        warnings.push(format!("{name} doesn't support image attachments"));
        disabled.images = Some(true);
    }

    if requested.has_document_attachments && !caps.supports_documents {
        warnings.push(format!("{name} doesn't support document attachments"));
        disabled.documents = Some(true);
    }

    if requested.has_attachments()
        && requested.web_search_enabled
        && !caps.supports_attachments_with_tools
    {
        warnings.push(format!(
            "{name} doesn't support attachments with web search. Web search will be disabled."
        ));
        disabled.tools = Some(true);
    }

    ValidationResult {
        is_valid: warnings.is_empty(),
        warnings,
        disabled_features: disabled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registry::tests::bare_model;

    fn request(web: bool, reasoning: bool, images: bool, documents: bool) -> RequestedSettings {
        RequestedSettings {
            web_search_enabled: web,
            reasoning_enabled: reasoning,
            has_image_attachments: images,
            has_document_attachments: documents,
        }
    }

    #[test]
    fn test_unknown_model_short_circuits() {
        let result = validate_model_settings("no-such-model", &request(true, true, true, true));
        assert!(!result.is_valid);
        assert_eq!(result.warnings, vec!["Unknown model"]);
        assert!(result.disabled_features.is_empty());
    }

    #[test]
    fn test_nothing_requested_is_valid() {
        let model = bare_model("plain");
        let result = validate_settings(Some(&model), &RequestedSettings::default());
        assert!(result.is_valid);
        assert!(result.warnings.is_empty());
        assert!(result.disabled_features.is_empty());
    }

    #[test]
    fn test_all_checks_run_and_accumulate() {
        let model = bare_model("plain");
        let result = validate_settings(Some(&model), &request(true, true, true, true));

        assert!(!result.is_valid);
        assert_eq!(
            result.warnings,
            vec![
                "plain doesn't support web search",
                "plain doesn't support thinking mode",
                "plain doesn't support web search and thinking mode together. Thinking mode will be disabled.",
                "plain doesn't support image attachments",
                "plain doesn't support document attachments",
                "plain doesn't support attachments with web search. Web search will be disabled.",
            ]
        );
        assert_eq!(
            result.disabled_features,
            DisabledFeatures {
                tools: Some(true),
                thinking: Some(true),
                images: Some(true),
                documents: Some(true),
            }
        );
    }

    #[test]
    fn test_tools_with_thinking_conflict_disables_thinking_only() {
        let result = validate_model_settings("o3-mini", &request(true, true, false, false));
        assert!(!result.is_valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("together"));
        assert_eq!(result.disabled_features.thinking, Some(true));
        assert_eq!(result.disabled_features.tools, None);
    }

    #[test]
    fn test_attachments_with_tools_conflict_disables_tools() {
        let result = validate_model_settings("grok-2-vision", &request(true, false, true, false));
        assert!(!result.is_valid);
        assert_eq!(result.disabled_features.tools, Some(true));
        assert_eq!(result.disabled_features.images, None);
    }

    #[test]
    fn test_capable_model_is_valid() {
        let result =
            validate_model_settings("claude-3-7-sonnet", &request(true, true, true, true));
        assert!(result.is_valid, "unexpected warnings: {:?}", result.warnings);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let req = request(true, true, true, false);
        for id in ["gpt-4o", "o3-mini", "sonar", "deepseek-r1", "missing"] {
            assert_eq!(
                validate_model_settings(id, &req),
                validate_model_settings(id, &req)
            );
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = validate_model_settings("deepseek-r1", &request(true, false, false, false));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["disabledFeatures"], serde_json::json!({"tools": true}));
        assert_eq!(json["warnings"][0], "DeepSeek R1 doesn't support web search");
    }
}
