use super::registry::ModelRegistry;
use super::types::{AiModel, EffectiveSettings, RequestedSettings, ToolProvider};

impl ModelRegistry {
    /// Compute the settings that will actually be sent to the model.
    pub fn get_effective_settings(
        &self,
        model_id: &str,
        requested: &RequestedSettings,
    ) -> EffectiveSettings {
        reconcile_settings(self.get_model_by_id(model_id), requested)
    }
}

/// Reconcile against the builtin catalog.
pub fn get_effective_settings(model_id: &str, requested: &RequestedSettings) -> EffectiveSettings {
    ModelRegistry::builtin().get_effective_settings(model_id, requested)
}

/// Downgrade unsupported requests instead of failing the send.
///
/// Precedence is deliberately asymmetric: web search beats thinking, but
/// attachments beat web search (for non-built-in tool providers).
pub fn reconcile_settings(
    model: Option<&AiModel>,
    requested: &RequestedSettings,
) -> EffectiveSettings {
    let Some(model) = model else {
        return EffectiveSettings::default();
    };
    let caps = &model.capabilities;
    let built_in = caps.tool_provider == ToolProvider::BuiltIn;

    // Built-in search is part of the model; the toggle has no effect.
    let mut web_search = built_in || (requested.web_search_enabled && caps.supports_tools);
    let mut reasoning = requested.reasoning_enabled && caps.supports_thinking;

    if web_search && reasoning && !caps.supports_tools_with_thinking {
        reasoning = false;
    }

    if !built_in
        && web_search
        && requested.has_attachments()
        && !caps.supports_attachments_with_tools
    {
        web_search = false;
    }

    EffectiveSettings {
        web_search_enabled: web_search,
        reasoning_enabled: reasoning,
        can_process_images: requested.has_image_attachments && caps.supports_images,
        can_process_documents: requested.has_document_attachments && caps.supports_documents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::registry::tests::bare_model;
    use crate::models::validator::validate_settings;

    /// Every combination of the four requested flags.
    fn all_requests() -> impl Iterator<Item = RequestedSettings> {
        (0u8..16).map(|bits| RequestedSettings {
            web_search_enabled: bits & 1 != 0,
            reasoning_enabled: bits & 2 != 0,
            has_image_attachments: bits & 4 != 0,
            has_document_attachments: bits & 8 != 0,
        })
    }

    #[test]
    fn test_unknown_model_all_false() {
        for req in all_requests() {
            assert_eq!(
                get_effective_settings("no-such-model", &req),
                EffectiveSettings::default()
            );
        }
    }

    #[test]
    fn test_builtin_provider_always_searches() {
        let registry = ModelRegistry::builtin();
        let built_in: Vec<_> = registry
            .models()
            .iter()
            .filter(|m| m.capabilities.tool_provider == ToolProvider::BuiltIn)
            .collect();
        assert!(!built_in.is_empty());

        for model in built_in {
            for req in all_requests() {
                let effective = registry.get_effective_settings(&model.id, &req);
                assert!(effective.web_search_enabled, "{} with {req:?}", model.id);
            }
        }
    }

    #[test]
    fn test_tools_win_over_thinking() {
        let mut model = bare_model("reasoner");
        model.capabilities.supports_tools = true;
        model.capabilities.tool_provider = ToolProvider::Exa;
        model.capabilities.supports_thinking = true;

        let req = RequestedSettings {
            web_search_enabled: true,
            reasoning_enabled: true,
            ..Default::default()
        };
        let effective = reconcile_settings(Some(&model), &req);
        assert!(effective.web_search_enabled);
        assert!(!effective.reasoning_enabled);

        model.capabilities.supports_tools_with_thinking = true;
        let effective = reconcile_settings(Some(&model), &req);
        assert!(effective.web_search_enabled);
        assert!(effective.reasoning_enabled);
    }

    #[test]
    fn test_attachments_win_over_tools() {
        let req = RequestedSettings {
            web_search_enabled: true,
            has_image_attachments: true,
            ..Default::default()
        };
        let effective = get_effective_settings("grok-2-vision", &req);
        assert!(!effective.web_search_enabled);
        assert!(effective.can_process_images);
        assert!(!effective.can_process_documents);
    }

    #[test]
    fn test_builtin_ignores_attachment_conflict() {
        // sonar cannot mix attachments and tools, but its search is built in.
        let req = RequestedSettings {
            has_document_attachments: true,
            ..Default::default()
        };
        let effective = get_effective_settings("sonar", &req);
        assert!(effective.web_search_enabled);
        assert!(!effective.can_process_documents);
    }

    #[test]
    fn test_both_downgrades_can_apply() {
        // Thinking is dropped for search first, then search is dropped for the attachment.
        let req = RequestedSettings {
            web_search_enabled: true,
            reasoning_enabled: true,
            has_document_attachments: true,
            ..Default::default()
        };
        let effective = get_effective_settings("o3-mini", &req);
        assert!(!effective.web_search_enabled);
        assert!(!effective.reasoning_enabled);
        assert!(effective.can_process_documents);
    }

    #[test]
    fn test_no_tools_model() {
        let req = RequestedSettings {
            web_search_enabled: true,
            reasoning_enabled: true,
            ..Default::default()
        };
        let effective = get_effective_settings("deepseek-r1", &req);
        assert!(!effective.web_search_enabled);
        assert!(effective.reasoning_enabled);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        for model in ModelRegistry::builtin().models() {
            for req in all_requests() {
                assert_eq!(
                    get_effective_settings(&model.id, &req),
                    get_effective_settings(&model.id, &req)
                );
            }
        }
    }

    #[test]
    fn test_every_downgrade_is_reported_by_validator() {
        for model in ModelRegistry::builtin().models() {
            for req in all_requests() {
                let effective = reconcile_settings(Some(model), &req);
                let validation = validate_settings(Some(model), &req);
                let disabled = validation.disabled_features;
                let ctx = format!("{} with {req:?}", model.id);

                if req.web_search_enabled && !effective.web_search_enabled {
                    assert_eq!(disabled.tools, Some(true), "{ctx}");
                }
                if req.reasoning_enabled && !effective.reasoning_enabled {
                    assert_eq!(disabled.thinking, Some(true), "{ctx}");
                }
                if req.has_image_attachments && !effective.can_process_images {
                    assert_eq!(disabled.images, Some(true), "{ctx}");
                }
                if req.has_document_attachments && !effective.can_process_documents {
                    assert_eq!(disabled.documents, Some(true), "{ctx}");
                }
                if effective_differs(&req, &effective) {
                    assert!(!validation.is_valid, "{ctx}");
                }
            }
        }
    }

    /// True when any requested flag was turned off.
    fn effective_differs(req: &RequestedSettings, eff: &EffectiveSettings) -> bool {
        (req.web_search_enabled && !eff.web_search_enabled)
            || (req.reasoning_enabled && !eff.reasoning_enabled)
            || (req.has_image_attachments && !eff.can_process_images)
            || (req.has_document_attachments && !eff.can_process_documents)
    }
}
