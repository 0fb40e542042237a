//! Model catalog and capability negotiation.
//!
//! The registry is plain data; the validator and reconciler are pure functions
//! over it and are safe to call from any number of request handlers at once.

pub mod reconciler;
pub mod registry;
pub mod types;
pub mod validator;

pub use reconciler::get_effective_settings;
pub use registry::{ModelRegistry, get_model_by_id, get_model_capabilities, model_supports};
pub use types::{
    AiModel, Capability, DisabledFeatures, EffectiveSettings, ModelCapabilities,
    RequestedSettings, ToolProvider, ValidationResult,
};
pub use validator::validate_model_settings;
