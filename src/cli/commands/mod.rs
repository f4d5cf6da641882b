//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod courses;
mod outline;
mod search;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use courses::run_courses;
pub use outline::run_outline;
pub use search::run_search;

use crate::config::{GenerationProvider, Settings};

/// Apply `--model` / `--provider` overrides.
///
/// Switching provider without naming a model selects that provider's default model.
pub(crate) fn apply_generation_overrides(
    settings: &mut Settings,
    model: Option<String>,
    provider: Option<GenerationProvider>,
) {
    if let Some(provider) = provider {
        if provider != settings.generation.provider && model.is_none() {
            settings.generation.model = provider.default_model().to_string();
        }
        settings.generation.provider = provider;
    }
    if let Some(model) = model {
        settings.generation.model = model;
    }
}
