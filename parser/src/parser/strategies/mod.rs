//! Pluggable extraction strategies for the supported input shapes.

pub mod json;
pub mod text;

use routine_import_core::RoutineConfig;

use super::ExtractionContext;

/// Pluggable strategy for turning raw input into a routine.
///
/// Strategies never fail loudly: input they cannot handle yields `None` so
/// the next strategy in the chain gets a turn.
pub trait ExtractionStrategy {
    fn name(&self) -> &'static str;
    fn extract(&self, input: &str, ctx: &mut ExtractionContext<'_>) -> Option<RoutineConfig>;
}

/// Looks up a strategy by the name used in [`super::ranked_strategy_names`].
pub fn strategy_by_name(name: &str) -> Option<&'static dyn ExtractionStrategy> {
    match name {
        "json" => Some(&json::JsonStrategy),
        "fenced-json" => Some(&json::FencedJsonStrategy),
        "text" => Some(&text::TextStrategy),
        _ => None,
    }
}
