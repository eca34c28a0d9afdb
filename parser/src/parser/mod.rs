//! Routine extraction from raw input.
//!
//! Inputs come in three shapes: a bare JSON object, a JSON object inside a
//! fenced code block (typical of chat assistant replies), or free-form text
//! with one exercise per line. [`detect_format`] classifies the input, then
//! an ordered chain of strategies is run and the first one that produces a
//! routine wins:
//!
//! | Detected format | Strategy chain          |
//! |-----------------|-------------------------|
//! | `Json`          | `json`, `text`          |
//! | `FencedJson`    | `fenced-json`, `text`   |
//! | `Text`          | `text`                  |
//!
//! Exercise names are resolved against a [`CatalogIndex`] supplied by the
//! caller. The index is borrowed, never mutated, so one index can serve any
//! number of parsers.

mod detect;
mod strategies;

use routine_import_catalog::CatalogIndex;
use routine_import_core::RoutineConfig;
use tracing::{debug, warn};

use crate::config::ParserConfig;
use strategies::{ExtractionStrategy, strategy_by_name};

pub use detect::{InputFormat, detect_format};
pub(crate) use detect::fenced_json;

/// Shared state handed to every strategy.
pub struct ExtractionContext<'a> {
    pub index: &'a CatalogIndex,
    pub config: &'a ParserConfig,
    warnings: Vec<String>,
}

impl<'a> ExtractionContext<'a> {
    pub fn new(index: &'a CatalogIndex, config: &'a ParserConfig) -> Self {
        Self {
            index,
            config,
            warnings: Vec::new(),
        }
    }

    /// Records a non-fatal extraction problem.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{message}");
        self.warnings.push(message);
    }

    /// Resolves an exercise name, preferring an explicit identifier.
    pub fn resolve(&self, name: &str, explicit_id: Option<String>) -> Option<String> {
        explicit_id
            .filter(|id| !id.trim().is_empty())
            .or_else(|| self.index.resolve(name))
    }

    /// Folder applied to routines that do not carry one.
    pub fn default_folder(&self) -> Option<String> {
        self.config.folder_id.clone()
    }
}

/// Returns strategy names in the order they are attempted for `format`.
pub fn ranked_strategy_names(format: InputFormat) -> Vec<&'static str> {
    match format {
        InputFormat::Json => vec!["json", "text"],
        InputFormat::FencedJson => vec!["fenced-json", "text"],
        InputFormat::Text => vec!["text"],
    }
}

/// Parser for one raw input.
///
/// # Examples
///
/// ```
/// use routine_import_catalog::CatalogIndex;
/// use routine_import_parser::{InputFormat, ParserConfig, RoutineParser};
///
/// let index = CatalogIndex::from_names([("ex1", "Deadlift")]);
/// let config = ParserConfig::default();
///
/// let mut parser = RoutineParser::new("- Deadlift: 3x5 @ 140kg", &index, &config);
/// let routine = parser.parse().unwrap();
///
/// assert_eq!(parser.detected_format(), InputFormat::Text);
/// assert_eq!(parser.strategy_used(), Some("text"));
/// assert_eq!(routine.exercises[0].template_id.as_deref(), Some("ex1"));
/// assert_eq!(routine.exercises[0].sets[0].weight_kg, Some(140.0));
/// ```
pub struct RoutineParser<'a> {
    raw_input: &'a str,
    context: ExtractionContext<'a>,
    detected_format: InputFormat,
    strategies_tried: Vec<&'static str>,
    strategy_used: Option<&'static str>,
}

impl<'a> RoutineParser<'a> {
    /// Creates a parser for `input`. Nothing is parsed until [`parse`](Self::parse).
    pub fn new(input: &'a str, index: &'a CatalogIndex, config: &'a ParserConfig) -> Self {
        Self {
            raw_input: input,
            context: ExtractionContext::new(index, config),
            detected_format: detect_format(input),
            strategies_tried: Vec::new(),
            strategy_used: None,
        }
    }

    /// Runs the strategy chain and returns the first routine produced.
    pub fn parse(&mut self) -> Option<RoutineConfig> {
        self.strategies_tried.clear();
        self.strategy_used = None;

        for name in ranked_strategy_names(self.detected_format) {
            let Some(strategy) = strategy_by_name(name) else {
                continue;
            };
            self.strategies_tried.push(strategy.name());

            if let Some(routine) = strategy.extract(self.raw_input, &mut self.context) {
                debug!(
                    strategy = strategy.name(),
                    format = %self.detected_format,
                    exercises = routine.exercises.len(),
                    "Extracted routine"
                );
                self.strategy_used = Some(strategy.name());
                return Some(routine);
            }
            debug!(strategy = strategy.name(), "Strategy produced no routine");
        }

        None
    }

    /// Format classification of the input.
    pub fn detected_format(&self) -> InputFormat {
        self.detected_format
    }

    /// Name of the strategy that produced the routine, after a successful parse.
    pub fn strategy_used(&self) -> Option<&'static str> {
        self.strategy_used
    }

    /// Strategies attempted by the last parse, in order.
    pub fn strategies_tried(&self) -> &[&'static str] {
        &self.strategies_tried
    }

    /// Non-fatal problems collected while parsing.
    pub fn warnings(&self) -> &[String] {
        &self.context.warnings
    }
}

/// Removes formatting that gets in the way of line matching.
///
/// Line endings become `\n` and markdown emphasis markers (`**`, `__`) are
/// dropped.
pub(crate) fn normalize_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace("**", "")
        .replace("__", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_emphasis_and_crlf() {
        assert_eq!(
            normalize_text("**Bench Press**: 3x10\r\n__Row__: 3x8"),
            "Bench Press: 3x10\nRow: 3x8"
        );
    }

    #[test]
    fn test_ranked_strategy_names_end_with_text() {
        for format in [InputFormat::Json, InputFormat::FencedJson, InputFormat::Text] {
            assert_eq!(ranked_strategy_names(format).last(), Some(&"text"));
        }
    }

    #[test]
    fn test_malformed_json_falls_through_to_text() {
        let index = CatalogIndex::default();
        let config = ParserConfig::default();
        let input = "{ not json\n- Squat: 5x5";

        let mut parser = RoutineParser::new(input, &index, &config);
        let routine = parser.parse().unwrap();

        assert_eq!(parser.detected_format(), InputFormat::Json);
        assert_eq!(parser.strategies_tried(), &["json", "text"]);
        assert_eq!(parser.strategy_used(), Some("text"));
        assert_eq!(routine.exercises[0].name, "Squat");
    }

    #[test]
    fn test_unparseable_input_tries_text_only() {
        let index = CatalogIndex::default();
        let config = ParserConfig::default();

        let mut parser = RoutineParser::new("não é json nem treino", &index, &config);
        assert!(parser.parse().is_none());
        assert_eq!(parser.strategies_tried(), &["text"]);
        assert_eq!(parser.strategy_used(), None);
    }

    #[test]
    fn test_explicit_identifier_skips_resolution() {
        let index = CatalogIndex::from_names([("ex1", "Bench Press")]);
        let config = ParserConfig::default();
        let context = ExtractionContext::new(&index, &config);

        assert_eq!(
            context.resolve("Bench Press", Some("custom-7".to_string())).as_deref(),
            Some("custom-7")
        );
        assert_eq!(
            context.resolve("Bench Press", Some("  ".to_string())).as_deref(),
            Some("ex1")
        );
    }
}
