//! Workout routine extraction from JSON or free-form text.
//!
//! Chat assistants describe workouts either as a JSON document (bare or in a
//! fenced code block) or as prose with one exercise per line. This crate
//! turns either shape into a [`RoutineConfig`], resolving exercise names
//! against a [`CatalogIndex`] along the way.
//!
//! # Main entry points
//!
//! - [`parse_routine`]: extract a routine, or `None` when the input is not
//!   a workout.
//! - [`parse_routine_with_report`]: same, plus a [`ParseReport`] with the
//!   detected format, resolution counts and validation problems.
//! - [`format_routine_preview`]: chat-ready markdown summary.
//! - [`looks_like_routine_suggestion`]: cheap pre-check before parsing.
//!
//! # Example
//!
//! ```
//! use routine_import_catalog::{Catalog, CatalogIndex};
//! use routine_import_parser::parse_routine;
//!
//! let catalog = Catalog::from_json_str(r#"{"ex1": {"name": "Bench Press"}}"#).unwrap();
//! let index = CatalogIndex::new(&catalog);
//!
//! let routine = parse_routine(
//!     r#"{"title": "Push Day", "exercises": [{"name": "Bench Press", "sets": 3, "reps": 10}]}"#,
//!     &index,
//! )
//! .unwrap();
//!
//! assert_eq!(routine.title, "Push Day");
//! assert_eq!(routine.exercises[0].template_id.as_deref(), Some("ex1"));
//! assert_eq!(routine.exercises[0].sets.len(), 3);
//! assert!(routine.exercises[0].sets.iter().all(|set| set.reps == Some(10)));
//!
//! assert!(parse_routine("não é json nem treino", &index).is_none());
//! ```
//!
//! [`RoutineConfig`]: routine_import_core::RoutineConfig
//! [`CatalogIndex`]: routine_import_catalog::CatalogIndex

pub mod config;
pub mod output;
pub mod parser;
pub mod report;
mod suggest;

use routine_import_catalog::CatalogIndex;
use routine_import_core::RoutineConfig;

pub use config::{ConfigError, ParserConfig};
pub use output::{OutputFormat, format_report, format_routine, format_routine_preview, set_descriptor};
pub use parser::{InputFormat, RoutineParser, detect_format};
pub use report::{ParseReport, ParseRun};
pub use suggest::looks_like_routine_suggestion;

/// Extracts a routine from `text` with the default [`ParserConfig`].
///
/// Returns `None` when neither JSON nor text extraction finds a routine.
/// Never fails otherwise: malformed JSON falls through to text extraction
/// and unknown exercise names are kept with no catalog identifier.
pub fn parse_routine(text: &str, index: &CatalogIndex) -> Option<RoutineConfig> {
    let config = ParserConfig::default();
    RoutineParser::new(text, index, &config).parse()
}

/// Extracts a routine and reports how it went.
///
/// # Examples
///
/// ```
/// use routine_import_catalog::CatalogIndex;
/// use routine_import_parser::{InputFormat, ParserConfig, parse_routine_with_report};
///
/// let index = CatalogIndex::from_names([("ex2", "Squat")]);
/// let text = "Treino: Pernas\n- Squat: 4x6-8 @ 100kg - 90s descanso\n- Made Up Move: 3x12";
///
/// let run = parse_routine_with_report(text, &index, &ParserConfig::default());
///
/// assert_eq!(run.report.detected_format, InputFormat::Text);
/// assert_eq!(run.report.exercise_count, 2);
/// assert_eq!(run.report.unresolved, vec!["Made Up Move"]);
/// assert!(!run.report.submission_ready);
/// assert_eq!(run.routine.unwrap().title, "Pernas");
/// ```
pub fn parse_routine_with_report(
    text: &str,
    index: &CatalogIndex,
    config: &ParserConfig,
) -> ParseRun {
    let mut parser = RoutineParser::new(text, index, config);
    let routine = parser.parse();

    let report = ParseReport::new(
        routine.as_ref(),
        parser.detected_format(),
        parser.strategy_used(),
        parser.strategies_tried(),
        parser.warnings().to_vec(),
    );

    ParseRun { routine, report }
}
