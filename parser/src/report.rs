//! Structured parse reporting.

use routine_import_core::{RoutineConfig, validate_routine};
use serde::{Deserialize, Serialize};

use crate::parser::InputFormat;

/// Per-input parse report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseReport {
    pub success: bool,
    pub detected_format: InputFormat,
    /// Strategy that produced the routine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    pub strategies_tried: Vec<String>,
    pub exercise_count: usize,
    pub resolved_count: usize,
    /// Names that could not be matched to the catalog
    pub unresolved: Vec<String>,
    pub warnings: Vec<String>,
    pub validation_problems: Vec<String>,
    /// `true` when a routine was produced and passed validation
    pub submission_ready: bool,
}

impl ParseReport {
    /// Builds the report for one parse outcome.
    pub(crate) fn new(
        routine: Option<&RoutineConfig>,
        detected_format: InputFormat,
        strategy: Option<&str>,
        strategies_tried: &[&str],
        warnings: Vec<String>,
    ) -> Self {
        let (exercise_count, unresolved, validation_problems) = match routine {
            Some(routine) => (
                routine.exercises.len(),
                routine
                    .unresolved_exercises()
                    .into_iter()
                    .map(str::to_string)
                    .collect::<Vec<_>>(),
                validate_routine(routine)
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>(),
            ),
            None => (0, Vec::new(), Vec::new()),
        };

        Self {
            success: routine.is_some(),
            detected_format,
            strategy: strategy.map(str::to_string),
            strategies_tried: strategies_tried.iter().map(|s| s.to_string()).collect(),
            exercise_count,
            resolved_count: exercise_count - unresolved.len(),
            unresolved,
            warnings,
            submission_ready: routine.is_some() && validation_problems.is_empty(),
            validation_problems,
        }
    }
}

/// Result of [`parse_routine_with_report`](crate::parse_routine_with_report).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseRun {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routine: Option<RoutineConfig>,
    pub report: ParseReport,
}
