//! Output formatting for routines and reports.

use routine_import_core::{ExerciseConfig, RoutineConfig, RoutineEnvelope};

use crate::report::ParseReport;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Routine model as JSON
    Json,
    /// Routine model as YAML
    Yaml,
    /// Chat-ready markdown preview
    Preview,
    /// API request body (`{"routine": {...}}`)
    Wire,
}

/// Formats a routine in the requested output format.
pub fn format_routine(routine: &RoutineConfig, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(routine)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(routine).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Preview => Ok(format_routine_preview(routine)),
        OutputFormat::Wire => serde_json::to_string_pretty(&RoutineEnvelope::new(
            routine.to_payload(),
        ))
        .map_err(|e| format!("JSON serialization failed: {e}")),
    }
}

/// Formats a parse report in the requested output format.
///
/// Reports have no wire form; [`OutputFormat::Wire`] renders JSON.
pub fn format_report(report: &ParseReport, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json | OutputFormat::Wire => serde_json::to_string_pretty(report)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(report).map_err(|e| format!("YAML serialization failed: {e}"))
        }
        OutputFormat::Preview => Ok(report_to_markdown(report)),
    }
}

/// Renders a routine as a short markdown summary for chat display.
///
/// Resolved exercises are marked ✅, unresolved ones ⚠️.
///
/// # Examples
///
/// ```
/// use routine_import_core::{ExerciseConfig, RoutineConfig, SetConfig};
/// use routine_import_parser::format_routine_preview;
///
/// let routine = RoutineConfig::new("Push Day")
///     .with_exercise(
///         ExerciseConfig::new("Bench Press")
///             .with_template_id("ex1")
///             .with_sets(vec![SetConfig::reps(10); 3])
///             .with_rest_seconds(90),
///     )
///     .with_exercise(
///         ExerciseConfig::new("Mystery Move").with_sets(vec![SetConfig::rep_range(8, 12); 3]),
///     );
///
/// assert_eq!(
///     format_routine_preview(&routine),
///     "**Push Day**\n\n\
///      1. ✅ **Bench Press** - 3x10 (90s rest)\n\
///      2. ⚠️ **Mystery Move** - 3x8-12 (60s rest)"
/// );
/// ```
pub fn format_routine_preview(routine: &RoutineConfig) -> String {
    let mut lines = vec![format!("**{}**", routine.title)];
    if let Some(notes) = &routine.notes {
        lines.push(format!("_{notes}_"));
    }
    lines.push(String::new());

    for (position, exercise) in routine.exercises.iter().enumerate() {
        let marker = if exercise.is_resolved() { "✅" } else { "⚠️" };
        lines.push(format!(
            "{}. {marker} **{}** - {} ({}s rest)",
            position + 1,
            exercise.name,
            set_descriptor(exercise),
            exercise.rest_seconds
        ));
        if let Some(notes) = &exercise.notes {
            lines.push(format!("   _{notes}_"));
        }
    }

    lines.join("\n")
}

/// Compact set summary taken from the first set: `3x8-12`, `3x10`, or
/// `3 sets` when the first set has no rep target. A rep range wins over
/// scalar reps.
pub fn set_descriptor(exercise: &ExerciseConfig) -> String {
    let count = exercise.sets.len();
    let Some(first) = exercise.sets.first() else {
        return format!("{count} sets");
    };

    match (first.rep_range_start, first.rep_range_end, first.reps) {
        (Some(start), Some(end), _) => format!("{count}x{start}-{end}"),
        (_, _, Some(reps)) => format!("{count}x{reps}"),
        _ => format!("{count} sets"),
    }
}

fn report_to_markdown(report: &ParseReport) -> String {
    let mut out = String::new();

    let status = if report.submission_ready {
        "ready"
    } else if report.success {
        "needs attention"
    } else {
        "no routine found"
    };
    out.push_str(&format!("**Status:** {status}\n\n"));
    out.push_str(&format!("**Format:** {}\n", report.detected_format));
    if let Some(strategy) = &report.strategy {
        out.push_str(&format!("**Strategy:** {strategy}\n"));
    }
    out.push_str(&format!(
        "**Exercises:** {} ({} resolved)\n",
        report.exercise_count, report.resolved_count
    ));

    if !report.validation_problems.is_empty() {
        out.push_str("\n## Problems\n\n");
        for problem in &report.validation_problems {
            out.push_str(&format!("- {problem}\n"));
        }
    }

    if !report.warnings.is_empty() {
        out.push_str("\n## Warnings\n\n");
        for warning in &report.warnings {
            out.push_str(&format!("- {warning}\n"));
        }
    }

    out
}
