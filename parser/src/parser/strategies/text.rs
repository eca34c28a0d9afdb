//! Free-form text extraction.
//!
//! One exercise per line, in the style chat assistants write plans:
//!
//! ```text
//! # Push Day
//! 1. Bench Press: 4x8-10 @ 80kg - 90s rest
//! 2. Supino Inclinado - 3x12 com 22,5kg
//! - Triceps Pushdown: 3 x 15 (slow negatives)
//! ```
//!
//! Lines that do not look like an exercise are ignored. Anything after the
//! recognized parts of a line (`, keep back flat`, `@ 185 lbs`) is ignored
//! too. When no line matches, a looser pattern that also accepts lines
//! without a separator (`Squat 5x5`) is tried before giving up.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use routine_import_core::{ExerciseConfig, MAX_SETS_PER_EXERCISE, RoutineConfig, SetConfig};
use tracing::debug;

use super::ExtractionStrategy;
use crate::parser::{ExtractionContext, normalize_text};

static PATTERNS: LazyLock<TextPatterns> = LazyLock::new(TextPatterns::new);

struct TextPatterns {
    exercise_line: Regex,
    loose_exercise_line: Regex,
    title_line: Regex,
}

impl TextPatterns {
    fn new() -> Self {
        Self {
            // [bullet] [1.] Name <sep> SETS x REPS[-REPS] [@ W kg] [- N s [rest]] [(note)]
            // A dash after the reps is read as rest when a unit or rest word
            // follows the number, otherwise as the top of a rep range.
            exercise_line: Regex::new(concat!(
                r"(?i)^\s*(?:[-*•]\s*)?(?:\d+[.)]\s*)?",
                r"(\p{L}[\p{L}\s()'’]*?)\s*[-:–]\s*",
                r"(\d+)\s*[x×]\s*(\d+)",
                r"(?:\s*[-–]\s*(\d+)\s*(?:(?:s|secs?|seconds?|seg|segundos?)\b\s*(?:rest|descanso)?|(?:rest|descanso)\b)",
                r"|\s*[-–]\s*(\d+)\b)?",
                r"(?:\s*(?:@|com|with)\s*(\d+(?:[.,]\d+)?)\s*kgs?\b)?",
                r"(?:\s*[-,]\s*(\d+)\s*(?:(?:s|secs?|seconds?|seg|segundos?)\b\s*(?:rest|descanso)?|(?:rest|descanso)\b))?",
                r"(?:\s*\(([^()]*)\))?",
            ))
            .expect("static regex must compile"),
            // Name [sep] SETS x REPS, anything may follow
            loose_exercise_line: Regex::new(
                r"(?i)^\s*(?:[-*•]\s*)?(?:\d+[.)]\s*)?(\p{L}[\p{L}\s()'’]*?)\s*[-:–]?\s*(\d+)\s*[x×]\s*(\d+)",
            )
            .expect("static regex must compile"),
            // "# Title" or "Workout: Title" / "Treino - Title"
            title_line: Regex::new(
                r"(?i)^\s*(?:#+\s*|(?:workout|routine|treino|rotina)\s*[-:–]\s*)(\S.*?)\s*$",
            )
            .expect("static regex must compile"),
        }
    }
}

/// Line-oriented extraction from free-form text.
pub struct TextStrategy;

impl ExtractionStrategy for TextStrategy {
    fn name(&self) -> &'static str {
        "text"
    }

    fn extract(&self, input: &str, ctx: &mut ExtractionContext<'_>) -> Option<RoutineConfig> {
        let text = normalize_text(input);
        let patterns = &*PATTERNS;

        let full_matches: Vec<Captures<'_>> = text
            .lines()
            .filter_map(|line| patterns.exercise_line.captures(line))
            .collect();

        let exercises: Vec<ExerciseConfig> = if full_matches.is_empty() {
            let exercises: Vec<ExerciseConfig> = text
                .lines()
                .filter_map(|line| patterns.loose_exercise_line.captures(line))
                .filter_map(|caps| loose_match(&caps, ctx))
                .collect();
            if !exercises.is_empty() {
                debug!(count = exercises.len(), "Matched exercises with loose pattern");
            }
            exercises
        } else {
            full_matches
                .iter()
                .filter_map(|caps| full_match(caps, ctx))
                .collect()
        };

        if exercises.is_empty() {
            return None;
        }

        let title = text
            .lines()
            .find_map(|line| patterns.title_line.captures(line))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| ctx.config.default_title.clone());

        let mut routine = RoutineConfig::new(title);
        routine.folder_id = ctx.default_folder();
        routine.exercises = exercises;
        Some(routine)
    }
}

fn full_match(caps: &Captures<'_>, ctx: &mut ExtractionContext<'_>) -> Option<ExerciseConfig> {
    let name = caps.get(1)?.as_str().trim();
    let first_reps: u32 = number(caps, 3)?;

    let mut set = match number::<u32>(caps, 5) {
        Some(upper) => SetConfig::rep_range(first_reps, upper),
        None => SetConfig::reps(first_reps),
    };
    if let Some(weight) = caps.get(6).and_then(|m| parse_weight(m.as_str())) {
        set = set.with_weight(weight);
    }

    let rest = number(caps, 4)
        .or_else(|| number(caps, 7))
        .unwrap_or(ctx.config.default_rest_seconds);
    let mut exercise = build(name, caps.get(2)?.as_str(), set, rest, ctx)?;
    exercise.notes = caps
        .get(8)
        .map(|m| m.as_str().trim().to_string())
        .filter(|note| !note.is_empty());
    Some(exercise)
}

fn loose_match(caps: &Captures<'_>, ctx: &mut ExtractionContext<'_>) -> Option<ExerciseConfig> {
    let name = caps.get(1)?.as_str().trim();
    let reps: u32 = number(caps, 3)?;
    let rest = ctx.config.default_rest_seconds;
    build(name, caps.get(2)?.as_str(), SetConfig::reps(reps), rest, ctx)
}

fn build(
    name: &str,
    set_count: &str,
    set: SetConfig,
    rest_seconds: u32,
    ctx: &mut ExtractionContext<'_>,
) -> Option<ExerciseConfig> {
    if name.is_empty() {
        return None;
    }
    let count = match set_count.parse::<usize>() {
        Ok(count) if count <= MAX_SETS_PER_EXERCISE => count,
        _ => {
            ctx.warn(format!(
                "exercise \"{name}\" skipped: {set_count} sets exceeds the limit of {MAX_SETS_PER_EXERCISE}"
            ));
            return None;
        }
    };
    let mut exercise = ExerciseConfig::new(name)
        .with_sets(vec![set; count])
        .with_rest_seconds(rest_seconds);
    exercise.template_id = ctx.resolve(name, None);
    Some(exercise)
}

fn number<T: std::str::FromStr>(caps: &Captures<'_>, group: usize) -> Option<T> {
    caps.get(group).and_then(|m| m.as_str().parse().ok())
}

/// Accepts both `22.5` and `22,5`.
fn parse_weight(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse().ok()
}
