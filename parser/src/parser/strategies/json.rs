//! JSON routine extraction.
//!
//! Accepted document shape:
//!
//! ```json
//! {
//!   "title": "Push Day",
//!   "notes": "optional",
//!   "folder_id": "optional",
//!   "exercises": [
//!     {"name": "Bench Press", "sets": 3, "reps": 10, "weight_kg": 80},
//!     {"name": "Dips", "sets": 3, "rep_range": {"start": 8, "end": 12}},
//!     {"name": "Fly", "sets": [{"type": "warmup", "reps": 15}, {"reps": 12}]}
//!   ]
//! }
//! ```
//!
//! `sets` is either a count (abbreviated form, every set identical) or a list
//! of set objects (detailed form). camelCase spellings of every key are
//! accepted as well. Numbers may arrive as `10`, `10.0` or `"10"`; values
//! that are not numbers at all are treated as absent.

use routine_import_core::{
    ExerciseConfig, MAX_SETS_PER_EXERCISE, RoutineConfig, SetConfig, SetType,
};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use super::ExtractionStrategy;
use crate::parser::{ExtractionContext, fenced_json};

/// Parses input that is itself a JSON object.
pub struct JsonStrategy;

/// Parses the JSON object inside a fenced code block.
pub struct FencedJsonStrategy;

impl ExtractionStrategy for JsonStrategy {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extract(&self, input: &str, ctx: &mut ExtractionContext<'_>) -> Option<RoutineConfig> {
        extract_json(input.trim(), ctx)
    }
}

impl ExtractionStrategy for FencedJsonStrategy {
    fn name(&self) -> &'static str {
        "fenced-json"
    }

    fn extract(&self, input: &str, ctx: &mut ExtractionContext<'_>) -> Option<RoutineConfig> {
        extract_json(fenced_json(input)?, ctx)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRepRange {
    #[serde(deserialize_with = "lenient_u32")]
    start: Option<u32>,
    #[serde(deserialize_with = "lenient_u32")]
    end: Option<u32>,
}

impl RawRepRange {
    fn bounds(&self) -> Option<(u32, u32)> {
        Some((self.start?, self.end?))
    }
}

#[derive(Debug)]
enum RawSets {
    Count(u32),
    Detailed(Vec<RawSet>),
}

impl<'de> Deserialize<'de> for RawSets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Array(items) => Ok(Self::Detailed(
                items
                    .into_iter()
                    .map(|item| serde_json::from_value(item).unwrap_or_default())
                    .collect(),
            )),
            other => number_as_u32(&other)
                .map(Self::Count)
                .ok_or_else(|| serde::de::Error::custom("sets must be a count or a list of sets")),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSet {
    #[serde(alias = "kind", alias = "set_type", alias = "setType")]
    r#type: Option<String>,
    #[serde(alias = "weightKg", alias = "weight", deserialize_with = "lenient_f64")]
    weight_kg: Option<f64>,
    #[serde(deserialize_with = "lenient_u32")]
    reps: Option<u32>,
    #[serde(alias = "repRange", deserialize_with = "lenient_range")]
    rep_range: Option<RawRepRange>,
    #[serde(alias = "repRangeStart", deserialize_with = "lenient_u32")]
    rep_range_start: Option<u32>,
    #[serde(alias = "repRangeEnd", deserialize_with = "lenient_u32")]
    rep_range_end: Option<u32>,
    #[serde(alias = "restSeconds", deserialize_with = "lenient_u32")]
    rest_seconds: Option<u32>,
    #[serde(alias = "distanceMeters", deserialize_with = "lenient_f64")]
    distance_meters: Option<f64>,
    #[serde(alias = "durationSeconds", deserialize_with = "lenient_u32")]
    duration_seconds: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawExercise {
    #[serde(alias = "title")]
    name: Option<String>,
    #[serde(
        alias = "exerciseTemplateId",
        alias = "template_id",
        alias = "templateId"
    )]
    exercise_template_id: Option<String>,
    sets: Option<RawSets>,
    #[serde(deserialize_with = "lenient_u32")]
    reps: Option<u32>,
    #[serde(alias = "repRange", deserialize_with = "lenient_range")]
    rep_range: Option<RawRepRange>,
    #[serde(alias = "weightKg", alias = "weight", deserialize_with = "lenient_f64")]
    weight_kg: Option<f64>,
    #[serde(alias = "restSeconds", alias = "rest", deserialize_with = "lenient_u32")]
    rest_seconds: Option<u32>,
    notes: Option<String>,
    #[serde(alias = "supersetId", deserialize_with = "lenient_u32")]
    superset_id: Option<u32>,
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_as_u32))
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_as_f64))
}

fn lenient_range<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<RawRepRange>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

fn number_as_f64(value: &Value) -> Option<f64> {
    let number: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Whole, non-negative numbers that fit in `u32`.
fn number_as_u32(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    let n = number_as_f64(value)?;
    if n.fract() != 0.0 || n < 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n as u32)
}

fn extract_json(raw: &str, ctx: &mut ExtractionContext<'_>) -> Option<RoutineConfig> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            debug!(error = %err, "Input is not valid JSON");
            return None;
        }
    };

    let Some(object) = value.as_object() else {
        debug!("JSON top level is not an object");
        return None;
    };
    let Some(entries) = object.get("exercises").and_then(Value::as_array) else {
        debug!("JSON object has no exercises array");
        return None;
    };

    let title = string_field(object, &["title", "name"])
        .unwrap_or_else(|| ctx.config.default_title.clone());
    let mut routine = RoutineConfig::new(title);
    if let Some(notes) = string_field(object, &["notes", "description"]) {
        routine = routine.with_notes(notes);
    }
    routine.folder_id =
        string_field(object, &["folder_id", "folderId"]).or_else(|| ctx.default_folder());

    for (position, entry) in entries.iter().enumerate() {
        let raw: RawExercise = match serde_json::from_value(entry.clone()) {
            Ok(raw) => raw,
            Err(err) => {
                ctx.warn(format!("exercise #{} skipped: {err}", position + 1));
                continue;
            }
        };
        if let Some(RawSets::Count(count)) = &raw.sets {
            if *count as usize > MAX_SETS_PER_EXERCISE {
                ctx.warn(format!(
                    "exercise #{} skipped: {count} sets exceeds the limit of {MAX_SETS_PER_EXERCISE}",
                    position + 1
                ));
                continue;
            }
        }
        match build_exercise(raw, ctx) {
            Some(exercise) => routine.exercises.push(exercise),
            None => ctx.warn(format!("exercise #{} skipped: missing name", position + 1)),
        }
    }

    Some(routine)
}

fn build_exercise(raw: RawExercise, ctx: &ExtractionContext<'_>) -> Option<ExerciseConfig> {
    let name = raw.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())?;

    let sets = match raw.sets {
        Some(RawSets::Count(count)) => {
            let template = abbreviated_set(raw.reps, raw.rep_range, raw.weight_kg, ctx);
            vec![template; count as usize]
        }
        Some(RawSets::Detailed(sets)) => sets.into_iter().map(detailed_set).collect(),
        None => Vec::new(),
    };

    let mut exercise = ExerciseConfig::new(name)
        .with_sets(sets)
        .with_rest_seconds(raw.rest_seconds.unwrap_or(ctx.config.default_rest_seconds));
    exercise.template_id = ctx.resolve(&exercise.name, raw.exercise_template_id);
    exercise.notes = raw.notes.filter(|n| !n.trim().is_empty());
    exercise.superset_id = raw.superset_id;

    Some(exercise)
}

/// One set of the abbreviated form. Missing reps fall back to the default
/// even when a rep range is given.
fn abbreviated_set(
    reps: Option<u32>,
    rep_range: Option<RawRepRange>,
    weight_kg: Option<f64>,
    ctx: &ExtractionContext<'_>,
) -> SetConfig {
    let reps = reps.unwrap_or(ctx.config.default_reps);
    let mut set = match rep_range.as_ref().and_then(RawRepRange::bounds) {
        Some((start, end)) => {
            let mut set = SetConfig::rep_range(start, end);
            set.reps = Some(reps);
            set
        }
        None => SetConfig::reps(reps),
    };
    if let Some(weight) = weight_kg {
        set = set.with_weight(weight);
    }
    set
}

fn detailed_set(raw: RawSet) -> SetConfig {
    let bounds = raw
        .rep_range
        .as_ref()
        .and_then(RawRepRange::bounds)
        .or_else(|| Some((raw.rep_range_start?, raw.rep_range_end?)));
    let mut set = match bounds {
        Some((start, end)) => SetConfig::rep_range(start, end),
        None => SetConfig::default(),
    };
    set.reps = raw.reps;
    set.kind = raw.r#type.as_deref().map_or(SetType::Normal, SetType::from_label);
    set.rest_seconds = raw.rest_seconds;
    set.duration_seconds = raw.duration_seconds;
    if let Some(weight) = raw.weight_kg {
        set = set.with_weight(weight);
    }
    if let Some(distance) = raw.distance_meters {
        set = set.with_distance(distance);
    }
    set
}

fn string_field(object: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}
