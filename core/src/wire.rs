//! Wire format expected by the fitness-tracking submission API.
//!
//! Field names and nullability follow the API exactly: every optional scalar
//! is serialized as `null`, except `rep_range`, which is omitted when no
//! range can be derived.

use serde::{Deserialize, Serialize};

use crate::{ExerciseConfig, RoutineConfig, SetConfig, SetType};

/// Inclusive target rep range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepRange {
    pub start: u32,
    pub end: u32,
}

/// Derives the rep range sent for a set.
///
/// An explicit range wins. Otherwise a fixed rep count `R` yields
/// `[max(1, R - 2), R + 2]`. Sets with neither produce `None`, and the wire
/// field is omitted.
///
/// Every payload conversion goes through this function.
///
/// # Examples
///
/// ```
/// use routine_import_core::{RepRange, SetConfig, derive_rep_range};
///
/// assert_eq!(derive_rep_range(&SetConfig::reps(10)), Some(RepRange { start: 8, end: 12 }));
/// assert_eq!(derive_rep_range(&SetConfig::reps(2)), Some(RepRange { start: 1, end: 4 }));
/// assert_eq!(derive_rep_range(&SetConfig::rep_range(6, 8)), Some(RepRange { start: 6, end: 8 }));
/// assert_eq!(derive_rep_range(&SetConfig::default()), None);
/// ```
pub fn derive_rep_range(set: &SetConfig) -> Option<RepRange> {
    if let (Some(start), Some(end)) = (set.rep_range_start, set.rep_range_end) {
        return Some(RepRange { start, end });
    }

    set.reps.map(|reps| RepRange {
        start: reps.saturating_sub(2).max(1),
        end: reps.saturating_add(2),
    })
}

/// One set on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetPayload {
    #[serde(rename = "type")]
    pub kind: SetType,
    pub weight_kg: Option<f64>,
    pub reps: Option<u32>,
    pub distance_meters: Option<f64>,
    pub duration_seconds: Option<u32>,
    pub custom_metric: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rep_range: Option<RepRange>,
}

impl From<&SetConfig> for SetPayload {
    fn from(set: &SetConfig) -> Self {
        Self {
            kind: set.kind,
            weight_kg: set.weight_kg,
            reps: set.reps,
            distance_meters: set.distance_meters,
            duration_seconds: set.duration_seconds,
            custom_metric: None,
            rep_range: derive_rep_range(set),
        }
    }
}

/// One exercise on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisePayload {
    pub exercise_template_id: Option<String>,
    pub superset_id: Option<u32>,
    pub rest_seconds: u32,
    pub notes: Option<String>,
    pub sets: Vec<SetPayload>,
}

impl From<&ExerciseConfig> for ExercisePayload {
    fn from(exercise: &ExerciseConfig) -> Self {
        Self {
            exercise_template_id: exercise.template_id.clone(),
            superset_id: exercise.superset_id,
            rest_seconds: exercise.rest_seconds,
            notes: exercise.notes.clone(),
            sets: exercise.sets.iter().map(SetPayload::from).collect(),
        }
    }
}

/// Routine creation body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutinePayload {
    pub title: String,
    pub folder_id: Option<String>,
    pub notes: Option<String>,
    pub exercises: Vec<ExercisePayload>,
}

/// Routine update body. The API does not move routines between folders on
/// update, so there is no `folder_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineUpdatePayload {
    pub title: String,
    pub notes: Option<String>,
    pub exercises: Vec<ExercisePayload>,
}

/// Request envelope: the API expects the routine under a `routine` key.
///
/// # Examples
///
/// ```
/// use routine_import_core::{RoutineConfig, RoutineEnvelope};
///
/// let body = RoutineEnvelope::new(RoutineConfig::new("A").to_payload());
/// let json = serde_json::to_value(&body).unwrap();
/// assert_eq!(json["routine"]["title"], "A");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineEnvelope<T> {
    pub routine: T,
}

impl<T> RoutineEnvelope<T> {
    pub fn new(routine: T) -> Self {
        Self { routine }
    }
}

impl RoutineConfig {
    /// Converts to the routine creation body.
    pub fn to_payload(&self) -> RoutinePayload {
        RoutinePayload {
            title: self.title.clone(),
            folder_id: self.folder_id.clone(),
            notes: self.notes.clone(),
            exercises: self.exercises.iter().map(ExercisePayload::from).collect(),
        }
    }

    /// Converts to the update-in-place body.
    pub fn to_update_payload(&self) -> RoutineUpdatePayload {
        RoutineUpdatePayload {
            title: self.title.clone(),
            notes: self.notes.clone(),
            exercises: self.exercises.iter().map(ExercisePayload::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample_routine() -> RoutineConfig {
        RoutineConfig::new("Push Day").with_folder("f1").with_exercise(
            ExerciseConfig::new("Bench Press")
                .with_template_id("ABC123")
                .with_rest_seconds(90)
                .with_set(SetConfig::reps(15).with_weight(40.0).with_kind(SetType::Warmup))
                .with_set(SetConfig::reps(10).with_weight(80.0))
                .with_set(SetConfig::rep_range(6, 8).with_weight(90.0)),
        )
    }

    #[test]
    fn test_set_payload_derives_range_from_reps() {
        let payload = SetPayload::from(&SetConfig::reps(10).with_weight(80.0));
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "normal");
        assert_eq!(value["reps"], 10);
        assert_eq!(value["weight_kg"], 80.0);
        assert_eq!(value["rep_range"], json!({"start": 8, "end": 12}));
        assert!(value["custom_metric"].is_null());
    }

    #[test]
    fn test_set_payload_omits_range_when_not_derivable() {
        let set = SetConfig::default().with_duration(60);
        let value = serde_json::to_value(SetPayload::from(&set)).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("rep_range"));
        assert!(object["reps"].is_null());
        assert_eq!(object["duration_seconds"], 60);
    }

    #[test]
    fn test_low_rep_range_is_clamped_to_one() {
        assert_eq!(
            derive_rep_range(&SetConfig::reps(1)),
            Some(RepRange { start: 1, end: 3 })
        );
        assert_eq!(
            derive_rep_range(&SetConfig::reps(0)),
            Some(RepRange { start: 1, end: 2 })
        );
    }

    #[test]
    fn test_exercise_payload_preserves_set_order() {
        let payload = sample_routine().to_payload();
        let kinds: Vec<SetType> = payload.exercises[0].sets.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SetType::Warmup, SetType::Normal, SetType::Normal]);
        assert_eq!(payload.exercises[0].exercise_template_id.as_deref(), Some("ABC123"));
        assert_eq!(payload.exercises[0].rest_seconds, 90);
    }

    #[test]
    fn test_payload_serializes_nulls_for_missing_fields() {
        let routine = RoutineConfig::new("A").with_exercise(ExerciseConfig::new("Row"));
        let value = serde_json::to_value(routine.to_payload()).unwrap();
        assert!(value["folder_id"].is_null());
        assert!(value["notes"].is_null());
        assert!(value["exercises"][0]["exercise_template_id"].is_null());
        assert!(value["exercises"][0]["superset_id"].is_null());
    }

    #[test]
    fn test_update_payload_drops_folder_and_shares_sets() {
        let routine = sample_routine();
        let create = routine.to_payload();
        let update = routine.to_update_payload();

        let value = serde_json::to_value(&update).unwrap();
        assert!(!value.as_object().unwrap().contains_key("folder_id"));
        assert_eq!(create.exercises, update.exercises);
    }
}
