//! Routine type definitions.
//!
//! These are the tagged value types every extractor produces. Optional
//! fields are explicit `Option`s so omission, null and default stay
//! distinguishable all the way to the wire format.

use serde::{Deserialize, Serialize};

/// Title given to routines whose source text carries no recognizable title.
pub const DEFAULT_ROUTINE_TITLE: &str = "Imported Routine";

/// Rest between sets when the source does not specify one.
pub const DEFAULT_REST_SECONDS: u32 = 60;

/// Reps assumed by the abbreviated JSON form (`"sets": 3`) without `reps`.
pub const DEFAULT_REPS: u32 = 10;

/// Largest set count accepted for one exercise. Extractors skip entries
/// asking for more.
pub const MAX_SETS_PER_EXERCISE: usize = 100;

/// Kind of set, as understood by the fitness-tracking API.
///
/// # Examples
///
/// ```
/// use routine_import_core::SetType;
///
/// assert_eq!(SetType::default(), SetType::Normal);
/// assert_eq!(SetType::from_label("Warm-Up"), SetType::Warmup);
/// assert_eq!(SetType::from_label("something else"), SetType::Normal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SetType {
    /// Regular working set (the default).
    #[default]
    Normal,
    /// Warm-up set.
    Warmup,
    /// Drop set.
    Dropset,
    /// Set taken to failure.
    Failure,
}

impl SetType {
    /// Parses a free-form set label, falling back to [`SetType::Normal`].
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_' | ' '))
            .collect();
        match normalized.as_str() {
            "warmup" | "aquecimento" => Self::Warmup,
            "dropset" | "drop" => Self::Dropset,
            "failure" | "falha" => Self::Failure,
            _ => Self::Normal,
        }
    }

    /// Returns the wire label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warmup => "warmup",
            Self::Dropset => "dropset",
            Self::Failure => "failure",
        }
    }
}

impl std::fmt::Display for SetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One performed or planned set.
///
/// Either `reps` or the `rep_range_start`/`rep_range_end` pair is the primary
/// rep descriptor. Use [`SetConfig::reps`] or [`SetConfig::rep_range`] to
/// construct one, then chain builder methods.
///
/// # Examples
///
/// ```
/// use routine_import_core::{SetConfig, SetType};
///
/// let working = SetConfig::reps(8).with_weight(100.0);
/// assert_eq!(working.reps, Some(8));
/// assert_eq!(working.weight_kg, Some(100.0));
///
/// let warmup = SetConfig::rep_range(12, 15).with_kind(SetType::Warmup);
/// assert!(warmup.has_rep_range());
/// assert_eq!(warmup.reps, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetConfig {
    /// Set kind
    #[serde(rename = "type")]
    pub kind: SetType,
    /// Load in kilograms (non-negative)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Fixed rep count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    /// Lower bound of the target rep range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rep_range_start: Option<u32>,
    /// Upper bound of the target rep range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rep_range_end: Option<u32>,
    /// Rest after this set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<u32>,
    /// Distance for cardio sets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    /// Duration for timed sets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
}

impl SetConfig {
    /// Creates a normal set with a fixed rep count.
    pub fn reps(reps: u32) -> Self {
        Self {
            reps: Some(reps),
            ..Default::default()
        }
    }

    /// Creates a normal set targeting an inclusive rep range.
    ///
    /// Bounds given in descending order are swapped so that
    /// `rep_range_start <= rep_range_end` always holds.
    ///
    /// # Examples
    ///
    /// ```
    /// use routine_import_core::SetConfig;
    ///
    /// let set = SetConfig::rep_range(12, 8);
    /// assert_eq!(set.rep_range_start, Some(8));
    /// assert_eq!(set.rep_range_end, Some(12));
    /// ```
    pub fn rep_range(start: u32, end: u32) -> Self {
        Self {
            rep_range_start: Some(start.min(end)),
            rep_range_end: Some(start.max(end)),
            ..Default::default()
        }
    }

    /// Sets the load. Negative or non-finite weights are discarded.
    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight_kg = (weight_kg.is_finite() && weight_kg >= 0.0).then_some(weight_kg);
        self
    }

    /// Sets the set kind.
    pub fn with_kind(mut self, kind: SetType) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the per-set rest.
    pub fn with_rest(mut self, rest_seconds: u32) -> Self {
        self.rest_seconds = Some(rest_seconds);
        self
    }

    /// Sets the distance.
    pub fn with_distance(mut self, distance_meters: f64) -> Self {
        self.distance_meters = Some(distance_meters);
        self
    }

    /// Sets the duration.
    pub fn with_duration(mut self, duration_seconds: u32) -> Self {
        self.duration_seconds = Some(duration_seconds);
        self
    }

    /// Returns `true` when both rep range bounds are present.
    pub fn has_rep_range(&self) -> bool {
        self.rep_range_start.is_some() && self.rep_range_end.is_some()
    }
}

/// One exercise within a routine.
///
/// `sets` keeps extraction order: warm-up sets listed first stay first on
/// the wire.
///
/// # Examples
///
/// ```
/// use routine_import_core::{ExerciseConfig, SetConfig, DEFAULT_REST_SECONDS};
///
/// let exercise = ExerciseConfig::new("Lat Pulldown")
///     .with_sets(vec![SetConfig::reps(12); 3]);
/// assert_eq!(exercise.rest_seconds, DEFAULT_REST_SECONDS);
/// assert!(!exercise.is_resolved());
///
/// let exercise = exercise.with_template_id("ex3");
/// assert!(exercise.is_resolved());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseConfig {
    /// Name as extracted from the source text
    pub name: String,
    /// Catalog identifier, `None` while unresolved
    #[serde(default)]
    pub template_id: Option<String>,
    /// Ordered sets
    #[serde(default)]
    pub sets: Vec<SetConfig>,
    /// Rest between sets
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: u32,
    /// Free-form notes
    #[serde(default)]
    pub notes: Option<String>,
    /// Superset grouping key
    #[serde(default)]
    pub superset_id: Option<u32>,
}

fn default_rest_seconds() -> u32 {
    DEFAULT_REST_SECONDS
}

impl ExerciseConfig {
    /// Creates an unresolved exercise with no sets and the default rest.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template_id: None,
            sets: Vec::new(),
            rest_seconds: DEFAULT_REST_SECONDS,
            notes: None,
            superset_id: None,
        }
    }

    /// Sets the catalog identifier.
    pub fn with_template_id(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    /// Replaces the set list.
    pub fn with_sets(mut self, sets: Vec<SetConfig>) -> Self {
        self.sets = sets;
        self
    }

    /// Appends one set.
    pub fn with_set(mut self, set: SetConfig) -> Self {
        self.sets.push(set);
        self
    }

    /// Sets the rest between sets.
    pub fn with_rest_seconds(mut self, rest_seconds: u32) -> Self {
        self.rest_seconds = rest_seconds;
        self
    }

    /// Adds notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Places the exercise in a superset group.
    pub fn with_superset(mut self, superset_id: u32) -> Self {
        self.superset_id = Some(superset_id);
        self
    }

    /// Returns `true` when a catalog identifier is present.
    pub fn is_resolved(&self) -> bool {
        self.template_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    }
}

/// A full parsed routine.
///
/// Produced by extraction, optionally edited by a human, then converted to
/// the wire format with [`RoutineConfig::to_payload`]. It has no
/// persistence of its own.
///
/// # Examples
///
/// ```
/// use routine_import_core::*;
///
/// let routine = RoutineConfig::default()
///     .with_title("Leg Day")
///     .with_notes("Focus on depth")
///     .with_exercise(ExerciseConfig::new("Squat").with_sets(vec![SetConfig::reps(5); 5]))
///     .with_exercise(ExerciseConfig::new("Leg Curl").with_template_id("ex9"));
///
/// assert_eq!(routine.title, "Leg Day");
/// assert_eq!(routine.total_sets(), 5);
/// assert_eq!(routine.unresolved_exercises(), vec!["Squat"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineConfig {
    /// Routine title
    pub title: String,
    /// Ordered exercises
    #[serde(default)]
    pub exercises: Vec<ExerciseConfig>,
    /// Destination folder in the external service
    #[serde(default)]
    pub folder_id: Option<String>,
    /// Routine-level notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl Default for RoutineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROUTINE_TITLE)
    }
}

impl RoutineConfig {
    /// Creates an empty routine with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            exercises: Vec::new(),
            folder_id: None,
            notes: None,
        }
    }

    /// Replaces the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Replaces the notes. Blank notes clear the field.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        let notes = notes.into();
        self.notes = (!notes.trim().is_empty()).then_some(notes);
        self
    }

    /// Sets the destination folder.
    pub fn with_folder(mut self, folder_id: impl Into<String>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    /// Appends an exercise.
    pub fn with_exercise(mut self, exercise: ExerciseConfig) -> Self {
        self.exercises.push(exercise);
        self
    }

    /// Names of exercises without a catalog identifier, in routine order.
    pub fn unresolved_exercises(&self) -> Vec<&str> {
        self.exercises
            .iter()
            .filter(|exercise| !exercise.is_resolved())
            .map(|exercise| exercise.name.as_str())
            .collect()
    }

    /// Total number of sets across all exercises.
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|exercise| exercise.sets.len()).sum()
    }
}
