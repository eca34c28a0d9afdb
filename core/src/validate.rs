//! Submission-readiness checks for routines.
//!
//! Validation is advisory: it never fails, it only reports problems. Every
//! check runs independently, so one call surfaces all problems at once.
//!
//! # Examples
//!
//! ```
//! use routine_import_core::*;
//!
//! let routine = RoutineConfig::new("Push Day").with_exercise(
//!     ExerciseConfig::new("Bench Press")
//!         .with_template_id("ex1")
//!         .with_set(SetConfig::reps(10)),
//! );
//! assert!(validate_routine(&routine).is_empty());
//!
//! // Unresolved exercise without sets: two problems
//! let routine = RoutineConfig::new("Push Day").with_exercise(ExerciseConfig::new("Mystery"));
//! assert_eq!(validate_routine(&routine).len(), 2);
//! ```

use thiserror::Error;

use crate::RoutineConfig;

/// A problem that makes a routine unfit for submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationProblem {
    /// Title is empty or whitespace-only.
    #[error("routine title is required")]
    MissingTitle,
    /// Routine has no exercises.
    #[error("routine must have at least one exercise")]
    NoExercises,
    /// An exercise has no sets.
    #[error("exercise '{0}' has no sets configured")]
    EmptySets(String),
    /// Exercises whose names could not be matched to the catalog.
    #[error(
        "exercises not found in the catalog: {}. Create custom exercises or check the names.",
        .0.join(", ")
    )]
    UnresolvedExercises(Vec<String>),
}

/// Validates a routine, returning every problem found.
///
/// Unresolved exercises are reported once, as a single
/// [`ValidationProblem::UnresolvedExercises`] listing all of them.
pub fn validate_routine(routine: &RoutineConfig) -> Vec<ValidationProblem> {
    let mut problems = Vec::new();

    if routine.title.trim().is_empty() {
        problems.push(ValidationProblem::MissingTitle);
    }

    if routine.exercises.is_empty() {
        problems.push(ValidationProblem::NoExercises);
    }

    let mut unresolved = Vec::new();
    for exercise in &routine.exercises {
        if !exercise.is_resolved() {
            unresolved.push(exercise.name.clone());
        }
        if exercise.sets.is_empty() {
            problems.push(ValidationProblem::EmptySets(exercise.name.clone()));
        }
    }

    if !unresolved.is_empty() {
        problems.push(ValidationProblem::UnresolvedExercises(unresolved));
    }

    problems
}

/// Validates a routine and renders the problems as human-readable strings.
///
/// Returns `(ok, problems)` where `ok` is `true` iff `problems` is empty.
pub fn validate(routine: &RoutineConfig) -> (bool, Vec<String>) {
    let problems: Vec<String> = validate_routine(routine)
        .iter()
        .map(ToString::to_string)
        .collect();
    (problems.is_empty(), problems)
}
