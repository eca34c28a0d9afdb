//! Core routine types shared by the import pipeline.
//!
//! This crate defines the value types produced by extraction and consumed by
//! the submission client:
//!
//! - [`SetConfig`]: one planned set (kind, weight, reps or rep range, ...).
//! - [`ExerciseConfig`]: one exercise: ordered sets plus catalog metadata.
//! - [`RoutineConfig`]: a titled, ordered list of exercises.
//!
//! Wire conversion ([`RoutineConfig::to_payload`],
//! [`RoutineConfig::to_update_payload`]) produces the exact structure the
//! fitness-tracking API expects. Both paths derive the target rep range
//! through [`derive_rep_range`].
//!
//! Validation ([`validate`], [`validate_routine`]) reports advisory problems
//! that would make a routine unfit for submission.
//!
//! # Example
//!
//! ```
//! use routine_import_core::*;
//!
//! let routine = RoutineConfig::new("Push Day").with_exercise(
//!     ExerciseConfig::new("Bench Press")
//!         .with_template_id("ex1")
//!         .with_sets(vec![SetConfig::reps(10).with_weight(80.0); 3]),
//! );
//!
//! let (ok, problems) = validate(&routine);
//! assert!(ok, "{problems:?}");
//!
//! let payload = routine.to_payload();
//! let range = payload.exercises[0].sets[0].rep_range.unwrap();
//! assert_eq!((range.start, range.end), (8, 12));
//! ```

mod types;
mod validate;
mod wire;

pub use types::*;
pub use validate::{ValidationProblem, validate, validate_routine};
pub use wire::{
    ExercisePayload, RepRange, RoutineEnvelope, RoutinePayload, RoutineUpdatePayload, SetPayload,
    derive_rep_range,
};
