//! Cheap check for whether a chat message proposes a workout.

use std::sync::LazyLock;

use regex::Regex;

static SIGNALS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        // 3x10, 4 x 8-12
        Regex::new(r"(?i)\b\d+\s*[x×]\s*\d+").expect("static regex must compile"),
        Regex::new(r"(?i)\b\d+\s*(?:sets?|séries?|series)\b").expect("static regex must compile"),
        Regex::new(r"(?i)\b(?:reps?|repetitions?|repetições|repeticoes|repetição)\b")
            .expect("static regex must compile"),
        Regex::new(concat!(
            r"(?i)\b(?:bench|squat|deadlift|row|press|curl|pulldown|pull-?up|lunge|dips?",
            r"|supino|agachamento|remada|levantamento|rosca|puxada|desenvolvimento|leg press)\b",
        ))
        .expect("static regex must compile"),
    ]
});

/// Returns `true` when `text` shows at least two independent signs of a
/// workout plan: an `NxR` prescription, set counts, rep wording, or a known
/// lift name.
///
/// # Examples
///
/// ```
/// use routine_import_parser::looks_like_routine_suggestion;
///
/// assert!(looks_like_routine_suggestion("Try bench press 3x10 today"));
/// assert!(looks_like_routine_suggestion("Faça 4 séries de 12 repetições de supino"));
/// assert!(!looks_like_routine_suggestion("Rest is important for recovery"));
/// assert!(!looks_like_routine_suggestion("I did squats yesterday"));
/// ```
pub fn looks_like_routine_suggestion(text: &str) -> bool {
    SIGNALS.iter().filter(|signal| signal.is_match(text)).count() >= 2
}
