//! Input format detection.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Fenced code block holding a JSON object, with an optional language tag.
static FENCED_JSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z]*[ \t]*\r?\n?\s*(\{.*?\})\s*```")
        .expect("static regex must compile")
});

/// Shape of a raw input, in the order extraction is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum InputFormat {
    /// The whole input is a JSON object.
    Json,
    /// A JSON object inside a fenced code block.
    FencedJson,
    /// Free-form text.
    Text,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::FencedJson => write!(f, "fenced_json"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// Reports the first applicable input format.
///
/// This only looks at the shape of the input: a `Json` or `FencedJson`
/// result does not promise that the JSON is well-formed.
///
/// # Examples
///
/// ```
/// use routine_import_parser::{InputFormat, detect_format};
///
/// assert_eq!(detect_format(r#"  {"title": "A"}"#), InputFormat::Json);
/// assert_eq!(
///     detect_format("Here you go:\n```json\n{\"exercises\": []}\n```"),
///     InputFormat::FencedJson
/// );
/// assert_eq!(detect_format("- Squat: 5x5"), InputFormat::Text);
/// ```
pub fn detect_format(text: &str) -> InputFormat {
    if text.trim_start().starts_with('{') {
        InputFormat::Json
    } else if fenced_json(text).is_some() {
        InputFormat::FencedJson
    } else {
        InputFormat::Text
    }
}

/// Returns the JSON object inside the first fenced code block, if any.
pub(crate) fn fenced_json(text: &str) -> Option<&str> {
    FENCED_JSON
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
