//! Lexical red flags that override the classifier.

/// Substrings that mark a text as fake no matter what the model says.
pub const RED_FLAGS: &[&str] = &[
    "is dead",
    "dies",
    "killed",
    "death of",
    "miracle cure",
    "you won",
    "lottery",
    "fraud",
    "scam",
];

/// Confidence reported when a red flag fires.
pub const RED_FLAG_CONFIDENCE: f64 = 95.0;

/// True if any red flag appears anywhere in `text`, ignoring case.
pub fn is_red_flagged(text: &str) -> bool {
    red_flag(text).is_some()
}

/// The first red flag found in `text`, if any.
pub fn red_flag(text: &str) -> Option<&'static str> {
    let text = text.to_lowercase();
    RED_FLAGS.iter().copied().find(|flag| text.contains(flag))
}
