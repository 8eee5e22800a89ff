//! The request-level contract: trim, validate, check red flags, classify.

use serde::{Serialize, Serializer};

use crate::corpus::NewsLabel;
use crate::model::NewsClassifier;
use crate::rules::{RED_FLAG_CONFIDENCE, red_flag};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter text";

/// What `POST /verify` answers with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub result: String,
    /// Percentage in `[0, 100]`, rounded to two decimals.
    #[serde(serialize_with = "serialize_confidence")]
    pub confidence: f64,
}

impl Verdict {
    fn empty_input() -> Self {
        Verdict {
            result: EMPTY_INPUT_MESSAGE.to_owned(),
            confidence: 0.0,
        }
    }

    fn labeled(label: NewsLabel, confidence: f64) -> Self {
        Verdict {
            result: label.to_string(),
            confidence,
        }
    }
}

/// Whole numbers go out as integers (`95`, not `95.0`).
fn serialize_confidence<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && (0.0..=100.0).contains(value) {
        serializer.serialize_u64(*value as u64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Two decimals, rounded on the exact decimal value with ties to even.
fn round2(x: f64) -> f64 {
    format!("{x:.2}").parse().unwrap_or(x)
}

/// Holds the loaded artifact pair for the life of the process.
pub struct NewsVerifier {
    classifier: NewsClassifier,
}

impl NewsVerifier {
    /// Wraps an already loaded and pair-checked classifier.
    pub fn new(classifier: NewsClassifier) -> Self {
        NewsVerifier { classifier }
    }

    /// The model behind the non-override path.
    pub fn classifier(&self) -> &NewsClassifier {
        &self.classifier
    }

    pub fn verify(&self, text: &str) -> Verdict {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!("Empty input");
            return Verdict::empty_input();
        }

        if let Some(flag) = red_flag(text) {
            tracing::debug!(flag, "Red flag override");
            return Verdict::labeled(NewsLabel::Fake, RED_FLAG_CONFIDENCE);
        }

        let prediction = self.classifier.predict_with_proba(text);
        let confidence = round2(prediction.confidence() * 100.0);
        tracing::debug!(label = ?prediction.label, confidence, "Classified");
        Verdict::labeled(prediction.label, confidence)
    }
}
