//! # newsverify 📰🔍
//!
//! Classify a piece of news text as real or fake, with a confidence score.
//!
//! Training builds a TF-IDF bag-of-words vectorizer and a
//! [`linfa-logistic`](https://crates.io/crates/linfa-logistic) logistic
//! regression from two labeled CSV corpora. Serving loads that artifact pair
//! once, applies a fixed list of lexical red flags, and otherwise asks the
//! classifier.
//!
//! ## Features
//! - TF-IDF with English stop words, `max_df` and a 5000-term vocabulary
//! - Binary logistic regression with label + probability prediction
//! - Keyword override that always wins over the model
//! - Artifact persistence with `rmp-serde` (MessagePack) inside gzip
//! - Paired artifacts: a classifier refuses a vectorizer it was not trained with
//! - Model archive download on first start, Axum `POST /verify` endpoint
//! - Benchmarkable with [Criterion](https://crates.io/crates/criterion)
//!
//! ## Example
//! ```no_run
//! use std::path::Path;
//! use newsverify::{Corpus, NewsClassifier, NewsVerifier, TrainParams};
//!
//! # fn main() -> newsverify::Result<()> {
//! let corpus = Corpus::from_csv(Path::new("dataset/Fake.csv"), Path::new("dataset/True.csv"))?;
//! let model = NewsClassifier::train(&corpus, &TrainParams::default())?;
//! model.save(Path::new("models"), "fake_news_model.msgpack.gz", "vectorizer.msgpack.gz")?;
//!
//! let verifier = NewsVerifier::new(model);
//! let verdict = verifier.verify("You won the lottery!");
//! println!("{} ({}%)", verdict.result, verdict.confidence);
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod bootstrap;
pub mod config;
pub mod corpus;
mod error;
pub mod model;
pub mod rules;
pub mod server;
mod stop_words;
pub mod vectorizer;
pub mod verifier;

pub use config::Config;
pub use corpus::{Corpus, NewsArticle, NewsLabel};
pub use error::{Error, Result};
pub use model::{NewsClassifier, Prediction, TrainParams};
pub use verifier::{NewsVerifier, Verdict};

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::corpus::{Corpus, NewsArticle, NewsLabel};

    const FAKE_WORDS: [&str; 8] = [
        "shocking", "secret", "hoax", "exposed", "insider", "banned", "conspiracy", "viral",
    ];
    const REAL_WORDS: [&str; 8] = [
        "parliament", "ministry", "quarterly", "reported", "statement", "officials", "committee",
        "budget",
    ];

    fn articles(words: &[&str; 8], label: NewsLabel) -> Vec<NewsArticle> {
        (0..20)
            .map(|i| {
                let w = |k: usize| words[(i + k) % words.len()];
                NewsArticle::new(
                    format!("{} {}", w(0), w(1)),
                    format!("{} {} update", w(3), w(5)),
                    label,
                )
            })
            .collect()
    }

    /// Two cleanly separable classes of 20 articles each.
    pub fn sample_corpus() -> Corpus {
        Corpus {
            fake: articles(&FAKE_WORDS, NewsLabel::Fake),
            real: articles(&REAL_WORDS, NewsLabel::Real),
        }
    }
}
