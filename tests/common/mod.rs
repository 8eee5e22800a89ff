#![allow(dead_code)]

use std::path::Path;

use newsverify::config::ArtifactConfig;
use newsverify::{Corpus, NewsArticle, NewsClassifier, NewsLabel, TrainParams};

const FAKE_WORDS: [&str; 8] = [
    "shocking", "secret", "hoax", "exposed", "insider", "banned", "conspiracy", "viral",
];
const REAL_WORDS: [&str; 8] = [
    "parliament", "ministry", "quarterly", "reported", "statement", "officials", "committee",
    "budget",
];

/// A factual-sounding sentence built only from real-class vocabulary.
pub const FACTUAL: &str = "The parliament committee and ministry officials reported the \
                           quarterly budget statement after a long session";

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

pub fn sample_corpus() -> Corpus {
    Corpus {
        fake: articles(&FAKE_WORDS, NewsLabel::Fake),
        real: articles(&REAL_WORDS, NewsLabel::Real),
    }
}

/// Writes the sample corpus as `Fake.csv` and `True.csv` into `dir`.
pub fn write_sample_csvs(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let corpus = sample_corpus();
    let write = |name: &str, rows: &[NewsArticle]| {
        let path = dir.join(name);
        let mut w = csv::Writer::from_path(&path).unwrap();
        w.write_record(["title", "text", "subject", "date"]).unwrap();
        for a in rows {
            w.write_record([a.title.as_str(), a.text.as_str(), "News", "2017"])
                .unwrap();
        }
        w.flush().unwrap();
        path
    };
    (write("Fake.csv", &corpus.fake), write("True.csv", &corpus.real))
}

/// Trains on the sample corpus and saves the pair under `model_dir`.
pub fn train_into(model_dir: &Path) -> ArtifactConfig {
    let config = ArtifactConfig {
        model_dir: model_dir.to_path_buf(),
        ..ArtifactConfig::default()
    };
    let model = NewsClassifier::train(&sample_corpus(), &TrainParams::default()).unwrap();
    model
        .save(model_dir, &config.model_file, &config.vectorizer_file)
        .unwrap();
    config
}
