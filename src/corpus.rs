//! Labeled news corpora loaded from CSV.

use std::fmt;
use std::fs::File;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use crate::Result;

/// Seed used for every shuffle unless the caller asks for another one.
pub const DEFAULT_SEED: u64 = 42;

/// Which corpus a record came from, and what the classifier predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NewsLabel {
    Fake,
    Real,
}

impl NewsLabel {
    /// Class index fed to the classifier.
    pub fn class(self) -> usize {
        match self {
            NewsLabel::Fake => 0,
            NewsLabel::Real => 1,
        }
    }

    /// Anything other than class 1 reads as fake.
    pub fn from_class(class: usize) -> Self {
        if class == 1 {
            NewsLabel::Real
        } else {
            NewsLabel::Fake
        }
    }
}

impl fmt::Display for NewsLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NewsLabel::Fake => f.write_str("FAKE NEWS 🔴"),
            NewsLabel::Real => f.write_str("REAL NEWS 🟢"),
        }
    }
}

/// A row of a news CSV. Columns other than `title` and `text` are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    title: String,
    text: String,
}

/// A single labeled news article.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsArticle {
    pub title: String,
    pub text: String,
    pub label: NewsLabel,
}

impl NewsArticle {
    pub fn new(title: impl Into<String>, text: impl Into<String>, label: NewsLabel) -> Self {
        NewsArticle {
            title: title.into(),
            text: text.into(),
            label,
        }
    }

    /// The classifier input: title and body joined by a single space.
    pub fn document(&self) -> String {
        format!("{} {}", self.title, self.text)
    }
}

/// Reads every row of `path` and tags it with `label`.
pub fn read_csv(path: &Path, label: NewsLabel) -> Result<Vec<NewsArticle>> {
    let file = File::open(path)?;
    let mut rdr = csv::Reader::from_reader(file);

    let mut articles = vec![];
    for result in rdr.deserialize() {
        let row: CsvRow = result?;
        articles.push(NewsArticle {
            title: row.title,
            text: row.text,
            label,
        });
    }

    tracing::info!(path = %path.display(), rows = articles.len(), ?label, "Loaded corpus");
    Ok(articles)
}

/// Fake and real articles, concatenated in that order.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub fake: Vec<NewsArticle>,
    pub real: Vec<NewsArticle>,
}

impl Corpus {
    /// Loads the fake-news file as class 0 and the real-news file as class 1.
    pub fn from_csv(fake_path: &Path, real_path: &Path) -> Result<Self> {
        Ok(Corpus {
            fake: read_csv(fake_path, NewsLabel::Fake)?,
            real: read_csv(real_path, NewsLabel::Real)?,
        })
    }

    pub fn len(&self) -> usize {
        self.fake.len() + self.real.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All articles, fake first, shuffled with a fixed seed so repeated runs
    /// see the same order.
    pub fn shuffled(&self, seed: u64) -> Vec<NewsArticle> {
        let mut all: Vec<NewsArticle> = self.fake.iter().chain(&self.real).cloned().collect();
        all.shuffle(&mut StdRng::seed_from_u64(seed));
        all
    }
}

/// A helper type for holding train/test splits.
#[derive(Debug)]
pub struct DatasetSplit {
    pub train: Vec<NewsArticle>,
    pub test: Vec<NewsArticle>,
}

/// Seeded split of `data` into train and test sets based on `test_ratio`.
pub fn train_test_split(data: &[NewsArticle], test_ratio: f64, seed: u64) -> DatasetSplit {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = data.to_vec();
    data.shuffle(&mut rng);

    let test_size = ((data.len() as f64) * test_ratio.clamp(0.0, 1.0)).round() as usize;
    let test = data[..test_size].to_vec();
    let train = data[test_size..].to_vec();

    DatasetSplit { train, test }
}
