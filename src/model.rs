//! The fitted artifact pair: a TF-IDF vectorizer and the logistic classifier
//! trained on its feature space.

use std::path::Path;

use linfa::prelude::*;
use linfa_logistic::{FittedLogisticRegression, LogisticRegression};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::artifact;
use crate::corpus::{Corpus, DEFAULT_SEED, NewsArticle, NewsLabel};
use crate::vectorizer::{TfIdfVectorizer, VectorizerParams};
use crate::{Error, Result};

/// Hyperparameters for a full training run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainParams {
    pub seed: u64,
    pub vectorizer: VectorizerParams,
    /// L2 penalty of the logistic regression.
    pub alpha: f64,
    pub max_iterations: u64,
}

impl Default for TrainParams {
    fn default() -> Self {
        TrainParams {
            seed: DEFAULT_SEED,
            vectorizer: VectorizerParams::default(),
            alpha: 1.0,
            max_iterations: 1000,
        }
    }
}

/// The persisted classifier, tagged with the vectorizer it was fit against.
#[derive(Serialize, Deserialize)]
pub struct ClassifierArtifact {
    vectorizer_fingerprint: u64,
    model: FittedLogisticRegression<f32, usize>,
}

/// A single prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: NewsLabel,
    pub p_fake: f64,
    pub p_real: f64,
}

impl Prediction {
    /// Probability of the more likely class.
    pub fn confidence(&self) -> f64 {
        self.p_fake.max(self.p_real)
    }
}

/// Vectorizer and classifier, always fit and loaded together.
pub struct NewsClassifier {
    vectorizer: TfIdfVectorizer,
    classifier: ClassifierArtifact,
}

impl NewsClassifier {
    /// Shuffles the corpus with `params.seed`, fits the vectorizer on
    /// `title + " " + text` and then the classifier on its output.
    pub fn train(corpus: &Corpus, params: &TrainParams) -> Result<Self> {
        if corpus.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let articles = corpus.shuffled(params.seed);
        let documents: Vec<String> = articles.iter().map(NewsArticle::document).collect();
        let labels: Array1<usize> = articles.iter().map(|a| a.label.class()).collect();

        let vectorizer = TfIdfVectorizer::fit(&documents, params.vectorizer)?;
        let x = vectorizer.transform(&documents);
        tracing::info!(
            documents = documents.len(),
            features = vectorizer.n_features(),
            "Fitted vectorizer"
        );

        let dataset = Dataset::new(x, labels);
        let model = LogisticRegression::default()
            .alpha(params.alpha as f32)
            .max_iterations(params.max_iterations)
            .with_intercept(true)
            .fit(&dataset)?;
        tracing::info!("Fitted logistic classifier");

        Ok(NewsClassifier {
            classifier: ClassifierArtifact {
                vectorizer_fingerprint: vectorizer.fingerprint(),
                model,
            },
            vectorizer,
        })
    }

    /// The vectorizer this classifier's feature space comes from.
    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    /// Learned weights, one per vocabulary column.
    pub fn coefficients(&self) -> &Array1<f32> {
        self.classifier.model.params()
    }

    /// Bias term of the decision function.
    pub fn intercept(&self) -> f32 {
        self.classifier.model.intercept()
    }

    /// Hard label plus the probability of each class.
    pub fn predict_with_proba(&self, text: &str) -> Prediction {
        let x = self.vectorizer.transform(&[text]);
        let model = &self.classifier.model;

        let p_pos = f64::from(model.predict_probabilities(&x)[0]);
        let p_real = if model.labels().pos.class == NewsLabel::Real.class() {
            p_pos
        } else {
            1.0 - p_pos
        };
        let label = NewsLabel::from_class(model.predict(&x)[0]);

        Prediction {
            label,
            p_fake: 1.0 - p_real,
            p_real,
        }
    }

    /// Share of `articles` whose predicted label matches their own.
    pub fn evaluate_on(&self, articles: &[NewsArticle]) -> f64 {
        if articles.is_empty() {
            return 0.0;
        }
        let correct = articles
            .iter()
            .filter(|a| self.predict_with_proba(&a.document()).label == a.label)
            .count();
        correct as f64 / articles.len() as f64
    }

    /// Writes both artifacts. The directory is created if missing.
    pub fn save(&self, dir: &Path, model_file: &str, vectorizer_file: &str) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        let model_path = dir.join(model_file);
        let vectorizer_path = dir.join(vectorizer_file);

        artifact::save(&model_path, &self.classifier)?;
        artifact::save(&vectorizer_path, &self.vectorizer)?;
        tracing::info!(
            model = %model_path.display(),
            vectorizer = %vectorizer_path.display(),
            "Saved artifacts"
        );
        Ok(())
    }

    /// Loads a pair and refuses it unless the classifier was trained against
    /// this exact vectorizer.
    pub fn load(model_path: &Path, vectorizer_path: &Path) -> Result<Self> {
        let classifier: ClassifierArtifact = artifact::load(model_path)?;
        let vectorizer: TfIdfVectorizer = artifact::load(vectorizer_path)?;

        let found = vectorizer.fingerprint();
        if classifier.vectorizer_fingerprint != found {
            return Err(Error::ArtifactMismatch {
                expected: classifier.vectorizer_fingerprint,
                found,
            });
        }

        tracing::info!(
            model = %model_path.display(),
            vectorizer = %vectorizer_path.display(),
            features = vectorizer.n_features(),
            "Loaded artifacts"
        );
        Ok(NewsClassifier {
            vectorizer,
            classifier,
        })
    }
}
