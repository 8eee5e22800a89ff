//! Bag-of-words TF-IDF vectorizer.
//!
//! Tokens are lowercased runs of word characters at least two characters long,
//! English stop words are dropped, and only unigrams are kept. Fitting keeps
//! at most `max_features` terms, ignoring terms present in more than `max_df`
//! of the documents. Rows are `count * idf`, L2-normalised.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hasher;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use twox_hash::XxHash64;

use crate::stop_words::is_stop_word;
use crate::{Error, Result};

/// Hyperparameters of a [`TfIdfVectorizer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorizerParams {
    pub max_features: usize,
    pub max_df: f64,
}

impl Default for VectorizerParams {
    fn default() -> Self {
        VectorizerParams {
            max_features: 5000,
            max_df: 0.7,
        }
    }
}

/// Splits `text` into lowercased word tokens, skipping stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2 && !is_stop_word(t))
        .map(str::to_owned)
        .collect()
}

/// A fitted TF-IDF vectorizer with a fixed vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    params: VectorizerParams,
    vocab: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdfVectorizer {
    /// Learns the vocabulary and IDF weights from `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S], params: VectorizerParams) -> Result<Self> {
        if documents.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let n_docs = documents.len();
        let mut term_count: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let mut seen = HashSet::new();
            for token in tokenize(doc.as_ref()) {
                *term_count.entry(token.clone()).or_insert(0) += 1;
                if seen.insert(token.clone()) {
                    *doc_freq.entry(token).or_insert(0) += 1;
                }
            }
        }

        let max_doc_count = params.max_df * n_docs as f64;
        let mut kept: Vec<(String, usize)> = term_count
            .into_iter()
            .filter(|(term, _)| doc_freq[term] as f64 <= max_doc_count)
            .collect();

        // Most frequent first, alphabetical among equals.
        kept.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        kept.truncate(params.max_features);

        let mut terms: Vec<String> = kept.into_iter().map(|(t, _)| t).collect();
        terms.sort();

        let idf = terms
            .iter()
            .map(|t| ((1.0 + n_docs as f64) / (1.0 + doc_freq[t] as f64)).ln() + 1.0)
            .collect();
        let vocab = terms.into_iter().enumerate().map(|(i, t)| (t, i)).collect();

        Ok(TfIdfVectorizer { params, vocab, idf })
    }

    /// Hyperparameters the vectorizer was fit with.
    pub fn params(&self) -> VectorizerParams {
        self.params
    }

    /// Term to column index, columns in alphabetical term order.
    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocab
    }

    /// Width of the rows produced by [`transform`](Self::transform).
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    /// Dense `documents.len() x n_features` TF-IDF matrix. Single precision,
    /// since a full corpus at 5000 columns is `rows * 20 kB`.
    pub fn transform<S: AsRef<str>>(&self, documents: &[S]) -> Array2<f32> {
        let mut x: Array2<f32> = Array2::zeros((documents.len(), self.n_features()));

        for (row, doc) in documents.iter().enumerate() {
            for token in tokenize(doc.as_ref()) {
                if let Some(&col) = self.vocab.get(&token) {
                    x[[row, col]] += 1.0;
                }
            }

            let mut r = x.row_mut(row);
            for (col, v) in r.iter_mut().enumerate() {
                *v *= self.idf[col] as f32;
            }
            let norm = r.dot(&r).sqrt();
            if norm > 0.0 {
                r.mapv_inplace(|v| v / norm);
            }
        }

        x
    }

    /// Stable hash of the vocabulary and weights; pairs a classifier with the
    /// vectorizer it was trained against.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        for (term, idx) in &self.vocab {
            hasher.write(term.as_bytes());
            hasher.write_u8(0);
            hasher.write_u64(*idx as u64);
        }
        for w in &self.idf {
            hasher.write_u64(w.to_bits());
        }
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_drops_short_tokens_and_stop_words() {
        assert_eq!(
            tokenize("The Senate passed a budget, 52-48; it's x_y!"),
            vec!["senate", "passed", "budget", "52", "48", "x_y"]
        );
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn max_df_removes_ubiquitous_terms() {
        let docs = ["budget vote", "budget senate", "budget house", "court ruling"];
        let v = TfIdfVectorizer::fit(&docs, VectorizerParams::default()).unwrap();
        // "budget" is in 3 of 4 documents, above 70%.
        assert!(!v.vocabulary().contains_key("budget"));
        assert!(v.vocabulary().contains_key("senate"));
    }

    #[test]
    fn max_features_keeps_most_frequent_in_alphabetical_columns() {
        let docs = ["zebra zebra apple", "zebra mango", "kiwi", "pear pear pear"];
        let params = VectorizerParams {
            max_features: 2,
            max_df: 1.0,
        };
        let v = TfIdfVectorizer::fit(&docs, params).unwrap();
        let terms: Vec<_> = v.vocabulary().iter().map(|(t, &i)| (t.as_str(), i)).collect();
        assert_eq!(terms, vec![("pear", 0), ("zebra", 1)]);
    }

    #[test]
    fn rows_are_unit_length_or_zero() {
        let docs = ["rain in spain", "snow in norway", "sun in egypt"];
        let v = TfIdfVectorizer::fit(&docs, VectorizerParams::default()).unwrap();
        let x = v.transform(&["rain and snow", "nothing known here"]);
        assert_eq!(x.shape(), &[2, v.n_features()]);

        let first = x.row(0);
        assert!((first.dot(&first) - 1.0).abs() < 1e-6);
        assert!(x.row(1).iter().all(|&w| w == 0.0));
    }

    #[test]
    fn matrix_is_single_precision() {
        let docs = ["rain in spain", "snow in norway", "sun in egypt"];
        let v = TfIdfVectorizer::fit(&docs, VectorizerParams::default()).unwrap();
        let x: Array2<f32> = v.transform(&docs);
        let cells = x.len();
        assert_eq!(cells, 3 * v.n_features());
        assert_eq!(std::mem::size_of_val(x.as_slice().unwrap()), cells * 4);
    }

    #[test]
    fn fitting_is_deterministic() {
        let docs = ["alpha beta gamma", "beta delta", "gamma epsilon zeta"];
        let a = TfIdfVectorizer::fit(&docs, VectorizerParams::default()).unwrap();
        let b = TfIdfVectorizer::fit(&docs, VectorizerParams::default()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());

        let other = TfIdfVectorizer::fit(&docs[..2], VectorizerParams::default()).unwrap();
        assert_ne!(a.fingerprint(), other.fingerprint());
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let docs: [&str; 0] = [];
        assert!(matches!(
            TfIdfVectorizer::fit(&docs, VectorizerParams::default()),
            Err(Error::EmptyCorpus)
        ));
    }
}
