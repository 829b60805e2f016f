//! TF-IDF feature extraction for the supervised backend
//!
//! Unigram + bigram bag-of-words, length-normalized term frequencies,
//! smoothed IDF. Vocabulary indices follow first-seen order over the
//! training documents, so fitting is deterministic for a fixed corpus.

use std::collections::{HashMap, HashSet};

/// TF-IDF vectorizer over unigrams and adjacent-word bigrams
pub struct TfIdfVectorizer {
    /// Term -> feature index
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per feature index
    idf: Vec<f32>,
    /// Number of training documents
    n_documents: usize,
}

impl TfIdfVectorizer {
    /// Fit a vectorizer on training documents
    pub fn fit(documents: &[String]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut document_frequency: HashMap<String, usize> = HashMap::new();

        for doc in documents {
            let terms = extract_terms(doc);
            let unique: HashSet<&String> = terms.iter().collect();

            for term in &terms {
                if !vocabulary.contains_key(term) {
                    let idx = vocabulary.len();
                    vocabulary.insert(term.clone(), idx);
                }
            }
            for term in unique {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
        }

        // Smoothed IDF: log((N + 1) / (df + 1)) + 1
        let n_documents = documents.len();
        let mut idf = vec![0.0; vocabulary.len()];
        for (term, idx) in &vocabulary {
            let df = document_frequency.get(term).copied().unwrap_or(0);
            idf[*idx] = ((n_documents as f32 + 1.0) / (df as f32 + 1.0)).ln() + 1.0;
        }

        Self {
            vocabulary,
            idf,
            n_documents,
        }
    }

    /// Transform a document into a TF-IDF feature vector
    pub fn transform(&self, document: &str) -> Vec<f32> {
        let terms = extract_terms(document);
        let mut tf = vec![0.0f32; self.vocabulary.len()];

        for term in &terms {
            if let Some(&idx) = self.vocabulary.get(term) {
                tf[idx] += 1.0;
            }
        }

        let doc_length = terms.len() as f32;
        if doc_length > 0.0 {
            for count in &mut tf {
                *count /= doc_length;
            }
        }

        for (idx, value) in tf.iter_mut().enumerate() {
            *value *= self.idf[idx];
        }

        tf
    }

    /// Number of features produced by `transform`
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of documents seen during fitting
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }
}

/// Lowercased alphanumeric unigrams plus adjacent-word bigrams
fn extract_terms(text: &str) -> Vec<String> {
    let words: Vec<String> = text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect();

    let mut terms = words.clone();
    for pair in words.windows(2) {
        terms.push(format!("{} {}", pair[0], pair[1]));
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_terms_includes_bigrams() {
        let terms = extract_terms("Check my bill");
        assert!(terms.contains(&"check".to_string()));
        assert!(terms.contains(&"my bill".to_string()));
        assert_eq!(terms.len(), 5);
    }

    #[test]
    fn test_extract_terms_strips_punctuation() {
        let terms = extract_terms("won't load!");
        assert!(terms.contains(&"won".to_string()));
        assert!(terms.contains(&"load".to_string()));
    }

    #[test]
    fn test_fit_transform_dimensions() {
        let documents = vec![
            "I need to check my bill".to_string(),
            "Can I reschedule my appointment".to_string(),
        ];
        let vectorizer = TfIdfVectorizer::fit(&documents);

        assert!(vectorizer.vocabulary_size() > 0);
        assert_eq!(vectorizer.n_documents(), 2);

        let features = vectorizer.transform("check my bill");
        assert_eq!(features.len(), vectorizer.vocabulary_size());
        assert!(features.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn test_transform_unseen_terms_is_zero_vector() {
        let documents = vec!["check my bill".to_string()];
        let vectorizer = TfIdfVectorizer::fit(&documents);

        let features = vectorizer.transform("completely unrelated words");
        assert!(features.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_fit_is_deterministic() {
        let documents = vec![
            "I need to check my bill".to_string(),
            "The app won't load".to_string(),
        ];
        let a = TfIdfVectorizer::fit(&documents);
        let b = TfIdfVectorizer::fit(&documents);

        assert_eq!(
            a.transform("check the app"),
            b.transform("check the app")
        );
    }
}
