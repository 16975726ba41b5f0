//! In-memory BM25+ ranking over starred repositories.
//!
//! Documents live in a single arena indexed by [`DocId`]; the inverted index and the
//! id lookup hold only those integer keys. Ingestion records weighted term counts,
//! [`RepositorySearchEngine::consolidate`] turns them into per-token scores, and
//! [`RepositorySearchEngine::search`] sums the precomputed scores of the query tokens.

use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::config::SearchConfig;
use crate::index::{DocId, Document, Field, IndexStats, Repository, SearchHit, SearchOptions};
use crate::tokenizer::tokenize;

#[derive(Debug, Default)]
pub struct RepositorySearchEngine {
    config: SearchConfig,
    documents: Vec<Document>,
    ids: HashMap<String, DocId>,
    /// Postings sets, token -> documents containing it.
    inverted_index: HashMap<String, BTreeSet<DocId>>,
    document_frequency: HashMap<String, usize>,
    inverse_document_frequency: HashMap<String, f64>,
    total_corpus_length: f64,
    average_document_length: f64,
    consolidated: bool,
}

impl RepositorySearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SearchConfig) -> Result<Self> {
        config.validate().context("invalid search config")?;
        Ok(Self { config, ..Self::default() })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Drop every document and all corpus statistics. The configuration is kept.
    pub fn reset(&mut self) {
        self.documents.clear();
        self.ids.clear();
        self.inverted_index.clear();
        self.document_frequency.clear();
        self.inverse_document_frequency.clear();
        self.total_corpus_length = 0.0;
        self.average_document_length = 0.0;
        self.consolidated = false;
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Repository> {
        self.ids.get(id).map(|&doc_id| &self.documents[doc_id].repository)
    }

    /// Ingest one repository. A repository whose `owner/name` is already indexed is ignored.
    ///
    /// Scores are not refreshed until the next [`consolidate`](Self::consolidate).
    pub fn add(&mut self, repository: Repository) {
        let id = repository.id();
        if self.ids.contains_key(&id) {
            tracing::debug!(%id, "repository already indexed, skipping");
            return;
        }

        let doc_id = self.documents.len();
        let mut doc = Document::new(id.clone(), repository);
        for field in Field::ALL {
            let weight = self.config.field_weights.get(field);
            let text = doc.repository.field_text(field);
            if weight <= 0.0 || text.is_empty() {
                continue;
            }
            let limit = match field {
                Field::Readme => self.config.max_readme_tokens,
                _ => None,
            };

            let mut count = 0usize;
            for token in tokenize(text, limit) {
                count += 1;
                *doc.term_frequency.entry(token.clone()).or_insert(0.0) += weight;
                self.inverted_index.entry(token).or_default().insert(doc_id);
            }
            doc.length += count as f64 * weight;
        }

        self.total_corpus_length += doc.length;
        self.ids.insert(id, doc_id);
        self.documents.push(doc);
        self.consolidated = false;
    }

    /// Recompute corpus statistics and every document's per-token scores from the raw
    /// weighted counts. Safe to call repeatedly; does nothing on an empty engine.
    pub fn consolidate(&mut self) {
        let n = self.documents.len();
        if n == 0 {
            return;
        }
        let num_docs = n as f64;
        self.average_document_length = self.total_corpus_length / num_docs;

        self.document_frequency.clear();
        self.inverse_document_frequency.clear();
        for (token, postings) in &self.inverted_index {
            let df = postings.len();
            // k is added inside the logarithm, not outside it.
            let idf = ((num_docs - df as f64 + 0.5) / (df as f64 + 0.5) + self.config.k).ln();
            self.document_frequency.insert(token.clone(), df);
            self.inverse_document_frequency.insert(token.clone(), idf);
        }

        let SearchConfig { k1, b, delta, .. } = self.config;
        let avg_len = self.average_document_length;
        let idf = &self.inverse_document_frequency;
        for doc in &mut self.documents {
            let normalization =
                if avg_len == 0.0 { 1.0 } else { 1.0 - b + b * (doc.length / avg_len) };
            doc.scores = doc
                .term_frequency
                .iter()
                .filter(|(_, freq)| **freq > 0.0)
                .filter_map(|(token, &freq)| {
                    let idf = *idf.get(token)?;
                    let denominator = freq + k1 * normalization;
                    if denominator == 0.0 {
                        return None;
                    }
                    let base_tf = freq * (k1 + 1.0) / denominator;
                    Some((token.clone(), (base_tf + delta) * idf))
                })
                .collect();
        }

        self.consolidated = true;
        tracing::debug!(
            num_docs = n,
            num_terms = self.inverted_index.len(),
            avg_len,
            "consolidated index"
        );
    }

    /// Rank documents against free-text keywords.
    ///
    /// Keywords are split with the ingestion tokenizer, capped at `max_keywords` tokens and
    /// deduplicated, so repeating a term never raises its weight. Documents are ordered by
    /// descending score; equal scores keep insertion order.
    ///
    /// # Panics
    ///
    /// Panics if a posting refers to a document missing from the arena, which the public API
    /// cannot produce.
    pub fn search<S: AsRef<str>>(
        &self,
        keywords: &[S],
        options: SearchOptions,
    ) -> Vec<SearchHit<'_>> {
        if self.documents.is_empty() {
            return vec![];
        }
        let tokens = self.normalize_keywords(keywords);
        if tokens.is_empty() {
            return vec![];
        }

        let mut accumulated: HashMap<DocId, (f64, Vec<String>)> = HashMap::new();
        for token in &tokens {
            let Some(postings) = self.inverted_index.get(token) else { continue };
            for &doc_id in postings {
                let doc = self.documents.get(doc_id).unwrap_or_else(|| {
                    panic!("posting for {token:?} points at missing document {doc_id}")
                });
                let Some(&score) = doc.scores.get(token) else { continue };
                let entry = accumulated.entry(doc_id).or_insert((0.0, Vec::new()));
                entry.0 += score;
                entry.1.push(token.clone());
            }
        }

        let mut ranked: Vec<(DocId, f64, Vec<String>)> = accumulated
            .into_iter()
            .filter(|(_, (score, _))| *score != 0.0)
            .map(|(doc_id, (score, matched))| (doc_id, score, matched))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(options.limit.max(1));

        ranked
            .into_iter()
            .map(|(doc_id, score, matched_tokens)| {
                let doc = &self.documents[doc_id];
                SearchHit { id: &doc.id, repository: &doc.repository, score, matched_tokens }
            })
            .collect()
    }

    /// Trim, tokenize and flatten keywords, keep the first `max_keywords` tokens, then drop
    /// repeats.
    fn normalize_keywords<S: AsRef<str>>(&self, keywords: &[S]) -> Vec<String> {
        let mut seen = HashSet::new();
        keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .flat_map(|k| tokenize(k, None))
            .take(self.config.max_keywords)
            .filter(|token| seen.insert(token.clone()))
            .collect()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            num_docs: self.documents.len(),
            num_terms: self.inverted_index.len(),
            total_length: self.total_corpus_length,
            average_length: self.average_document_length,
            consolidated: self.consolidated,
        }
    }

    /// Number of documents containing `token` as of the last consolidation.
    pub fn document_frequency(&self, token: &str) -> Option<usize> {
        self.document_frequency.get(token).copied()
    }

    /// IDF of `token` as of the last consolidation.
    pub fn inverse_document_frequency(&self, token: &str) -> Option<f64> {
        self.inverse_document_frequency.get(token).copied()
    }
}
