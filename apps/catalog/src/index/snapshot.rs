//! Immutable in-memory view of one committed generation
//!
//! Per field, the snapshot keeps two dictionaries:
//! - token postings (`tokenize` output, with term frequency per document)
//! - keyword postings (the whole `normalize`d value)
//!
//! Both are ordered so range queries walk a contiguous slice of terms.

use crate::index::analysis::{normalize, tokenize};
use crate::index::{Document, IndexData};
use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc: usize,
    pub term_freq: u32,
}

#[derive(Debug, Default)]
pub struct FieldPostings {
    tokens: BTreeMap<String, Vec<Posting>>,
    keywords: BTreeMap<String, Vec<usize>>,
}

impl FieldPostings {
    pub fn token(&self, token: &str) -> &[Posting] {
        self.tokens.get(token).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn keyword(&self, keyword: &str) -> &[usize] {
        self.keywords.get(keyword).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tokens(&self) -> &BTreeMap<String, Vec<Posting>> {
        &self.tokens
    }

    pub fn keywords(&self) -> &BTreeMap<String, Vec<usize>> {
        &self.keywords
    }
}

pub struct IndexSnapshot {
    generation: u64,
    documents: Vec<Document>,
    ids: HashMap<String, usize>,
    fields: HashMap<String, FieldPostings>,
    numeric_fields: BTreeSet<String>,
}

impl IndexSnapshot {
    pub fn new(data: IndexData) -> Self {
        let mut ids = HashMap::with_capacity(data.documents.len());
        let mut fields: HashMap<String, FieldPostings> = HashMap::new();

        for (doc, document) in data.documents.iter().enumerate() {
            ids.insert(document.identifier().to_string(), doc);

            for (name, values) in document.fields() {
                let postings = fields.entry(name.to_string()).or_default();

                let mut freqs: BTreeMap<String, u32> = BTreeMap::new();
                for value in values {
                    for token in tokenize(value) {
                        *freqs.entry(token).or_default() += 1;
                    }

                    let list = postings.keywords.entry(normalize(value)).or_default();
                    if list.last() != Some(&doc) {
                        list.push(doc);
                    }
                }

                for (token, term_freq) in freqs {
                    postings
                        .tokens
                        .entry(token)
                        .or_default()
                        .push(Posting { doc, term_freq });
                }
            }
        }

        Self {
            generation: data.generation,
            documents: data.documents,
            ids,
            fields,
            numeric_fields: data.numeric_fields,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn document(&self, doc: usize) -> Option<&Document> {
        self.documents.get(doc)
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn ordinal(&self, identifier: &str) -> Option<usize> {
        self.ids.get(identifier).copied()
    }

    pub fn field(&self, name: &str) -> Option<&FieldPostings> {
        self.fields.get(name)
    }

    pub fn is_numeric(&self, field: &str) -> bool {
        self.numeric_fields.contains(field)
    }

    /// `tf · (1 + ln(N / df))`
    pub fn term_score(&self, term_freq: u32, doc_freq: usize) -> f32 {
        if doc_freq == 0 {
            return 0.0;
        }
        let n = self.documents.len().max(1) as f32;
        term_freq as f32 * (1.0 + (n / doc_freq as f32).ln())
    }
}

impl From<IndexData> for IndexSnapshot {
    fn from(data: IndexData) -> Self {
        Self::new(data)
    }
}
