use std::collections::BTreeMap;

/// Matching documents (by index ordinal) with their relevance scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredSet {
    hits: BTreeMap<usize, f32>,
}

impl ScoredSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every document of an index of `count` documents, scored 1.0.
    pub fn all(count: usize) -> Self {
        Self {
            hits: (0..count).map(|doc| (doc, 1.0)).collect(),
        }
    }

    /// Add to a document's score, inserting it when absent.
    pub fn add(&mut self, doc: usize, score: f32) {
        *self.hits.entry(doc).or_insert(0.0) += score;
    }

    /// Insert a document unless it already matched.
    pub fn insert_if_absent(&mut self, doc: usize, score: f32) {
        self.hits.entry(doc).or_insert(score);
    }

    pub fn contains(&self, doc: usize) -> bool {
        self.hits.contains_key(&doc)
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.hits.iter().map(|(doc, score)| (*doc, *score))
    }

    pub fn docs(&self) -> impl Iterator<Item = usize> + '_ {
        self.hits.keys().copied()
    }

    /// Documents in both sets; scores are summed.
    pub fn and(mut self, other: &ScoredSet) -> Self {
        self.hits.retain(|doc, _| other.hits.contains_key(doc));
        for (doc, score) in self.hits.iter_mut() {
            *score += other.hits[doc];
        }
        self
    }

    /// Documents in either set; scores of shared documents are summed.
    pub fn or(mut self, other: &ScoredSet) -> Self {
        for (doc, score) in &other.hits {
            self.add(*doc, *score);
        }
        self
    }

    /// Documents of `self` not in `other`; scores are kept.
    pub fn and_not(mut self, other: &ScoredSet) -> Self {
        self.hits.retain(|doc, _| !other.hits.contains_key(doc));
        self
    }

    /// Documents in exactly one of the sets.
    pub fn xor(self, other: &ScoredSet) -> Self {
        let mut hits: BTreeMap<usize, f32> = self
            .hits
            .iter()
            .filter(|(doc, _)| !other.hits.contains_key(doc))
            .map(|(doc, score)| (*doc, *score))
            .collect();
        for (doc, score) in &other.hits {
            if !self.hits.contains_key(doc) {
                hits.insert(*doc, *score);
            }
        }
        Self { hits }
    }

    /// Add score from `other` only to documents already in `self`.
    pub fn boost_from(mut self, other: &ScoredSet) -> Self {
        for (doc, score) in self.hits.iter_mut() {
            if let Some(extra) = other.hits.get(doc) {
                *score += extra;
            }
        }
        self
    }
}

impl FromIterator<(usize, f32)> for ScoredSet {
    fn from_iter<I: IntoIterator<Item = (usize, f32)>>(iter: I) -> Self {
        let mut set = ScoredSet::new();
        for (doc, score) in iter {
            set.add(doc, score);
        }
        set
    }
}
