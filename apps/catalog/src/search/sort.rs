//! Result ordering

use crate::index::analysis::normalize;
use crate::index::IndexSnapshot;
use crate::indexer::NULL_VALUE;
use crate::search::{ScoredSet, SortField};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, PartialOrd)]
enum SortKey {
    Number(f64),
    Text(String),
}

/// Order matching documents.
///
/// With a sort field, documents are ordered by the field's first value
/// (numerically for numeric fields), documents without a usable value last and ties
/// broken by index order; descending is the exact reverse of ascending.
/// Without one, by score descending then index order.
pub fn order_hits(
    hits: &ScoredSet,
    sort: Option<&SortField>,
    snapshot: &IndexSnapshot,
) -> Vec<usize> {
    let Some(sort) = sort else {
        let mut scored: Vec<(usize, f32)> = hits.iter().collect();
        scored.sort_by(|a, b| {
            b.1.total_cmp(&a.1).then(a.0.cmp(&b.0))
        });
        return scored.into_iter().map(|(doc, _)| doc).collect();
    };

    let numeric = snapshot.is_numeric(&sort.field);
    let mut keyed: Vec<(usize, Option<SortKey>)> = hits
        .docs()
        .map(|doc| (doc, sort_key(snapshot, doc, &sort.field, numeric)))
        .collect();

    keyed.sort_by(|(a_doc, a_key), (b_doc, b_key)| {
        compare_keys(a_key.as_ref(), b_key.as_ref()).then(a_doc.cmp(b_doc))
    });

    let mut ordered: Vec<usize> = keyed.into_iter().map(|(doc, _)| doc).collect();
    if sort.descending {
        ordered.reverse();
    }
    ordered
}

/// The unresolved-value sentinel and non-finite numbers count as missing.
fn sort_key(snapshot: &IndexSnapshot, doc: usize, field: &str, numeric: bool) -> Option<SortKey> {
    let value = snapshot.document(doc)?.first_value(field)?;
    if value.trim() == NULL_VALUE {
        return None;
    }
    if numeric {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(SortKey::Number)
    } else {
        Some(SortKey::Text(normalize(value)))
    }
}

fn compare_keys(a: Option<&SortKey>, b: Option<&SortKey>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Document, IndexData};

    fn snapshot() -> IndexSnapshot {
        IndexSnapshot::new(IndexData {
            generation: 1,
            numeric_fields: ["Depth".to_string()].into_iter().collect(),
            documents: vec![
                Document::new("a").with_field("Title", "beta").with_field("Depth", "20"),
                Document::new("b").with_field("Depth", "5"),
                Document::new("c").with_field("Title", "Alpha").with_field("Depth", "100"),
                Document::new("d").with_field("Title", "beta"),
            ],
        })
    }

    #[test]
    fn sorts_text_with_missing_last_and_ties_by_index_order() {
        let snapshot = snapshot();
        let hits = ScoredSet::all(4);
        let asc = order_hits(&hits, Some(&SortField::ascending("Title")), &snapshot);
        assert_eq!(asc, [2, 0, 3, 1]);

        let desc = order_hits(&hits, Some(&SortField::descending("Title")), &snapshot);
        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(desc, reversed);
    }

    #[test]
    fn sorts_numeric_fields_as_numbers() {
        let snapshot = snapshot();
        let hits = ScoredSet::all(4);
        let asc = order_hits(&hits, Some(&SortField::ascending("Depth")), &snapshot);
        assert_eq!(asc, [1, 0, 2, 3]);
    }

    #[test]
    fn non_finite_numbers_sort_as_missing() {
        let documents = (0..200)
            .map(|i| {
                let depth = if i % 3 == 0 {
                    "NaN".to_string()
                } else {
                    (200 - i).to_string()
                };
                Document::new(format!("doc-{i}")).with_field("Depth", depth)
            })
            .collect();
        let snapshot = IndexSnapshot::new(IndexData {
            generation: 1,
            numeric_fields: ["Depth".to_string()].into_iter().collect(),
            documents,
        });
        let hits = ScoredSet::all(200);

        let asc = order_hits(&hits, Some(&SortField::ascending("Depth")), &snapshot);
        assert_eq!(asc.len(), 200);
        let (valued, missing) = asc.split_at(133);
        assert!(valued.iter().all(|doc| doc % 3 != 0));
        assert!(missing.iter().all(|doc| doc % 3 == 0));
        assert!(missing.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(asc[0], 199);

        let desc = order_hits(&hits, Some(&SortField::descending("Depth")), &snapshot);
        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(desc, reversed);
    }

    #[test]
    fn null_sentinel_sorts_last_on_text_fields() {
        let snapshot = IndexSnapshot::new(IndexData {
            generation: 1,
            numeric_fields: Default::default(),
            documents: vec![
                Document::new("a").with_field("Abstract", "ocean"),
                Document::new("b").with_field("Abstract", NULL_VALUE),
                Document::new("c").with_field("Abstract", "mud"),
                Document::new("d").with_field("Abstract", "plankton"),
            ],
        });
        let hits = ScoredSet::all(4);
        let asc = order_hits(&hits, Some(&SortField::ascending("Abstract")), &snapshot);
        assert_eq!(asc, [2, 0, 3, 1]);
    }

    #[test]
    fn relevance_order_without_sort() {
        let snapshot = snapshot();
        let hits: ScoredSet = [(0, 1.0), (1, 3.0), (2, 1.0)].into_iter().collect();
        assert_eq!(order_hits(&hits, None, &snapshot), [1, 0, 2]);
    }
}
