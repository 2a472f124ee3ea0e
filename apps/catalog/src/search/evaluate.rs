//! Query evaluation against an index snapshot

use crate::index::analysis::{normalize, tokenize};
use crate::index::{FieldPostings, IndexSnapshot};
use crate::search::query_parser::{Occur, QueryParser, TextQuery};
use crate::search::{LogicalOperator, ScoredSet, SpatialQuery};
use crate::{Error, Result};
use regex::Regex;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ops::Bound;

/// Evaluate one node of a query tree:
/// 1. text matches (empty text or `*:*` is every document)
/// 2. combined with the spatial filter using the node's own operator
/// 3. each child folded in, left to right, using the child's operator
pub fn evaluate_query(
    query: &SpatialQuery,
    snapshot: &IndexSnapshot,
    parser: &QueryParser,
) -> Result<ScoredSet> {
    let mut acc = if query.is_match_all_text() {
        ScoredSet::all(snapshot.document_count())
    } else {
        let text = parser.parse(query.query_text())?;
        evaluate_text(&text, snapshot)?
    };

    if let Some(filter) = query.filter() {
        filter.validate()?;
        let matches = filter.evaluate(snapshot);
        acc = combine(acc, &matches, query.operator());
    }

    for child in query.sub_queries() {
        let matches = evaluate_query(child, snapshot, parser)?;
        acc = combine(acc, &matches, child.operator());
    }

    Ok(acc)
}

fn combine(acc: ScoredSet, other: &ScoredSet, operator: LogicalOperator) -> ScoredSet {
    match operator {
        LogicalOperator::And => acc.and(other),
        LogicalOperator::Or => acc.or(other),
        LogicalOperator::Not => acc.and_not(other),
        LogicalOperator::Xor => acc.xor(other),
    }
}

pub fn evaluate_text(query: &TextQuery, snapshot: &IndexSnapshot) -> Result<ScoredSet> {
    match query {
        TextQuery::MatchAll => Ok(ScoredSet::all(snapshot.document_count())),
        TextQuery::Term { field, text } => Ok(term(snapshot, field, text)),
        TextQuery::Phrase { field, text } => Ok(phrase(snapshot, field, &tokenize(text))),
        TextQuery::Wildcard { field, pattern } => wildcard(snapshot, field, pattern),
        TextQuery::Range {
            field,
            lower,
            upper,
            include_lower,
            include_upper,
        } => Ok(range(
            snapshot,
            field,
            lower.as_deref(),
            upper.as_deref(),
            *include_lower,
            *include_upper,
        )),
        TextQuery::Boolean(clauses) => {
            let mut must: Option<ScoredSet> = None;
            let mut should: Option<ScoredSet> = None;
            let mut must_not = ScoredSet::new();

            for clause in clauses {
                let matches = evaluate_text(&clause.query, snapshot)?;
                match clause.occur {
                    Occur::Must => {
                        must = Some(match must {
                            Some(acc) => acc.and(&matches),
                            None => matches,
                        })
                    }
                    Occur::Should => {
                        should = Some(match should {
                            Some(acc) => acc.or(&matches),
                            None => matches,
                        })
                    }
                    Occur::MustNot => must_not = must_not.or(&matches),
                }
            }

            // Optional clauses only add score once a clause is required;
            // prohibited-only lists subtract from every document
            let base = match (must, should) {
                (Some(must), Some(should)) => must.boost_from(&should),
                (Some(must), None) => must,
                (None, Some(should)) => should,
                (None, None) => ScoredSet::all(snapshot.document_count()),
            };
            Ok(base.and_not(&must_not))
        }
    }
}

fn term(snapshot: &IndexSnapshot, field: &str, text: &str) -> ScoredSet {
    let Some(postings) = snapshot.field(field) else {
        return ScoredSet::new();
    };

    let tokens = tokenize(text);
    let mut hits = match tokens.len() {
        0 => ScoredSet::new(),
        1 => token_hits(snapshot, postings, &tokens[0]),
        _ => phrase(snapshot, field, &tokens),
    };

    // Whole-value match covers identifiers and codes the tokenizer splits
    let keyword = postings.keyword(&normalize(text));
    let score = snapshot.term_score(1, keyword.len());
    for doc in keyword {
        hits.insert_if_absent(*doc, score);
    }
    hits
}

fn token_hits(snapshot: &IndexSnapshot, postings: &FieldPostings, token: &str) -> ScoredSet {
    let list = postings.token(token);
    list.iter()
        .map(|p| (p.doc, snapshot.term_score(p.term_freq, list.len())))
        .collect()
}

fn phrase(snapshot: &IndexSnapshot, field: &str, tokens: &[String]) -> ScoredSet {
    let Some(postings) = snapshot.field(field) else {
        return ScoredSet::new();
    };
    match tokens {
        [] => return ScoredSet::new(),
        [single] => return token_hits(snapshot, postings, single),
        _ => {}
    }

    // Documents holding every token, then verified for adjacency
    let mut candidates: Option<ScoredSet> = None;
    for token in tokens {
        let hits = token_hits(snapshot, postings, token);
        candidates = Some(match candidates {
            Some(acc) => acc.and(&hits),
            None => hits,
        });
    }

    candidates
        .unwrap_or_default()
        .iter()
        .filter(|(doc, _)| {
            snapshot.document(*doc).is_some_and(|d| {
                d.values(field).iter().any(|value| {
                    tokenize(value)
                        .windows(tokens.len())
                        .any(|window| window == tokens)
                })
            })
        })
        .collect()
}

fn wildcard(snapshot: &IndexSnapshot, field: &str, pattern: &str) -> Result<ScoredSet> {
    let Some(postings) = snapshot.field(field) else {
        return Ok(ScoredSet::new());
    };
    let regex = wildcard_regex(pattern)?;

    let mut docs = BTreeSet::new();
    for (token, list) in postings.tokens() {
        if regex.is_match(token) {
            docs.extend(list.iter().map(|p| p.doc));
        }
    }
    for (keyword, list) in postings.keywords() {
        if regex.is_match(keyword) {
            docs.extend(list.iter().copied());
        }
    }
    Ok(docs.into_iter().map(|doc| (doc, 1.0)).collect())
}

/// Translate a wildcard pattern into an anchored regex over normalized terms.
fn wildcard_regex(pattern: &str) -> Result<Regex> {
    let mut source = String::from("^");
    let mut literal = String::new();
    let mut chars = pattern.chars();

    let flush = |literal: &mut String, source: &mut String| {
        if !literal.is_empty() {
            source.push_str(&regex::escape(&normalize(literal)));
            literal.clear();
        }
    };

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    literal.push(escaped);
                }
            }
            '*' => {
                flush(&mut literal, &mut source);
                source.push_str(".*");
            }
            '?' => {
                flush(&mut literal, &mut source);
                source.push('.');
            }
            other => literal.push(other),
        }
    }
    flush(&mut literal, &mut source);
    source.push('$');

    Regex::new(&source)
        .map_err(|e| Error::QueryParse(format!("Invalid wildcard pattern '{pattern}': {e}")))
}

fn range(
    snapshot: &IndexSnapshot,
    field: &str,
    lower: Option<&str>,
    upper: Option<&str>,
    include_lower: bool,
    include_upper: bool,
) -> ScoredSet {
    let Some(postings) = snapshot.field(field) else {
        return ScoredSet::new();
    };

    if snapshot.is_numeric(field) {
        if let Some(hits) = numeric_range(postings, lower, upper, include_lower, include_upper) {
            return hits;
        }
    }

    let lower = lower.map(normalize);
    let upper = upper.map(normalize);
    let start = match &lower {
        Some(l) if include_lower => Bound::Included(l.clone()),
        Some(l) => Bound::Excluded(l.clone()),
        None => Bound::Unbounded,
    };
    let below_upper = |term: &String| match &upper {
        Some(u) if include_upper => term <= u,
        Some(u) => term < u,
        None => true,
    };

    let mut docs = BTreeSet::new();
    for (_, list) in postings
        .keywords()
        .range((start.clone(), Bound::Unbounded))
        .take_while(|(term, _)| below_upper(*term))
    {
        docs.extend(list.iter().copied());
    }
    for (_, list) in postings
        .tokens()
        .range((start, Bound::Unbounded))
        .take_while(|(term, _)| below_upper(*term))
    {
        docs.extend(list.iter().map(|p| p.doc));
    }
    docs.into_iter().map(|doc| (doc, 1.0)).collect()
}

/// `None` when a bound is not a number, so the caller falls back to a
/// lexical comparison.
fn numeric_range(
    postings: &FieldPostings,
    lower: Option<&str>,
    upper: Option<&str>,
    include_lower: bool,
    include_upper: bool,
) -> Option<ScoredSet> {
    let parse = |bound: Option<&str>| -> Option<Option<f64>> {
        match bound {
            None => Some(None),
            Some(b) => b
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Some),
        }
    };
    let lower = parse(lower)?;
    let upper = parse(upper)?;

    let in_range = |value: f64| {
        let above = match lower {
            Some(l) => match value.partial_cmp(&l) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => include_lower,
                _ => false,
            },
            None => true,
        };
        let below = match upper {
            Some(u) => match value.partial_cmp(&u) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => include_upper,
                _ => false,
            },
            None => true,
        };
        above && below
    };

    let mut docs = BTreeSet::new();
    for (keyword, list) in postings.keywords() {
        if keyword
            .parse::<f64>()
            .is_ok_and(|v| v.is_finite() && in_range(v))
        {
            docs.extend(list.iter().copied());
        }
    }
    Some(docs.into_iter().map(|doc| (doc, 1.0)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{Document, IndexData};
    use crate::search::DefaultOperator;

    fn snapshot() -> IndexSnapshot {
        IndexSnapshot::new(IndexData {
            generation: 1,
            numeric_fields: ["Depth".to_string()].into_iter().collect(),
            documents: vec![
                Document::new("sst")
                    .with_field("Title", "Sea surface temperature")
                    .with_field("Depth", "5")
                    .with_field("CreationDate", "19700101"),
                Document::new("sal")
                    .with_field("Title", "Surface salinity of the sea")
                    .with_field("Depth", "20")
                    .with_field("CreationDate", "20090118"),
                Document::new("bathy")
                    .with_field("Title", "Bathymétrie")
                    .with_field("Depth", "100")
                    .with_field("CreationDate", "null"),
            ],
        })
    }

    fn search(text: &str) -> Vec<String> {
        let snapshot = snapshot();
        let parser = QueryParser::new("Title", DefaultOperator::Or);
        let query = parser.parse(text).unwrap();
        let hits = evaluate_text(&query, &snapshot).unwrap();
        hits.docs()
            .map(|d| snapshot.document(d).unwrap().identifier().to_string())
            .collect()
    }

    #[test]
    fn terms_match_tokens_case_and_accent_insensitively() {
        assert_eq!(search("SEA"), ["sst", "sal"]);
        assert_eq!(search("bathymetrie"), ["bathy"]);
        assert_eq!(search("id:sal"), ["sal"]);
        assert!(search("Abstract:sea").is_empty());
    }

    #[test]
    fn phrases_require_adjacent_tokens() {
        assert_eq!(search("\"sea surface\""), ["sst"]);
        assert_eq!(search("\"surface sea\"").len(), 0);
        // Multi-token terms match as phrases
        assert_eq!(search("Title:sea-surface"), ["sst"]);
    }

    #[test]
    fn wildcards_match_tokens() {
        assert_eq!(search("sal*"), ["sal"]);
        assert_eq!(search("t?mperature"), ["sst"]);
        assert_eq!(search("Bathym*"), ["bathy"]);
    }

    #[test]
    fn ranges_compare_lexically_or_numerically() {
        assert_eq!(search("CreationDate:[19700101 TO 20000101]"), ["sst"]);
        assert_eq!(search("CreationDate:{19700101 TO *]"), ["sal", "bathy"]);
        // "5" > "20" lexically, but Depth is numeric
        assert_eq!(search("Depth:[10 TO 100}"), ["sal"]);
        assert_eq!(search("Depth:[* 20]"), ["sst", "sal"]);
        assert!(search("Depth:[100 TO 5]").is_empty());
    }

    #[test]
    fn numeric_ranges_skip_non_finite_values() {
        let snapshot = IndexSnapshot::new(IndexData {
            generation: 1,
            numeric_fields: ["Depth".to_string()].into_iter().collect(),
            documents: vec![
                Document::new("nan").with_field("Depth", "NaN"),
                Document::new("inf").with_field("Depth", "inf"),
                Document::new("deep").with_field("Depth", "40"),
            ],
        });
        let parser = QueryParser::new("Title", DefaultOperator::Or);
        let query = parser.parse("Depth:[* TO *]").unwrap();
        let hits = evaluate_text(&query, &snapshot).unwrap();
        assert_eq!(hits.docs().collect::<Vec<_>>(), [2]);
    }

    #[test]
    fn boolean_clauses() {
        assert_eq!(search("sea AND salinity"), ["sal"]);
        assert_eq!(search("sea AND NOT salinity"), ["sst"]);
        assert_eq!(search("salinity OR bathymetrie"), ["sal", "bathy"]);
        assert_eq!(search("-sea"), ["bathy"]);
        assert_eq!(search("+sea salinity"), ["sst", "sal"]);
        assert_eq!(search("*:* AND NOT sea"), ["bathy"]);
    }

    #[test]
    fn rarer_terms_score_higher() {
        let snapshot = snapshot();
        let parser = QueryParser::new("Title", DefaultOperator::Or);
        let query = parser.parse("sea OR salinity").unwrap();
        let hits = evaluate_text(&query, &snapshot).unwrap();
        let scores: Vec<(usize, f32)> = hits.iter().collect();
        assert_eq!(scores.len(), 2);
        assert!(scores[1].1 > scores[0].1);
    }
}
