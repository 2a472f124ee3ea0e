//! Composite search queries

use crate::search::SpatialFilter;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a node combines with its filter, and how a child combines with the
/// accumulated result of its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOperator {
    And,
    Or,
    Not,
    Xor,
}

impl LogicalOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
            LogicalOperator::Not => "NOT",
            LogicalOperator::Xor => "XOR",
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogicalOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(LogicalOperator::And),
            "OR" => Ok(LogicalOperator::Or),
            "NOT" => Ok(LogicalOperator::Not),
            "XOR" => Ok(LogicalOperator::Xor),
            _ => Err(Error::InvalidArgument(format!("Unknown logical operator: {s}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortField {
    pub field: String,
    pub descending: bool,
}

impl SortField {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// A node of the query tree: text query, optional spatial filter, operator
/// and ordered children.
///
/// The text is parsed only when the query runs, so a malformed query is
/// reported by the searcher rather than here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialQuery {
    text: String,
    filter: Option<SpatialFilter>,
    operator: LogicalOperator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    sub_queries: Vec<SpatialQuery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sort: Option<SortField>,
}

impl SpatialQuery {
    pub fn new(
        text: impl Into<String>,
        filter: Option<SpatialFilter>,
        operator: LogicalOperator,
    ) -> Self {
        Self {
            text: text.into(),
            filter,
            operator,
            sub_queries: Vec::new(),
            sort: None,
        }
    }

    /// Text-only query combined with `AND`.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, None, LogicalOperator::And)
    }

    /// Query matching every document.
    pub fn match_all() -> Self {
        Self::text("*:*")
    }

    pub fn query_text(&self) -> &str {
        &self.text
    }

    pub fn filter(&self) -> Option<&SpatialFilter> {
        self.filter.as_ref()
    }

    pub fn operator(&self) -> LogicalOperator {
        self.operator
    }

    pub fn sub_queries(&self) -> &[SpatialQuery] {
        &self.sub_queries
    }

    pub fn sort(&self) -> Option<&SortField> {
        self.sort.as_ref()
    }

    pub fn add_sub_query(&mut self, query: SpatialQuery) {
        self.sub_queries.push(query);
    }

    pub fn with_sub_query(mut self, query: SpatialQuery) -> Self {
        self.add_sub_query(query);
        self
    }

    pub fn with_sort(mut self, sort: SortField) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Whether the text selects every document before filters apply.
    pub fn is_match_all_text(&self) -> bool {
        let text = self.text.trim();
        text.is_empty() || text == "*:*"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_query_tree() {
        let query = SpatialQuery::new(
            "Title:ocean",
            Some(SpatialFilter::bbox(0.0, 0.0, 10.0, 10.0)),
            LogicalOperator::And,
        )
        .with_sub_query(SpatialQuery::new("Title:land", None, LogicalOperator::Not))
        .with_sort(SortField::descending("Title"));

        assert_eq!(query.query_text(), "Title:ocean");
        assert!(query.filter().is_some());
        assert_eq!(query.sub_queries().len(), 1);
        assert_eq!(query.sub_queries()[0].operator(), LogicalOperator::Not);
        assert_eq!(query.sort(), Some(&SortField::descending("Title")));
    }

    #[test]
    fn construction_never_parses_text() {
        let query = SpatialQuery::text("Title:(unbalanced");
        assert_eq!(query.query_text(), "Title:(unbalanced");
    }

    #[test]
    fn match_all_text_forms() {
        assert!(SpatialQuery::text("").is_match_all_text());
        assert!(SpatialQuery::match_all().is_match_all_text());
        assert!(!SpatialQuery::text("ocean").is_match_all_text());
    }

    #[test]
    fn parses_operators() {
        assert_eq!("xor".parse::<LogicalOperator>().unwrap(), LogicalOperator::Xor);
        assert!("NAND".parse::<LogicalOperator>().is_err());
    }
}
