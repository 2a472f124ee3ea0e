//! Text query language
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! or      := and (("OR" | "||" | <adjacent, default OR>) and)*
//! and     := unary (("AND" | "&&" | <adjacent, default AND>) unary)*
//! unary   := ("NOT" | "!" | "-") unary | "+" unary | primary
//! primary := "(" or ")" | field ":" value | value
//! value   := "(" or ")" | phrase | range | word
//! range   := ("[" | "{") bound ["TO"] bound ("]" | "}")
//! ```
//!
//! Words may contain `*` and `?` wildcards; `\` escapes the next character.
//! `*:*` matches every document.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Operator joining adjacent clauses that have no explicit operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultOperator {
    #[default]
    Or,
    And,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextQuery {
    MatchAll,
    Term {
        field: String,
        text: String,
    },
    Phrase {
        field: String,
        text: String,
    },
    /// Pattern keeps `\` escapes so escaped `*` and `?` stay literal.
    Wildcard {
        field: String,
        pattern: String,
    },
    /// `None` bounds are open.
    Range {
        field: String,
        lower: Option<String>,
        upper: Option<String>,
        include_lower: bool,
        include_upper: bool,
    },
    Boolean(Vec<Clause>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occur {
    Must,
    Should,
    MustNot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub occur: Occur,
    pub query: TextQuery,
}

impl Clause {
    pub fn new(occur: Occur, query: TextQuery) -> Self {
        Self { occur, query }
    }
}

#[derive(Debug, Clone)]
pub struct QueryParser {
    default_field: String,
    default_operator: DefaultOperator,
}

impl QueryParser {
    pub fn new(default_field: impl Into<String>, default_operator: DefaultOperator) -> Self {
        Self {
            default_field: default_field.into(),
            default_operator,
        }
    }

    pub fn default_field(&self) -> &str {
        &self.default_field
    }

    /// Parse query text. Empty text matches every document.
    pub fn parse(&self, input: &str) -> Result<TextQuery> {
        if input.trim().is_empty() {
            return Ok(TextQuery::MatchAll);
        }

        let mut p = Parser {
            chars: input.chars().collect(),
            pos: 0,
            default_operator: self.default_operator,
        };
        let query = p.parse_or(&self.default_field)?;
        p.skip_ws();
        if !p.is_eof() {
            return Err(Error::QueryParse(format!(
                "Unexpected input at position {}: '{}'",
                p.pos,
                p.remaining()
            )));
        }
        Ok(query)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    None,
    Required,
    Prohibited,
}

struct Unary {
    modifier: Modifier,
    query: TextQuery,
}

impl Unary {
    fn plain(query: TextQuery) -> Self {
        Self {
            modifier: Modifier::None,
            query,
        }
    }

    fn into_query(self) -> TextQuery {
        match self.modifier {
            Modifier::None => self.query,
            Modifier::Required => TextQuery::Boolean(vec![Clause::new(Occur::Must, self.query)]),
            Modifier::Prohibited => {
                TextQuery::Boolean(vec![Clause::new(Occur::MustNot, self.query)])
            }
        }
    }
}

struct Word {
    /// Unescaped text.
    text: String,
    /// Source text with escapes kept.
    pattern: String,
    wildcard: bool,
}

const WORD_STOP: &[char] = &['(', ')', '[', ']', '{', '}', '"', ':'];

struct Parser {
    chars: Vec<char>,
    pos: usize,
    default_operator: DefaultOperator,
}

impl Parser {
    fn parse_or(&mut self, field: &str) -> Result<TextQuery> {
        let mut items = vec![self.parse_and(field)?];
        loop {
            self.skip_ws();
            if self.at_group_end() {
                break;
            }
            // Without an explicit OR the clause is adjacent; parse_and has
            // already consumed adjacent clauses when the default is AND
            let _ = self.eat_keyword("OR") || self.eat_str("||");
            items.push(self.parse_and(field)?);
        }

        if items.len() == 1 {
            if let Some(only) = items.pop() {
                return Ok(only.into_query());
            }
        }

        let clauses = items
            .into_iter()
            .map(|u| {
                let occur = match u.modifier {
                    Modifier::None => Occur::Should,
                    Modifier::Required => Occur::Must,
                    Modifier::Prohibited => Occur::MustNot,
                };
                Clause::new(occur, u.query)
            })
            .collect();
        Ok(TextQuery::Boolean(clauses))
    }

    fn parse_and(&mut self, field: &str) -> Result<Unary> {
        let mut items = vec![self.parse_unary(field)?];
        loop {
            self.skip_ws();
            if self.at_group_end() || self.at_or() {
                break;
            }
            if self.eat_keyword("AND") || self.eat_str("&&") {
                items.push(self.parse_unary(field)?);
                continue;
            }
            if self.default_operator == DefaultOperator::And {
                items.push(self.parse_unary(field)?);
                continue;
            }
            break;
        }

        if items.len() == 1 {
            if let Some(only) = items.pop() {
                return Ok(only);
            }
        }

        let clauses = items
            .into_iter()
            .map(|u| {
                let occur = match u.modifier {
                    Modifier::Prohibited => Occur::MustNot,
                    Modifier::None | Modifier::Required => Occur::Must,
                };
                Clause::new(occur, u.query)
            })
            .collect();
        Ok(Unary::plain(TextQuery::Boolean(clauses)))
    }

    fn parse_unary(&mut self, field: &str) -> Result<Unary> {
        self.skip_ws();
        if self.eat_keyword("NOT") || self.eat_char('!') || self.eat_char('-') {
            let inner = self.parse_unary(field)?;
            return Ok(Unary {
                modifier: Modifier::Prohibited,
                query: inner.into_query(),
            });
        }
        if self.eat_char('+') {
            let inner = self.parse_unary(field)?;
            return Ok(Unary {
                modifier: Modifier::Required,
                query: inner.into_query(),
            });
        }
        Ok(Unary::plain(self.parse_primary(field)?))
    }

    fn parse_primary(&mut self, field: &str) -> Result<TextQuery> {
        self.skip_ws();
        if self.at_and() || self.at_or() {
            return Err(self.error("Unexpected operator"));
        }

        match self.peek() {
            None => Err(self.error("Unexpected end of query, expected a term")),
            Some('(') => self.parse_group(field),
            Some('"') => self.parse_phrase(field),
            Some('[') | Some('{') => self.parse_range(field),
            Some(c) if WORD_STOP.contains(&c) => Err(self.error(&format!("Unexpected '{c}'"))),
            Some(_) => {
                let word = self.read_word()?;
                if self.peek() == Some(':') {
                    self.bump();
                    return self.parse_field_value(&word.text);
                }
                Ok(term_query(field, word))
            }
        }
    }

    fn parse_field_value(&mut self, name: &str) -> Result<TextQuery> {
        match self.peek() {
            Some('(') => self.parse_group(name),
            Some('"') => self.parse_phrase(name),
            Some('[') | Some('{') => self.parse_range(name),
            _ => {
                let word = self.read_word()?;
                if name == "*" && word.pattern == "*" {
                    return Ok(TextQuery::MatchAll);
                }
                Ok(term_query(name, word))
            }
        }
    }

    fn parse_group(&mut self, field: &str) -> Result<TextQuery> {
        self.bump();
        let query = self.parse_or(field)?;
        self.expect(')')?;
        Ok(query)
    }

    fn parse_phrase(&mut self, field: &str) -> Result<TextQuery> {
        let text = self.read_quoted()?;
        Ok(TextQuery::Phrase {
            field: field.to_string(),
            text,
        })
    }

    fn parse_range(&mut self, field: &str) -> Result<TextQuery> {
        let include_lower = self.bump() == Some('[');
        self.skip_ws();
        let lower = self.read_bound()?;
        self.skip_ws();
        self.eat_keyword("TO");
        self.skip_ws();
        let upper = self.read_bound()?;
        self.skip_ws();
        let include_upper = match self.bump() {
            Some(']') => true,
            Some('}') => false,
            _ => return Err(self.error("Unterminated range, expected ']' or '}'")),
        };

        Ok(TextQuery::Range {
            field: field.to_string(),
            lower,
            upper,
            include_lower,
            include_upper,
        })
    }

    fn read_bound(&mut self) -> Result<Option<String>> {
        if self.peek() == Some('"') {
            return self.read_quoted().map(Some);
        }
        let word = self.read_word()?;
        if word.pattern == "*" {
            Ok(None)
        } else {
            Ok(Some(word.text))
        }
    }

    fn read_quoted(&mut self) -> Result<String> {
        let start = self.pos;
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                None => {
                    return Err(Error::QueryParse(format!(
                        "Unterminated phrase starting at position {start}"
                    )))
                }
                Some('"') => return Ok(text),
                Some('\\') => match self.bump() {
                    Some(escaped) => text.push(escaped),
                    None => return Err(self.error("Dangling escape")),
                },
                Some(c) => text.push(c),
            }
        }
    }

    fn read_word(&mut self) -> Result<Word> {
        let start = self.pos;
        let mut word = Word {
            text: String::new(),
            pattern: String::new(),
            wildcard: false,
        };

        while let Some(c) = self.peek() {
            if c.is_whitespace() || WORD_STOP.contains(&c) {
                break;
            }
            self.bump();
            if c == '\\' {
                let Some(escaped) = self.bump() else {
                    return Err(self.error("Dangling escape"));
                };
                word.text.push(escaped);
                word.pattern.push('\\');
                word.pattern.push(escaped);
                continue;
            }
            if c == '*' || c == '?' {
                word.wildcard = true;
            }
            word.text.push(c);
            word.pattern.push(c);
        }

        if word.pattern.is_empty() {
            return Err(Error::QueryParse(format!(
                "Expected a term at position {start}"
            )));
        }
        Ok(word)
    }

    fn expect(&mut self, c: char) -> Result<()> {
        self.skip_ws();
        if self.eat_char(c) {
            Ok(())
        } else {
            Err(self.error(&format!("Expected '{c}'")))
        }
    }

    fn error(&self, message: &str) -> Error {
        Error::QueryParse(format!("{message} at position {}", self.pos))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn remaining(&self) -> String {
        self.chars[self.pos..].iter().collect()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn at_group_end(&self) -> bool {
        self.is_eof() || self.peek() == Some(')')
    }

    fn at_or(&self) -> bool {
        self.at_keyword("OR") || self.starts_with("||")
    }

    fn at_and(&self) -> bool {
        self.at_keyword("AND") || self.starts_with("&&")
    }

    fn starts_with(&self, s: &str) -> bool {
        let mut i = self.pos;
        for c in s.chars() {
            if self.chars.get(i) != Some(&c) {
                return false;
            }
            i += 1;
        }
        true
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        if !self.starts_with(keyword) {
            return false;
        }
        match self.chars.get(self.pos + keyword.chars().count()) {
            None => true,
            Some(c) => c.is_whitespace() || *c == '(' || *c == '"',
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.pos += keyword.chars().count();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.chars().count();
            true
        } else {
            false
        }
    }

    fn eat_char(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }
}

fn term_query(field: &str, word: Word) -> TextQuery {
    if word.wildcard {
        TextQuery::Wildcard {
            field: field.to_string(),
            pattern: word.pattern,
        }
    } else {
        TextQuery::Term {
            field: field.to_string(),
            text: word.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> TextQuery {
        QueryParser::new("AnyText", DefaultOperator::Or)
            .parse(input)
            .unwrap()
    }

    fn term(field: &str, text: &str) -> TextQuery {
        TextQuery::Term {
            field: field.to_string(),
            text: text.to_string(),
        }
    }

    fn parse_err(input: &str) -> String {
        match QueryParser::new("AnyText", DefaultOperator::Or).parse(input) {
            Err(Error::QueryParse(msg)) => msg,
            other => panic!("expected QueryParse error for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn parses_terms_on_default_and_explicit_fields() {
        assert_eq!(parse("ocean"), term("AnyText", "ocean"));
        assert_eq!(parse("Title:ocean"), term("Title", "ocean"));
        assert_eq!(parse("  "), TextQuery::MatchAll);
        assert_eq!(parse("*:*"), TextQuery::MatchAll);
        assert_eq!(parse("Title:sea\\:level"), term("Title", "sea:level"));
    }

    #[test]
    fn parses_phrases_and_wildcards() {
        assert_eq!(
            parse("Title:\"sea surface\""),
            TextQuery::Phrase {
                field: "Title".to_string(),
                text: "sea surface".to_string(),
            }
        );
        assert_eq!(
            parse("Title:tem?erat*"),
            TextQuery::Wildcard {
                field: "Title".to_string(),
                pattern: "tem?erat*".to_string(),
            }
        );
        assert_eq!(parse("Title:what\\?"), term("Title", "what?"));
    }

    #[test]
    fn parses_ranges() {
        assert_eq!(
            parse("CreationDate:[19700101 TO 20091231}"),
            TextQuery::Range {
                field: "CreationDate".to_string(),
                lower: Some("19700101".to_string()),
                upper: Some("20091231".to_string()),
                include_lower: true,
                include_upper: false,
            }
        );
        assert_eq!(
            parse("WestBoundLongitude:{* 10}"),
            TextQuery::Range {
                field: "WestBoundLongitude".to_string(),
                lower: None,
                upper: Some("10".to_string()),
                include_lower: false,
                include_upper: false,
            }
        );
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            parse("a OR b AND c"),
            TextQuery::Boolean(vec![
                Clause::new(Occur::Should, term("AnyText", "a")),
                Clause::new(
                    Occur::Should,
                    TextQuery::Boolean(vec![
                        Clause::new(Occur::Must, term("AnyText", "b")),
                        Clause::new(Occur::Must, term("AnyText", "c")),
                    ])
                ),
            ])
        );
        assert_eq!(parse("a || b && c"), parse("a OR b AND c"));
    }

    #[test]
    fn not_and_prefix_operators() {
        assert_eq!(
            parse("a AND NOT b"),
            TextQuery::Boolean(vec![
                Clause::new(Occur::Must, term("AnyText", "a")),
                Clause::new(Occur::MustNot, term("AnyText", "b")),
            ])
        );
        assert_eq!(
            parse("-b"),
            TextQuery::Boolean(vec![Clause::new(Occur::MustNot, term("AnyText", "b"))])
        );
        assert_eq!(
            parse("+a b"),
            TextQuery::Boolean(vec![
                Clause::new(Occur::Must, term("AnyText", "a")),
                Clause::new(Occur::Should, term("AnyText", "b")),
            ])
        );
        assert_eq!(parse("!b"), parse("NOT b"));
        // Keywords are only operators as whole uppercase words
        assert_eq!(parse("ANDROID"), term("AnyText", "ANDROID"));
    }

    #[test]
    fn adjacent_clauses_use_default_operator() {
        assert_eq!(
            parse("a b"),
            TextQuery::Boolean(vec![
                Clause::new(Occur::Should, term("AnyText", "a")),
                Clause::new(Occur::Should, term("AnyText", "b")),
            ])
        );

        let and = QueryParser::new("AnyText", DefaultOperator::And)
            .parse("a b")
            .unwrap();
        assert_eq!(
            and,
            TextQuery::Boolean(vec![
                Clause::new(Occur::Must, term("AnyText", "a")),
                Clause::new(Occur::Must, term("AnyText", "b")),
            ])
        );
    }

    #[test]
    fn field_grouping_applies_field_to_group() {
        assert_eq!(
            parse("Title:(sea OR ocean)"),
            TextQuery::Boolean(vec![
                Clause::new(Occur::Should, term("Title", "sea")),
                Clause::new(Occur::Should, term("Title", "ocean")),
            ])
        );
    }

    #[test]
    fn reports_syntax_errors() {
        assert!(parse_err("(a").contains("Expected ')'"));
        assert!(parse_err("a)").contains("Unexpected input"));
        assert!(parse_err("Title:").contains("Expected a term"));
        assert!(parse_err("[a TO b").contains("Unterminated range"));
        assert!(parse_err("a AND").contains("expected a term"));
        assert!(parse_err("\"sea surface").contains("Unterminated phrase"));
        assert!(parse_err("OR a").contains("Unexpected operator"));
    }
}
