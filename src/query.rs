//! Parser and evaluator for the subset of the remote query language used here
//!
//! Supported grammar, clauses joined by `and`:
//!
//! - `name = 'x'`, `name != 'x'`, `name contains 'x'` (same for `mimeType`)
//! - `trashed = true|false`, `starred = true|false` (also `!=`)
//! - `'<id>' in parents`
//! - any clause prefixed by `not`
//!
//! Strings may be single- or double-quoted, with `\'` and `\\` escapes.
//! Anything else (`or`, parentheses, other fields) is rejected rather than ignored.

use std::iter::Peekable;
use std::str::Chars;

use crate::entry::DirectoryEntry;
use crate::entry::FOLDER_MIME;
use crate::error::{DriveError, Result};

/// Query selecting the live children of one folder.
pub fn children_query(parent: &str) -> String {
    format!("{} in parents and trashed = false", quote(parent))
}

/// Query selecting live folders, optionally narrowed by a name fragment.
pub fn folder_search_query(name_fragment: Option<&str>) -> String {
    let mut q = format!("mimeType = {} and trashed = false", quote(FOLDER_MIME));
    if let Some(fragment) = name_fragment.filter(|f| !f.is_empty()) {
        q.push_str(&format!(" and name contains {}", quote(fragment)));
    }
    q
}

/// Query selecting live non-folder children of one folder.
pub fn file_search_query(parent: &str, name_fragment: Option<&str>) -> String {
    let mut q = format!(
        "trashed = false and mimeType != {} and {} in parents",
        quote(FOLDER_MIME),
        quote(parent)
    );
    if let Some(fragment) = name_fragment.filter(|f| !f.is_empty()) {
        q.push_str(&format!(" and name contains {}", quote(fragment)));
    }
    q
}

/// Single-quote a literal, escaping backslashes and quotes.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    clauses: Vec<Clause>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Clause {
    negated: bool,
    predicate: Predicate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Text {
        field: TextField,
        op: TextOp,
        value: String,
    },
    Flag {
        field: FlagField,
        expected: bool,
    },
    InParents(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextField {
    Name,
    MimeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextOp {
    Eq,
    Ne,
    Contains,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagField {
    Trashed,
    Starred,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Str(String),
    Word(String),
    Eq,
    Ne,
}

impl Token {
    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, Token::Word(w) if w.eq_ignore_ascii_case(keyword))
    }
}

impl Query {
    /// Parse a query. Blank input yields a query that matches everything.
    pub fn parse(input: &str) -> Result<Self> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Ok(Self::default());
        }

        let clauses = tokens
            .split(|t| t.is_keyword("and"))
            .map(parse_clause)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { clauses })
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, entry: &DirectoryEntry) -> bool {
        self.clauses.iter().all(|c| c.matches(entry))
    }
}

impl Clause {
    fn matches(&self, entry: &DirectoryEntry) -> bool {
        self.predicate.matches(entry) != self.negated
    }
}

impl Predicate {
    fn matches(&self, entry: &DirectoryEntry) -> bool {
        match self {
            Predicate::Text { field, op, value } => {
                let actual = match field {
                    TextField::Name => &entry.name,
                    TextField::MimeType => &entry.mime_type,
                };
                match op {
                    TextOp::Eq => actual == value,
                    TextOp::Ne => actual != value,
                    TextOp::Contains => actual.to_lowercase().contains(&value.to_lowercase()),
                }
            }
            Predicate::Flag { field, expected } => {
                let actual = match field {
                    FlagField::Trashed => entry.is_trashed(),
                    FlagField::Starred => entry.starred.unwrap_or(false),
                };
                actual == *expected
            }
            Predicate::InParents(id) => entry.has_parent(id),
        }
    }
}

fn parse_clause(tokens: &[Token]) -> Result<Clause> {
    let (negated, rest) = match tokens.split_first() {
        Some((first, rest)) if first.is_keyword("not") => (true, rest),
        _ => (false, tokens),
    };

    let predicate = match rest {
        [Token::Str(id), inn, parents] if inn.is_keyword("in") && parents.is_keyword("parents") => {
            Predicate::InParents(id.clone())
        }
        [Token::Word(field), op, value] => parse_comparison(field, op, value)?,
        [] => return Err(DriveError::InvalidQuery("empty clause".to_string())),
        other => {
            return Err(DriveError::InvalidQuery(format!(
                "unsupported clause: {}",
                describe(other)
            )));
        }
    };

    Ok(Clause { negated, predicate })
}

fn parse_comparison(field: &str, op: &Token, value: &Token) -> Result<Predicate> {
    match field {
        "name" | "mimeType" => {
            let field = if field == "name" {
                TextField::Name
            } else {
                TextField::MimeType
            };
            let op = match op {
                Token::Eq => TextOp::Eq,
                Token::Ne => TextOp::Ne,
                t if t.is_keyword("contains") => TextOp::Contains,
                t => {
                    return Err(DriveError::InvalidQuery(format!(
                        "unsupported operator for {field:?}: {}",
                        describe(std::slice::from_ref(t))
                    )));
                }
            };
            let Token::Str(value) = value else {
                return Err(DriveError::InvalidQuery(format!(
                    "expected a quoted string after {field:?}"
                )));
            };
            Ok(Predicate::Text {
                field,
                op,
                value: value.clone(),
            })
        }
        "trashed" | "starred" => {
            let field = if field == "trashed" {
                FlagField::Trashed
            } else {
                FlagField::Starred
            };
            let value = if value.is_keyword("true") {
                true
            } else if value.is_keyword("false") {
                false
            } else {
                return Err(DriveError::InvalidQuery(format!(
                    "expected true or false after {field:?}"
                )));
            };
            let expected = match op {
                Token::Eq => value,
                Token::Ne => !value,
                _ => {
                    return Err(DriveError::InvalidQuery(format!(
                        "only = and != apply to {field:?}"
                    )));
                }
            };
            Ok(Predicate::Flag { field, expected })
        }
        other => Err(DriveError::InvalidQuery(format!(
            "unsupported field: {other}"
        ))),
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '\'' | '"' => {
                chars.next();
                tokens.push(Token::Str(read_quoted(&mut chars, c)?));
            }
            '=' => {
                chars.next();
                tokens.push(Token::Eq);
            }
            '!' => {
                chars.next();
                if chars.next_if_eq(&'=').is_none() {
                    return Err(DriveError::InvalidQuery("expected '=' after '!'".to_string()));
                }
                tokens.push(Token::Ne);
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut word = String::new();
                while let Some(c) = chars.next_if(|c| c.is_alphanumeric() || *c == '_') {
                    word.push(c);
                }
                tokens.push(Token::Word(word));
            }
            other => {
                return Err(DriveError::InvalidQuery(format!(
                    "unexpected character '{other}'"
                )));
            }
        }
    }

    Ok(tokens)
}

fn read_quoted(chars: &mut Peekable<Chars<'_>>, delimiter: char) -> Result<String> {
    let mut value = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => value.push(escaped),
                None => break,
            },
            c if c == delimiter => return Ok(value),
            c => value.push(c),
        }
    }
    Err(DriveError::InvalidQuery("unterminated string".to_string()))
}

fn describe(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| match t {
            Token::Str(s) => quote(s),
            Token::Word(w) => w.clone(),
            Token::Eq => "=".to_string(),
            Token::Ne => "!=".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str) -> DirectoryEntry {
        DirectoryEntry::new("id", name, "application/pdf").with_parent("p1")
    }

    #[test]
    fn test_blank_query_matches_everything() {
        let q = Query::parse("   ").unwrap();
        assert!(q.is_empty());
        assert!(q.matches(&doc("anything")));
    }

    #[test]
    fn test_children_query_round_trips_through_parser() {
        let q = Query::parse(&children_query("p1")).unwrap();
        assert!(q.matches(&doc("a")));
        assert!(!q.matches(&DirectoryEntry::new("id", "a", "text/plain").with_parent("p2")));

        let mut trashed = doc("a");
        trashed.trashed = Some(true);
        assert!(!q.matches(&trashed));
    }

    #[test]
    fn test_double_quoted_parent_is_accepted() {
        let q = Query::parse(r#""p1" in parents and trashed=false"#).unwrap();
        assert!(q.matches(&doc("a")));
    }

    #[test]
    fn test_name_operators() {
        let entry = doc("Quarterly Report");
        assert!(Query::parse("name = 'Quarterly Report'").unwrap().matches(&entry));
        assert!(Query::parse("name != 'Other'").unwrap().matches(&entry));
        assert!(Query::parse("name contains 'report'").unwrap().matches(&entry));
        assert!(!Query::parse("name contains 'budget'").unwrap().matches(&entry));
    }

    #[test]
    fn test_not_and_keywords_are_case_insensitive() {
        let q = Query::parse("NOT mimeType = 'application/pdf' AND starred = false").unwrap();
        assert!(!q.matches(&doc("a")));
        assert!(q.matches(&DirectoryEntry::new("id", "a", "text/plain")));
    }

    #[test]
    fn test_escaped_quote_in_literal() {
        let entry = doc("Bob's notes");
        let q = Query::parse(&format!("name = {}", quote("Bob's notes"))).unwrap();
        assert!(q.matches(&entry));
    }

    #[test]
    fn test_and_inside_string_is_not_a_separator() {
        let entry = doc("salt and pepper");
        assert!(Query::parse("name = 'salt and pepper'").unwrap().matches(&entry));
    }

    #[test]
    fn test_folder_search_query_selects_folders() {
        let q = Query::parse(&folder_search_query(Some("proj"))).unwrap();
        assert!(q.matches(&DirectoryEntry::folder("f", "Projects")));
        assert!(!q.matches(&DirectoryEntry::folder("f", "Archive")));
        assert!(!q.matches(&doc("project.pdf")));
    }

    #[test]
    fn test_unsupported_syntax_is_rejected() {
        for input in [
            "name = 'a' or name = 'b'",
            "(name = 'a')",
            "fullText contains 'x'",
            "name = unquoted",
            "trashed = maybe",
            "name = 'open",
            "and",
            "starred contains true",
        ] {
            assert!(
                matches!(Query::parse(input), Err(DriveError::InvalidQuery(_))),
                "should reject {input:?}"
            );
        }
    }
}
