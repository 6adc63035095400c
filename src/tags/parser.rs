//! Recursive-descent parser for the tag annotation grammar
//!
//! ```text
//! annotation := ( '#' category )+            (separated by whitespace or ',')
//! category   := name ( labels | '{' clause ( ',' clause )* '}' )
//! clause     := labels                       direct-category labels
//!             | name labels                  group with direct labels
//!             | name '[' module ( ',' module )* ']'
//! module     := name labels?
//! labels     := '(' name ( ',' name )* ')'
//! ```
//!
//! Whitespace is insignificant everywhere between tokens.

use super::error::ParseError;
use super::types::{Level, TagRef, TagSet};

/// Characters that terminate a name
const RESERVED: &[char] = &['#', '(', ')', '{', '}', '[', ']', ','];

/// Parse the body of one annotation line (everything after `marker:`)
///
/// # Examples
/// ```
/// use taglens::tags::{parse_annotation, Level, TagRef};
///
/// let set = parse_annotation("#dev{feature[shield(render,system)]}").unwrap();
/// assert!(set.contains(&TagRef::label(
///     "dev",
///     Level::named("feature"),
///     Level::named("shield"),
///     "render",
/// )));
/// ```
///
/// # Errors
/// Returns `ParseError` describing the first offending token.
pub fn parse_annotation(input: &str) -> Result<TagSet, ParseError> {
    let mut parser = Parser::new(input);
    let mut set = TagSet::new();
    let mut clauses = 0usize;

    loop {
        match parser.peek() {
            None => break,
            Some(',') => parser.bump(),
            Some('#') => {
                parser.bump();
                parser.category(&mut set)?;
                clauses += 1;
            }
            found => return Err(ParseError::unexpected("'#'", found, parser.pos)),
        }
    }

    if clauses == 0 {
        return Err(ParseError::Empty);
    }
    Ok(set)
}

/// Parse free text into the tag refs it names
///
/// Each label becomes one ref; a module written without labels becomes a
/// module-level ref. Used for queuing additions in the editor.
///
/// # Errors
/// Returns `ParseError` if the text is not a valid annotation body.
pub fn parse_tag_refs(input: &str) -> Result<Vec<TagRef>, ParseError> {
    parse_annotation(input).map(|set| set.leaves())
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    const fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.src[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.src[self.pos..].chars().next() {
            self.pos += c.len_utf8();
        }
    }

    fn expect(&mut self, wanted: char, expected: &'static str) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == wanted => {
                self.bump();
                Ok(())
            }
            found => Err(ParseError::unexpected(expected, found, self.pos)),
        }
    }

    fn name(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let rest = &self.src[start..];
        let len = rest
            .find(|c: char| c.is_whitespace() || RESERVED.contains(&c))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(ParseError::MissingName { offset: start });
        }
        self.pos += len;
        Ok(rest[..len].to_string())
    }

    fn labels(&mut self) -> Result<Vec<String>, ParseError> {
        self.skip_whitespace();
        let open = self.pos;
        self.expect('(', "'('")?;
        let mut labels = Vec::new();
        loop {
            match self.peek() {
                Some(')') if labels.is_empty() => {
                    return Err(ParseError::EmptyLabels { offset: open });
                }
                Some(')') => {
                    self.bump();
                    return Ok(labels);
                }
                Some(',') => self.bump(),
                Some(_) => labels.push(self.name()?),
                None => return Err(ParseError::unexpected("')'", None, self.pos)),
            }
        }
    }

    fn category(&mut self, set: &mut TagSet) -> Result<(), ParseError> {
        let category = self.name()?;
        match self.peek() {
            Some('(') => {
                for label in self.labels()? {
                    set.insert(&TagRef::label(&category, Level::Direct, Level::Direct, label));
                }
                Ok(())
            }
            Some('{') => {
                self.bump();
                self.clauses(&category, set)
            }
            found => Err(ParseError::unexpected("'(' or '{'", found, self.pos)),
        }
    }

    fn clauses(&mut self, category: &str, set: &mut TagSet) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some('}') => {
                    self.bump();
                    return Ok(());
                }
                Some(',') => self.bump(),
                Some('(') => {
                    for label in self.labels()? {
                        set.insert(&TagRef::label(category, Level::Direct, Level::Direct, label));
                    }
                }
                Some(_) => {
                    let group = Level::named(self.name()?);
                    match self.peek() {
                        Some('(') => {
                            for label in self.labels()? {
                                set.insert(&TagRef::label(category, group.clone(), Level::Direct, label));
                            }
                        }
                        Some('[') => {
                            self.bump();
                            self.modules(category, &group, set)?;
                        }
                        found => return Err(ParseError::unexpected("'(' or '['", found, self.pos)),
                    }
                }
                None => return Err(ParseError::unexpected("'}'", None, self.pos)),
            }
        }
    }

    fn modules(&mut self, category: &str, group: &Level, set: &mut TagSet) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(());
                }
                Some(',') => self.bump(),
                Some(_) => {
                    let module = Level::named(self.name()?);
                    if self.peek() == Some('(') {
                        for label in self.labels()? {
                            set.insert(&TagRef::label(category, group.clone(), module.clone(), label));
                        }
                    } else {
                        set.insert(&TagRef::module(category, group.clone(), module));
                    }
                }
                None => return Err(ParseError::unexpected("']'", None, self.pos)),
            }
        }
    }
}
