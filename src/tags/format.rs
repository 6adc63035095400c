//! Recognising and rendering annotation lines inside source files

use regex::Regex;

use super::error::ParseError;
use super::parser::parse_annotation;
use super::types::TagSet;

/// Default annotation marker
pub const DEFAULT_MARKER: &str = "// @tags";

/// Default module-declaration pattern (Go `package` clause)
pub const DEFAULT_MODULE_DECL: &str = r"^\s*package\s+\w+";

/// How annotation lines look in a given codebase
#[derive(Debug, Clone)]
pub struct AnnotationFormat {
    marker: String,
    module_decl: Regex,
}

impl AnnotationFormat {
    /// # Errors
    /// Returns `regex::Error` if `module_decl_pattern` does not compile.
    pub fn new(marker: impl Into<String>, module_decl_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            marker: marker.into(),
            module_decl: Regex::new(module_decl_pattern)?,
        })
    }

    #[must_use]
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Return the tag body of `line` if it is an annotation line
    #[must_use]
    pub fn annotation_body<'a>(&self, line: &'a str) -> Option<&'a str> {
        line.trim_start()
            .strip_prefix(self.marker.as_str())?
            .trim_start()
            .strip_prefix(':')
            .map(str::trim)
    }

    #[must_use]
    pub fn is_module_decl(&self, line: &str) -> bool {
        self.module_decl.is_match(line)
    }

    /// Render a full annotation line for a serialized body
    #[must_use]
    pub fn render_line(&self, body: &str) -> String {
        format!("{}: {body}", self.marker)
    }

    /// True when `line` is an annotation line whose body parses
    ///
    /// Malformed annotation lines are left alone when a file is rewritten.
    #[must_use]
    pub fn is_well_formed(&self, line: &str) -> bool {
        self.annotation_body(line)
            .is_some_and(|body| parse_annotation(body).is_ok())
    }

    /// Merge every well-formed annotation line in `text`
    ///
    /// Lines that fail to parse contribute nothing; they are returned with
    /// their 1-based line numbers.
    #[must_use]
    pub fn parse_source(&self, text: &str) -> (TagSet, Vec<(usize, ParseError)>) {
        let mut set = TagSet::new();
        let mut errors = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let Some(body) = self.annotation_body(line) else {
                continue;
            };
            match parse_annotation(body) {
                Ok(parsed) => set.merge(&parsed),
                Err(e) => errors.push((i + 1, e)),
            }
        }
        (set, errors)
    }
}
