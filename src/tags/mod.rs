//! Hierarchical tag model, annotation grammar and canonical encoding
//!
//! Source files carry their tags on annotation lines such as
//!
//! ```text
//! // @tags: #dev{feature[shield(render,system)]}
//! ```
//!
//! This module provides:
//! - **Types**: [`TagRef`] addresses and per-file [`TagSet`] trees
//! - **Parsing**: [`parse_annotation`] / [`parse_tag_refs`] for the grammar
//! - **Serialization**: [`serialize_tag_set`], the canonical, idempotent encoding
//! - **Line handling**: [`AnnotationFormat`] for finding and rendering annotation lines

pub mod error;
pub mod format;
pub mod parser;
pub mod serialize;
pub mod types;

pub use error::ParseError;
pub use format::{AnnotationFormat, DEFAULT_MARKER, DEFAULT_MODULE_DECL};
pub use parser::{parse_annotation, parse_tag_refs};
pub use serialize::serialize_tag_set;
pub use types::{GroupMap, LabelSet, Level, ModuleMap, TagRef, TagSet};
