//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI args
//! and runs against a [`Workspace`]: the scanned root, its configuration and
//! the current index.

pub mod config;
pub mod edit;
pub mod importers;
pub mod list;
pub mod tags;

// Re-export execute functions for convenience
pub use config::execute as config;
pub use edit::execute as edit;
pub use importers::execute as importers;
pub use list::execute as list;
pub use tags::execute as tags;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::SelectionArgs;
use crate::config::LensConfig;
use crate::index::{Index, Indexer, SourceIndexer};
use crate::selection::{Selection, read_selection_file};
use crate::tags::{AnnotationFormat, TagRef};
use crate::LensError;

type Result<T> = std::result::Result<T, LensError>;

/// A scanned codebase with its configuration
#[derive(Debug)]
pub struct Workspace {
    config: LensConfig,
    format: AnnotationFormat,
    indexer: SourceIndexer,
    index: Index,
}

impl Workspace {
    /// Scan `root` using `config`
    ///
    /// # Errors
    /// Returns `LensError` if the configuration is invalid or the index
    /// cannot be built.
    pub fn open(root: impl Into<PathBuf>, config: LensConfig) -> Result<Self> {
        let format = config.annotation_format()?;
        let indexer = SourceIndexer::new(root, config.source_extension.clone(), format.clone())?;
        let index = indexer.build_index()?;
        Ok(Self {
            config,
            format,
            indexer,
            index,
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        self.indexer.root()
    }

    #[must_use]
    pub const fn config(&self) -> &LensConfig {
        &self.config
    }

    #[must_use]
    pub const fn format(&self) -> &AnnotationFormat {
        &self.format
    }

    #[must_use]
    pub const fn index(&self) -> &Index {
        &self.index
    }

    /// Rebuild the index from disk
    ///
    /// # Errors
    /// Returns `LensError::Index` if the scan fails; the old index is kept.
    pub fn reindex(&mut self) -> Result<()> {
        self.index = self.indexer.build_index()?;
        Ok(())
    }

    /// Build a selection from a list file and level specs
    ///
    /// # Errors
    /// Returns `LensError` if the list file cannot be loaded or a level spec
    /// does not parse.
    pub fn selection(&self, args: &SelectionArgs) -> Result<Selection> {
        let mut selection = Selection::new();
        if let Some(path) = &args.from {
            let added = read_selection_file(path, &self.index, &mut selection)?;
            debug!("Selected {added} file(s) from {}", path.display());
        }
        for spec in &args.tags {
            let level = TagRef::parse_spec(spec)?;
            let added = selection.select_at_level(&self.index, &level);
            debug!("Selected {added} file(s) at {spec}");
        }
        Ok(selection)
    }
}
