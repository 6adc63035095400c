//! Tag editing over a fixed file set
//!
//! - [`TagTree`] aggregates tag coverage for display
//! - [`PendingEdit`] queues additions and deletions and tracks the
//!   module/group deletion cascade
//!
//! Queued edits are written back by [`crate::commit::commit`].

pub mod pending;
pub mod tree;

pub use pending::{Deletion, DeletionState, DeletionToggle, PendingEdit};
pub use tree::{Coverage, ExpandState, NodeKind, TagNode, TagTree, VisibleRow};
