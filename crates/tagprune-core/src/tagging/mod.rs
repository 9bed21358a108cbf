//! Tag overlap resolution.
//!
//! A [`RelationTable`] records which tags imply which; the [`OverlapResolver`]
//! uses it to drop tags already implied by a more specific tag in the same
//! collection.

pub mod input;
pub mod relations;
pub mod resolver;

pub use input::TagInput;
pub use relations::RelationTable;
pub use resolver::{drop_overlap_tags, OverlapResolver};
