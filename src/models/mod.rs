//! Core data models for catalog entries and queries.

mod bfile;
mod id;
mod query;
mod sequence;

pub use bfile::BFile;
pub use id::{find_references, IntoSequenceId, InvalidId, SequenceId};
pub use query::{Query, SearchPage, PAGE_SIZE};
pub use sequence::{Comment, CrossReference, Offset, SequenceRecord};

#[cfg(test)]
pub(crate) use sequence::tests::fibonacci_entry;
