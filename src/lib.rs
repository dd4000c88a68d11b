//! Compare passenger airline destinations between two airports using the
//! "Airlines and destinations" tables of their Wikipedia articles.

pub mod compare;
pub mod config;
pub mod error;
pub mod fetch;
pub mod index;
pub mod parser;
pub mod render;
pub mod wiki;

#[cfg(test)]
mod testutil;

pub use index::{merge_indices, ComparisonRow, DestinationIndex, DestinationSet, AGGREGATE_LABEL};
pub use parser::{build_destination_index, build_destination_index_with, ParseOptions};
