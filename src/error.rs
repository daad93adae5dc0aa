//! Errors raised while decoding host input.
//!
//! The layout, rendering and focus pipeline itself never fails; anomalies
//! there are absorbed with defaults. Only the boundary that turns host JSON
//! into trees and configuration can reject input.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("root index {root} is out of range for a tree of {len} nodes")]
    RootOutOfRange { root: usize, len: usize },

    #[error("node {parent} lists child {child}, but the tree only has {len} nodes")]
    ChildOutOfRange { parent: usize, child: usize, len: usize },

    /// A node is listed as a child more than once, or the root is listed as a child.
    #[error("node {child} has more than one parent")]
    SharedChild { child: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
