pub mod author;
pub mod document;

use std::collections::BTreeMap;

pub use author::{AuthorKeypair, KeypairValidator, ShapeValidator};
pub use document::{Document, Timestamped};

/// Workspace address -> pub URLs, in the order they were added.
pub type PubMap = BTreeMap<String, Vec<String>>;
