//! Tokenization and tree building.
//!
//! This module turns raw source text into the document tree consumed by
//! the formatting engine:
//! - [`tree`]: the arena-backed [`Tree`]/[`Node`] structure with stable
//!   integer ids, owned children lists and derived sibling links
//! - [`scan`]: earliest-match probing of the token catalog
//! - [`tokenizer`]: the line-by-line recursive builder, including
//!   multiline-comment accumulation, string recognition and inline-block
//!   detection with a same-line lookahead window

pub mod scan;
pub mod tokenizer;
pub mod tree;

pub use tokenizer::parse;
pub use tree::{Node, NodeId, NodeKind, Tree};
