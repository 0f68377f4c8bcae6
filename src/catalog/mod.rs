//! Token catalog: the static tables driving tokenization and formatting.
//!
//! Each lexical family (comments, blocks, operators, types, keywords,
//! custom literals) is an ordered table of [`TokenDef`] entries. A
//! definition carries the literal identifier, the literals that terminate
//! its scope (for constructs not closed by a matching bracket), a
//! direction, and two independent [`Hints`] bundles: one consulted while
//! tokenizing/formatting FreeFEM code, one while inside an EJS region.
//! Table order matters: within a family, earlier entries win position
//! ties, which is how `<=` beats `<` and `<%=` beats `<%`.

pub mod defs;
pub mod types;

pub use defs::{
    BLOCKS, COMMENT_CLOSE, COMMENT_OPEN, CUSTOMS, INLINE_COMMENT, KEYWORDS, OPERATORS, TYPES,
};
pub use types::{Dir, Family, Hints, Mode, TokenDef};
