//! Formatting engine.
//!
//! Three sequential tree walks, in order:
//! 1. Sibling relinking ([`Tree::relink`]) so the lookaround cache
//!    matches the children-list order
//! 2. [`spacing`]: hint-driven spaces and line breaks, plus comment
//!    normalization ([`comments`])
//! 3. [`indenter`]: depth tracking, indent materialization and blank-line
//!    collapse
//!
//! No operation in this module fails; a hint whose precondition is
//! already false is a defined no-op.

pub mod comments;
pub mod indenter;
pub mod spacing;

use crate::config::Config;
use crate::parser::Tree;

/// Run the full formatting pipeline over a parsed tree, in place
pub fn format(tree: &mut Tree, config: &Config) {
    let root = tree.root();
    tree.relink(root);
    if config.impose_spacing {
        spacing::apply(tree, config);
        tree.relink(root);
    }
    if config.impose_indent {
        indenter::apply(tree, config);
    }
}
