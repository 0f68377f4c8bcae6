//! Serializer.
//!
//! A single recursive walk concatenating every node's literal value in
//! children-list order. Container nodes emit their open literal followed
//! by their serialized children; the close literal is an explicit
//! close-direction child, so nothing is added beyond what the tree holds.
//! All whitespace decisions were materialized by the formatting engine,
//! making this a pure, total function.

use crate::parser::{NodeId, Tree};

/// Serialize a tree back to text
#[must_use]
pub fn stringify(tree: &Tree) -> String {
    let mut out = String::new();
    stringify_node(tree, tree.root(), &mut out);
    out
}

fn stringify_node(tree: &Tree, id: NodeId, out: &mut String) {
    let node = tree.node(id);
    out.push_str(&node.value);
    for &child in &node.children {
        stringify_node(tree, child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_tokens_in_document_order() {
        let tree = parse("a = b;");
        assert_eq!(stringify(&tree), "a=b;\n");
    }

    #[test]
    fn test_nested_containers() {
        let tree = parse("{f(x);}");
        assert_eq!(stringify(&tree), "{f(x);}\n");
    }

    #[test]
    fn test_comment_container() {
        let tree = parse("/* a\n b */ x;");
        assert_eq!(stringify(&tree), "/* a\n b */x;\n");
    }

    #[test]
    fn test_strings_kept_verbatim() {
        let tree = parse("s = \"a   b\";");
        assert_eq!(stringify(&tree), "s=\"a   b\";\n");
    }
}
