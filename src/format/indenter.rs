/// Indentation pass
///
/// Walks the tree in document order with two independent depth counters,
/// one per grammar. Open-direction tokens whose active bundle requests
/// indentation deepen the active counter; close-direction tokens restore
/// it and swallow the indent run materialized before them. Type/keyword
/// tokens that declare terminating literals open a pending custom scope
/// restored by the first matching literal (`solve … ;`). Every surviving
/// line break materializes `depth × indent` single-space indent nodes;
/// runs of three or more line breaks collapse to at most one blank line.
use crate::catalog::{Dir, Family, Mode};
use crate::config::Config;
use crate::parser::{NodeId, NodeKind, Tree};

pub fn apply(tree: &mut Tree, config: &Config) {
    let mut pass = IndentPass {
        mode: Mode::Host,
        host_depth: 0,
        template_depth: 0,
        pending_closers: None,
        indent_size: config.indent,
        collapse_blank_lines: config.collapse_blank_lines,
    };
    let root = tree.root();
    pass.walk(tree, root);
}

struct IndentPass {
    mode: Mode,
    host_depth: usize,
    template_depth: usize,
    /// Terminating literals of an open custom scope
    pending_closers: Option<&'static [&'static str]>,
    indent_size: usize,
    collapse_blank_lines: bool,
}

impl IndentPass {
    fn walk(&mut self, tree: &mut Tree, node: NodeId) {
        let children = tree.node(node).children.clone();
        for child in children {
            self.check_template(tree, child);
            self.set_line_indent(tree, child);
            self.walk(tree, child);
        }
    }

    /// Depth counter of the active grammar
    fn depth(&self) -> usize {
        match self.mode {
            Mode::Host => self.host_depth,
            Mode::Template => self.template_depth,
        }
    }

    fn depth_mut(&mut self) -> &mut usize {
        match self.mode {
            Mode::Host => &mut self.host_depth,
            Mode::Template => &mut self.template_depth,
        }
    }

    fn check_template(&mut self, tree: &mut Tree, id: NodeId) {
        let Some(def) = tree.def(id) else { return };
        if def.enters_template {
            // Drop the indentation already materialized before the marker
            // so the mode switch doesn't double-indent
            self.eat_all_indent(tree, id);
            self.mode = Mode::Template;
            self.update_depth(tree, id);
        } else if def.exits_template {
            self.update_depth(tree, id);
            self.mode = Mode::Host;
        } else {
            self.update_depth(tree, id);
        }
    }

    fn update_depth(&mut self, tree: &mut Tree, id: NodeId) {
        let Some(def) = tree.def(id) else { return };

        // A pending custom scope closes on its declared terminator
        if let Some(closers) = self.pending_closers {
            if closers.contains(&def.ident) {
                let depth = self.depth_mut();
                *depth = depth.saturating_sub(1);
                self.pending_closers = None;
                return;
            }
        }

        match def.dir {
            Dir::None => {}
            Dir::Open => {
                if matches!(def.family, Family::Type | Family::Keyword) && !def.closers.is_empty()
                {
                    self.pending_closers = Some(def.closers);
                }
                if def.hints(self.mode).indent {
                    *self.depth_mut() += 1;
                }
            }
            Dir::Close => {
                let parent_indents = tree
                    .parent(id)
                    .and_then(|p| tree.def(p))
                    .is_some_and(|d| d.hints(self.mode).indent);
                if parent_indents {
                    let depth = self.depth_mut();
                    *depth = depth.saturating_sub(1);
                    self.eat_indent(tree, id);
                }
            }
        }
    }

    fn set_line_indent(&mut self, tree: &mut Tree, id: NodeId) {
        if !tree.is_line_break(id) {
            return;
        }

        // Three consecutive line breaks leave at most one blank line
        if self.collapse_blank_lines {
            let next = tree.right(id);
            let after = next.and_then(|n| tree.right(n));
            if let (Some(next), Some(after)) = (next, after) {
                if tree.is_line_break(next) && tree.is_line_break(after) {
                    tree.remove(id);
                    return;
                }
            }
        }

        let count = self.depth() * self.indent_size;
        for _ in 0..count {
            let indent = tree.new_node(NodeKind::Indent, " ");
            tree.insert_after(id, indent);
        }
    }

    /// Remove one indent run immediately preceding `id`, looking inside a
    /// block container sitting directly to its left
    fn eat_indent(&mut self, tree: &mut Tree, id: NodeId) {
        let size = self.indent_size;
        let Some(left) = tree.left(id) else { return };

        if tree.is_block_container(left) {
            let children = &tree.node(left).children;
            let len = children.len();
            if len >= size && children[len - size..].iter().all(|&c| tree.is_indent(c)) {
                for _ in 0..size {
                    if let Some(last) = tree.last_child(left) {
                        tree.remove(last);
                    }
                }
            }
            return;
        }

        let mut cursor = Some(left);
        for _ in 0..size {
            match cursor {
                Some(c) if tree.is_indent(c) => cursor = tree.left(c),
                _ => return,
            }
        }
        for _ in 0..size {
            if let Some(l) = tree.left(id) {
                tree.remove(l);
            }
        }
    }

    fn eat_all_indent(&mut self, tree: &mut Tree, id: NodeId) {
        for _ in 0..self.depth() {
            self.eat_indent(tree, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::stringify::stringify;

    // The pass is exercised in isolation here, so outputs carry no
    // inter-token spaces: the tokenizer drops them and only the spacing
    // pass puts them back.
    fn indented(input: &str) -> String {
        let mut tree = parse(input);
        let config = Config::default();
        apply(&mut tree, &config);
        stringify(&tree)
    }

    #[test]
    fn test_brace_depth() {
        assert_eq!(indented("{\na;\n}"), "{\n    a;\n}\n");
    }

    #[test]
    fn test_nested_brace_depth() {
        assert_eq!(indented("{\n{\nx;\n}\n}"), "{\n    {\n        x;\n    }\n}\n");
    }

    #[test]
    fn test_blank_line_collapse() {
        assert_eq!(indented("a;\n\n\n\nb;"), "a;\n\nb;\n");
    }

    #[test]
    fn test_custom_scope_terminated_by_semicolon() {
        assert_eq!(
            indented("solve p(u, v) =\nu\n+ v;\nplot(u);"),
            "solvep(u,v)=\n    u\n    +v;\nplot(u);\n"
        );
    }

    #[test]
    fn test_template_region_resets_host_indent() {
        // Host indentation is removed before the region marker; inside the
        // region the template counter governs
        assert_eq!(
            indented("{\n<%\nx\n%>\na;\n}"),
            "{\n<%\n    x\n%>\n    a;\n}\n"
        );
    }
}
