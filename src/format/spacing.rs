/// Spacing and line-break pass
///
/// Visits every node in document order and applies the hint bundle
/// selected by the current grammar mode: synthetic spaces and line breaks
/// are inserted next to the node unless the required whitespace is
/// already there. Each children list is iterated as a snapshot, so nodes
/// inserted during the pass are never re-visited.
use log::trace;

use crate::catalog::{Dir, Family, Hints, Mode};
use crate::config::Config;
use crate::format::comments;
use crate::parser::{NodeId, NodeKind, Tree};

pub fn apply(tree: &mut Tree, config: &Config) {
    let mut pass = SpacingPass {
        mode: Mode::Host,
        normalize_comments: config.normalize_comments,
    };
    let root = tree.root();
    pass.walk(tree, root);
}

struct SpacingPass {
    mode: Mode,
    normalize_comments: bool,
}

impl SpacingPass {
    fn walk(&mut self, tree: &mut Tree, node: NodeId) {
        let children = tree.node(node).children.clone();
        for child in children {
            match tree.node(child).kind {
                NodeKind::Token(def) => match def.family {
                    Family::Block => self.visit_block(tree, child),
                    Family::Operator => self.visit_operator(tree, child),
                    Family::Comment => self.visit_comment(tree, child),
                    Family::Type | Family::Keyword => self.visit_word(tree, child),
                    // Custom literals are glued to their neighbors
                    Family::Custom => {}
                },
                NodeKind::Text => self.space_before(tree, child),
                _ => {}
            }
        }
    }

    // ---- blocks ---------------------------------------------------------

    fn visit_block(&mut self, tree: &mut Tree, id: NodeId) {
        let def = tree.def(id).expect("block node has a definition");
        if def.dir == Dir::Open {
            if def.enters_template {
                self.mode = Mode::Template;
            }
            let hints = *def.hints(self.mode);
            if hints.space_before {
                self.space_before_open(tree, id);
            }
            if hints.line_break_before {
                trace!("line-break-before is a no-op for open blocks");
            }
            if hints.line_break_after {
                self.line_break_after_open(tree, id, hints);
            }
            if hints.space_after {
                self.space_after_open(tree, id);
            }
            self.walk(tree, id);
        } else {
            let hints = *def.hints(self.mode);
            // Inside a block kept inline the closer stays on the line; a
            // region closer consults the region it terminates, since the
            // tree may nest oddly when braces span region boundaries
            let keep_on_line = hints.keep_inline
                && self
                    .close_anchor(tree, id)
                    .is_some_and(|c| tree.node(c).inline);
            if hints.line_break_before && !keep_on_line {
                self.line_break_before_close(tree, id);
            }
            if hints.space_before {
                self.space_before_close(tree, id);
            }
            if hints.space_after {
                trace!("space-after is a no-op for close blocks");
            }
            if hints.line_break_after && !keep_on_line {
                self.line_break_after_close(tree, id);
            }
            if def.exits_template {
                self.mode = Mode::Host;
            }
        }
    }

    fn space_before_open(&self, tree: &mut Tree, id: NodeId) {
        let Some(left) = tree.left(id) else { return };
        if tree.is_whitespace(left) {
            return;
        }
        insert_space_before(tree, id);
    }

    fn space_before_close(&self, tree: &mut Tree, id: NodeId) {
        let Some(left) = tree.left(id) else { return };
        if tree.is_whitespace(left) {
            return;
        }
        // No space when the left neighbor will be followed by a forced
        // line break anyway
        let left_hints = self.hints_of(tree, left);
        if left_hints.line_break_after && !tree.node(left).inline {
            return;
        }
        insert_space_before(tree, id);
    }

    /// Insert a line break before the container's first child
    fn line_break_after_open(&self, tree: &mut Tree, id: NodeId, hints: Hints) {
        if hints.keep_inline && tree.node(id).inline {
            return;
        }
        let Some(first) = tree.first_child(id) else {
            return;
        };
        if tree.is_line_break(first) {
            return;
        }
        let lb = tree.new_node(NodeKind::LineBreak, "\n");
        tree.insert_before(first, lb);
    }

    fn space_after_open(&self, tree: &mut Tree, id: NodeId) {
        let Some(first) = tree.first_child(id) else {
            return;
        };
        if tree.is_whitespace(first) {
            return;
        }
        let space = tree.new_node(NodeKind::Space, " ");
        tree.insert_before(first, space);
    }

    /// The container whose inline flag governs a closer: the parent for
    /// brackets, the nearest enclosing template region for `%>`/`-%>`
    fn close_anchor(&self, tree: &Tree, id: NodeId) -> Option<NodeId> {
        let exits = tree.def(id).is_some_and(|d| d.exits_template);
        if exits {
            let mut cur = tree.parent(id);
            while let Some(p) = cur {
                if tree.def(p).is_some_and(|d| d.enters_template) {
                    return Some(p);
                }
                cur = tree.parent(p);
            }
        }
        tree.parent(id)
    }

    fn line_break_before_close(&self, tree: &mut Tree, id: NodeId) {
        if let Some(left) = tree.left(id) {
            if tree.is_line_break(left) || tree.is_indent(left) {
                return;
            }
            // A left neighbor that forces its own trailing break already
            // ends the line
            if self.hints_of(tree, left).line_break_after && !tree.node(left).inline {
                return;
            }
        }
        let lb = tree.new_node(NodeKind::LineBreak, "\n");
        tree.insert_before(id, lb);
    }

    /// The break after a close token lands inside the container, as its
    /// last child; `eat-preceding-line-break` relies on that placement.
    fn line_break_after_close(&self, tree: &mut Tree, id: NodeId) {
        let Some(container) = tree.parent(id) else {
            return;
        };
        let Some(container_right) = tree.right(container) else {
            return;
        };
        if tree.is_line_break(container_right) {
            return;
        }
        let lb = tree.new_node(NodeKind::LineBreak, "\n");
        tree.insert_after(id, lb);
    }

    // ---- operators ------------------------------------------------------

    fn visit_operator(&mut self, tree: &mut Tree, id: NodeId) {
        let def = tree.def(id).expect("operator node has a definition");
        let hints = *def.hints(self.mode);
        if hints.space_before {
            self.space_before(tree, id);
        }
        if hints.line_break_after {
            self.line_break_after(tree, id);
        }
        if hints.space_after {
            self.space_after(tree, id);
        }

        // Template ternary: a `:` with a `?` earlier on the line gets a
        // space before it even though its bundle only spaces after
        if self.mode == Mode::Template && def.ident == ":" {
            let mut cur = tree.left(id);
            while let Some(left) = cur {
                if tree.is_line_break(left) {
                    break;
                }
                if tree.def(left).is_some_and(|d| d.ident == "?") {
                    self.space_before(tree, id);
                    break;
                }
                cur = tree.left(left);
            }
        }
    }

    // ---- comments -------------------------------------------------------

    fn visit_comment(&mut self, tree: &mut Tree, id: NodeId) {
        if !self.normalize_comments {
            return;
        }
        let def = tree.def(id).expect("comment node has a definition");
        match def.dir {
            Dir::None => comments::normalize_inline(tree, id),
            Dir::Open => comments::normalize_multiline(tree, id),
            Dir::Close => {}
        }
    }

    // ---- types, keywords and text --------------------------------------

    fn visit_word(&mut self, tree: &mut Tree, id: NodeId) {
        let def = tree.def(id).expect("word node has a definition");
        let hints = *def.hints(self.mode);
        if hints.eat_line_break_before {
            eat_line_break_before(tree, id);
        }
        if hints.space_before {
            self.space_before(tree, id);
        }
        if hints.space_after {
            self.space_after(tree, id);
        }
        // Word spacing: the tokenizer dropped the blanks between words, so
        // every word gets a space towards its non-operator left neighbor
        self.space_before(tree, id);
    }

    // ---- shared insertion rules ----------------------------------------

    /// Insert a space before `id` unless the left context already
    /// separates it (whitespace, an operator, or nothing at all)
    fn space_before(&self, tree: &mut Tree, id: NodeId) {
        if tree.node(id).value.starts_with('.') {
            return;
        }
        let mut left = tree.left(id);
        // A block container acts through its last child
        if let Some(l) = left {
            if tree.is_block_container(l) {
                left = tree.last_child(l);
            }
        }
        let Some(l) = left else { return };
        if tree.is_whitespace(l) {
            return;
        }
        if tree.def(l).is_some_and(|d| d.family == Family::Operator) {
            return;
        }
        insert_space_before(tree, id);
    }

    fn space_after(&self, tree: &mut Tree, id: NodeId) {
        let Some(right) = tree.right(id) else { return };
        if tree.is_whitespace(right) {
            return;
        }
        if tree
            .def(right)
            .is_some_and(|d| d.family == Family::Block && d.dir == Dir::Close)
        {
            return;
        }
        let space = tree.new_node(NodeKind::Space, " ");
        tree.insert_after(id, space);
    }

    /// Break the line after a statement terminator, except inside blocks
    /// kept inline (loop headers, template regions on one line)
    fn line_break_after(&self, tree: &mut Tree, id: NodeId) {
        if let Some(container) = tree.enclosing_block(id) {
            let def = tree.def(container).expect("container has a definition");
            if tree.node(container).inline && def.hints(self.mode).keep_inline {
                return;
            }
        }
        let Some(right) = tree.right(id) else { return };
        if tree.is_line_break(right) {
            return;
        }
        let lb = tree.new_node(NodeKind::LineBreak, "\n");
        tree.insert_after(id, lb);
    }

    fn hints_of(&self, tree: &Tree, id: NodeId) -> Hints {
        tree.def(id).map_or(Hints::NONE, |d| *d.hints(self.mode))
    }
}

fn insert_space_before(tree: &mut Tree, id: NodeId) {
    let space = tree.new_node(NodeKind::Space, " ");
    tree.insert_before(id, space);
}

/// Delete the trailing line break of the container block to the left
/// (`} else` pulls the keyword back onto the closer's line)
fn eat_line_break_before(tree: &mut Tree, id: NodeId) {
    let Some(left) = tree.left(id) else { return };
    if !tree.is_container(left) {
        return;
    }
    if let Some(last) = tree.last_child(left) {
        if tree.is_line_break(last) {
            tree.remove(last);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::stringify::stringify;

    fn spaced(input: &str) -> String {
        let mut tree = parse(input);
        let config = Config::default();
        apply(&mut tree, &config);
        stringify(&tree)
    }

    #[test]
    fn test_word_spacing_restored() {
        assert_eq!(spaced("mesh Th;"), "mesh Th;\n");
    }

    #[test]
    fn test_operator_spacing() {
        assert_eq!(spaced("a = b + c;"), "a = b + c;\n");
        assert_eq!(spaced("x=y;"), "x = y;\n");
    }

    #[test]
    fn test_comma_spacing_inside_call() {
        assert_eq!(spaced("f(a,b);"), "f(a, b);\n");
    }

    #[test]
    fn test_host_operators_keep_template_rules_off() {
        // `===` carries only template hints; in host code it stays bare
        assert_eq!(spaced("a === b;"), "a===b;\n");
    }

    #[test]
    fn test_template_ternary_colon() {
        assert_eq!(
            spaced("<%= a ? 'x' : 'y' %>"),
            "<%= a ? 'x' : 'y' %>\n"
        );
    }

    #[test]
    fn test_statement_break_at_root() {
        assert_eq!(spaced("a; b;"), "a;\nb;\n");
    }

    #[test]
    fn test_no_statement_break_in_loop_header() {
        assert_eq!(spaced("for(i=0;i<n;i++){}"), "for(i = 0; i < n; i++) {\n}\n");
    }

    #[test]
    fn test_inline_comment_normalized() {
        assert_eq!(spaced("// multi   spaced"), "// multi spaced\n");
    }

    #[test]
    fn test_else_kept_on_closer_line() {
        assert_eq!(
            spaced("if (a) {\nb;\n} else {\nc;\n}"),
            "if (a) {\nb;\n} else {\nc;\n}\n"
        );
    }
}
