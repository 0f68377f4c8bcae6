/// Tokenizer and tree builder
///
/// Consumes raw text one source line at a time. Within a line the parser
/// repeatedly finds the earliest-occurring token across all catalog
/// families, flushes the text before it recursively, emits the token as a
/// child of the currently open node, and continues on the remainder.
/// Open-direction block tokens descend the current-node pointer into a
/// new container; close-direction tokens are appended as the container's
/// last child before ascending. Fragments with no token match are split
/// on whitespace into plain-text nodes.
use crate::catalog::{Dir, Mode, TokenDef, COMMENT_CLOSE, COMMENT_OPEN, INLINE_COMMENT};
use crate::parser::scan::{self, Found};
use crate::parser::tree::{NodeKind, Tree};
use crate::parser::NodeId;

pub struct Parser {
    tree: Tree,
    current: NodeId,
    mode: Mode,
    in_comment: bool,
}

/// Parse a document into its ownership tree
///
/// Always succeeds: unbalanced closers saturate at the root and
/// unterminated constructs leave the tree as built.
#[must_use]
pub fn parse(text: &str) -> Tree {
    let mut parser = Parser::new();
    if !text.is_empty() {
        // One line break is emitted per line, so a trailing newline must
        // not count as an extra empty line or the output would grow
        let body = text.strip_suffix('\n').unwrap_or(text);
        for line in body.split('\n') {
            parser.parse_line(line);
        }
    }
    parser.into_tree()
}

impl Parser {
    fn new() -> Self {
        let tree = Tree::new();
        let current = tree.root();
        Parser {
            tree,
            current,
            mode: Mode::Host,
            in_comment: false,
        }
    }

    fn into_tree(self) -> Tree {
        self.tree
    }

    fn parse_line(&mut self, line: &str) {
        if self.in_comment {
            self.comment_line(line);
        } else {
            self.parse_fragment(line, &[]);
        }

        // A newline inside an open multiline comment is folded into the
        // comment's accumulated text instead of becoming its own node.
        if self.in_comment {
            self.append_comment_text("\n");
        } else {
            let lb = self.tree.new_node(NodeKind::LineBreak, "\n");
            self.tree.append_child(self.current, lb);
        }
    }

    // ---- fragments ------------------------------------------------------

    /// Tokenize one fragment of a line. `lookahead` holds the fragments of
    /// the same line that outer recursion levels will parse later; it is
    /// consulted only for inline-block disambiguation.
    fn parse_fragment(&mut self, text: &str, lookahead: &[&str]) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        let Some(found) = scan::find_earliest(text, self.mode) else {
            for (_, word) in split_words(text) {
                let node = self.tree.new_node(NodeKind::Text, word);
                self.tree.append_child(self.current, node);
            }
            return;
        };

        match found {
            Found::InlineComment(pos) => {
                self.parse_fragment(&text[..pos], lookahead);
                let node = self
                    .tree
                    .new_node(NodeKind::Token(&INLINE_COMMENT), &text[pos..]);
                self.tree.append_child(self.current, node);
            }
            Found::CommentOpen(pos) => {
                self.parse_fragment(&text[..pos], lookahead);
                self.open_comment(&text[pos + COMMENT_OPEN.ident.len()..], lookahead);
            }
            Found::Str { pos, end } | Found::Number { pos, end } => {
                self.parse_span(text, pos, end, lookahead, |tree| {
                    tree.new_node(NodeKind::Text, &text[pos..end])
                });
            }
            Found::Word { pos, def } => {
                let end = pos + def.ident.len();
                self.parse_span(text, pos, end, lookahead, |tree| {
                    tree.new_node(NodeKind::Token(def), def.ident)
                });
            }
            Found::Literal { pos, def } => {
                if def.dir == Dir::None {
                    let end = pos + def.ident.len();
                    self.parse_span(text, pos, end, lookahead, |tree| {
                        tree.new_node(NodeKind::Token(def), def.ident)
                    });
                } else {
                    self.parse_block(text, pos, def, lookahead);
                }
            }
        }
    }

    /// Flush the text before `pos`, emit one node, continue after `end`
    fn parse_span(
        &mut self,
        text: &str,
        pos: usize,
        end: usize,
        lookahead: &[&str],
        make: impl FnOnce(&mut Tree) -> NodeId,
    ) {
        let rest = &text[end..];
        let inner = with_fragment(rest, lookahead);
        self.parse_fragment(&text[..pos], &inner);

        let node = make(&mut self.tree);
        self.tree.append_child(self.current, node);

        self.parse_fragment(rest, lookahead);
    }

    // ---- blocks ---------------------------------------------------------

    fn parse_block(&mut self, text: &str, pos: usize, def: &'static TokenDef, lookahead: &[&str]) {
        let rest = &text[pos + def.ident.len()..];
        let inner = with_fragment(rest, lookahead);
        self.parse_fragment(&text[..pos], &inner);

        // Template mode toggles exactly when the token carries the flag,
        // regardless of tree depth.
        if def.enters_template {
            self.mode = Mode::Template;
        }
        if def.exits_template {
            self.mode = Mode::Host;
        }

        match def.dir {
            Dir::Open => self.open_block(def, rest, lookahead),
            _ => self.close_block(def),
        }

        self.parse_fragment(rest, lookahead);
    }

    fn open_block(&mut self, def: &'static TokenDef, rest: &str, lookahead: &[&str]) {
        let inline = is_inline(def, rest, lookahead);
        let node = self.tree.new_node(NodeKind::Token(def), def.ident);
        self.tree.node_mut(node).inline = inline;
        self.tree.append_child(self.current, node);
        self.current = node;
    }

    fn close_block(&mut self, def: &'static TokenDef) {
        let node = self.tree.new_node(NodeKind::Token(def), def.ident);
        self.tree.append_child(self.current, node);
        // An unmatched closer saturates at the root
        self.current = self.tree.parent(self.current).unwrap_or_else(|| self.tree.root());
    }

    // ---- multiline comments ---------------------------------------------

    fn open_comment(&mut self, after: &str, lookahead: &[&str]) {
        let node = self
            .tree
            .new_node(NodeKind::Token(&COMMENT_OPEN), COMMENT_OPEN.ident);
        self.tree.append_child(self.current, node);
        self.current = node;
        self.in_comment = true;

        if let Some(pos) = after.find(COMMENT_CLOSE.ident) {
            self.append_comment_text(&after[..pos]);
            self.close_comment();
            self.parse_fragment(&after[pos + COMMENT_CLOSE.ident.len()..], lookahead);
        } else {
            self.append_comment_text(after);
        }
    }

    /// A full raw line while inside an open multiline comment
    fn comment_line(&mut self, line: &str) {
        if let Some(pos) = line.find(COMMENT_CLOSE.ident) {
            self.append_comment_text(&line[..pos]);
            self.close_comment();
            self.parse_fragment(&line[pos + COMMENT_CLOSE.ident.len()..], &[]);
        } else {
            self.append_comment_text(line);
        }
    }

    fn close_comment(&mut self) {
        let close = self
            .tree
            .new_node(NodeKind::Token(&COMMENT_CLOSE), COMMENT_CLOSE.ident);
        self.tree.append_child(self.current, close);
        self.current = self.tree.parent(self.current).unwrap_or_else(|| self.tree.root());
        self.in_comment = false;
    }

    /// Accumulate raw comment content on the container's text child
    fn append_comment_text(&mut self, content: &str) {
        if content.is_empty() {
            return;
        }
        if let Some(last) = self.tree.last_child(self.current) {
            if matches!(self.tree.node(last).kind, NodeKind::Text) {
                self.tree.node_mut(last).value.push_str(content);
                return;
            }
        }
        let node = self.tree.new_node(NodeKind::Text, content);
        self.tree.append_child(self.current, node);
    }
}

/// Prepend a fragment to the lookahead window
fn with_fragment<'t>(fragment: &'t str, lookahead: &[&'t str]) -> Vec<&'t str> {
    let mut window = Vec::with_capacity(lookahead.len() + 1);
    window.push(fragment);
    window.extend_from_slice(lookahead);
    window
}

/// Decide whether a block is inline: within the remainder of the line
/// plus the lookahead window, does a terminator occur before the next
/// same-kind opener (pairing off nested opener/terminator pairs)?
fn is_inline(def: &'static TokenDef, rest: &str, lookahead: &[&str]) -> bool {
    let mut opens = indices_of(rest, def.ident, 0);
    let mut closes = Vec::new();
    for closer in def.closers {
        closes.extend(indices_of(rest, closer, 0));
    }
    let mut offset = rest.len();
    for fragment in lookahead {
        opens.extend(indices_of(fragment, def.ident, offset));
        for closer in def.closers {
            closes.extend(indices_of(fragment, closer, offset));
        }
        offset += fragment.len();
    }
    opens.sort_unstable();
    closes.sort_unstable();

    let mut next_open = 0;
    for close in closes {
        match opens.get(next_open) {
            None => return true,
            Some(&open) if close < open => return true,
            Some(_) => next_open += 1,
        }
    }
    false
}

fn indices_of(text: &str, needle: &str, offset: usize) -> Vec<usize> {
    let mut positions = Vec::new();
    let mut start = 0;
    while let Some(pos) = text[start..].find(needle) {
        positions.push(offset + start + pos);
        start += pos + needle.len();
    }
    positions
}

fn split_words(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(s) = start.take() {
                words.push((s, &text[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        words.push((s, &text[s..]));
    }
    words.into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Family;
    use crate::stringify::stringify;

    fn token_idents(tree: &Tree, parent: NodeId) -> Vec<String> {
        tree.node(parent)
            .children
            .iter()
            .map(|&c| tree.node(c).value.clone())
            .collect()
    }

    #[test]
    fn test_plain_statement() {
        let tree = parse("mesh Th;");
        let root = tree.root();
        let values = token_idents(&tree, root);
        assert_eq!(values, vec!["mesh", "Th", ";", "\n"]);
    }

    #[test]
    fn test_block_nesting() {
        let tree = parse("{a;}");
        let root = tree.root();
        let children = tree.node(root).children.clone();
        // Brace container plus the end-of-line break
        assert_eq!(children.len(), 2);
        let brace = children[0];
        assert!(tree.is_block_container(brace));
        let inner = token_idents(&tree, brace);
        assert_eq!(inner, vec!["a", ";", "}"]);
        // The closer is the last child, not a sibling
        let close = *tree.node(brace).children.last().unwrap();
        assert_eq!(tree.def(close).unwrap().dir, Dir::Close);
    }

    #[test]
    fn test_inline_detection() {
        let tree = parse("f(x, y);");
        let root = tree.root();
        let paren = tree.node(root).children[1];
        assert!(tree.is_block_container(paren));
        assert!(tree.node(paren).inline);

        let tree = parse("{\nx;\n}");
        let brace = tree.node(tree.root()).children[0];
        assert!(!tree.node(brace).inline);
    }

    #[test]
    fn test_unbalanced_closer_stays_at_root() {
        let tree = parse("}a;");
        let root = tree.root();
        let values = token_idents(&tree, root);
        assert_eq!(values, vec!["}", "a", ";", "\n"]);
    }

    #[test]
    fn test_string_single_token() {
        let tree = parse("cout << \"a b  c\";");
        let values = token_idents(&tree, tree.root());
        assert_eq!(values, vec!["cout", "<<", "\"a b  c\"", ";", "\n"]);
    }

    #[test]
    fn test_escaped_quote_in_string() {
        let tree = parse(r#"x = "a\"b";"#);
        let values = token_idents(&tree, tree.root());
        assert_eq!(values, vec!["x", "=", r#""a\"b""#, ";", "\n"]);
    }

    #[test]
    fn test_scientific_number_single_token() {
        let tree = parse("real eps = 1.5e-3;");
        let values = token_idents(&tree, tree.root());
        assert_eq!(values, vec!["real", "eps", "=", "1.5e-3", ";", "\n"]);
    }

    #[test]
    fn test_inline_comment_consumes_line() {
        let tree = parse("a; // trailing note");
        let values = token_idents(&tree, tree.root());
        assert_eq!(values, vec!["a", ";", "// trailing note", "\n"]);
    }

    #[test]
    fn test_multiline_comment_accumulates_raw() {
        let tree = parse("/* first\nsecond = x\n*/");
        let root = tree.root();
        let container = tree.node(root).children[0];
        let children = tree.node(container).children.clone();
        assert_eq!(children.len(), 2);
        // Raw content with folded newlines, untokenized
        assert_eq!(tree.node(children[0]).value, " first\nsecond = x\n");
        assert_eq!(tree.node(children[1]).value, "*/");
    }

    #[test]
    fn test_comment_closes_same_line() {
        let tree = parse("/* note */ x;");
        let values = token_idents(&tree, tree.root());
        assert_eq!(values, vec!["/*", "x", ";", "\n"]);
    }

    #[test]
    fn test_template_mode_switches() {
        let tree = parse("<%= a ? 'x' : 'y' %>");
        let root = tree.root();
        let region = tree.node(root).children[0];
        assert!(tree.is_block_container(region));
        assert!(tree.node(region).inline);
        let values = token_idents(&tree, region);
        assert_eq!(values, vec!["a", "?", "'x'", ":", "'y'", "%>"]);
    }

    #[test]
    fn test_transpose_outside_template() {
        // In host mode the apostrophe is an operator, not a string
        let tree = parse("u';");
        let root = tree.root();
        let children = tree.node(root).children.clone();
        let apostrophe = tree.def(children[1]).unwrap();
        assert_eq!(apostrophe.family, Family::Operator);
        assert_eq!(apostrophe.ident, "'");
    }

    #[test]
    fn test_round_trip_preserves_tokens() {
        // Serialization without formatting loses only inter-token spaces
        let tree = parse("if (a) { b; }");
        assert_eq!(stringify(&tree), "if(a){b;}\n");
    }
}
