/// Arena-backed document tree
///
/// Nodes are addressed by stable [`NodeId`] indices. The children list of
/// a node is the sole ownership and document-order record; `left`/`right`
/// are a derived lookaround cache kept up to date by the splice
/// operations and recomputable wholesale with [`Tree::relink`]. Removal
/// detaches a node from its parent but leaves it in the arena, so ids
/// held by an in-flight traversal never dangle.
use crate::catalog::{Dir, Family, TokenDef};

/// Stable index of a node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Closed set of node kinds
#[derive(Debug, Clone, Copy)]
pub enum NodeKind {
    Root,
    /// A node originating from a catalog definition
    Token(&'static TokenDef),
    /// Plain text: identifiers, numbers, string literals, comment bodies
    Text,
    /// Synthetic single space inserted by the spacing pass
    Space,
    /// Synthetic single-space indentation unit inserted by the indent pass
    Indent,
    LineBreak,
}

#[derive(Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub value: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    /// Whether this block's closer was found before the next same-kind
    /// opener at parse time
    pub inline: bool,
}

#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    #[must_use]
    pub fn new() -> Self {
        let root = Node {
            kind: NodeKind::Root,
            value: String::new(),
            children: Vec::new(),
            parent: None,
            left: None,
            right: None,
            inline: false,
        };
        Tree {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Allocate a detached node
    pub fn new_node(&mut self, kind: NodeKind, value: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            value: value.into(),
            children: Vec::new(),
            parent: None,
            left: None,
            right: None,
            inline: false,
        });
        id
    }

    /// Append `child` as the last child of `parent`, updating sibling links
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last = self.nodes[parent.0].children.last().copied();
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[child.0].left = prev_last;
        self.nodes[child.0].right = None;
        if let Some(prev) = prev_last {
            self.nodes[prev.0].right = Some(child);
        }
    }

    /// Insert `new` immediately before `anchor` among its siblings
    pub fn insert_before(&mut self, anchor: NodeId, new: NodeId) {
        let Some(parent) = self.nodes[anchor.0].parent else {
            return;
        };
        let Some(index) = self.child_index(parent, anchor) else {
            return;
        };
        let left = self.nodes[anchor.0].left;
        self.nodes[parent.0].children.insert(index, new);
        self.nodes[new.0].parent = Some(parent);
        self.nodes[new.0].left = left;
        self.nodes[new.0].right = Some(anchor);
        self.nodes[anchor.0].left = Some(new);
        if let Some(l) = left {
            self.nodes[l.0].right = Some(new);
        }
    }

    /// Insert `new` immediately after `anchor` among its siblings
    pub fn insert_after(&mut self, anchor: NodeId, new: NodeId) {
        let Some(parent) = self.nodes[anchor.0].parent else {
            return;
        };
        let Some(index) = self.child_index(parent, anchor) else {
            return;
        };
        let right = self.nodes[anchor.0].right;
        self.nodes[parent.0].children.insert(index + 1, new);
        self.nodes[new.0].parent = Some(parent);
        self.nodes[new.0].left = Some(anchor);
        self.nodes[new.0].right = right;
        self.nodes[anchor.0].right = Some(new);
        if let Some(r) = right {
            self.nodes[r.0].left = Some(new);
        }
    }

    /// Detach `id` from its parent, patching its neighbors' links
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.nodes[id.0].parent else {
            return;
        };
        let Some(index) = self.child_index(parent, id) else {
            return;
        };
        let left = self.nodes[id.0].left;
        let right = self.nodes[id.0].right;
        self.nodes[parent.0].children.remove(index);
        if let Some(l) = left {
            self.nodes[l.0].right = right;
        }
        if let Some(r) = right {
            self.nodes[r.0].left = left;
        }
        self.nodes[id.0].parent = None;
        self.nodes[id.0].left = None;
        self.nodes[id.0].right = None;
    }

    fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.nodes[parent.0].children.iter().position(|&c| c == child)
    }

    /// Recompute every left/right sibling link under `id` from the
    /// children-list order
    pub fn relink(&mut self, id: NodeId) {
        let children = self.nodes[id.0].children.clone();
        for (i, &child) in children.iter().enumerate() {
            self.nodes[child.0].left = if i > 0 { Some(children[i - 1]) } else { None };
            self.nodes[child.0].right = children.get(i + 1).copied();
            self.relink(child);
        }
    }

    // ---- lookaround accessors ------------------------------------------

    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    #[must_use]
    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].left
    }

    #[must_use]
    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].right
    }

    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.first().copied()
    }

    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].children.last().copied()
    }

    /// Catalog definition of a token node
    #[must_use]
    pub fn def(&self, id: NodeId) -> Option<&'static TokenDef> {
        match self.nodes[id.0].kind {
            NodeKind::Token(def) => Some(def),
            _ => None,
        }
    }

    /// Space, indent or line-break node
    #[must_use]
    pub fn is_whitespace(&self, id: NodeId) -> bool {
        matches!(
            self.nodes[id.0].kind,
            NodeKind::Space | NodeKind::Indent | NodeKind::LineBreak
        )
    }

    #[must_use]
    pub fn is_line_break(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::LineBreak)
    }

    #[must_use]
    pub fn is_indent(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Indent)
    }

    /// Open-direction block-family node (a block container)
    #[must_use]
    pub fn is_block_container(&self, id: NodeId) -> bool {
        self.def(id)
            .is_some_and(|d| d.family == Family::Block && d.dir == Dir::Open)
    }

    /// Any open-direction container (block or multiline comment)
    #[must_use]
    pub fn is_container(&self, id: NodeId) -> bool {
        self.def(id).is_some_and(|d| d.dir == Dir::Open)
    }

    /// Nearest enclosing block container of `id`, if any
    #[must_use]
    pub fn enclosing_block(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            if self.is_block_container(p) {
                return Some(p);
            }
            cur = self.parent(p);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_maintains_links() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.new_node(NodeKind::Text, "a");
        let b = tree.new_node(NodeKind::Text, "b");
        tree.append_child(root, a);
        tree.append_child(root, b);

        assert_eq!(tree.left(b), Some(a));
        assert_eq!(tree.right(a), Some(b));
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.node(root).children, vec![a, b]);
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.new_node(NodeKind::Text, "a");
        let c = tree.new_node(NodeKind::Text, "c");
        tree.append_child(root, a);
        tree.append_child(root, c);

        let b = tree.new_node(NodeKind::Text, "b");
        tree.insert_after(a, b);
        assert_eq!(tree.node(root).children, vec![a, b, c]);
        assert_eq!(tree.left(b), Some(a));
        assert_eq!(tree.right(b), Some(c));
        assert_eq!(tree.left(c), Some(b));

        let z = tree.new_node(NodeKind::Text, "z");
        tree.insert_before(a, z);
        assert_eq!(tree.node(root).children, vec![z, a, b, c]);
        assert_eq!(tree.left(a), Some(z));
        assert_eq!(tree.left(z), None);
    }

    #[test]
    fn test_remove_patches_neighbors() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.new_node(NodeKind::Text, "a");
        let b = tree.new_node(NodeKind::Text, "b");
        let c = tree.new_node(NodeKind::Text, "c");
        tree.append_child(root, a);
        tree.append_child(root, b);
        tree.append_child(root, c);

        tree.remove(b);
        assert_eq!(tree.node(root).children, vec![a, c]);
        assert_eq!(tree.right(a), Some(c));
        assert_eq!(tree.left(c), Some(a));
        assert_eq!(tree.parent(b), None);
    }

    #[test]
    fn test_relink_recomputes_cache() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.new_node(NodeKind::Text, "a");
        let b = tree.new_node(NodeKind::Text, "b");
        tree.append_child(root, a);
        tree.append_child(root, b);

        // Corrupt the cache, then relink
        tree.node_mut(a).right = None;
        tree.node_mut(b).left = None;
        tree.relink(root);
        assert_eq!(tree.right(a), Some(b));
        assert_eq!(tree.left(b), Some(a));
    }
}
