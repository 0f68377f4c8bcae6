/// Comment normalization
///
/// Inline comments collapse their internal whitespace and get the
/// canonical `// ` marker. Multiline comment bodies keep their first line
/// as written; every later non-blank line is re-prefixed with ` * `,
/// replacing whatever marker or leading whitespace it had, so repeated
/// formatting is stable.
use crate::catalog::Dir;
use crate::parser::{NodeId, NodeKind, Tree};

pub(crate) fn normalize_inline(tree: &mut Tree, id: NodeId) {
    let value = &tree.node(id).value;
    let content = value.strip_prefix("//").unwrap_or(value).trim();
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");
    tree.node_mut(id).value = if collapsed.is_empty() {
        "//".to_string()
    } else {
        format!("// {collapsed}")
    };
}

pub(crate) fn normalize_multiline(tree: &mut Tree, container: NodeId) {
    let children = tree.node(container).children.clone();
    let mut body_ends_in_whitespace = true;

    for &child in &children {
        if matches!(tree.node(child).kind, NodeKind::Text) {
            let normalized = normalize_body(&tree.node(child).value);
            body_ends_in_whitespace = normalized
                .chars()
                .last()
                .is_none_or(char::is_whitespace);
            tree.node_mut(child).value = normalized;
        }
    }

    // Keep the closer off the last content character
    for &child in &children {
        if tree.def(child).is_some_and(|d| d.dir == Dir::Close) && !body_ends_in_whitespace {
            let value = &mut tree.node_mut(child).value;
            if !value.starts_with(' ') {
                value.insert(0, ' ');
            }
        }
    }
}

fn normalize_body(value: &str) -> String {
    let mut lines = Vec::new();
    for (i, line) in value.split('\n').enumerate() {
        if i == 0 {
            lines.push(line.to_string());
            continue;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            lines.push(String::new());
            continue;
        }
        let content = trimmed
            .strip_prefix('*')
            .map_or(trimmed, str::trim_start);
        if content.is_empty() {
            lines.push(" *".to_string());
        } else {
            lines.push(format!(" * {content}"));
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_continuation_prefix() {
        assert_eq!(normalize_body(" title\nbody\n"), " title\n * body\n");
    }

    #[test]
    fn test_body_blank_lines_kept_blank() {
        assert_eq!(normalize_body(" a\n\nb\n"), " a\n\n * b\n");
    }

    #[test]
    fn test_body_existing_markers_stable() {
        let once = normalize_body(" a\nb\n");
        assert_eq!(normalize_body(&once), once);
    }

    #[test]
    fn test_body_bare_star_line() {
        assert_eq!(normalize_body("x\n*\n"), "x\n *\n");
    }

    #[test]
    fn test_body_indented_continuation() {
        assert_eq!(normalize_body("\n      deep\n"), "\n * deep\n");
    }
}
