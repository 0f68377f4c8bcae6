//! Inline directive parsing for `// edpfmt:` comments
//!
//! Supports in-file configuration overrides via special comments:
//! `// edpfmt: --indent 2 --no-spacing`

use std::sync::LazyLock;

use regex::Regex;

/// Pattern to match edpfmt directives
static EDPFMT_DIRECTIVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*//\s*edpfmt:\s*(.*)\s*$").unwrap());

/// Parsed directive options that can override config
#[derive(Debug, Default, Clone)]
pub struct DirectiveOverrides {
    pub indent: Option<usize>,
    pub impose_spacing: Option<bool>,
    pub impose_indent: Option<bool>,
}

impl DirectiveOverrides {
    /// Check if any overrides are set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indent.is_none() && self.impose_spacing.is_none() && self.impose_indent.is_none()
    }
}

/// Check if a line contains an edpfmt directive
#[must_use]
pub fn is_directive_line(line: &str) -> bool {
    EDPFMT_DIRECTIVE_RE.is_match(line)
}

/// Parse an edpfmt directive line and return option overrides
///
/// # Arguments
/// * `line` - The line containing the directive
///
/// # Returns
/// * `Some(DirectiveOverrides)` if the line is a valid directive
/// * `None` if the line is not a directive
#[must_use]
pub fn parse_directive(line: &str) -> Option<DirectiveOverrides> {
    let caps = EDPFMT_DIRECTIVE_RE.captures(line)?;
    let args_str = caps.get(1)?.as_str();

    // Parse the arguments like CLI args
    parse_directive_args(args_str)
}

/// Parse directive arguments into overrides
fn parse_directive_args(args_str: &str) -> Option<DirectiveOverrides> {
    let mut overrides = DirectiveOverrides::default();
    let tokens: Vec<&str> = args_str.split_whitespace().collect();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            "-i" | "--indent" => {
                i += 1;
                if i < tokens.len() {
                    overrides.indent = tokens[i].parse().ok();
                }
            }
            "--no-spacing" | "--disable-spacing" => {
                overrides.impose_spacing = Some(false);
            }
            "--enable-spacing" => {
                overrides.impose_spacing = Some(true);
            }
            "--no-indent" | "--disable-indent" => {
                overrides.impose_indent = Some(false);
            }
            "--enable-indent" => {
                overrides.impose_indent = Some(true);
            }
            _ => {
                // Unknown option, skip
            }
        }
        i += 1;
    }

    if overrides.is_empty() {
        None
    } else {
        Some(overrides)
    }
}

/// Scan input for edpfmt directives and return the first found
///
/// This reads the file looking for `// edpfmt:` lines.
/// Only the first directive is used (subsequent ones are ignored).
pub fn find_directive<R: std::io::BufRead>(input: &mut R) -> Option<DirectiveOverrides> {
    let mut buffer = String::new();

    while input.read_line(&mut buffer).ok()? > 0 {
        if is_directive_line(&buffer) {
            return parse_directive(&buffer);
        }
        buffer.clear();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_directive_line() {
        assert!(is_directive_line("// edpfmt: --indent 2"));
        assert!(is_directive_line("  // edpfmt: --no-spacing"));
        assert!(is_directive_line("// EDPFMT: --indent 8"));
        assert!(!is_directive_line("// this is a regular comment"));
        assert!(!is_directive_line("x = 1;"));
    }

    #[test]
    fn test_parse_directive_indent() {
        let overrides = parse_directive("// edpfmt: --indent 2").unwrap();
        assert_eq!(overrides.indent, Some(2));
    }

    #[test]
    fn test_parse_directive_no_spacing() {
        let overrides = parse_directive("// edpfmt: --no-spacing").unwrap();
        assert_eq!(overrides.impose_spacing, Some(false));
    }

    #[test]
    fn test_parse_directive_multiple() {
        let overrides = parse_directive("// edpfmt: --indent 8 --no-indent").unwrap();
        assert_eq!(overrides.indent, Some(8));
        assert_eq!(overrides.impose_indent, Some(false));
    }

    #[test]
    fn test_parse_invalid_directive() {
        // Empty directive
        let overrides = parse_directive("// edpfmt:");
        assert!(overrides.is_none());
    }

    #[test]
    fn test_find_directive_in_stream() {
        let text = "mesh Th;\n// edpfmt: --indent 2\nplot(u);\n";
        let mut reader = std::io::BufReader::new(text.as_bytes());
        let overrides = find_directive(&mut reader).unwrap();
        assert_eq!(overrides.indent, Some(2));
    }
}
