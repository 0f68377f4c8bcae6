//! Parse → format → serialize orchestration

use std::io::{BufRead, Write};

use crate::config::Config;
use crate::format::format;
use crate::parser::parse;
use crate::stringify::stringify;
use crate::Result;

/// Format a whole document: text in, text out
///
/// Every run rebuilds the tree from scratch; nothing is shared between
/// invocations, so this is safe to call from parallel workers.
#[must_use]
pub fn format_document(input: &str, config: &Config) -> String {
    let mut tree = parse(input);
    format(&mut tree, config);
    stringify(&tree)
}

/// Format from a buffered reader into a writer
pub fn format_file<R: BufRead, W: Write>(
    mut input: R,
    output: &mut W,
    config: &Config,
) -> Result<()> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    let formatted = format_document(&text, config);
    output.write_all(formatted.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};

    #[test]
    fn test_format_document_simple() {
        let config = Config::default();
        assert_eq!(format_document("x=1;", &config), "x = 1;\n");
    }

    #[test]
    fn test_format_file_round_trip() {
        let config = Config::default();
        let reader = BufReader::new(Cursor::new("x=1;"));
        let mut output = Vec::new();
        format_file(reader, &mut output, &config).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "x = 1;\n");
    }

    #[test]
    fn test_passes_can_be_disabled() {
        let config = Config {
            impose_spacing: false,
            impose_indent: false,
            ..Config::default()
        };
        // With both passes off, only tokenization normalization remains
        assert_eq!(format_document("x=1;", &config), "x=1;\n");
    }
}
