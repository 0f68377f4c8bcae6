/// Earliest-match scanning across the token catalog
///
/// For each lexical family this module reports the earliest character
/// offset at which one of its entries occurs in a text fragment. The
/// tokenizer picks the family with the globally smallest offset; families
/// are probed in priority order so that the earlier family wins ties
/// (comments over operators for `//`, blocks over operators for `<%`).
use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{Mode, TokenDef, BLOCKS, COMMENT_OPEN, CUSTOMS, INLINE_COMMENT, KEYWORDS,
    OPERATORS, TYPES};

/// Scientific-notation literal, matched as a single token ahead of
/// operator scanning so the exponent's minus sign is never spaced
pub static SCI_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9][0-9.]*e-[0-9.]+").expect("valid number pattern"));

/// Result of probing a fragment for the earliest token
#[derive(Debug, Clone, Copy)]
pub(crate) enum Found {
    /// `//` at the given offset; consumes the rest of the fragment
    InlineComment(usize),
    /// `/*` at the given offset
    CommentOpen(usize),
    /// Quoted string literal occupying `pos..end`
    Str { pos: usize, end: usize },
    /// Scientific-notation number occupying `pos..end`
    Number { pos: usize, end: usize },
    /// Whole-word type/keyword match at the given offset
    Word { pos: usize, def: &'static TokenDef },
    /// Literal custom/block/operator match at the given offset
    Literal { pos: usize, def: &'static TokenDef },
}

impl Found {
    fn pos(&self) -> usize {
        match *self {
            Found::InlineComment(pos) | Found::CommentOpen(pos) => pos,
            Found::Str { pos, .. }
            | Found::Number { pos, .. }
            | Found::Word { pos, .. }
            | Found::Literal { pos, .. } => pos,
        }
    }
}

/// Find the earliest token of any family in `text`
pub(crate) fn find_earliest(text: &str, mode: Mode) -> Option<Found> {
    let mut best: Option<Found> = None;
    let mut consider = |candidate: Option<Found>| {
        if let Some(c) = candidate {
            if best.as_ref().is_none_or(|b| c.pos() < b.pos()) {
                best = Some(c);
            }
        }
    };

    consider(text.find(INLINE_COMMENT.ident).map(Found::InlineComment));
    consider(text.find(COMMENT_OPEN.ident).map(Found::CommentOpen));
    consider(find_string(text, mode).map(|(pos, end)| Found::Str { pos, end }));
    consider(SCI_NUMBER_RE.find(text).map(|m| Found::Number {
        pos: m.start(),
        end: m.end(),
    }));
    consider(find_first_word(text, TYPES, mode).map(|(pos, def)| Found::Word { pos, def }));
    consider(find_first_word(text, KEYWORDS, mode).map(|(pos, def)| Found::Word { pos, def }));
    consider(find_literal(text, CUSTOMS, mode).map(|(pos, def)| Found::Literal { pos, def }));
    consider(find_literal(text, BLOCKS, mode).map(|(pos, def)| Found::Literal { pos, def }));
    consider(find_literal(text, OPERATORS, mode).map(|(pos, def)| Found::Literal { pos, def }));

    best
}

/// Earliest literal match over a table, first entry winning position ties
fn find_literal(
    text: &str,
    defs: &'static [TokenDef],
    mode: Mode,
) -> Option<(usize, &'static TokenDef)> {
    let mut best: Option<(usize, &'static TokenDef)> = None;
    for def in defs {
        if def.hints(mode).skip {
            continue;
        }
        if let Some(pos) = text.find(def.ident) {
            if best.is_none_or(|(p, _)| pos < p) {
                best = Some((pos, def));
            }
        }
    }
    best
}

/// Earliest exact whole-word match over a table
///
/// Words are whitespace-delimited runs; the match offset is the word's
/// character offset so it is comparable with the literal families.
fn find_first_word(
    text: &str,
    defs: &'static [TokenDef],
    mode: Mode,
) -> Option<(usize, &'static TokenDef)> {
    for (offset, word) in words_with_offsets(text) {
        for def in defs {
            if def.hints(mode).skip {
                continue;
            }
            if word == def.ident {
                return Some((offset, def));
            }
        }
    }
    None
}

fn words_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
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

/// Earliest valid string literal in the fragment
///
/// Single quotes are only a string delimiter in template mode, and only
/// when the closing quote precedes any region closer; double quotes are
/// recognized in both modes, with backslash-escaped quotes skipped. An
/// unterminated candidate simply does not match.
fn find_string(text: &str, mode: Mode) -> Option<(usize, usize)> {
    let double = find_double_quote(text);
    if mode == Mode::Host {
        return double;
    }
    let single = find_single_quote(text);
    match (single, double) {
        (Some(s), Some(d)) => Some(if s.0 <= d.0 { s } else { d }),
        (s, d) => s.or(d),
    }
}

fn find_double_quote(text: &str) -> Option<(usize, usize)> {
    let open = text.find('"')?;
    let bytes = text.as_bytes();
    let mut i = open + 1;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            let mut backslashes = 0;
            let mut j = i;
            while j > open + 1 && bytes[j - 1] == b'\\' {
                backslashes += 1;
                j -= 1;
            }
            if backslashes % 2 == 0 {
                return Some((open, i + 1));
            }
        }
        i += 1;
    }
    None
}

fn find_single_quote(text: &str) -> Option<(usize, usize)> {
    let open = text.find('\'')?;
    let rest = &text[open + 1..];
    let close = rest.find('\'')?;
    let end = open + 1 + close + 1;
    if text[open..end - 1].contains("%>") {
        return None;
    }
    Some((open, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_regex() {
        let m = SCI_NUMBER_RE.find("x = 1.5e-3;").unwrap();
        assert_eq!(m.as_str(), "1.5e-3");
        assert!(SCI_NUMBER_RE.find("x = 15").is_none());
    }

    #[test]
    fn test_comment_beats_divide() {
        let found = find_earliest("a // b", Mode::Host).unwrap();
        assert!(matches!(found, Found::InlineComment(2)));
    }

    #[test]
    fn test_string_beats_comment_inside() {
        // The quote opens before the // marker, so the string wins
        let found = find_earliest("\"http://x\"", Mode::Host).unwrap();
        assert!(matches!(found, Found::Str { pos: 0, end: 10 }));
    }

    #[test]
    fn test_longest_operator_wins_tie() {
        let found = find_earliest("a === b", Mode::Template).unwrap();
        match found {
            Found::Literal { pos, def } => {
                assert_eq!(pos, 2);
                assert_eq!(def.ident, "===");
            }
            other => panic!("unexpected match: {other:?}"),
        }
    }

    #[test]
    fn test_template_marker_beats_operator() {
        let found = find_earliest("<%= x", Mode::Host).unwrap();
        match found {
            Found::Literal { pos, def } => {
                assert_eq!(pos, 0);
                assert_eq!(def.ident, "<%=");
            }
            other => panic!("unexpected match: {other:?}"),
        }
    }

    #[test]
    fn test_whole_word_types() {
        // "solve" as a word matches; embedded in an identifier it does not
        let found = find_earliest("solve a(u, v)", Mode::Host).unwrap();
        match found {
            Found::Word { pos, def } => {
                assert_eq!(pos, 0);
                assert_eq!(def.ident, "solve");
            }
            other => panic!("unexpected match: {other:?}"),
        }
        // No word match inside "resolver"; '(' is the earliest token
        let found = find_earliest("resolver(x)", Mode::Host).unwrap();
        match found {
            Found::Literal { def, .. } => assert_eq!(def.ident, "("),
            other => panic!("unexpected match: {other:?}"),
        }
    }

    #[test]
    fn test_dot_skipped_in_host() {
        // "0.5" contains only a dot; skipped in host mode so nothing matches
        assert!(find_earliest("0.5", Mode::Host).is_none());
    }

    #[test]
    fn test_single_quote_template_only() {
        assert!(matches!(
            find_earliest("'x'", Mode::Template),
            Some(Found::Str { pos: 0, end: 3 })
        ));
        // In host mode the apostrophe is the transpose operator
        match find_earliest("'x'", Mode::Host) {
            Some(Found::Literal { def, .. }) => assert_eq!(def.ident, "'"),
            other => panic!("unexpected match: {other:?}"),
        }
    }

    #[test]
    fn test_single_quote_not_closed_before_region_end() {
        // The would-be string spans the region closer, so it is rejected
        assert!(find_single_quote("'a %> b'").is_none());
    }

    #[test]
    fn test_escaped_double_quote() {
        let (pos, end) = find_double_quote(r#""a\"b" rest"#).unwrap();
        assert_eq!(pos, 0);
        assert_eq!(end, 6);
        assert!(find_double_quote(r#""unterminated"#).is_none());
    }
}
