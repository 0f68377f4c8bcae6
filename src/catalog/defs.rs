/// Static token tables for the FreeFEM grammar and the embedded EJS grammar
///
/// Ordering rules:
/// - Within a family, earlier entries win position ties during scanning,
///   so longer literals sharing a prefix come first (`===` before `==`
///   before `=`, `<%=` before `<%`, `-%>` before `%>`).
/// - The tokenizer consults families in a fixed priority order (comments,
///   strings, numbers, types, keywords, customs, blocks, operators).
use super::types::{Dir, Family, Hints, TokenDef};

const fn block(
    ident: &'static str,
    closers: &'static [&'static str],
    dir: Dir,
    host: Hints,
    template: Hints,
) -> TokenDef {
    TokenDef {
        family: Family::Block,
        ident,
        closers,
        dir,
        host,
        template,
        enters_template: false,
        exits_template: false,
    }
}

const fn ejs_open(ident: &'static str, template: Hints) -> TokenDef {
    TokenDef {
        family: Family::Block,
        ident,
        closers: &["-%>", "%>"],
        dir: Dir::Open,
        host: Hints::NONE,
        template,
        enters_template: true,
        exits_template: false,
    }
}

const fn ejs_close(ident: &'static str, template: Hints) -> TokenDef {
    TokenDef {
        family: Family::Block,
        ident,
        closers: &[],
        dir: Dir::Close,
        host: Hints::NONE,
        template,
        enters_template: false,
        exits_template: true,
    }
}

const fn op(ident: &'static str, host: Hints, template: Hints) -> TokenDef {
    TokenDef {
        family: Family::Operator,
        ident,
        closers: &[],
        dir: Dir::None,
        host,
        template,
        enters_template: false,
        exits_template: false,
    }
}

const fn ty(ident: &'static str) -> TokenDef {
    TokenDef {
        family: Family::Type,
        ident,
        closers: &[],
        dir: Dir::None,
        host: Hints::NONE,
        template: Hints::NONE,
        enters_template: false,
        exits_template: false,
    }
}

/// A type keyword opening a custom scope closed by a trailing `;`
const fn ty_scope(ident: &'static str) -> TokenDef {
    TokenDef {
        family: Family::Type,
        ident,
        closers: &[";"],
        dir: Dir::Open,
        host: Hints::NONE.indent(),
        template: Hints::NONE,
        enters_template: false,
        exits_template: false,
    }
}

const fn kw(ident: &'static str, host: Hints, template: Hints) -> TokenDef {
    TokenDef {
        family: Family::Keyword,
        ident,
        closers: &[],
        dir: Dir::None,
        host,
        template,
        enters_template: false,
        exits_template: false,
    }
}

const SPACED: Hints = Hints::NONE.space_before().space_after();

/// Inline comment marker; consumes to end of line
pub static INLINE_COMMENT: TokenDef = TokenDef {
    family: Family::Comment,
    ident: "//",
    closers: &[],
    dir: Dir::None,
    host: Hints::NONE,
    template: Hints::NONE,
    enters_template: false,
    exits_template: false,
};

/// Multiline comment opener; content is accumulated raw until the closer
pub static COMMENT_OPEN: TokenDef = TokenDef {
    family: Family::Comment,
    ident: "/*",
    closers: &["*/"],
    dir: Dir::Open,
    host: Hints::NONE,
    template: Hints::NONE,
    enters_template: false,
    exits_template: false,
};

pub static COMMENT_CLOSE: TokenDef = TokenDef {
    family: Family::Comment,
    ident: "*/",
    closers: &[],
    dir: Dir::Close,
    host: Hints::NONE,
    template: Hints::NONE,
    enters_template: false,
    exits_template: false,
};

/// Block delimiters, including the EJS region markers
///
/// Host-mode braces always expand (no keep-inline): statement blocks are
/// broken onto their own lines. Parentheses and array brackets keep their
/// original inline layout.
pub static BLOCKS: &[TokenDef] = &[
    block(
        "{",
        &["}"],
        Dir::Open,
        Hints::NONE
            .space_before()
            .space_after()
            .line_break_after()
            .indent(),
        Hints::NONE.space_before().space_after().indent().keep_inline(),
    ),
    block(
        "}",
        &[],
        Dir::Close,
        Hints::NONE
            .space_before()
            .space_after()
            .line_break_before()
            .line_break_after(),
        Hints::NONE.keep_inline(),
    ),
    block(
        "[",
        &["]"],
        Dir::Open,
        Hints::NONE.indent().keep_inline(),
        Hints::NONE.keep_inline(),
    ),
    block(
        "]",
        &[],
        Dir::Close,
        Hints::NONE.keep_inline(),
        Hints::NONE.keep_inline(),
    ),
    block(
        "(",
        &[")"],
        Dir::Open,
        Hints::NONE.indent().keep_inline(),
        Hints::NONE.keep_inline(),
    ),
    block(
        ")",
        &[],
        Dir::Close,
        Hints::NONE.line_break_before().keep_inline(),
        Hints::NONE.keep_inline(),
    ),
    ejs_open("<%#", Hints::NONE.space_before().space_after()),
    ejs_open("<%=", Hints::NONE.space_after()),
    ejs_open(
        "<%-",
        Hints::NONE.space_before().space_after().keep_inline(),
    ),
    ejs_open(
        "<%",
        Hints::NONE
            .space_before()
            .space_after()
            .line_break_after()
            .indent()
            .keep_inline(),
    ),
    ejs_close("-%>", Hints::NONE.space_before().keep_inline()),
    ejs_close(
        "%>",
        Hints::NONE
            .space_before()
            .line_break_before()
            .line_break_after()
            .keep_inline(),
    ),
];

/// Operators, longest-first among shared prefixes
pub static OPERATORS: &[TokenDef] = &[
    op("^-1", Hints::NONE.space_after(), Hints::NONE),
    op("||", SPACED, SPACED),
    op("&&", SPACED, SPACED),
    op("<<", SPACED, Hints::NONE),
    op("++", Hints::NONE, Hints::NONE),
    op("--", Hints::NONE, Hints::NONE),
    op("===", Hints::NONE, SPACED),
    op("!==", Hints::NONE, SPACED),
    op("==", SPACED, Hints::NONE),
    op("!=", SPACED, Hints::NONE),
    op("+=", SPACED, SPACED),
    op("-=", SPACED, SPACED),
    op("*=", SPACED, SPACED),
    op("/=", SPACED, SPACED),
    op("<=", SPACED, SPACED),
    op(">=", SPACED, SPACED),
    op("=>", Hints::NONE, SPACED),
    op("./", SPACED, Hints::NONE),
    op("??", Hints::NONE, SPACED),
    op("?", SPACED, SPACED),
    op("=", SPACED, SPACED),
    op(">", SPACED, SPACED),
    op("<", SPACED, SPACED),
    op("%", SPACED, SPACED),
    op("+", SPACED, SPACED),
    op("-", SPACED, SPACED),
    op("*", SPACED, SPACED),
    op("/", SPACED, SPACED),
    op("'", Hints::NONE.space_after(), Hints::NONE),
    op("^", Hints::NONE, Hints::NONE),
    op(",", Hints::NONE.space_after(), Hints::NONE.space_after()),
    op(
        ";",
        Hints::NONE.space_after().line_break_after(),
        Hints::NONE.space_after(),
    ),
    op(":", SPACED, Hints::NONE.space_after()),
    // Skipped in host mode so a decimal point is never taken for member access
    op(".", Hints::NONE.skip(), Hints::NONE),
];

/// FreeFEM type vocabulary, matched by exact whole-word comparison
///
/// `problem`, `solve` and `varf` open an indentation scope terminated by
/// the statement's trailing `;` rather than a bracket pair.
pub static TYPES: &[TokenDef] = &[
    ty("int[int]"),
    ty("complex[int]"),
    ty("real[int]"),
    ty("int[string]"),
    ty("complex[string]"),
    ty("real[string]"),
    ty("bool"),
    ty("border"),
    ty("complex"),
    ty("fespace"),
    ty("func"),
    ty("int"),
    ty("macro"),
    ty("matrix"),
    ty("mesh"),
    ty("mesh3"),
    ty_scope("problem"),
    ty("real"),
    ty_scope("solve"),
    ty("string"),
    ty_scope("varf"),
];

/// Flow-control keywords, matched by exact whole-word comparison
pub static KEYWORDS: &[TokenDef] = &[
    kw("break", Hints::NONE, Hints::NONE),
    kw(
        "catch",
        Hints::NONE.space_after().eat_line_break_before(),
        Hints::NONE.space_after().eat_line_break_before(),
    ),
    kw("continue", Hints::NONE, Hints::NONE),
    kw(
        "else",
        Hints::NONE
            .space_before()
            .space_after()
            .eat_line_break_before(),
        Hints::NONE
            .space_before()
            .space_after()
            .eat_line_break_before(),
    ),
    kw("for", Hints::NONE.space_after(), Hints::NONE.space_after()),
    kw("if", Hints::NONE.space_after(), Hints::NONE.space_after()),
    kw("try", Hints::NONE, Hints::NONE),
    kw("while", Hints::NONE.space_after(), Hints::NONE.space_after()),
];

/// Multi-character literals matched ahead of block/operator handling
pub static CUSTOMS: &[TokenDef] = &[TokenDef {
    family: Family::Custom,
    ident: "[]",
    closers: &[],
    dir: Dir::None,
    host: Hints::NONE,
    template: Hints::NONE,
    enters_template: false,
    exits_template: false,
}];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Mode;

    #[test]
    fn test_longest_prefix_ordering() {
        // Every operator sharing a prefix with a later entry must come first
        let idents: Vec<&str> = OPERATORS.iter().map(|d| d.ident).collect();
        let triple = idents.iter().position(|&i| i == "===").unwrap();
        let double = idents.iter().position(|&i| i == "==").unwrap();
        let single = idents.iter().position(|&i| i == "=").unwrap();
        assert!(triple < double && double < single);

        let block_idents: Vec<&str> = BLOCKS.iter().map(|d| d.ident).collect();
        let escape = block_idents.iter().position(|&i| i == "<%=").unwrap();
        let open = block_idents.iter().position(|&i| i == "<%").unwrap();
        assert!(escape < open);
        let trim = block_idents.iter().position(|&i| i == "-%>").unwrap();
        let close = block_idents.iter().position(|&i| i == "%>").unwrap();
        assert!(trim < close);
    }

    #[test]
    fn test_dot_skipped_in_host_only() {
        let dot = OPERATORS.iter().find(|d| d.ident == ".").unwrap();
        assert!(dot.hints(Mode::Host).skip);
        assert!(!dot.hints(Mode::Template).skip);
    }

    #[test]
    fn test_template_region_markers() {
        for def in BLOCKS {
            match def.ident {
                "<%" | "<%=" | "<%-" | "<%#" => assert!(def.enters_template),
                "%>" | "-%>" => assert!(def.exits_template),
                _ => {
                    assert!(!def.enters_template);
                    assert!(!def.exits_template);
                }
            }
        }
    }

    #[test]
    fn test_custom_scope_types() {
        for ident in ["problem", "solve", "varf"] {
            let def = TYPES.iter().find(|d| d.ident == ident).unwrap();
            assert_eq!(def.dir, Dir::Open);
            assert_eq!(def.closers, &[";"]);
            assert!(def.hints(Mode::Host).indent);
        }
        let mesh = TYPES.iter().find(|d| d.ident == "mesh").unwrap();
        assert_eq!(mesh.dir, Dir::None);
        assert!(mesh.closers.is_empty());
    }
}
