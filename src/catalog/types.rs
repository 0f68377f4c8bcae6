/// Catalog data types: families, directions, grammar modes and hint bundles
use std::fmt;

/// Lexical family of a token definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Comment,
    Block,
    Operator,
    Type,
    Keyword,
    Custom,
}

/// Scope direction of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
    Open,
    Close,
    None,
}

/// Grammar mode: FreeFEM code or an EJS templating region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Host,
    Template,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Host => write!(f, "host"),
            Mode::Template => write!(f, "template"),
        }
    }
}

/// Formatting hints for one grammar mode
///
/// Each flag requests one whitespace decision; the formatting engine
/// treats a hint whose precondition is already satisfied as a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hints {
    pub space_before: bool,
    pub space_after: bool,
    pub line_break_before: bool,
    pub line_break_after: bool,
    pub indent: bool,
    pub keep_inline: bool,
    pub skip: bool,
    pub eat_line_break_before: bool,
}

impl Hints {
    pub const NONE: Hints = Hints {
        space_before: false,
        space_after: false,
        line_break_before: false,
        line_break_after: false,
        indent: false,
        keep_inline: false,
        skip: false,
        eat_line_break_before: false,
    };

    #[must_use]
    pub const fn space_before(mut self) -> Self {
        self.space_before = true;
        self
    }

    #[must_use]
    pub const fn space_after(mut self) -> Self {
        self.space_after = true;
        self
    }

    #[must_use]
    pub const fn line_break_before(mut self) -> Self {
        self.line_break_before = true;
        self
    }

    #[must_use]
    pub const fn line_break_after(mut self) -> Self {
        self.line_break_after = true;
        self
    }

    #[must_use]
    pub const fn indent(mut self) -> Self {
        self.indent = true;
        self
    }

    #[must_use]
    pub const fn keep_inline(mut self) -> Self {
        self.keep_inline = true;
        self
    }

    #[must_use]
    pub const fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    #[must_use]
    pub const fn eat_line_break_before(mut self) -> Self {
        self.eat_line_break_before = true;
        self
    }
}

/// One immutable token definition in the catalog
#[derive(Debug)]
pub struct TokenDef {
    pub family: Family,
    /// Literal identifier matched in the source text
    pub ident: &'static str,
    /// Literals closing this token's scope (empty for non-scoping tokens)
    pub closers: &'static [&'static str],
    pub dir: Dir,
    /// Hints consulted while in FreeFEM code
    pub host: Hints,
    /// Hints consulted while inside an EJS region
    pub template: Hints,
    /// Switches the tokenizer/formatter into template mode
    pub enters_template: bool,
    /// Switches back to host mode
    pub exits_template: bool,
}

impl TokenDef {
    /// Hint bundle for the given grammar mode
    #[must_use]
    pub fn hints(&self, mode: Mode) -> &Hints {
        match mode {
            Mode::Host => &self.host,
            Mode::Template => &self.template,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.dir == Dir::Open
    }

    #[must_use]
    pub fn is_close(&self) -> bool {
        self.dir == Dir::Close
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_builders() {
        let hints = Hints::NONE.space_before().indent();
        assert!(hints.space_before);
        assert!(hints.indent);
        assert!(!hints.space_after);
        assert!(!hints.skip);
    }

    #[test]
    fn test_mode_selects_bundle() {
        let def = TokenDef {
            family: Family::Operator,
            ident: "==",
            closers: &[],
            dir: Dir::None,
            host: Hints::NONE.space_before().space_after(),
            template: Hints::NONE,
            enters_template: false,
            exits_template: false,
        };
        assert!(def.hints(Mode::Host).space_before);
        assert!(!def.hints(Mode::Template).space_before);
    }
}
