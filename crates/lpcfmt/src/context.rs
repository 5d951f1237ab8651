//! Nesting context stack
//!
//! One tagged entry per open construct instead of a bag of boolean flags:
//! the structural pass pushes an entry when a construct opens and pops it at
//! the matching close, so impossible flag combinations cannot be represented.

/// One open construct
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Context {
    /// Generic braced block (function body, control body, bare `{`)
    Block,
    /// `switch (...) {` body
    Switch,
    /// Statements under a `case`/`default` label
    Case,
    /// `({ ... })` array literal
    ArrayLiteral,
    /// `([ ... ])` mapping literal
    MappingLiteral,
    /// `set("exits", ([ ... ]);` idiom
    ExitsMapping,
    /// `:: { ... }` inheritance block
    InheritBlock,
    /// Brace-less control body: closes after one terminated statement
    ImplicitBlock,
    /// Function header whose parameter list continues on following lines
    FunctionParams,
    /// `/* ... */` block comment
    BlockComment,
    /// `/** ... */` doc comment
    DocComment,
    /// String literal spanning lines
    MultiLineString,
    /// Raw text block; holds the terminator token that closes it
    Verbatim(&'static str),
}

impl Context {
    /// Contexts a generic `}` may close
    pub(crate) fn closes_with_brace(self) -> bool {
        matches!(
            self,
            Context::Block | Context::Switch | Context::InheritBlock
        )
    }
}

/// Stack of open constructs, innermost last
#[derive(Debug, Default)]
pub(crate) struct ContextStack {
    stack: Vec<Context>,
}

impl ContextStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, ctx: Context) {
        self.stack.push(ctx);
    }

    pub(crate) fn pop(&mut self) -> Option<Context> {
        self.stack.pop()
    }

    pub(crate) fn innermost(&self) -> Option<Context> {
        self.stack.last().copied()
    }

    /// Pop the innermost entry only if it matches
    pub(crate) fn pop_if(&mut self, ctx: Context) -> bool {
        if self.innermost() == Some(ctx) {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Whether a `switch` body is open anywhere on the stack
    pub(crate) fn in_switch(&self) -> bool {
        self.stack
            .iter()
            .any(|c| matches!(c, Context::Switch | Context::Case))
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}
