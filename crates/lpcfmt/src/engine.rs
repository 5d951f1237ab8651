//! Structural formatting pass
//!
//! Walks the source line by line with a context stack and an indent counter,
//! dispatching each line to the first matching branch. Structural lines
//! (braces, comments, raw blocks) are emitted directly; content lines go
//! through the generic spacing pass and the LPC-specific normalizer. Every
//! branch is total: malformed input degrades to the default statement branch
//! and the indent counter clamps at zero.

use crate::context::{Context, ContextStack};
use crate::line::format_line;
use crate::options::{FormatOptions, MappingLiteralFormat, SwitchCaseAlignment};
use crate::patterns::{self, ControlHeader, ControlKind};
use crate::syntax::normalize;
use crate::verbatim;

pub(crate) struct Engine<'a> {
    opts: &'a FormatOptions,
    ctx: ContextStack,
    indent: usize,
    blank_run: usize,
    /// A header was emitted whose `{` has not arrived yet; flushed at EOF
    pending_brace: bool,
    /// What a following bare `{` opens (a `switch` body needs its own kind)
    pending_open: Option<Context>,
    out: Vec<String>,
}

impl<'a> Engine<'a> {
    pub(crate) fn new(opts: &'a FormatOptions) -> Self {
        Self {
            opts,
            ctx: ContextStack::new(),
            indent: 0,
            blank_run: 0,
            pending_brace: false,
            pending_open: None,
            out: Vec::new(),
        }
    }

    /// Format a whole source text. Two passes: a structural pre-scan that
    /// flushes doc-comment blocks above function headers to column zero,
    /// then line-by-line emission.
    pub(crate) fn format(mut self, source: &str) -> String {
        let mut lines: Vec<String> = source
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        prescan(&mut lines);

        for i in 0..lines.len() {
            let next = lines.get(i + 1).map(|l| l.trim().to_string());
            self.process_line(&lines[i], next.as_deref());
        }
        if self.pending_brace {
            // The brace belongs to the header that armed it, not to the
            // virtual block opened under that header
            while self.ctx.pop_if(Context::ImplicitBlock) {
                self.indent = self.indent.saturating_sub(1);
            }
            self.emit(self.indent, "{");
        }
        self.out.join("\n")
    }

    fn process_line(&mut self, raw: &str, next: Option<&str>) {
        let trimmed = raw.trim().to_string();
        let trimmed = trimmed.as_str();

        // Open raw block: copy through until the terminator line
        if let Some(Context::Verbatim(term)) = self.ctx.innermost() {
            self.out.push(raw.to_string());
            if verbatim::is_terminator(trimmed, term) {
                self.ctx.pop();
            }
            return;
        }
        // Doc comments are never structurally indented
        if self.ctx.innermost() == Some(Context::DocComment) {
            self.out.push(trimmed.to_string());
            if trimmed.ends_with("*/") {
                self.ctx.pop();
            }
            return;
        }
        if self.ctx.innermost() == Some(Context::BlockComment) {
            self.emit(self.indent, trimmed);
            if trimmed.ends_with("*/") {
                self.ctx.pop();
            }
            return;
        }
        if self.ctx.innermost() == Some(Context::MultiLineString) {
            if trimmed.contains('"') && !trimmed.starts_with('\\') {
                self.emit(self.indent, trimmed);
                self.ctx.pop();
            } else {
                self.out.push(raw.to_string());
            }
            return;
        }

        if trimmed.is_empty() {
            if self.blank_run < self.opts.max_blank_lines {
                self.out.push(String::new());
                self.blank_run += 1;
            }
            return;
        }
        self.blank_run = 0;

        if trimmed.starts_with("/**") {
            self.out.push(trimmed.to_string());
            if !trimmed.ends_with("*/") {
                self.ctx.push(Context::DocComment);
            }
            return;
        }
        if trimmed.starts_with("/*") {
            self.emit(self.indent, trimmed);
            if !trimmed.ends_with("*/") {
                self.ctx.push(Context::BlockComment);
            }
            return;
        }
        if trimmed.starts_with("//") {
            self.emit(self.indent, trimmed);
            return;
        }

        // Preprocessor directives sit flush left with one space after the
        // keyword, regardless of nesting
        if patterns::PREPROCESSOR_RE.is_match(trimmed) {
            let spaced = patterns::PREPROCESSOR_SPACING_RE.replace(trimmed, "#${1} ");
            self.out.push(spaced.trim_end().to_string());
            return;
        }

        if patterns::INHERIT_BLOCK_RE.is_match(trimmed) {
            self.emit(self.indent, trimmed);
            self.ctx.push(Context::InheritBlock);
            self.indent += 1;
            return;
        }
        if patterns::INHERIT_RE.is_match(trimmed) {
            self.emit(self.indent, trimmed);
            return;
        }

        // A string opened here and not closed: the rest of the line is
        // literal content, and following lines are too
        if patterns::has_unterminated_string(trimmed) {
            self.emit(self.indent, trimmed);
            self.ctx.push(Context::MultiLineString);
            return;
        }

        if self.ctx.innermost() == Some(Context::FunctionParams) {
            self.continue_function_params(trimmed, next);
            return;
        }

        if let Some(header) = patterns::split_control_header(trimmed) {
            self.handle_control_header(header, next);
            return;
        }

        if patterns::RETURN_RE.is_match(trimmed) {
            self.emit(self.indent, trimmed);
            if trimmed.ends_with(';') {
                self.close_implicit_blocks();
            }
            return;
        }

        if self.ctx.in_switch()
            && (patterns::CASE_RE.is_match(trimmed) || patterns::DEFAULT_LABEL_RE.is_match(trimmed))
        {
            let level = match self.opts.switch_case_alignment {
                SwitchCaseAlignment::Switch => self.indent.saturating_sub(1),
                SwitchCaseAlignment::Indent => self.indent,
            };
            self.emit(level, trimmed);
            if self.ctx.innermost() != Some(Context::Case) {
                self.ctx.push(Context::Case);
            }
            return;
        }

        // The exits idiom opens a mapping closed by `]);`
        if trimmed.contains("set(\"exits\"") && trimmed.ends_with("([") {
            let content = self.fmt(trimmed);
            self.emit(self.indent, &content);
            self.ctx.push(Context::ExitsMapping);
            self.indent += 1;
            return;
        }
        if trimmed.ends_with("({") {
            let content = self.fmt(trimmed);
            self.emit(self.indent, &content);
            self.ctx.push(Context::ArrayLiteral);
            self.indent += 1;
            return;
        }
        if trimmed.ends_with("([") {
            let content = self.fmt(trimmed);
            self.emit(self.indent, &content);
            self.ctx.push(Context::MappingLiteral);
            self.indent += 1;
            return;
        }

        if trimmed == "{" {
            self.emit(self.indent, "{");
            self.indent += 1;
            let kind = self.pending_open.take().unwrap_or(Context::Block);
            self.ctx.push(kind);
            self.pending_brace = false;
            return;
        }

        if patterns::is_function_header(trimmed) {
            self.handle_function_header(trimmed, next);
            return;
        }

        if trimmed.starts_with("])") {
            self.close_collection(trimmed, &[Context::MappingLiteral, Context::ExitsMapping]);
            return;
        }
        if trimmed.starts_with("})") {
            self.close_collection(trimmed, &[Context::ArrayLiteral]);
            return;
        }
        if trimmed.starts_with('}') {
            self.handle_closing_brace(trimmed);
            return;
        }

        // Chained-call continuation lines indent one extra level
        if trimmed.starts_with("->") {
            let content = self.fmt(trimmed);
            self.emit(self.indent + 1, &content);
            return;
        }

        self.handle_statement(trimmed);
    }

    /// Default branch: spacing-normalize and emit, close implicit blocks on
    /// a terminated statement, arm a raw block if the line ends with a marker
    fn handle_statement(&mut self, trimmed: &str) {
        if self.opts.mapping_literal_format == MappingLiteralFormat::Expanded
            && self.expand_collection(trimmed)
        {
            return;
        }
        let content = self.fmt(trimmed);
        self.emit(self.indent, &content);
        if trimmed.ends_with(';') {
            self.close_implicit_blocks();
        }
        if let Some(term) = verbatim::opening_terminator(trimmed) {
            self.ctx.push(Context::Verbatim(term));
        }
    }

    fn handle_control_header(&mut self, header: ControlHeader, next: Option<&str>) {
        let is_switch = header.kind == ControlKind::Switch;
        let block_kind = if is_switch {
            Context::Switch
        } else {
            Context::Block
        };
        let head = self.fmt(&header.header);
        let rest = header.rest.as_str();

        if rest == "{" {
            self.open_block(&head, block_kind);
        } else if rest == ";" {
            // `while (x);` — a complete statement
            self.emit(self.indent, &format!("{head};"));
        } else if rest.is_empty() {
            self.emit(self.indent, &head);
            if head.ends_with(';') {
                return;
            }
            if next == Some("{") {
                self.pending_open = Some(block_kind);
            } else {
                // Virtual one-statement block: the next terminated
                // statement closes it
                self.ctx.push(Context::ImplicitBlock);
                self.indent += 1;
                self.pending_brace = true;
            }
        } else if rest.starts_with('{') && rest.ends_with('}') {
            // Whole body inline and balanced; leave it on one line
            let content = self.fmt(&format!("{} {}", header.header, rest));
            self.emit(self.indent, &content);
        } else {
            // Inline single-statement body moves to its own indented line
            self.emit(self.indent, &head);
            let stmt = self.fmt(rest);
            self.emit(self.indent + 1, &stmt);
            if !rest.ends_with(';') {
                self.ctx.push(Context::ImplicitBlock);
                self.indent += 1;
                self.pending_brace = true;
            }
        }
    }

    fn handle_function_header(&mut self, trimmed: &str, next: Option<&str>) {
        if let Some(stripped) = trimmed.strip_suffix('{') {
            let head = self.fmt(stripped.trim_end());
            self.open_block(&head, Context::Block);
            return;
        }
        let content = self.fmt(trimmed);
        self.emit(self.indent, &content);

        let params_closed = trimmed
            .find('(')
            .map(|open| patterns::find_matching_paren(trimmed, open).is_some())
            .unwrap_or(true);
        if !params_closed {
            self.ctx.push(Context::FunctionParams);
        } else {
            self.pending_open = Some(Context::Block);
            if next != Some("{") {
                self.pending_brace = true;
            }
        }
    }

    /// Parameter-list continuation lines sit one level deeper until the
    /// closing paren arrives
    fn continue_function_params(&mut self, trimmed: &str, next: Option<&str>) {
        if !trimmed.contains(')') {
            let content = self.fmt(trimmed);
            self.emit(self.indent + 1, &content);
            return;
        }
        self.ctx.pop();
        if let Some(stripped) = trimmed.strip_suffix('{') {
            let head = self.fmt(stripped.trim_end());
            if self.opts.braces_on_new_line {
                self.emit(self.indent + 1, &head);
                self.emit(self.indent, "{");
            } else {
                self.emit(self.indent + 1, &format!("{head} {{"));
            }
            self.indent += 1;
            self.ctx.push(Context::Block);
        } else {
            let content = self.fmt(trimmed);
            self.emit(self.indent + 1, &content);
            self.pending_open = Some(Context::Block);
            if next != Some("{") {
                self.pending_brace = true;
            }
        }
    }

    fn open_block(&mut self, head: &str, kind: Context) {
        if self.opts.braces_on_new_line {
            self.emit(self.indent, head);
            self.emit(self.indent, "{");
        } else {
            self.emit(self.indent, &format!("{head} {{"));
        }
        self.indent += 1;
        self.ctx.push(kind);
    }

    /// `])` and `})` closers: dedent, normalize, pop the matching literal
    fn close_collection(&mut self, trimmed: &str, kinds: &[Context]) {
        self.indent = self.indent.saturating_sub(1);
        let content = self.fmt(trimmed);
        self.emit(self.indent, &content);
        if let Some(innermost) = self.ctx.innermost() {
            if kinds.contains(&innermost) {
                self.ctx.pop();
            }
        }
    }

    /// Generic `}`: closes whichever block-like context is innermost.
    /// Tails (`} else {`, `} while (x);`) are re-formatted in place.
    fn handle_closing_brace(&mut self, trimmed: &str) {
        while self.ctx.pop_if(Context::Case) {}
        while self.ctx.pop_if(Context::ImplicitBlock) {
            self.indent = self.indent.saturating_sub(1);
        }
        self.indent = self.indent.saturating_sub(1);
        if let Some(innermost) = self.ctx.innermost() {
            if innermost.closes_with_brace() {
                self.ctx.pop();
            }
        }

        let rest = trimmed[1..].trim().to_string();
        if rest.is_empty() {
            self.emit(self.indent, "}");
            return;
        }
        if let Some(header) = patterns::split_control_header(&rest) {
            if header.rest == "{" {
                let head = self.fmt(&header.header);
                if self.opts.braces_on_new_line {
                    self.emit(self.indent, "}");
                    self.open_block(&head, Context::Block);
                } else {
                    self.emit(self.indent, &format!("}} {head} {{"));
                    self.indent += 1;
                    self.ctx.push(Context::Block);
                }
                return;
            }
        }
        let content = self.fmt(&rest);
        self.emit(self.indent, &format!("}} {content}"));
    }

    fn close_implicit_blocks(&mut self) {
        while self.ctx.pop_if(Context::ImplicitBlock) {
            self.indent = self.indent.saturating_sub(1);
            self.pending_brace = false;
        }
    }

    /// One-line collection literal with more elements than the wrap
    /// threshold: re-emit one element per line. Only under
    /// [`MappingLiteralFormat::Expanded`].
    fn expand_collection(&mut self, trimmed: &str) -> bool {
        let (open_tok, close_byte) = if trimmed.contains("({") {
            ("({", b'}')
        } else if trimmed.contains("([") {
            ("([", b']')
        } else {
            return false;
        };
        let Some(start) = trimmed.find(open_tok) else {
            return false;
        };
        let Some(close_paren) = patterns::find_matching_paren(trimmed, start) else {
            return false;
        };
        if close_paren < 2 || trimmed.as_bytes()[close_paren - 1] != close_byte {
            return false;
        }
        let interior = &trimmed[start + 2..close_paren - 1];
        let elements: Vec<&str> = patterns::split_top_level_commas(interior)
            .into_iter()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .collect();
        if elements.len() <= self.opts.array_literal_wrap_threshold {
            return false;
        }

        let prefix = self.fmt(&trimmed[..start + 2]);
        self.emit(self.indent, &prefix);
        let last = elements.len() - 1;
        for (i, element) in elements.iter().enumerate() {
            let line = if i < last {
                format!("{element},")
            } else {
                (*element).to_string()
            };
            let content = self.fmt(&line);
            self.emit(self.indent + 1, &content);
        }
        let suffix = self.fmt(&trimmed[close_paren - 1..]);
        self.emit(self.indent, &suffix);
        true
    }

    fn fmt(&self, text: &str) -> String {
        normalize(&format_line(text, self.opts))
    }

    fn emit(&mut self, level: usize, text: &str) {
        if text.is_empty() {
            self.out.push(String::new());
            return;
        }
        let mut line = self.opts.indent_unit().repeat(level);
        line.push_str(text);
        self.out.push(line);
    }
}

/// Pass 1: quote-aware brace tracking to find top-level function headers;
/// a `/** ... */` block directly above one (blank and `//` lines may
/// intervene) is flushed to column zero in place.
fn prescan(lines: &mut [String]) {
    let mut depth = 0i32;
    let mut in_comment = false;
    for i in 0..lines.len() {
        let trimmed = lines[i].trim().to_string();
        if depth == 0 && !in_comment && patterns::is_function_header(&trimmed) {
            strip_doc_block_above(lines, i);
        }
        depth = (depth + patterns::brace_delta(&lines[i], &mut in_comment)).max(0);
    }
}

fn strip_doc_block_above(lines: &mut [String], header: usize) {
    let mut above = header;
    while above > 0 {
        let prev = lines[above - 1].trim();
        if prev.is_empty() || prev.starts_with("//") {
            above -= 1;
        } else {
            break;
        }
    }
    if above == 0 {
        return;
    }
    let end = above - 1;
    if !lines[end].trim().ends_with("*/") {
        return;
    }
    let mut start = end;
    loop {
        let t = lines[start].trim();
        if t.starts_with("/**") {
            for line in lines.iter_mut().take(end + 1).skip(start) {
                *line = line.trim().to_string();
            }
            return;
        }
        // A plain block comment (or an unrelated line) above the header
        // keeps its indentation
        if t.starts_with("/*") || start == 0 {
            return;
        }
        start -= 1;
    }
}
