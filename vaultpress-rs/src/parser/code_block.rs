//! Code masking: lifts fenced blocks and inline code out of a note body so
//! later rewriting never touches them.
//!
//! Masked text is a flat sequence of [`Piece`]s. Code is held by index into a
//! span table instead of being replaced with marker strings, so user content can
//! never collide with a placeholder and every span is restored exactly where it
//! was taken from.

use regex::Regex;
use std::sync::LazyLock;

/// Which kind of code a masked span came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Fenced,
    Inline,
}

/// A piece of code lifted out of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedSpan {
    pub kind: CodeKind,
    /// Ordinal of this span within the document (creation order).
    pub id: usize,
    /// The exact source text, delimiters included.
    pub original_text: String,
}

/// One element of masked text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    /// Ordinary markdown that later passes may rewrite.
    Text(String),
    /// Reference to a [`MaskedSpan`] by id.
    Code(usize),
}

/// A note body with its code lifted out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaskedText {
    pub pieces: Vec<Piece>,
    pub spans: Vec<MaskedSpan>,
}

impl MaskedText {
    /// Spans taken from fenced code blocks, in creation order.
    pub fn fenced_spans(&self) -> impl Iterator<Item = &MaskedSpan> {
        self.spans.iter().filter(|s| s.kind == CodeKind::Fenced)
    }

    /// Spans taken from inline code, in creation order.
    pub fn inline_spans(&self) -> impl Iterator<Item = &MaskedSpan> {
        self.spans.iter().filter(|s| s.kind == CodeKind::Inline)
    }

    /// Look up a span by id.
    pub fn span(&self, id: usize) -> Option<&MaskedSpan> {
        self.spans.get(id)
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.pieces.last_mut() {
            Some(Piece::Text(prev)) => prev.push_str(text),
            _ => self.pieces.push(Piece::Text(text.to_string())),
        }
    }

    fn push_code(&mut self, kind: CodeKind, text: &str) {
        let id = self.spans.len();
        self.spans.push(MaskedSpan {
            kind,
            id,
            original_text: text.to_string(),
        });
        self.pieces.push(Piece::Code(id));
    }
}

// Opening fence: up to three spaces of indent, then ``` or ~~~ (or longer)
static FENCE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^ {0,3}(`{3,}|~{3,})").unwrap()
});

// Inline code. Double-backtick spans may contain single backticks; neither
// form crosses a line break.
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"``(?:[^`\n]|`[^`\n])+``|`[^`\n]+`").unwrap()
});

/// Find fenced code blocks as byte ranges `(start, end)`.
///
/// A block runs from the start of its opening line to the end of its closing
/// fence line (the trailing newline is not included). The closing fence must use
/// the same character and be at least as long as the opener. Unclosed fences are
/// not treated as code.
pub fn find_fenced_blocks(content: &str) -> Vec<(usize, usize)> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    while pos < content.len() {
        let Some(open) = FENCE_OPEN.captures(&content[pos..]) else {
            break;
        };
        let whole = open.get(0).map(|m| (m.start(), m.end())).unwrap_or_default();
        let fence = open.get(1).map(|m| m.as_str()).unwrap_or_default();
        let fence_char = fence.chars().next().unwrap_or('`');
        let fence_len = fence.len();
        let abs_start = pos + whole.0;

        let line_end = content[abs_start..]
            .find('\n')
            .map(|i| abs_start + i + 1)
            .unwrap_or(content.len());

        let mut search_pos = line_end;
        let mut closed_at = None;

        while search_pos < content.len() {
            let rest = &content[search_pos..];
            let close_line_len = rest.find('\n').unwrap_or(rest.len());
            let line = &rest[..close_line_len];

            if is_closing_fence(line, fence_char, fence_len) {
                closed_at = Some(search_pos + close_line_len);
                break;
            }
            search_pos += close_line_len + 1;
        }

        match closed_at {
            Some(abs_end) => {
                blocks.push((abs_start, abs_end));
                pos = abs_end;
            }
            None => pos = line_end,
        }
    }

    blocks
}

fn is_closing_fence(line: &str, fence_char: char, fence_len: usize) -> bool {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return false;
    }
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.chars().all(|c| c == fence_char)
        && trimmed.len() >= fence_len
}

/// Lift all code out of `text`.
///
/// Fenced blocks are taken first; inline code is then searched only in the text
/// between fenced blocks.
pub fn mask(text: &str) -> MaskedText {
    let mut masked = MaskedText::default();
    let mut cursor = 0;

    for (start, end) in find_fenced_blocks(text) {
        mask_inline(&text[cursor..start], &mut masked);
        masked.push_code(CodeKind::Fenced, &text[start..end]);
        cursor = end;
    }
    mask_inline(&text[cursor..], &mut masked);

    log::trace!(
        "masked {} fenced and {} inline code spans",
        masked.fenced_spans().count(),
        masked.inline_spans().count()
    );
    masked
}

fn mask_inline(segment: &str, masked: &mut MaskedText) {
    let mut cursor = 0;
    for m in INLINE_CODE.find_iter(segment) {
        masked.push_text(&segment[cursor..m.start()]);
        masked.push_code(CodeKind::Inline, m.as_str());
        cursor = m.end();
    }
    masked.push_text(&segment[cursor..]);
}

/// Restore the original text.
pub fn unmask(masked: &MaskedText) -> String {
    let mut out = String::new();
    for piece in &masked.pieces {
        match piece {
            Piece::Text(text) => out.push_str(text),
            Piece::Code(id) => {
                if let Some(span) = masked.span(*id) {
                    out.push_str(&span.original_text);
                }
            }
        }
    }
    out
}
