//! The depth-counting scanner underneath the directive grammar.
//!
//! Parameter lists and list/map literals nest arbitrarily and may contain
//! quoted text with escapes, so splitting them is a one-pass scan with an
//! explicit depth state rather than anything regex-shaped. This module is
//! deliberately free of directive knowledge and is tested on synthetic
//! fragments.

/// Scanner state: the active quote character (if any), a pending escape,
/// and one nesting level per bracket family.
#[derive(Debug, Clone, Copy, Default)]
pub struct Depth {
    quote: Option<char>,
    escaped: bool,
    brackets: i32,
    braces: i32,
    parens: i32,
}

impl Depth {
    /// Fresh, top-level state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance over one character.
    pub fn step(&mut self, c: char) {
        if self.escaped {
            self.escaped = false;
            return;
        }
        if let Some(q) = self.quote {
            match c {
                '\\' => self.escaped = true,
                _ if c == q => self.quote = None,
                _ => {}
            }
            return;
        }
        match c {
            '"' | '\'' => self.quote = Some(c),
            '[' => self.brackets += 1,
            ']' => self.brackets -= 1,
            '{' => self.braces += 1,
            '}' => self.braces -= 1,
            '(' => self.parens += 1,
            ')' => self.parens -= 1,
            _ => {}
        }
    }

    /// True when outside quotes and every bracket family is at level 0.
    pub fn at_top_level(&self) -> bool {
        self.quote.is_none() && self.brackets == 0 && self.braces == 0 && self.parens == 0
    }

    /// True while inside a quoted run.
    pub fn in_quotes(&self) -> bool {
        self.quote.is_some()
    }
}

/// True if every quote and bracket in `text` closes again.
pub fn is_balanced(text: &str) -> bool {
    let mut depth = Depth::new();
    for c in text.chars() {
        depth.step(c);
    }
    depth.at_top_level()
}

/// Split `text` on occurrences of `sep` at top level (outside quotes and
/// brackets). Separators inside nested structure or quoted runs are
/// ordinary characters. Empty segments are preserved.
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut depth = Depth::new();
    let mut segments = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if c == sep && depth.at_top_level() {
            segments.push(&text[start..i]);
            start = i + c.len_utf8();
        } else {
            depth.step(c);
        }
    }
    segments.push(&text[start..]);
    segments
}

/// Find the byte offset of the first top-level occurrence of `needle` in
/// `text`.
pub fn find_top_level(text: &str, needle: char) -> Option<usize> {
    let mut depth = Depth::new();
    for (i, c) in text.char_indices() {
        if c == needle && depth.at_top_level() {
            return Some(i);
        }
        depth.step(c);
    }
    None
}

/// Given text positioned just after an opening `(`, find the byte offset
/// of the matching top-level `)`.
pub fn closing_paren(text: &str) -> Option<usize> {
    find_top_level(text, ')')
}

/// One raw parameter: key, operator token and the unparsed value span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParam<'a> {
    /// The attribute key, `[\w.]+`.
    pub key: &'a str,
    /// The operator token; empty when the key had no explicit operator.
    pub op: &'a str,
    /// The raw value text, trimmed; may be empty.
    pub value: &'a str,
}

/// Decompose one parameter span into key, operator and raw value.
/// Multi-character operators win over single-character ones, so `+=`
/// never scans as `+` followed by a value starting with `=`.
///
/// Returns `None` when no key can be read.
pub fn split_param(text: &str) -> Option<RawParam<'_>> {
    let text = text.trim();
    let key_end = text
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
        .unwrap_or(text.len());
    if key_end == 0 {
        return None;
    }
    let (key, rest) = text.split_at(key_end);
    let rest = rest.trim_start();

    let op_len = if rest.starts_with("+=") || rest.starts_with("-=") {
        2
    } else if rest.starts_with(['+', '-', '=']) {
        1
    } else {
        0
    };
    let (op, value) = rest.split_at(op_len);

    Some(RawParam {
        key,
        op,
        value: value.trim(),
    })
}
