use thiserror::Error;

/// Result type for directive parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised while parsing directive text.
///
/// Most malformed input degrades instead of erroring: bad dice, bad
/// references and stray quotes fall through the value grammar to plain
/// strings, and an unmatched parameter list degrades to a parameterless
/// command. Only structurally broken list/map literals are fatal to a
/// parse call.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A list or map literal never closes its brackets.
    #[error("unbalanced brackets in literal {0:?}")]
    UnbalancedLiteral(String),

    /// A map literal entry has no `key: value` separator.
    #[error("malformed map entry {0:?}, expected \"key: value\"")]
    MalformedMapEntry(String),
}
