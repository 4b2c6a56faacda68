//! Directive parsing for Weave.
//!
//! Narrative text produced by the storytelling layer carries embedded
//! `@Create` / `@Modify` / `@Transfer` / `@Destroy` directives. This crate
//! turns that text into [`weave_core::Command`] batches: a depth-counting
//! scanner splits parameter lists, a value grammar turns raw spans into
//! semantic values (rolling dice on the way), and the parser assembles
//! commands from directive heads.

/// Dice expressions, rolled at parse time.
pub mod dice;
/// Parse error types.
pub mod error;
/// The directive parser.
pub mod parser;
/// The depth-counting scanner.
pub mod scan;
/// The value grammar.
pub mod value;

pub use dice::DiceExpr;
pub use error::{ParseError, ParseResult};
pub use parser::{Parser, parse};
pub use value::parse_value;
