//! The value grammar: one raw parameter span → one semantic [`Value`].
//!
//! Precedence ladder, each level falling through to the next when it does
//! not match:
//!
//! 1. quoted text (escapes decoded; dice and reference forms still win
//!    over the decoded content)
//! 2. dice expressions, rolled on the spot
//! 3. `Type:id` references
//! 4. integer / float / `true` / `false` / `none` literals
//! 5. `[...]` and `{...}` literals, recursing the full grammar per element
//! 6. the raw text verbatim

use std::collections::BTreeMap;

use rand::rngs::StdRng;

use weave_core::{TypedID, Value};

use crate::dice::DiceExpr;
use crate::error::{ParseError, ParseResult};
use crate::scan::{find_top_level, split_top_level};

/// Parse one raw value span. Dice rolls draw from `rng`.
///
/// Invalid quoting, dice or reference syntax falls through the ladder;
/// only structurally broken list/map literals error.
pub fn parse_value(raw: &str, rng: &mut StdRng) -> ParseResult<Value> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Value::Null);
    }

    // 1. Quoted: decode, then let dice and reference forms win over the
    // decoded content.
    if let Some(content) = decode_quoted(raw) {
        if let Some(expr) = DiceExpr::parse(&content) {
            return Ok(Value::Int(expr.roll(rng)));
        }
        if let Ok(id) = content.parse::<TypedID>() {
            return Ok(Value::Ref(id));
        }
        return Ok(Value::Str(content));
    }

    // 2. Dice.
    if let Some(expr) = DiceExpr::parse(raw) {
        return Ok(Value::Int(expr.roll(rng)));
    }

    // 3. Reference.
    if let Ok(id) = raw.parse::<TypedID>() {
        return Ok(Value::Ref(id));
    }

    // 4. Primitive literals.
    if let Ok(n) = raw.parse::<i64>() {
        return Ok(Value::Int(n));
    }
    if let Ok(n) = raw.parse::<f64>() {
        return Ok(Value::Float(n));
    }
    match raw.to_ascii_lowercase().as_str() {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        "none" => return Ok(Value::Null),
        _ => {}
    }

    // 5. Structured literals.
    if let Some(inner) = raw.strip_prefix('[') {
        return parse_list_literal(raw, inner, rng);
    }
    if let Some(inner) = raw.strip_prefix('{') {
        return parse_map_literal(raw, inner, rng);
    }

    // 6. Verbatim.
    Ok(Value::Str(raw.to_string()))
}

/// Decode a fully quoted span. Returns `None` unless the span opens and
/// closes with the same unescaped quote character and contains nothing
/// past the closing quote.
fn decode_quoted(raw: &str) -> Option<String> {
    let mut chars = raw.chars();
    let quote = chars.next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let mut out = String::new();
    let mut closed = false;
    while let Some(c) = chars.next() {
        if closed {
            // Content after the closing quote: not a single quoted span.
            return None;
        }
        if c == '\\' {
            let escaped = chars.next()?;
            match escaped {
                'n' => out.push('\n'),
                't' => out.push('\t'),
                'r' => out.push('\r'),
                '\\' | '"' | '\'' => out.push(escaped),
                other => {
                    out.push('\\');
                    out.push(other);
                }
            }
        } else if c == quote {
            closed = true;
        } else {
            out.push(c);
        }
    }
    closed.then_some(out)
}

fn parse_list_literal(raw: &str, inner: &str, rng: &mut StdRng) -> ParseResult<Value> {
    let Some(body) = inner.strip_suffix(']') else {
        return Err(ParseError::UnbalancedLiteral(raw.to_string()));
    };
    let mut items = Vec::new();
    for segment in split_top_level(body, ',') {
        if segment.trim().is_empty() {
            continue;
        }
        items.push(parse_value(segment, rng)?);
    }
    Ok(Value::List(items))
}

fn parse_map_literal(raw: &str, inner: &str, rng: &mut StdRng) -> ParseResult<Value> {
    let Some(body) = inner.strip_suffix('}') else {
        return Err(ParseError::UnbalancedLiteral(raw.to_string()));
    };
    let mut entries = BTreeMap::new();
    for segment in split_top_level(body, ',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        // The first top-level colon separates key from value, so
        // reference values like `Place:square` keep their own colon.
        let colon = find_top_level(segment, ':')
            .ok_or_else(|| ParseError::MalformedMapEntry(segment.to_string()))?;
        let (key_raw, value_raw) = segment.split_at(colon);
        let key = decode_quoted(key_raw.trim()).unwrap_or_else(|| key_raw.trim().to_string());
        let value = parse_value(&value_raw[1..], rng)?;
        entries.insert(key, value);
    }
    Ok(Value::Map(entries))
}
