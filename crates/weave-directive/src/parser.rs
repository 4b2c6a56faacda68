//! The directive parser: narrative text in, command batch out.
//!
//! Directives look like `@Verb Type id (key=value, ...)` and are embedded
//! anywhere in free-form story text. The parser makes a single forward
//! scan; each matched directive is consumed through its closing paren
//! before the scan resumes, so matches never overlap.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use weave_core::{Command, EntityType, Op, Value, Verb};

use crate::error::ParseResult;
use crate::scan::{closing_paren, split_param, split_top_level};
use crate::value::parse_value;

/// Parses directives out of narrative text.
///
/// The parser owns the RNG that dice values roll against. `new` seeds it
/// from the OS; tests inject a seeded one via [`Parser::with_rng`].
#[derive(Debug)]
pub struct Parser {
    rng: StdRng,
}

impl Parser {
    /// A parser with an OS-seeded RNG.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// A parser rolling dice against the given RNG.
    pub fn with_rng(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Scan `text` for directives and parse each into a [`Command`].
    ///
    /// Text around and between directives is ignored. `@`-words that are
    /// not directives (mentions, mail addresses) are skipped. The only
    /// fatal condition is a structurally broken list/map literal inside a
    /// parameter.
    pub fn parse(&mut self, text: &str) -> ParseResult<Vec<Command>> {
        let mut commands = Vec::new();
        let mut cursor = 0;
        while let Some(found) = text[cursor..].find('@') {
            let head = cursor + found + 1;
            match self.parse_directive(text, head)? {
                Some((command, next)) => {
                    debug!(directive = %command, "parsed directive");
                    commands.push(command);
                    cursor = next;
                }
                None => cursor = head,
            }
        }
        Ok(commands)
    }

    /// Try to parse one directive whose verb starts at byte `start`.
    /// Returns the command and the byte offset scanning should resume at,
    /// or `None` when the text after `@` is not a directive.
    fn parse_directive(
        &mut self,
        text: &str,
        start: usize,
    ) -> ParseResult<Option<(Command, usize)>> {
        let verb_end = word_end(text, start, false);
        let Some(verb) = Verb::parse(&text[start..verb_end]) else {
            debug!(word = &text[start..verb_end], "not a directive verb");
            return Ok(None);
        };

        let type_start = skip_spaces(text, verb_end);
        let type_end = word_end(text, type_start, false);
        let Some(entity_type) = EntityType::parse(&text[type_start..type_end]) else {
            debug!(
                word = &text[type_start..type_end],
                "not a directive entity type"
            );
            return Ok(None);
        };

        let id_start = skip_spaces(text, type_end);
        let id_end = word_end(text, id_start, true);
        if id_end == id_start {
            debug!(%verb, %entity_type, "directive head has no id");
            return Ok(None);
        }
        let mut command = Command::new(verb, entity_type, &text[id_start..id_end]);

        let paren = skip_spaces(text, id_end);
        if !text[paren..].starts_with('(') {
            return Ok(Some((command, id_end)));
        }
        let body_start = paren + 1;
        match closing_paren(&text[body_start..]) {
            Some(close) => {
                self.parse_params(&text[body_start..body_start + close], &mut command)?;
                Ok(Some((command, body_start + close + 1)))
            }
            None => {
                // Unbalanced parameter list: keep the directive, drop the
                // params, resume scanning right after the id.
                warn!(directive = %command, "unmatched parameter list, dropping params");
                Ok(Some((command, id_end)))
            }
        }
    }

    /// Split a parameter body into `key op value` triples and attach them
    /// to the command in source order.
    fn parse_params(&mut self, body: &str, command: &mut Command) -> ParseResult<()> {
        for span in split_top_level(body, ',') {
            if span.trim().is_empty() {
                continue;
            }
            let Some(raw) = split_param(span) else {
                warn!(fragment = span.trim(), "skipping unrecognized parameter");
                continue;
            };
            if raw.value.is_empty() {
                // Historical quirk: a bare trailing `-` means "remove,
                // no value" and parses as a SubRemove of Null. Anything
                // else without a value is dropped.
                if raw.op == "-" {
                    command
                        .params
                        .insert(raw.key.to_string(), (Op::SubRemove, Value::Null));
                } else {
                    warn!(key = raw.key, op = raw.op, "parameter has no value, skipping");
                }
                continue;
            }
            let op = Op::parse(raw.op).unwrap_or(Op::Assign);
            let value = parse_value(raw.value, &mut self.rng)?;
            command.params.insert(raw.key.to_string(), (op, value));
        }
        Ok(())
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse directives with an OS-seeded RNG. Convenience for hosts that do
/// not care about dice determinism.
pub fn parse(text: &str) -> ParseResult<Vec<Command>> {
    Parser::new().parse(text)
}

/// End of the word starting at `start`: alphanumerics and underscores,
/// plus hyphens when scanning ids.
fn word_end(text: &str, start: usize, allow_hyphen: bool) -> usize {
    text[start..]
        .char_indices()
        .find(|(_, c)| {
            !(c.is_alphanumeric() || *c == '_' || (allow_hyphen && *c == '-'))
        })
        .map_or(text.len(), |(i, _)| start + i)
}

fn skip_spaces(text: &str, start: usize) -> usize {
    text[start..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(text.len(), |(i, _)| start + i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use weave_core::TypedID;

    fn parse_seeded(text: &str) -> Vec<Command> {
        Parser::with_rng(StdRng::seed_from_u64(42)).parse(text).unwrap()
    }

    fn place(id: &str) -> TypedID {
        TypedID::new(EntityType::Place, id).unwrap()
    }

    #[test]
    fn parses_a_full_create() {
        let commands =
            parse_seeded(r#"@Create Item sword-1 (name="Iron Sword", quantity=2, location="Place:armory")"#);
        assert_eq!(commands.len(), 1);
        let cmd = &commands[0];
        assert_eq!(cmd.verb, Verb::Create);
        assert_eq!(cmd.entity_type, EntityType::Item);
        assert_eq!(cmd.entity_id, "sword-1");
        assert_eq!(
            cmd.params.get("name"),
            Some(&(Op::Assign, Value::Str("Iron Sword".into())))
        );
        assert_eq!(cmd.params.get("quantity"), Some(&(Op::Assign, Value::Int(2))));
        assert_eq!(
            cmd.params.get("location"),
            Some(&(Op::Assign, Value::Ref(place("armory"))))
        );
    }

    #[test]
    fn verbs_and_types_are_case_insensitive() {
        let commands = parse_seeded("@create character hero\n@DESTROY ITEM sword-1");
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].verb, Verb::Create);
        assert_eq!(commands[0].entity_type, EntityType::Character);
        assert_eq!(commands[1].verb, Verb::Destroy);
        assert_eq!(commands[1].entity_type, EntityType::Item);
    }

    #[test]
    fn directives_embed_in_narrative_text() {
        let text = "The hero entered. @Create Place tavern (name=\"The Prancing Pony\") \
                    Later, an email to bard@keep.example arrived, and @nothing happened.";
        let commands = parse_seeded(text);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].entity_id, "tavern");
    }

    #[test]
    fn operator_folding() {
        let commands = parse_seeded("@Modify Character hero (hp+=5, mp-2, gold=10, tags+\"brave\")");
        let params = &commands[0].params;
        assert_eq!(params.get("hp"), Some(&(Op::AddMerge, Value::Int(5))));
        assert_eq!(params.get("mp"), Some(&(Op::SubRemove, Value::Int(2))));
        assert_eq!(params.get("gold"), Some(&(Op::Assign, Value::Int(10))));
        assert_eq!(
            params.get("tags"),
            Some(&(Op::AddMerge, Value::Str("brave".into())))
        );
    }

    #[test]
    fn bare_minus_means_remove_without_value() {
        let commands = parse_seeded("@Modify Character hero (curse-)");
        assert_eq!(
            commands[0].params.get("curse"),
            Some(&(Op::SubRemove, Value::Null))
        );
    }

    #[test]
    fn valueless_params_with_other_ops_are_dropped() {
        let commands = parse_seeded("@Modify Character hero (oops=, hp+=1)");
        let params = &commands[0].params;
        assert!(!params.contains_key("oops"));
        assert_eq!(params.get("hp"), Some(&(Op::AddMerge, Value::Int(1))));
    }

    #[test]
    fn quoted_commas_and_nesting_stay_in_one_param() {
        let commands = parse_seeded(
            r#"@Create Place inn (name="Rest, and Ale", exits={north: Place:square}, tags=[1, [2, 3]])"#,
        );
        let params = &commands[0].params;
        assert_eq!(
            params.get("name"),
            Some(&(Op::Assign, Value::Str("Rest, and Ale".into())))
        );
        assert!(matches!(params.get("exits"), Some((Op::Assign, Value::Map(_)))));
        assert!(matches!(params.get("tags"), Some((Op::Assign, Value::List(_)))));
    }

    #[test]
    fn directives_inside_quoted_params_are_not_reparsed() {
        let commands = parse_seeded(
            r#"@Create Item note (text="reads: @Destroy Item note (now=true)") and so on"#,
        );
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].verb, Verb::Create);
    }

    #[test]
    fn unmatched_paren_degrades_to_parameterless() {
        let text = "@Create Item torch (flicker=true and the text just trails off";
        let commands = parse_seeded(text);
        assert_eq!(commands.len(), 1);
        assert!(commands[0].params.is_empty());
    }

    #[test]
    fn scanning_resumes_after_degraded_directive() {
        let text = "@Create Item torch (oops=\"unclosed
                    @Modify Character hero (hp+=5)";
        let commands = parse_seeded(text);
        assert_eq!(commands.len(), 2);
        assert!(commands[0].params.is_empty());
        assert_eq!(
            commands[1].params.get("hp"),
            Some(&(Op::AddMerge, Value::Int(5)))
        );
    }

    #[test]
    fn unknown_verbs_and_types_are_skipped() {
        let commands = parse_seeded("@Summon Item imp (x=1) @Create Widget thing (y=2)");
        assert!(commands.is_empty());
    }

    #[test]
    fn dice_params_roll_within_range() {
        let commands = parse_seeded("@Create Character hero (hp=2d6+1)");
        let Some((Op::Assign, Value::Int(hp))) = commands[0].params.get("hp") else {
            panic!("expected a rolled int");
        };
        assert!((3..=13).contains(hp));
    }

    #[test]
    fn dotted_keys_parse() {
        let commands = parse_seeded("@Modify Character hero (stats.str+=1)");
        assert_eq!(
            commands[0].params.get("stats.str"),
            Some(&(Op::AddMerge, Value::Int(1)))
        );
    }

    #[test]
    fn broken_literal_fails_the_parse() {
        let result = Parser::with_rng(StdRng::seed_from_u64(1))
            .parse("@Create Character hero (stats={str 12})");
        assert!(result.is_err());
    }

    #[test]
    fn ids_accept_hyphens() {
        let commands = parse_seeded("@Transfer Item sword-1 (target=\"Character:hero\")");
        assert_eq!(commands[0].entity_id, "sword-1");
        assert_eq!(
            commands[0].target(),
            Some(&TypedID::new(EntityType::Character, "hero").unwrap())
        );
    }
}
