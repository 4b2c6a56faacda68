//! Command batch → atomic op batch.
//!
//! Translation reads the world but never writes it. It expands each
//! command into primary ops, discovers dangling references and schedules
//! placeholder creations for them, and issues the secondary ops that keep
//! a container's content list in sync with a moved entity's location
//! field. Containment is maintained here and only here — entity mutators
//! stay local to one entity.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use weave_core::{Command, Entity, EntityGraph, EntityType, Op, Params, TypedID, Value, Verb};

use crate::error::{EngineError, EngineResult};
use crate::op::{AtomicOp, sort_for_execution};

/// Translate a command batch against a read view of the world.
///
/// The returned ops are stably sorted Create < Patch < Delete, which
/// guarantees placeholders exist before any patch references them and
/// containment cleanups run before the corresponding delete. Translation
/// fails fast: the first unresolvable command aborts the whole batch
/// before anything executes.
pub fn translate(batch: &[Command], world: &EntityGraph) -> EngineResult<Vec<AtomicOp>> {
    let mut ops = Vec::new();
    // Deduplicated by reference; the value records which command first
    // needed the placeholder, for the generated entity name.
    let mut placeholders: BTreeMap<TypedID, String> = BTreeMap::new();

    for command in batch {
        translate_command(command, world, &mut ops, &mut placeholders)?;
    }

    let mut all: Vec<AtomicOp> = placeholders
        .iter()
        .map(|(target, context)| placeholder_create(target, context))
        .collect();
    all.extend(ops);
    sort_for_execution(&mut all);
    debug!(
        commands = batch.len(),
        ops = all.len(),
        "translated command batch"
    );
    Ok(all)
}

fn translate_command(
    command: &Command,
    world: &EntityGraph,
    ops: &mut Vec<AtomicOp>,
    placeholders: &mut BTreeMap<TypedID, String>,
) -> EngineResult<()> {
    let source = command.typed_id();
    let context = format!("{} {}", command.verb, source);

    // Every reference buried anywhere in the params may need a
    // placeholder, including refs nested inside lists and maps.
    for (_, (_, value)) in &command.params {
        schedule_placeholders(value, world, placeholders, &context);
    }

    match command.verb {
        Verb::Create => {
            match world.find(&source, true) {
                Some(existing) if !existing.is_destroyed() => {
                    // Creating over a live entity patches it instead.
                    warn!(%source, "create target already exists, patching instead");
                    if !command.params.is_empty() {
                        ops.push(AtomicOp::patch(source.clone(), command.params.clone()));
                    }
                    maintain_location(command, Some(existing), world, ops, placeholders, &context)
                }
                _ => {
                    ops.push(AtomicOp::create(source.clone(), command.params.clone()));
                    maintain_location(command, None, world, ops, placeholders, &context)
                }
            }
        }
        Verb::Modify => {
            let Some(entity) = world.find(&source, false) else {
                return Err(EngineError::MissingEntity {
                    action: "modify",
                    target: source,
                });
            };
            if command.params.is_empty() {
                warn!(%source, "modify carries no params, nothing to do");
                return Ok(());
            }
            ops.push(AtomicOp::patch(source.clone(), command.params.clone()));
            maintain_location(command, Some(entity), world, ops, placeholders, &context)
        }
        Verb::Transfer => {
            let Some(entity) = world.find(&source, false) else {
                return Err(EngineError::MissingEntity {
                    action: "transfer",
                    target: source,
                });
            };
            let Some(target) = command.target() else {
                return Err(EngineError::MissingTarget(source));
            };
            let key = match source.entity_type {
                EntityType::Item
                    if matches!(
                        target.entity_type,
                        EntityType::Place | EntityType::Character
                    ) =>
                {
                    "location"
                }
                EntityType::Character if target.entity_type == EntityType::Place => {
                    "current_place"
                }
                EntityType::Place => return Err(EngineError::NotTransferable(source)),
                _ => {
                    return Err(EngineError::ContainerMismatch {
                        mover: source,
                        container: target.clone(),
                    });
                }
            };

            let old = entity.location_ref().cloned();
            ops.push(AtomicOp::patch(
                source.clone(),
                single_attr(key, Op::Assign, Value::Ref(target.clone())),
            ));
            if old.as_ref() != Some(target) {
                relationship_updates(&source, old.as_ref(), Some(target), world, ops)?;
            }
            Ok(())
        }
        Verb::Destroy => {
            let Some(entity) = world.find(&source, false) else {
                // Missing or already destroyed: nothing to clean up, and
                // the delete itself is idempotent downstream.
                debug!(%source, "destroy target missing or already destroyed");
                ops.push(AtomicOp::delete(source));
                return Ok(());
            };
            if let Some(old) = entity.location_ref().cloned() {
                relationship_updates(&source, Some(&old), None, world, ops)?;
            }
            ops.push(AtomicOp::delete(source));
            Ok(())
        }
    }
}

/// Walk a param value; every reference that resolves to nothing live gets
/// a placeholder scheduled (once).
fn schedule_placeholders(
    value: &Value,
    world: &EntityGraph,
    placeholders: &mut BTreeMap<TypedID, String>,
    context: &str,
) {
    value.walk_refs(&mut |id| {
        if !world.contains_live(id) && !placeholders.contains_key(id) {
            warn!(reference = %id, context, "dangling reference, scheduling placeholder");
            placeholders.insert(id.clone(), context.to_string());
        }
    });
}

/// The Create op materializing one placeholder. Carries only the
/// generated warning name so the narrative layer can spot it.
fn placeholder_create(target: &TypedID, context: &str) -> AtomicOp {
    let name = format!(
        "Warning: Missing {} [{}] (Auto-created by: {})",
        target.entity_type, target.id, context
    );
    AtomicOp::create(
        target.clone(),
        single_attr("name", Op::Assign, Value::Str(name)),
    )
}

/// If the command assigns the entity's location-bearing field, compare
/// old and new and emit the containment updates.
fn maintain_location(
    command: &Command,
    existing: Option<&Entity>,
    world: &EntityGraph,
    ops: &mut Vec<AtomicOp>,
    placeholders: &mut BTreeMap<TypedID, String>,
    context: &str,
) -> EngineResult<()> {
    let source = command.typed_id();
    let key = match source.entity_type {
        EntityType::Item => "location",
        EntityType::Character => "current_place",
        EntityType::Place => return Ok(()),
    };
    let Some((op, value)) = command.params.get(key) else {
        return Ok(());
    };
    if *op != Op::Assign {
        return Err(EngineError::LocationAssignOnly {
            target: source,
            key,
        });
    }
    let new = match value {
        Value::Ref(id) => Some(id.clone()),
        Value::Null => None,
        // Any other shape is rejected by field validation at execution
        // time; there is no location change to maintain.
        _ => return Ok(()),
    };
    if let Some(id) = &new {
        schedule_placeholders(&Value::Ref(id.clone()), world, placeholders, context);
    }

    let old = existing.and_then(|e| e.location_ref().cloned());
    if old == new {
        return Ok(());
    }
    relationship_updates(&source, old.as_ref(), new.as_ref(), world, ops)
}

/// Emit the secondary patches that keep container content lists in sync:
/// pull the mover out of the old container, add it to the new one.
fn relationship_updates(
    mover: &TypedID,
    old: Option<&TypedID>,
    new: Option<&TypedID>,
    world: &EntityGraph,
    ops: &mut Vec<AtomicOp>,
) -> EngineResult<()> {
    if let Some(old_id) = old {
        if world.find(old_id, false).is_some() {
            match Entity::content_key(old_id.entity_type) {
                Some(content_key) => ops.push(AtomicOp::patch(
                    old_id.clone(),
                    single_attr(content_key, Op::SubRemove, Value::Ref(mover.clone())),
                )),
                None => warn!(container = %old_id, "old container holds no content list"),
            }
        } else {
            warn!(container = %old_id, "old container not found, skipping removal");
        }
    }

    if let Some(new_id) = new {
        let compatible = match new_id.entity_type {
            EntityType::Place => matches!(
                mover.entity_type,
                EntityType::Item | EntityType::Character
            ),
            EntityType::Character => mover.entity_type == EntityType::Item,
            EntityType::Item => false,
        };
        let Some(content_key) = Entity::content_key(new_id.entity_type) else {
            return Err(EngineError::ContainerMismatch {
                mover: mover.clone(),
                container: new_id.clone(),
            });
        };
        if !compatible {
            return Err(EngineError::ContainerMismatch {
                mover: mover.clone(),
                container: new_id.clone(),
            });
        }
        ops.push(AtomicOp::patch(
            new_id.clone(),
            single_attr(content_key, Op::AddMerge, Value::Ref(mover.clone())),
        ));
    }
    Ok(())
}

fn single_attr(key: &str, op: Op, value: Value) -> Params {
    let mut attrs = Params::new();
    attrs.insert(key.to_string(), (op, value));
    attrs
}
