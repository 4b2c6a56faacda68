//! Applies atomic op batches to the entity graph.
//!
//! Ops run strictly in the order given. The first failure stops the
//! batch: earlier ops stay applied (there is no rollback), the failure is
//! reported, and the rest never runs.

use tracing::{debug, warn};

use weave_core::{Entity, EntityGraph};

use crate::error::{EngineError, EngineResult};
use crate::op::{AtomicOp, OpMethod};
use crate::report::ExecutionReport;

/// Apply `ops` to `world` in order, stopping at the first failure.
pub fn execute(ops: &[AtomicOp], world: &mut EntityGraph) -> ExecutionReport {
    let mut report = ExecutionReport {
        executed: 0,
        total: ops.len(),
        ..ExecutionReport::default()
    };
    for op in ops {
        match apply(op, world) {
            Ok(()) => report.executed += 1,
            Err(error) => {
                warn!(%op, %error, "atomic op failed, aborting batch");
                report.errors.push(format!("{op}: {error}"));
                break;
            }
        }
    }
    debug!(executed = report.executed, total = report.total, "batch done");
    report
}

fn apply(op: &AtomicOp, world: &mut EntityGraph) -> EngineResult<()> {
    match op.method {
        OpMethod::Create => {
            match world.find(&op.target, true) {
                Some(existing) if existing.is_destroyed() => {
                    // Resurrection wipes the old entity entirely: open
                    // attributes and core fields both start fresh.
                    debug!(target = %op.target, "resurrecting destroyed entity");
                    world.insert(Entity::new(op.target.entity_type, op.target.id.clone()));
                }
                Some(_) => {
                    // Two creates for the same id in one batch (say, a
                    // placeholder plus an explicit create). Keep the
                    // entity, let the attrs overwrite.
                    warn!(target = %op.target, "create over live entity, patching attributes");
                }
                None => {
                    world.insert(Entity::new(op.target.entity_type, op.target.id.clone()));
                }
            }
            apply_attrs(op, world)
        }
        OpMethod::Patch => {
            if world.find(&op.target, false).is_none() {
                return Err(EngineError::MissingEntity {
                    action: "patch",
                    target: op.target.clone(),
                });
            }
            apply_attrs(op, world)
        }
        OpMethod::Delete => {
            match world.find_mut(&op.target, true) {
                None => warn!(target = %op.target, "delete target does not exist"),
                Some(entity) if entity.is_destroyed() => {
                    debug!(target = %op.target, "delete target already destroyed");
                }
                Some(entity) => entity.set_destroyed(true),
            }
            Ok(())
        }
    }
}

fn apply_attrs(op: &AtomicOp, world: &mut EntityGraph) -> EngineResult<()> {
    let Some(attrs) = &op.attrs else {
        return Ok(());
    };
    let Some(entity) = world.find_mut(&op.target, false) else {
        return Err(EngineError::MissingEntity {
            action: "patch",
            target: op.target.clone(),
        });
    };
    for (key, (attr_op, value)) in attrs {
        entity.modify_attribute(key, *attr_op, value)?;
    }
    Ok(())
}
