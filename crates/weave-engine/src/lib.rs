//! Execution engine for Weave.
//!
//! The engine turns parsed command batches into ordered [`AtomicOp`]
//! batches and applies them to an [`EntityGraph`](weave_core::EntityGraph).
//! Translation discovers dangling references (materializing placeholder
//! entities for them) and keeps containment bidirectionally consistent;
//! execution applies ops in dependency order and stops at the first
//! failure.

/// Engine error types.
pub mod error;
/// The op executor.
pub mod executor;
/// Atomic operations and their ordering.
pub mod op;
/// Execution outcome reporting.
pub mod report;
/// The command-to-op translator.
pub mod translator;

pub use error::{EngineError, EngineResult};
pub use executor::execute;
pub use op::{AtomicOp, OpMethod, sort_for_execution};
pub use report::ExecutionReport;
pub use translator::translate;

use tracing::warn;

use weave_core::{Command, EntityGraph};
use weave_directive::Parser;

/// Translate a command batch and execute the resulting ops.
///
/// A translation failure produces a zero-executed report carrying the
/// error; nothing is applied. An execution failure stops the batch with
/// the partial count in the report.
pub fn translate_and_execute(commands: &[Command], world: &mut EntityGraph) -> ExecutionReport {
    match translate(commands, world) {
        Ok(ops) => execute(&ops, world),
        Err(error) => {
            warn!(%error, "translation failed, nothing executed");
            ExecutionReport::failed(error)
        }
    }
}

/// The full pipeline: parse directives out of `text`, translate them and
/// execute against `world`.
///
/// Only structurally broken directive text errors; everything downstream
/// lands in the returned report.
pub fn run_directives(
    parser: &mut Parser,
    text: &str,
    world: &mut EntityGraph,
) -> EngineResult<ExecutionReport> {
    let commands = parser.parse(text)?;
    Ok(translate_and_execute(&commands, world))
}
