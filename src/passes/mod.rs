//! # Optimization passes
//!
//! Each pass implements [`OptimizerPass`] and is run to a fixpoint or once,
//! depending on the configuration in [`crate::pipeline`].

pub mod dce;
pub mod dse;
pub mod prune_unreachable;
pub mod validation;

pub use dce::DeadCodeElimination;
pub use dse::DeadStoreElimination;
pub use prune_unreachable::PruneUnreachableBlocks;
pub use validation::Validation;

use crate::Function;

/// A single optimization pass over a function.
pub trait OptimizerPass {
    /// Applies this pass once. Returns whether the function changed.
    fn run(&mut self, function: &mut Function) -> bool;

    /// Name used for logging, matching the name callers use to refer to the
    /// pass in diagnostics.
    fn name(&self) -> &'static str;
}

/// Runs a sequence of passes over a function, in order, once each.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn OptimizerPass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    pub fn add_pass<P: OptimizerPass + 'static>(mut self, pass: P) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Runs every pass once, in the order they were added. Returns whether
    /// any pass modified the function.
    pub fn run(&mut self, function: &mut Function) -> bool {
        let mut modified = false;
        for pass in &mut self.passes {
            if pass.run(function) {
                modified = true;
                log::debug!("pass '{}' modified function '{}'", pass.name(), function.name);
            }
        }
        modified
    }

    /// Runs every pass once, then repeats the whole sequence until a full
    /// round makes no change.
    pub fn run_to_fixpoint(&mut self, function: &mut Function) -> bool {
        let mut modified_overall = false;
        loop {
            if !self.run(function) {
                break;
            }
            modified_overall = true;
        }
        modified_overall
    }

    /// The canonical ANVIL pipeline: one DSE pass followed by DCE run to
    /// fixpoint. DSE must see stores before DCE removes the values they
    /// write, so the ordering matters.
    pub fn standard_pipeline() -> Self {
        Self::new()
            .add_pass(DeadStoreElimination::new())
            .add_pass(DeadCodeElimination::new())
    }
}
