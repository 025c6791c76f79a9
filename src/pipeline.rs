//! # Pipeline entry points
//!
//! Two free functions, `run_dce`/`run_dse`, are the canonical entry points
//! into this crate. [`Pipeline`] and [`PipelineConfig`] are the configurable
//! driver around them, useful to a caller that wants the optimizer wired
//! into a larger compilation pipeline the way a `CompilationPipeline` wires
//! its `PassManager` into a backend.

use crate::{
    passes::{DeadCodeElimination, DeadStoreElimination, OptimizerPass, PassManager},
    Function,
};

/// Runs dead store elimination once. Returns whether any store was rewritten
/// to `NOP`.
///
/// Infallible: an empty function (no blocks) simply has nothing to scan and
/// this returns `false`.
pub fn run_dse(function: &mut Function) -> bool {
    DeadStoreElimination::new().run(function)
}

/// Runs dead code elimination to fixpoint. Returns whether anything was
/// removed.
pub fn run_dce(function: &mut Function) -> bool {
    DeadCodeElimination::new().run(function)
}

/// Configuration for [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Neutralize blocks unreachable from the entry before running DSE/DCE.
    pub prune_unreachable_blocks: bool,
    /// Re-run the full DSE-then-DCE sequence until a whole round makes no
    /// further change, rather than running each pass exactly once.
    pub run_to_fixpoint: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            prune_unreachable_blocks: false,
            run_to_fixpoint: false,
        }
    }
}

/// A configurable driver over the ANVIL optimizer passes.
pub struct Pipeline {
    config: PipelineConfig,
    manager: PassManager,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let mut manager = PassManager::new();
        if config.prune_unreachable_blocks {
            manager = manager.add_pass(crate::passes::PruneUnreachableBlocks::new());
        }
        manager = manager
            .add_pass(DeadStoreElimination::new())
            .add_pass(DeadCodeElimination::new());

        Self { config, manager }
    }

    /// Runs the configured pipeline over `function`. Returns whether
    /// anything changed.
    pub fn run(&mut self, function: &mut Function) -> bool {
        if self.config.run_to_fixpoint {
            self.manager.run_to_fixpoint(function)
        } else {
            self.manager.run(function)
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
