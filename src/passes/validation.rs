//! # Structural validation
//!
//! A pass wrapper around [`crate::Function::validate`], so a
//! [`crate::passes::PassManager`] pipeline can slot a validation checkpoint
//! between optimization passes, the way a validation pass typically sits
//! around an SSA-destruction boundary.
//!
//! Validation never modifies the function; a failure is logged and the
//! function is returned to the caller unchanged, since DCE/DSE themselves are
//! infallible and this pass exists only to surface a bug in an earlier pass,
//! not to recover from one.

use super::OptimizerPass;
use crate::Function;

#[derive(Debug, Default)]
pub struct Validation;

impl Validation {
    pub const fn new() -> Self {
        Self
    }
}

impl OptimizerPass for Validation {
    fn run(&mut self, function: &mut Function) -> bool {
        if let Err(error) = function.validate() {
            log::warn!("function '{}' failed validation: {error}", function.name);
        }
        false
    }

    fn name(&self) -> &'static str {
        "Validation"
    }
}
