//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Signature: `pub fn execute(ctx: &mut CliContext, ...) -> Result<(), CliError>`
//! - Validate CLI-specific input, apply the change through the controller,
//!   then print the outcome
//!
//! Persisting the mix is left to the caller.

pub mod documents;
pub mod edit;
pub mod export;
pub mod show;
pub mod voices;
