//! Test helpers shared across the workspace.
//!
//! Process-wide state such as environment variables must not be mutated by
//! two tests at once. The guards here serialise that access and put things
//! back when dropped.

pub mod env;
pub mod figment;
