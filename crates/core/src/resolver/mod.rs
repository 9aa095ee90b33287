//! Transitive dependency closure of a single declaration.

mod engine;
mod policy;

pub use engine::{ClosureResolver, ClosureResult, Diagnostic, ResolutionNode};
pub use policy::ResolverPolicy;
