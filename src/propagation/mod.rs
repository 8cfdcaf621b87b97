//! Security propagation from owner resources to the resources they link to.

mod policy;
mod propagator;

pub use policy::{SkipReason, default_change, default_translation};
pub use propagator::{PropagationReport, SecurityPropagator, SharedPredicate, TranslateFn};
