//! CLI command implementations.

pub(crate) mod bandwidth;
pub(crate) mod estimate;
pub(crate) mod probe;
