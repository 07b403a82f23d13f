//! Pareto-front capability.
//!
//! Each problem carries a [`FrontProvider`] that either computes its true
//! Pareto front or answers [`FrontOutcome::Unavailable`]. The problem caches
//! the first successful answer; see
//! [`Problem::pareto_front`](crate::problem::Problem::pareto_front).
//!
//! # Key Types
//!
//! - [`FrontProvider`]: the capability trait
//! - [`ClosedForm`], [`SimplexFront`], [`Sidecar`], [`NoFront`]: sources
//! - [`FrontStore`]: key-addressed tabulated fronts ([`DirectoryStore`],
//!   [`MemoryStore`])

mod provider;
mod store;

pub(crate) use provider::linspace;
pub use provider::{
    project_to_sphere, ClosedForm, FrontOutcome, FrontProvider, FrontRequest, NoFront, Sidecar,
    SimplexFront,
};
pub use store::{parse_front, DirectoryStore, FrontStore, MemoryStore};
