//! Core conversion building blocks: the staged text pipeline (merge,
//! markup rewrite, refinement, colorizing) and the parameter set.
//! These are internal primitives consumed by the high-level `api` module.
pub mod params;
pub mod pipeline;
