//! Per-file analyses that run alongside the main pipeline.
//!
//! Each submodule exposes a `run` function over already-loaded profiles and a
//! report type that renders to a CSV [`Table`](crate::core::io::table::Table).

pub mod combine;
pub mod coverage;
pub mod specificity;
pub mod statistics;
