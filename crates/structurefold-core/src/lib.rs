//! # StructureFold Core Library
//!
//! Converts Structure-seq alignments into per-nucleotide reactivity profiles:
//! RT-stop counting from SAM records, control/treatment comparison,
//! per-transcript normalization and capping.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Flag codec, alignment records, profile and
//!   reference models, and the `.rtsc`/`.react`/scale file formats.
//!
//! - **[`engine`]: The Algorithms.** Stop aggregation with rejection tallies,
//!   reactivity derivation, scale estimation, final reactivity, and the
//!   supplementary per-file analyses.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that load inputs,
//!   run the engine, and write outputs.

pub mod core;
pub mod engine;
pub mod workflows;
