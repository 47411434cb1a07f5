//! # Workflows Module
//!
//! End-to-end procedures of the pipeline. Each workflow loads its inputs,
//! reports progress through a [`ProgressReporter`](crate::engine::progress::ProgressReporter),
//! and writes its own output files.
//!
//! - **Alignments to stops** ([`sam_to_rtsc`]) - one `.rtsc` per SAM file plus a filter report
//! - **Stops to reactivity** ([`rtsc_to_react`]) - control/treatment `.rtsc` pair into a `.react`

pub mod rtsc_to_react;
pub mod sam_to_rtsc;
