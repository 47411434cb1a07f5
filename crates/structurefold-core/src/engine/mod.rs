//! # Engine Module
//!
//! The algorithms that turn alignments into reactivities.
//!
//! ## Architecture
//!
//! - **Stop Aggregation** ([`aggregation`]) - filters alignment records and counts RT stops per sample
//! - **Reactivity Derivation** ([`reactivity`]) - control/treatment comparison into raw reactivity
//! - **Normalization Scale** ([`scale`]) - per-transcript divisors, computed or loaded
//! - **Final Reactivity** ([`final_reactivity`]) - scaling, capping and base masking
//! - **Tasks** ([`tasks`]) - replicate combination, coverage, stop specificity, reactivity statistics
//! - **Configuration** ([`config`]), **Progress** ([`progress`]) and **Errors** ([`error`])

pub mod aggregation;
pub mod config;
pub mod error;
pub mod final_reactivity;
pub mod progress;
pub mod reactivity;
pub mod scale;
pub mod tasks;
