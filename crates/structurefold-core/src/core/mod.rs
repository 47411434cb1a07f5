//! # Core Module
//!
//! Stateless building blocks of the RT-stop pipeline: alignment-flag decoding,
//! alignment record parsing, per-transcript profile models and file formats.
//!
//! - **Flags** ([`flags`]) - 12-bit SAM flag codec and reject-mask tests
//! - **Alignments** ([`alignment`]) - typed alignment lines and read filters
//! - **Models** ([`models`]) - stop/reactivity profiles, reference sequences, target bases
//! - **File I/O** ([`io`]) - `.rtsc`, `.react`, FASTA, scale tables, transcript lists, CSV reports

pub mod alignment;
pub mod flags;
pub mod io;
pub mod models;
