//! Readers and writers for the pipeline's file formats.
//!
//! Profile formats (`.rtsc`, `.react`) share the [`traits::ProfileFile`]
//! interface; reference sequences, normalization scales, transcript lists and
//! CSV reports have their own small modules.

pub mod fasta;
pub mod react;
pub mod rtsc;
pub mod scale;
pub mod table;
pub mod traits;
pub mod transcripts;
