//! Configuration layering for the pipeline commands.
//!
//! Values resolve in the order built-in defaults < TOML file < command-line
//! flags < `--set KEY=VALUE` overrides.

mod builder;
mod defaults;
mod file;

pub use builder::{build_rtsc_to_react_config, build_sam_to_rtsc_config};
pub use defaults::DefaultsConfig;
