pub mod naming;
pub mod progress;
