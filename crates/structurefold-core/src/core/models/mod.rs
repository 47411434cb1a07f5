pub mod bases;
pub mod profile;
pub mod reference;
