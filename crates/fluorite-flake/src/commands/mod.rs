pub mod blob;
pub mod provision;
pub mod validate;
