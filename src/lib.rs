pub mod canonical;
pub mod classify;
pub mod error;
pub mod loader;
pub mod mapping;
pub mod normalize;
pub mod records;
pub mod registry;
