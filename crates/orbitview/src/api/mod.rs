pub mod actor;
pub mod error;
pub mod types;
pub mod viewer;
