pub mod config;
pub mod publisher;

pub use config::*;
pub use publisher::*;
