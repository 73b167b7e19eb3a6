pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod nodes;
pub mod observability;
pub mod resilience;
pub mod sinks;
