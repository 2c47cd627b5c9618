pub mod config;
pub mod engine;
pub mod matcher;
pub mod plan;
pub mod prompts;
pub mod services;

// Re-export specific items if needed for convenient access
pub use engine::Engine;
pub use plan::{Plan, PlanFormat};
