// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod observability;
pub mod planner;
pub mod render;
pub mod types;

// Re-exports
pub use client::{API_KEY_ENV, Gemini};
pub use client_logger::ClientLogger;
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use planner::MealPlanner;
pub use types::*;
