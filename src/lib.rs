pub mod analyst;
pub mod bake;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod seed;
pub mod server;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use config::Config;
pub use error::ScoutError;
pub use server::{build_router, serve};
