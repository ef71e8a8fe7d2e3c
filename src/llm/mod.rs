pub mod client;

pub use client::{GeminiClient, GenerationRequest, ReportProvider};
