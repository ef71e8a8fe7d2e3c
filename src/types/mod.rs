pub mod envelope;
pub mod grounding;
pub mod report;

pub use envelope::{ErrorEnvelope, ScoutRequest};
pub use grounding::{GroundingChunk, GroundingMetadata, WebSource};
pub use report::{ProviderResponse, ScoutProduct, ScoutReport, SearchParams, WatchlistEntry};
