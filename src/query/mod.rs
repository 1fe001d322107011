//! Online question answering: routing, retrieval, grounding and
//! constrained synthesis.

pub mod context;
pub mod location;
pub mod log;
pub mod pipeline;
pub mod router;
pub mod synthesizer;

pub use log::QueryLogger;
pub use pipeline::QueryPipeline;
