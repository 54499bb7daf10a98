//! Wire formats of the hosted completion APIs

pub mod glm;

// Re-export for convenience
pub use glm::{ChatRequest, StreamChunk};
