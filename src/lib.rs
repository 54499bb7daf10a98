pub mod error;
pub mod config;
pub mod providers;
pub mod request;
pub mod stream;
pub mod client;

pub use client::CompletionClient;
pub use config::ClientConfig;
pub use error::Error;
pub use request::{Completion, CompletionOutput, Request, Usage};

/*

glm-complete: an async client for a hosted chat completions
endpoint (GLM by default). One call in, one tagged result out;
streamed responses are folded into the same result.

glm-complete/
├── Cargo.toml
├── src/
│   ├── lib.rs          # Re-exports
│   ├── error.rs        # Error kinds (transport, decode, shape)
│   ├── config.rs       # Endpoint, model, token, timeout
│   ├── client.rs       # CompletionClient and stream accumulation
│   ├── request.rs      # Request / Completion types
│   ├── stream.rs       # `data: ` line framing
│   └── providers/
│       ├── mod.rs
│       └── glm.rs      # Wire types and response decoding
├── demos/              # Usage
└── tests/              # Integration tests against a mock server

*/

/// CLIENT API INTERFACE:

// ===== Streamed fragments =====

/// Receives each decoded fragment of a streamed completion
/// in arrival order
pub type FragmentSender
  = tokio::sync::mpsc::UnboundedSender<String>;
pub type FragmentReceiver
  = tokio::sync::mpsc::UnboundedReceiver<String>;

/// Channel pair for `CompletionClient::complete_streaming`
pub fn fragment_channel() -> (FragmentSender, FragmentReceiver)
{   tokio::sync::mpsc::unbounded_channel()
}
