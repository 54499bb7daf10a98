use std::ops::ControlFlow;
use std::time::{Duration, Instant};
use log::{debug, trace, error, info, warn};

use crate::config::ClientConfig;
use crate::error::Error;
use crate::providers::glm::{self, ChatRequest};
use crate::request::{Completion, CompletionOutput, Request};
use crate::stream::{self, LineBuffer, StreamLine};

/// Client for the chat completions endpoint
///
/// Holds no per-request state; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct CompletionClient
{   config: ClientConfig
  , http_client: reqwest::Client
}

impl CompletionClient
{   /// Validates the config and builds an HTTP client with its timeout
    pub fn new(config: ClientConfig) -> Result<Self, Error>
    {   debug!("Creating CompletionClient for {}", config.api_url);
        config.validate()?;

        let http_client = reqwest::Client::builder()
          .timeout(Duration::from_secs(config.timeout_secs))
          .build()
          .map_err(|e| {
            error!("Failed to build HTTP client: {}", e);
            Error::InvalidConfiguration(e.to_string())
          })?;

        Ok(CompletionClient
        {   config
          , http_client
        })
    }

    /// Shorthand for `ClientConfig::from_env` then `new`
    pub fn from_env() -> Result<Self, Error>
    {   CompletionClient::new(ClientConfig::from_env()?)
    }

    pub fn config(&self) -> &ClientConfig
    {   &self.config
    }

    /// Run one request; every failure becomes `Completion::Failure`
    pub async fn complete(&self, request: &Request) -> Completion
    {   self.try_complete(request, None).await.into()
    }

    /// Like `complete`, also forwarding each streamed fragment
    /// to `fragments` as it arrives
    pub async fn complete_streaming(
      &self
    , request: &Request
    , fragments: crate::FragmentSender
    ) -> Completion
    {   self.try_complete(request, Some(fragments)).await.into()
    }

    /// Typed variant of `complete`
    pub async fn try_complete(
      &self
    , request: &Request
    , fragments: Option<crate::FragmentSender>
    ) -> Result<CompletionOutput, Error>
    {   let body = ChatRequest::new(request, &self.config.model);
        debug!(
          "Sending completion request, model: {}, stream: {}",
          body.model, body.stream
        );
        trace!("Completion request: {:?}", body);

        let start = Instant::now();
        let response = self.http_client
          .post(&self.config.api_url)
          .header(
            "Authorization",
            format!("Bearer {}", self.config.api_key)
          )
          .header("Content-Type", "application/json")
          .json(&body)
          .send()
          .await
          .map_err(|e| {
            error!("HTTP error: {}", e);
            Error::from(e)
          })?;

        let status = response.status();
        trace!("Completion response status: {}", status);

        if !status.is_success()
        {   let error_text = response.text().await
              .unwrap_or_else(|_|
                "Unknown error".to_string()
              );
            error!("API error {}: {}", status, error_text);
            return Err(Error::ApiError
            {   status: status.as_u16()
              , body: error_text
            });
        }

        let output = if request.stream()
        {   let content = read_stream(response, fragments).await?;
            CompletionOutput
            {   content
              , usage: None
              , elapsed_seconds: start.elapsed().as_secs_f64()
            }
        } else
        {   let bytes = response.bytes().await
              .map_err(|e| {
                error!("Failed to read response body: {}", e);
                Error::from(e)
              })?;
            let (content, usage) = glm::decode_response(&bytes)?;
            CompletionOutput
            {   content
              , usage: Some(usage)
              , elapsed_seconds: start.elapsed().as_secs_f64()
            }
        };

        info!(
          "Completion finished in {:.2}s ({} chars)",
          output.elapsed_seconds,
          output.content.len()
        );
        Ok(output)
    }
}

/// Accumulate the streamed deltas until the body ends or `[DONE]`
async fn read_stream(
  mut response: reqwest::Response
, fragments: Option<crate::FragmentSender>
) -> Result<String, Error>
{   let mut acc = StreamAccumulator::new(fragments);
    let mut lines = LineBuffer::new();

    'body: loop
    {   let bytes = response.chunk().await
          .map_err(|e| {
            error!("Stream interrupted: {}", e);
            Error::from(e)
          })?;

        let Some(bytes) = bytes
        else
        {   // Unterminated final line; the body is over either way,
            // so a trailing `[DONE]` changes nothing
            if let Some(line) = std::mem::take(&mut lines).finish()
            {   let _ = acc.apply(&line);
            }
            break 'body;
        };

        for line in lines.push(&bytes)
        {   if acc.apply(&line).is_break()
            {   debug!("Stream terminated by sentinel");
                break 'body;
            }
        }
    }

    Ok(acc.finish())
}

/// Per-call stream state, dropped with the call
struct StreamAccumulator
{   content: String
  , fragments: Option<crate::FragmentSender>
  , chunks: usize
  , skipped: usize
}

impl StreamAccumulator
{   fn new(fragments: Option<crate::FragmentSender>) -> Self
    {   StreamAccumulator
        {   content: String::new()
          , fragments
          , chunks: 0
          , skipped: 0
        }
    }

    /// Malformed chunks are skipped and counted
    fn apply(&mut self, line: &str) -> ControlFlow<()>
    {   match stream::parse_line(line)
        {   Ok(StreamLine::Skip) => {}
          , Ok(StreamLine::Done) => {
              return ControlFlow::Break(());
            }
          , Ok(StreamLine::Chunk(chunk)) => {
              self.chunks += 1;
              match chunk.fragment()
              {   Some(fragment) if !fragment.is_empty() => {
                    if let Some(tx) = &self.fragments
                    {   // Receiver may be gone; output is optional
                        let _ = tx.send(fragment.clone());
                    }
                    self.content.push_str(&fragment);
                  }
                , _ => {}
              }
            }
          , Err(e) => {
              warn!("{}", e);
              self.skipped += 1;
            }
        }
        ControlFlow::Continue(())
    }

    fn finish(self) -> String
    {   if self.skipped > 0
        {   warn!("Skipped {} malformed stream chunks", self.skipped);
        }
        debug!("Stream ended after {} chunks", self.chunks);
        self.content
    }
}
