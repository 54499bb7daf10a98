use serde::{Deserialize, Serialize};
use log::{debug, error};

use crate::error::Error;
use crate::request::{Request, Usage};

// ===== Message Types =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage
{   pub role: String
  , pub content: String
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest
{   pub model: String
  , pub messages: Vec<ChatMessage>
  , pub temperature: f32
  , pub max_tokens: u32
  , pub stream: bool
}

impl ChatRequest
{   /// Body for a single user turn
    pub fn new(request: &Request, model: &str) -> Self
    {   ChatRequest
        {   model: model.to_string()
          , messages: vec![
              ChatMessage
              {   role: "user".to_string()
                , content: request.prompt().to_string()
              }
            ]
          , temperature: request.temperature()
          , max_tokens: request.max_tokens()
          , stream: request.stream()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse
{   pub choices: Vec<Choice>
  , #[serde(default)]
    pub usage: Option<Usage>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice
{   pub message: ResponseMessage
  , #[serde(default)]
    pub finish_reason: Option<String>
}

/// Assistant message of a buffered reply; only `content` is required
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage
{   #[serde(default)]
    pub role: Option<String>
  , pub content: String
}

// ===== Stream Types =====

/// One `data:` payload of a streamed response
#[derive(Debug, Clone, Deserialize)]
pub struct StreamChunk
{   #[serde(default)]
    pub choices: Option<Vec<StreamChoice>>
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamChoice
{   #[serde(default)]
    pub delta: Option<Delta>
}

#[derive(Debug, Clone, Deserialize)]
pub struct Delta
{   #[serde(default)]
    pub content: Option<String>
}

impl StreamChunk
{   /// Text carried by the first choice.
    /// `None` when the chunk has no `choices` array.
    pub fn fragment(self) -> Option<String>
    {   let choices = self.choices?;
        Some(
          choices.into_iter()
            .next()
            .and_then(|c| c.delta)
            .and_then(|d| d.content)
            .unwrap_or_default()
        )
    }
}

// ===== Response Decoding =====

/// Content of the first choice and the usage map (empty when absent)
pub fn decode_response(body: &[u8]) -> Result<(String, Usage), Error>
{   let value: serde_json::Value = serde_json::from_slice(body)
      .map_err(|e| {
        error!("Response is not JSON: {}", e);
        Error::DecodeError(e.to_string())
      })?;

    let response: ChatResponse = serde_json::from_value(value)
      .map_err(|e| {
        error!("Unexpected response shape: {}", e);
        Error::ShapeError(e.to_string())
      })?;

    let usage = response.usage.unwrap_or_default();
    let choice = response.choices.into_iter().next()
      .ok_or_else(|| {
        error!("No choices in response");
        Error::ShapeError("response contained no choices".to_string())
      })?;

    debug!(
      "Decoded response, finish_reason: {:?}",
      choice.finish_reason
    );
    Ok((choice.message.content, usage))
}
