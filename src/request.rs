//! Request and result types for completions

use std::ops::RangeInclusive;
use log::debug;

/// Sampling temperature accepted by the endpoint
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = 0.0..=1.5;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Token-count statistics as reported by the endpoint
pub type Usage = serde_json::Map<String, serde_json::Value>;

/// A single completion request
///
/// Fields are fixed at construction; the builder methods
/// consume and return the request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request
{   prompt: String
  , temperature: f32
  , max_tokens: u32
  , stream: bool
}

impl Request
{   /// Request with default temperature and token limit, not streamed
    pub fn new(prompt: impl Into<String>) -> Self
    {   Request
        {   prompt: prompt.into()
          , temperature: DEFAULT_TEMPERATURE
          , max_tokens: DEFAULT_MAX_TOKENS
          , stream: false
        }
    }

    /// Clamped to `TEMPERATURE_RANGE`
    pub fn with_temperature(mut self, temperature: f32) -> Self
    {   let clamped = if temperature.is_nan()
        {   DEFAULT_TEMPERATURE
        } else
        {   temperature.clamp(
              *TEMPERATURE_RANGE.start(),
              *TEMPERATURE_RANGE.end()
            )
        };
        if clamped != temperature
        {   debug!(
              "Temperature {} clamped to {}", temperature, clamped
            );
        }
        self.temperature = clamped;
        self
    }

    /// Zero is raised to one
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self
    {   self.max_tokens = max_tokens.max(1);
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self
    {   self.stream = stream;
        self
    }

    pub fn prompt(&self) -> &str
    {   &self.prompt
    }

    pub fn temperature(&self) -> f32
    {   self.temperature
    }

    pub fn max_tokens(&self) -> u32
    {   self.max_tokens
    }

    pub fn stream(&self) -> bool
    {   self.stream
    }
}

/// Successful exchange, before it is folded into a `Completion`
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutput
{   pub content: String
  , /// `None` for streamed responses
    pub usage: Option<Usage>
  , pub elapsed_seconds: f64
}

/// Outcome of one completion request
#[derive(Debug, Clone, PartialEq)]
pub enum Completion
{   Success
    {   content: String
      , usage: Option<Usage>
      , elapsed_seconds: f64
    }
  , Failure
    {   message: String
    }
}

impl Completion
{   pub fn is_success(&self) -> bool
    {   matches!(self, Completion::Success { .. })
    }

    /// Generated text, if any
    pub fn content(&self) -> Option<&str>
    {   match self
        {   Completion::Success { content, .. } => Some(content)
          , Completion::Failure { .. } => None
        }
    }

    /// Failure message, if any
    pub fn message(&self) -> Option<&str>
    {   match self
        {   Completion::Success { .. } => None
          , Completion::Failure { message } => Some(message)
        }
    }
}

impl From<Result<CompletionOutput, crate::error::Error>> for Completion
{   fn from(
      result: Result<CompletionOutput, crate::error::Error>
    ) -> Self
    {   match result
        {   Ok(out) => Completion::Success
            {   content: out.content
              , usage: out.usage
              , elapsed_seconds: out.elapsed_seconds
            }
          , Err(e) => Completion::Failure
            {   message: e.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests
{   use super::*;
    use crate::error::Error;

    #[test]
    fn defaults_match_plain_call()
    {   let req = Request::new("hi");
        assert_eq!(req.prompt(), "hi");
        assert_eq!(req.temperature(), 0.7);
        assert_eq!(req.max_tokens(), 1000);
        assert!(!req.stream());
    }

    #[test]
    fn temperature_is_clamped()
    {   assert_eq!(Request::new("x").with_temperature(3.0).temperature(), 1.5);
        assert_eq!(Request::new("x").with_temperature(-1.0).temperature(), 0.0);
        assert_eq!(Request::new("x").with_temperature(0.3).temperature(), 0.3);
        assert_eq!(
          Request::new("x").with_temperature(f32::NAN).temperature(),
          DEFAULT_TEMPERATURE
        );
    }

    #[test]
    fn max_tokens_stays_positive()
    {   assert_eq!(Request::new("x").with_max_tokens(0).max_tokens(), 1);
        assert_eq!(Request::new("x").with_max_tokens(1800).max_tokens(), 1800);
    }

    #[test]
    fn builder_is_the_only_way_in()
    {   // No serde path around the limits
        let req = Request::new("x")
          .with_temperature(9.0)
          .with_max_tokens(0)
          .with_stream(true);
        assert_eq!(req.temperature(), 1.5);
        assert_eq!(req.max_tokens(), 1);
        assert!(TEMPERATURE_RANGE.contains(&req.temperature()));
    }

    #[test]
    fn failure_carries_error_message()
    {   let completion: Completion
          = Err(Error::DecodeError("eof".to_string())).into();
        assert!(!completion.is_success());
        assert_eq!(completion.content(), None);
        assert!(completion.message().unwrap().contains("decoding"));
    }
}
