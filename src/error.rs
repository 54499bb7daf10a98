use std::fmt;

/// Error type for completion requests
/// Implements Clone for sending through channels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error
{   /// API key is missing from the configuration
    MissingApiKey(String)
  , /// Invalid configuration
    InvalidConfiguration(String)
  , /// Transport failure (connect, DNS, body read)
    HttpError(String)
  , /// Request timed out
    Timeout
  , /// Endpoint answered with a non-2xx status
    ApiError
    {   status: u16
      , body: String
    }
  , /// Response body is not valid JSON
    DecodeError(String)
  , /// Response JSON lacks the expected fields
    ShapeError(String)
}

impl Error
{   /// True for failures of the exchange itself rather than its payload
    pub fn is_transport(&self) -> bool
    {   matches!(
          self,
          Error::HttpError(_) | Error::Timeout | Error::ApiError { .. }
        )
    }
}

impl fmt::Display for Error
{   fn fmt(&self, f: &mut fmt::Formatter<'_>)
      -> fmt::Result
    {   match self
        {   Error::MissingApiKey(source) => {
              write!(f, "Missing API key: {}", source)
            }
          , Error::InvalidConfiguration(msg) => {
              write!(f, "Invalid configuration: {}", msg)
            }
          , Error::HttpError(msg) => {
              write!(f, "Connection error: {}", msg)
            }
          , Error::Timeout => {
              write!(f, "Connection error: request timed out")
            }
          , Error::ApiError { status, body } => {
              write!(f,
                "Connection error: HTTP {}: {}",
                status, body
              )
            }
          , Error::DecodeError(msg) => {
              write!(f, "Response decoding error: {}", msg)
            }
          , Error::ShapeError(msg) => {
              write!(f,
                "Unexpected response shape from server: {}",
                msg
              )
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error
{   fn from(e: reqwest::Error) -> Self
    {   if e.is_timeout()
        {   Error::Timeout
        } else
        {   Error::HttpError(e.to_string())
        }
    }
}

impl From<String> for Error
{   fn from(s: String) -> Self
    {   Error::InvalidConfiguration(s)
    }
}

impl From<&str> for Error
{   fn from(s: &str) -> Self
    {   Error::InvalidConfiguration(s.to_string())
    }
}
