//! Configuration for the completion client

use std::fmt;
use std::path::Path;
use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Chat completions endpoint used when none is configured
pub const DEFAULT_API_URL: &str
  = "https://open.bigmodel.cn/api/paas/v4/chat/completions";
/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "glm-4.5-pro";
/// Request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const ENV_API_KEY: &str = "GLM_API_KEY";
pub const ENV_API_URL: &str = "GLM_API_URL";
pub const ENV_MODEL: &str = "GLM_MODEL";
pub const ENV_TIMEOUT_SECS: &str = "GLM_TIMEOUT_SECS";

fn default_api_url() -> String
{   DEFAULT_API_URL.to_string()
}

fn default_model() -> String
{   DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64
{   DEFAULT_TIMEOUT_SECS
}

/// Client configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig
{   /// Full URL of the chat completions endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String
  , /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String
  , /// Bearer token
    pub api_key: String
  , /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64
}

impl ClientConfig
{   /// Default endpoint, model and timeout with the given key
    pub fn new(api_key: impl Into<String>) -> Self
    {   ClientConfig
        {   api_url: default_api_url()
          , model: default_model()
          , api_key: api_key.into()
          , timeout_secs: DEFAULT_TIMEOUT_SECS
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self
    {   self.api_url = api_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self
    {   self.model = model.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self
    {   self.timeout_secs = timeout_secs;
        self
    }

    /// Load from `GLM_API_KEY` plus optional
    /// `GLM_API_URL`, `GLM_MODEL` and `GLM_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, Error>
    {   debug!("Loading client config from environment");
        let api_key = std::env::var(ENV_API_KEY)
          .map_err(|_| {
            error!("{} not set", ENV_API_KEY);
            Error::MissingApiKey(ENV_API_KEY.to_string())
          })?;

        let mut config = ClientConfig::new(api_key);

        if let Ok(url) = std::env::var(ENV_API_URL)
        {   config.api_url = url;
        }
        if let Ok(model) = std::env::var(ENV_MODEL)
        {   config.model = model;
        }
        if let Ok(raw) = std::env::var(ENV_TIMEOUT_SECS)
        {   config.timeout_secs = raw.trim().parse()
              .map_err(|_| format!(
                "{} is not a number of seconds: {}",
                ENV_TIMEOUT_SECS, raw
              ))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error>
    {   let path = path.as_ref();
        debug!("Loading client config from {}", path.display());

        let raw = std::fs::read_to_string(path)
          .map_err(|e| format!(
            "cannot read {}: {}", path.display(), e
          ))?;
        let config: ClientConfig = serde_json::from_str(&raw)
          .map_err(|e| format!(
            "cannot parse {}: {}", path.display(), e
          ))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error>
    {   if self.api_key.trim().is_empty()
        {   return Err(Error::MissingApiKey(
              "api_key is empty".to_string()
            ));
        }
        reqwest::Url::parse(&self.api_url)
          .map_err(|e| format!(
            "api_url {:?} is not a valid URL: {}", self.api_url, e
          ))?;
        if self.model.trim().is_empty()
        {   return Err("model is empty".into());
        }
        if self.timeout_secs == 0
        {   return Err("timeout_secs must be positive".into());
        }
        Ok(())
    }
}

// Keeps the bearer token out of logs
impl fmt::Debug for ClientConfig
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.debug_struct("ClientConfig")
          .field("api_url", &self.api_url)
          .field("model", &self.model)
          .field("api_key", &"<redacted>")
          .field("timeout_secs", &self.timeout_secs)
          .finish()
    }
}
