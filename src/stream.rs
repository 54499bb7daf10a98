//! Line framing for streamed responses.
//!
//! The body is newline-delimited. Each non-empty line is
//! `data: <json>`; a `data: [DONE]` line ends the stream early.

use log::trace;

use crate::error::Error;
use crate::providers::glm::StreamChunk;

/// Marker in front of every payload line
pub const DATA_PREFIX: &str = "data: ";
/// Payload that terminates the stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// One decoded line
#[derive(Debug)]
pub enum StreamLine
{   /// Empty line or a line without the data prefix
    Skip
  , /// Terminal sentinel
    Done
  , Chunk(StreamChunk)
}

/// Parse a single line with its terminator already removed
pub fn parse_line(line: &str) -> Result<StreamLine, Error>
{   let line = line.trim_end_matches('\r');
    if line.trim().is_empty()
    {   return Ok(StreamLine::Skip);
    }

    let Some(payload) = line.strip_prefix(DATA_PREFIX)
    else
    {   trace!("Ignoring non-data line: {}", line);
        return Ok(StreamLine::Skip);
    };

    let payload = payload.trim();
    if payload == DONE_SENTINEL
    {   return Ok(StreamLine::Done);
    }

    serde_json::from_str::<StreamChunk>(payload)
      .map(StreamLine::Chunk)
      .map_err(|e| Error::DecodeError(
        format!("malformed stream chunk: {}", e)
      ))
}

/// Splits body bytes into complete lines across read boundaries
#[derive(Debug, Default)]
pub struct LineBuffer
{   pending: Vec<u8>
}

impl LineBuffer
{   pub fn new() -> Self
    {   LineBuffer::default()
    }

    /// Append bytes and drain every complete line
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String>
    {   // Only the new bytes can hold a newline not seen before
        let scan_from = self.pending.len();
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        let mut start = 0;
        for (i, b) in self.pending.iter().enumerate().skip(scan_from)
        {   if *b == b'\n'
            {   lines.push(
                  String::from_utf8_lossy(&self.pending[start..i]).into_owned()
                );
                start = i + 1;
            }
        }
        self.pending.drain(..start);
        lines
    }

    /// Whatever is left once the body has ended
    pub fn finish(self) -> Option<String>
    {   if self.pending.is_empty()
        {   None
        } else
        {   Some(String::from_utf8_lossy(&self.pending).into_owned())
        }
    }
}
