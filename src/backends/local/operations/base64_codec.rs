// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use base64::engine::general_purpose::{GeneralPurpose, STANDARD, URL_SAFE};
use base64::Engine;
use serde_json::Value;

use super::text_input;
use crate::errors::OperationError;
use crate::traits::{Operation, OperationInput, Parameters};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base64Direction {
    Encode,
    Decode,
}

/// Base64 codec operation.
///
/// Accepts an optional `alphabet` parameter: `"standard"` (default) or `"url_safe"`.
pub struct Base64Operation {
    direction: Base64Direction,
}

impl Base64Operation {
    pub fn encode() -> Self {
        Self {
            direction: Base64Direction::Encode,
        }
    }

    pub fn decode() -> Self {
        Self {
            direction: Base64Direction::Decode,
        }
    }

    fn engine(parameters: &Parameters) -> Result<GeneralPurpose, OperationError> {
        match parameters.get("alphabet").and_then(Value::as_str) {
            None | Some("standard") => Ok(STANDARD),
            Some("url_safe") => Ok(URL_SAFE),
            Some(other) => Err(OperationError::InvalidParameter {
                name: "alphabet".to_string(),
                reason: format!("unknown alphabet '{}'", other),
            }),
        }
    }
}

#[async_trait]
impl Operation for Base64Operation {
    async fn run(&self, input: OperationInput, parameters: &Parameters) -> Result<Value, OperationError> {
        let text = text_input(&input)?;
        let engine = Self::engine(parameters)?;

        match self.direction {
            Base64Direction::Encode => Ok(Value::String(engine.encode(text.as_bytes()))),
            Base64Direction::Decode => {
                let bytes = engine
                    .decode(text.trim())
                    .map_err(|e| OperationError::InvalidInput(format!("invalid base64: {}", e)))?;
                let decoded = String::from_utf8(bytes)
                    .map_err(|e| OperationError::InvalidInput(format!("decoded bytes are not UTF-8: {}", e)))?;
                Ok(Value::String(decoded))
            }
        }
    }

    fn name(&self) -> &str {
        match self.direction {
            Base64Direction::Encode => "to_base64",
            Base64Direction::Decode => "from_base64",
        }
    }
}
