// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde_json::Value;

use super::text_input;
use crate::errors::OperationError;
use crate::traits::{Operation, OperationInput, Parameters};

/// Reverse Text operation - reverses the input string by characters
#[derive(Default)]
pub struct ReverseTextOperation;

impl ReverseTextOperation {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Operation for ReverseTextOperation {
    async fn run(&self, input: OperationInput, _parameters: &Parameters) -> Result<Value, OperationError> {
        let reversed: String = text_input(&input)?.chars().rev().collect();
        Ok(Value::String(reversed))
    }

    fn name(&self) -> &str {
        "reverse_text"
    }
}
