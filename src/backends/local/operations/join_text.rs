use async_trait::async_trait;
use serde_json::Value;

use crate::errors::OperationError;
use crate::traits::{Operation, OperationInput, Parameters};

/// Join Text operation - concatenates every connected input port.
///
/// Ports are joined in name order using the `separator` parameter (default
/// empty string). Non-string values are rendered as JSON.
#[derive(Default)]
pub struct JoinTextOperation;

impl JoinTextOperation {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Operation for JoinTextOperation {
    async fn run(&self, input: OperationInput, parameters: &Parameters) -> Result<Value, OperationError> {
        let separator = parameters.get("separator").and_then(Value::as_str).unwrap_or("");

        let mut ports = match input {
            OperationInput::Ports(ports) => ports.into_iter().collect::<Vec<_>>(),
            OperationInput::Single(value) => vec![(String::new(), value)],
        };
        ports.sort_by(|a, b| a.0.cmp(&b.0));

        let joined = ports
            .into_iter()
            .map(|(_, value)| match value {
                Value::String(text) => text,
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(separator);

        Ok(Value::String(joined))
    }

    fn name(&self) -> &str {
        "join_text"
    }
}
