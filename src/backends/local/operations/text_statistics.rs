use async_trait::async_trait;
use serde_json::{json, Value};

use super::text_input;
use crate::errors::OperationError;
use crate::traits::{Operation, OperationInput, Parameters};

/// Text Statistics operation - counts characters, words and lines.
///
/// Produces a multi-output object with `chars`, `words` and `lines` keys, so
/// nodes wrapping it declare those as their output ports.
#[derive(Default)]
pub struct TextStatisticsOperation;

impl TextStatisticsOperation {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Operation for TextStatisticsOperation {
    async fn run(&self, input: OperationInput, _parameters: &Parameters) -> Result<Value, OperationError> {
        let text = text_input(&input)?;
        Ok(json!({
            "chars": text.chars().count(),
            "words": text.split_whitespace().count(),
            "lines": text.lines().count().max(1), // At least 1 line even if empty
        }))
    }

    fn name(&self) -> &str {
        "text_statistics"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts() {
        let stats = TextStatisticsOperation::new()
            .run(OperationInput::Single(json!("one two\nthree")), &Parameters::new())
            .await
            .unwrap();
        assert_eq!(stats, json!({"chars": 13, "words": 3, "lines": 2}));
    }
}
