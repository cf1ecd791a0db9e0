use async_trait::async_trait;
use serde_json::Value;

use super::text_input;
use crate::errors::OperationError;
use crate::traits::{Operation, OperationInput, Parameters};

/// Which case the text is converted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCase {
    Upper,
    Lower,
}

/// Change Text Case operation - converts text to upper or lower case
pub struct ChangeTextCaseOperation {
    case: TextCase,
}

impl ChangeTextCaseOperation {
    pub fn new(case: TextCase) -> Self {
        Self { case }
    }

    pub fn upper() -> Self {
        Self::new(TextCase::Upper)
    }

    pub fn lower() -> Self {
        Self::new(TextCase::Lower)
    }
}

#[async_trait]
impl Operation for ChangeTextCaseOperation {
    async fn run(&self, input: OperationInput, _parameters: &Parameters) -> Result<Value, OperationError> {
        let text = text_input(&input)?;
        let converted = match self.case {
            TextCase::Upper => text.to_uppercase(),
            TextCase::Lower => text.to_lowercase(),
        };
        Ok(Value::String(converted))
    }

    fn name(&self) -> &str {
        match self.case {
            TextCase::Upper => "to_upper_case",
            TextCase::Lower => "to_lower_case",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_upper_and_lower() {
        let params = Parameters::new();

        let upper = ChangeTextCaseOperation::upper()
            .run(OperationInput::Single(json!("Hello")), &params)
            .await
            .unwrap();
        assert_eq!(upper, json!("HELLO"));

        let lower = ChangeTextCaseOperation::lower()
            .run(OperationInput::Single(json!("Hello")), &params)
            .await
            .unwrap();
        assert_eq!(lower, json!("hello"));
    }

    #[tokio::test]
    async fn test_non_text_input_is_rejected() {
        let result = ChangeTextCaseOperation::upper()
            .run(OperationInput::Single(json!(42)), &Parameters::new())
            .await;
        assert!(matches!(result, Err(OperationError::InvalidInput(_))));
    }
}
