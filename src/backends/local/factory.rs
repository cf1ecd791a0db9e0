use std::sync::Arc;

use super::operations::*;
use crate::traits::Operation;

/// Factory for creating local (in-process) operation instances
pub struct LocalOperationFactory;

impl LocalOperationFactory {
    /// Create an operation by its registry name
    ///
    /// - "to_upper_case" / "to_lower_case" -> ChangeTextCaseOperation
    /// - "reverse_text" -> ReverseTextOperation
    /// - "to_base64" / "from_base64" -> Base64Operation
    /// - "join_text" -> JoinTextOperation (multi-input)
    /// - "text_statistics" -> TextStatisticsOperation (multi-output)
    pub fn create_operation(name: &str) -> Result<Arc<dyn Operation>, String> {
        match name {
            "to_upper_case" => Ok(Arc::new(ChangeTextCaseOperation::upper())),
            "to_lower_case" => Ok(Arc::new(ChangeTextCaseOperation::lower())),
            "reverse_text" => Ok(Arc::new(ReverseTextOperation::new())),
            "to_base64" => Ok(Arc::new(Base64Operation::encode())),
            "from_base64" => Ok(Arc::new(Base64Operation::decode())),
            "join_text" => Ok(Arc::new(JoinTextOperation::new())),
            "text_statistics" => Ok(Arc::new(TextStatisticsOperation::new())),
            _ => Err(format!("Unknown local operation: '{}'", name)),
        }
    }

    /// List all available local operation names
    pub fn list_available_operations() -> Vec<&'static str> {
        vec![
            "to_upper_case",
            "to_lower_case",
            "reverse_text",
            "to_base64",
            "from_base64",
            "join_text",
            "text_statistics",
        ]
    }

    /// Instantiate every available local operation
    pub fn create_all() -> Vec<Arc<dyn Operation>> {
        Self::list_available_operations()
            .into_iter()
            .filter_map(|name| Self::create_operation(name).ok())
            .collect()
    }

    /// Check if an operation is available
    pub fn is_operation_available(name: &str) -> bool {
        Self::list_available_operations().contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{OperationInput, Parameters};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_text_operations() {
        let test_cases = vec![
            ("to_upper_case", "hello", "HELLO"),
            ("to_lower_case", "HELLO", "hello"),
            ("reverse_text", "hello", "olleh"),
            ("to_base64", "hi", "aGk="),
            ("from_base64", "aGk=", "hi"),
        ];

        for (name, input, expected) in test_cases {
            let operation = LocalOperationFactory::create_operation(name)
                .unwrap_or_else(|e| panic!("Failed to create operation {}: {}", name, e));

            let result = operation
                .run(OperationInput::Single(json!(input)), &Parameters::new())
                .await
                .unwrap();
            assert_eq!(result, json!(expected), "Failed for operation: {}", name);
        }
    }

    #[test]
    fn test_created_names_match_registry_names() {
        for name in LocalOperationFactory::list_available_operations() {
            let operation = LocalOperationFactory::create_operation(name).unwrap();
            assert_eq!(operation.name(), name);
        }
    }

    #[test]
    fn test_unknown_operation() {
        assert!(LocalOperationFactory::create_operation("rot13").is_err());
        assert!(!LocalOperationFactory::is_operation_available("rot13"));
        assert!(LocalOperationFactory::is_operation_available("join_text"));
    }

    #[tokio::test]
    async fn test_join_text_orders_ports_by_name() {
        let operation = LocalOperationFactory::create_operation("join_text").unwrap();
        let mut ports = serde_json::Map::new();
        ports.insert("b".to_string(), json!("world"));
        ports.insert("a".to_string(), json!("hello"));
        let mut params = Parameters::new();
        params.insert("separator".to_string(), json!(" "));

        let result = operation.run(OperationInput::Ports(ports), &params).await.unwrap();
        assert_eq!(result, json!("hello world"));
    }
}
