// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::consts::{RECIPE_FORMAT, RECIPE_VERSION};
use crate::traits::Parameters;

/// An ordered chain of operations, the linear view's data.
///
/// # Example
/// ```json
/// {
///   "format": "encoder-recipe",
///   "version": "1.0",
///   "metadata": { "name": "shout", "description": "" },
///   "operations": [
///     { "id": "op1", "name": "Upper", "operation": "to_upper_case", "parameters": {} }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRecipe {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub metadata: RecipeMetadata,
    #[serde(default)]
    pub operations: Vec<RecipeOperation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    /// Any other metadata keys, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One step of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeOperation {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub operation: String,
    #[serde(default)]
    pub parameters: Parameters,
}

fn default_format() -> String {
    RECIPE_FORMAT.to_string()
}

fn default_version() -> String {
    RECIPE_VERSION.to_string()
}

impl Default for LinearRecipe {
    fn default() -> Self {
        Self {
            format: default_format(),
            version: default_version(),
            metadata: RecipeMetadata::default(),
            operations: Vec::new(),
        }
    }
}

impl LinearRecipe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: RecipeMetadata {
                name: name.into(),
                ..RecipeMetadata::default()
            },
            ..Self::default()
        }
    }

    /// Append a step; builder style.
    pub fn push(mut self, id: impl Into<String>, operation: impl Into<String>, parameters: Parameters) -> Self {
        let id = id.into();
        self.operations.push(RecipeOperation {
            name: id.clone(),
            id,
            operation: operation.into(),
            parameters,
        });
        self
    }

    pub fn operation_ids(&self) -> Vec<&str> {
        self.operations.iter().map(|op| op.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
