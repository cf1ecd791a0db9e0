// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod base64_codec;
pub mod change_text_case;
pub mod join_text;
pub mod reverse_text;
pub mod text_statistics;

pub use base64_codec::*;
pub use change_text_case::*;
pub use join_text::*;
pub use reverse_text::*;
pub use text_statistics::*;

use crate::errors::OperationError;
use crate::traits::OperationInput;

/// Pull the text out of a single-valued input, rejecting anything else.
pub(crate) fn text_input(input: &OperationInput) -> Result<&str, OperationError> {
    input
        .as_str()
        .ok_or_else(|| OperationError::InvalidInput("expected a single text value".to_string()))
}
