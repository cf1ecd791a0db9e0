// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt::{Display, Formatter};

use crate::observability::messages::StructuredLog;

/// A variable snapshot replaced the store's contents.
///
/// # Log Level
/// `debug!` - Detail
pub struct VariablesImported {
    pub variable_count: usize,
    pub link_count: usize,
}

impl Display for VariablesImported {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Imported {} variables and {} links",
            self.variable_count, self.link_count
        )
    }
}

impl StructuredLog for VariablesImported {
    fn log(&self) {
        tracing::debug!(
            variable_count = self.variable_count,
            link_count = self.link_count,
            "{}", self
        );
    }
}
